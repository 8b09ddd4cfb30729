//! Prints the resolved group permission catalog as JSON.
//!
//! Scans the module roots (from `--module-root` or `OG_MODULE_PATH`) for
//! `<module>.info.yml`, reads each module's declaration file, and writes the
//! catalog to stdout. Set `RUST_LOG=debug` to trace discovery on stderr.

use anyhow::{Result, anyhow, bail};
use og_permissions::{CallbackRegistry, DiscoveryConfig, ModuleList, OgPermissionHandler};
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse(env::args_os().skip(1))?;
    let config = DiscoveryConfig::from_env()
        .with_module_roots(args.module_roots)
        .with_basename(args.basename);
    if config.module_roots.is_empty() {
        bail!("no module roots given; pass --module-root or set OG_MODULE_PATH");
    }

    let modules = ModuleList::scan(&config.module_roots)?;
    let handler =
        OgPermissionHandler::with_basename(modules, CallbackRegistry::new(), &config.basename)?;
    let catalog = if args.unsorted {
        handler.build_catalog()?
    } else {
        handler.get_catalog()?
    };

    println!("{}", serde_json::to_string_pretty(&catalog)?);
    Ok(())
}

#[derive(Debug, Default)]
struct CliArgs {
    module_roots: Vec<PathBuf>,
    basename: Option<String>,
    unsorted: bool,
}

impl CliArgs {
    fn parse(mut args: impl Iterator<Item = OsString>) -> Result<Self> {
        let mut parsed = CliArgs::default();
        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--module-root" => {
                    let root = next_value(&mut args, "--module-root")?;
                    parsed.module_roots.push(PathBuf::from(root));
                }
                "--basename" => {
                    let basename = next_value(&mut args, "--basename")?;
                    if basename.trim().is_empty() {
                        bail!("--basename must not be empty");
                    }
                    parsed.basename = Some(basename);
                }
                "--unsorted" => parsed.unsorted = true,
                "--help" | "-h" => {
                    print!("{}", usage());
                    std::process::exit(0);
                }
                other => bail!("unknown flag: {other}\n{}", usage()),
            }
        }
        Ok(parsed)
    }
}

fn next_value(args: &mut impl Iterator<Item = OsString>, flag: &str) -> Result<String> {
    args.next()
        .map(|os| {
            os.into_string()
                .map_err(|_| anyhow!("value for {flag} is not valid UTF-8"))
        })
        .transpose()?
        .ok_or_else(|| anyhow!("missing value for {flag}"))
}

fn usage() -> &'static str {
    "Usage: og-permissions-dump [--module-root DIR]... [--basename NAME] [--unsorted]\n\
Prints the resolved group permission catalog as JSON. Module roots default to OG_MODULE_PATH.\n"
}
