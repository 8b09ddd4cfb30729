use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A throwaway module tree: one directory per module with an info file and,
/// optionally, a permission declaration file.
pub struct ModuleTree {
    temp: TempDir,
}

impl ModuleTree {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().expect("temp dir"),
        }
    }

    pub fn root(&self) -> PathBuf {
        self.temp.path().to_path_buf()
    }

    pub fn add_module(&self, rel_dir: &str, machine: &str, display: &str) -> PathBuf {
        let dir = self.temp.path().join(rel_dir);
        fs::create_dir_all(&dir).expect("create module dir");
        fs::write(
            dir.join(format!("{machine}.info.yml")),
            format!("name: '{display}'\ntype: module\n"),
        )
        .expect("write info file");
        dir
    }

    pub fn declare(&self, dir: &Path, machine: &str, yaml: &str) {
        fs::write(dir.join(format!("{machine}.og_permissions.yml")), yaml)
            .expect("write declarations");
    }
}

pub fn dump_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_og-permissions-dump"))
}

/// Run the dump binary and return its stdout, failing with stderr attached.
pub fn run_dump(configure: impl FnOnce(&mut Command)) -> Result<Vec<u8>> {
    let mut cmd = Command::new(dump_binary());
    configure(&mut cmd);
    let output: Output = cmd.output().context("spawning og-permissions-dump")?;
    if !output.status.success() {
        bail!(
            "og-permissions-dump exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(output.stdout)
}
