//! Installed-module listing.
//!
//! The handler needs two things from the module system: the directory each
//! module lives in (where declaration files are looked up) and a display name
//! (used to order the permissions screen). `ModuleList` carries both, either
//! built by the host or scanned from `<machine>.info.yml` files on disk.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const INFO_SUFFIX: &str = ".info.yml";

#[derive(Clone, Debug, Eq, PartialEq)]
/// One installed module.
pub struct ModuleInfo {
    pub name: String,
    pub display_name: String,
    pub path: PathBuf,
}

#[derive(Clone, Debug, Default)]
/// Modules in load order, keyed by machine name.
pub struct ModuleList {
    modules: IndexMap<String, ModuleInfo>,
}

#[derive(Deserialize)]
struct InfoFile {
    #[serde(default)]
    name: Option<String>,
}

impl ModuleList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module. A later registration of the same machine name
    /// replaces the earlier one in place.
    pub fn insert(&mut self, name: &str, display_name: &str, path: impl Into<PathBuf>) {
        self.modules.insert(
            name.to_string(),
            ModuleInfo {
                name: name.to_string(),
                display_name: display_name.to_string(),
                path: path.into(),
            },
        );
    }

    /// Walk `roots` recursively and register every module with an info file.
    ///
    /// Roots that do not exist are skipped. Modules are ordered by the path of
    /// their info file so repeated scans agree.
    pub fn scan(roots: &[PathBuf]) -> Result<Self> {
        let mut info_files = Vec::new();
        for root in roots {
            collect_info_files(root, &mut info_files)?;
        }
        info_files.sort();

        let mut list = Self::new();
        for info_path in info_files {
            let Some(machine) = machine_name(&info_path) else {
                continue;
            };
            let data = fs::read_to_string(&info_path)
                .with_context(|| format!("reading {}", info_path.display()))?;
            let info: Option<InfoFile> = serde_yaml::from_str(&data)
                .with_context(|| format!("parsing {}", info_path.display()))?;
            let display_name = info
                .and_then(|info| info.name)
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| machine.clone());
            let dir = info_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            debug!(module = %machine, path = %dir.display(), "found module");
            list.insert(&machine, &display_name, dir);
        }
        Ok(list)
    }

    pub fn get(&self, name: &str) -> Option<&ModuleInfo> {
        self.modules.get(name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Display name for a module, falling back to the machine name for
    /// modules that are not listed.
    pub fn display_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.modules
            .get(name)
            .map(|module| module.display_name.as_str())
            .unwrap_or(name)
    }

    /// `(machine name, directory)` pairs in load order.
    pub fn module_directories(&self) -> Vec<(String, PathBuf)> {
        self.modules
            .values()
            .map(|module| (module.name.clone(), module.path.clone()))
            .collect()
    }
}

fn collect_info_files(root: &Path, acc: &mut Vec<PathBuf>) -> Result<()> {
    if !root.is_dir() {
        return Ok(());
    }
    for entry in fs::read_dir(root).with_context(|| format!("listing {}", root.display()))? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_info_files(&path, acc)?;
        } else if machine_name(&path).is_some() {
            acc.push(path);
        }
    }
    Ok(())
}

fn machine_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let machine = file_name.strip_suffix(INFO_SUFFIX)?;
    if machine.is_empty() || machine.contains('.') {
        return None;
    }
    Some(machine.to_string())
}
