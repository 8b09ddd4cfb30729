//! Declarative permission file discovery.
//!
//! Each module may ship `<module>.<basename>.yml` in its directory. Discovery
//! reads those files in module order and hands back the raw mappings keyed by
//! the contributing module; no validation or defaulting happens here.

use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Basename of group permission declaration files.
pub const DEFAULT_BASENAME: &str = "og_permissions";

/// Raw declarations for one module: permission name (or reserved key) to value.
pub type RawDocument = Map<String, Value>;

/// Raw declarations for every module that shipped a file, in module order.
pub type DiscoveredDocuments = IndexMap<String, RawDocument>;

/// Source of raw permission declarations.
pub trait Discovery {
    fn find_all(&self) -> Result<DiscoveredDocuments>;
}

impl<D: Discovery + ?Sized> Discovery for &D {
    fn find_all(&self) -> Result<DiscoveredDocuments> {
        (**self).find_all()
    }
}

impl<D: Discovery + ?Sized> Discovery for Box<D> {
    fn find_all(&self) -> Result<DiscoveredDocuments> {
        (**self).find_all()
    }
}

#[derive(Clone, Debug)]
/// Reads `<module>.<basename>.yml` from each module directory.
pub struct YamlDiscovery {
    basename: String,
    directories: Vec<(String, PathBuf)>,
}

impl YamlDiscovery {
    pub fn new(basename: &str, directories: Vec<(String, PathBuf)>) -> Self {
        Self {
            basename: basename.to_string(),
            directories,
        }
    }

    pub fn basename(&self) -> &str {
        &self.basename
    }

    /// Declaration file path for a module directory.
    pub fn file_path(&self, module: &str, dir: &Path) -> PathBuf {
        dir.join(format!("{module}.{}.yml", self.basename))
    }
}

impl Discovery for YamlDiscovery {
    fn find_all(&self) -> Result<DiscoveredDocuments> {
        let mut found = DiscoveredDocuments::new();
        for (module, dir) in &self.directories {
            let path = self.file_path(module, dir);
            if !path.is_file() {
                continue;
            }
            let document = parse_document(&path)?;
            debug!(
                module = %module,
                path = %path.display(),
                entries = document.len(),
                "discovered permission declarations"
            );
            found.insert(module.clone(), document);
        }
        Ok(found)
    }
}

fn parse_document(path: &Path) -> Result<RawDocument> {
    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    if is_blank(&data) {
        return Ok(RawDocument::new());
    }
    let value: Value =
        serde_yaml::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    match value {
        Value::Null => Ok(RawDocument::new()),
        Value::Object(map) => Ok(map),
        other => bail!(
            "{} must contain a mapping of permissions, found {}",
            path.display(),
            kind(&other)
        ),
    }
}

// Comment-only files carry no YAML document at all.
fn is_blank(data: &str) -> bool {
    data.lines().all(|line| {
        let trimmed = line.trim();
        trimmed.is_empty() || trimmed.starts_with('#')
    })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
