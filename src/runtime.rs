//! Environment-driven configuration shared by the library and binaries.
//!
//! Module roots come from `OG_MODULE_PATH` (comma- or whitespace-separated)
//! and the declaration basename from `OG_PERMISSIONS_BASENAME`. Command-line
//! flags layer on top through the `with_*` methods.

use crate::discovery::DEFAULT_BASENAME;
use crate::split_list;
use std::env;
use std::path::PathBuf;

pub const MODULE_PATH_ENV: &str = "OG_MODULE_PATH";
pub const BASENAME_ENV: &str = "OG_PERMISSIONS_BASENAME";

#[derive(Clone, Debug, Eq, PartialEq)]
/// Where to look for modules and which declaration files to read.
pub struct DiscoveryConfig {
    pub module_roots: Vec<PathBuf>,
    pub basename: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            module_roots: Vec::new(),
            basename: DEFAULT_BASENAME.to_string(),
        }
    }
}

impl DiscoveryConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(env_non_empty)
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(paths) = lookup(MODULE_PATH_ENV) {
            config.module_roots = split_list(&paths).into_iter().map(PathBuf::from).collect();
        }
        if let Some(basename) = lookup(BASENAME_ENV).filter(|value| !value.trim().is_empty()) {
            config.basename = basename.trim().to_string();
        }
        config
    }

    /// Replace the environment's module roots when any were given explicitly.
    pub fn with_module_roots(mut self, roots: Vec<PathBuf>) -> Self {
        if !roots.is_empty() {
            self.module_roots = roots;
        }
        self
    }

    pub fn with_basename(mut self, basename: Option<String>) -> Self {
        if let Some(basename) = basename {
            self.basename = basename;
        }
        self
    }
}

/// Value of an environment variable, treating blank values as unset.
pub fn env_non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = DiscoveryConfig::from_lookup(lookup(&[]));
        assert!(config.module_roots.is_empty());
        assert_eq!(config.basename, "og_permissions");
    }

    #[test]
    fn reads_roots_and_basename() {
        let config = DiscoveryConfig::from_lookup(lookup(&[
            (MODULE_PATH_ENV, "/srv/core/modules, /srv/modules/contrib  /srv/custom"),
            (BASENAME_ENV, " group_permissions "),
        ]));
        assert_eq!(
            config.module_roots,
            vec![
                PathBuf::from("/srv/core/modules"),
                PathBuf::from("/srv/modules/contrib"),
                PathBuf::from("/srv/custom"),
            ]
        );
        assert_eq!(config.basename, "group_permissions");
    }

    #[test]
    fn explicit_values_win_over_environment() {
        let config = DiscoveryConfig::from_lookup(lookup(&[(MODULE_PATH_ENV, "/env/modules")]))
            .with_module_roots(vec![PathBuf::from("/cli/modules")])
            .with_basename(Some("custom".to_string()));
        assert_eq!(config.module_roots, vec![PathBuf::from("/cli/modules")]);
        assert_eq!(config.basename, "custom");

        let untouched = DiscoveryConfig::from_lookup(lookup(&[(MODULE_PATH_ENV, "/env/modules")]))
            .with_module_roots(Vec::new())
            .with_basename(None);
        assert_eq!(untouched.module_roots, vec![PathBuf::from("/env/modules")]);
    }
}
