//! Group permission registry.
//!
//! Modules declare group permissions in `<module>.og_permissions.yml`. This
//! crate discovers those files, merges them with permissions registered from
//! code, fills role defaults, and replaces the symbolic role tokens
//! (`OG_ANONYMOUS_ROLE`, `OG_AUTHENTICATED_ROLE`, `OG_ADMINISTRATOR_ROLE`)
//! with concrete group role ids. Enforcement, role storage, and the
//! permissions screen live elsewhere and only consume the catalog.
//!
//! ```yaml
//! update group:
//!   title: 'Edit group'
//!   description: 'Edit the group.'
//!   restrict access: false
//!   default roles:
//!     - OG_ADMINISTRATOR_ROLE
//!   roles:
//!     - OG_AUTHENTICATED_ROLE
//!     - OG_ADMINISTRATOR_ROLE
//! ```

pub mod assembly;
pub mod catalog;
pub mod discovery;
pub mod handler;
pub mod modules;
pub mod runtime;

pub use assembly::{
    CallbackRegistry, PERMISSION_CALLBACKS_KEY, PermissionAssembler, PermissionSource,
};
pub use catalog::{
    ADMINISTRATOR_ROLE, ANONYMOUS_ROLE, AUTHENTICATED_ROLE, PermissionCatalog,
    PermissionDefinition, PermissionEntry, RoleReference, resolve_role, resolve_roles,
};
pub use discovery::{
    DEFAULT_BASENAME, DiscoveredDocuments, Discovery, RawDocument, YamlDiscovery,
};
pub use handler::{OgPermissionHandler, PermissionHandler};
pub use modules::{ModuleInfo, ModuleList};
pub use runtime::DiscoveryConfig;

/// Tokens of a list written with commas, whitespace, or both.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_accepts_commas_and_whitespace() {
        assert_eq!(
            split_list(" a, b\tc ,,d "),
            vec!["a".to_string(), "b".into(), "c".into(), "d".into()]
        );
        assert!(split_list(" , ").is_empty());
    }
}
