//! Permission records before and after role resolution.
//!
//! `PermissionEntry` is what the assembler produces from declarations: roles
//! are still symbolic and may be missing. `PermissionDefinition` is what
//! callers see: defaults filled and every role a concrete id. Field names on
//! the wire follow the declaration file format (`restrict access`,
//! `default roles`).

use crate::catalog::roles::{RoleReference, default_allowed_roles, resolve_roles};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
/// Assembled permission entry with roles still in declaration form.
pub struct PermissionEntry {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "restrict access", default, deserialize_with = "null_as_false")]
    pub restrict_access: bool,
    #[serde(default)]
    pub roles: Option<Vec<RoleReference>>,
    #[serde(rename = "default roles", default)]
    pub default_roles: Option<Vec<RoleReference>>,
    pub provider: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
/// Fully resolved permission as exposed to the permissions screen and access checks.
pub struct PermissionDefinition {
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "restrict access")]
    pub restrict_access: bool,
    pub roles: Vec<String>,
    #[serde(rename = "default roles")]
    pub default_roles: Vec<String>,
    pub provider: String,
}

// `restrict access: ~` reads as false.
fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

impl PermissionEntry {
    /// Apply role defaults and resolve every token.
    ///
    /// Missing `roles` means anonymous plus authenticated; missing
    /// `default roles` means none.
    pub fn resolve(self) -> PermissionDefinition {
        let roles = self.roles.unwrap_or_else(default_allowed_roles);
        let default_roles = self.default_roles.unwrap_or_default();
        PermissionDefinition {
            title: self.title,
            description: self.description,
            restrict_access: self.restrict_access,
            roles: resolve_roles(&roles),
            default_roles: resolve_roles(&default_roles),
            provider: self.provider,
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
/// Permission machine name to resolved definition, in a stable order.
pub struct PermissionCatalog {
    permissions: IndexMap<String, PermissionDefinition>,
}

impl PermissionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a permission, keeping its original position on replace.
    pub fn insert(&mut self, name: String, definition: PermissionDefinition) {
        self.permissions.insert(name, definition);
    }

    pub fn get(&self, name: &str) -> Option<&PermissionDefinition> {
        self.permissions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.permissions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Permission names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.permissions.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PermissionDefinition)> {
        self.permissions
            .iter()
            .map(|(name, definition)| (name.as_str(), definition))
    }

    /// Reorder entries in place with a comparator over definitions.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&PermissionDefinition, &PermissionDefinition) -> std::cmp::Ordering,
    {
        self.permissions.sort_by(|_, a, _, b| compare(a, b));
    }

    pub fn into_inner(self) -> IndexMap<String, PermissionDefinition> {
        self.permissions
    }
}

impl FromIterator<(String, PermissionDefinition)> for PermissionCatalog {
    fn from_iter<I: IntoIterator<Item = (String, PermissionDefinition)>>(iter: I) -> Self {
        Self {
            permissions: iter.into_iter().collect(),
        }
    }
}
