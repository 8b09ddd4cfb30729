//! Group role references used inside permission declarations.
//!
//! Declarations name built-in group roles through reserved tokens
//! (`OG_ANONYMOUS_ROLE` and friends) so module authors do not hard-code the
//! concrete role identifiers. Anything else is taken to be a concrete role id
//! already and passes through untouched.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Concrete id of the role held by users outside the group.
pub const ANONYMOUS_ROLE: &str = "non-member";
/// Concrete id of the role held by every group member.
pub const AUTHENTICATED_ROLE: &str = "member";
/// Concrete id of the group administrator role.
pub const ADMINISTRATOR_ROLE: &str = "administrator member";

pub const ANONYMOUS_ROLE_TOKEN: &str = "OG_ANONYMOUS_ROLE";
pub const AUTHENTICATED_ROLE_TOKEN: &str = "OG_AUTHENTICATED_ROLE";
pub const ADMINISTRATOR_ROLE_TOKEN: &str = "OG_ADMINISTRATOR_ROLE";

/// A role as written in a permission declaration.
///
/// The three built-in roles are closed variants; `Custom` keeps any other
/// string verbatim so declarations can target site-specific roles.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum RoleReference {
    Anonymous,
    Authenticated,
    Administrator,
    Custom(String),
}

impl RoleReference {
    /// Parse a declaration token. Never fails.
    pub fn from_token(token: &str) -> Self {
        match token {
            ANONYMOUS_ROLE_TOKEN => RoleReference::Anonymous,
            AUTHENTICATED_ROLE_TOKEN => RoleReference::Authenticated,
            ADMINISTRATOR_ROLE_TOKEN => RoleReference::Administrator,
            other => RoleReference::Custom(other.to_string()),
        }
    }

    /// The token this reference was read from.
    pub fn as_token(&self) -> &str {
        match self {
            RoleReference::Anonymous => ANONYMOUS_ROLE_TOKEN,
            RoleReference::Authenticated => AUTHENTICATED_ROLE_TOKEN,
            RoleReference::Administrator => ADMINISTRATOR_ROLE_TOKEN,
            RoleReference::Custom(value) => value.as_str(),
        }
    }

    /// The concrete role id this reference stands for.
    pub fn resolve(&self) -> &str {
        match self {
            RoleReference::Anonymous => ANONYMOUS_ROLE,
            RoleReference::Authenticated => AUTHENTICATED_ROLE,
            RoleReference::Administrator => ADMINISTRATOR_ROLE,
            RoleReference::Custom(value) => value.as_str(),
        }
    }
}

impl Serialize for RoleReference {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_token())
    }
}

impl<'de> Deserialize<'de> for RoleReference {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_token(&value))
    }
}

/// Resolve a single declaration token to a concrete role id.
pub fn resolve_role(token: &str) -> String {
    RoleReference::from_token(token).resolve().to_string()
}

/// Resolve every reference, keeping order and duplicates.
pub fn resolve_roles(roles: &[RoleReference]) -> Vec<String> {
    roles.iter().map(|role| role.resolve().to_string()).collect()
}

/// The roles a permission may be granted to when its declaration is silent.
pub fn default_allowed_roles() -> Vec<RoleReference> {
    vec![RoleReference::Anonymous, RoleReference::Authenticated]
}
