//! Permission catalog types.
//!
//! Role references and the permission records the handler produces. Callers
//! receive a `PermissionCatalog`; `PermissionEntry` is the intermediate form
//! handed over by the assembler.

pub mod model;
pub mod roles;

pub use model::{PermissionCatalog, PermissionDefinition, PermissionEntry};
pub use roles::{
    ADMINISTRATOR_ROLE, ADMINISTRATOR_ROLE_TOKEN, ANONYMOUS_ROLE, ANONYMOUS_ROLE_TOKEN,
    AUTHENTICATED_ROLE, AUTHENTICATED_ROLE_TOKEN, RoleReference, default_allowed_roles,
    resolve_role, resolve_roles,
};
