//! `backoffice-auth` — users, roles, permissions and the authorization
//! decision procedures evaluated against them.
//!
//! This crate is intentionally decoupled from HTTP and storage: roles arrive
//! fully loaded and every decision is a pure read of the current snapshot.

pub mod authorize;
pub mod catalog;
pub mod codes;
pub mod permission;
pub mod role;
pub mod user;

pub use authorize::{AuthzError, CommandAuthorization};
pub use catalog::{CatalogDefinition, CatalogError, RoleCatalog, RoleDefinition};
pub use permission::Permission;
pub use role::Role;
pub use user::{AppUser, AppUserUpdate, NewAppUser, PasswordEncoder};
