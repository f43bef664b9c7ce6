//! `stockroom-auth` — authentication and role-based authorization.
//!
//! This crate is intentionally decoupled from files and the terminal.

pub mod authorize;
pub mod permissions;
pub mod principal;
pub mod roles;
pub mod user;

pub use authorize::{authorize, AuthzError};
pub use permissions::{permissions_for, Permission};
pub use principal::Principal;
pub use roles::Role;
pub use user::{PasswordChangeError, UserAccount, UserDirectory, MIN_PASSWORD_LEN};
