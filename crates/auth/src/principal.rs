use serde::Serialize;

use crate::{Permission, Role};

/// The authenticated session: who is logged in and with which role.
///
/// Lives for one login only; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub username: String,
    pub full_name: String,
    pub role: Role,
}

impl Principal {
    pub fn new(username: impl Into<String>, full_name: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            full_name: full_name.into(),
            role,
        }
    }

    pub fn can(&self, permission: Permission) -> bool {
        permission.granted_to(self.role)
    }
}
