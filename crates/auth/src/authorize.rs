use thiserror::Error;

use crate::{Permission, Principal, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// Unknown username or wrong password. Deliberately does not say which.
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("forbidden: role '{role}' lacks permission '{permission}'")]
    Forbidden { role: Role, permission: Permission },
}

/// Check that a principal may perform `required`.
///
/// - No IO
/// - No panics
/// - Pure policy check against the role table
pub fn authorize(principal: &Principal, required: Permission) -> Result<(), AuthzError> {
    if principal.can(required) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden {
            role: principal.role,
            permission: required,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: Role) -> Principal {
        Principal::new("someone", "Someone", role)
    }

    #[test]
    fn staff_may_adjust_quantity() {
        assert!(authorize(&principal(Role::Staff), Permission::AdjustQuantity).is_ok());
    }

    #[test]
    fn staff_may_not_add_items() {
        let err = authorize(&principal(Role::Staff), Permission::AddItem).unwrap_err();
        assert_eq!(
            err,
            AuthzError::Forbidden {
                role: Role::Staff,
                permission: Permission::AddItem
            }
        );
        assert!(err.to_string().contains("inventory.create"));
    }

    #[test]
    fn only_admin_manages_users() {
        assert!(authorize(&principal(Role::Manager), Permission::ManageUsers).is_err());
        assert!(authorize(&principal(Role::Admin), Permission::ManageUsers).is_ok());
    }
}
