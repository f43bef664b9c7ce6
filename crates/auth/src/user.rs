//! User directory: accounts keyed by username.
//!
//! The directory is a plain in-memory map; persistence is the caller's job.
//! It serializes as a JSON object `username -> {password, role, full_name}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult};

use crate::{AuthzError, Principal, Role};

/// Shortest password accepted when one is set or changed.
pub const MIN_PASSWORD_LEN: usize = 4;

// ─────────────────────────────────────────────────────────────────────────────
// User Account
// ─────────────────────────────────────────────────────────────────────────────

/// A stored account. Passwords are kept in plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub password: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub full_name: String,
}

impl UserAccount {
    pub fn new(password: impl Into<String>, role: Role, full_name: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            role,
            full_name: full_name.into(),
        }
    }

    /// Full name, falling back to the username for accounts that have none.
    pub fn display_name<'a>(&'a self, username: &'a str) -> &'a str {
        if self.full_name.trim().is_empty() {
            username
        } else {
            &self.full_name
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// User Directory
// ─────────────────────────────────────────────────────────────────────────────

/// All known accounts.
///
/// # Invariants
/// - Usernames are unique, non-empty and contain no whitespace.
/// - At least one admin exists: a loaded directory without one is rejected
///   by [`UserDirectory::validate`], and the last admin can be neither
///   removed nor demoted.
/// - Admins cannot remove their own account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserDirectory {
    users: BTreeMap<String, UserAccount>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The template accounts written on first run.
    pub fn with_defaults() -> Self {
        let mut users = BTreeMap::new();
        users.insert(
            "admin".to_string(),
            UserAccount::new("admin", Role::Admin, "System Administrator"),
        );
        users.insert(
            "manager".to_string(),
            UserAccount::new("manager", Role::Manager, "Inventory Manager"),
        );
        users.insert(
            "staff".to_string(),
            UserAccount::new("staff", Role::Staff, "Store Staff"),
        );
        Self { users }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn get(&self, username: &str) -> Option<&UserAccount> {
        self.users.get(username.trim())
    }

    /// Accounts in username order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &UserAccount)> {
        self.users.iter().map(|(name, account)| (name.as_str(), account))
    }

    pub fn users_by_role(&self, role: Role) -> Vec<(&str, &UserAccount)> {
        self.iter().filter(|(_, account)| account.role == role).collect()
    }

    /// Check credentials and open a session.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Principal, AuthzError> {
        match self.get(username) {
            Some(account) if account.password == password => self
                .principal(username)
                .ok_or(AuthzError::InvalidCredentials),
            _ => Err(AuthzError::InvalidCredentials),
        }
    }

    /// The account as it stands now, or `None` once it has been removed.
    pub fn principal(&self, username: &str) -> Option<Principal> {
        let username = username.trim();
        self.users
            .get(username)
            .map(|account| Principal::new(username, account.display_name(username), account.role))
    }

    /// Reject a directory nobody could administer.
    pub fn validate(&self) -> DomainResult<()> {
        if self.admin_count() == 0 {
            return Err(DomainError::invariant(
                "user directory must hold at least one admin account",
            ));
        }
        Ok(())
    }

    pub fn add_user(
        &mut self,
        username: &str,
        full_name: &str,
        password: &str,
        role: Role,
    ) -> DomainResult<()> {
        let username = username.trim();
        validate_username(username)?;
        validate_password(password)?;
        if self.users.contains_key(username) {
            return Err(DomainError::validation(format!(
                "user '{username}' already exists"
            )));
        }
        self.users.insert(
            username.to_string(),
            UserAccount::new(password, role, full_name.trim()),
        );
        Ok(())
    }

    /// Replace a user's password (no knowledge of the old one required).
    pub fn set_password(&mut self, username: &str, new_password: &str) -> DomainResult<()> {
        validate_password(new_password)?;
        let account = self.account_mut(username)?;
        account.password = new_password.to_string();
        Ok(())
    }

    /// Change a user's own password after re-checking the current one.
    pub fn change_password(
        &mut self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), PasswordChangeError> {
        self.authenticate(username, current_password)?;
        self.set_password(username, new_password)?;
        Ok(())
    }

    pub fn set_role(&mut self, username: &str, role: Role) -> DomainResult<()> {
        let current = self.account(username)?.role;
        if current == Role::Admin && role != Role::Admin && self.admin_count() == 1 {
            return Err(DomainError::invariant("cannot demote the last admin"));
        }
        self.account_mut(username)?.role = role;
        Ok(())
    }

    pub fn remove_user(&mut self, actor: &Principal, username: &str) -> DomainResult<UserAccount> {
        let username = username.trim();
        if actor.username == username {
            return Err(DomainError::invariant("you cannot remove your own account"));
        }
        if self.account(username)?.role == Role::Admin && self.admin_count() == 1 {
            return Err(DomainError::invariant("cannot remove the last admin"));
        }
        self.users
            .remove(username)
            .ok_or_else(|| DomainError::not_found(format!("user '{username}'")))
    }

    fn admin_count(&self) -> usize {
        self.users.values().filter(|a| a.role == Role::Admin).count()
    }

    fn account(&self, username: &str) -> DomainResult<&UserAccount> {
        let username = username.trim();
        self.users
            .get(username)
            .ok_or_else(|| DomainError::not_found(format!("user '{username}'")))
    }

    fn account_mut(&mut self, username: &str) -> DomainResult<&mut UserAccount> {
        let username = username.trim();
        self.users
            .get_mut(username)
            .ok_or_else(|| DomainError::not_found(format!("user '{username}'")))
    }
}

/// Failure of a self-service password change.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum PasswordChangeError {
    #[error("current password is incorrect")]
    WrongPassword(#[from] AuthzError),

    #[error(transparent)]
    Rejected(#[from] DomainError),
}

fn validate_username(username: &str) -> DomainResult<()> {
    if username.is_empty() {
        return Err(DomainError::validation("username cannot be empty"));
    }
    if username.chars().any(char::is_whitespace) {
        return Err(DomainError::validation("username cannot contain whitespace"));
    }
    Ok(())
}

fn validate_password(password: &str) -> DomainResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Principal {
        Principal::new("admin", "System Administrator", Role::Admin)
    }

    #[test]
    fn defaults_hold_one_account_per_role() {
        let users = UserDirectory::with_defaults();
        assert_eq!(users.len(), 3);
        for role in Role::ALL {
            let holders = users.users_by_role(role);
            assert_eq!(holders.len(), 1);
            assert_eq!(holders[0].0, role.as_str());
            assert_eq!(holders[0].1.password, role.as_str());
        }
    }

    #[test]
    fn authenticate_admin_succeeds() {
        let users = UserDirectory::with_defaults();
        let session = users.authenticate("admin", "admin").unwrap();
        assert_eq!(session.role, Role::Admin);
        assert_eq!(session.full_name, "System Administrator");
    }

    #[test]
    fn authenticate_wrong_password_fails() {
        let users = UserDirectory::with_defaults();
        assert_eq!(
            users.authenticate("admin", "wrong"),
            Err(AuthzError::InvalidCredentials)
        );
        assert_eq!(
            users.authenticate("nobody", "admin"),
            Err(AuthzError::InvalidCredentials)
        );
    }

    #[test]
    fn authenticate_trims_username_but_not_password() {
        let users = UserDirectory::with_defaults();
        assert!(users.authenticate("  staff ", "staff").is_ok());
        assert!(users.authenticate("staff", " staff").is_err());
    }

    #[test]
    fn missing_full_name_falls_back_to_username() {
        let users: UserDirectory =
            serde_json::from_str(r#"{"bob": {"password": "pw12", "role": "staff"}}"#).unwrap();
        let session = users.authenticate("bob", "pw12").unwrap();
        assert_eq!(session.full_name, "bob");
    }

    #[test]
    fn serializes_as_username_map() {
        let json = serde_json::to_value(UserDirectory::with_defaults()).unwrap();
        assert_eq!(json["manager"]["role"], "manager");
        assert_eq!(json["manager"]["password"], "manager");
        assert_eq!(json["manager"]["full_name"], "Inventory Manager");
    }

    #[test]
    fn add_user_rejects_duplicates_and_short_passwords() {
        let mut users = UserDirectory::with_defaults();
        assert!(matches!(
            users.add_user("staff", "Other", "secret", Role::Staff),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            users.add_user("dana", "Dana", "abc", Role::Staff),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            users.add_user("two words", "Dana", "abcd", Role::Staff),
            Err(DomainError::Validation(_))
        ));
        users.add_user("dana", "Dana", "abcd", Role::Manager).unwrap();
        assert_eq!(users.authenticate("dana", "abcd").unwrap().role, Role::Manager);
    }

    #[test]
    fn change_password_requires_current() {
        let mut users = UserDirectory::with_defaults();
        assert_eq!(
            users.change_password("staff", "nope", "newpass"),
            Err(PasswordChangeError::WrongPassword(AuthzError::InvalidCredentials))
        );
        assert!(matches!(
            users.change_password("staff", "staff", "xy"),
            Err(PasswordChangeError::Rejected(DomainError::Validation(_)))
        ));
        users.change_password("staff", "staff", "newpass").unwrap();
        assert!(users.authenticate("staff", "staff").is_err());
        assert!(users.authenticate("staff", "newpass").is_ok());
    }

    #[test]
    fn last_admin_cannot_be_demoted_or_removed() {
        let mut users = UserDirectory::with_defaults();
        assert!(matches!(
            users.set_role("admin", Role::Staff),
            Err(DomainError::InvariantViolation(_))
        ));

        let other = Principal::new("root", "Root", Role::Admin);
        assert!(matches!(
            users.remove_user(&other, "admin"),
            Err(DomainError::InvariantViolation(_))
        ));

        users.add_user("root", "Root", "rootpw", Role::Admin).unwrap();
        users.set_role("admin", Role::Manager).unwrap();
        assert_eq!(users.get("admin").unwrap().role, Role::Manager);
    }

    #[test]
    fn admin_cannot_remove_self() {
        let mut users = UserDirectory::with_defaults();
        users.add_user("root", "Root", "rootpw", Role::Admin).unwrap();
        assert!(matches!(
            users.remove_user(&admin(), "admin"),
            Err(DomainError::InvariantViolation(_))
        ));
    }

    #[test]
    fn directory_without_admin_is_invalid() {
        assert!(matches!(
            UserDirectory::new().validate(),
            Err(DomainError::InvariantViolation(_))
        ));
        let staff_only: UserDirectory =
            serde_json::from_str(r#"{"bob": {"password": "pw12", "role": "staff"}}"#).unwrap();
        assert!(staff_only.validate().is_err());
        assert!(UserDirectory::with_defaults().validate().is_ok());
    }

    #[test]
    fn principal_reflects_current_role() {
        let mut users = UserDirectory::with_defaults();
        users.add_user("root", "Root", "rootpw", Role::Admin).unwrap();
        users.set_role("admin", Role::Staff).unwrap();
        assert_eq!(users.principal(" admin ").unwrap().role, Role::Staff);
        users.remove_user(&admin(), "staff").unwrap();
        assert!(users.principal("staff").is_none());
    }

    #[test]
    fn remove_user_deletes_account() {
        let mut users = UserDirectory::with_defaults();
        let removed = users.remove_user(&admin(), "staff").unwrap();
        assert_eq!(removed.role, Role::Staff);
        assert!(users.get("staff").is_none());
        assert!(matches!(
            users.remove_user(&admin(), "staff"),
            Err(DomainError::NotFound(_))
        ));
    }
}
