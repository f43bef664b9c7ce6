//! The desk: every role-gated operation, persisted as it happens.
//!
//! ```text
//! request (principal + operation)
//!   ↓
//! 1. Authorize the account's stored role against the role table
//!   ↓
//! 2. Apply the domain rule to a working copy of the collection
//!   ↓
//! 3. Save the working copy (whole-document write)
//!   ↓
//! 4. Commit the copy to memory and record a journal entry
//! ```
//!
//! If step 2 fails nothing changes. If step 3 fails memory also stays as it
//! was, so the in-memory collections always match what was last written.

use chrono::{DateTime, Utc};

use stockroom_auth::{
    authorize, AuthzError, Permission, Principal, Role, UserAccount, UserDirectory,
};
use stockroom_core::{DomainError, DomainResult};
use stockroom_inventory::{
    Adjustment, Inventory, InventoryItem, Journal, NewItem, PriceChange, Transaction,
    TransactionKind, ValueReport,
};

use crate::config::StoreConfig;
use crate::document_store::{load_inventory, load_users, DocumentStore, JsonFileStore};
use crate::error::{DeskError, StoreError};

pub type DeskResult<T> = Result<T, DeskError>;

/// A desk backed by the JSON files named in a [`StoreConfig`].
pub type FileDesk = Desk<JsonFileStore<UserDirectory>, JsonFileStore<Inventory>>;

/// Owns both collections, their stores and the session journal.
pub struct Desk<U, I> {
    users: UserDirectory,
    inventory: Inventory,
    journal: Journal,
    user_store: U,
    inventory_store: I,
    clock: fn() -> DateTime<Utc>,
}

impl FileDesk {
    /// Open (creating defaults where missing) the files named in `config`.
    pub fn open_files(config: &StoreConfig) -> Result<Self, StoreError> {
        Desk::open(
            JsonFileStore::new(&config.users_file),
            JsonFileStore::new(&config.inventory_file),
        )
    }
}

impl<U, I> Desk<U, I>
where
    U: DocumentStore<UserDirectory>,
    I: DocumentStore<Inventory>,
{
    pub fn open(user_store: U, inventory_store: I) -> Result<Self, StoreError> {
        let users = load_users(&user_store)?;
        let inventory = load_inventory(&inventory_store)?;
        tracing::info!(
            users = users.document.len(),
            items = inventory.document.len(),
            users_created = users.created,
            inventory_created = inventory.created,
            "desk opened"
        );

        Ok(Self {
            users: users.document,
            inventory: inventory.document,
            journal: Journal::new(),
            user_store,
            inventory_store,
            clock: Utc::now,
        })
    }

    /// Replace the time source (tests).
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn user_store(&self) -> &U {
        &self.user_store
    }

    pub fn inventory_store(&self) -> &I {
        &self.inventory_store
    }

    pub fn authenticate(&self, username: &str, password: &str) -> Result<Principal, AuthzError> {
        match self.users.authenticate(username, password) {
            Ok(principal) => {
                tracing::info!(user = %principal.username, role = %principal.role, "login");
                Ok(principal)
            }
            Err(e) => {
                tracing::warn!(user = %username.trim(), "failed login");
                Err(e)
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────

    /// Up to `limit` journal entries, newest first.
    pub fn transactions(
        &self,
        principal: &Principal,
        limit: usize,
    ) -> DeskResult<Vec<&Transaction>> {
        self.check(principal, Permission::ViewTransactions)?;
        Ok(self.journal.recent(limit))
    }

    pub fn value_report(&self, principal: &Principal) -> DeskResult<ValueReport> {
        self.check(principal, Permission::ValueReport)?;
        Ok(ValueReport::build(&self.inventory))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Inventory mutations
    // ─────────────────────────────────────────────────────────────────────

    pub fn add_item(&mut self, principal: &Principal, new: NewItem) -> DeskResult<InventoryItem> {
        self.check(principal, Permission::AddItem)?;
        let at = (self.clock)();
        let item = self.commit_inventory(principal, "add_item", |inv| {
            inv.add(new, &principal.username, at).cloned()
        })?;
        self.journal.record(Transaction::new(
            TransactionKind::Add,
            &item.name,
            item.quantity,
            format!("Added item: {}", item.name),
            &principal.username,
            at,
        ));
        Ok(item)
    }

    pub fn remove_item(&mut self, principal: &Principal, name: &str) -> DeskResult<InventoryItem> {
        self.check(principal, Permission::RemoveItem)?;
        let at = (self.clock)();
        let item = self.commit_inventory(principal, "remove_item", |inv| inv.remove(name))?;
        self.journal.record(Transaction::new(
            TransactionKind::Delete,
            &item.name,
            0,
            format!("Removed item: {}", item.name),
            &principal.username,
            at,
        ));
        Ok(item)
    }

    pub fn adjust_quantity(
        &mut self,
        principal: &Principal,
        name: &str,
        delta: i64,
        reason: &str,
    ) -> DeskResult<Adjustment> {
        self.check(principal, Permission::AdjustQuantity)?;
        let at = (self.clock)();
        let adjustment = self.commit_inventory(principal, "adjust_quantity", |inv| {
            inv.adjust_quantity(name, delta, &principal.username, at)
        })?;
        let item_name = self.stored_name(name);
        self.journal.record(Transaction::new(
            TransactionKind::for_delta(delta),
            item_name,
            delta.unsigned_abs(),
            reason.trim(),
            &principal.username,
            at,
        ));
        Ok(adjustment)
    }

    pub fn update_price(
        &mut self,
        principal: &Principal,
        name: &str,
        price: f64,
    ) -> DeskResult<PriceChange> {
        self.check(principal, Permission::UpdatePrice)?;
        let at = (self.clock)();
        let change = self.commit_inventory(principal, "update_price", |inv| {
            inv.update_price(name, price, &principal.username, at)
        })?;
        let item_name = self.stored_name(name);
        self.journal.record(Transaction::new(
            TransactionKind::Price,
            item_name,
            0,
            format!("Price {:.2} -> {:.2}", change.previous, change.price),
            &principal.username,
            at,
        ));
        Ok(change)
    }

    // ─────────────────────────────────────────────────────────────────────
    // User mutations
    // ─────────────────────────────────────────────────────────────────────

    pub fn change_own_password(
        &mut self,
        principal: &Principal,
        current: &str,
        new_password: &str,
    ) -> DeskResult<()> {
        self.check(principal, Permission::ChangeOwnPassword)?;
        let mut working = self.users.clone();
        working.change_password(&principal.username, current, new_password)?;
        self.save_users(principal, "change_own_password", working)
    }

    pub fn add_user(
        &mut self,
        principal: &Principal,
        username: &str,
        full_name: &str,
        password: &str,
        role: Role,
    ) -> DeskResult<()> {
        self.check(principal, Permission::ManageUsers)?;
        self.commit_users(principal, "add_user", |users| {
            users.add_user(username, full_name, password, role)
        })
    }

    pub fn set_role(
        &mut self,
        principal: &Principal,
        username: &str,
        role: Role,
    ) -> DeskResult<()> {
        self.check(principal, Permission::ManageUsers)?;
        self.commit_users(principal, "set_role", |users| users.set_role(username, role))
    }

    /// Admin reset of another account's password. Your own goes through
    /// [`Desk::change_own_password`], which asks for the current one.
    pub fn reset_password(
        &mut self,
        principal: &Principal,
        username: &str,
        new_password: &str,
    ) -> DeskResult<()> {
        self.check(principal, Permission::ManageUsers)?;
        if username.trim() == principal.username {
            return Err(DomainError::validation(
                "use 'Change my password' to change your own password",
            )
            .into());
        }
        self.commit_users(principal, "reset_password", |users| {
            users.set_password(username, new_password)
        })
    }

    pub fn remove_user(
        &mut self,
        principal: &Principal,
        username: &str,
    ) -> DeskResult<UserAccount> {
        self.check(principal, Permission::ManageUsers)?;
        self.commit_users(principal, "remove_user", |users| {
            users.remove_user(principal, username)
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Commit helpers
    // ─────────────────────────────────────────────────────────────────────

    /// Authorize against the role stored now, not the one seen at login.
    /// A removed account can do nothing.
    fn check(&self, principal: &Principal, permission: Permission) -> DeskResult<()> {
        let current = self
            .users
            .principal(&principal.username)
            .ok_or(AuthzError::InvalidCredentials)?;
        authorize(&current, permission)?;
        Ok(())
    }

    /// The item's name as stored (lookups ignore case).
    fn stored_name(&self, name: &str) -> String {
        self.inventory
            .find(name)
            .map(|item| item.name.clone())
            .unwrap_or_else(|| name.trim().to_string())
    }

    fn commit_inventory<T>(
        &mut self,
        principal: &Principal,
        operation: &'static str,
        apply: impl FnOnce(&mut Inventory) -> DomainResult<T>,
    ) -> DeskResult<T> {
        let mut working = self.inventory.clone();
        let outcome = apply(&mut working).inspect_err(|e| {
            tracing::warn!(user = %principal.username, operation, error = %e, "rejected");
        })?;
        self.inventory_store.save(&working)?;
        self.inventory = working;
        tracing::debug!(user = %principal.username, operation, "inventory saved");
        Ok(outcome)
    }

    fn commit_users<T>(
        &mut self,
        principal: &Principal,
        operation: &'static str,
        apply: impl FnOnce(&mut UserDirectory) -> DomainResult<T>,
    ) -> DeskResult<T> {
        let mut working = self.users.clone();
        let outcome = apply(&mut working).inspect_err(|e| {
            tracing::warn!(user = %principal.username, operation, error = %e, "rejected");
        })?;
        self.save_users(principal, operation, working)?;
        Ok(outcome)
    }

    fn save_users(
        &mut self,
        principal: &Principal,
        operation: &'static str,
        working: UserDirectory,
    ) -> DeskResult<()> {
        self.user_store.save(&working)?;
        self.users = working;
        tracing::debug!(user = %principal.username, operation, "users saved");
        Ok(())
    }
}
