//! The interactive session: welcome menu, login, role-filtered main menu.
//!
//! ```text
//! welcome ──Login──▶ login (3 attempts) ──▶ main menu ◀─┐
//!    ▲                      │                   │        │ action
//!    └──────────────────────┘◀──Logout──────────┴────────┘
//! ```
//!
//! Every action re-checks the session's permission before it runs, and the
//! session is re-read from the user directory after each one, so a changed
//! role takes effect on the next menu. Domain and authorization failures are
//! printed and the menu is shown again; a failed save ends the session with
//! [`ShellError::Store`].

use std::io::{BufRead, Write};

use stockroom_auth::{authorize, Permission, Principal, Role, UserDirectory};
use stockroom_infra::{Desk, DeskError, DocumentStore};
use stockroom_inventory::{Inventory, NewItem, DEFAULT_CATEGORY, DEFAULT_REORDER_LEVEL};

use crate::error::{ShellError, ShellResult};
use crate::menu::{self, MainAction, UserAdminAction, WelcomeAction};
use crate::prompt::{parse_count, parse_delta, parse_limit, parse_price, Prompter};
use crate::render::{self, money};

pub const MAX_LOGIN_ATTEMPTS: u32 = 3;

/// Transactions shown when the user just presses enter.
pub const DEFAULT_TRANSACTION_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    Logout,
    Exit,
}

pub struct Shell<'d, R, W, U, I> {
    desk: &'d mut Desk<U, I>,
    io: Prompter<R, W>,
}

/// Print a recoverable desk error. Store failures end the session instead.
fn report<R: BufRead, W: Write>(io: &mut Prompter<R, W>, err: DeskError) -> ShellResult<()> {
    match err {
        DeskError::Store(e) => Err(e.into()),
        other => io.error(&other.to_string()),
    }
}

fn parse_role(raw: &str) -> Result<Role, String> {
    raw.parse::<Role>().map_err(|e| e.to_string())
}

impl<'d, R, W, U, I> Shell<'d, R, W, U, I>
where
    R: BufRead,
    W: Write,
    U: DocumentStore<UserDirectory>,
    I: DocumentStore<Inventory>,
{
    pub fn new(desk: &'d mut Desk<U, I>, input: R, output: W) -> Self {
        Self {
            desk,
            io: Prompter::new(input, output),
        }
    }

    /// Run until the user exits or input ends.
    pub fn run(&mut self) -> ShellResult<()> {
        match self.welcome() {
            Err(ShellError::InputClosed) => {
                tracing::debug!("input closed");
                self.io.say("Goodbye!")
            }
            other => other,
        }
    }

    fn welcome(&mut self) -> ShellResult<()> {
        loop {
            menu::render(self.io.out(), "Stockroom Inventory", &WelcomeAction::ALL)?;
            let choice = self.io.line("Enter your choice: ")?;
            match menu::select(&WelcomeAction::ALL, &choice) {
                Ok(WelcomeAction::Login) => {
                    if let Some(principal) = self.login()? {
                        if self.session(&principal)? == SessionEnd::Exit {
                            break;
                        }
                    }
                }
                Ok(WelcomeAction::Exit) => break,
                Err(e) => self.io.error(&e.to_string())?,
            }
        }
        self.io.say("Goodbye!")
    }

    fn login(&mut self) -> ShellResult<Option<Principal>> {
        for attempt in 1..=MAX_LOGIN_ATTEMPTS {
            let username = self.io.line("Username: ")?;
            let password = self.io.secret("Password: ")?;
            match self.desk.authenticate(&username, &password) {
                Ok(principal) => {
                    self.io.success(&format!(
                        "Welcome, {} ({})",
                        principal.full_name, principal.role
                    ))?;
                    return Ok(Some(principal));
                }
                Err(e) => {
                    let left = MAX_LOGIN_ATTEMPTS - attempt;
                    if left > 0 {
                        self.io.error(&format!("{e}, {left} attempt(s) remaining"))?;
                    }
                }
            }
        }
        self.io.error("Too many failed login attempts")?;
        Ok(None)
    }

    fn session(&mut self, principal: &Principal) -> ShellResult<SessionEnd> {
        let mut principal = principal.clone();
        let mut actions = menu::main_menu(principal.role);
        loop {
            let title = format!("Main Menu - {} ({})", principal.full_name, principal.role);
            menu::render(self.io.out(), &title, &actions)?;
            let choice = self.io.line("Enter your choice: ")?;
            match menu::select(&actions, &choice) {
                Ok(MainAction::Perform(permission)) => {
                    self.perform(&principal, permission)?;
                    let Some(current) = self.desk.users().principal(&principal.username) else {
                        tracing::info!(user = %principal.username, "account removed, logout");
                        self.io.warning("Your account no longer exists, logging out")?;
                        return Ok(SessionEnd::Logout);
                    };
                    if current.role != principal.role {
                        tracing::info!(
                            user = %current.username,
                            role = %current.role,
                            "role changed"
                        );
                        self.io.warning(&format!("Your role is now {}", current.role))?;
                        actions = menu::main_menu(current.role);
                    }
                    principal = current;
                }
                Ok(MainAction::Logout) => {
                    tracing::info!(user = %principal.username, "logout");
                    self.io.say(&format!("Logged out {}", principal.username))?;
                    return Ok(SessionEnd::Logout);
                }
                Ok(MainAction::Exit) => return Ok(SessionEnd::Exit),
                Err(e) => self.io.error(&e.to_string())?,
            }
        }
    }

    fn perform(&mut self, principal: &Principal, permission: Permission) -> ShellResult<()> {
        if let Err(e) = authorize(principal, permission) {
            return self.io.error(&e.to_string());
        }
        tracing::debug!(user = %principal.username, action = %permission, "dispatch");
        match permission {
            Permission::ViewInventory => self.view_inventory(),
            Permission::SearchItems => self.search_items(),
            Permission::ViewItemDetails => self.view_item_details(),
            Permission::ViewLowStock => self.view_low_stock(),
            Permission::AdjustQuantity => self.adjust_quantity(principal),
            Permission::ViewProfile => Ok(render::profile(self.io.out(), principal)?),
            Permission::ChangeOwnPassword => self.change_own_password(principal),
            Permission::AddItem => self.add_item(principal),
            Permission::RemoveItem => self.remove_item(principal),
            Permission::UpdatePrice => self.update_price(principal),
            Permission::ViewTransactions => self.view_transactions(principal),
            Permission::ViewCategories => self.view_categories(),
            Permission::ValueReport => self.value_report(principal),
            Permission::ManageUsers => self.manage_users(principal),
        }
    }

    fn cancelled(&mut self) -> ShellResult<()> {
        self.io.say("Cancelled.")
    }

    /// List the items and let the user pick one by number or name.
    fn choose_item(&mut self, verb: &str) -> ShellResult<Option<String>> {
        if self.desk.inventory().is_empty() {
            self.io.say("No items in inventory.")?;
            return Ok(None);
        }
        for (index, item) in self.desk.inventory().iter().enumerate() {
            writeln!(
                self.io.out(),
                "{:>3}. {} ({} in stock)",
                index + 1,
                item.name,
                item.quantity
            )?;
        }

        let answer = self
            .io
            .line(&format!("Item to {verb} (number or name, blank to cancel): "))?;
        if answer.is_empty() {
            return Ok(None);
        }

        let inventory = self.desk.inventory();
        let picked = answer
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| inventory.items().get(index))
            .or_else(|| inventory.find(&answer))
            .map(|item| item.name.clone());
        if picked.is_none() {
            self.io.error(&format!("No item matches '{answer}'"))?;
        }
        Ok(picked)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Inventory actions
    // ─────────────────────────────────────────────────────────────────────

    fn view_inventory(&mut self) -> ShellResult<()> {
        if self.desk.inventory().is_empty() {
            return self.io.say("No items in inventory.");
        }
        Ok(render::item_table(self.io.out(), self.desk.inventory().iter())?)
    }

    fn search_items(&mut self) -> ShellResult<()> {
        let term = self.io.line("Search term (name or category): ")?;
        if term.is_empty() {
            return self.cancelled();
        }
        let found = self.desk.inventory().search(&term);
        if found.is_empty() {
            return self.io.say(&format!("No items match '{term}'."));
        }
        Ok(render::item_table(self.io.out(), found)?)
    }

    fn view_item_details(&mut self) -> ShellResult<()> {
        let Some(name) = self.choose_item("view")? else {
            return Ok(());
        };
        if let Some(item) = self.desk.inventory().find(&name) {
            render::item_details(self.io.out(), item)?;
        }
        Ok(())
    }

    fn view_low_stock(&mut self) -> ShellResult<()> {
        let low = self.desk.inventory().low_stock();
        if low.is_empty() {
            return self.io.say("No items at or below their reorder level.");
        }
        self.io.warning(&format!("{} item(s) need restocking", low.len()))?;
        Ok(render::item_table(self.io.out(), low)?)
    }

    fn adjust_quantity(&mut self, principal: &Principal) -> ShellResult<()> {
        let Some(name) = self.choose_item("adjust")? else {
            return Ok(());
        };
        let current = self.desk.inventory().find(&name).map_or(0, |item| item.quantity);
        self.io.say(&format!("Current quantity of '{name}': {current}"))?;

        let Some(delta) = self
            .io
            .ask("Quantity change (+N to add, -N to deduct): ", parse_delta)?
        else {
            return self.cancelled();
        };
        let mut reason = self.io.line("Reason (blank for default): ")?;
        if reason.is_empty() {
            reason = if delta > 0 { "Restock" } else { "Sale" }.to_string();
        }

        match self.desk.adjust_quantity(principal, &name, delta, &reason) {
            Ok(adjustment) => {
                self.io.success(&format!(
                    "Quantity of '{name}' changed from {} to {}",
                    adjustment.previous, adjustment.quantity
                ))?;
                if adjustment.low_stock {
                    let level = self
                        .desk
                        .inventory()
                        .find(&name)
                        .map_or(DEFAULT_REORDER_LEVEL, |item| item.reorder_level);
                    self.io.warning(&format!(
                        "Low stock: '{name}' is at {} (reorder level {level})",
                        adjustment.quantity
                    ))?;
                }
                Ok(())
            }
            Err(e) => report(&mut self.io, e),
        }
    }

    fn add_item(&mut self, principal: &Principal) -> ShellResult<()> {
        let name = self.io.line("Item name (blank to cancel): ")?;
        if name.is_empty() {
            return self.cancelled();
        }
        if let Some(existing) = self.desk.inventory().find(&name) {
            let msg = format!("Item '{}' already exists", existing.name);
            return self.io.error(&msg);
        }

        let category = self
            .io
            .line(&format!("Category (blank for {DEFAULT_CATEGORY}): "))?;
        let Some(price) = self.io.ask("Unit price: ", parse_price)? else {
            return self.cancelled();
        };
        let Some(quantity) = self.io.ask("Initial quantity: ", parse_count)? else {
            return self.cancelled();
        };
        let reorder_level = self.io.ask_or(
            &format!("Reorder level (blank for {DEFAULT_REORDER_LEVEL}): "),
            DEFAULT_REORDER_LEVEL,
            parse_count,
        )?;

        let mut new = NewItem::new(name, quantity, price).with_reorder_level(reorder_level);
        if !category.is_empty() {
            new = new.with_category(category);
        }
        match self.desk.add_item(principal, new) {
            Ok(item) => self.io.success(&format!(
                "Added '{}': {} at {} each",
                item.name,
                item.quantity,
                money(item.price)
            )),
            Err(e) => report(&mut self.io, e),
        }
    }

    fn remove_item(&mut self, principal: &Principal) -> ShellResult<()> {
        let Some(name) = self.choose_item("remove")? else {
            return Ok(());
        };
        if let Some(item) = self.desk.inventory().find(&name) {
            render::item_details(self.io.out(), item)?;
        }

        let typed = self
            .io
            .line(&format!("Type the item name ({name}) to confirm removal: "))?;
        if typed.to_lowercase() != name.to_lowercase() {
            return self.io.say("Name did not match, removal cancelled.");
        }
        match self.desk.remove_item(principal, &name) {
            Ok(item) => self.io.success(&format!("Removed '{}'", item.name)),
            Err(e) => report(&mut self.io, e),
        }
    }

    fn update_price(&mut self, principal: &Principal) -> ShellResult<()> {
        let Some(name) = self.choose_item("reprice")? else {
            return Ok(());
        };
        if let Some(item) = self.desk.inventory().find(&name) {
            let msg = format!("Current price of '{}': {}", item.name, money(item.price));
            self.io.say(&msg)?;
        }
        let Some(price) = self.io.ask("New unit price: ", parse_price)? else {
            return self.cancelled();
        };
        match self.desk.update_price(principal, &name, price) {
            Ok(change) => self.io.success(&format!(
                "Price of '{name}' changed from {} to {}",
                money(change.previous),
                money(change.price)
            )),
            Err(e) => report(&mut self.io, e),
        }
    }

    fn view_transactions(&mut self, principal: &Principal) -> ShellResult<()> {
        let limit = self.io.ask_or(
            &format!("How many recent transactions? (blank for {DEFAULT_TRANSACTION_LIMIT}): "),
            DEFAULT_TRANSACTION_LIMIT,
            parse_limit,
        )?;
        match self.desk.transactions(principal, limit) {
            Ok(entries) if entries.is_empty() => {
                self.io.say("No transactions recorded in this session.")
            }
            Ok(entries) => Ok(render::transactions(self.io.out(), &entries)?),
            Err(e) => report(&mut self.io, e),
        }
    }

    fn view_categories(&mut self) -> ShellResult<()> {
        let names = self.desk.inventory().categories();
        if names.is_empty() {
            return self.io.say("No categories yet.");
        }
        Ok(render::categories(self.io.out(), &names)?)
    }

    fn value_report(&mut self, principal: &Principal) -> ShellResult<()> {
        match self.desk.value_report(principal) {
            Ok(summary) => Ok(render::value_report(self.io.out(), &summary)?),
            Err(e) => report(&mut self.io, e),
        }
    }

    fn change_own_password(&mut self, principal: &Principal) -> ShellResult<()> {
        let current = self.io.secret("Current password: ")?;
        let new_password = self.io.secret("New password: ")?;
        let confirm = self.io.secret("Confirm new password: ")?;
        if new_password != confirm {
            return self.io.error("New passwords do not match");
        }
        match self.desk.change_own_password(principal, &current, &new_password) {
            Ok(()) => self.io.success("Password changed"),
            Err(e) => report(&mut self.io, e),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // User administration
    // ─────────────────────────────────────────────────────────────────────

    fn manage_users(&mut self, principal: &Principal) -> ShellResult<()> {
        loop {
            menu::render(self.io.out(), "Manage Users", &UserAdminAction::ALL)?;
            let choice = self.io.line("Enter your choice: ")?;
            let action = match menu::select(&UserAdminAction::ALL, &choice) {
                Ok(action) => action,
                Err(e) => {
                    self.io.error(&e.to_string())?;
                    continue;
                }
            };
            match action {
                UserAdminAction::List => render::users(self.io.out(), self.desk.users())?,
                UserAdminAction::Add => self.add_user(principal)?,
                UserAdminAction::ChangeRole => self.change_role(principal)?,
                UserAdminAction::ResetPassword => self.reset_password(principal)?,
                UserAdminAction::Remove => self.remove_user(principal)?,
                UserAdminAction::Back => return Ok(()),
            }
            let still_admin = self
                .desk
                .users()
                .principal(&principal.username)
                .is_some_and(|current| current.can(Permission::ManageUsers));
            if !still_admin {
                return Ok(());
            }
        }
    }

    fn add_user(&mut self, principal: &Principal) -> ShellResult<()> {
        let username = self.io.line("New username (blank to cancel): ")?;
        if username.is_empty() {
            return self.cancelled();
        }
        let full_name = self.io.line("Full name (blank to use the username): ")?;
        let password = self.io.secret("Password: ")?;
        let Some(role) = self.io.ask("Role (admin/manager/staff): ", parse_role)? else {
            return self.cancelled();
        };
        match self
            .desk
            .add_user(principal, &username, &full_name, &password, role)
        {
            Ok(()) => self.io.success(&format!("Added {role} '{username}'")),
            Err(e) => report(&mut self.io, e),
        }
    }

    fn change_role(&mut self, principal: &Principal) -> ShellResult<()> {
        let username = self.io.line("Username (blank to cancel): ")?;
        if username.is_empty() {
            return self.cancelled();
        }
        let Some(role) = self.io.ask("New role (admin/manager/staff): ", parse_role)? else {
            return self.cancelled();
        };
        match self.desk.set_role(principal, &username, role) {
            Ok(()) => self.io.success(&format!("'{username}' is now {role}")),
            Err(e) => report(&mut self.io, e),
        }
    }

    fn reset_password(&mut self, principal: &Principal) -> ShellResult<()> {
        let username = self.io.line("Username (blank to cancel): ")?;
        if username.is_empty() {
            return self.cancelled();
        }
        let password = self.io.secret("New password: ")?;
        match self.desk.reset_password(principal, &username, &password) {
            Ok(()) => self.io.success(&format!("Password reset for '{username}'")),
            Err(e) => report(&mut self.io, e),
        }
    }

    fn remove_user(&mut self, principal: &Principal) -> ShellResult<()> {
        let username = self.io.line("Username to remove (blank to cancel): ")?;
        if username.is_empty() {
            return self.cancelled();
        }
        if !self.io.confirm(&format!("Remove user '{username}'? (y/n): "))? {
            return self.cancelled();
        }
        match self.desk.remove_user(principal, &username) {
            Ok(account) => self
                .io
                .success(&format!("Removed {} '{username}'", account.role)),
            Err(e) => report(&mut self.io, e),
        }
    }
}
