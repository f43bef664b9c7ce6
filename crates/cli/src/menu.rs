//! Menus: which actions a role sees and how a typed choice maps to one.

use std::io::Write;

use thiserror::Error;

use stockroom_auth::{Permission, Role};

/// Anything that can be listed as a numbered menu entry.
pub trait MenuOption: Copy {
    fn label(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WelcomeAction {
    Login,
    Exit,
}

impl WelcomeAction {
    pub const ALL: [WelcomeAction; 2] = [WelcomeAction::Login, WelcomeAction::Exit];
}

impl MenuOption for WelcomeAction {
    fn label(&self) -> &'static str {
        match self {
            WelcomeAction::Login => "Login",
            WelcomeAction::Exit => "Exit",
        }
    }
}

/// Main menu entry. Everything except `Logout` and `Exit` is gated by a
/// [`Permission`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainAction {
    Perform(Permission),
    Logout,
    Exit,
}

impl MenuOption for MainAction {
    fn label(&self) -> &'static str {
        match self {
            MainAction::Perform(permission) => match permission {
                Permission::ViewInventory => "View inventory",
                Permission::SearchItems => "Search items",
                Permission::ViewItemDetails => "View item details",
                Permission::ViewLowStock => "View low stock items",
                Permission::AdjustQuantity => "Adjust quantity",
                Permission::ViewProfile => "View my profile",
                Permission::ChangeOwnPassword => "Change my password",
                Permission::AddItem => "Add item",
                Permission::RemoveItem => "Remove item",
                Permission::UpdatePrice => "Update price",
                Permission::ViewTransactions => "View transactions",
                Permission::ViewCategories => "View categories",
                Permission::ValueReport => "Inventory value report",
                Permission::ManageUsers => "Manage users",
            },
            MainAction::Logout => "Logout",
            MainAction::Exit => "Exit",
        }
    }
}

/// The main menu for `role`: its permitted actions in table order, then
/// Logout and Exit.
pub fn main_menu(role: Role) -> Vec<MainAction> {
    stockroom_auth::permissions_for(role)
        .into_iter()
        .map(MainAction::Perform)
        .chain([MainAction::Logout, MainAction::Exit])
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAdminAction {
    List,
    Add,
    ChangeRole,
    ResetPassword,
    Remove,
    Back,
}

impl UserAdminAction {
    pub const ALL: [UserAdminAction; 6] = [
        UserAdminAction::List,
        UserAdminAction::Add,
        UserAdminAction::ChangeRole,
        UserAdminAction::ResetPassword,
        UserAdminAction::Remove,
        UserAdminAction::Back,
    ];
}

impl MenuOption for UserAdminAction {
    fn label(&self) -> &'static str {
        match self {
            UserAdminAction::List => "List users",
            UserAdminAction::Add => "Add user",
            UserAdminAction::ChangeRole => "Change user role",
            UserAdminAction::ResetPassword => "Reset user password",
            UserAdminAction::Remove => "Remove user",
            UserAdminAction::Back => "Back",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("'{0}' is not a number, enter the number of a menu option")]
    NotANumber(String),

    #[error("choice {choice} is out of range, enter a number from 1 to {max}")]
    OutOfRange { choice: usize, max: usize },
}

/// Resolve a 1-based typed choice against `options`.
pub fn select<T: MenuOption>(options: &[T], input: &str) -> Result<T, SelectionError> {
    let input = input.trim();
    let choice: usize = input
        .parse()
        .map_err(|_| SelectionError::NotANumber(input.to_string()))?;
    choice
        .checked_sub(1)
        .and_then(|index| options.get(index))
        .copied()
        .ok_or(SelectionError::OutOfRange {
            choice,
            max: options.len(),
        })
}

pub fn render<T: MenuOption>(
    out: &mut impl Write,
    title: &str,
    options: &[T],
) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "=== {title} ===")?;
    for (index, option) in options.iter().enumerate() {
        writeln!(out, "{:>2}. {}", index + 1, option.label())?;
    }
    Ok(())
}
