use serde::{Deserialize, Serialize};

use crate::Role;

/// An action a session may be allowed to perform.
///
/// Names follow the "module.action" convention (e.g. "inventory.read").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewInventory,
    SearchItems,
    ViewItemDetails,
    ViewLowStock,
    AdjustQuantity,
    ViewProfile,
    ChangeOwnPassword,
    AddItem,
    RemoveItem,
    UpdatePrice,
    ViewTransactions,
    ViewCategories,
    ValueReport,
    ManageUsers,
}

impl Permission {
    pub const ALL: [Permission; 14] = [
        Permission::ViewInventory,
        Permission::SearchItems,
        Permission::ViewItemDetails,
        Permission::ViewLowStock,
        Permission::AdjustQuantity,
        Permission::ViewProfile,
        Permission::ChangeOwnPassword,
        Permission::AddItem,
        Permission::RemoveItem,
        Permission::UpdatePrice,
        Permission::ViewTransactions,
        Permission::ViewCategories,
        Permission::ValueReport,
        Permission::ManageUsers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ViewInventory => "inventory.read",
            Permission::SearchItems => "inventory.search",
            Permission::ViewItemDetails => "inventory.details",
            Permission::ViewLowStock => "inventory.low_stock",
            Permission::AdjustQuantity => "inventory.adjust",
            Permission::ViewProfile => "profile.read",
            Permission::ChangeOwnPassword => "profile.password",
            Permission::AddItem => "inventory.create",
            Permission::RemoveItem => "inventory.delete",
            Permission::UpdatePrice => "inventory.price",
            Permission::ViewTransactions => "journal.read",
            Permission::ViewCategories => "inventory.categories",
            Permission::ValueReport => "reports.value",
            Permission::ManageUsers => "admin.users",
        }
    }

    /// The least privileged role that holds this permission.
    pub fn minimum_role(self) -> Role {
        match self {
            Permission::ViewInventory
            | Permission::SearchItems
            | Permission::ViewItemDetails
            | Permission::ViewLowStock
            | Permission::AdjustQuantity
            | Permission::ViewProfile
            | Permission::ChangeOwnPassword => Role::Staff,
            Permission::AddItem
            | Permission::RemoveItem
            | Permission::UpdatePrice
            | Permission::ViewTransactions
            | Permission::ViewCategories
            | Permission::ValueReport => Role::Manager,
            Permission::ManageUsers => Role::Admin,
        }
    }

    pub fn granted_to(self, role: Role) -> bool {
        role.at_least(self.minimum_role())
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role -> permission mapping, in `Permission::ALL` order.
pub fn permissions_for(role: Role) -> Vec<Permission> {
    Permission::ALL
        .into_iter()
        .filter(|p| p.granted_to(role))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_can_view_and_adjust_only() {
        let perms = permissions_for(Role::Staff);
        assert!(perms.contains(&Permission::ViewInventory));
        assert!(perms.contains(&Permission::AdjustQuantity));
        assert!(!perms.contains(&Permission::AddItem));
        assert!(!perms.contains(&Permission::RemoveItem));
        assert!(!perms.contains(&Permission::ManageUsers));
    }

    #[test]
    fn manager_adds_and_removes_but_does_not_manage_users() {
        let perms = permissions_for(Role::Manager);
        assert!(perms.contains(&Permission::AddItem));
        assert!(perms.contains(&Permission::RemoveItem));
        assert!(perms.contains(&Permission::UpdatePrice));
        assert!(!perms.contains(&Permission::ManageUsers));
    }

    #[test]
    fn admin_holds_everything() {
        assert_eq!(permissions_for(Role::Admin).len(), Permission::ALL.len());
    }

    #[test]
    fn higher_roles_are_supersets() {
        for p in permissions_for(Role::Staff) {
            assert!(p.granted_to(Role::Manager));
        }
        for p in permissions_for(Role::Manager) {
            assert!(p.granted_to(Role::Admin));
        }
    }
}
