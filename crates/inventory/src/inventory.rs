//! The inventory collection and its mutation rules.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult};

use crate::item::{validate_price, InventoryItem, NewItem};

/// All items, in insertion order. Serializes as a JSON array.
///
/// # Invariants
/// - Names are unique (compared case-insensitively, ignoring surrounding
///   whitespace).
/// - No operation leaves a quantity negative; rejected operations leave the
///   collection unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    items: Vec<InventoryItem>,
}

/// Outcome of a successful quantity adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjustment {
    pub previous: u64,
    pub quantity: u64,
    pub delta: i64,
    /// The new quantity is at or below the item's reorder level.
    pub low_stock: bool,
}

/// Outcome of a successful price update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceChange {
    pub previous: f64,
    pub price: f64,
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check loaded records: field rules and name uniqueness.
    pub fn validate(&self) -> DomainResult<()> {
        for (idx, item) in self.items.iter().enumerate() {
            item.validate()
                .map_err(|e| DomainError::validation(format!("item #{}: {e}", idx + 1)))?;
            if self.items[..idx].iter().any(|other| same_name(&other.name, &item.name)) {
                return Err(DomainError::validation(format!(
                    "duplicate item name '{}'",
                    item.name
                )));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &InventoryItem> {
        self.items.iter()
    }

    pub fn find(&self, name: &str) -> Option<&InventoryItem> {
        self.items.iter().find(|item| same_name(&item.name, name))
    }

    fn position(&self, name: &str) -> DomainResult<usize> {
        self.items
            .iter()
            .position(|item| same_name(&item.name, name))
            .ok_or_else(|| DomainError::not_found(format!("item '{}'", name.trim())))
    }

    /// Append a new item. Duplicate names are a validation error.
    pub fn add(
        &mut self,
        new: NewItem,
        actor: &str,
        at: DateTime<Utc>,
    ) -> DomainResult<&InventoryItem> {
        let item = new.into_item(actor, at)?;
        if self.find(&item.name).is_some() {
            return Err(DomainError::validation(format!(
                "item '{}' already exists",
                item.name
            )));
        }
        self.items.push(item);
        let idx = self.items.len() - 1;
        Ok(&self.items[idx])
    }

    pub fn remove(&mut self, name: &str) -> DomainResult<InventoryItem> {
        let idx = self.position(name)?;
        Ok(self.items.remove(idx))
    }

    /// Add `delta` (negative to deduct) to an item's quantity.
    pub fn adjust_quantity(
        &mut self,
        name: &str,
        delta: i64,
        actor: &str,
        at: DateTime<Utc>,
    ) -> DomainResult<Adjustment> {
        let idx = self.position(name)?;
        if delta == 0 {
            return Err(DomainError::validation("quantity change cannot be zero"));
        }

        let item = &mut self.items[idx];
        let previous = item.quantity;
        let quantity = previous.checked_add_signed(delta).ok_or_else(|| {
            if delta < 0 {
                DomainError::validation(format!(
                    "cannot deduct {} from '{}': only {previous} in stock",
                    delta.unsigned_abs(),
                    item.name
                ))
            } else {
                DomainError::validation("quantity would overflow")
            }
        })?;

        item.quantity = quantity;
        item.touch(actor, at);

        Ok(Adjustment {
            previous,
            quantity,
            delta,
            low_stock: item.is_low_stock(),
        })
    }

    pub fn update_price(
        &mut self,
        name: &str,
        price: f64,
        actor: &str,
        at: DateTime<Utc>,
    ) -> DomainResult<PriceChange> {
        let idx = self.position(name)?;
        validate_price(price)?;

        let item = &mut self.items[idx];
        let previous = item.price;
        item.price = price;
        item.touch(actor, at);

        Ok(PriceChange { previous, price })
    }

    /// Case-insensitive substring match on name or category.
    pub fn search(&self, term: &str) -> Vec<&InventoryItem> {
        let term = term.trim().to_lowercase();
        self.items
            .iter()
            .filter(|item| {
                item.name.to_lowercase().contains(&term)
                    || item.category.to_lowercase().contains(&term)
            })
            .collect()
    }

    pub fn low_stock(&self) -> Vec<&InventoryItem> {
        self.items.iter().filter(|item| item.is_low_stock()).collect()
    }

    /// Distinct categories, sorted.
    pub fn categories(&self) -> Vec<&str> {
        self.items
            .iter()
            .map(|item| item.category.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn total_value(&self) -> f64 {
        self.items.iter().map(InventoryItem::value).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn stocked() -> Inventory {
        let mut inv = Inventory::new();
        inv.add(NewItem::new("widget", 10, 2.50).with_category("Parts"), "admin", now())
            .unwrap();
        inv.add(NewItem::new("gadget", 3, 10.0).with_category("Tools"), "admin", now())
            .unwrap();
        inv
    }

    #[test]
    fn add_rejects_duplicate_names() {
        let mut inv = stocked();
        let err = inv
            .add(NewItem::new("  Widget ", 1, 1.0), "admin", now())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(inv.len(), 2);
    }

    #[test]
    fn add_then_remove_restores_prior_state() {
        let mut inv = stocked();
        let before = inv.clone();
        inv.add(NewItem::new("sprocket", 4, 0.75), "manager", now()).unwrap();
        let removed = inv.remove("sprocket").unwrap();
        assert_eq!(removed.name, "sprocket");
        assert_eq!(inv, before);
    }

    #[test]
    fn remove_missing_is_not_found() {
        let mut inv = stocked();
        assert!(matches!(inv.remove("nothing"), Err(DomainError::NotFound(_))));
    }

    #[test]
    fn adjust_quantity_applies_delta() {
        let mut inv = stocked();
        let adj = inv.adjust_quantity("widget", -3, "staff", now()).unwrap();
        assert_eq!(adj.previous, 10);
        assert_eq!(adj.quantity, 7);
        assert!(!adj.low_stock);
        let item = inv.find("widget").unwrap();
        assert_eq!(item.quantity, 7);
        assert_eq!(item.updated_by.as_deref(), Some("staff"));
    }

    #[test]
    fn adjust_quantity_below_zero_is_rejected_and_unchanged() {
        let mut inv = stocked();
        let err = inv.adjust_quantity("gadget", -4, "staff", now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(err.to_string().contains("only 3 in stock"));
        assert_eq!(inv.find("gadget").unwrap().quantity, 3);
        assert!(inv.find("gadget").unwrap().updated_at.is_none());
    }

    #[test]
    fn adjust_quantity_rejects_zero_and_missing() {
        let mut inv = stocked();
        assert!(matches!(
            inv.adjust_quantity("widget", 0, "staff", now()),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            inv.adjust_quantity("nope", 1, "staff", now()),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn adjust_to_reorder_level_flags_low_stock() {
        let mut inv = stocked();
        let adj = inv.adjust_quantity("widget", -5, "staff", now()).unwrap();
        assert!(adj.low_stock);
    }

    #[test]
    fn update_price_validates() {
        let mut inv = stocked();
        let change = inv.update_price("widget", 3.0, "manager", now()).unwrap();
        assert_eq!(change.previous, 2.50);
        assert_eq!(inv.find("widget").unwrap().price, 3.0);
        assert!(inv.update_price("widget", -1.0, "manager", now()).is_err());
        assert_eq!(inv.find("widget").unwrap().price, 3.0);
    }

    #[test]
    fn search_matches_name_or_category() {
        let inv = stocked();
        let names = |term: &str| -> Vec<String> {
            inv.search(term).iter().map(|i| i.name.clone()).collect()
        };
        assert_eq!(names("WID"), vec!["widget"]);
        assert_eq!(names("tools"), vec!["gadget"]);
        assert_eq!(names("dget"), vec!["widget", "gadget"]);
        assert!(names("zzz").is_empty());
    }

    #[test]
    fn low_stock_and_categories() {
        let inv = stocked();
        let low: Vec<_> = inv.low_stock().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(low, vec!["gadget"]);
        assert_eq!(inv.categories(), vec!["Parts", "Tools"]);
        assert!((inv.total_value() - 55.0).abs() < 1e-9);
    }

    #[test]
    fn loads_as_plain_array() {
        let inv: Inventory = serde_json::from_str(
            r#"[{"name": "widget", "quantity": 10, "price": 2.5}]"#,
        )
        .unwrap();
        assert_eq!(inv.len(), 1);
        assert!(inv.validate().is_ok());
        assert_eq!(serde_json::to_value(Inventory::new()).unwrap(), serde_json::json!([]));
    }

    #[test]
    fn validate_rejects_case_insensitive_duplicates() {
        let inv: Inventory = serde_json::from_str(
            r#"[{"name": "a", "quantity": 1, "price": 1}, {"name": "A", "quantity": 2, "price": 1}]"#,
        )
        .unwrap();
        assert!(inv.validate().is_err());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: quantities never go negative; rejected deltas change nothing.
            #[test]
            fn quantity_never_negative(
                start in 0u64..1_000,
                deltas in proptest::collection::vec(-500i64..500, 1..40)
            ) {
                let mut inv = Inventory::new();
                inv.add(NewItem::new("widget", start, 1.0), "staff", Utc::now()).unwrap();

                let mut expected = start;
                for delta in deltas {
                    let before = inv.clone();
                    match inv.adjust_quantity("widget", delta, "staff", Utc::now()) {
                        Ok(adj) => {
                            expected = expected.checked_add_signed(delta).unwrap();
                            prop_assert_eq!(adj.quantity, expected);
                        }
                        Err(_) => {
                            prop_assert!(delta == 0 || (expected as i128 + delta as i128) < 0);
                            prop_assert_eq!(&inv, &before);
                        }
                    }
                    prop_assert_eq!(inv.find("widget").unwrap().quantity, expected);
                }
            }

            /// Property: add followed by remove is the identity.
            #[test]
            fn add_remove_roundtrip(
                name in "[a-z][a-z0-9]{0,15}",
                quantity in 0u64..10_000,
                cents in 0u32..100_000
            ) {
                let mut inv = Inventory::new();
                inv.add(NewItem::new("existing", 1, 1.0), "admin", Utc::now()).unwrap();
                prop_assume!(name != "existing");
                let before = inv.clone();

                let new = NewItem::new(name.clone(), quantity, cents as f64 / 100.0);
                inv.add(new, "admin", Utc::now()).unwrap();
                inv.remove(&name).unwrap();

                prop_assert_eq!(inv, before);
            }
        }
    }
}
