//! Inventory value report.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Inventory, StockStatus};

/// How many items the "most valuable" list holds.
pub const TOP_ITEMS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryValue {
    pub category: String,
    pub value: f64,
    /// Share of the total value, 0-100. Zero when the total is zero.
    pub share_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopItem {
    pub name: String,
    pub value: f64,
    pub status: StockStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueReport {
    pub item_count: usize,
    pub category_count: usize,
    pub total_value: f64,
    pub healthy_value: f64,
    pub low_stock_value: f64,
    pub out_of_stock_value: f64,
    /// Highest value first; ties by category name.
    pub by_category: Vec<CategoryValue>,
    /// Highest value first; ties keep inventory order.
    pub top_items: Vec<TopItem>,
}

impl ValueReport {
    pub fn build(inventory: &Inventory) -> Self {
        let mut total_value = 0.0;
        let mut low_stock_value = 0.0;
        let mut out_of_stock_value = 0.0;
        let mut per_category: BTreeMap<&str, f64> = BTreeMap::new();

        for item in inventory.iter() {
            let value = item.value();
            total_value += value;
            match item.status() {
                StockStatus::OutOfStock => out_of_stock_value += value,
                StockStatus::Low => low_stock_value += value,
                StockStatus::Ok => {}
            }
            *per_category.entry(item.category.as_str()).or_default() += value;
        }

        let category_count = per_category.len();
        let mut by_category: Vec<CategoryValue> = per_category
            .into_iter()
            .map(|(category, value)| CategoryValue {
                category: category.to_string(),
                value,
                share_percent: if total_value > 0.0 {
                    value / total_value * 100.0
                } else {
                    0.0
                },
            })
            .collect();
        // Stable sort over name-ordered input keeps ties alphabetical.
        by_category.sort_by(|a, b| b.value.total_cmp(&a.value));

        let mut top_items: Vec<TopItem> = inventory
            .iter()
            .map(|item| TopItem {
                name: item.name.clone(),
                value: item.value(),
                status: item.status(),
            })
            .collect();
        top_items.sort_by(|a, b| b.value.total_cmp(&a.value));
        top_items.truncate(TOP_ITEMS);

        Self {
            item_count: inventory.len(),
            category_count,
            total_value,
            healthy_value: total_value - low_stock_value - out_of_stock_value,
            low_stock_value,
            out_of_stock_value,
            by_category,
            top_items,
        }
    }
}
