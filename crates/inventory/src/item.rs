use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult};

pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_REORDER_LEVEL: u64 = 5;

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_reorder_level() -> u64 {
    DEFAULT_REORDER_LEVEL
}

/// A named inventory record.
///
/// Only `name`, `quantity` and `price` are required in the file; the rest
/// default so that minimal records load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    pub quantity: u64,
    pub price: f64,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_reorder_level")]
    pub reorder_level: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

/// Stock health relative to the reorder level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Ok,
    Low,
    OutOfStock,
}

impl StockStatus {
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::Ok => "OK",
            StockStatus::Low => "LOW STOCK",
            StockStatus::OutOfStock => "OUT OF STOCK",
        }
    }
}

impl InventoryItem {
    /// `price * quantity`.
    pub fn value(&self) -> f64 {
        self.price * self.quantity as f64
    }

    pub fn status(&self) -> StockStatus {
        if self.quantity == 0 {
            StockStatus::OutOfStock
        } else if self.quantity <= self.reorder_level {
            StockStatus::Low
        } else {
            StockStatus::Ok
        }
    }

    /// At or below the reorder level (out of stock included).
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.reorder_level
    }

    pub(crate) fn touch(&mut self, actor: &str, at: DateTime<Utc>) {
        self.updated_at = Some(at);
        self.updated_by = Some(actor.to_string());
    }

    /// Check the field-level rules a loaded record must satisfy.
    pub fn validate(&self) -> DomainResult<()> {
        validate_name(&self.name)?;
        validate_price(self.price)
    }
}

/// Input for adding an item.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub quantity: u64,
    pub price: f64,
    pub category: Option<String>,
    pub reorder_level: Option<u64>,
}

impl NewItem {
    pub fn new(name: impl Into<String>, quantity: u64, price: f64) -> Self {
        Self {
            name: name.into(),
            quantity,
            price,
            category: None,
            reorder_level: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_reorder_level(mut self, level: u64) -> Self {
        self.reorder_level = Some(level);
        self
    }

    pub(crate) fn into_item(self, actor: &str, at: DateTime<Utc>) -> DomainResult<InventoryItem> {
        let name = self.name.trim().to_string();
        validate_name(&name)?;
        validate_price(self.price)?;

        let category = self
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(default_category);

        Ok(InventoryItem {
            name,
            quantity: self.quantity,
            price: self.price,
            category,
            reorder_level: self.reorder_level.unwrap_or(DEFAULT_REORDER_LEVEL),
            added_at: Some(at),
            added_by: Some(actor.to_string()),
            updated_at: None,
            updated_by: None,
        })
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    Ok(())
}

pub(crate) fn validate_price(price: f64) -> DomainResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(DomainError::validation(format!(
            "price must be a non-negative number (got {price})"
        )));
    }
    Ok(())
}
