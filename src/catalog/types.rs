//! Catalog data types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A stored catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub name: String,
    /// Unit price in cents.
    pub price_cents: u64,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Payload for creating an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub price_cents: u64,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Price for a quantity of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub item_id: u64,
    pub quantity: u32,
    pub total_cents: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("item {0} not found")]
    NotFound(u64),
    #[error("invalid item: {0}")]
    Invalid(String),
    #[error("price overflow for quantity {0}")]
    PriceOverflow(u32),
}
