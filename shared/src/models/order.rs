//! Order Model
//!
//! Wire types nested inside a sales order: identifiers, status, references to
//! other records (customer, addresses, inventory) and line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Server-assigned order identifier
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl OrderId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for OrderId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Order status, transmitted as a small integer (0/1/2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum OrderStatus {
    #[default]
    Active = 0,
    OnHold = 1,
    Inactive = 2,
}

/// Status code outside of 0..=2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid order status: {0}")]
pub struct InvalidStatus(pub u8);

impl From<OrderStatus> for u8 {
    fn from(status: OrderStatus) -> Self {
        status as u8
    }
}

impl TryFrom<u8> for OrderStatus {
    type Error = InvalidStatus;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(OrderStatus::Active),
            1 => Ok(OrderStatus::OnHold),
            2 => Ok(OrderStatus::Inactive),
            other => Err(InvalidStatus(other)),
        }
    }
}

/// Reference to another record (customer, address, inventory item).
///
/// Only `id` is interpreted; whatever else the server sends alongside it is
/// kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Reference {
    pub fn new(id: u64) -> Self {
        Self {
            id: Some(id),
            extra: Map::new(),
        }
    }
}

/// Order line item
///
/// A line either points at an inventory record or, when it only carries a
/// description and comment, becomes a free-text comment line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_qty: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OrderItem {
    /// Line for an inventory item
    pub fn inventory(inventory_id: u64) -> Self {
        Self {
            inventory: Some(Reference::new(inventory_id)),
            ..Self::default()
        }
    }

    /// Free-text comment line
    pub fn comment(description: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            comment: Some(comment.into()),
            ..Self::default()
        }
    }

    /// Set the ordered quantity
    pub fn with_qty(mut self, qty: Decimal) -> Self {
        self.order_qty = Some(qty);
        self
    }

    pub fn is_comment(&self) -> bool {
        self.inventory.is_none() && self.comment.is_some()
    }
}
