//! Data models
//!
//! Wire-level types for the sales order resource. No I/O happens here.

pub mod fields;
pub mod order;

// Re-exports
pub use fields::{Change, OrderAttributes, OrderField, changes, diff, lookup};
pub use order::{InvalidStatus, OrderId, OrderItem, OrderStatus, Reference};
