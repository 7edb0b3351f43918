//! Shared types for the Spire client
//!
//! Wire models for the sales order resource and the response envelopes used
//! by the API. Kept free of I/O so the same types serve the HTTP client and
//! any tooling that only needs to read or build payloads.

pub mod models;
pub mod response;

// Re-exports
pub use models::{
    Change, OrderAttributes, OrderField, OrderId, OrderItem, OrderStatus, Reference,
};
pub use response::ListResponse;
pub use serde_json::{Map, Value};
