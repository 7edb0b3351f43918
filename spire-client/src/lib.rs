//! Spire Client - HTTP client for the Spire sales API
//!
//! Typed sales order resource with change tracking, backed by a pluggable
//! HTTP transport. The transport is always passed in explicitly.

pub mod config;
pub mod error;
pub mod http;
pub mod mock;
pub mod order;
pub mod resource;

pub use config::ClientConfig;
pub use error::{ErrorKind, SpireError, SpireResult};
pub use http::{HttpClient, NetworkHttpClient};
pub use order::{DEFAULT_BACKGROUND_COLOR, ORDERS_PATH, Order};
pub use resource::Resource;

// Re-export shared types for convenience
pub use spire_shared::{
    Change, ListResponse, OrderAttributes, OrderField, OrderId, OrderItem, OrderStatus, Reference,
};
