//! Shared types for the fulfillment platform
//!
//! Data models used by both consumer roles (operator console and seller
//! console), plus small time/id utilities. Engines live in
//! `fulfillment-core`; this crate stays dependency-light so client
//! surfaces can embed it directly.

pub mod models;
pub mod util;

// Re-exports
pub use models::{Order, OrderItem, OrderStatus, Product, User, UserRole};
pub use serde::{Deserialize, Serialize};
