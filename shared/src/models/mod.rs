//! Data models shared across consumer roles

pub mod order;
pub mod product;
pub mod user;

pub use order::{Order, OrderItem, OrderStatus};
pub use product::Product;
pub use user::{User, UserRole};
