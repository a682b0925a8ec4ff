//! User Model

use serde::{Deserialize, Serialize};

/// Consumer role of a platform account
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Platform operator (storefront run by the platform itself)
    Operator,
    /// Independent seller
    Seller,
    Customer,
}

/// User entity (display projection — credentials live elsewhere)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub display_name: String,
    pub role: UserRole,
}
