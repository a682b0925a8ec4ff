//! Product Model

use serde::{Deserialize, Serialize};

/// Catalog product entity (read projection — catalog CRUD lives with the
/// catalog service, not here)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Category name (authoritative source for category attribution)
    pub category: String,
    /// Current listing price in currency unit — order items carry their
    /// own purchase-time snapshot
    pub price: f64,
    pub is_active: bool,
}
