//! Order Model
//!
//! The central fulfillment entity. All timestamps are Unix millis (`i64`);
//! date → millis conversion happens at the caller boundary, engines only
//! ever see `i64`.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// Order lifecycle status
///
/// Forward chain: PENDING → CONFIRMED → PACKED → SHIPPING → DELIVERED.
/// COMPLETED is a terminal alias of DELIVERED for revenue purposes
/// (legacy rows archived by the old checkout flow carry it).
/// CANCELLED is reachable from PENDING/CONFIRMED/PACKED only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Packed,
    Shipping,
    Delivered,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Terminal statuses have no outgoing transition.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Delivered | OrderStatus::Completed | OrderStatus::Cancelled
        )
    }

    /// Revenue eligibility is a pure function of status — never of payment
    /// method, never of order age.
    pub fn is_revenue_eligible(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Completed)
    }
}

/// Order line item — a purchase-time snapshot.
///
/// `unit_price` and `name` are captured at checkout and must not be
/// re-derived from current catalog state. `category_hint` is a denormalized
/// label used only when the live catalog lookup fails (product deleted).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Product reference (may be stale if the product was later deleted)
    pub product_id: String,
    /// Product name snapshot
    pub name: String,
    pub quantity: i32,
    /// Price snapshot in currency unit
    pub unit_price: f64,
    /// Category name snapshot (for statistics fallback)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_hint: Option<String>,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    /// Owning customer — set at creation, never reassigned
    pub customer_id: String,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    /// Monetary total at time of placement, in currency unit.
    /// Never recomputed from later catalog state.
    pub total_amount: f64,
    pub created_at: i64,
    /// Bumped on every state transition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    // Lifecycle stamps: set once by the corresponding transition, immutable after
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packed_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipped_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<i64>,
}

impl Order {
    /// Create a pending order, computing `total_amount` from the item
    /// snapshots with decimal arithmetic (Σ quantity × unit_price).
    pub fn new(id: impl Into<String>, customer_id: impl Into<String>, items: Vec<OrderItem>) -> Self {
        let total: Decimal = items
            .iter()
            .map(|i| {
                Decimal::from_f64(i.unit_price).unwrap_or_default() * Decimal::from(i.quantity)
            })
            .sum();
        Self {
            id: id.into(),
            customer_id: customer_id.into(),
            items,
            status: OrderStatus::Pending,
            total_amount: total
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
                .to_f64()
                .unwrap_or_default(),
            created_at: crate::util::now_millis(),
            updated_at: None,
            confirmed_at: None,
            packed_at: None,
            shipped_at: None,
            delivered_at: None,
        }
    }
}
