//! Order state machine
//!
//! Pure transition table, no I/O, no actor knowledge. Both consumer roles
//! (operator console and seller console) drive the same table through the
//! dispatcher; role-based permission lives in [`super::access`], never here.

use serde::{Deserialize, Serialize};
use shared::models::{Order, OrderStatus};
use thiserror::Error;

/// Fulfillment action requested against an order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderAction {
    Confirm,
    Pack,
    /// Handover to the courier — physical shipment starts here,
    /// which is why Cancel is no longer reachable afterwards
    Handover,
    Deliver,
    Cancel,
}

/// Lifecycle timestamp written by a forward transition
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimestampField {
    ConfirmedAt,
    PackedAt,
    ShippedAt,
    DeliveredAt,
}

impl TimestampField {
    /// Storage column name, for repositories that persist by field name
    pub fn field_name(&self) -> &'static str {
        match self {
            TimestampField::ConfirmedAt => "confirmed_at",
            TimestampField::PackedAt => "packed_at",
            TimestampField::ShippedAt => "shipped_at",
            TimestampField::DeliveredAt => "delivered_at",
        }
    }
}

/// Outcome of an accepted transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: OrderStatus,
    /// Cancel is not a forward transition and stamps nothing
    pub stamp: Option<TimestampField>,
}

impl Transition {
    /// Apply this transition to an in-memory order: set the status, write
    /// the lifecycle stamp (set-once — an already-set stamp is never
    /// rewritten) and bump `updated_at`.
    pub fn apply_to(&self, order: &mut Order, at: i64) {
        order.status = self.next;
        order.updated_at = Some(at);
        if let Some(stamp) = self.stamp {
            let slot = match stamp {
                TimestampField::ConfirmedAt => &mut order.confirmed_at,
                TimestampField::PackedAt => &mut order.packed_at,
                TimestampField::ShippedAt => &mut order.shipped_at,
                TimestampField::DeliveredAt => &mut order.delivered_at,
            };
            if slot.is_none() {
                *slot = Some(at);
            }
        }
    }
}

/// Transition errors
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("action {action:?} is not allowed from status {current:?}")]
    InvalidTransition {
        current: OrderStatus,
        action: OrderAction,
    },
}

/// Resolve (current status, requested action) against the transition table.
///
/// | Action   | Allowed from               | Result    |
/// |----------|----------------------------|-----------|
/// | Confirm  | Pending                    | Confirmed |
/// | Pack     | Confirmed                  | Packed    |
/// | Handover | Packed                     | Shipping  |
/// | Deliver  | Shipping                   | Delivered |
/// | Cancel   | Pending, Confirmed, Packed | Cancelled |
///
/// Every other pair fails with [`TransitionError::InvalidTransition`];
/// callers must not mutate local state on that failure.
pub fn transition(current: OrderStatus, action: OrderAction) -> Result<Transition, TransitionError> {
    use OrderAction::*;
    use OrderStatus::*;

    let accepted = match (current, action) {
        (Pending, Confirm) => Transition {
            next: Confirmed,
            stamp: Some(TimestampField::ConfirmedAt),
        },
        (Confirmed, Pack) => Transition {
            next: Packed,
            stamp: Some(TimestampField::PackedAt),
        },
        (Packed, Handover) => Transition {
            next: Shipping,
            stamp: Some(TimestampField::ShippedAt),
        },
        (Shipping, Deliver) => Transition {
            next: Delivered,
            stamp: Some(TimestampField::DeliveredAt),
        },
        (Pending | Confirmed | Packed, Cancel) => Transition {
            next: Cancelled,
            stamp: None,
        },
        _ => return Err(TransitionError::InvalidTransition { current, action }),
    };
    Ok(accepted)
}

/// Actions the table accepts from `current`, in forward-then-cancel order.
/// Used by order-list UIs to render the available controls.
pub fn allowed_actions(current: OrderStatus) -> &'static [OrderAction] {
    use OrderAction::*;
    match current {
        OrderStatus::Pending => &[Confirm, Cancel],
        OrderStatus::Confirmed => &[Pack, Cancel],
        OrderStatus::Packed => &[Handover, Cancel],
        OrderStatus::Shipping => &[Deliver],
        OrderStatus::Delivered | OrderStatus::Completed | OrderStatus::Cancelled => &[],
    }
}
