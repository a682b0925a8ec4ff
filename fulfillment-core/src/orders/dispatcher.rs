//! Guarded transition dispatcher
//!
//! Wraps the pure state machine with a one-in-flight-per-order execution
//! policy and the single persistence write. The per-order marker is the
//! duplicate-submission guard: a second request for the same order while
//! one is pending fails fast with [`DispatchError::Busy`] instead of
//! queuing or racing. Requests for different order ids never block each
//! other.
//!
//! # Dispatch Flow
//!
//! ```text
//! dispatch(order_id, action)
//!     ├─ 1. Acquire in-flight marker (Busy if already held)
//!     ├─ 2. Load order from repository
//!     ├─ 3. Run the pure transition table
//!     ├─ 4. Persist new status + lifecycle stamp
//!     ├─ 5. Broadcast TransitionEvent
//!     └─ 6. Release marker (guard Drop — runs on every exit path)
//! ```

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use shared::models::{OrderStatus, UserRole};
use thiserror::Error;
use tokio::sync::broadcast;

use super::access;
use super::state_machine::{transition, OrderAction, TransitionError};
use crate::repository::{OrderRepository, RepositoryError};

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 4096;

/// Broadcast after every successfully persisted transition; order-list
/// views subscribe to refresh without polling.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransitionEvent {
    pub order_id: String,
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub action: OrderAction,
    /// Unix millis the transition was persisted at
    pub at: i64,
}

/// Dispatch errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DispatchError {
    /// Rejected locally by the transition table — no I/O was attempted
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    /// A dispatch for this order is already in flight
    #[error("a transition is already in flight for order {0}")]
    Busy(String),

    #[error("order not found: {0}")]
    OrderNotFound(String),

    /// Role layer rejection — the table was not consulted
    #[error("role {role:?} may not invoke {action:?}")]
    Forbidden { role: UserRole, action: OrderAction },

    /// Persistence failed; the transition must NOT be assumed applied.
    /// Callers re-query order state before retrying.
    #[error("repository error: {0}")]
    Repository(String),
}

impl From<RepositoryError> for DispatchError {
    fn from(err: RepositoryError) -> Self {
        DispatchError::Repository(err.0)
    }
}

/// Removes the in-flight marker on drop, so the release runs on success,
/// error return, and caller cancellation alike.
struct InFlightGuard<'a> {
    markers: &'a DashMap<String, ()>,
    order_id: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.markers.remove(&self.order_id);
    }
}

/// Transition dispatcher with per-order in-flight guarding
pub struct TransitionDispatcher<R: OrderRepository> {
    repo: Arc<R>,
    in_flight: DashMap<String, ()>,
    event_tx: broadcast::Sender<TransitionEvent>,
}

impl<R: OrderRepository> TransitionDispatcher<R> {
    pub fn new(repo: Arc<R>) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            repo,
            in_flight: DashMap::new(),
            event_tx,
        }
    }

    /// Subscribe to transition broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<TransitionEvent> {
        self.event_tx.subscribe()
    }

    /// Is a dispatch currently in flight for this order?
    /// (UIs use this to disable the triggering control.)
    pub fn is_in_flight(&self, order_id: &str) -> bool {
        self.in_flight.contains_key(order_id)
    }

    /// Execute one transition: at most one in flight per order id, no
    /// automatic retry — a transition is not safely idempotent (re-confirming
    /// an already-packed order must not silently succeed).
    pub async fn dispatch(
        &self,
        order_id: &str,
        action: OrderAction,
    ) -> Result<OrderStatus, DispatchError> {
        let _guard = self.acquire(order_id)?;

        let order = self
            .repo
            .find_order(order_id)
            .await?
            .ok_or_else(|| DispatchError::OrderNotFound(order_id.to_string()))?;

        // Local table check first: a rejection here has attempted no I/O
        let accepted = transition(order.status, action)?;

        let at = shared::util::now_millis();
        self.repo
            .apply_transition(order_id, accepted.next, accepted.stamp, at)
            .await?;

        tracing::info!(
            order_id = %order_id,
            from = ?order.status,
            to = ?accepted.next,
            action = ?action,
            "Order transition applied"
        );

        let event = TransitionEvent {
            order_id: order_id.to_string(),
            from: order.status,
            to: accepted.next,
            action,
            at,
        };
        if self.event_tx.send(event).is_err() {
            tracing::debug!(order_id = %order_id, "Transition broadcast skipped: no active receivers");
        }

        Ok(accepted.next)
    }

    /// [`dispatch`](Self::dispatch) behind the role permission layer —
    /// the thin authorization check call sites share.
    pub async fn dispatch_as(
        &self,
        role: UserRole,
        order_id: &str,
        action: OrderAction,
    ) -> Result<OrderStatus, DispatchError> {
        if !access::permitted(role, action) {
            return Err(DispatchError::Forbidden { role, action });
        }
        self.dispatch(order_id, action).await
    }

    fn acquire(&self, order_id: &str) -> Result<InFlightGuard<'_>, DispatchError> {
        use dashmap::mapref::entry::Entry;
        match self.in_flight.entry(order_id.to_string()) {
            Entry::Occupied(_) => {
                tracing::warn!(order_id = %order_id, "Concurrent dispatch rejected");
                Err(DispatchError::Busy(order_id.to_string()))
            }
            Entry::Vacant(vacant) => {
                // Insert, then drop the shard lock before the guard outlives it
                vacant.insert(());
                Ok(InFlightGuard {
                    markers: &self.in_flight,
                    order_id: order_id.to_string(),
                })
            }
        }
    }
}
