//! Order fulfillment module
//!
//! - **state_machine**: the pure transition table both consoles share
//! - **access**: role → action permission, layered over the machine
//! - **dispatcher**: guarded execution with a per-order in-flight marker
//!
//! # Architecture
//!
//! ```text
//! Action request → access check → TransitionDispatcher
//!                                        ├─ state_machine (pure)
//!                                        ├─ OrderRepository (persist)
//!                                        └─ Broadcast → subscribed views
//! ```

pub mod access;
pub mod dispatcher;
pub mod state_machine;

// Re-exports
pub use dispatcher::{DispatchError, TransitionDispatcher, TransitionEvent};
pub use state_machine::{
    allowed_actions, transition, OrderAction, TimestampField, Transition, TransitionError,
};
