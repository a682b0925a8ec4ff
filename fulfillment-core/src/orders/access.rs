//! Role permission layer
//!
//! Thin authorization over the state machine, deliberately kept out of the
//! machine itself so both consoles reuse one transition table. Ownership
//! scoping (a seller only sees its own orders) is an [`OrderFilter`]
//! concern at the repository, not handled here.
//!
//! [`OrderFilter`]: crate::repository::OrderFilter

use shared::models::{OrderStatus, UserRole};

use super::state_machine::{self, OrderAction};

/// May `role` invoke `action` at all (regardless of order status)?
///
/// Operators and sellers run the full fulfillment flow on their own
/// storefronts; customers may only cancel (and only while the table still
/// allows it).
pub fn permitted(role: UserRole, action: OrderAction) -> bool {
    match role {
        UserRole::Operator | UserRole::Seller => true,
        UserRole::Customer => matches!(action, OrderAction::Cancel),
    }
}

/// Actions `role` can currently invoke on an order in `status` —
/// the table's allowed actions intersected with the role permission.
pub fn allowed_actions(role: UserRole, status: OrderStatus) -> Vec<OrderAction> {
    state_machine::allowed_actions(status)
        .iter()
        .copied()
        .filter(|action| permitted(role, *action))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_roles_may_invoke_everything() {
        for role in [UserRole::Operator, UserRole::Seller] {
            for action in [
                OrderAction::Confirm,
                OrderAction::Pack,
                OrderAction::Handover,
                OrderAction::Deliver,
                OrderAction::Cancel,
            ] {
                assert!(permitted(role, action), "{:?} must allow {:?}", role, action);
            }
        }
    }

    #[test]
    fn test_customer_may_only_cancel() {
        assert!(permitted(UserRole::Customer, OrderAction::Cancel));
        for action in [
            OrderAction::Confirm,
            OrderAction::Pack,
            OrderAction::Handover,
            OrderAction::Deliver,
        ] {
            assert!(!permitted(UserRole::Customer, action));
        }
    }

    #[test]
    fn test_allowed_actions_intersects_table_and_role() {
        assert_eq!(
            allowed_actions(UserRole::Seller, OrderStatus::Pending),
            vec![OrderAction::Confirm, OrderAction::Cancel]
        );
        assert_eq!(
            allowed_actions(UserRole::Customer, OrderStatus::Pending),
            vec![OrderAction::Cancel]
        );
        // Once shipped, not even the customer can cancel
        assert!(allowed_actions(UserRole::Customer, OrderStatus::Shipping).is_empty());
        assert_eq!(
            allowed_actions(UserRole::Operator, OrderStatus::Shipping),
            vec![OrderAction::Deliver]
        );
    }
}
