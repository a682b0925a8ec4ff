//! Revenue attribution
//!
//! Classifies orders as revenue-eligible and splits gross revenue between
//! seller payout and platform fee. Pure and total: empty input yields
//! zeros, nothing here divides.

use rust_decimal::prelude::*;
use serde::Serialize;
use shared::models::Order;

use crate::utils::money::{to_decimal, to_f64};

/// Revenue figures over one order slice
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct RevenueSummary {
    /// Sum of `total_amount` over revenue-eligible orders
    pub gross: f64,
    /// Seller payout: `gross × payout_rate`
    pub net: f64,
    /// Revenue-eligible orders only — not all orders in the input
    pub count: usize,
}

impl RevenueSummary {
    /// The platform's complement of the payout split
    pub fn platform_fee(&self) -> f64 {
        to_f64(to_decimal(self.gross) - to_decimal(self.net))
    }

    /// Average order value; defined as 0 when there are no eligible
    /// orders (explicit guard — never NaN, never an error).
    pub fn average_order_value(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        to_f64(to_decimal(self.gross) / Decimal::from(self.count))
    }
}

/// Attribute revenue over an order slice.
///
/// Eligibility is `status.is_revenue_eligible()` and nothing else; every
/// other status contributes zero. Accumulation is decimal, rounded to the
/// monetary boundary only at the end.
pub fn attribute(orders: &[Order], payout_rate: f64) -> RevenueSummary {
    let mut gross = Decimal::ZERO;
    let mut count = 0usize;

    for order in orders {
        if !order.status.is_revenue_eligible() {
            continue;
        }
        gross += to_decimal(order.total_amount);
        count += 1;
    }

    let net = gross * to_decimal(payout_rate);
    RevenueSummary {
        gross: to_f64(gross),
        net: to_f64(net),
        count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{OrderItem, OrderStatus};

    const PAYOUT_RATE: f64 = 0.85;

    fn order(status: OrderStatus, total: f64) -> Order {
        let mut o = Order::new(
            "o",
            "c-1",
            vec![OrderItem {
                product_id: "p1".to_string(),
                name: "Item".to_string(),
                quantity: 1,
                unit_price: total,
                category_hint: None,
            }],
        );
        o.status = status;
        o
    }

    #[test]
    fn test_empty_input_yields_zeros() {
        let summary = attribute(&[], PAYOUT_RATE);
        assert_eq!(summary, RevenueSummary { gross: 0.0, net: 0.0, count: 0 });
        assert_eq!(summary.average_order_value(), 0.0);
        assert_eq!(summary.platform_fee(), 0.0);
    }

    #[test]
    fn test_ineligible_statuses_contribute_nothing() {
        let orders = vec![
            order(OrderStatus::Pending, 40.0),
            order(OrderStatus::Confirmed, 40.0),
            order(OrderStatus::Packed, 40.0),
            order(OrderStatus::Shipping, 40.0),
            order(OrderStatus::Cancelled, 1000.0),
        ];
        let summary = attribute(&orders, PAYOUT_RATE);
        assert_eq!(summary, RevenueSummary { gross: 0.0, net: 0.0, count: 0 });
    }

    #[test]
    fn test_payout_split_scenario() {
        // delivered $100 + delivered $50, cancelled $1000 ignored
        let orders = vec![
            order(OrderStatus::Delivered, 100.0),
            order(OrderStatus::Delivered, 50.0),
            order(OrderStatus::Cancelled, 1000.0),
        ];
        let summary = attribute(&orders, PAYOUT_RATE);
        assert_eq!(summary.gross, 150.0);
        assert_eq!(summary.net, 127.5);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.platform_fee(), 22.5);
        assert_eq!(summary.average_order_value(), 75.0);
    }

    #[test]
    fn test_completed_counts_like_delivered() {
        let orders = vec![
            order(OrderStatus::Completed, 30.0),
            order(OrderStatus::Delivered, 20.0),
        ];
        let summary = attribute(&orders, PAYOUT_RATE);
        assert_eq!(summary.gross, 50.0);
        assert_eq!(summary.count, 2);
    }

    #[test]
    fn test_net_is_gross_times_rate() {
        for total in [0.01, 9.99, 123.45, 10_000.0] {
            let summary = attribute(&[order(OrderStatus::Delivered, total)], PAYOUT_RATE);
            assert!(
                (summary.net - summary.gross * PAYOUT_RATE).abs() < 0.005,
                "net {} deviates from gross {} × rate",
                summary.net,
                summary.gross
            );
        }
    }

    #[test]
    fn test_decimal_accumulation_no_float_drift() {
        let orders: Vec<Order> = (0..100).map(|_| order(OrderStatus::Delivered, 0.1)).collect();
        let summary = attribute(&orders, PAYOUT_RATE);
        assert_eq!(summary.gross, 10.0);
        assert_eq!(summary.net, 8.5);
    }
}
