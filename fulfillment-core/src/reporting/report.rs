//! Sales report assembly
//!
//! One call composing the full dashboard payload both consoles render:
//! overview, revenue trend, category sales, top products. The service
//! layer serializes the result as-is.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::Order;

use super::category::{resolve_dominant_category, CatalogIndex};
use super::ranking::{rank, TopProduct};
use super::revenue::{attribute, RevenueSummary};
use super::timeline::{aggregate, completion_time, ReportWindow, TrendBucket};
use crate::config::FulfillmentConfig;
use crate::repository::{load_catalog_index, OrderFilter, OrderRepository, ProductRepository, RepositoryError};
use crate::utils::money::{to_decimal, to_f64};

/// Overview statistics
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Overview {
    pub revenue: f64,
    pub net_revenue: f64,
    pub platform_fee: f64,
    /// Revenue-eligible orders in the window
    pub orders: usize,
    /// Distinct customers among eligible orders
    pub customers: usize,
    pub average_order_value: f64,
}

/// Revenue attributed to one dominant category
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategorySale {
    pub name: String,
    pub value: f64,
}

/// Full report payload
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SalesReport {
    pub overview: Overview,
    pub revenue_trend: Vec<TrendBucket>,
    pub category_sales: Vec<CategorySale>,
    pub top_products: Vec<TopProduct>,
}

impl SalesReport {
    /// Compute the report over a caller-supplied order snapshot.
    ///
    /// Orders are scoped to the window by completion timestamp first, then
    /// every section works off the same scoped slice.
    pub fn compute(
        orders: &[Order],
        window: &ReportWindow,
        now_millis: i64,
        catalog: &CatalogIndex,
        config: &FulfillmentConfig,
    ) -> Self {
        let (start, end) = window.bounds(now_millis, config.timezone);
        let scoped: Vec<Order> = orders
            .iter()
            .filter(|o| {
                let at = completion_time(o);
                at >= start && at < end
            })
            .cloned()
            .collect();

        tracing::debug!(
            total = orders.len(),
            in_window = scoped.len(),
            window = ?window,
            "Computing sales report"
        );

        let summary = attribute(&scoped, config.payout_rate);
        let overview = Overview {
            revenue: summary.gross,
            net_revenue: summary.net,
            platform_fee: summary.platform_fee(),
            orders: summary.count,
            customers: distinct_customers(&scoped),
            average_order_value: summary.average_order_value(),
        };

        SalesReport {
            overview,
            revenue_trend: aggregate(&scoped, window, now_millis, config.timezone),
            category_sales: category_sales(&scoped, catalog),
            top_products: rank(&scoped, catalog, None, config.top_seller_limit),
        }
    }

    /// The raw revenue split, for callers that need it without the rest
    pub fn revenue_summary(&self) -> RevenueSummary {
        RevenueSummary {
            gross: self.overview.revenue,
            net: self.overview.net_revenue,
            count: self.overview.orders,
        }
    }
}

fn distinct_customers(orders: &[Order]) -> usize {
    orders
        .iter()
        .filter(|o| o.status.is_revenue_eligible())
        .map(|o| o.customer_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Revenue per dominant category over the eligible orders, descending.
fn category_sales(orders: &[Order], catalog: &CatalogIndex) -> Vec<CategorySale> {
    let mut totals: HashMap<String, Decimal> = HashMap::new();
    for order in orders {
        if !order.status.is_revenue_eligible() {
            continue;
        }
        let category = resolve_dominant_category(order, catalog);
        *totals.entry(category).or_insert(Decimal::ZERO) += to_decimal(order.total_amount);
    }

    let mut sales: Vec<CategorySale> = totals
        .into_iter()
        .map(|(name, value)| CategorySale {
            name,
            value: to_f64(value),
        })
        .collect();
    // Descending by revenue; name breaks ties so the output is deterministic
    sales.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    sales
}

/// Load orders + catalog through the abstract repositories and compute the
/// report — the one-stop entry the service layer calls per request.
pub async fn build_sales_report(
    orders_repo: &impl OrderRepository,
    products_repo: &impl ProductRepository,
    filter: &OrderFilter,
    window: &ReportWindow,
    now_millis: i64,
    config: &FulfillmentConfig,
) -> Result<SalesReport, RepositoryError> {
    let orders = orders_repo.list_orders(filter).await?;
    let catalog = load_catalog_index(products_repo).await?;
    Ok(SalesReport::compute(&orders, window, now_millis, &catalog, config))
}
