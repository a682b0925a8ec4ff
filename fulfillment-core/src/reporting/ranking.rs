//! Top-seller ranking
//!
//! Products ordered by units sold over a revenue-eligible order slice,
//! optionally restricted to one category. Malformed price snapshots
//! (non-positive computed average) are dropped rather than surfaced.

use std::collections::HashMap;

use rust_decimal::prelude::*;
use serde::Serialize;
use shared::models::Order;

use super::category::{resolve_item_category, CatalogIndex, FALLBACK_CATEGORY};
use crate::utils::money::{item_line_total, to_f64};

/// Default ranking depth
pub const DEFAULT_TOP_LIMIT: usize = 10;

/// One ranked product
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TopProduct {
    pub product_id: String,
    /// Live catalog name when the product still exists, otherwise the
    /// purchase-time snapshot
    pub name: String,
    pub category: String,
    pub units_sold: i64,
    pub average_unit_price: f64,
}

struct Accumulator {
    product_id: String,
    name: String,
    category: String,
    units: i64,
    revenue: Decimal,
}

/// Rank products by units sold.
///
/// - Only revenue-eligible orders participate.
/// - `category_filter` matches each item's own resolved category (not the
///   order-level dominant one), compared after normalization.
/// - Descending by units sold; ties keep input encounter order (stable
///   sort, deterministic for a fixed input). Truncated to `limit`.
pub fn rank(
    orders: &[Order],
    catalog: &CatalogIndex,
    category_filter: Option<&str>,
    limit: usize,
) -> Vec<TopProduct> {
    let filter_key = category_filter.map(|f| f.trim().to_lowercase());

    // Accumulators keep first-encounter order; the map only finds them
    let mut index_of: HashMap<String, usize> = HashMap::new();
    let mut accumulators: Vec<Accumulator> = Vec::new();

    for order in orders {
        if !order.status.is_revenue_eligible() {
            continue;
        }
        for item in &order.items {
            let resolved = resolve_item_category(item, catalog).unwrap_or(FALLBACK_CATEGORY);
            if let Some(filter) = &filter_key {
                if resolved.to_lowercase() != *filter {
                    continue;
                }
            }

            let idx = *index_of.entry(item.product_id.clone()).or_insert_with(|| {
                accumulators.push(Accumulator {
                    product_id: item.product_id.clone(),
                    name: catalog
                        .name_of(&item.product_id)
                        .unwrap_or(&item.name)
                        .to_string(),
                    category: resolved.to_string(),
                    units: 0,
                    revenue: Decimal::ZERO,
                });
                accumulators.len() - 1
            });
            accumulators[idx].units += i64::from(item.quantity);
            accumulators[idx].revenue += item_line_total(item);
        }
    }

    let mut ranked: Vec<TopProduct> = accumulators
        .into_iter()
        .filter(|acc| acc.units > 0)
        .map(|acc| TopProduct {
            average_unit_price: to_f64(acc.revenue / Decimal::from(acc.units)),
            product_id: acc.product_id,
            name: acc.name,
            category: acc.category,
            units_sold: acc.units,
        })
        .filter(|p| p.average_unit_price > 0.0)
        .collect();

    // Vec::sort_by is stable: equal unit counts keep encounter order
    ranked.sort_by(|a, b| b.units_sold.cmp(&a.units_sold));
    ranked.truncate(limit);
    ranked
}
