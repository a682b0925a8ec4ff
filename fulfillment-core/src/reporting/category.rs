//! Category attribution
//!
//! Assigns each order a single dominant category for reporting. Per-item
//! resolution priority: live catalog → purchase-time hint → the fallback
//! label. Reporting always produces a label; an order resolving nothing
//! still lands in the fallback bucket rather than erroring.

use std::collections::HashMap;

use shared::models::{Order, OrderItem, Product};

/// Label attributed when no category can be resolved
pub const FALLBACK_CATEGORY: &str = "Other";

/// Immutable product-id → (name, category) snapshot, batch-loaded once per
/// reporting request. Products deleted from the catalog are simply absent;
/// resolution falls back to the item's purchase-time hint.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    entries: HashMap<String, CatalogEntry>,
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    name: String,
    category: String,
}

impl CatalogIndex {
    pub fn from_products(products: Vec<Product>) -> Self {
        let entries = products
            .into_iter()
            .map(|p| {
                (
                    p.id,
                    CatalogEntry {
                        name: p.name,
                        category: p.category,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    pub fn category_of(&self, product_id: &str) -> Option<&str> {
        self.entries.get(product_id).map(|e| e.category.as_str())
    }

    pub fn name_of(&self, product_id: &str) -> Option<&str> {
        self.entries.get(product_id).map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Normalized comparison key for a label, or `None` when the label is
/// unusable: blank after trimming, or one of the literal junk strings
/// legacy clients persisted ("null"/"undefined").
fn normalize(label: &str) -> Option<String> {
    let trimmed = label.trim();
    let folded = trimmed.to_lowercase();
    match folded.as_str() {
        "" | "null" | "undefined" => None,
        _ => Some(folded),
    }
}

/// Resolve one item's category: catalog first, then the purchase-time
/// hint. Returns the display spelling (trimmed); `None` when both sources
/// are unusable.
pub fn resolve_item_category<'a>(item: &'a OrderItem, catalog: &'a CatalogIndex) -> Option<&'a str> {
    if let Some(label) = catalog.category_of(&item.product_id) {
        if normalize(label).is_some() {
            return Some(label.trim());
        }
    }
    if let Some(hint) = &item.category_hint {
        if normalize(hint).is_some() {
            return Some(hint.trim());
        }
    }
    None
}

/// Resolve the single dominant category of an order.
///
/// Quantities are tallied per normalized label across the items; the
/// highest tally wins, ties breaking on first encounter in item order.
/// The fallback label is a last resort, not a competing category: a
/// genuine label wins any tie against it, and only a strictly higher
/// fallback tally yields the fallback when genuine labels exist at all.
pub fn resolve_dominant_category(order: &Order, catalog: &CatalogIndex) -> String {
    struct Tally {
        quantity: i64,
        first_index: usize,
        display: String,
    }

    let mut tallies: HashMap<String, Tally> = HashMap::new();
    let mut fallback_quantity: i64 = 0;

    for (index, item) in order.items.iter().enumerate() {
        let quantity = i64::from(item.quantity);
        match resolve_item_category(item, catalog) {
            Some(display) => {
                let key = normalize(display).unwrap_or_default();
                tallies
                    .entry(key)
                    .and_modify(|t| t.quantity += quantity)
                    .or_insert(Tally {
                        quantity,
                        first_index: index,
                        display: display.to_string(),
                    });
            }
            None => fallback_quantity += quantity,
        }
    }

    // Best genuine label: highest quantity, earliest first encounter on ties
    let best = tallies
        .into_values()
        .max_by(|a, b| {
            a.quantity
                .cmp(&b.quantity)
                .then(b.first_index.cmp(&a.first_index))
        });

    match best {
        Some(t) if fallback_quantity <= t.quantity => t.display,
        _ => FALLBACK_CATEGORY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: &str, quantity: i32, hint: Option<&str>) -> OrderItem {
        OrderItem {
            product_id: product_id.to_string(),
            name: format!("Product {}", product_id),
            quantity,
            unit_price: 1.0,
            category_hint: hint.map(str::to_string),
        }
    }

    fn order(items: Vec<OrderItem>) -> Order {
        Order::new("o-1", "c-1", items)
    }

    fn catalog(entries: &[(&str, &str, &str)]) -> CatalogIndex {
        CatalogIndex::from_products(
            entries
                .iter()
                .map(|(id, name, category)| Product {
                    id: id.to_string(),
                    name: name.to_string(),
                    category: category.to_string(),
                    price: 1.0,
                    is_active: true,
                })
                .collect(),
        )
    }

    #[test]
    fn test_catalog_beats_hint() {
        let catalog = catalog(&[("p1", "Carrot", "Vegetables")]);
        let order = order(vec![item("p1", 1, Some("Fruits"))]);
        assert_eq!(resolve_dominant_category(&order, &catalog), "Vegetables");
    }

    #[test]
    fn test_hint_used_when_product_deleted() {
        let order = order(vec![item("gone", 1, Some("Fruits"))]);
        assert_eq!(resolve_dominant_category(&order, &CatalogIndex::default()), "Fruits");
    }

    #[test]
    fn test_unresolvable_items_fall_back() {
        let order = order(vec![item("gone", 2, None)]);
        assert_eq!(resolve_dominant_category(&order, &CatalogIndex::default()), "Other");
    }

    #[test]
    fn test_empty_order_falls_back() {
        let order = order(vec![]);
        assert_eq!(resolve_dominant_category(&order, &CatalogIndex::default()), "Other");
    }

    #[test]
    fn test_junk_labels_are_unresolved() {
        for junk in ["", "  ", "null", "NULL", "undefined", " Undefined "] {
            let order = order(vec![item("gone", 1, Some(junk))]);
            assert_eq!(
                resolve_dominant_category(&order, &CatalogIndex::default()),
                "Other",
                "label {:?} must be treated as unresolved",
                junk
            );
        }
    }

    #[test]
    fn test_strict_unresolved_majority_wins() {
        // 3 unidentifiable units against 1 genuine unit: Other outweighs
        let order = order(vec![
            item("gone-a", 1, Some("Vegetables")),
            item("gone-b", 3, None),
        ]);
        assert_eq!(resolve_dominant_category(&order, &CatalogIndex::default()), "Other");
    }

    #[test]
    fn test_genuine_wins_tie_against_fallback() {
        let order = order(vec![item("gone-a", 1, None), item("gone-b", 1, Some("Fruits"))]);
        assert_eq!(resolve_dominant_category(&order, &CatalogIndex::default()), "Fruits");
    }

    #[test]
    fn test_zero_quantity_items_do_not_shift_the_tally() {
        let order = order(vec![
            item("gone-a", 1, Some("Vegetables")),
            item("gone-b", 1, None),
            item("gone-c", 0, Some("Vegetables")),
        ]);
        assert_eq!(resolve_dominant_category(&order, &CatalogIndex::default()), "Vegetables");
    }

    #[test]
    fn test_tie_between_genuine_labels_breaks_on_first_encounter() {
        let order = order(vec![
            item("gone-a", 2, Some("Bakery")),
            item("gone-b", 2, Some("Dairy")),
        ]);
        assert_eq!(resolve_dominant_category(&order, &CatalogIndex::default()), "Bakery");
    }

    #[test]
    fn test_case_and_whitespace_fold_into_one_tally() {
        let order = order(vec![
            item("gone-a", 1, Some(" vegetables ")),
            item("gone-b", 2, Some("Vegetables")),
            item("gone-c", 2, Some("Fruits")),
        ]);
        // 1 + 2 vegetables beats 2 fruits; display keeps first-seen spelling
        assert_eq!(resolve_dominant_category(&order, &CatalogIndex::default()), "vegetables");
    }

    #[test]
    fn test_highest_genuine_label_wins() {
        let catalog = catalog(&[("p1", "Carrot", "Vegetables"), ("p2", "Apple", "Fruits")]);
        let order = order(vec![
            item("p1", 3, None),
            item("p2", 1, None),
            item("gone", 1, None),
        ]);
        assert_eq!(resolve_dominant_category(&order, &catalog), "Vegetables");
    }

    #[test]
    fn test_resolve_item_category_display_is_trimmed() {
        let item = item("gone", 1, Some("  Pantry  "));
        assert_eq!(
            resolve_item_category(&item, &CatalogIndex::default()),
            Some("Pantry")
        );
    }
}
