//! Abstract repository interfaces
//!
//! The engine is storage- and transport-agnostic: these traits are the only
//! contracts a backing store must satisfy. Implementations (SQL, document
//! store, remote service) live with the service layer that owns them.

use std::collections::HashMap;

use async_trait::async_trait;
use shared::models::{Order, OrderStatus, Product};
use thiserror::Error;

use crate::orders::state_machine::TimestampField;
use crate::reporting::CatalogIndex;

/// Backend failure — the message is passed through verbatim so callers can
/// log/display exactly what the store reported.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct RepositoryError(pub String);

impl RepositoryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Query scope for order listings.
///
/// Both consoles use the same filter; the seller console always sets its
/// own scope so it never sees another storefront's orders.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub customer_id: Option<String>,
    pub statuses: Option<Vec<OrderStatus>>,
    /// Inclusive lower bound on `created_at` (Unix millis)
    pub since: Option<i64>,
    /// Exclusive upper bound on `created_at` (Unix millis)
    pub until: Option<i64>,
}

impl OrderFilter {
    /// Does `order` pass this filter?
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(customer_id) = &self.customer_id {
            if &order.customer_id != customer_id {
                return false;
            }
        }
        if let Some(statuses) = &self.statuses {
            if !statuses.contains(&order.status) {
                return false;
            }
        }
        if let Some(since) = self.since {
            if order.created_at < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if order.created_at >= until {
                return false;
            }
        }
        true
    }
}

/// Order store — read plus the single transition write the dispatcher makes
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_order(&self, order_id: &str) -> Result<Option<Order>, RepositoryError>;

    async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, RepositoryError>;

    /// Persist a transition: new status, the lifecycle stamp named by the
    /// state machine (if any) at `at`, and an `updated_at` bump.
    async fn apply_transition(
        &self,
        order_id: &str,
        new_status: OrderStatus,
        stamp: Option<TimestampField>,
        at: i64,
    ) -> Result<(), RepositoryError>;
}

/// Product catalog — read-only
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn get_product(&self, product_id: &str) -> Result<Option<Product>, RepositoryError>;

    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError>;

    /// Category label of a product, `None` when the product is unknown
    /// (deleted products must resolve to a miss, not an error).
    async fn get_category(&self, product_id: &str) -> Result<Option<String>, RepositoryError> {
        Ok(self.get_product(product_id).await?.map(|p| p.category))
    }

    async fn get_name(&self, product_id: &str) -> Result<Option<String>, RepositoryError> {
        Ok(self.get_product(product_id).await?.map(|p| p.name))
    }
}

/// User directory — read-only
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_display_name(&self, user_id: &str) -> Result<Option<String>, RepositoryError>;
}

/// Snapshot the whole catalog into an immutable lookup index for one
/// reporting request (batch load once, resolve in memory).
pub async fn load_catalog_index(
    repo: &impl ProductRepository,
) -> Result<CatalogIndex, RepositoryError> {
    let products = repo.list_products().await?;
    tracing::debug!(product_count = products.len(), "Catalog index loaded");
    Ok(CatalogIndex::from_products(products))
}

/// Batch-resolve display names for a set of user ids. Unknown ids are
/// simply absent from the result; callers fall back to the raw id.
pub async fn load_display_names(
    repo: &impl UserRepository,
    user_ids: impl IntoIterator<Item = &str>,
) -> Result<HashMap<String, String>, RepositoryError> {
    let mut names = HashMap::new();
    for id in user_ids {
        if names.contains_key(id) {
            continue;
        }
        if let Some(name) = repo.get_display_name(id).await? {
            names.insert(id.to_string(), name);
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::OrderItem;

    struct FixedCatalog(Vec<Product>);

    #[async_trait]
    impl ProductRepository for FixedCatalog {
        async fn get_product(&self, product_id: &str) -> Result<Option<Product>, RepositoryError> {
            Ok(self.0.iter().find(|p| p.id == product_id).cloned())
        }

        async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_category_and_name_lookups_miss_on_deleted_products() {
        let catalog = FixedCatalog(vec![Product {
            id: "carrot".to_string(),
            name: "Carrot".to_string(),
            category: "Vegetables".to_string(),
            price: 1.2,
            is_active: true,
        }]);

        assert_eq!(
            catalog.get_category("carrot").await.unwrap(),
            Some("Vegetables".to_string())
        );
        assert_eq!(catalog.get_name("carrot").await.unwrap(), Some("Carrot".to_string()));
        assert_eq!(catalog.get_category("gone").await.unwrap(), None);
        assert_eq!(catalog.get_name("gone").await.unwrap(), None);

        let index = load_catalog_index(&catalog).await.unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.category_of("carrot"), Some("Vegetables"));
        assert!(index.category_of("gone").is_none());
    }

    fn order(id: &str, customer: &str, status: OrderStatus, created_at: i64) -> Order {
        let mut o = Order::new(
            id,
            customer,
            vec![OrderItem {
                product_id: "p1".to_string(),
                name: "Item".to_string(),
                quantity: 1,
                unit_price: 10.0,
                category_hint: None,
            }],
        );
        o.status = status;
        o.created_at = created_at;
        o
    }

    #[test]
    fn test_default_filter_matches_everything() {
        let filter = OrderFilter::default();
        assert!(filter.matches(&order("o-1", "c-1", OrderStatus::Pending, 100)));
        assert!(filter.matches(&order("o-2", "c-2", OrderStatus::Cancelled, 999)));
    }

    #[test]
    fn test_filter_by_customer_and_status() {
        let filter = OrderFilter {
            customer_id: Some("c-1".to_string()),
            statuses: Some(vec![OrderStatus::Delivered, OrderStatus::Completed]),
            ..Default::default()
        };
        assert!(filter.matches(&order("o-1", "c-1", OrderStatus::Delivered, 100)));
        assert!(!filter.matches(&order("o-2", "c-2", OrderStatus::Delivered, 100)));
        assert!(!filter.matches(&order("o-3", "c-1", OrderStatus::Pending, 100)));
    }

    #[test]
    fn test_filter_time_bounds_are_since_inclusive_until_exclusive() {
        let filter = OrderFilter {
            since: Some(100),
            until: Some(200),
            ..Default::default()
        };
        assert!(!filter.matches(&order("o-1", "c-1", OrderStatus::Pending, 99)));
        assert!(filter.matches(&order("o-2", "c-1", OrderStatus::Pending, 100)));
        assert!(filter.matches(&order("o-3", "c-1", OrderStatus::Pending, 199)));
        assert!(!filter.matches(&order("o-4", "c-1", OrderStatus::Pending, 200)));
    }
}
