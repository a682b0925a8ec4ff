//! Revenue & sales reporting
//!
//! Pure, read-only computation over a caller-supplied order snapshot;
//! nothing here mutates its input or holds shared state, so concurrent
//! reporting requests need no coordination.
//!
//! # Pipeline
//!
//! ```text
//! window → scope orders → revenue split → trend buckets
//!                              ├─ dominant category per order
//!                              └─ top-seller ranking
//! ```

pub mod category;
pub mod ranking;
pub mod report;
pub mod revenue;
pub mod timeline;

// Re-exports
pub use category::{resolve_dominant_category, resolve_item_category, CatalogIndex, FALLBACK_CATEGORY};
pub use ranking::{rank, TopProduct, DEFAULT_TOP_LIMIT};
pub use report::{build_sales_report, CategorySale, Overview, SalesReport};
pub use revenue::{attribute, RevenueSummary};
pub use timeline::{aggregate, completion_time, ReportWindow, TrendBucket};
