//! Time-bucketed revenue aggregation
//!
//! Produces the dense, gap-free trend series the dashboards chart: hourly
//! buckets for the last-24h view, daily buckets for week/month/custom
//! ranges. Bucket boundaries are computed in the business timezone; the
//! engine itself only sees `i64` Unix millis and the caller-supplied `now`.

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::Order;

use crate::utils::money::{to_decimal, to_f64};
use crate::utils::time::{
    day_end_millis, day_label, day_start_millis, hour_floor_millis, hour_label, local_date,
    HOUR_MILLIS,
};

/// Reporting window selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportWindow {
    /// 24 hourly buckets ending with the hour containing `now`
    Last24Hours,
    /// 7 daily buckets ending today (business timezone)
    Last7Days,
    /// 30 daily buckets ending today
    Last30Days,
    /// One daily bucket per calendar day in `[start, end]`, inclusive
    Custom { start: NaiveDate, end: NaiveDate },
}

impl ReportWindow {
    /// Absolute window bounds, `[start, end)` in Unix millis.
    pub fn bounds(&self, now_millis: i64, tz: Tz) -> (i64, i64) {
        match self {
            ReportWindow::Last24Hours => {
                let end = hour_floor_millis(now_millis) + HOUR_MILLIS;
                (end - 24 * HOUR_MILLIS, end)
            }
            ReportWindow::Last7Days => day_range_bounds(local_date(now_millis, tz), 7, tz),
            ReportWindow::Last30Days => day_range_bounds(local_date(now_millis, tz), 30, tz),
            ReportWindow::Custom { start, end } => {
                (day_start_millis(*start, tz), day_end_millis(*end, tz))
            }
        }
    }
}

fn day_range_bounds(end_date: NaiveDate, days: i64, tz: Tz) -> (i64, i64) {
    let start_date = end_date - Duration::days(days - 1);
    (day_start_millis(start_date, tz), day_end_millis(end_date, tz))
}

/// One slot of the trend series
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrendBucket {
    pub label: String,
    /// Revenue-eligible orders only
    pub revenue: f64,
    /// ALL orders resolving into this bucket, eligible or not — the
    /// dashboards show "orders placed" next to "revenue", so the count is
    /// deliberately unfiltered while the revenue is filtered.
    pub order_count: u32,
}

/// Completion timestamp used for bucket assignment, resolved
/// `delivered_at → updated_at → created_at`, first non-null wins.
/// Orders that never recorded a delivery stamp bucket by their last
/// update — preserved behavior, see DESIGN.md open questions.
pub fn completion_time(order: &Order) -> i64 {
    order
        .delivered_at
        .or(order.updated_at)
        .unwrap_or(order.created_at)
}

/// Aggregate an order slice into the dense trend series for `window`.
///
/// Every bucket of the window is present even when zero. Pure over its
/// inputs: same orders + same `now` ⇒ same series.
pub fn aggregate(orders: &[Order], window: &ReportWindow, now_millis: i64, tz: Tz) -> Vec<TrendBucket> {
    match window {
        ReportWindow::Last24Hours => aggregate_hourly(orders, window, now_millis, tz),
        ReportWindow::Last7Days | ReportWindow::Last30Days | ReportWindow::Custom { .. } => {
            aggregate_daily(orders, window, now_millis, tz)
        }
    }
}

fn aggregate_hourly(orders: &[Order], window: &ReportWindow, now_millis: i64, tz: Tz) -> Vec<TrendBucket> {
    let (start, end) = window.bounds(now_millis, tz);
    let mut revenue = vec![Decimal::ZERO; 24];
    let mut counts = vec![0u32; 24];

    for order in orders {
        let at = completion_time(order);
        if at < start || at >= end {
            continue;
        }
        let idx = ((at - start) / HOUR_MILLIS) as usize;
        counts[idx] += 1;
        if order.status.is_revenue_eligible() {
            revenue[idx] += to_decimal(order.total_amount);
        }
    }

    (0..24)
        .map(|i| TrendBucket {
            label: hour_label(start + i as i64 * HOUR_MILLIS, tz),
            revenue: to_f64(revenue[i]),
            order_count: counts[i],
        })
        .collect()
}

fn aggregate_daily(orders: &[Order], window: &ReportWindow, now_millis: i64, tz: Tz) -> Vec<TrendBucket> {
    let (start_date, end_date) = match window {
        ReportWindow::Last7Days => {
            let today = local_date(now_millis, tz);
            (today - Duration::days(6), today)
        }
        ReportWindow::Last30Days => {
            let today = local_date(now_millis, tz);
            (today - Duration::days(29), today)
        }
        ReportWindow::Custom { start, end } => (*start, *end),
        ReportWindow::Last24Hours => unreachable!("hourly window handled separately"),
    };

    if start_date > end_date {
        // Malformed custom range degrades to an empty series, never an error
        return Vec::new();
    }

    let bucket_count = (end_date - start_date).num_days() as usize + 1;
    let mut revenue = vec![Decimal::ZERO; bucket_count];
    let mut counts = vec![0u32; bucket_count];

    let (start, end) = window.bounds(now_millis, tz);
    for order in orders {
        let at = completion_time(order);
        if at < start || at >= end {
            continue;
        }
        let date = local_date(at, tz);
        let idx = (date - start_date).num_days();
        if idx < 0 || idx as usize >= bucket_count {
            continue;
        }
        counts[idx as usize] += 1;
        if order.status.is_revenue_eligible() {
            revenue[idx as usize] += to_decimal(order.total_amount);
        }
    }

    (0..bucket_count)
        .map(|i| TrendBucket {
            label: day_label(start_date + Duration::days(i as i64)),
            revenue: to_f64(revenue[i]),
            order_count: counts[i],
        })
        .collect()
}
