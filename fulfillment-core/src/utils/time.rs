//! 时间工具函数 — 业务时区转换
//!
//! 所有日期→时间戳转换统一在调用方边界完成，
//! 聚合层只接收 `i64` Unix millis。

use chrono::{DateTime, NaiveDate, TimeZone, Timelike};
use chrono_tz::Tz;

/// 一小时的毫秒数
pub const HOUR_MILLIS: i64 = 3_600_000;

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// 日期 + 时分秒 → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn date_hms_to_millis(date: NaiveDate, hour: u32, min: u32, sec: u32, tz: Tz) -> i64 {
    let naive = date.and_hms_opt(hour, min, sec).unwrap();
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期开始 (00:00:00) → Unix millis (业务时区)
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    date_hms_to_millis(date, 0, 0, 0, tz)
}

/// 日期结束 → 次日 00:00:00 的 Unix millis (业务时区)
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    date_hms_to_millis(next_day, 0, 0, 0, tz)
}

/// Unix millis → 业务时区的本地日历日期
pub fn local_date(millis: i64, tz: Tz) -> NaiveDate {
    to_local(millis, tz).date_naive()
}

/// Floor a timestamp to the start of its hour (absolute time).
pub fn hour_floor_millis(millis: i64) -> i64 {
    millis.div_euclid(HOUR_MILLIS) * HOUR_MILLIS
}

/// Trend label for an hourly bucket boundary: local calendar hour, "%H:00"
pub fn hour_label(bucket_start_millis: i64, tz: Tz) -> String {
    format!("{:02}:00", to_local(bucket_start_millis, tz).hour())
}

/// Trend label for a daily bucket: "%m-%d"
pub fn day_label(date: NaiveDate) -> String {
    date.format("%m-%d").to_string()
}

fn to_local(millis: i64, tz: Tz) -> DateTime<Tz> {
    tz.timestamp_millis_opt(millis)
        .latest()
        .unwrap_or_else(|| tz.timestamp_millis_opt(0).unwrap())
}
