//! Engine configuration
//!
//! # 环境变量
//!
//! 所有配置项都可以通过环境变量覆盖：
//!
//! | 环境变量 | 默认值 | 说明 |
//! |----------|--------|------|
//! | PAYOUT_RATE | 0.85 | 卖家分成比例 (0, 1] |
//! | TOP_SELLER_LIMIT | 10 | 畅销排行条数 |
//! | BUSINESS_TIMEZONE | UTC | 业务时区 (IANA 名称) |

use chrono_tz::Tz;

use crate::reporting::ranking::DEFAULT_TOP_LIMIT;

/// Fraction of gross order value paid out to the seller; the complement
/// is the platform fee.
pub const DEFAULT_PAYOUT_RATE: f64 = 0.85;

#[derive(Debug, Clone)]
pub struct FulfillmentConfig {
    /// Seller payout fraction, within (0, 1]
    pub payout_rate: f64,
    /// Ranking depth for top-seller lists
    pub top_seller_limit: usize,
    /// Business timezone for bucket boundaries
    pub timezone: Tz,
}

impl Default for FulfillmentConfig {
    fn default() -> Self {
        Self {
            payout_rate: DEFAULT_PAYOUT_RATE,
            top_seller_limit: DEFAULT_TOP_LIMIT,
            timezone: Tz::UTC,
        }
    }
}

impl FulfillmentConfig {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或非法，使用默认值。
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let payout_rate = std::env::var("PAYOUT_RATE")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|r| {
                let valid = *r > 0.0 && *r <= 1.0;
                if !valid {
                    tracing::warn!(rate = r, "PAYOUT_RATE outside (0, 1], falling back to default");
                }
                valid
            })
            .unwrap_or(defaults.payout_rate);

        let top_seller_limit = std::env::var("TOP_SELLER_LIMIT")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.top_seller_limit);

        let timezone = std::env::var("BUSINESS_TIMEZONE")
            .ok()
            .and_then(|v| {
                v.parse::<Tz>()
                    .map_err(|_| tracing::warn!(tz = %v, "Unknown BUSINESS_TIMEZONE, falling back to UTC"))
                    .ok()
            })
            .unwrap_or(defaults.timezone);

        Self {
            payout_rate,
            top_seller_limit,
            timezone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FulfillmentConfig::default();
        assert_eq!(config.payout_rate, 0.85);
        assert_eq!(config.top_seller_limit, 10);
        assert_eq!(config.timezone, Tz::UTC);
    }
}
