//! Loyalty tier classification.
//!
//! The tier is derived, never stored: every outward-facing conversion recomputes
//! it from the customer's annual spend and purchase recency. `now` is always an
//! argument so the table stays deterministic under test.

use chrono::{DateTime, Months, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const PLATINUM_SPEND: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);
const GOLD_SPEND: Decimal = Decimal::from_parts(1_000, 0, 0, false, 0);
const PLATINUM_WINDOW_MONTHS: u32 = 6;
const GOLD_WINDOW_MONTHS: u32 = 12;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Silver,
    Gold,
    Platinum,
}

impl Tier {
    /// Decision table, first match wins:
    ///
    /// 1. no recorded spend -> Silver
    /// 2. spend >= 10000 and a purchase strictly within the last 6 calendar
    ///    months -> Platinum, otherwise Silver
    /// 3. spend >= 1000 and a purchase strictly within the last 12 calendar
    ///    months -> Gold, otherwise Silver
    /// 4. Silver
    ///
    /// A qualifying spend with a stale purchase drops straight to Silver, not
    /// one level down. A purchase exactly on the window boundary does not count
    /// as recent.
    pub fn classify(
        annual_spend: Option<Decimal>,
        last_purchase_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        let Some(spend) = annual_spend else {
            return Self::Silver;
        };

        if spend >= PLATINUM_SPEND {
            if purchased_within(last_purchase_date, now, PLATINUM_WINDOW_MONTHS) {
                Self::Platinum
            } else {
                Self::Silver
            }
        } else if spend >= GOLD_SPEND {
            if purchased_within(last_purchase_date, now, GOLD_WINDOW_MONTHS) {
                Self::Gold
            } else {
                Self::Silver
            }
        } else {
            Self::Silver
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Silver => "SILVER",
            Self::Gold => "GOLD",
            Self::Platinum => "PLATINUM",
        }
    }
}

fn purchased_within(
    last_purchase_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    months: u32,
) -> bool {
    match (last_purchase_date, now.checked_sub_months(Months::new(months))) {
        (Some(purchased), Some(cutoff)) => purchased > cutoff,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Months, TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::Tier;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 15, 12, 0, 0).single().expect("valid timestamp")
    }

    fn months_ago(months: u32) -> DateTime<Utc> {
        now().checked_sub_months(Months::new(months)).expect("in range")
    }

    fn spend(value: i64) -> Option<Decimal> {
        Some(Decimal::new(value, 0))
    }

    #[test]
    fn missing_spend_is_silver_regardless_of_recency() {
        assert_eq!(Tier::classify(None, Some(months_ago(1)), now()), Tier::Silver);
        assert_eq!(Tier::classify(None, None, now()), Tier::Silver);
    }

    #[test]
    fn low_spend_is_silver_regardless_of_recency() {
        assert_eq!(Tier::classify(spend(999), Some(months_ago(1)), now()), Tier::Silver);
        assert_eq!(Tier::classify(spend(0), None, now()), Tier::Silver);
    }

    #[test]
    fn high_spend_with_recent_purchase_is_platinum() {
        assert_eq!(Tier::classify(spend(10_000), Some(months_ago(5)), now()), Tier::Platinum);
        assert_eq!(Tier::classify(spend(15_000), Some(months_ago(3)), now()), Tier::Platinum);
    }

    #[test]
    fn platinum_window_boundary_is_exclusive() {
        assert_eq!(Tier::classify(spend(10_000), Some(months_ago(6)), now()), Tier::Silver);
    }

    #[test]
    fn stale_high_spend_drops_to_silver_not_gold() {
        // 7 months ago is inside the 12-month gold window, but a platinum-level
        // spender with a stale purchase floors at silver.
        assert_eq!(Tier::classify(spend(10_000), Some(months_ago(7)), now()), Tier::Silver);
    }

    #[test]
    fn mid_spend_with_recent_purchase_is_gold() {
        assert_eq!(Tier::classify(spend(1_000), Some(months_ago(11)), now()), Tier::Gold);
        assert_eq!(Tier::classify(spend(5_000), Some(months_ago(2)), now()), Tier::Gold);
    }

    #[test]
    fn gold_window_boundary_is_exclusive() {
        assert_eq!(Tier::classify(spend(1_000), Some(months_ago(12)), now()), Tier::Silver);
    }

    #[test]
    fn expired_gold_eligibility_is_silver() {
        assert_eq!(Tier::classify(spend(5_000), Some(months_ago(13)), now()), Tier::Silver);
    }

    #[test]
    fn qualifying_spend_without_any_purchase_is_silver() {
        assert_eq!(Tier::classify(spend(5_000), None, now()), Tier::Silver);
        assert_eq!(Tier::classify(spend(20_000), None, now()), Tier::Silver);
    }

    #[test]
    fn serializes_in_wire_casing() {
        assert_eq!(serde_json::to_string(&Tier::Platinum).expect("serialize"), "\"PLATINUM\"");
        assert_eq!(Tier::Gold.as_str(), "GOLD");
    }
}
