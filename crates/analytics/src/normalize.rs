//! Monthly-equivalent amounts for income (or anything else with a cadence).

use serde::{Deserialize, Serialize};
use std::fmt;

pub const WEEKLY_MULTIPLIER: f64 = 4.33;
pub const BIWEEKLY_MULTIPLIER: f64 = 2.17;
pub const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Biweekly,
    Monthly,
    Annual,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::Annual => "annual",
        }
    }

    /// Unknown tags are treated as monthly.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "weekly" => Frequency::Weekly,
            "biweekly" => Frequency::Biweekly,
            "annual" => Frequency::Annual,
            _ => Frequency::Monthly,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub fn monthly_equivalent(amount: f64, frequency: Frequency) -> f64 {
    match frequency {
        Frequency::Weekly => amount * WEEKLY_MULTIPLIER,
        Frequency::Biweekly => amount * BIWEEKLY_MULTIPLIER,
        Frequency::Annual => amount / MONTHS_PER_YEAR,
        Frequency::Monthly => amount,
    }
}

pub fn monthly_total<I>(items: I) -> f64
where
    I: IntoIterator<Item = (f64, Frequency)>,
{
    items
        .into_iter()
        .map(|(amount, frequency)| monthly_equivalent(amount, frequency))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_table() {
        assert_eq!(monthly_equivalent(100.0, Frequency::Weekly), 433.0);
        assert_eq!(monthly_equivalent(200.0, Frequency::Biweekly), 434.0);
        assert_eq!(monthly_equivalent(1200.0, Frequency::Annual), 100.0);
        assert_eq!(monthly_equivalent(750.0, Frequency::Monthly), 750.0);
    }

    #[test]
    fn test_zero_amount_is_zero_for_every_frequency() {
        for f in [Frequency::Weekly, Frequency::Biweekly, Frequency::Monthly, Frequency::Annual] {
            assert_eq!(monthly_equivalent(0.0, f), 0.0);
        }
    }

    #[test]
    fn test_weekly_income_monthly_total() {
        assert_eq!(monthly_total([(500.0, Frequency::Weekly)]), 2165.0);
    }

    #[test]
    fn test_mixed_income_monthly_total() {
        let total = monthly_total([
            (3000.0, Frequency::Monthly),
            (12000.0, Frequency::Annual),
            (100.0, Frequency::Weekly),
        ]);
        assert!((total - 4433.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_tag_is_monthly() {
        assert_eq!(Frequency::from_tag("fortnightly"), Frequency::Monthly);
        assert_eq!(Frequency::from_tag(""), Frequency::Monthly);
        assert_eq!(Frequency::from_tag(" Weekly "), Frequency::Weekly);
        assert_eq!(Frequency::from_tag("annual"), Frequency::Annual);
    }

    #[test]
    fn test_tag_round_trip() {
        for f in [Frequency::Weekly, Frequency::Biweekly, Frequency::Monthly, Frequency::Annual] {
            assert_eq!(Frequency::from_tag(f.as_str()), f);
        }
    }
}
