//! Half-over-half trend and the coefficient-of-variation recurring check.

use crate::{AnalyticsConfig, mean};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendEstimate {
    pub trend_percent: f64,
    /// `None` when the series is empty or its mean is zero.
    pub coefficient_of_variation: Option<f64>,
    pub is_recurring: bool,
}

/// Percent change from the mean of the first half to the mean of the second.
///
/// The split is at `len / 2`, so an odd-length series gives the extra point to
/// the second half. Series shorter than two points, or whose first half
/// averages zero, have a trend of 0.
pub fn trend_percent(series: &[f64]) -> f64 {
    let half = series.len() / 2;
    if half == 0 {
        return 0.0;
    }

    let (earlier, later) = series.split_at(half);
    match (mean(earlier), mean(later)) {
        (Some(e), Some(l)) if e != 0.0 => (l - e) / e * 100.0,
        _ => 0.0,
    }
}

/// Population standard deviation over the mean.
pub fn coefficient_of_variation(series: &[f64]) -> Option<f64> {
    let m = mean(series)?;
    if m == 0.0 {
        return None;
    }

    let variance = series.iter().map(|v| (v - m).powi(2)).sum::<f64>() / series.len() as f64;
    Some(variance.sqrt() / m)
}

pub fn is_recurring(series: &[f64], cfg: &AnalyticsConfig) -> bool {
    if series.len() < cfg.recurring_min_observations {
        return false;
    }
    coefficient_of_variation(series)
        .map(|cv| cv < cfg.recurring_cv_threshold)
        .unwrap_or(false)
}

pub fn estimate_trend(series: &[f64], cfg: &AnalyticsConfig) -> TrendEstimate {
    TrendEstimate {
        trend_percent: trend_percent(series),
        coefficient_of_variation: coefficient_of_variation(series),
        is_recurring: is_recurring(series, cfg),
    }
}
