//! Risk arithmetic over a single country's year series.
//!
//! Pure downstream helpers for consumers of the reconciled tables; no
//! rendering, no table mutation. All functions take the aligned optional
//! series as produced by [`YearTable::country_series`] and handle missing
//! cells explicitly.
//!
//! [`YearTable::country_series`]: crate::table::YearTable::country_series

use serde::Serialize;

/// Summary metrics for one country's series. A field is `None` when the
/// series has too few present values to support it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskMetrics {
    /// Coefficient of variation: population std dev over mean. `None`
    /// when fewer than two values are present or the mean is zero.
    pub volatility: Option<f64>,
    /// 5th percentile of the present values (value at risk, 95%).
    pub var_95: Option<f64>,
    /// Most recent present value.
    pub exposure: Option<f64>,
    /// Share of negative year-over-year moves, in percent. Needs more
    /// than two present values.
    pub loss_probability: Option<f64>,
}

/// Year-over-year percentage change, aligned with the input. The change
/// at each slot is taken against the last present value before it; slots
/// with a missing current value (and the first slot) yield `None`.
pub fn pct_changes(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;

    for value in values {
        let change = match (prev, value) {
            (Some(p), Some(c)) if p != 0.0 => Some((c - p) / p * 100.0),
            _ => None,
        };
        out.push(change);
        if value.is_some() {
            prev = *value;
        }
    }

    out
}

pub fn risk_metrics(values: &[Option<f64>]) -> RiskMetrics {
    let clean: Vec<f64> = values.iter().filter_map(|v| *v).collect();

    if clean.len() < 2 {
        return RiskMetrics {
            volatility: None,
            var_95: None,
            exposure: clean.last().copied(),
            loss_probability: None,
        };
    }

    let m = mean(&clean);
    let volatility = if m != 0.0 {
        Some(std_pop(&clean, m) / m)
    } else {
        None
    };

    let mut sorted = clean.clone();
    sorted.sort_by(f64::total_cmp);
    let var_95 = Some(percentile(&sorted, 5.0));

    let loss_probability = if clean.len() > 2 {
        let changes: Vec<f64> = pct_changes(values).into_iter().flatten().collect();
        if changes.is_empty() {
            None
        } else {
            let losses = changes.iter().filter(|c| **c < 0.0).count();
            Some(losses as f64 / changes.len() as f64 * 100.0)
        }
    } else {
        None
    };

    RiskMetrics {
        volatility,
        var_95,
        exposure: clean.last().copied(),
        loss_probability,
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_pop(values: &[f64], mean: f64) -> f64 {
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

// Linearly interpolated percentile over a sorted slice, `p` in 0..=100.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (rank - lo as f64) * (sorted[hi] - sorted[lo])
    }
}
