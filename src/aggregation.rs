//! Aggregation Layer
//!
//! Per-state counts and series derived from the joined events. Everything
//! here is recomputed on demand from the read-only event table.

use std::collections::BTreeMap;

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};
use thiserror::Error;

use crate::types::EarthquakeEvent;

/// Upper bound on the number of histogram bins for one selection.
pub const MAX_HISTOGRAM_BINS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AggregationError {
    #[error("Histogram bin width must be positive and finite, got {0}")]
    InvalidBinWidth(f64),

    #[error("Magnitude range {min}..{max} needs more than {limit} bins of width {bin_width}")]
    TooManyBins {
        min: f64,
        max: f64,
        bin_width: f64,
        limit: usize,
    },
}

/// One fixed-width histogram bin: `[lower_bound, lower_bound + width)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower_bound: f64,
    pub count: usize,
}

/// One (distance, magnitude) point of the scatter plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub distance_km: f64,
    pub magnitude: f64,
}

/// Pearson correlation between distance and magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Correlation {
    pub r: f64,
    pub r_squared: f64,
    /// Two-tailed p-value (Student's t, n-2 degrees of freedom)
    pub p_value: f64,
    pub sample_count: usize,
}

/// Number of events per state. States with no events are absent.
pub fn count_by_state<'a, I>(events: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a EarthquakeEvent>,
{
    let mut counts = BTreeMap::new();
    for event in events {
        *counts.entry(event.state.clone()).or_insert(0) += 1;
    }
    counts
}

/// State counts ordered by descending count, ties by state code.
pub fn state_counts_by_frequency<'a, I>(events: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a EarthquakeEvent>,
{
    let mut counts: Vec<_> = count_by_state(events).into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

/// Events whose state equals `state`, in their original order.
pub fn filter_by_state<'a>(events: &'a [EarthquakeEvent], state: &str) -> Vec<&'a EarthquakeEvent> {
    events.iter().filter(|e| e.state == state).collect()
}

/// Sorted, deduplicated state codes (dropdown options).
pub fn distinct_states(events: &[EarthquakeEvent]) -> Vec<String> {
    count_by_state(events).into_keys().collect()
}

/// Fixed-width magnitude histogram anchored at the minimum magnitude.
///
/// Bins are contiguous from the first to the last occupied one; events
/// without a magnitude are ignored.
pub fn magnitude_histogram_bins<'a, I>(
    events: I,
    bin_width: f64,
) -> Result<Vec<HistogramBin>, AggregationError>
where
    I: IntoIterator<Item = &'a EarthquakeEvent>,
{
    if !bin_width.is_finite() || bin_width <= 0.0 {
        return Err(AggregationError::InvalidBinWidth(bin_width));
    }

    let magnitudes: Vec<f64> = events
        .into_iter()
        .filter_map(|e| e.magnitude)
        .filter(|m| m.is_finite())
        .collect();

    let (Some(min), Some(max)) = (
        magnitudes.iter().copied().reduce(f64::min),
        magnitudes.iter().copied().reduce(f64::max),
    ) else {
        return Ok(Vec::new());
    };

    // Infinite when the range overflows f64.
    let last_index = ((max - min) / bin_width).floor();
    if !last_index.is_finite() || last_index >= MAX_HISTOGRAM_BINS as f64 {
        return Err(AggregationError::TooManyBins {
            min,
            max,
            bin_width,
            limit: MAX_HISTOGRAM_BINS,
        });
    }

    let bin_count = last_index as usize + 1;
    let index_of = |m: f64| (((m - min) / bin_width).floor() as usize).min(bin_count - 1);

    let mut counts = vec![0usize; bin_count];
    for &m in &magnitudes {
        counts[index_of(m)] += 1;
    }

    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower_bound: min + i as f64 * bin_width,
            count,
        })
        .collect())
}

/// Distance (x) vs magnitude (y) points; events without a magnitude are skipped.
pub fn scatter_series<'a, I>(events: I) -> Vec<ScatterPoint>
where
    I: IntoIterator<Item = &'a EarthquakeEvent>,
{
    events
        .into_iter()
        .filter_map(|e| {
            e.magnitude.map(|magnitude| ScatterPoint {
                distance_km: e.nearest_site_distance_km,
                magnitude,
            })
        })
        .collect()
}

/// Pearson correlation of distance vs magnitude with a t-test p-value.
///
/// `None` below `min_samples` (never fewer than 3) or when either series is
/// constant.
pub fn distance_magnitude_correlation<'a, I>(events: I, min_samples: usize) -> Option<Correlation>
where
    I: IntoIterator<Item = &'a EarthquakeEvent>,
{
    let points = scatter_series(events);
    let n = points.len();
    if n < min_samples.max(3) {
        return None;
    }

    let x: Vec<f64> = points.iter().map(|p| p.distance_km).collect();
    let y: Vec<f64> = points.iter().map(|p| p.magnitude).collect();
    let r = pearson(&x, &y)?;

    Some(Correlation {
        r,
        r_squared: r * r,
        p_value: p_value_for_r(r, n),
        sample_count: n,
    })
}

/// r = Σ[(xi - x̄)(yi - ȳ)] / sqrt(Σ(xi - x̄)² × Σ(yi - ȳ)²)
fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 {
        return None;
    }
    Some((cov / denominator).clamp(-1.0, 1.0))
}

/// t = r·sqrt(n-2) / sqrt(1-r²), two-tailed.
fn p_value_for_r(r: f64, n: usize) -> f64 {
    if r.abs() >= 0.9999 {
        return 0.0;
    }
    let df = (n - 2) as f64;
    let t_stat = r * df.sqrt() / (1.0 - r * r).sqrt();
    match StudentsT::new(0.0, 1.0, df) {
        Ok(t_dist) => 2.0 * (1.0 - t_dist.cdf(t_stat.abs())),
        Err(_) => 1.0,
    }
}
