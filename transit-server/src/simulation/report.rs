//! Summary statistics and views over simulation output.
//!
//! These are the numbers the interval and wait-time histograms are drawn
//! from; rendering itself happens elsewhere.

use chrono::Duration;
use serde::Serialize;

use super::WaitRecord;
use crate::domain::ClockTime;

/// Count, mean and range of a column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// Summarise `values`. Returns `None` when there is nothing to summarise.
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        Some(Self {
            count: values.len(),
            mean,
            min,
            max,
        })
    }
}

/// One equal-width histogram bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Bin `values` into `bins` equal-width bins spanning `[min, max]`.
///
/// Bins are half-open except the last, which also holds `max`. When every
/// value is equal there is a single bin holding all of them.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let Some(summary) = Summary::of(values) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }

    let (min, max) = (summary.min, summary.max);
    if max <= min {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: values.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut result: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for &v in values {
        let idx = (((v - min) / width).floor() as usize).min(bins - 1);
        result[idx].count += 1;
    }
    result
}

/// Records whose passenger arrival falls within `[start, start + duration]`.
///
/// Both ends are inclusive and compared at whole-second precision, matching
/// the times the wait table shows.
pub fn wait_block(records: &[WaitRecord], start: ClockTime, duration: Duration) -> Vec<WaitRecord> {
    let from = start.truncate_to_second().minutes();
    let to = from + duration.num_seconds() as f64 / 60.0;
    records
        .iter()
        .filter(|r| {
            let t = r.passenger_arrival.truncate_to_second().minutes();
            t >= from && t <= to
        })
        .cloned()
        .collect()
}
