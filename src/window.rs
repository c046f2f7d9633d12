//! Recent-window selection for charting.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::sample::{ONE_DAY_MS, Sample};

/// A charted point: calendar time and raw occupancy value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowPoint {
    pub time: DateTime<Utc>,
    pub value: f64,
}

impl WindowPoint {
    pub fn timestamp_ms(&self) -> i64 {
        self.time.timestamp_millis()
    }
}

/// Returns the largest timestamp in `samples`, the reference point for both
/// the window and the arrival estimates.
pub fn latest_timestamp(samples: &[Sample]) -> Option<i64> {
    samples.iter().map(Sample::timestamp_ms).max()
}

/// Selects the last 24 hours of `samples`, anchored to the latest sample.
pub fn select(samples: &[Sample]) -> Vec<WindowPoint> {
    match latest_timestamp(samples) {
        Some(latest) => select_at(samples, latest),
        None => Vec::new(),
    }
}

/// Selects samples no older than one day before `latest_ms`, sorted
/// ascending by time. Ties keep their input order.
pub fn select_at(samples: &[Sample], latest_ms: i64) -> Vec<WindowPoint> {
    let cutoff = latest_ms - ONE_DAY_MS;

    let mut recent: Vec<&Sample> = samples
        .iter()
        .filter(|s| s.timestamp_ms() >= cutoff)
        .collect();
    recent.sort_by_key(|s| s.timestamp_ms());

    recent
        .into_iter()
        .map(|s| WindowPoint {
            time: s.time(),
            value: s.value(),
        })
        .collect()
}
