use serde::Serialize;

use crate::sample::{ONE_DAY_MS, SEVEN_DAYS_MS, Sample};
use crate::window::latest_timestamp;

/// Arrival estimates derived from positive deltas between consecutive
/// occupancy counts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalStats {
    #[serde(rename = "arrivals24h")]
    pub arrivals_24h: f64,
    #[serde(rename = "peak24h")]
    pub peak_24h: f64,
    #[serde(rename = "arrivals7d")]
    pub arrivals_7d: f64,
    pub arrivals_total: f64,
}

impl ArrivalStats {
    /// Estimates arrivals relative to the latest sample in `samples`.
    ///
    /// An empty slice yields all zeros.
    pub fn estimate(samples: &[Sample]) -> Self {
        match latest_timestamp(samples) {
            Some(latest) => Self::estimate_at(samples, latest),
            None => Self::default(),
        }
    }

    /// Estimates arrivals with ages measured back from `latest_ms`.
    ///
    /// An increase in occupancy counts as new arrivals and a decrease counts
    /// as none. The first sample is compared against a baseline of zero.
    pub fn estimate_at(samples: &[Sample], latest_ms: i64) -> Self {
        let mut sorted = samples.to_vec();
        sorted.sort_by_key(Sample::timestamp_ms);

        let (stats, _) = sorted
            .iter()
            .fold((Self::default(), 0.0), |(mut s, prev), sample| {
                let value = sample.value();
                let delta = (value - prev).max(0.0);
                let age = latest_ms - sample.timestamp_ms();

                s.arrivals_total += delta;
                if age <= SEVEN_DAYS_MS {
                    s.arrivals_7d += delta;
                }
                if age <= ONE_DAY_MS {
                    s.arrivals_24h += delta;
                    s.peak_24h = s.peak_24h.max(value);
                }

                (s, value)
            });

        stats
    }
}
