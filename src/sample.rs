//! Row and sample types shared by the parser, estimator and window selector.

use chrono::{DateTime, Utc};
use serde::Serialize;

pub const ONE_DAY_MS: i64 = 24 * 60 * 60 * 1000;
pub const SEVEN_DAYS_MS: i64 = 7 * ONE_DAY_MS;

static NULL_FIELD: RawField = RawField::Null;

/// A single dynamically typed CSV cell.
#[derive(Debug, Clone, PartialEq)]
pub enum RawField {
    Null,
    Number(f64),
    Bool(bool),
    Text(String),
}

impl RawField {
    /// Types a raw cell the way a spreadsheet export is usually read back:
    /// blanks are null, `true`/`false` are booleans, finite numbers are
    /// numbers and everything else stays text.
    pub fn infer(cell: &str) -> Self {
        let cell = cell.trim();
        match cell {
            "" => RawField::Null,
            "true" | "TRUE" => RawField::Bool(true),
            "false" | "FALSE" => RawField::Bool(false),
            _ => match cell.parse::<f64>() {
                // `str::parse` also accepts "inf" and "NaN"
                Ok(n) if n.is_finite() => RawField::Number(n),
                _ => RawField::Text(cell.to_string()),
            },
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawField::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RawField::Null)
    }
}

/// One positional row from the tabular source. Index 0 is the epoch-seconds
/// timestamp, index 1 the occupancy count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow(pub Vec<RawField>);

impl RawRow {
    pub fn new(fields: Vec<RawField>) -> Self {
        Self(fields)
    }

    /// Returns the field at `index`, reading past the end as [`RawField::Null`].
    pub fn field(&self, index: usize) -> &RawField {
        self.0.get(index).unwrap_or(&NULL_FIELD)
    }

    pub fn time_field(&self) -> &RawField {
        self.field(0)
    }

    pub fn value_field(&self) -> &RawField {
        self.field(1)
    }
}

/// One `(timestamp, occupancy)` observation.
///
/// Only constructed through [`Sample::new`] / [`Sample::from_epoch_secs`],
/// so every sample carries a timestamp that maps onto a calendar time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    timestamp_ms: i64,
    value: f64,
}

impl Sample {
    pub fn new(timestamp_ms: i64, value: f64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp_millis(timestamp_ms)?;
        Some(Self {
            timestamp_ms,
            value,
        })
    }

    pub fn from_epoch_secs(secs: f64, value: f64) -> Option<Self> {
        let ms = (secs * 1000.0).round();
        if !ms.is_finite() || ms < i64::MIN as f64 || ms > i64::MAX as f64 {
            return None;
        }
        Self::new(ms as i64, value)
    }

    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn time(&self) -> DateTime<Utc> {
        // checked in `new`
        DateTime::<Utc>::from_timestamp_millis(self.timestamp_ms).unwrap_or_default()
    }
}
