//! CSV decoder and sample parser for occupancy feeds.

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use tracing::debug;

use crate::sample::{RawField, RawRow, Sample};

/// Decodes a header-less CSV payload into positional [`RawRow`]s.
///
/// Blank lines are skipped and rows may have any number of fields.
///
/// # Errors
///
/// Returns an error if the payload is not UTF-8 or is not readable as CSV.
pub fn decode_table(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let text = std::str::from_utf8(bytes).context("CSV payload is not valid UTF-8")?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.context("Failed to decode CSV record")?;
        rows.push(RawRow::new(record.iter().map(RawField::infer).collect()));
    }

    debug!(rows = rows.len(), "CSV payload decoded");
    Ok(rows)
}

/// Converts raw rows into samples, keeping input order.
///
/// Malformed rows are dropped silently: see [`is_present_time`] for the time
/// field, and the value field must be a number.
pub fn parse_samples(rows: &[RawRow]) -> Vec<Sample> {
    let samples: Vec<Sample> = rows.iter().filter_map(parse_row).collect();

    let dropped = rows.len() - samples.len();
    if dropped > 0 {
        debug!(dropped, samples = samples.len(), "Dropped malformed rows");
    }

    samples
}

fn parse_row(row: &RawRow) -> Option<Sample> {
    let secs = row.time_field().as_number().filter(|n| is_present_time(*n))?;
    let value = row.value_field().as_number()?;
    Sample::from_epoch_secs(secs, value)
}

/// A timestamp counts as present only when it is non-zero.
///
/// Epoch zero is indistinguishable from an absent timestamp in the source
/// feed, so a row stamped exactly `0` is treated as missing.
pub fn is_present_time(secs: f64) -> bool {
    secs != 0.0
}
