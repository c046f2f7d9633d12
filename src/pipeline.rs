//! Wires parsing, estimation and windowing into one stateless run.
//!
//! Every run works on one fully decoded snapshot and ends in exactly one
//! [`Outcome`]:
//!
//! | Input                        | Presenter call   | Outcome    |
//! |------------------------------|------------------|------------|
//! | fetch or decode error        | `render_error`   | `Failed`   |
//! | no valid samples             | none             | `Empty`    |
//! | at least one valid sample    | `render`         | `Rendered` |

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::fetch::{HttpClient, load_source};
use crate::output::{Presenter, print_pretty};
use crate::parser::{decode_table, parse_samples};
use crate::sample::{RawRow, Sample};
use crate::stats::ArrivalStats;
use crate::window::{WindowPoint, latest_timestamp, select_at};

/// User-facing message for transport and decode failures.
pub const ERROR_MESSAGE: &str = "Error loading graph data.";

/// Everything the presentation layer needs from one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub stats: ArrivalStats,
    pub window: Vec<WindowPoint>,
    pub latest: DateTime<Utc>,
    pub sample_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Rendered,
    Empty,
    Failed,
}

/// Loads the snapshot at `source` and decodes it into raw rows.
///
/// # Errors
///
/// Returns an error on any transport or decode failure. Malformed rows are
/// not errors; they are dropped later by the sample parser.
#[tracing::instrument(skip(client))]
pub async fn fetch_rows<C: HttpClient>(client: &C, source: &str) -> Result<Vec<RawRow>> {
    let bytes = load_source(client, source).await?;
    decode_table(&bytes)
}

/// Parses `rows` and derives the statistics and the recent window.
///
/// Returns `None` when no row yields a valid sample.
#[tracing::instrument(skip_all, fields(rows = rows.len()))]
pub fn build_dashboard(rows: &[RawRow]) -> Option<Dashboard> {
    let samples = parse_samples(rows);
    let dashboard = dashboard_from_samples(&samples);

    if dashboard.is_none() {
        warn!("No valid data found");
    }
    dashboard
}

/// Derives a [`Dashboard`] from already parsed samples.
pub fn dashboard_from_samples(samples: &[Sample]) -> Option<Dashboard> {
    let latest_ms = latest_timestamp(samples)?;
    let latest = DateTime::<Utc>::from_timestamp_millis(latest_ms)?;

    let stats = ArrivalStats::estimate_at(samples, latest_ms);
    let window = select_at(samples, latest_ms);

    info!(
        samples = samples.len(),
        window_len = window.len(),
        latest = %latest,
        "Dashboard built"
    );

    Some(Dashboard {
        stats,
        window,
        latest,
        sample_count: samples.len(),
    })
}

/// Runs the pipeline on a fetched snapshot and hands the result to `presenter`.
pub fn publish<P: Presenter>(fetched: Result<Vec<RawRow>>, presenter: &mut P) -> Outcome {
    let rows = match fetched {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Error fetching data");
            return report_failure(presenter);
        }
    };

    let Some(dashboard) = build_dashboard(&rows) else {
        return Outcome::Empty;
    };
    print_pretty(&dashboard);

    match presenter.render(&dashboard) {
        Ok(()) => Outcome::Rendered,
        Err(e) => {
            error!(error = %e, "Failed to render dashboard");
            Outcome::Failed
        }
    }
}

fn report_failure<P: Presenter>(presenter: &mut P) -> Outcome {
    if let Err(e) = presenter.render_error(ERROR_MESSAGE) {
        error!(error = %e, "Failed to render error message");
    }
    Outcome::Failed
}
