//! Presentation of pipeline results.
//!
//! Supports a plain-text terminal view and a JSON document carrying the
//! formatted statistics and a [`ChartDocument`].

use anyhow::Result;
use chrono::FixedOffset;
use serde::Serialize;
use std::io::Write;
use tracing::debug;

use crate::chart::{ChartDocument, time_of_day};
use crate::pipeline::Dashboard;
use crate::stats::ArrivalStats;

const BAR_WIDTH: f64 = 40.0;

/// Display surface for one pipeline run.
pub trait Presenter {
    fn render(&mut self, dashboard: &Dashboard) -> Result<()>;
    fn render_error(&mut self, message: &str) -> Result<()>;
}

/// The four statistics as grouped integer strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedStats {
    #[serde(rename = "arrivals24h")]
    pub arrivals_24h: String,
    #[serde(rename = "peak24h")]
    pub peak_24h: String,
    #[serde(rename = "arrivals7d")]
    pub arrivals_7d: String,
    pub arrivals_total: String,
}

impl From<&ArrivalStats> for FormattedStats {
    fn from(stats: &ArrivalStats) -> Self {
        FormattedStats {
            arrivals_24h: format_count(stats.arrivals_24h),
            peak_24h: format_count(stats.peak_24h),
            arrivals_7d: format_count(stats.arrivals_7d),
            arrivals_total: format_count(stats.arrivals_total),
        }
    }
}

/// Rounds `value` to an integer and groups its digits in threes.
pub fn format_count(value: f64) -> String {
    let rounded = value.round();
    if rounded == 0.0 {
        return "0".to_string();
    }

    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Logs a dashboard using Rust's debug pretty-print format.
pub fn print_pretty(dashboard: &Dashboard) {
    debug!("{:#?}", dashboard);
}

/// Writes labelled statistics and, unless disabled, one bar per window point.
pub struct TextPresenter<W> {
    out: W,
    tz: FixedOffset,
    with_series: bool,
}

impl<W: Write> TextPresenter<W> {
    pub fn new(out: W, tz: FixedOffset) -> Self {
        Self {
            out,
            tz,
            with_series: true,
        }
    }

    pub fn stats_only(mut self) -> Self {
        self.with_series = false;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn render(&mut self, dashboard: &Dashboard) -> Result<()> {
        let formatted = FormattedStats::from(&dashboard.stats);
        writeln!(self.out, "{:<16}{}", "Arrivals (24h)", formatted.arrivals_24h)?;
        writeln!(self.out, "{:<16}{}", "Peak (24h)", formatted.peak_24h)?;
        writeln!(self.out, "{:<16}{}", "Arrivals (7d)", formatted.arrivals_7d)?;
        writeln!(self.out, "{:<16}{}", "Arrivals (all)", formatted.arrivals_total)?;

        if self.with_series && !dashboard.window.is_empty() {
            let max = dashboard
                .window
                .iter()
                .map(|p| p.value)
                .fold(0.0_f64, f64::max);

            writeln!(self.out)?;
            for point in &dashboard.window {
                let bar = if max > 0.0 {
                    (point.value.max(0.0) / max * BAR_WIDTH).round() as usize
                } else {
                    0
                };
                writeln!(
                    self.out,
                    "{}  {:>8}  {}",
                    time_of_day(point.timestamp_ms(), &self.tz),
                    format_count(point.value),
                    "#".repeat(bar)
                )?;
            }
        }

        self.out.flush()?;
        Ok(())
    }

    fn render_error(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "{message}")?;
        self.out.flush()?;
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    stats: FormattedStats,
    raw: &'a ArrivalStats,
    latest: chrono::DateTime<chrono::Utc>,
    sample_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    chart: Option<ChartDocument>,
}

/// Writes the dashboard as pretty-printed JSON.
pub struct JsonPresenter<W> {
    out: W,
    tz: FixedOffset,
    with_chart: bool,
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(out: W, tz: FixedOffset) -> Self {
        Self {
            out,
            tz,
            with_chart: true,
        }
    }

    pub fn stats_only(mut self) -> Self {
        self.with_chart = false;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn render(&mut self, dashboard: &Dashboard) -> Result<()> {
        let doc = JsonDocument {
            stats: FormattedStats::from(&dashboard.stats),
            raw: &dashboard.stats,
            latest: dashboard.latest,
            sample_count: dashboard.sample_count,
            chart: self
                .with_chart
                .then(|| ChartDocument::build(&dashboard.window, &self.tz)),
        };
        serde_json::to_writer_pretty(&mut self.out, &doc)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }

    fn render_error(&mut self, message: &str) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, &serde_json::json!({ "error": message }))?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
