//! Line-chart description of the recent window.
//!
//! [`ChartDocument`] carries everything a charting front end needs to draw
//! the occupancy curve: the points, hourly axis ticks, tooltip labels in
//! local time and the fill styling. It serializes to JSON as-is.

use chrono::FixedOffset;
use serde::Serialize;

use crate::window::WindowPoint;

pub const MAX_TICKS: i64 = 8;
pub const TIME_OF_DAY_FORMAT: &str = "%H:%M";

const HOUR_MS: i64 = 60 * 60 * 1000;

#[derive(Debug, Clone, Serialize)]
pub struct ChartDocument {
    pub kind: &'static str,
    pub legend: bool,
    pub dataset: Dataset,
    pub points: Vec<ChartPoint>,
    pub tooltip: Tooltip,
    pub x_axis: TimeAxis,
    pub y_axis: ValueAxis,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    pub label: &'static str,
    pub border_color: &'static str,
    pub border_width: u32,
    pub point_radius: u32,
    pub point_hover_radius: u32,
    pub tension: f64,
    pub fill: Gradient,
}

/// Vertical gradient under the curve, from `top` down to `bottom`.
#[derive(Debug, Clone, Serialize)]
pub struct Gradient {
    pub top: &'static str,
    pub bottom: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// Milliseconds since the epoch.
    pub x: i64,
    pub y: f64,
    /// Local time-of-day shown in the tooltip.
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Tooltip {
    pub time_format: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartTick {
    pub x: i64,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeAxis {
    pub unit: &'static str,
    pub display_format: &'static str,
    pub max_ticks: i64,
    pub ticks: Vec<ChartTick>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValueAxis {
    pub begin_at_zero: bool,
}

impl ChartDocument {
    /// Builds the chart for an ascending window, labelling times in `tz`.
    pub fn build(window: &[WindowPoint], tz: &FixedOffset) -> Self {
        let points = window
            .iter()
            .map(|p| ChartPoint {
                x: p.timestamp_ms(),
                y: p.value,
                label: time_of_day(p.timestamp_ms(), tz),
            })
            .collect();

        let ticks = match (window.first(), window.last()) {
            (Some(first), Some(last)) => hour_ticks(first.timestamp_ms(), last.timestamp_ms(), tz),
            _ => Vec::new(),
        };

        ChartDocument {
            kind: "line",
            legend: false,
            dataset: Dataset {
                label: "Visitors Detected",
                border_color: "#00b0ff",
                border_width: 1,
                point_radius: 0,
                point_hover_radius: 6,
                tension: 0.4,
                fill: Gradient {
                    top: "rgba(0, 176, 255, 0.8)",
                    bottom: "rgba(0, 176, 255, 0.2)",
                },
            },
            points,
            tooltip: Tooltip {
                time_format: TIME_OF_DAY_FORMAT,
            },
            x_axis: TimeAxis {
                unit: "hour",
                display_format: "HH:mm",
                max_ticks: MAX_TICKS,
                ticks,
            },
            y_axis: ValueAxis {
                begin_at_zero: true,
            },
        }
    }
}

/// Formats `timestamp_ms` as `HH:MM` in `tz`.
pub fn time_of_day(timestamp_ms: i64, tz: &FixedOffset) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms)
        .map(|t| t.with_timezone(tz).format(TIME_OF_DAY_FORMAT).to_string())
        .unwrap_or_default()
}

/// Ticks on whole local hours between `first_ms` and `last_ms` inclusive,
/// spaced by the smallest whole number of hours that keeps at most
/// [`MAX_TICKS`] of them.
pub fn hour_ticks(first_ms: i64, last_ms: i64, tz: &FixedOffset) -> Vec<ChartTick> {
    let offset_ms = i64::from(tz.local_minus_utc()) * 1000;
    let first_local = first_ms + offset_ms;
    let last_local = last_ms + offset_ms;

    let start = (first_local + HOUR_MS - 1).div_euclid(HOUR_MS) * HOUR_MS;
    if start > last_local {
        return Vec::new();
    }

    let hours = (last_local - start) / HOUR_MS + 1;
    let step = (hours + MAX_TICKS - 1) / MAX_TICKS * HOUR_MS;

    (0..)
        .map(|k| start + k * step)
        .take_while(|t| *t <= last_local)
        .map(|t| {
            let x = t - offset_ms;
            ChartTick {
                x,
                label: time_of_day(x, tz),
            }
        })
        .collect()
}
