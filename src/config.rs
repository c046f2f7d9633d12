//! Environment-driven configuration.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file by the binary. `SOURCE_URL` wins over the `SHEET_ID` / `SHEET_GID`
//! pair, which is expanded into a published-sheet CSV export URL.

use std::path::PathBuf;

pub const DEFAULT_SHEET_ID: &str =
    "2PACX-1vQ-Dy_54CZsn92P8-bLwcPLwlBNckYe8do8Um21aLFIaof3jfN8G7V_FMHnc1b3Rb7vc5mNhUOqBuQD";
pub const DEFAULT_SHEET_GID: &str = "0";
pub const DEFAULT_LOG_FILE_PATH: &str = "logs/visitor_stats.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// URL or local path of the CSV snapshot.
    pub source: String,
    pub log_file_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let source = get("SOURCE_URL").unwrap_or_else(|| {
            let sheet_id = get("SHEET_ID").unwrap_or_else(|| DEFAULT_SHEET_ID.to_string());
            let gid = get("SHEET_GID").unwrap_or_else(|| DEFAULT_SHEET_GID.to_string());
            published_sheet_url(&sheet_id, &gid)
        });

        let log_file_path = get("LOG_FILE_PATH")
            .unwrap_or_else(|| DEFAULT_LOG_FILE_PATH.to_string())
            .into();

        Self {
            source,
            log_file_path,
        }
    }
}

/// CSV export URL of a sheet published to the web.
pub fn published_sheet_url(sheet_id: &str, gid: &str) -> String {
    format!("https://docs.google.com/spreadsheets/d/e/{sheet_id}/pub?gid={gid}&single=true&output=csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[]));

        assert_eq!(
            config.source,
            published_sheet_url(DEFAULT_SHEET_ID, DEFAULT_SHEET_GID)
        );
        assert_eq!(config.log_file_path, PathBuf::from(DEFAULT_LOG_FILE_PATH));
    }

    #[test]
    fn test_source_url_overrides_sheet() {
        let config = Config::from_lookup(lookup(&[
            ("SOURCE_URL", "data/feed.csv"),
            ("SHEET_ID", "abc"),
        ]));
        assert_eq!(config.source, "data/feed.csv");
    }

    #[test]
    fn test_sheet_id_and_gid() {
        let config = Config::from_lookup(lookup(&[("SHEET_ID", "abc"), ("SHEET_GID", "7")]));
        assert_eq!(
            config.source,
            "https://docs.google.com/spreadsheets/d/e/abc/pub?gid=7&single=true&output=csv"
        );
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = Config::from_lookup(lookup(&[("SOURCE_URL", "  "), ("LOG_FILE_PATH", "")]));

        assert!(config.source.starts_with("https://docs.google.com/"));
        assert_eq!(config.log_file_path, PathBuf::from(DEFAULT_LOG_FILE_PATH));
    }
}
