//! Snapshot retrieval over HTTP or from the local filesystem.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use tracing::debug;

/// GETs `url` through `client` and returns the full response body.
///
/// # Errors
///
/// Returns an error if the URL is invalid, the request fails or the server
/// answers with a non-success status.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(
        reqwest::Method::GET,
        url.parse().with_context(|| format!("Invalid source URL: {url}"))?,
    );

    let resp = client.execute(req).await?.error_for_status()?;
    let bytes = resp.bytes().await?.to_vec();
    debug!(bytes = bytes.len(), "Source bytes received");
    Ok(bytes)
}

/// Loads the snapshot from a local file path or fetches it over HTTP.
#[tracing::instrument(skip(client))]
pub async fn load_source<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    if is_remote(source) {
        fetch_bytes(client, source).await
    } else {
        std::fs::read(source).with_context(|| format!("Failed to read {source}"))
    }
}

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
