use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

const USER_AGENT: &str = concat!("streamchart/", env!("CARGO_PKG_VERSION"));

/// One blocking GET, no retry. Transport failures and non-2xx statuses both
/// surface as errors, so a bad fetch stops the pipeline before anything is
/// persisted.
pub(crate) fn fetch_html(url: &str) -> Result<String> {
    info!(url, "fetching source page");

    let agent = ureq::AgentBuilder::new()
        .timeout(Duration::from_secs(30))
        .build();

    let response = agent
        .get(url)
        .set("User-Agent", USER_AGENT)
        .call()
        .with_context(|| format!("failed to fetch {url}"))?;

    let body = response
        .into_string()
        .with_context(|| format!("failed to read response body from {url}"))?;

    info!(bytes = body.len(), "fetched source page");
    Ok(body)
}
