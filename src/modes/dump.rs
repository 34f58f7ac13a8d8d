use crate::source::{AlertSource, parse_payload};
use anyhow::{Context, Result};
use std::io::Write;
use tracing::info;

use super::shared::{dump_output_path, write_file};

/// Fetch the feed once and save the raw body, so it can be fed back
/// through `replay` later.
pub(super) async fn run() -> Result<()> {
    let output_path = dump_output_path();
    let source = AlertSource::from_env();
    info!("Alert source: {source}");

    let body = source.fetch_body().await.context("fetch failed")?;
    let alerts = parse_payload(&body).context("upstream payload rejected")?;

    write_file(&output_path, |w| {
        w.write_all(body.as_bytes())?;
        Ok(())
    })?;

    info!(
        "Dump complete: {} alerts written to {}",
        alerts.len(),
        output_path
    );

    Ok(())
}
