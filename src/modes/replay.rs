use crate::pipeline::Pipeline;
use crate::render;
use crate::source::parse_payload;
use anyhow::{Context, Result};
use tracing::info;

use super::shared::load_replay_cfg;

pub(super) async fn run() -> Result<()> {
    let replay = load_replay_cfg()?;
    let body = tokio::fs::read_to_string(&replay.input_path)
        .await
        .with_context(|| format!("failed to open replay file {}", replay.input_path))?;
    let alerts = parse_payload(&body)
        .with_context(|| format!("invalid payload in {}", replay.input_path))?;

    let pipeline = Pipeline::from_env()?;
    info!("Replay started: {} alerts from {}", alerts.len(), replay.input_path);
    info!("Pipeline: {pipeline}");

    let snapshot = pipeline.process(alerts);

    if replay.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("{}", render::format_snapshot(&snapshot, &pipeline.target().province));
    }

    info!(
        "Replay complete: total={}, red={}, orange={}, yellow={}",
        snapshot.total_alerts,
        snapshot.stats.red_alerts,
        snapshot.stats.orange_alerts,
        snapshot.stats.yellow_alerts
    );

    Ok(())
}
