use crate::pipeline::{Pipeline, Snapshot};
use crate::render;
use crate::source::AlertSource;
use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use super::shared::{LiveCfg, load_live_cfg, write_json};

pub(super) async fn run() -> Result<()> {
    let cfg = load_live_cfg();
    let pipeline = Pipeline::from_env()?;
    let source = AlertSource::from_env();
    info!("Alert source: {source}");
    info!("Pipeline: {pipeline}");

    // The first tick fires immediately.
    let mut ticker = tokio::time::interval(cfg.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let mut current: Option<Snapshot> = None;

    info!(
        "Running in live mode. Refreshing every {}s, press Enter to refresh now...",
        cfg.interval.as_secs()
    );
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            line = stdin.next_line(), if stdin_open => match line {
                Ok(Some(_)) => {
                    info!("Manual refresh requested");
                    ticker.reset();
                }
                Ok(None) => {
                    info!("stdin closed; manual refresh disabled");
                    stdin_open = false;
                    continue;
                }
                Err(e) => {
                    warn!("Failed to read stdin: {e}");
                    stdin_open = false;
                    continue;
                }
            },
        }

        refresh(&source, &pipeline, &cfg, &mut current).await;
    }
}

/// One cycle.  A failed fetch leaves `current` as it was.
async fn refresh(
    source: &AlertSource,
    pipeline: &Pipeline,
    cfg: &LiveCfg,
    current: &mut Option<Snapshot>,
) {
    let province = &pipeline.target().province;

    let alerts = match source.fetch().await {
        Ok(alerts) => alerts,
        Err(e) => {
            match e.status() {
                Some(status) => warn!("Failed to fetch alerts (HTTP {status}): {e}"),
                None => warn!("Failed to fetch alerts: {e}"),
            }
            println!("{}", render::format_error(&e.to_string(), current.is_some()));
            return;
        }
    };

    let snapshot = pipeline.process(alerts);
    println!("{}", render::format_snapshot(&snapshot, province));

    if let Some(path) = &cfg.snapshot_path {
        match write_json(path, &snapshot) {
            Ok(()) => info!("Snapshot written to {path}"),
            Err(e) => warn!("Failed to write snapshot: {e:#}"),
        }
    }

    *current = Some(snapshot);
}
