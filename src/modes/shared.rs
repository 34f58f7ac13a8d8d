use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

#[derive(Clone)]
pub(super) struct LiveCfg {
    pub interval: Duration,
    pub snapshot_path: Option<String>,
}

#[derive(Clone)]
pub(super) struct ReplayCfg {
    pub input_path: String,
    pub json: bool,
}

pub(super) fn must_env(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| anyhow!("Missing env var {key}"))
}

pub(super) fn parse_bool_env(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes"))
        .unwrap_or(default)
}

pub(super) fn load_live_cfg() -> LiveCfg {
    let interval_secs = std::env::var("REFRESH_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(600);

    LiveCfg {
        interval: Duration::from_secs(interval_secs),
        snapshot_path: std::env::var("SNAPSHOT_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty()),
    }
}

pub(super) fn load_replay_cfg() -> Result<ReplayCfg> {
    Ok(ReplayCfg {
        input_path: must_env("REPLAY_INPUT_PATH")?,
        json: parse_bool_env("REPLAY_JSON", false),
    })
}

pub(super) fn dump_output_path() -> String {
    std::env::var("DUMP_OUTPUT_PATH").unwrap_or_else(|_| "./cap_alerts_dump.json".into())
}

/// Create `path` (and its parent directory) and hand a buffered writer to
/// `write`.
pub(super) fn write_file(
    path: &str,
    write: impl FnOnce(&mut BufWriter<File>) -> Result<()>,
) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create parent directory for {path}"))?;
        }
    }

    let file = File::create(path).with_context(|| format!("failed to create {path}"))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)?;
    writer
        .flush()
        .with_context(|| format!("failed to write {path}"))?;
    Ok(())
}

pub(super) fn write_json<T: Serialize>(path: &str, value: &T) -> Result<()> {
    write_file(path, |w| {
        serde_json::to_writer_pretty(&mut *w, value)
            .with_context(|| format!("failed to serialize JSON for {path}"))?;
        w.write_all(b"\n")?;
        Ok(())
    })
}
