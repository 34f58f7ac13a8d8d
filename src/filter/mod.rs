//! Target-province configuration, identifier dedup and province filtering.
//!
//! Province matching is a case-insensitive substring test, the same test the
//! bulletin rules use, so an alert that survives the filter is one the
//! extractor can say something about.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::alert::RawAlert;

/// Municipalities of Bataan, the default gazetteer.
pub const BATAAN_MUNICIPALITIES: &[&str] = &[
    "Balanga",
    "Morong",
    "Bagac",
    "Mariveles",
    "Abucay",
    "Samal",
    "Orani",
    "Hermosa",
    "Dinalupihan",
    "Limay",
    "Orion",
    "Pilar",
];

// ───────────────────────── Target config ────────────────────────────────

/// The province being watched and its canonical municipality names.
///
/// Example for another province:
/// ```env
/// TARGET_PROVINCE=Zambales
/// TARGET_MUNICIPALITIES=Iba,Botolan,Subic,Castillejos
/// ```
#[derive(Debug, Clone)]
pub struct TargetConfig {
    /// Display name, used when no structured entry supplies one.
    pub province: String,
    /// Lower-cased `province`, matched as a substring.
    needle: String,
    /// Canonical municipality names, in scan order.
    pub gazetteer: Vec<String>,
}

impl TargetConfig {
    pub fn new(province: &str, gazetteer: &[&str]) -> Self {
        Self {
            province: province.trim().to_string(),
            needle: province.trim().to_lowercase(),
            gazetteer: gazetteer.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Build from env vars.
    ///
    /// | Env var                 | Default  | Purpose                              |
    /// |-------------------------|----------|--------------------------------------|
    /// | `TARGET_PROVINCE`       | `Bataan` | Province display name                |
    /// | `TARGET_MUNICIPALITIES` | Bataan's | Comma-separated canonical names      |
    pub fn from_env() -> Self {
        let province = std::env::var("TARGET_PROVINCE")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let gazetteer: Vec<String> = std::env::var("TARGET_MUNICIPALITIES")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let mut cfg = match province {
            Some(province) => Self::new(&province, BATAAN_MUNICIPALITIES),
            None => Self::bataan(),
        };
        if !gazetteer.is_empty() {
            cfg.gazetteer = gazetteer;
        }
        cfg
    }

    pub fn bataan() -> Self {
        Self::new("Bataan", BATAAN_MUNICIPALITIES)
    }

    /// `true` when `text` mentions the province (case-insensitive).
    pub fn mentioned_in(&self, text: &str) -> bool {
        !self.needle.is_empty() && text.to_lowercase().contains(&self.needle)
    }

    /// Same as [`mentioned_in`](Self::mentioned_in) for text that is
    /// already lower-cased.
    pub fn mentioned_in_lower(&self, lower: &str) -> bool {
        !self.needle.is_empty() && lower.contains(&self.needle)
    }

    /// `true` when any structured province entry names the province.
    pub fn listed_in(&self, alert: &RawAlert) -> bool {
        alert
            .provinces
            .values()
            .any(|p| self.mentioned_in(&p.province))
    }
}

impl fmt::Display for TargetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TargetConfig(province={}, municipalities={:?})",
            self.province, self.gazetteer,
        )
    }
}

// ───────────────────────────── Dedup ─────────────────────────────────────

/// Drop repeated identifiers.  The first occurrence wins and relative order
/// is kept.
pub fn dedup_alerts(alerts: Vec<RawAlert>) -> Vec<RawAlert> {
    let mut seen: HashSet<String> = HashSet::with_capacity(alerts.len());
    alerts
        .into_iter()
        .filter(|alert| {
            let fresh = seen.insert(alert.identifier.clone());
            if !fresh {
                debug!("Dropping duplicate alert {}", alert.identifier);
            }
            fresh
        })
        .collect()
}

// ───────────────────────── Province filter ───────────────────────────────

/// Keep alerts that list the province in `provinces`, or mention it in
/// `message` / `generated_message`.
pub fn filter_province(alerts: Vec<RawAlert>, target: &TargetConfig) -> Vec<RawAlert> {
    alerts
        .into_iter()
        .filter(|alert| {
            let keep = target.listed_in(alert)
                || target.mentioned_in(&alert.message)
                || target.mentioned_in(alert.generated_text());
            if !keep {
                debug!(
                    "Alert {} does not concern {} – skipping",
                    alert.identifier, target.province
                );
            }
            keep
        })
        .collect()
}
