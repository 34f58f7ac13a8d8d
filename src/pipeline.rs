//! One processing pass: dedup → province filter → extract → expand →
//! classify.  Pure and stateless; every call builds a fresh [`Snapshot`].

use std::fmt;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::alert::{ExpandedAlert, RawAlert};
use crate::bulletin::{ExtractedInfo, Extractor, LevelPolicy};
use crate::expand::expand;
use crate::filter::{TargetConfig, dedup_alerts, filter_province};
use crate::severity::{AlertStats, SeverityCategory, classify, group_by_severity};

/// One per-municipality record, with the facts extracted from its parent
/// alert and its display category.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayAlert {
    #[serde(flatten)]
    pub alert: ExpandedAlert,
    pub severity: SeverityCategory,
    pub color: &'static str,
    pub extracted: ExtractedInfo,
}

/// Result of one successful cycle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub success: bool,
    pub data: Vec<DisplayAlert>,
    pub timestamp: DateTime<Utc>,
    pub total_alerts: usize,
    pub stats: AlertStats,
}

impl Snapshot {
    pub fn grouped(&self) -> Vec<(SeverityCategory, Vec<&DisplayAlert>)> {
        group_by_severity(self.data.iter(), |a| a.severity)
    }
}

pub struct Pipeline {
    extractor: Extractor,
}

impl Pipeline {
    pub fn new(target: TargetConfig, policy: LevelPolicy) -> Result<Self> {
        Ok(Self {
            extractor: Extractor::new(target, policy)?,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(TargetConfig::from_env(), LevelPolicy::from_env())
    }

    pub fn target(&self) -> &TargetConfig {
        self.extractor.target()
    }

    pub fn process(&self, alerts: Vec<RawAlert>) -> Snapshot {
        self.process_at(alerts, Utc::now())
    }

    /// Run the pass with an explicit "last updated" time.
    pub fn process_at(&self, alerts: Vec<RawAlert>, now: DateTime<Utc>) -> Snapshot {
        let target = self.target();
        info!("Fetched {} total alerts", alerts.len());

        let total = alerts.len();
        let unique = dedup_alerts(alerts);
        info!("Removed {} duplicate alerts", total - unique.len());

        let relevant = filter_province(unique, target);
        info!("Found {} alerts for {}", relevant.len(), target.province);

        let mut data = Vec::new();
        for alert in &relevant {
            // extracted once per alert, shared by all its expansions
            let extracted = self.extractor.extract(alert);
            let severity = classify(alert, &extracted);
            for expanded in expand(alert, &extracted) {
                data.push(DisplayAlert {
                    alert: expanded,
                    severity,
                    color: severity.color(),
                    extracted: extracted.clone(),
                });
            }
        }
        info!("Expanded to {} municipal alerts", data.len());

        let stats = AlertStats::from_categories(data.iter().map(|a| a.severity), now);
        Snapshot {
            success: true,
            total_alerts: data.len(),
            data,
            timestamp: now,
            stats,
        }
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pipeline({}, {})", self.target(), self.extractor)
    }
}
