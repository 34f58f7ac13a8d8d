//! Fact extraction from free-text PAGASA bulletins.
//!
//! An [`Extractor`] runs the ordered rule list in [`rules::RULES`] over one
//! alert and returns an [`ExtractedInfo`].  Extraction is best-effort:
//! nothing here fails, an unrecognised bulletin just leaves fields empty.
pub mod bulletin_tests;
pub mod event_kind;
pub mod patterns;
pub mod rules;

use std::fmt;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::alert::RawAlert;
use crate::bulletin::event_kind::EventKind;
use crate::bulletin::rules::{RULES, RuleContext};
use crate::filter::TargetConfig;

// ───────────────────────────── Levels ────────────────────────────────────

/// Colour-coded warning level.  Ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WarningLevel {
    Yellow = 1,
    Orange = 2,
    Red = 3,
}

impl WarningLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "RED",
            Self::Orange => "ORANGE",
            Self::Yellow => "YELLOW",
        }
    }
}

impl fmt::Display for WarningLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for WarningLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// How a rule that matches a warning level treats a level set earlier in
/// the same pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelPolicy {
    /// Every match overwrites; the last rule to match wins.
    #[default]
    LastMatch,
    /// A match only replaces a lower level.
    Highest,
}

impl LevelPolicy {
    /// `WARNING_LEVEL_POLICY`: `last_match` (default) or `highest`.
    pub fn from_env() -> Self {
        match std::env::var("WARNING_LEVEL_POLICY")
            .unwrap_or_default()
            .trim()
            .to_lowercase()
            .as_str()
        {
            "highest" | "highest_severity" => Self::Highest,
            _ => Self::LastMatch,
        }
    }
}

// ─────────────────────────── Extracted info ──────────────────────────────

/// Facts recovered from one alert.  Recomputed every cycle, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedInfo {
    pub province: String,
    /// Insertion-ordered, no exact duplicates.
    pub municipalities: Vec<String>,
    /// Serialized as `""` when unset.
    #[serde(serialize_with = "level_or_empty")]
    pub warning_level: Option<WarningLevel>,
    pub rivers: Vec<String>,
    pub hazards: Vec<String>,
}

impl ExtractedInfo {
    pub fn new(province: &str) -> Self {
        Self {
            province: province.to_string(),
            municipalities: Vec::new(),
            warning_level: None,
            rivers: Vec::new(),
            hazards: Vec::new(),
        }
    }

    /// Append unless already present.  Returns `true` when appended.
    pub fn add_municipality(&mut self, name: &str) -> bool {
        push_unique(&mut self.municipalities, name)
    }

    pub fn add_hazard(&mut self, hazard: &str) -> bool {
        push_unique(&mut self.hazards, hazard)
    }

    pub fn set_level(&mut self, level: WarningLevel, policy: LevelPolicy) {
        match (policy, self.warning_level) {
            (LevelPolicy::Highest, Some(current)) if current >= level => {}
            _ => self.warning_level = Some(level),
        }
    }
}

fn push_unique(list: &mut Vec<String>, item: &str) -> bool {
    if list.iter().any(|x| x == item) {
        return false;
    }
    list.push(item.to_string());
    true
}

fn level_or_empty<S: Serializer>(
    level: &Option<WarningLevel>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(level.map_or("", |l| l.as_str()))
}

// ───────────────────────────── Extractor ─────────────────────────────────

/// Runs the extraction rules for one target province.
pub struct Extractor {
    target: TargetConfig,
    bullet: Regex,
    policy: LevelPolicy,
}

impl Extractor {
    pub fn new(target: TargetConfig, policy: LevelPolicy) -> Result<Self> {
        let bullet = patterns::province_bullet(&target.province)
            .with_context(|| format!("invalid bullet pattern for {}", target.province))?;
        Ok(Self {
            target,
            bullet,
            policy,
        })
    }

    pub fn target(&self) -> &TargetConfig {
        &self.target
    }

    pub fn extract(&self, alert: &RawAlert) -> ExtractedInfo {
        let text = alert.bulletin_text();
        let lower = text.to_lowercase();
        let cx = RuleContext {
            alert,
            target: &self.target,
            text,
            lower: &lower,
            bullet: &self.bullet,
            policy: self.policy,
        };

        debug!(
            "Extracting alert {} ({})",
            alert.identifier,
            EventKind::of(alert).label()
        );
        let mut info = ExtractedInfo::new(&self.target.province);
        for rule in RULES {
            if (rule.applies)(&cx) {
                debug!("Alert {}: applying rule {}", alert.identifier, rule.name);
                (rule.apply)(&cx, &mut info);
            }
        }
        info
    }
}

impl fmt::Display for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Extractor(province={}, gazetteer={}, policy={:?}, rules={})",
            self.target.province,
            self.target.gazetteer.len(),
            self.policy,
            RULES.len(),
        )
    }
}
