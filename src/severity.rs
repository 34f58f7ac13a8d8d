//! Coarse severity categories for grouping, colouring and counting.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::alert::RawAlert;
use crate::bulletin::ExtractedInfo;

/// Display category.  Declaration order is display order, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityCategory {
    Red,
    Orange,
    Yellow,
    Expecting,
    Other,
}

impl SeverityCategory {
    pub const ALL: [SeverityCategory; 5] = [
        Self::Red,
        Self::Orange,
        Self::Yellow,
        Self::Expecting,
        Self::Other,
    ];

    /// Sort key, ascending = more severe first.
    pub fn priority(&self) -> u8 {
        match self {
            Self::Red => 1,
            Self::Orange => 2,
            Self::Yellow => 3,
            Self::Expecting => 4,
            Self::Other => 5,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Red => "#dc2626",
            Self::Orange => "#ea580c",
            Self::Yellow => "#ca8a04",
            Self::Expecting => "#2563eb",
            Self::Other => "#6b7280",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Expecting => "expecting",
            Self::Other => "other",
        }
    }

    /// Parse a lower- or upper-case category name; anything unknown is
    /// `Other`.
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "red" => Self::Red,
            "orange" => Self::Orange,
            "yellow" => Self::Yellow,
            "expecting" => Self::Expecting,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for SeverityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An extracted warning level decides the category.  Without one, the
/// first non-empty of the alert's `type`, `subtype` and `event` strings is
/// inspected by keyword.
pub fn classify(alert: &RawAlert, info: &ExtractedInfo) -> SeverityCategory {
    if let Some(level) = info.warning_level {
        return SeverityCategory::from_name(level.as_str());
    }

    let field = [&alert.kind, &alert.subtype, &alert.event]
        .into_iter()
        .find(|f| !f.is_empty())
        .map_or_else(String::new, |f| f.to_lowercase());
    let has = |kw: &str| field.contains(kw);

    if has("red") || has("warning") {
        SeverityCategory::Red
    } else if has("orange") || has("watch") {
        SeverityCategory::Orange
    } else if has("yellow") || has("advisory") {
        SeverityCategory::Yellow
    } else if has("expecting") || has("forecast") {
        SeverityCategory::Expecting
    } else if has("thunderstorm") {
        SeverityCategory::Yellow
    } else if has("flood") {
        let subtype = alert.subtype.to_lowercase();
        if subtype.contains("extreme") {
            SeverityCategory::Red
        } else if subtype.contains("severe") {
            SeverityCategory::Orange
        } else {
            SeverityCategory::Yellow
        }
    } else {
        SeverityCategory::Other
    }
}

/// Group items by category, groups in display order, items in input order.
/// Empty groups are left out.
pub fn group_by_severity<T>(
    items: impl IntoIterator<Item = T>,
    category: impl Fn(&T) -> SeverityCategory,
) -> Vec<(SeverityCategory, Vec<T>)> {
    let mut groups: Vec<(SeverityCategory, Vec<T>)> = Vec::new();
    for item in items {
        let cat = category(&item);
        match groups.iter_mut().find(|(c, _)| *c == cat) {
            Some((_, list)) => list.push(item),
            None => groups.push((cat, vec![item])),
        }
    }
    groups.sort_by_key(|(c, _)| c.priority());
    groups
}

/// Summary counts over the expanded records of one cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertStats {
    pub current_alerts: usize,
    pub red_alerts: usize,
    pub orange_alerts: usize,
    pub yellow_alerts: usize,
    pub expecting_alerts: usize,
    pub other_alerts: usize,
    pub last_updated: DateTime<Utc>,
}

impl AlertStats {
    pub fn from_categories(
        categories: impl IntoIterator<Item = SeverityCategory>,
        last_updated: DateTime<Utc>,
    ) -> Self {
        let mut stats = Self {
            current_alerts: 0,
            red_alerts: 0,
            orange_alerts: 0,
            yellow_alerts: 0,
            expecting_alerts: 0,
            other_alerts: 0,
            last_updated,
        };
        for cat in categories {
            stats.current_alerts += 1;
            match cat {
                SeverityCategory::Red => stats.red_alerts += 1,
                SeverityCategory::Orange => stats.orange_alerts += 1,
                SeverityCategory::Yellow => stats.yellow_alerts += 1,
                SeverityCategory::Expecting => stats.expecting_alerts += 1,
                SeverityCategory::Other => stats.other_alerts += 1,
            }
        }
        stats
    }

    pub fn count(&self, cat: SeverityCategory) -> usize {
        match cat {
            SeverityCategory::Red => self.red_alerts,
            SeverityCategory::Orange => self.orange_alerts,
            SeverityCategory::Yellow => self.yellow_alerts,
            SeverityCategory::Expecting => self.expecting_alerts,
            SeverityCategory::Other => self.other_alerts,
        }
    }
}
