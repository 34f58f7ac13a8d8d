use crate::alert::RawAlert;
use crate::bulletin::patterns::CYCLONE_EVENT_TAGS;

// ───────────────────────────── Event kinds ───────────────────────────────

/// Broad bulletin categories.  The classification predicates are
/// independent: an alert can satisfy several of them, and each extraction
/// rule checks its own.  [`EventKind::of`] picks one for fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    TropicalCyclone,
    Thunderstorm,
    Flood,
    Other, // rainfall and anything unrecognised
}

impl EventKind {
    /// Single category, first match in the order cyclone, thunderstorm,
    /// flood.
    pub fn of(alert: &RawAlert) -> Self {
        if is_tropical_cyclone(alert) {
            Self::TropicalCyclone
        } else if is_thunderstorm(alert) {
            Self::Thunderstorm
        } else if is_flood(alert) {
            Self::Flood
        } else {
            Self::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::TropicalCyclone => "Tropical Cyclone",
            Self::Thunderstorm => "Thunderstorm",
            Self::Flood => "Flood",
            Self::Other => "General",
        }
    }
}

/// Event is one of the cyclone tags, or a CAP bulletin whose subtype
/// mentions a tropical cyclone.
pub fn is_tropical_cyclone(alert: &RawAlert) -> bool {
    let event = alert.event.trim().to_lowercase();
    if CYCLONE_EVENT_TAGS.contains(&event.as_str()) {
        return true;
    }
    alert.kind.to_lowercase().contains("cap")
        && alert.subtype.to_lowercase().contains("tropical cyclone")
}

pub fn is_thunderstorm(alert: &RawAlert) -> bool {
    alert.event.to_lowercase().contains("thunderstorm")
        || alert.kind.to_lowercase().contains("thunderstorm")
}

pub fn is_flood(alert: &RawAlert) -> bool {
    alert.event.to_lowercase().contains("flood") || alert.subtype.to_lowercase().contains("flood")
}
