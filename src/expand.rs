//! Fan-out of one alert into per-municipality display records.

use crate::alert::{ExpandedAlert, RawAlert};
use crate::bulletin::ExtractedInfo;
use crate::bulletin::event_kind::EventKind;
use crate::bulletin::patterns::PROVINCE_WIDE;

pub const RIVER_SYSTEMS: &str = "River Systems";
pub const GENERAL_ALERT: &str = "General Alert";

/// Municipality names the alert expands to, in extraction order.
///
/// Cyclones and thunderstorms are province-scale and always yield a single
/// `Province-wide` entry.  Everything else gets one entry per extracted
/// municipality, or a placeholder when there are none.
pub fn municipality_names(alert: &RawAlert, info: &ExtractedInfo) -> Vec<String> {
    match EventKind::of(alert) {
        EventKind::TropicalCyclone | EventKind::Thunderstorm => vec![PROVINCE_WIDE.to_string()],
        _ if !info.municipalities.is_empty() => info.municipalities.clone(),
        EventKind::Flood if !info.rivers.is_empty() => vec![RIVER_SYSTEMS.to_string()],
        EventKind::Flood => vec![PROVINCE_WIDE.to_string()],
        EventKind::Other => vec![GENERAL_ALERT.to_string()],
    }
}

pub fn expand(alert: &RawAlert, info: &ExtractedInfo) -> Vec<ExpandedAlert> {
    municipality_names(alert, info)
        .into_iter()
        .map(|municipality_name| ExpandedAlert {
            alert: alert.clone(),
            municipality_name,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(event: &str, subtype: &str) -> RawAlert {
        RawAlert {
            identifier: "a1".into(),
            event: event.into(),
            subtype: subtype.into(),
            headline: "Headline".into(),
            issued_date: "2024-07-24T05:00:00+08:00".into(),
            ..Default::default()
        }
    }

    fn info(municipalities: &[&str], rivers: &[&str]) -> ExtractedInfo {
        let mut info = ExtractedInfo::new("Bataan");
        for m in municipalities {
            info.add_municipality(m);
        }
        info.rivers = rivers.iter().map(|r| r.to_string()).collect();
        info
    }

    fn names(out: &[ExpandedAlert]) -> Vec<&str> {
        out.iter().map(|e| e.municipality_name.as_str()).collect()
    }

    #[test]
    fn flood_fans_out_per_municipality() {
        let a = alert("Flood", "General Flood Advisory");
        let out = expand(&a, &info(&["Morong", "Orani"], &[]));
        assert_eq!(names(&out), ["Morong", "Orani"]);
        for e in &out {
            assert_eq!(e.alert, a);
        }
    }

    #[test]
    fn flood_with_rivers_only_is_river_systems() {
        let out = expand(&alert("Flood", ""), &info(&[], &["Talisay River"]));
        assert_eq!(names(&out), [RIVER_SYSTEMS]);
    }

    #[test]
    fn flood_with_nothing_is_province_wide() {
        let out = expand(&alert("Flood", ""), &info(&[], &[]));
        assert_eq!(names(&out), [PROVINCE_WIDE]);
    }

    #[test]
    fn cyclone_is_always_province_wide() {
        let a = RawAlert {
            kind: "CAP".into(),
            ..alert("", "Tropical Cyclone Bulletin")
        };
        assert_eq!(names(&expand(&a, &info(&[], &[]))), [PROVINCE_WIDE]);
        assert_eq!(
            names(&expand(&a, &info(&["Morong", "Orani"], &[]))),
            [PROVINCE_WIDE]
        );
    }

    #[test]
    fn thunderstorm_is_always_province_wide() {
        let out = expand(&alert("Thunderstorm", "Advisory"), &info(&["Limay"], &[]));
        assert_eq!(names(&out), [PROVINCE_WIDE]);
    }

    #[test]
    fn other_events_fall_back_to_general_alert() {
        let a = alert("Rainfall", "");
        assert_eq!(names(&expand(&a, &info(&[], &["X River"]))), [GENERAL_ALERT]);
        assert_eq!(names(&expand(&a, &info(&["Pilar"], &[]))), ["Pilar"]);
    }
}
