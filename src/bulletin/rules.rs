//! Ordered extraction rules.
//!
//! **Order matters.**  Rules run top to bottom and a warning level set by
//! one rule may be overwritten by a later one (under
//! [`LevelPolicy::LastMatch`]), so the list order is the priority order,
//! lowest first.  List fields are append-only and de-duplicated.

use regex::Regex;

use crate::alert::RawAlert;
use crate::bulletin::event_kind::{is_flood, is_thunderstorm, is_tropical_cyclone};
use crate::bulletin::patterns::*;
use crate::bulletin::{ExtractedInfo, LevelPolicy, WarningLevel};
use crate::filter::TargetConfig;

/// Everything a rule may look at for one alert.
pub struct RuleContext<'a> {
    pub alert: &'a RawAlert,
    pub target: &'a TargetConfig,
    /// Bulletin text as received.
    pub text: &'a str,
    /// `text`, lower-cased.
    pub lower: &'a str,
    /// `**<Province>** - ...` matcher for the target.
    pub bullet: &'a Regex,
    pub policy: LevelPolicy,
}

impl<'a> RuleContext<'a> {
    fn mentions_province(&self) -> bool {
        self.target.mentioned_in_lower(self.lower)
    }

    fn set_level(&self, info: &mut ExtractedInfo, level: WarningLevel) {
        info.set_level(level, self.policy);
    }

    /// Description part of the province bullet, if the bulletin has one.
    fn bullet_description(&self) -> Option<&'a str> {
        self.bullet
            .captures(self.text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }
}

/// A predicate→effect pair.
pub struct Rule {
    pub name: &'static str,
    pub applies: fn(&RuleContext) -> bool,
    pub apply: fn(&RuleContext, &mut ExtractedInfo),
}

pub const RULES: &[Rule] = &[
    Rule {
        name: "structured_provinces",
        applies: always,
        apply: structured_provinces,
    },
    Rule {
        name: "tropical_cyclone",
        applies: cyclone_applies,
        apply: tropical_cyclone,
    },
    Rule {
        name: "thunderstorm",
        applies: thunderstorm_applies,
        apply: thunderstorm,
    },
    Rule {
        name: "flood",
        applies: flood_applies,
        apply: flood,
    },
    Rule {
        name: "rainfall_warning_level",
        applies: always,
        apply: rainfall_warning_level,
    },
    Rule {
        name: "river_bullet",
        applies: always,
        apply: river_bullet,
    },
    Rule {
        name: "gazetteer_scan",
        applies: mentions_province,
        apply: gazetteer_scan,
    },
];

fn always(_: &RuleContext) -> bool {
    true
}

fn mentions_province(cx: &RuleContext) -> bool {
    cx.mentions_province()
}

// ── 1. Structured provinces ────────────────────────────────────────────

fn structured_provinces(cx: &RuleContext, info: &mut ExtractedInfo) {
    for detail in cx.alert.provinces.values() {
        if !cx.target.mentioned_in(&detail.province) {
            continue;
        }
        info.province = detail.province.clone();
        if let Some(municipality) = detail.municipality.as_deref() {
            let municipality = municipality.trim();
            if !municipality.is_empty() {
                info.add_municipality(municipality);
            }
        }
    }
}

// ── 2. Tropical cyclone ────────────────────────────────────────────────

fn cyclone_applies(cx: &RuleContext) -> bool {
    is_tropical_cyclone(cx.alert) && cx.mentions_province()
}

fn tropical_cyclone(cx: &RuleContext, info: &mut ExtractedInfo) {
    let lower = cx.lower;
    let mentioned = cx.mentions_province();
    let before = info.hazards.len();

    if WIND_PHRASES.iter().any(|p| lower.contains(p)) || (lower.contains("winds") && mentioned) {
        info.add_hazard(HAZARD_SEVERE_WINDS);
        cx.set_level(info, WarningLevel::Orange);
    }
    if RAINFALL_PHRASES.iter().any(|p| lower.contains(p)) {
        info.add_hazard(HAZARD_HEAVY_RAINFALL);
    }
    if lower.contains(ROUGH_SEAS) && mentioned {
        info.add_hazard(HAZARD_ROUGH_SEAS);
    }
    if lower.contains(MODERATE_SEAS) && mentioned {
        info.add_hazard(HAZARD_MODERATE_SEAS);
    }

    // Delimited sections: the province has to appear inside the section.
    if let Some(span) = section_span(cx.text, &SEVERE_WINDS_SECTION) {
        if cx.target.mentioned_in(span) {
            info.add_hazard(HAZARD_SEVERE_WINDS);
            cx.set_level(info, WarningLevel::Orange);
        }
    }
    if let Some(span) = section_span(cx.text, &COASTAL_WATERS_SECTION) {
        let span = span.to_lowercase();
        if cx.target.mentioned_in_lower(&span) {
            if span.contains(ROUGH_SEAS) {
                info.add_hazard(HAZARD_ROUGH_SEAS);
            }
            if span.contains(MODERATE_SEAS) {
                info.add_hazard(HAZARD_MODERATE_SEAS);
            }
        }
    }

    if info.hazards.len() > before {
        if info.warning_level.is_none() {
            cx.set_level(info, WarningLevel::Orange);
        }
        info.add_municipality(PROVINCE_WIDE);
    }
}

/// Text from the first match of `start` up to the next section heading,
/// or to the end of the text.
pub(crate) fn section_span<'t>(text: &'t str, start: &Regex) -> Option<&'t str> {
    let m = start.find(text)?;
    let end = SECTION_HEADING
        .find_at(text, m.end())
        .map_or(text.len(), |h| h.start());
    Some(&text[m.start()..end])
}

// ── 3. Thunderstorm ────────────────────────────────────────────────────

fn thunderstorm_applies(cx: &RuleContext) -> bool {
    is_thunderstorm(cx.alert) && (cx.mentions_province() || cx.target.listed_in(cx.alert))
}

fn thunderstorm(cx: &RuleContext, info: &mut ExtractedInfo) {
    let subtype = cx.alert.subtype.to_lowercase();
    // watch, advisory, warning: first match wins
    if subtype.contains("watch") {
        cx.set_level(info, WarningLevel::Orange);
        info.add_hazard("Thunderstorm Watch");
    } else if subtype.contains("advisory") {
        cx.set_level(info, WarningLevel::Yellow);
        info.add_hazard("Thunderstorm Advisory");
    } else if subtype.contains("warning") {
        cx.set_level(info, WarningLevel::Red);
        info.add_hazard("Thunderstorm Warning");
    }
    info.add_municipality(PROVINCE_WIDE);
}

// ── 4. Flood ───────────────────────────────────────────────────────────

fn flood_applies(cx: &RuleContext) -> bool {
    is_flood(cx.alert)
}

fn flood(cx: &RuleContext, info: &mut ExtractedInfo) {
    let Some(description) = cx.bullet_description() else {
        return;
    };

    let subtype = cx.alert.subtype.to_lowercase();
    if subtype.contains("extreme") {
        cx.set_level(info, WarningLevel::Red);
        info.add_hazard("Extreme Flood Advisory");
    } else if subtype.contains("severe") {
        cx.set_level(info, WarningLevel::Orange);
        info.add_hazard("Severe Flood Advisory");
    } else {
        cx.set_level(info, WarningLevel::Yellow);
        info.add_hazard("General Flood Advisory");
    }

    let rivers = river_list(description);
    if info.rivers.is_empty() {
        info.rivers = rivers.clone();
    }
    match_gazetteer(cx.target, &rivers, info);

    if info.municipalities.is_empty() {
        info.add_municipality(PROVINCE_WIDE);
    }
}

// ── 5. Rainfall warning levels ─────────────────────────────────────────

fn rainfall_warning_level(cx: &RuleContext, info: &mut ExtractedInfo) {
    for (level, marker) in WARNING_LEVEL_MARKERS.iter() {
        let Some(span) = marker.captures(cx.text).and_then(|c| c.get(1)) else {
            continue;
        };
        if cx.target.mentioned_in(span.as_str()) {
            cx.set_level(info, *level);
        }
    }
}

// ── 6. River bullet (any event) ────────────────────────────────────────

fn river_bullet(cx: &RuleContext, info: &mut ExtractedInfo) {
    let Some(description) = cx.bullet_description() else {
        return;
    };
    let rivers = river_list(description);
    if rivers.is_empty() {
        return;
    }
    if info.rivers.is_empty() {
        info.rivers = rivers.clone();
    }
    match_gazetteer(cx.target, &rivers, info);

    // Unrecognised river names stand in for municipalities.
    if info.municipalities.is_empty() {
        for river in &rivers {
            info.add_municipality(&title_case(river));
        }
    }
}

// ── 7. Direct gazetteer scan ───────────────────────────────────────────

fn gazetteer_scan(cx: &RuleContext, info: &mut ExtractedInfo) {
    for municipality in &cx.target.gazetteer {
        if cx.lower.contains(&municipality.to_lowercase()) {
            info.add_municipality(municipality);
        }
    }
}

// ── Helpers ────────────────────────────────────────────────────────────

/// Rivers/areas named after "particularly" in a bullet description,
/// split on "and" and commas.  The lower-case word has to be present;
/// a sentence-initial "Particularly" alone does not start a list.
pub(crate) fn river_list(description: &str) -> Vec<String> {
    if !description.contains("particularly") {
        return Vec::new();
    }
    let Some(list) = PARTICULARLY.captures(description).and_then(|c| c.get(1)) else {
        return Vec::new();
    };
    RIVER_SEPARATOR
        .split(list.as_str())
        .map(|r| r.trim().trim_end_matches(['.', ';', ':']).trim())
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

/// Append the canonical name of every gazetteer entry that a river name
/// contains, or is contained in (case-insensitive).
fn match_gazetteer(target: &TargetConfig, rivers: &[String], info: &mut ExtractedInfo) {
    for river in rivers {
        let river = river.to_lowercase();
        let hit = target.gazetteer.iter().find(|m| {
            let m = m.to_lowercase();
            river.contains(&m) || m.contains(&river)
        });
        if let Some(municipality) = hit {
            info.add_municipality(municipality);
        }
    }
}

pub(crate) fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
