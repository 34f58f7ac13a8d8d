use std::sync::LazyLock;

use regex::Regex;

use crate::bulletin::WarningLevel;

/// `event` values (lower-cased, trimmed) that mark a tropical cyclone
/// bulletin on their own.
pub const CYCLONE_EVENT_TAGS: &[&str] = &[
    "tropical cyclone",
    "tropical_cyclone",
    "tropical cyclone bulletin",
    "tropical cyclone wind signal",
    "tc",
    "tcb",
    "tcws",
];

// ── Cyclone hazard phrases (lower-case) ────────────────────────────────

pub const WIND_PHRASES: &[&str] = &["severe winds", "strong to gale-force gusts"];
pub const RAINFALL_PHRASES: &[&str] = &["heavy rainfall", "heavy rains"];
pub const ROUGH_SEAS: &str = "rough seas";
pub const MODERATE_SEAS: &str = "moderate seas";

// ── Hazard labels ──────────────────────────────────────────────────────

pub const HAZARD_SEVERE_WINDS: &str = "Severe Winds";
pub const HAZARD_HEAVY_RAINFALL: &str = "Heavy Rainfall";
pub const HAZARD_ROUGH_SEAS: &str = "Rough Seas";
pub const HAZARD_MODERATE_SEAS: &str = "Moderate Seas";

/// Placeholder municipality for province-scale hazards.
pub const PROVINCE_WIDE: &str = "Province-wide";

// ── Section spans ──────────────────────────────────────────────────────

pub static SEVERE_WINDS_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)severe\s+winds").expect("severe winds pattern should compile")
});

pub static COASTAL_WATERS_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)hazards\s+affecting\s+coastal\s+waters")
        .expect("coastal waters pattern should compile")
});

/// Start of a section heading line: a markdown `#` heading, a line that is
/// only `**bold**`, or a multi-word ALL-CAPS line.  Matched case-sensitively.
pub static SECTION_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?:#{1,6}[ \t]+\S|\*\*[^*\n]+\*\*[ \t]*:?[ \t]*\r?$|[A-Z][A-Z0-9,/()'&-]*(?:[ \t]+[A-Z0-9,/()'&-]+)+[ \t]*:?[ \t]*\r?$)",
    )
    .expect("section heading pattern should compile")
});

// ── Rainfall warning markers ───────────────────────────────────────────

/// `<COLOR> WARNING LEVEL:` followed by everything up to the next period.
/// Evaluation order is RED, ORANGE, YELLOW.
pub static WARNING_LEVEL_MARKERS: LazyLock<[(WarningLevel, Regex); 3]> = LazyLock::new(|| {
    [
        (WarningLevel::Red, marker("RED")),
        (WarningLevel::Orange, marker("ORANGE")),
        (WarningLevel::Yellow, marker("YELLOW")),
    ]
});

fn marker(color: &str) -> Regex {
    Regex::new(&format!(r"(?i){color} WARNING LEVEL:([^.]+)"))
        .expect("warning level pattern should compile")
}

// ── River bullets ──────────────────────────────────────────────────────

/// Bullet line naming the province: `**<Province>** - <description>`.
/// The description stops at `+` or end of line.
pub fn province_bullet(province: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"(?i)\*\*{}\*\*\s*-\s*([^+\n]+)",
        regex::escape(province.trim())
    ))
}

pub static PARTICULARLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)particularly\s+(.+)").expect("river list pattern should compile")
});

pub static RIVER_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+and\s+|\s*,\s*").expect("river separator pattern should compile")
});
