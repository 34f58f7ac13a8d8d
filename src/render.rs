//! Plain-text rendering of a snapshot for the terminal.

use crate::pipeline::{DisplayAlert, Snapshot};
use crate::severity::SeverityCategory;

const SEPARATOR: &str = "———";

fn badge(cat: SeverityCategory) -> &'static str {
    match cat {
        SeverityCategory::Red => "🔴",
        SeverityCategory::Orange => "🟠",
        SeverityCategory::Yellow => "🟡",
        SeverityCategory::Expecting => "🔵",
        SeverityCategory::Other => "⚪",
    }
}

fn group_title(cat: SeverityCategory) -> &'static str {
    match cat {
        SeverityCategory::Red => "RED ALERTS",
        SeverityCategory::Orange => "ORANGE ALERTS",
        SeverityCategory::Yellow => "YELLOW ALERTS",
        SeverityCategory::Expecting => "EXPECTING",
        SeverityCategory::Other => "OTHER ALERTS",
    }
}

/// Render the snapshot grouped by severity, most severe group first.
pub fn format_snapshot(snap: &Snapshot, province: &str) -> String {
    let mut out = String::new();
    let stats = &snap.stats;

    out.push_str(&format!(
        "⛅ {province} weather alerts · updated {}\n",
        stats.last_updated.format("%Y-%m-%d %H:%M UTC")
    ));

    if snap.data.is_empty() {
        out.push_str(&format!("No active alerts for {province}\n"));
        return out;
    }

    let counts: Vec<String> = SeverityCategory::ALL
        .iter()
        .map(|cat| format!("{} {cat}", stats.count(*cat)))
        .collect();
    out.push_str(&format!(
        "{} active · {}\n\n",
        stats.current_alerts,
        counts.join(" · ")
    ));

    for (cat, alerts) in snap.grouped() {
        out.push_str(&format!("{} {} ({})\n", badge(cat), group_title(cat), alerts.len()));
        out.push_str(SEPARATOR);
        out.push('\n');
        for alert in alerts {
            push_record(&mut out, alert);
        }
        out.push('\n');
    }
    out
}

fn push_record(out: &mut String, display: &DisplayAlert) {
    let alert = &display.alert.alert;
    let info = &display.extracted;

    let level = info
        .warning_level
        .map(|l| format!(" [{l}]"))
        .unwrap_or_default();
    out.push_str(&format!("• {}{level}\n", display.alert.municipality_name));

    let what = if alert.event.is_empty() {
        &alert.kind
    } else {
        &alert.event
    };
    match (what.is_empty(), alert.subtype.is_empty()) {
        (false, false) => out.push_str(&format!("  {what} - {}\n", alert.subtype)),
        (false, true) => out.push_str(&format!("  {what}\n")),
        (true, false) => out.push_str(&format!("  {}\n", alert.subtype)),
        (true, true) => {}
    }

    if !info.rivers.is_empty() {
        out.push_str(&format!("  Rivers: {}\n", info.rivers.join(", ")));
    }
    if !info.hazards.is_empty() {
        out.push_str(&format!("  Hazards: {}\n", info.hazards.join(", ")));
    }
    if !alert.headline.is_empty() {
        out.push_str(&format!("  {}\n", alert.headline.trim()));
    }
    if !alert.issued_date.is_empty() {
        out.push_str(&format!("  Issued: {}\n", alert.issued_date));
    }
}

/// Banner printed when a refresh fails.  The previous snapshot, if any, is
/// still what the operator is looking at.
pub fn format_error(message: &str, has_previous: bool) -> String {
    let mut out = format!("⚠️ Failed to refresh alerts: {message}\n");
    if has_previous {
        out.push_str("Showing the last successful update.\n");
    }
    out
}
