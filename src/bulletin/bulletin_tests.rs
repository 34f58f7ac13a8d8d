// ─────────────────────────────── Tests ───────────────────────────────────

#[cfg(test)]
mod tests {
    use crate::alert::{ProvinceDetail, Provinces, RawAlert};
    use crate::bulletin::event_kind::EventKind;
    use crate::bulletin::patterns::{COASTAL_WATERS_SECTION, SEVERE_WINDS_SECTION};
    use crate::bulletin::rules::{river_list, section_span, title_case};
    use crate::bulletin::*;
    use crate::filter::TargetConfig;

    fn extractor() -> Extractor {
        Extractor::new(TargetConfig::bataan(), LevelPolicy::LastMatch).unwrap()
    }

    fn alert(event: &str, kind: &str, subtype: &str, message: &str) -> RawAlert {
        RawAlert {
            identifier: "test-1".into(),
            event: event.into(),
            kind: kind.into(),
            subtype: subtype.into(),
            message: message.into(),
            ..Default::default()
        }
    }

    fn rainfall(message: &str) -> RawAlert {
        alert("Rainfall", "Heavy Rainfall Warning", "Rainfall Warning", message)
    }

    fn cyclone(message: &str) -> RawAlert {
        alert("", "CAP", "Tropical Cyclone Bulletin", message)
    }

    fn province(name: &str, municipality: Option<&str>) -> ProvinceDetail {
        ProvinceDetail {
            province: name.into(),
            municipality: municipality.map(Into::into),
            ..Default::default()
        }
    }

    // ── Defaults ──

    #[test]
    fn unrecognised_bulletin_leaves_defaults() {
        let info = extractor().extract(&rainfall("Fair weather expected nationwide."));
        assert_eq!(info.province, "Bataan");
        assert!(info.municipalities.is_empty());
        assert_eq!(info.warning_level, None);
        assert!(info.rivers.is_empty());
        assert!(info.hazards.is_empty());
    }

    #[test]
    fn empty_alert_does_not_panic() {
        let info = extractor().extract(&RawAlert::default());
        assert_eq!(info, ExtractedInfo::new("Bataan"));
    }

    // ── Structured provinces ──

    #[test]
    fn structured_entries_supply_name_and_municipalities() {
        let mut a = rainfall("");
        a.provinces = Provinces(vec![
            ("1".into(), province("Cavite", Some("Naic"))),
            ("2".into(), province("Bataan Province", Some("Orani"))),
            ("3".into(), province("Bataan Province", Some("Orani"))),
            ("4".into(), province("Bataan Province", Some("Hermosa"))),
        ]);
        let info = extractor().extract(&a);
        assert_eq!(info.province, "Bataan Province");
        assert_eq!(info.municipalities, ["Orani", "Hermosa"]);
    }

    // ── Rainfall warning markers ──

    #[test]
    fn marker_mentioning_province_sets_level() {
        let info = extractor().extract(&rainfall(
            "ORANGE WARNING LEVEL: Bataan, Pampanga and Zambales. Flooding is threatening.",
        ));
        assert_eq!(info.warning_level, Some(WarningLevel::Orange));
    }

    #[test]
    fn marker_for_other_provinces_is_ignored() {
        let info = extractor().extract(&rainfall(
            "RED WARNING LEVEL: Zambales. YELLOW WARNING LEVEL: Bataan and Cavite.",
        ));
        assert_eq!(info.warning_level, Some(WarningLevel::Yellow));
    }

    #[test]
    fn yellow_evaluated_after_red_wins() {
        // Markers are evaluated RED, ORANGE, YELLOW regardless of their
        // position in the text; the last match overwrites.
        let info = extractor().extract(&rainfall(
            "YELLOW WARNING LEVEL: Bataan and Bulacan. RED WARNING LEVEL: Bataan and Zambales.",
        ));
        assert_eq!(info.warning_level, Some(WarningLevel::Yellow));
    }

    #[test]
    fn highest_policy_keeps_red() {
        let ex = Extractor::new(TargetConfig::bataan(), LevelPolicy::Highest).unwrap();
        let info = ex.extract(&rainfall(
            "YELLOW WARNING LEVEL: Bataan and Bulacan. RED WARNING LEVEL: Bataan and Zambales.",
        ));
        assert_eq!(info.warning_level, Some(WarningLevel::Red));
    }

    #[test]
    fn marker_is_case_insensitive() {
        let info = extractor().extract(&rainfall("red warning level: bataan. "));
        assert_eq!(info.warning_level, Some(WarningLevel::Red));
    }

    // ── River bullets ──

    #[test]
    fn unknown_rivers_become_municipalities() {
        let info = extractor().extract(&rainfall(
            "**Bataan** - particularly Talisay River and Wawa River.",
        ));
        assert_eq!(info.rivers, ["Talisay River", "Wawa River"]);
        assert_eq!(info.municipalities, ["Talisay River", "Wawa River"]);
    }

    #[test]
    fn river_fallback_title_cases_names() {
        let info = extractor().extract(&rainfall("**BATAAN** - particularly TALISAY river"));
        assert_eq!(info.rivers, ["TALISAY river"]);
        assert_eq!(info.municipalities, ["Talisay River"]);
    }

    #[test]
    fn rivers_matching_gazetteer_map_to_municipalities() {
        let info = extractor().extract(&rainfall(
            "**Bataan** - particularly Morong River, Orani River and Pilar.\n+ Other areas",
        ));
        assert_eq!(info.rivers, ["Morong River", "Orani River", "Pilar"]);
        assert_eq!(info.municipalities, ["Morong", "Orani", "Pilar"]);
    }

    #[test]
    fn bullet_without_particularly_has_no_rivers() {
        let info = extractor().extract(&rainfall("**Bataan** - low-lying areas may flood"));
        assert!(info.rivers.is_empty());
        assert!(info.municipalities.is_empty());
    }

    #[test]
    fn bullet_for_other_province_is_ignored() {
        let info = extractor().extract(&rainfall(
            "**Zambales** - particularly Sto. Tomas River. Bataan under light rains.",
        ));
        assert!(info.rivers.is_empty());
    }

    // ── Direct gazetteer scan ──

    #[test]
    fn gazetteer_names_found_in_text() {
        let info = extractor().extract(&rainfall(
            "Moderate to heavy rains over Bataan; heavy rains expected in Morong and Orani.",
        ));
        assert_eq!(info.municipalities, ["Morong", "Orani"]);
    }

    #[test]
    fn gazetteer_scan_needs_province_mention() {
        let info = extractor().extract(&rainfall("Heavy rains expected in Morong and Orani."));
        assert!(info.municipalities.is_empty());
    }

    #[test]
    fn generated_message_is_scanned_when_message_empty() {
        let mut a = rainfall("");
        a.generated_message = Some("Bataan: rains over Limay.".into());
        let info = extractor().extract(&a);
        assert_eq!(info.municipalities, ["Limay"]);
    }

    // ── Tropical cyclone ──

    #[test]
    fn cyclone_without_province_extracts_nothing() {
        let a = cyclone("Severe winds and heavy rainfall over Zambales and Pangasinan.");
        let info = extractor().extract(&a);
        assert!(info.hazards.is_empty());
        assert_eq!(info.warning_level, None);
        assert!(info.municipalities.is_empty());
        assert_eq!(EventKind::of(&a), EventKind::TropicalCyclone);
    }

    #[test]
    fn cyclone_wind_and_rain_hazards() {
        let info = extractor().extract(&cyclone(
            "Strong to gale-force gusts over Bataan. Heavy rainfall is possible.",
        ));
        assert_eq!(info.hazards, ["Severe Winds", "Heavy Rainfall"]);
        assert_eq!(info.warning_level, Some(WarningLevel::Orange));
        assert_eq!(info.municipalities, ["Province-wide"]);
    }

    #[test]
    fn cyclone_rain_only_defaults_to_orange() {
        let info = extractor().extract(&cyclone("Heavy rains may affect Bataan."));
        assert_eq!(info.hazards, ["Heavy Rainfall"]);
        assert_eq!(info.warning_level, Some(WarningLevel::Orange));
    }

    #[test]
    fn cyclone_sea_state_hazards() {
        let info = extractor().extract(&cyclone(
            "HAZARDS AFFECTING COASTAL WATERS\nRough seas over the seaboard of Bataan. Moderate seas elsewhere.",
        ));
        assert_eq!(info.hazards, ["Rough Seas", "Moderate Seas"]);
        assert_eq!(info.warning_level, Some(WarningLevel::Orange));
    }

    #[test]
    fn cyclone_event_tag_triggers_pass() {
        let a = alert("TCB", "", "", "Severe winds over Bataan.");
        let info = extractor().extract(&a);
        assert_eq!(info.hazards, ["Severe Winds"]);
    }

    #[test]
    fn cyclone_hazards_are_not_repeated() {
        let info = extractor().extract(&cyclone(
            "SEVERE WINDS\nGale-force winds over Bataan and Zambales.\n\
             HAZARDS AFFECTING COASTAL WATERS\nRough seas over Bataan.",
        ));
        assert_eq!(info.hazards, ["Severe Winds", "Rough Seas"]);
    }

    #[test]
    fn section_span_stops_at_next_heading() {
        let text = "SEVERE WINDS\nBataan and Zambales\nHAZARDS AFFECTING COASTAL WATERS\nRough seas over Cavite";
        assert_eq!(
            section_span(text, &SEVERE_WINDS_SECTION),
            Some("SEVERE WINDS\nBataan and Zambales\n")
        );
        assert_eq!(
            section_span(text, &COASTAL_WATERS_SECTION),
            Some("HAZARDS AFFECTING COASTAL WATERS\nRough seas over Cavite")
        );
    }

    #[test]
    fn section_span_recognises_markdown_headings() {
        let text = "**Severe Winds**\n- Bataan\n\n## Heavy Rainfall\n- Cavite";
        assert_eq!(
            section_span(text, &SEVERE_WINDS_SECTION),
            Some("Severe Winds**\n- Bataan\n\n")
        );
    }

    #[test]
    fn section_span_missing_section() {
        assert_eq!(section_span("nothing here", &SEVERE_WINDS_SECTION), None);
    }

    // ── Thunderstorm ──

    #[test]
    fn thunderstorm_advisory_is_yellow() {
        let info = extractor().extract(&alert(
            "Thunderstorm",
            "",
            "Thunderstorm Advisory",
            "Thunderstorms are affecting Bataan.",
        ));
        assert_eq!(info.warning_level, Some(WarningLevel::Yellow));
        assert_eq!(info.hazards, ["Thunderstorm Advisory"]);
        assert_eq!(info.municipalities, ["Province-wide"]);
    }

    #[test]
    fn thunderstorm_watch_and_warning() {
        let watch = extractor().extract(&alert(
            "",
            "Thunderstorm",
            "Thunderstorm Watch",
            "Bataan",
        ));
        assert_eq!(watch.warning_level, Some(WarningLevel::Orange));
        assert_eq!(watch.hazards, ["Thunderstorm Watch"]);

        let warning = extractor().extract(&alert(
            "Thunderstorm",
            "",
            "Thunderstorm Warning",
            "Bataan",
        ));
        assert_eq!(warning.warning_level, Some(WarningLevel::Red));
        assert_eq!(warning.hazards, ["Thunderstorm Warning"]);
    }

    #[test]
    fn thunderstorm_subtype_watch_checked_first() {
        let info = extractor().extract(&alert(
            "Thunderstorm",
            "",
            "Thunderstorm Watch / Warning",
            "Bataan",
        ));
        assert_eq!(info.warning_level, Some(WarningLevel::Orange));
    }

    #[test]
    fn thunderstorm_structured_province_is_enough() {
        let mut a = alert("Thunderstorm", "", "Thunderstorm Advisory", "");
        a.provinces = Provinces(vec![("0".into(), province("Bataan", None))]);
        let info = extractor().extract(&a);
        assert_eq!(info.hazards, ["Thunderstorm Advisory"]);
        assert_eq!(info.municipalities, ["Province-wide"]);
    }

    #[test]
    fn thunderstorm_elsewhere_is_ignored() {
        let info = extractor().extract(&alert(
            "Thunderstorm",
            "",
            "Thunderstorm Warning",
            "Thunderstorms over Metro Manila.",
        ));
        assert!(info.hazards.is_empty());
        assert_eq!(info.warning_level, None);
    }

    // ── Flood ──

    #[test]
    fn severe_flood_bullet() {
        let info = extractor().extract(&alert(
            "Flood",
            "",
            "Severe Flood Advisory",
            "**Bataan** - particularly Talisay River and Wawa River.",
        ));
        assert_eq!(info.warning_level, Some(WarningLevel::Orange));
        assert_eq!(info.hazards, ["Severe Flood Advisory"]);
        assert_eq!(info.rivers, ["Talisay River", "Wawa River"]);
        assert_eq!(info.municipalities, ["Province-wide"]);
    }

    #[test]
    fn extreme_and_general_flood_levels() {
        let extreme = extractor().extract(&alert(
            "",
            "",
            "Extreme Flood Advisory",
            "**Bataan** - rivers overflowing",
        ));
        assert_eq!(extreme.warning_level, Some(WarningLevel::Red));
        assert_eq!(extreme.hazards, ["Extreme Flood Advisory"]);

        let general = extractor().extract(&alert(
            "Flood",
            "",
            "Advisory",
            "**Bataan** - particularly Abucay River",
        ));
        assert_eq!(general.warning_level, Some(WarningLevel::Yellow));
        assert_eq!(general.hazards, ["General Flood Advisory"]);
        assert_eq!(general.municipalities, ["Abucay"]);
    }

    #[test]
    fn flood_without_bullet_contributes_nothing() {
        let info = extractor().extract(&alert(
            "Flood",
            "",
            "Extreme Flood Advisory",
            "Flooding along Pampanga river basin.",
        ));
        assert_eq!(info.warning_level, None);
        assert!(info.hazards.is_empty());
        assert!(info.municipalities.is_empty());
    }

    #[test]
    fn rainfall_marker_overrides_flood_level() {
        let a = alert(
            "Flood",
            "",
            "Extreme Flood Advisory",
            "**Bataan** - particularly Orani River\nYELLOW WARNING LEVEL: Bataan.",
        );
        assert_eq!(
            extractor().extract(&a).warning_level,
            Some(WarningLevel::Yellow)
        );
        let highest = Extractor::new(TargetConfig::bataan(), LevelPolicy::Highest).unwrap();
        assert_eq!(highest.extract(&a).warning_level, Some(WarningLevel::Red));
    }

    // ── Other province ──

    #[test]
    fn custom_target_and_gazetteer() {
        let ex = Extractor::new(
            TargetConfig::new("Zambales", &["Iba", "Subic"]),
            LevelPolicy::LastMatch,
        )
        .unwrap();
        let info = ex.extract(&rainfall(
            "ORANGE WARNING LEVEL: Zambales. Rains in Subic.\n**Zambales** - particularly Sto. Tomas River",
        ));
        assert_eq!(info.province, "Zambales");
        assert_eq!(info.warning_level, Some(WarningLevel::Orange));
        assert_eq!(info.rivers, ["Sto. Tomas River"]);
        assert_eq!(info.municipalities, ["Sto. Tomas River", "Subic"]);
    }

    // ── Helpers ──

    #[test]
    fn river_list_splits_on_and_and_commas() {
        assert_eq!(
            river_list("particularly A River, B Creek and C River."),
            ["A River", "B Creek", "C River"]
        );
        assert!(river_list("no list here").is_empty());
    }

    #[test]
    fn capitalised_particularly_is_not_a_river_list() {
        assert!(river_list("Particularly Talisay River").is_empty());

        let info = extractor().extract(&rainfall("**Bataan** - Particularly Talisay River"));
        assert!(info.rivers.is_empty());
        assert!(info.municipalities.is_empty());
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("talisay RIVER"), "Talisay River");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn extracted_info_serializes_empty_level_as_string() {
        let v = serde_json::to_value(ExtractedInfo::new("Bataan")).unwrap();
        assert_eq!(v["warningLevel"], "");
        assert_eq!(v["province"], "Bataan");
    }
}
