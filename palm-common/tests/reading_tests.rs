//! Reading generator behaviour
//!
//! Fixtures pin the exact output for known fingerprints. If one of these
//! changes, every stored analysis would render a different reading.

use std::collections::HashSet;

use palm_common::reading::{generate, tables, Reading, SeededRandom};

fn trait_names(reading: &Reading) -> Vec<&str> {
    reading.personality_traits.iter().map(String::as_str).collect()
}

fn feature_names(reading: &Reading) -> Vec<&str> {
    reading
        .special_features
        .iter()
        .map(|f| f.name.as_str())
        .collect()
}

// =============================================================================
// Fixtures
// =============================================================================

#[test]
fn test_empty_fingerprint_selects_second_overall_interpretation() {
    // seed 0 -> first draw 49297/233280 ~ 0.2113 -> floor(0.2113 * 5) = 1
    let reading = generate("");
    assert_eq!(
        reading.overall_interpretation,
        tables::OVERALL_INTERPRETATIONS[1]
    );
}

#[test]
fn test_empty_fingerprint_full_reading() {
    let reading = generate("");

    assert_eq!(reading.life_line.strength, "Bold");
    assert_eq!(reading.life_line.length, "Short");
    assert_eq!(
        reading.life_line.interpretation,
        tables::LIFE_LINE_INTERPRETATIONS[3]
    );

    assert_eq!(reading.heart_line.depth, "Subtle");
    assert_eq!(reading.heart_line.curve, "Curved");
    assert_eq!(
        reading.heart_line.interpretation,
        tables::HEART_LINE_INTERPRETATIONS[1]
    );

    assert_eq!(reading.head_line.clarity, "Refined");
    assert_eq!(reading.head_line.direction, "Flowing");
    assert_eq!(
        reading.head_line.interpretation,
        tables::HEAD_LINE_INTERPRETATIONS[2]
    );

    assert_eq!(reading.fate_line.presence, "Present");
    assert_eq!(reading.fate_line.direction, "Wavy");
    assert_eq!(
        reading.fate_line.interpretation,
        tables::FATE_LINE_INTERPRETATIONS[3]
    );

    assert_eq!(feature_names(&reading), vec!["Mount of Mars", "Mount of Venus"]);
    assert_eq!(
        reading.special_features[0].meaning,
        "Courage, determination, and fighting spirit"
    );

    assert_eq!(
        trait_names(&reading),
        vec![
            "Compassionate",
            "Spiritual",
            "Loyal",
            "Reliable",
            "Innovative",
            "Ambitious",
            "Thoughtful",
        ]
    );
}

#[test]
fn test_hello_fingerprint_full_reading() {
    let reading = generate("hello");

    assert_eq!(
        reading.overall_interpretation,
        tables::OVERALL_INTERPRETATIONS[3]
    );
    assert_eq!(reading.life_line.strength, "Moderate");
    assert_eq!(reading.life_line.length, "Medium");
    assert_eq!(reading.heart_line.depth, "Subtle");
    assert_eq!(reading.heart_line.curve, "Wavy");
    assert_eq!(reading.head_line.clarity, "Clear");
    assert_eq!(reading.head_line.direction, "Straight");
    assert_eq!(reading.fate_line.presence, "Multiple");
    assert_eq!(reading.fate_line.direction, "Branched");
    assert_eq!(
        reading.fate_line.interpretation,
        tables::FATE_LINE_INTERPRETATIONS[0]
    );

    assert_eq!(
        feature_names(&reading),
        vec!["Mount of Saturn", "Star Formation", "Mount of Jupiter", "Mount of Luna"]
    );
    assert_eq!(
        trait_names(&reading),
        vec![
            "Charismatic",
            "Ambitious",
            "Empathetic",
            "Independent",
            "Practical",
            "Resilient",
            "Creative",
            "Spiritual",
        ]
    );
}

#[test]
fn test_base64_fingerprint_with_negative_hash() {
    // "aGVsbG8=" hashes to -1586535987 before the absolute value
    let reading = generate("aGVsbG8=");
    assert_eq!(reading.life_line.strength, "Faint");
    assert_eq!(reading.life_line.length, "Curved");
    assert_eq!(feature_names(&reading), vec!["Mount of Luna", "Mount of Apollo"]);
    assert_eq!(reading.personality_traits.len(), 7);
}

// =============================================================================
// Properties
// =============================================================================

fn sample_fingerprints() -> Vec<String> {
    (0..200)
        .map(|i| format!("iVBORw0KGgoAAAANSUhEUg{:08x}", i * 7919))
        .collect()
}

#[test]
fn test_generation_is_deterministic_across_samples() {
    for fingerprint in sample_fingerprints() {
        assert_eq!(generate(&fingerprint), generate(&fingerprint));
    }
}

#[test]
fn test_distinct_fingerprints_produce_distinct_readings() {
    let readings: HashSet<String> = sample_fingerprints()
        .iter()
        .map(|f| serde_json::to_string(&generate(f)).unwrap())
        .collect();
    assert!(readings.len() > 1, "all samples produced the same reading");
}

#[test]
fn test_counts_within_range_and_unique() {
    for fingerprint in sample_fingerprints() {
        let reading = generate(&fingerprint);

        let features = feature_names(&reading);
        assert!((2..=4).contains(&features.len()), "{} features", features.len());
        let unique: HashSet<_> = features.iter().collect();
        assert_eq!(unique.len(), features.len());

        let traits = trait_names(&reading);
        assert!((5..=9).contains(&traits.len()), "{} traits", traits.len());
        let unique: HashSet<_> = traits.iter().collect();
        assert_eq!(unique.len(), traits.len());
    }
}

#[test]
fn test_fields_drawn_from_candidate_tables() {
    for fingerprint in sample_fingerprints().iter().take(50) {
        let reading = generate(fingerprint);
        assert!(tables::LIFE_LINE_STRENGTHS.contains(&reading.life_line.strength.as_str()));
        assert!(tables::HEART_LINE_CURVES.contains(&reading.heart_line.curve.as_str()));
        assert!(tables::HEAD_LINE_DIRECTIONS.contains(&reading.head_line.direction.as_str()));
        assert!(tables::FATE_LINE_PRESENCES.contains(&reading.fate_line.presence.as_str()));
        for feature in &reading.special_features {
            assert!(tables::SPECIAL_FEATURES
                .iter()
                .any(|(name, meaning)| *name == feature.name && *meaning == feature.meaning));
        }
    }
}

#[test]
fn test_reading_json_uses_snake_case_keys() {
    let value = serde_json::to_value(generate("")).unwrap();
    assert!(value["overall_interpretation"].is_string());
    assert!(value["life_line"]["strength"].is_string());
    assert!(value["heart_line"]["curve"].is_string());
    assert!(value["head_line"]["clarity"].is_string());
    assert!(value["fate_line"]["presence"].is_string());
    assert!(value["special_features"][0]["meaning"].is_string());
    assert!(value["personality_traits"].is_array());
}

#[test]
fn test_stream_position_changes_output() {
    // Skipping a single draw must shift every later selection
    let mut shifted = SeededRandom::with_seed(0);
    shifted.next_draw();
    let reading = palm_common::reading::generate_with(&mut shifted);
    assert_ne!(reading, generate(""));
}
