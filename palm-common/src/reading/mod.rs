//! Deterministic palm reading generator
//!
//! `generate` maps a content fingerprint to a [`Reading`] by consuming one
//! [`SeededRandom`] stream in a fixed order:
//!
//! 1. overall interpretation
//! 2. life line: strength, length, interpretation
//! 3. heart line: depth, curve, interpretation
//! 4. head line: clarity, direction, interpretation
//! 5. fate line: presence, direction, interpretation
//! 6. special feature count, then the features
//! 7. personality trait count, then the traits
//!
//! Each draw is its own statement so the order cannot drift with struct
//! field layout.

pub mod rng;
pub mod tables;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use rng::{fingerprint_seed, SeededRandom};
use tables::*;

/// Structured reading stored as an analysis result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    pub overall_interpretation: String,
    pub life_line: LifeLine,
    pub heart_line: HeartLine,
    pub head_line: HeadLine,
    pub fate_line: FateLine,
    pub special_features: Vec<SpecialFeature>,
    pub personality_traits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeLine {
    pub strength: String,
    pub length: String,
    pub interpretation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartLine {
    pub depth: String,
    pub curve: String,
    pub interpretation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadLine {
    pub clarity: String,
    pub direction: String,
    pub interpretation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FateLine {
    pub presence: String,
    pub direction: String,
    pub interpretation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialFeature {
    pub name: String,
    pub meaning: String,
}

fn pick(rng: &mut SeededRandom, items: &[&str]) -> String {
    (*rng.choice(items)).to_string()
}

/// Generate the reading for a fingerprint
///
/// Total and pure: the same fingerprint always yields the same reading, and
/// the empty fingerprint yields the seed-0 reading.
pub fn generate(fingerprint: &str) -> Reading {
    let mut rng = SeededRandom::from_fingerprint(fingerprint);
    generate_with(&mut rng)
}

/// Generate a reading from an already-seeded stream
pub fn generate_with(rng: &mut SeededRandom) -> Reading {
    let overall_interpretation = pick(rng, &OVERALL_INTERPRETATIONS);

    let life_strength = pick(rng, &LIFE_LINE_STRENGTHS);
    let life_length = pick(rng, &LIFE_LINE_LENGTHS);
    let life_interpretation = pick(rng, &LIFE_LINE_INTERPRETATIONS);

    let heart_depth = pick(rng, &HEART_LINE_DEPTHS);
    let heart_curve = pick(rng, &HEART_LINE_CURVES);
    let heart_interpretation = pick(rng, &HEART_LINE_INTERPRETATIONS);

    let head_clarity = pick(rng, &HEAD_LINE_CLARITIES);
    let head_direction = pick(rng, &HEAD_LINE_DIRECTIONS);
    let head_interpretation = pick(rng, &HEAD_LINE_INTERPRETATIONS);

    let fate_presence = pick(rng, &FATE_LINE_PRESENCES);
    let fate_direction = pick(rng, &FATE_LINE_DIRECTIONS);
    let fate_interpretation = pick(rng, &FATE_LINE_INTERPRETATIONS);

    let feature_count = rng.next_in_span(SPECIAL_FEATURE_COUNT_MIN, SPECIAL_FEATURE_COUNT_SPAN);
    let special_features = rng
        .choices(&SPECIAL_FEATURES, feature_count)
        .into_iter()
        .map(|(name, meaning)| SpecialFeature {
            name: name.to_string(),
            meaning: meaning.to_string(),
        })
        .collect();

    let trait_count = rng.next_in_span(TRAIT_COUNT_MIN, TRAIT_COUNT_SPAN);
    let personality_traits = rng
        .choices(&PERSONALITY_TRAITS, trait_count)
        .into_iter()
        .map(str::to_string)
        .collect();

    Reading {
        overall_interpretation,
        life_line: LifeLine {
            strength: life_strength,
            length: life_length,
            interpretation: life_interpretation,
        },
        heart_line: HeartLine {
            depth: heart_depth,
            curve: heart_curve,
            interpretation: heart_interpretation,
        },
        head_line: HeadLine {
            clarity: head_clarity,
            direction: head_direction,
            interpretation: head_interpretation,
        },
        fate_line: FateLine {
            presence: fate_presence,
            direction: fate_direction,
            interpretation: fate_interpretation,
        },
        special_features,
        personality_traits,
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Your Palm Reading")?;
        writeln!(f)?;
        writeln!(f, "{}", self.overall_interpretation)?;
        writeln!(f)?;
        writeln!(
            f,
            "Life Line ({}, {})\n  {}",
            self.life_line.strength, self.life_line.length, self.life_line.interpretation
        )?;
        writeln!(
            f,
            "Heart Line ({}, {})\n  {}",
            self.heart_line.depth, self.heart_line.curve, self.heart_line.interpretation
        )?;
        writeln!(
            f,
            "Head Line ({}, {})\n  {}",
            self.head_line.clarity, self.head_line.direction, self.head_line.interpretation
        )?;
        writeln!(
            f,
            "Fate Line ({}, {})\n  {}",
            self.fate_line.presence, self.fate_line.direction, self.fate_line.interpretation
        )?;
        writeln!(f)?;
        writeln!(f, "Special Features")?;
        for feature in &self.special_features {
            writeln!(f, "  - {}: {}", feature.name, feature.meaning)?;
        }
        writeln!(f)?;
        write!(f, "Personality Traits: {}", self.personality_traits.join(", "))
    }
}
