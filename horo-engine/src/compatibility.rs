//! Sign compatibility
//!
//! Pure functions over static sign data; nothing here is cached or persisted.

use serde::Serialize;

use crate::zodiac::Sign;

/// How two signs relate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompatibilityLevel {
    /// Listed as compatible
    High,
    /// Same element
    Elemental,
    Contrasting,
}

impl CompatibilityLevel {
    pub fn score(self) -> f32 {
        match self {
            CompatibilityLevel::High => 0.9,
            CompatibilityLevel::Elemental => 0.75,
            CompatibilityLevel::Contrasting => 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Compatibility {
    pub first: Sign,
    pub second: Sign,
    pub level: CompatibilityLevel,
    pub score: f32,
    pub description: String,
}

/// Assess `b` from `a`'s point of view using an explicit compatible list
pub fn assess_with(a: Sign, b: Sign, compatible: &[Sign]) -> Compatibility {
    let level = if compatible.contains(&b) {
        CompatibilityLevel::High
    } else if a.element() == b.element() {
        CompatibilityLevel::Elemental
    } else {
        CompatibilityLevel::Contrasting
    };

    let description = match level {
        CompatibilityLevel::High => format!(
            "High compatibility! {} and {} share excellent harmony.",
            a.display_name(),
            b.display_name()
        ),
        CompatibilityLevel::Elemental => format!(
            "Good compatibility through shared {} energy.",
            a.element().display_name()
        ),
        CompatibilityLevel::Contrasting => format!(
            "Moderate compatibility. {} and {} can learn from each other's differences.",
            a.display_name(),
            b.display_name()
        ),
    };

    Compatibility {
        first: a,
        second: b,
        level,
        score: level.score(),
        description,
    }
}

/// Assess using the static compatible-sign table
pub fn assess(a: Sign, b: Sign) -> Compatibility {
    assess_with(a, b, a.compatible_signs())
}

/// Compatibility text for two signs
pub fn describe(a: Sign, b: Sign) -> String {
    assess(a, b).description
}
