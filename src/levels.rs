//! Level table
//!
//! The single source of truth for score thresholds, display labels and colors.
//! The classifier, the chart renderer and the level indicator all read from
//! [`LEVEL_BANDS`]; nothing else hard-codes a breakpoint or a level color.

use crate::types::StressLevel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// `#RRGGBB` form, uppercase
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value).ok_or_else(|| format!("invalid color '{}', expected #RRGGBB", value))
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.hex()
    }
}

/// One row of the level table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelBand {
    pub level: StressLevel,
    /// Inclusive lower bound of the band, on the 0-100 score scale
    pub lower_bound: f64,
    /// Capitalized display label (chart axis)
    pub label: &'static str,
    /// Marker / indicator foreground color
    pub color: Rgb,
    /// Light background tint for indicator badges
    pub tint: Rgb,
}

/// Level bands in ascending severity. Each band spans `[lower_bound, next.lower_bound)`;
/// the last band is closed at the top.
pub const LEVEL_BANDS: [LevelBand; 4] = [
    LevelBand {
        level: StressLevel::Low,
        lower_bound: 0.0,
        label: "Low",
        color: Rgb::new(0x10, 0xB9, 0x81),
        tint: Rgb::new(0xD1, 0xFA, 0xE5),
    },
    LevelBand {
        level: StressLevel::Moderate,
        lower_bound: 30.0,
        label: "Moderate",
        color: Rgb::new(0xFB, 0xBF, 0x24),
        tint: Rgb::new(0xFE, 0xF3, 0xC7),
    },
    LevelBand {
        level: StressLevel::High,
        lower_bound: 60.0,
        label: "High",
        color: Rgb::new(0xF9, 0x73, 0x16),
        tint: Rgb::new(0xFF, 0xED, 0xD5),
    },
    LevelBand {
        level: StressLevel::Severe,
        lower_bound: 85.0,
        label: "Severe",
        color: Rgb::new(0xEF, 0x44, 0x44),
        tint: Rgb::new(0xFE, 0xE2, 0xE2),
    },
];

/// Color used for level names that are not in the table
pub const FALLBACK_COLOR: Rgb = Rgb::new(0x3B, 0x82, 0xF6);

/// Look up the band for a level
pub fn band(level: StressLevel) -> &'static LevelBand {
    // LEVEL_BANDS is indexed by severity rank
    &LEVEL_BANDS[level.rank()]
}

/// Classify a score into a level.
///
/// Scores below zero fall into the lowest band and scores above 100 into the
/// highest; the classifier does not clamp out-of-range answers.
pub fn level_for_score(score: f64) -> StressLevel {
    LEVEL_BANDS
        .iter()
        .rev()
        .find(|band| score >= band.lower_bound)
        .map(|band| band.level)
        .unwrap_or(StressLevel::Low)
}

/// Marker color for a level name, falling back to [`FALLBACK_COLOR`] for unknown names
pub fn color_for_name(name: &str) -> Rgb {
    name.parse::<StressLevel>()
        .map(|level| band(level).color)
        .unwrap_or(FALLBACK_COLOR)
}
