//! Level indicator
//!
//! Display data for a score badge: the `"<level> (<score>%)"` label, its colors,
//! and the physical/emotional split shown on the dashboard.

use crate::levels::{self, Rgb};
use crate::types::{ScoreResult, StressLevel};
use serde::Serialize;

/// Share of the score attributed to physical indicators
pub const PHYSICAL_WEIGHT: f64 = 0.7;
/// Share of the score attributed to emotional indicators
pub const EMOTIONAL_WEIGHT: f64 = 0.3;

/// Badge contents for a score result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelIndicator {
    pub level: StressLevel,
    pub rounded_score: i64,
    pub label: String,
    pub color: Rgb,
    pub tint: Rgb,
}

impl LevelIndicator {
    pub fn new(result: &ScoreResult) -> Self {
        let band = levels::band(result.level());
        let rounded_score = result.score().round() as i64;
        Self {
            level: result.level(),
            rounded_score,
            label: format!("{} ({}%)", result.level(), rounded_score),
            color: band.color,
            tint: band.tint,
        }
    }
}

/// Dashboard split of a score into physical (out of 70) and emotional (out of 30) parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub physical: i64,
    pub emotional: i64,
}

impl ScoreBreakdown {
    pub const PHYSICAL_MAX: i64 = 70;
    pub const EMOTIONAL_MAX: i64 = 30;

    pub fn new(result: &ScoreResult) -> Self {
        Self {
            physical: (result.score() * PHYSICAL_WEIGHT).round() as i64,
            emotional: (result.score() * EMOTIONAL_WEIGHT).round() as i64,
        }
    }
}
