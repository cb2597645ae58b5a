//! Core types for Stress Lens
//!
//! This module defines the data that flows between the questionnaire, the
//! classifier, the trend analyzer and the chart renderer. Levels are always
//! derived from scores: [`ScoreResult`] and [`StressSample`] keep their fields
//! private and are only built through constructors that classify the score.

use crate::error::ComputeError;
use crate::levels::{self, Rgb};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stress severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StressLevel {
    Low,
    Moderate,
    High,
    Severe,
}

impl StressLevel {
    /// All levels in ascending severity
    pub const ALL: [StressLevel; 4] = [
        StressLevel::Low,
        StressLevel::Moderate,
        StressLevel::High,
        StressLevel::Severe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StressLevel::Low => "low",
            StressLevel::Moderate => "moderate",
            StressLevel::High => "high",
            StressLevel::Severe => "severe",
        }
    }

    /// Zero-based severity rank
    pub fn rank(&self) -> usize {
        match self {
            StressLevel::Low => 0,
            StressLevel::Moderate => 1,
            StressLevel::High => 2,
            StressLevel::Severe => 3,
        }
    }

    /// Classify a 0-100 score
    pub fn from_score(score: f64) -> Self {
        levels::level_for_score(score)
    }

    /// Capitalized display label
    pub fn label(&self) -> &'static str {
        levels::band(*self).label
    }

    /// Marker color
    pub fn color(&self) -> Rgb {
        levels::band(*self).color
    }
}

impl fmt::Display for StressLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StressLevel {
    type Err = ComputeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(StressLevel::Low),
            "moderate" => Ok(StressLevel::Moderate),
            "high" => Ok(StressLevel::High),
            "severe" => Ok(StressLevel::Severe),
            other => Err(ComputeError::InvalidInput(format!(
                "unknown stress level '{}'",
                other
            ))),
        }
    }
}

/// One answered questionnaire item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionnaireResponse {
    /// Question identifier
    #[serde(alias = "id")]
    pub question_id: u32,
    /// Question text as shown to the user
    #[serde(alias = "question", default)]
    pub question_text: String,
    /// Answer on the 1-5 frequency scale
    pub answer: i32,
}

impl QuestionnaireResponse {
    pub fn new(question_id: u32, question_text: impl Into<String>, answer: i32) -> Self {
        Self {
            question_id,
            question_text: question_text.into(),
            answer,
        }
    }
}

/// Score and level of one assessment.
///
/// Only the classifier builds these, so the level always matches the score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreResult {
    score: f64,
    level: StressLevel,
}

impl ScoreResult {
    pub(crate) fn from_score(score: f64) -> Self {
        Self {
            score,
            level: StressLevel::from_score(score),
        }
    }

    /// Percentage score
    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn level(&self) -> StressLevel {
        self.level
    }
}

/// A dated score in a user's stress history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStressSample")]
pub struct StressSample {
    level: StressLevel,
    score: f64,
    timestamp: DateTime<Utc>,
}

impl StressSample {
    /// Build a sample from a bare score, deriving its level.
    ///
    /// The score must be a finite value in `[0, 100]`.
    pub fn from_score(score: f64, timestamp: DateTime<Utc>) -> Result<Self, ComputeError> {
        if !score.is_finite() || !(0.0..=100.0).contains(&score) {
            return Err(ComputeError::InvalidInput(format!(
                "sample score {} is outside [0, 100]",
                score
            )));
        }
        Ok(Self {
            level: StressLevel::from_score(score),
            score,
            timestamp,
        })
    }

    pub fn level(&self) -> StressLevel {
        self.level
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Wire form of a sample; the stated level is checked against the score
#[derive(Debug, Deserialize)]
struct RawStressSample {
    #[serde(default)]
    level: Option<String>,
    score: f64,
    timestamp: DateTime<Utc>,
}

impl TryFrom<RawStressSample> for StressSample {
    type Error = ComputeError;

    fn try_from(raw: RawStressSample) -> Result<Self, Self::Error> {
        let sample = StressSample::from_score(raw.score, raw.timestamp)?;
        if let Some(name) = raw.level {
            let stated: StressLevel = name.parse()?;
            if stated != sample.level {
                return Err(ComputeError::InvalidInput(format!(
                    "level '{}' does not match score {} (expected '{}')",
                    stated, raw.score, sample.level
                )));
            }
        }
        Ok(sample)
    }
}

/// Direction of recent stress movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Up => "up",
            TrendDirection::Down => "down",
            TrendDirection::Stable => "stable",
        }
    }
}

/// Recent trend of a stress history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trend {
    pub direction: TrendDirection,
    /// Magnitude of the change relative to the older average, in percent
    pub percentage: u32,
}

impl Trend {
    pub fn stable() -> Self {
        Self {
            direction: TrendDirection::Stable,
            percentage: 0,
        }
    }
}

/// Profile-level aggregate of a stress history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    /// Mean score, rounded to the nearest integer
    pub average_score: u32,
    /// Number of samples
    pub assessments: usize,
    /// Timestamp of the most recent sample
    pub last_assessed: DateTime<Utc>,
}

/// Everything produced by one submitted questionnaire
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentOutcome {
    pub assessment_id: Uuid,
    pub result: ScoreResult,
    pub recommendations: Vec<String>,
    pub assessed_at: DateTime<Utc>,
}
