//! Demo stress history
//!
//! Generates a plausible daily history for dashboards that have no stored
//! assessments yet: a base score with a weekday bump and uniform noise.

use crate::error::ComputeError;
use crate::types::StressSample;
use chrono::{DateTime, Datelike, Duration, Utc};
use rand::Rng;

/// Number of daily samples generated, ending at the given instant
pub const DEMO_DAYS: i64 = 15;

/// Score around which demo samples vary
pub const DEMO_BASE_SCORE: f64 = 50.0;

/// Added on Monday through Friday
pub const WEEKDAY_BONUS: f64 = 10.0;

/// Noise is drawn uniformly from `[-DEMO_NOISE, DEMO_NOISE)`
pub const DEMO_NOISE: f64 = 15.0;

/// Generate [`DEMO_DAYS`] daily samples, oldest first, the last one at `end`.
pub fn generate_history<R: Rng + ?Sized>(
    end: DateTime<Utc>,
    rng: &mut R,
) -> Result<Vec<StressSample>, ComputeError> {
    (0..DEMO_DAYS)
        .rev()
        .map(|days_back| {
            let timestamp = end - Duration::days(days_back);
            let mut score = DEMO_BASE_SCORE;
            if timestamp.weekday().number_from_monday() <= 5 {
                score += WEEKDAY_BONUS;
            }
            score += rng.gen_range(-DEMO_NOISE..DEMO_NOISE);
            StressSample::from_score(score.clamp(0.0, 100.0), timestamp)
        })
        .collect()
}
