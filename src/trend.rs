//! Trend analysis
//!
//! Compares the oldest and newest pairs of the five most recent samples to
//! report whether stress is rising, falling, or holding steady. Also provides
//! the profile summary (average score, count, last assessment).

use crate::error::ComputeError;
use crate::types::{HistorySummary, StressSample, Trend, TrendDirection};

/// Number of trailing samples compared by [`analyze_trend`]
pub const TREND_WINDOW: usize = 5;

/// Score change (in points) that counts as movement rather than noise
pub const TREND_THRESHOLD: f64 = 3.0;

/// Analyze the recent trend of a time-ordered history.
///
/// Histories with fewer than two samples are stable. Between two and
/// [`TREND_WINDOW`] - 1 samples there is not enough data for the comparison and
/// [`ComputeError::InsufficientHistory`] is returned. A zero older average makes
/// the relative change undefined and is rejected as invalid input.
pub fn analyze_trend(history: &[StressSample]) -> Result<Trend, ComputeError> {
    if history.len() < 2 {
        return Ok(Trend::stable());
    }
    if history.len() < TREND_WINDOW {
        return Err(ComputeError::InsufficientHistory {
            required: TREND_WINDOW,
            actual: history.len(),
        });
    }

    let recent = &history[history.len() - TREND_WINDOW..];
    let old_avg = mean(&recent[..2]);
    let new_avg = mean(&recent[3..]);

    if old_avg == 0.0 {
        return Err(ComputeError::InvalidInput(
            "older trend average is zero; relative change is undefined".to_string(),
        ));
    }

    let delta = new_avg - old_avg;
    let percentage = ((delta / old_avg).abs() * 100.0).round() as u32;

    let direction = if delta > TREND_THRESHOLD {
        TrendDirection::Up
    } else if delta < -TREND_THRESHOLD {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    };

    Ok(Trend {
        direction,
        percentage,
    })
}

/// Summarize a history for profile display
pub fn summarize(history: &[StressSample]) -> Result<HistorySummary, ComputeError> {
    let last = history.last().ok_or_else(|| {
        ComputeError::InvalidInput("cannot summarize an empty history".to_string())
    })?;

    Ok(HistorySummary {
        average_score: mean(history).round() as u32,
        assessments: history.len(),
        last_assessed: last.timestamp(),
    })
}

fn mean(samples: &[StressSample]) -> f64 {
    let sum: f64 = samples.iter().map(|s| s.score()).sum();
    sum / samples.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn history(scores: &[f64]) -> Vec<StressSample> {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        scores
            .iter()
            .enumerate()
            .map(|(i, &s)| StressSample::from_score(s, start + Duration::days(i as i64)).unwrap())
            .collect()
    }

    #[test]
    fn test_rising_trend() {
        let trend = analyze_trend(&history(&[40.0, 40.0, 60.0, 60.0, 60.0])).unwrap();
        assert_eq!(
            trend,
            Trend {
                direction: TrendDirection::Up,
                percentage: 50
            }
        );
    }

    #[test]
    fn test_falling_trend() {
        let trend = analyze_trend(&history(&[80.0, 80.0, 50.0, 40.0, 40.0])).unwrap();
        assert_eq!(trend.direction, TrendDirection::Down);
        assert_eq!(trend.percentage, 50);
    }

    #[test]
    fn test_small_change_is_stable() {
        // delta = 3 exactly, not above the threshold
        let trend = analyze_trend(&history(&[50.0, 50.0, 10.0, 53.0, 53.0])).unwrap();
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert_eq!(trend.percentage, 6);
    }

    #[test]
    fn test_uses_last_five_samples() {
        // Leading samples outside the window are ignored
        let trend =
            analyze_trend(&history(&[90.0, 90.0, 90.0, 40.0, 40.0, 60.0, 60.0, 60.0])).unwrap();
        assert_eq!(trend.direction, TrendDirection::Up);
        assert_eq!(trend.percentage, 50);
    }

    #[test]
    fn test_short_history_is_stable() {
        assert_eq!(analyze_trend(&[]).unwrap(), Trend::stable());
        assert_eq!(analyze_trend(&history(&[70.0])).unwrap(), Trend::stable());
    }

    #[test]
    fn test_insufficient_history() {
        for len in 2..TREND_WINDOW {
            let err = analyze_trend(&history(&vec![50.0; len])).unwrap_err();
            match err {
                ComputeError::InsufficientHistory { required, actual } => {
                    assert_eq!(required, 5);
                    assert_eq!(actual, len);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_zero_old_average_rejected() {
        let err = analyze_trend(&history(&[0.0, 0.0, 20.0, 40.0, 40.0])).unwrap_err();
        assert!(matches!(err, ComputeError::InvalidInput(_)));
    }

    #[test]
    fn test_summary() {
        let samples = history(&[25.0, 45.0, 75.0, 55.0, 30.0]);
        let summary = summarize(&samples).unwrap();
        assert_eq!(summary.average_score, 46);
        assert_eq!(summary.assessments, 5);
        assert_eq!(summary.last_assessed, samples[4].timestamp());
    }

    #[test]
    fn test_summary_of_empty_history() {
        assert!(matches!(
            summarize(&[]),
            Err(ComputeError::InvalidInput(_))
        ));
    }
}
