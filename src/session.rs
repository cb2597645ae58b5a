//! Assessment session
//!
//! This module provides the stateful entry point for a user's assessments:
//! each submitted questionnaire is classified, paired with recommendations,
//! and appended to the session's history, which can then be analyzed,
//! summarized, rendered, or saved.

use crate::chart::{render_history, ChartLayout, Surface};
use crate::classifier::classify;
use crate::error::ComputeError;
use crate::recommendations::recommendations_for;
use crate::trend::{analyze_trend, summarize};
use crate::types::{AssessmentOutcome, HistorySummary, QuestionnaireResponse, StressSample, Trend};
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

/// Assess a questionnaire without recording it anywhere.
///
/// Stages:
/// 1. Classifier - responses to score and level
/// 2. Recommendation selector - level to advice
pub fn assess(
    responses: &[QuestionnaireResponse],
    assessed_at: DateTime<Utc>,
) -> Result<AssessmentOutcome, ComputeError> {
    let result = classify(responses)?;
    let recommendations = recommendations_for(result.level())
        .iter()
        .map(|r| r.to_string())
        .collect();

    Ok(AssessmentOutcome {
        assessment_id: Uuid::new_v4(),
        result,
        recommendations,
        assessed_at,
    })
}

/// Stateful session holding a user's stress history.
///
/// Use this when results should accumulate across assessments.
#[derive(Debug, Clone, Default)]
pub struct AssessmentSession {
    history: Vec<StressSample>,
}

impl AssessmentSession {
    /// Create a session with an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session from an existing, time-ordered history
    pub fn with_history(history: Vec<StressSample>) -> Result<Self, ComputeError> {
        crate::chart::ensure_time_ordered(&history)?;
        Ok(Self { history })
    }

    /// Classify a questionnaire and append the result to the history.
    ///
    /// `assessed_at` must not precede the latest recorded sample, and the score
    /// must lie in `[0, 100]`. On error the history is unchanged.
    pub fn submit(
        &mut self,
        responses: &[QuestionnaireResponse],
        assessed_at: DateTime<Utc>,
    ) -> Result<AssessmentOutcome, ComputeError> {
        if let Some(last) = self.history.last() {
            if assessed_at < last.timestamp() {
                return Err(ComputeError::InvalidInput(format!(
                    "assessment at {} precedes the latest recorded sample at {}",
                    assessed_at.to_rfc3339(),
                    last.timestamp().to_rfc3339()
                )));
            }
        }

        let outcome = assess(responses, assessed_at)?;
        // Out-of-scale answers can score outside [0, 100]; such results are
        // returned by `assess` but never enter a history.
        let sample = StressSample::from_score(outcome.result.score(), assessed_at)?;
        self.history.push(sample);

        info!(
            assessment_id = %outcome.assessment_id,
            stress_level = %outcome.result.level(),
            score = outcome.result.score(),
            history_len = self.history.len(),
            "assessment recorded"
        );
        Ok(outcome)
    }

    pub fn history(&self) -> &[StressSample] {
        &self.history
    }

    /// Recent trend of the history
    pub fn trend(&self) -> Result<Trend, ComputeError> {
        analyze_trend(&self.history)
    }

    /// Profile summary of the history
    pub fn summary(&self) -> Result<HistorySummary, ComputeError> {
        summarize(&self.history)
    }

    /// Draw the history onto a surface
    pub fn render<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        layout: &ChartLayout,
    ) -> Result<(), ComputeError> {
        render_history(surface, &self.history, layout)
    }

    /// Replace the history with one loaded from a JSON array of samples
    pub fn load_history(&mut self, json: &str) -> Result<(), ComputeError> {
        let history: Vec<StressSample> = serde_json::from_str(json)?;
        crate::chart::ensure_time_ordered(&history)?;
        debug!(samples = history.len(), "history loaded");
        self.history = history;
        Ok(())
    }

    /// Serialize the history as a JSON array of samples
    pub fn save_history(&self) -> Result<String, ComputeError> {
        serde_json::to_string_pretty(&self.history)
            .map_err(|e| ComputeError::EncodingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{DisplayList, RasterSurface};
    use crate::questionnaire::{ResponseSheet, QUESTIONS};
    use crate::types::{StressLevel, TrendDirection};
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn answered(answer: i32) -> Vec<QuestionnaireResponse> {
        let mut sheet = ResponseSheet::new();
        for i in 0..QUESTIONS.len() {
            sheet.record(i, answer).unwrap();
        }
        sheet.responses().unwrap()
    }

    fn sample_history_json() -> &'static str {
        r#"[
            { "level": "low", "score": 25, "timestamp": "2024-03-01T10:00:00Z" },
            { "level": "moderate", "score": 45, "timestamp": "2024-03-05T10:00:00Z" },
            { "level": "high", "score": 75, "timestamp": "2024-03-10T10:00:00Z" },
            { "level": "moderate", "score": 55, "timestamp": "2024-03-15T10:00:00Z" },
            { "level": "moderate", "score": 30, "timestamp": "2024-03-20T10:00:00Z" }
        ]"#
    }

    #[test]
    fn test_max_answers_end_to_end() {
        let outcome = assess(&answered(5), start()).unwrap();
        assert!((outcome.result.score() - 100.0).abs() < 1e-9);
        assert_eq!(outcome.result.level(), StressLevel::Severe);
        assert_eq!(outcome.recommendations.len(), 6);
        assert_eq!(
            outcome.recommendations[0],
            "Speak with a healthcare professional"
        );
    }

    #[test]
    fn test_min_answers_end_to_end() {
        let outcome = assess(&answered(1), start()).unwrap();
        assert!((outcome.result.score() - 20.0).abs() < 1e-9);
        assert_eq!(outcome.result.level(), StressLevel::Low);
        assert_eq!(outcome.recommendations.len(), 3);
    }

    #[test]
    fn test_outcomes_get_distinct_ids() {
        let a = assess(&answered(3), start()).unwrap();
        let b = assess(&answered(3), start()).unwrap();
        assert_ne!(a.assessment_id, b.assessment_id);
    }

    #[test]
    fn test_session_accumulates_history() {
        let mut session = AssessmentSession::new();
        for (day, answer) in [2, 2, 4, 4, 4].iter().enumerate() {
            session
                .submit(&answered(*answer), start() + Duration::days(day as i64))
                .unwrap();
        }

        assert_eq!(session.history().len(), 5);
        assert_eq!(session.history()[0].level(), StressLevel::Moderate);
        assert_eq!(session.history()[4].level(), StressLevel::High);

        // 40, 40, 80, 80, 80 => up 100%
        let trend = session.trend().unwrap();
        assert_eq!(trend.direction, TrendDirection::Up);
        assert_eq!(trend.percentage, 100);

        let summary = session.summary().unwrap();
        assert_eq!(summary.assessments, 5);
        assert_eq!(summary.average_score, 64);
    }

    #[test]
    fn test_submit_rejects_backdated_assessment() {
        let mut session = AssessmentSession::new();
        session.submit(&answered(3), start()).unwrap();
        let err = session
            .submit(&answered(3), start() - Duration::hours(1))
            .unwrap_err();
        assert!(matches!(err, ComputeError::InvalidInput(_)));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_out_of_scale_answers_never_enter_history() {
        let mut session = AssessmentSession::new();
        session.submit(&answered(3), start()).unwrap();

        // 6 of 5 => 120%
        let over = vec![QuestionnaireResponse::new(1, "Q1", 6)];
        let err = session
            .submit(&over, start() + Duration::days(1))
            .unwrap_err();
        assert!(matches!(err, ComputeError::InvalidInput(_)));
        assert_eq!(session.history().len(), 1);

        let mut restored = AssessmentSession::new();
        restored.load_history(&session.save_history().unwrap()).unwrap();
        assert_eq!(restored.history(), session.history());
    }

    #[test]
    fn test_with_history_checks_order() {
        let samples: Vec<StressSample> = [20.0, 40.0, 60.0]
            .iter()
            .enumerate()
            .map(|(i, &s)| StressSample::from_score(s, start() + Duration::days(i as i64)).unwrap())
            .collect();

        let session = AssessmentSession::with_history(samples.clone()).unwrap();
        assert_eq!(session.history(), samples.as_slice());
        assert_eq!(session.summary().unwrap().average_score, 40);

        let mut reversed = samples;
        reversed.reverse();
        assert!(matches!(
            AssessmentSession::with_history(reversed),
            Err(ComputeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_empty_submission_leaves_history_untouched() {
        let mut session = AssessmentSession::new();
        assert!(session.submit(&[], start()).is_err());
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_trend_needs_five_samples() {
        let mut session = AssessmentSession::new();
        session.submit(&answered(3), start()).unwrap();
        session
            .submit(&answered(3), start() + Duration::days(1))
            .unwrap();
        assert!(matches!(
            session.trend(),
            Err(ComputeError::InsufficientHistory { .. })
        ));
    }

    #[test]
    fn test_history_round_trip() {
        let mut session = AssessmentSession::new();
        session.load_history(sample_history_json()).unwrap();
        assert_eq!(session.summary().unwrap().average_score, 46);

        let saved = session.save_history().unwrap();
        let mut restored = AssessmentSession::new();
        restored.load_history(&saved).unwrap();
        assert_eq!(restored.history(), session.history());
    }

    #[test]
    fn test_load_rejects_unordered_history() {
        let json = r#"[
            { "score": 25, "timestamp": "2024-03-05T10:00:00Z" },
            { "score": 45, "timestamp": "2024-03-01T10:00:00Z" }
        ]"#;
        let mut session = AssessmentSession::new();
        assert!(session.load_history(json).is_err());
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let mut session = AssessmentSession::new();
        assert!(matches!(
            session.load_history("not json"),
            Err(ComputeError::JsonError(_))
        ));
    }

    #[test]
    fn test_render_session_history() {
        let mut session = AssessmentSession::new();
        session.load_history(sample_history_json()).unwrap();

        let mut list = DisplayList::new(600, 300);
        session.render(&mut list, &ChartLayout::default()).unwrap();
        assert_eq!(list.circle_count(), 5);

        let mut a = RasterSurface::new(600, 300);
        let mut b = RasterSurface::new(600, 300);
        session.render(&mut a, &ChartLayout::default()).unwrap();
        session.render(&mut b, &ChartLayout::default()).unwrap();
        assert!(a == b);
    }
}
