//! Score classification
//!
//! Turns an ordered set of questionnaire answers into a percentage score and a
//! stress level. The score is the answer sum over the maximum attainable sum.

use crate::error::ComputeError;
use crate::types::{QuestionnaireResponse, ScoreResult};

/// Highest answer on the frequency scale
pub const MAX_ANSWER: i32 = 5;

/// Classify questionnaire responses.
///
/// Answers outside 1-5 are not rejected; they shift the score proportionally.
pub fn classify(responses: &[QuestionnaireResponse]) -> Result<ScoreResult, ComputeError> {
    let answers: Vec<i32> = responses.iter().map(|r| r.answer).collect();
    classify_answers(&answers)
}

/// Classify bare answers, in question order
pub fn classify_answers(answers: &[i32]) -> Result<ScoreResult, ComputeError> {
    if answers.is_empty() {
        return Err(ComputeError::InvalidInput(
            "cannot score an empty questionnaire".to_string(),
        ));
    }

    let max_possible = f64::from(MAX_ANSWER) * answers.len() as f64;
    let actual: f64 = answers.iter().map(|&a| f64::from(a)).sum();
    let score = (actual / max_possible) * 100.0;

    Ok(ScoreResult::from_score(score))
}
