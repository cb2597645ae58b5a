//! Perceived-stress questionnaire
//!
//! The fixed question bank and a response sheet that collects one answer per
//! question, in question order, before handing the responses to the classifier.

use crate::error::ComputeError;
use crate::types::QuestionnaireResponse;
use serde::Serialize;

/// A questionnaire item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: u32,
    pub text: &'static str,
}

/// The assessment questions, in presentation order
pub const QUESTIONS: [Question; 8] = [
    Question {
        id: 1,
        text: "How often have you felt that you were unable to control the important things in your life?",
    },
    Question {
        id: 2,
        text: "How often have you felt nervous and stressed?",
    },
    Question {
        id: 3,
        text: "How often have you found that you could not cope with all the things that you had to do?",
    },
    Question {
        id: 4,
        text: "How often have you felt difficulties were piling up so high that you could not overcome them?",
    },
    Question {
        id: 5,
        text: "How often have you felt confident about your ability to handle your personal problems?",
    },
    Question {
        id: 6,
        text: "How often have you been angered because of things that were outside of your control?",
    },
    Question {
        id: 7,
        text: "How often have you felt that things were going your way?",
    },
    Question {
        id: 8,
        text: "How often have you had trouble sleeping because of your concerns?",
    },
];

/// Labels for answers 1 through 5
pub const ANSWER_LABELS: [&str; 5] = ["Never", "Rarely", "Sometimes", "Often", "Very Often"];

/// Label for an answer value, if it is on the scale
pub fn answer_label(answer: i32) -> Option<&'static str> {
    usize::try_from(answer - 1)
        .ok()
        .and_then(|i| ANSWER_LABELS.get(i).copied())
}

/// Answers collected so far for a question bank
#[derive(Debug, Clone)]
pub struct ResponseSheet {
    questions: &'static [Question],
    answers: Vec<Option<QuestionnaireResponse>>,
}

impl Default for ResponseSheet {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseSheet {
    /// Sheet for the standard question bank
    pub fn new() -> Self {
        Self::for_questions(&QUESTIONS)
    }

    /// Sheet for a custom question bank
    pub fn for_questions(questions: &'static [Question]) -> Self {
        Self {
            questions,
            answers: vec![None; questions.len()],
        }
    }

    pub fn questions(&self) -> &'static [Question] {
        self.questions
    }

    /// Record the answer for the question at `index`, replacing any earlier answer
    pub fn record(&mut self, index: usize, answer: i32) -> Result<(), ComputeError> {
        let question = self.questions.get(index).ok_or_else(|| {
            ComputeError::InvalidInput(format!(
                "question index {} is outside a bank of {}",
                index,
                self.questions.len()
            ))
        })?;
        self.answers[index] = Some(QuestionnaireResponse::new(question.id, question.text, answer));
        Ok(())
    }

    /// Index of the first unanswered question
    pub fn next_unanswered(&self) -> Option<usize> {
        self.answers.iter().position(Option::is_none)
    }

    pub fn answered(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.next_unanswered().is_none()
    }

    /// Responses in question order; every question must be answered
    pub fn responses(&self) -> Result<Vec<QuestionnaireResponse>, ComputeError> {
        if let Some(missing) = self.next_unanswered() {
            return Err(ComputeError::InvalidInput(format!(
                "question {} of {} has not been answered",
                missing + 1,
                self.questions.len()
            )));
        }
        Ok(self.answers.iter().flatten().cloned().collect())
    }
}
