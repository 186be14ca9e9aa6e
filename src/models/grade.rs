// src/models/grade.rs

use serde::{Deserialize, Serialize};

/// The user's latest selection for a question and the seconds spent on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEntry {
    pub answer: String,
    pub time: u32,
}

/// One positional entry of a grading request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedAnswer {
    pub answer: String,
    pub time: u32,
}

impl SubmittedAnswer {
    /// Placeholder submitted for a question the user never answered.
    pub fn unanswered() -> Self {
        Self {
            answer: String::new(),
            time: 0,
        }
    }
}

impl From<&AnswerEntry> for SubmittedAnswer {
    fn from(entry: &AnswerEntry) -> Self {
        Self {
            answer: entry.answer.clone(),
            time: entry.time,
        }
    }
}

/// Body sent to the grader: answers ordered like the quiz's questions.
#[derive(Debug, Serialize)]
pub struct SubmitAnswersRequest<'a> {
    pub answers: &'a [SubmittedAnswer],
}

/// Server-graded outcome of one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEntry {
    pub answer: String,
    pub is_correct: bool,
    /// Reference time reported by the grader, in seconds.
    pub time: u32,
    pub correct_answer: String,
}

/// Grader response. A missing `results` array means "no results".
#[derive(Debug, Deserialize)]
pub struct GradeResponse {
    #[serde(default)]
    pub results: Option<Vec<ResultEntry>>,
}
