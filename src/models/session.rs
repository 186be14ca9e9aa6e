// src/models/session.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::{
        grade::ResultEntry,
        quiz::{Difficulty, QuizTarget},
    },
    session::Status,
};

/// DTO for opening a quiz attempt.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OpenSessionRequest {
    #[validate(length(min = 1, max = 64, message = "communityId must be between 1 and 64 chars"))]
    pub community_id: String,
    #[validate(length(min = 1, max = 64, message = "courseId must be between 1 and 64 chars"))]
    pub course_id: String,
    #[validate(length(min = 1, max = 64, message = "quizId must be between 1 and 64 chars"))]
    pub quiz_id: String,
}

impl From<OpenSessionRequest> for QuizTarget {
    fn from(req: OpenSessionRequest) -> Self {
        Self {
            community_id: req.community_id,
            course_id: req.course_id,
            quiz_id: req.quiz_id,
        }
    }
}

/// DTO for selecting an option.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    #[validate(length(min = 1, max = 64))]
    pub question_id: String,
    #[validate(length(min = 1, max = 1000))]
    pub answer: String,
}

/// Rendered state of a quiz attempt, as the view consumes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    pub target: QuizTarget,
    pub topic: String,
    pub difficulty: Difficulty,
    pub creator: String,
    pub opened_at: DateTime<Utc>,
    pub remaining_time: u32,
    pub current_question_index: usize,
    pub status: Status,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub can_confirm: bool,
    pub can_close: bool,
    pub questions: Vec<QuestionView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub allotted_time: u32,
    pub selected: Option<String>,
    /// Present only once the attempt has been graded and a result exists
    /// at this position.
    pub feedback: Option<Feedback>,
}

/// Per-question grading outcome, derived on every render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub answer: String,
    pub is_correct: bool,
    pub server_time: u32,
    pub user_time: Option<u32>,
    /// The user answered strictly faster than the reference time.
    pub faster_than_reference: bool,
    pub correct_answer: String,
}

impl Feedback {
    pub fn derive(result: &ResultEntry, user_time: Option<u32>) -> Self {
        Self {
            answer: result.answer.clone(),
            is_correct: result.is_correct,
            server_time: result.time,
            user_time,
            faster_than_reference: user_time.is_some_and(|time| time < result.time),
            correct_answer: result.correct_answer.clone(),
        }
    }
}
