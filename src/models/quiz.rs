// src/models/quiz.rs

use serde::{Deserialize, Serialize};

use crate::models::{question::Question, user::UserSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A generated quiz for a course. Immutable once a session has loaded it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    #[serde(rename = "_id")]
    pub id: String,
    pub topic: String,
    pub difficulty: Difficulty,
    pub creator: UserSummary,
    /// Ordered; grading results align with this order.
    pub questions: Vec<Question>,
    #[serde(default)]
    pub participators: Vec<UserSummary>,
}

impl Quiz {
    /// Total countdown of an attempt: one shared clock for the whole quiz.
    pub fn total_time(&self) -> u32 {
        self.questions
            .iter()
            .fold(0u32, |acc, question| acc.saturating_add(question.time))
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }
}

/// Identifies a quiz in the upstream URL space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizTarget {
    pub community_id: String,
    pub course_id: String,
    pub quiz_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSummary {
    pub title: String,
    pub description: String,
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// One page of a course's quizzes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizPage {
    pub quizzes: Vec<Quiz>,
    pub page: u32,
    pub pages: u32,
    pub count: u32,
    pub course: CourseSummary,
}

/// Envelope of the quiz generation endpoint.
#[derive(Debug, Deserialize)]
pub struct GeneratedQuiz {
    pub quiz: Quiz,
}

/// Query parameters for listing a course's quizzes.
#[derive(Debug, Deserialize)]
pub struct QuizListParams {
    /// 1-based page number (default: 1).
    pub page: Option<u32>,
}
