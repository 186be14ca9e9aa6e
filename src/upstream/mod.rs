// src/upstream/mod.rs

pub mod client;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        grade::{ResultEntry, SubmittedAnswer},
        leaderboard::LeaderboardEntry,
        quiz::{Quiz, QuizPage, QuizTarget},
    },
    utils::auth::AuthToken,
};

pub use client::HttpQuizApi;

/// The slice of the communities REST API that quiz sessions depend on.
#[async_trait]
pub trait QuizApi: Send + Sync {
    /// Loads a quiz without its answer key.
    async fn fetch_quiz(&self, token: &AuthToken, target: &QuizTarget) -> Result<Quiz, AppError>;

    /// Sends the answers for grading.
    ///
    /// `Ok(None)` means the grader accepted the submission but answered
    /// without a usable `results` array.
    async fn submit_answers(
        &self,
        token: &AuthToken,
        target: &QuizTarget,
        answers: &[SubmittedAnswer],
    ) -> Result<Option<Vec<ResultEntry>>, AppError>;

    async fn list_quizzes(
        &self,
        token: &AuthToken,
        community_id: &str,
        course_id: &str,
        page: u32,
    ) -> Result<QuizPage, AppError>;

    /// Asks the API to generate a fresh quiz for a course.
    async fn generate_quiz(
        &self,
        token: &AuthToken,
        community_id: &str,
        course_id: &str,
    ) -> Result<Quiz, AppError>;

    async fn leaderboard(
        &self,
        token: &AuthToken,
        community_id: &str,
    ) -> Result<Vec<LeaderboardEntry>, AppError>;
}
