// src/upstream/client.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, header};
use serde::de::DeserializeOwned;
use url::Url;

use super::QuizApi;
use crate::{
    error::AppError,
    models::{
        grade::{GradeResponse, ResultEntry, SubmitAnswersRequest, SubmittedAnswer},
        leaderboard::{LeaderboardEntry, LeaderboardResponse},
        quiz::{GeneratedQuiz, Quiz, QuizPage, QuizTarget},
    },
    utils::auth::{AUTH_COOKIE, AuthToken},
};

/// `reqwest`-backed client for the communities API.
///
/// Only connecting is bounded in time; a grading call may take as long as
/// the grader needs.
#[derive(Debug, Clone)]
pub struct HttpQuizApi {
    client: Client,
    base: Url,
}

impl HttpQuizApi {
    pub fn new(base: Url, connect_timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        Ok(Self { client, base })
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::InternalServerError("Upstream URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    fn request(&self, method: Method, url: Url, token: &AuthToken) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(header::COOKIE, format!("{}={}", AUTH_COOKIE, token.as_str()))
            .header(header::ACCEPT, "application/json")
    }
}

/// Maps upstream statuses onto our own error taxonomy.
fn check_status(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    Err(match status {
        StatusCode::NOT_FOUND => AppError::NotFound("Resource not found upstream".to_string()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            AppError::AuthError("Session token rejected by the communities API".to_string())
        }
        _ => AppError::Upstream(format!("Communities API responded with {}", status)),
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    Ok(check_status(response)?.json::<T>().await?)
}

#[async_trait]
impl QuizApi for HttpQuizApi {
    async fn fetch_quiz(&self, token: &AuthToken, target: &QuizTarget) -> Result<Quiz, AppError> {
        let url = self.endpoint(&["quiz", &target.community_id, &target.course_id, &target.quiz_id])?;
        let response = self.request(Method::GET, url, token).send().await?;

        read_json(response).await
    }

    async fn submit_answers(
        &self,
        token: &AuthToken,
        target: &QuizTarget,
        answers: &[SubmittedAnswer],
    ) -> Result<Option<Vec<ResultEntry>>, AppError> {
        let url = self.endpoint(&["quiz", &target.community_id, &target.course_id, &target.quiz_id])?;
        let response = self
            .request(Method::POST, url, token)
            .json(&SubmitAnswersRequest { answers })
            .send()
            .await?;

        let body = check_status(response)?.bytes().await?;
        match serde_json::from_slice::<GradeResponse>(&body) {
            Ok(grade) => {
                if grade.results.is_none() {
                    tracing::warn!("Grader answered without results for quiz {}", target.quiz_id);
                }
                Ok(grade.results)
            }
            Err(e) => {
                tracing::warn!("Malformed grading payload for quiz {}: {}", target.quiz_id, e);
                Ok(None)
            }
        }
    }

    async fn list_quizzes(
        &self,
        token: &AuthToken,
        community_id: &str,
        course_id: &str,
        page: u32,
    ) -> Result<QuizPage, AppError> {
        let mut url = self.endpoint(&["quiz", community_id, course_id])?;
        url.query_pairs_mut().append_pair("page", &page.to_string());
        let response = self.request(Method::GET, url, token).send().await?;

        read_json(response).await
    }

    async fn generate_quiz(
        &self,
        token: &AuthToken,
        community_id: &str,
        course_id: &str,
    ) -> Result<Quiz, AppError> {
        let url = self.endpoint(&["quiz", community_id, course_id])?;
        let response = self
            .request(Method::POST, url, token)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let GeneratedQuiz { quiz } = read_json(response).await?;
        Ok(quiz)
    }

    async fn leaderboard(
        &self,
        token: &AuthToken,
        community_id: &str,
    ) -> Result<Vec<LeaderboardEntry>, AppError> {
        let url = self.endpoint(&["community", "leaderboard", community_id])?;
        let response = self.request(Method::GET, url, token).send().await?;

        let LeaderboardResponse { leaderboard } = read_json(response).await?;
        Ok(leaderboard)
    }
}
