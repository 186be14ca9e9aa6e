// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError, models::quiz::QuizListParams, upstream::QuizApi, utils::auth::AuthToken,
};

/// Lists the quizzes of a course, one page at a time.
pub async fn list_quizzes(
    State(api): State<Arc<dyn QuizApi>>,
    Extension(token): Extension<AuthToken>,
    Path((community_id, course_id)): Path<(String, String)>,
    Query(params): Query<QuizListParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = params.page.unwrap_or(1).max(1);

    let quizzes = api
        .list_quizzes(&token, &community_id, &course_id, page)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list quizzes of course {}: {:?}", course_id, e);
            e
        })?;

    Ok(Json(quizzes))
}

/// Generates a new quiz for a course.
///
/// The quiz comes back without its answer key; open a session on it to take it.
pub async fn generate_quiz(
    State(api): State<Arc<dyn QuizApi>>,
    Extension(token): Extension<AuthToken>,
    Path((community_id, course_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = api
        .generate_quiz(&token, &community_id, &course_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to generate a quiz for course {}: {:?}", course_id, e);
            e
        })?;

    tracing::info!("Generated quiz {} for course {}", quiz.id, course_id);

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "quiz": quiz }))))
}
