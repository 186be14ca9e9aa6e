// src/handlers/session.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::{
        quiz::QuizTarget,
        session::{AnswerRequest, OpenSessionRequest},
    },
    session::registry::SessionRegistry,
    upstream::QuizApi,
    utils::auth::AuthToken,
};

/// Opens a timed attempt at a quiz.
///
/// * Loads the quiz from the communities API.
/// * Starts the shared countdown (sum of all question times).
pub async fn open_session(
    State(sessions): State<Arc<SessionRegistry>>,
    State(api): State<Arc<dyn QuizApi>>,
    State(config): State<Config>,
    Extension(token): Extension<AuthToken>,
    Json(payload): Json<OpenSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let target = QuizTarget::from(payload);
    let quiz = api.fetch_quiz(&token, &target).await?;

    if quiz.questions.is_empty() {
        return Err(AppError::BadRequest("Quiz has no questions".to_string()));
    }

    let handle = sessions.open(target, quiz, token, config.tick_interval());
    tracing::info!(
        "Opened session {} on quiz {}",
        handle.id(),
        handle.target().quiz_id
    );

    Ok((StatusCode::CREATED, Json(handle.view().await)))
}

pub async fn get_session(
    State(sessions): State<Arc<SessionRegistry>>,
    Extension(token): Extension<AuthToken>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let handle = sessions.get_owned(id, &token)?;

    Ok(Json(handle.view().await))
}

/// Records the user's choice for a question. Later choices replace earlier ones.
pub async fn select_answer(
    State(sessions): State<Arc<SessionRegistry>>,
    Extension(token): Extension<AuthToken>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let handle = sessions.get_owned(id, &token)?;
    let view = handle
        .select_answer(&payload.question_id, &payload.answer)
        .await?;

    Ok(Json(view))
}

pub async fn next_question(
    State(sessions): State<Arc<SessionRegistry>>,
    Extension(token): Extension<AuthToken>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let handle = sessions.get_owned(id, &token)?;

    Ok(Json(handle.advance().await?))
}

pub async fn previous_question(
    State(sessions): State<Arc<SessionRegistry>>,
    Extension(token): Extension<AuthToken>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let handle = sessions.get_owned(id, &token)?;

    Ok(Json(handle.retreat().await?))
}

/// Submits the answers for grading.
///
/// * 409 unless the cursor is on the last question and nothing is in flight.
/// * 502 when grading fails; the attempt stays open and can be confirmed again.
pub async fn confirm(
    State(sessions): State<Arc<SessionRegistry>>,
    State(api): State<Arc<dyn QuizApi>>,
    Extension(token): Extension<AuthToken>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let handle = sessions.get_owned(id, &token)?;

    Ok(Json(handle.confirm(api.as_ref()).await?))
}

/// The dismiss action. Refused until the attempt has been graded.
pub async fn close_session(
    State(sessions): State<Arc<SessionRegistry>>,
    Extension(token): Extension<AuthToken>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    sessions.close(id, &token).await?;
    tracing::info!("Closed session {}", id);

    Ok(StatusCode::NO_CONTENT)
}

/// Tears the session down whatever its state, stopping its countdown.
pub async fn discard_session(
    State(sessions): State<Arc<SessionRegistry>>,
    Extension(token): Extension<AuthToken>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    sessions.discard(id, &token)?;
    tracing::info!("Discarded session {}", id);

    Ok(StatusCode::NO_CONTENT)
}
