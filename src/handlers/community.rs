// src/handlers/community.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{error::AppError, upstream::QuizApi, utils::auth::AuthToken};

/// Retrieves the quiz leaderboard of a community.
pub async fn get_leaderboard(
    State(api): State<Arc<dyn QuizApi>>,
    Extension(token): Extension<AuthToken>,
    Path(community_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let leaderboard = api.leaderboard(&token, &community_id).await.map_err(|e| {
        tracing::error!("Failed to fetch leaderboard of {}: {:?}", community_id, e);
        e
    })?;

    Ok(Json(serde_json::json!({ "leaderboard": leaderboard })))
}
