// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{self, community, quiz, session},
    state::AppState,
    utils::auth::auth_middleware,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (sessions, course quizzes, communities).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (session registry, upstream client, config).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    // Credentials are allowed so the browser sends the auth_token cookie.
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    let session_routes = Router::new()
        .route("/", post(session::open_session))
        .route(
            "/{id}",
            get(session::get_session).delete(session::discard_session),
        )
        .route("/{id}/answers", post(session::select_answer))
        .route("/{id}/next", post(session::next_question))
        .route("/{id}/previous", post(session::previous_question))
        .route("/{id}/confirm", post(session::confirm))
        .route("/{id}/close", post(session::close_session));

    let community_routes = Router::new()
        .route(
            "/{community_id}/courses/{course_id}/quizzes",
            get(quiz::list_quizzes).post(quiz::generate_quiz),
        )
        .route("/{community_id}/leaderboard", get(community::get_leaderboard));

    let protected = Router::new()
        .nest("/api/sessions", session_routes)
        .nest("/api/communities", community_routes)
        .layer(middleware::from_fn(auth_middleware));

    Router::new()
        .route("/api/health", get(handlers::health))
        .merge(protected)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
