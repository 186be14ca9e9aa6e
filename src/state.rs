// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{config::Config, session::registry::SessionRegistry, upstream::QuizApi};

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
    pub api: Arc<dyn QuizApi>,
    pub config: Config,
}

impl FromRef<AppState> for Arc<SessionRegistry> {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for Arc<dyn QuizApi> {
    fn from_ref(state: &AppState) -> Self {
        state.api.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
