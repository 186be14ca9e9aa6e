// src/session/registry.rs

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{QuizSession, SessionError, timer::Ticker};
use crate::{
    error::AppError,
    models::{
        quiz::{Quiz, QuizTarget},
        session::SessionView,
    },
    upstream::QuizApi,
    utils::auth::AuthToken,
};

/// A live quiz attempt together with the countdown that drives it.
///
/// The attempt belongs to the token that opened it; grading is always
/// requested with that token. Dropping the last handle aborts the countdown.
#[derive(Debug)]
pub struct SessionHandle {
    id: Uuid,
    target: QuizTarget,
    owner: AuthToken,
    session: Arc<Mutex<QuizSession>>,
    ticker: Ticker,
}

impl SessionHandle {
    fn open(target: QuizTarget, quiz: Quiz, owner: AuthToken, tick: Duration) -> Self {
        let session = Arc::new(Mutex::new(QuizSession::new(quiz)));
        let ticker = Ticker::spawn(Arc::clone(&session), tick);

        Self {
            id: Uuid::new_v4(),
            target,
            owner,
            session,
            ticker,
        }
    }

    pub fn is_owned_by(&self, token: &AuthToken) -> bool {
        self.owner == *token
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn target(&self) -> &QuizTarget {
        &self.target
    }

    pub fn is_ticking(&self) -> bool {
        !self.ticker.is_finished()
    }

    pub async fn view(&self) -> SessionView {
        self.session.lock().await.view(self.id, &self.target)
    }

    pub async fn advance(&self) -> Result<SessionView, SessionError> {
        let mut session = self.session.lock().await;
        session.advance()?;
        Ok(session.view(self.id, &self.target))
    }

    pub async fn retreat(&self) -> Result<SessionView, SessionError> {
        let mut session = self.session.lock().await;
        session.retreat()?;
        Ok(session.view(self.id, &self.target))
    }

    pub async fn select_answer(&self, question_id: &str, answer: &str) -> Result<SessionView, SessionError> {
        let mut session = self.session.lock().await;
        session.select_answer(question_id, answer)?;
        Ok(session.view(self.id, &self.target))
    }

    /// Submits the answers for grading.
    ///
    /// The session moves to `Submitting` before the lock is released, so a
    /// concurrent confirmation fails fast instead of sending a second request.
    /// On failure the session is reopened and the error is handed back.
    pub async fn confirm(&self, api: &dyn QuizApi) -> Result<SessionView, AppError> {
        let answers = self.session.lock().await.begin_submit()?;

        tracing::info!("Submitting {} answers for session {}", answers.len(), self.id);
        let outcome = api.submit_answers(&self.owner, &self.target, &answers).await;

        let mut session = self.session.lock().await;
        match outcome {
            Ok(results) => {
                session.complete_submit(results);
                tracing::info!(
                    "Session {} graded with {} results",
                    self.id,
                    session.results().len()
                );
                Ok(session.view(self.id, &self.target))
            }
            Err(e) => {
                tracing::error!("Grading failed for session {}: {}", self.id, e);
                session.abort_submit();
                Err(e)
            }
        }
    }
}

/// Container for all live sessions, keyed by session ID.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<Uuid, Arc<SessionHandle>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session on `quiz` for `owner` and starts its countdown.
    pub fn open(&self, target: QuizTarget, quiz: Quiz, owner: AuthToken, tick: Duration) -> Arc<SessionHandle> {
        let handle = Arc::new(SessionHandle::open(target, quiz, owner, tick));
        self.sessions.insert(handle.id, Arc::clone(&handle));
        handle
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<SessionHandle>> {
        self.sessions.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Looks a session up on behalf of `token`.
    /// Someone else's session is reported as missing.
    pub fn get_owned(&self, id: Uuid, token: &AuthToken) -> Result<Arc<SessionHandle>, AppError> {
        self.get(id)
            .filter(|handle| handle.is_owned_by(token))
            .ok_or_else(|| AppError::NotFound("Session not found".to_string()))
    }

    /// The user's dismiss action: only a graded session may be closed.
    pub async fn close(&self, id: Uuid, token: &AuthToken) -> Result<(), AppError> {
        let handle = self.get_owned(id, token)?;

        handle.session.lock().await.ensure_closable()?;
        self.sessions.remove(&id);

        Ok(())
    }

    /// Tears a session down regardless of its state (the view went away).
    pub fn discard(&self, id: Uuid, token: &AuthToken) -> Result<(), AppError> {
        self.get_owned(id, token)?;
        self.remove(id);

        Ok(())
    }

    fn remove(&self, id: Uuid) -> bool {
        self.sessions.remove(&id).is_some()
    }

    /// Tears down sessions idle for longer than `ttl`.
    ///
    /// A session whose countdown is still running is never idle; once the
    /// clock has stopped, idleness counts from the last command.
    pub async fn sweep_expired(&self, ttl: Duration) -> usize {
        let Ok(ttl) = chrono::Duration::from_std(ttl) else {
            return 0;
        };
        let cutoff = Utc::now() - ttl;

        let handles: Vec<Arc<SessionHandle>> = self
            .sessions
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        let mut removed = 0;
        for handle in handles {
            let idle = {
                let session = handle.session.lock().await;
                !session.is_running() && session.last_activity() < cutoff
            };
            if idle && self.remove(handle.id) {
                removed += 1;
            }
        }

        removed
    }

    /// Tears down every session; used on shutdown.
    pub fn clear(&self) {
        self.sessions.clear();
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
