// src/session/timer.rs

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

use super::QuizSession;

/// Owned countdown task of one session.
///
/// The task stops on its own once the session reports that ticking is over.
/// Dropping the `Ticker` aborts it, so whoever owns the ticker decides the
/// latest point at which the countdown ends.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    pub fn spawn(session: Arc<Mutex<QuizSession>>, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if !session.lock().await.tick() {
                    break;
                }
            }

            tracing::debug!("Session countdown finished");
        });

        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
