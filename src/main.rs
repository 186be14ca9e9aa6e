// src/main.rs

use std::{sync::Arc, time::Duration};

use dotenvy::dotenv;
use quiz_gateway::{
    config::Config,
    routes,
    session::registry::SessionRegistry,
    state::AppState,
    upstream::{HttpQuizApi, QuizApi},
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env()?;

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "gateway.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let api: Arc<dyn QuizApi> = Arc::new(HttpQuizApi::new(config.upstream_url.clone(), CONNECT_TIMEOUT)?);
    tracing::info!("Forwarding quiz traffic to {}", config.upstream_url);

    let sessions = Arc::new(SessionRegistry::new());

    // Expire abandoned sessions so their countdowns do not linger
    let sweeper = {
        let sessions = Arc::clone(&sessions);
        let ttl = config.session_ttl();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                let removed = sessions.sweep_expired(ttl).await;
                if removed > 0 {
                    tracing::info!("Expired {} idle sessions", removed);
                }
            }
        })
    };

    // Create AppState
    let state = AppState {
        sessions: Arc::clone(&sessions),
        api,
        config: config.clone(),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);

    // Start the server
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Cancel every remaining countdown
    sweeper.abort();
    tracing::info!("Shutting down, dropping {} live sessions", sessions.len());
    sessions.clear();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
