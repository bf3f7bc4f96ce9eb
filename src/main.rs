//! Kolb Tracker API server.
//!
//! Loads configuration from the environment, connects to PostgreSQL, wires
//! the adapters into the HTTP router and serves until Ctrl+C / SIGTERM.

use std::error::Error;
use std::future::Future;
use std::sync::Arc;

use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use kolb_tracker::adapters::ai::{OpenAIConfig, OpenAIProvider};
use kolb_tracker::adapters::auth::{JwksConfig, JwksSessionValidator};
use kolb_tracker::adapters::http::{api_router, ApiDependencies, ApiState};
use kolb_tracker::adapters::postgres::{
    run_migrations, PostgresCycleRepository, PostgresSkillRepository, PostgresUserRepository,
};
use kolb_tracker::adapters::webhook::SvixVerifier;
use kolb_tracker::application::handlers::GenerateFeedbackHandler;
use kolb_tracker::config::{AppConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        feedback_enabled = config.features.enable_ai_feedback,
        "Starting kolb-tracker"
    );

    let pool = config.database.pool_options().connect(&config.database.url).await?;
    if config.database.run_migrations {
        run_migrations(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let api_key = config
        .ai
        .openai_api_key
        .as_ref()
        .map(|key| key.expose_secret().clone())
        .unwrap_or_default();
    let ai_provider = OpenAIProvider::new(
        OpenAIConfig::new(api_key)
            .with_model(&config.ai.model)
            .with_base_url(&config.ai.base_url)
            .with_timeout(config.ai.timeout())
            .with_max_retries(config.ai.max_retries),
    )?;

    let feedback = GenerateFeedbackHandler::new(
        Arc::new(ai_provider),
        config.ai.feedback_parameters(),
        config.ai.unparseable,
    )
    .with_enabled(config.features.enable_ai_feedback)
    .with_coalescing(config.features.coalesce_feedback_requests);

    let session_validator = JwksSessionValidator::new(
        JwksConfig::new(&config.auth.issuer_url, config.auth.jwks_endpoint())
            .with_audience(config.auth.audience.clone())
            .with_cache_duration(config.auth.jwks_cache_ttl()),
    )?;

    let webhook_verifier = match &config.webhook.signing_secret {
        Some(secret) => Some(Arc::new(SvixVerifier::new(
            secret,
            config.webhook.tolerance_secs,
        )?)),
        None => {
            tracing::warn!("No webhook signing secret configured; identity webhooks will fail");
            None
        }
    };

    let state = ApiState::new(ApiDependencies {
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        skills: Arc::new(PostgresSkillRepository::new(pool.clone())),
        cycles: Arc::new(PostgresCycleRepository::new(pool.clone())),
        session_validator: Arc::new(session_validator),
        feedback: Arc::new(feedback),
        webhook_verifier,
    });
    let app = api_router(state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Shutdown complete");
    Ok(())
}

/// JSON logs in production, human-readable otherwise. `RUST_LOG` wins over
/// the configured level.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = signal_or_pending(tokio::signal::ctrl_c(), "Ctrl+C");

    #[cfg(unix)]
    let terminate = signal_or_pending(
        async {
            let mut signal =
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
            signal.recv().await;
            Ok::<(), std::io::Error>(())
        },
        "SIGTERM",
    );

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Resolves when the signal arrives. A handler that cannot be installed
/// never resolves, so it cannot trigger a shutdown by itself.
async fn signal_or_pending<F>(signal: F, name: &str)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::error!(error = %e, signal = name, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
