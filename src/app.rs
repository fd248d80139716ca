/*
 * Responsibility
 * - Tracing + panic hook
 * - Config -> dependencies (store, token verifier) -> Router
 * - axum::serve() with graceful shutdown bounded by SHUTDOWN_TIMEOUT_SECONDS
 */
use std::future::IntoFuture;
use std::{panic, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::oneshot;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::{AppEnv, Config};
use crate::middleware::{cors, http};
use crate::repos::{InMemoryUserRepo, PgUserRepo, UserRepository};
use crate::services::auth::build_token_verifier;
use crate::state::AppState;

fn init_tracing(app_env: AppEnv) {
    // RUST_LOG wins; e.g. RUST_LOG=info,user_service=debug,tower_http=debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    let registry = tracing_subscriber::registry().with(filter);
    if app_env.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Log only. Handler panics are answered by `CatchPanicLayer`, so the
/// process must survive them.
fn init_panic_hook(print_default: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development also gets the stderr message + backtrace hint.
        if print_default {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    let config = Config::from_env();
    init_tracing(
        config
            .as_ref()
            .map(|c| c.app_env)
            .unwrap_or(AppEnv::Development),
    );
    let config = config.context("load configuration")?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(?config, "starting user-service");

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("bind {}", config.addr))?;
    tracing::info!(addr = %config.addr, "listening");

    serve(listener, app, Duration::from_secs(config.shutdown_timeout_seconds)).await
}

pub async fn build_state(config: &Config) -> Result<AppState> {
    let repo: Arc<dyn UserRepository> = if config.uses_memory_store() {
        tracing::warn!("using in-memory user store; data is lost on restart");
        Arc::new(InMemoryUserRepo::new())
    } else {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("run database migrations")?;
        Arc::new(PgUserRepo::new(pool))
    };

    Ok(AppState::new(repo, build_token_verifier(config)))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    let router = cors::apply(router, config);
    http::apply(router, config)
}

async fn serve(listener: tokio::net::TcpListener, app: Router, grace: Duration) -> Result<()> {
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = stop_rx.await;
    });
    let mut server = tokio::spawn(server.into_future());

    tokio::select! {
        joined = &mut server => {
            // Server stopped on its own: always an error for a long-running service.
            joined.context("server task failed")?.context("server error")?;
            anyhow::bail!("server exited unexpectedly");
        }
        () = shutdown_signal() => {}
    }

    tracing::info!(grace_seconds = grace.as_secs(), "shutdown signal received, draining");
    let _ = stop_tx.send(());

    match tokio::time::timeout(grace, server).await {
        Ok(joined) => {
            joined.context("server task failed")?.context("server error")?;
            tracing::info!("shutdown complete");
            Ok(())
        }
        Err(_) => anyhow::bail!("graceful shutdown exceeded {}s", grace.as_secs()),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
