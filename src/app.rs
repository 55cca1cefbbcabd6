/*
 * Responsibility
 * - tracing / panic hook setup
 * - Load Config -> build AppState -> assemble the Router
 * - Apply middleware (method guard, request id/trace/timeout, security headers)
 * - axum::serve() until Ctrl-C
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::{AppEnv, Config},
    middleware,
    state::AppState,
};

// Outside production the relay's own stage logs (debug) are on by default.
const DEV_FILTER: &str = concat!("info,", env!("CARGO_CRATE_NAME"), "=debug,tower_http=debug");
const PROD_FILTER: &str = "info,tower_http=info";

fn init_tracing(app_env: AppEnv) {
    // RUST_LOG wins when set.
    let default_filter = if app_env.is_production() {
        PROD_FILTER
    } else {
        DEV_FILTER
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(String::as_str))
            .unwrap_or("<non-string payload>");
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        tracing::error!(%payload, %location, "panic while serving");

        // Development: crash loudly. Production: default hook, keep serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    let config = Config::from_env().context("loading configuration")?;
    init_tracing(config.app_env);
    init_panic_hook(!config.app_env.is_production());
    let config = Arc::new(config);

    tracing::info!(
        env = ?config.app_env,
        addr = %config.addr,
        guild_id = %config.guild_id,
        denied_guilds = config.denied_guild_ids.len(),
        "starting invite relay"
    );

    if config.denied_guild_ids.is_empty() {
        tracing::warn!("deny-list is empty; every authorized user will be admitted");
    }

    let state = AppState::new(config.clone()).context("building identity provider client")?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown signal received");
            }
        })
        .await?;

    Ok(())
}

/// Security headers wrap everything else, so timeouts and middleware errors
/// carry them too.
pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();
    let router = api::routes().with_state(state);
    let router = middleware::method_guard::apply(router);
    let router = middleware::http::apply(router, &config);
    middleware::security_headers::apply(router)
}
