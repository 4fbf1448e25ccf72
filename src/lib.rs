//! Leverage Dashboard - tastytrade futures leverage on Cloudflare Workers
//!
//! Logs in to tastytrade, reads the owner account's net liquidating value
//! and futures positions, and shows notional exposure and leverage.
//!
//! # Architecture
//! - Main entry point serves the dashboard page and the session endpoints
//! - KV storage for the remember-token
//! - tastytrade API client for sessions, accounts, balances, positions and quotes
//! - Controller endpoints answer with a view state the page applies verbatim
//!
//! # Flow
//! page load → stored remember-token? → silent login → accounts →
//! balance + positions → market metrics → notional / NLV

// Clippy configuration for dashboard code patterns
#![allow(clippy::cast_precision_loss)] // Float casts OK for display
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::doc_markdown)] // Doc style flexibility
#![allow(clippy::needless_pass_by_value)] // Worker framework patterns
#![allow(clippy::future_not_send)] // Workers runtime is single-threaded

mod aggregator;
mod client;
mod config;
mod controller;
mod dashboard;
mod error;
mod logging;
mod presentation;
mod session;
mod storage;
#[cfg(test)]
mod test_support;
mod types;

use log::debug;
use serde::Deserialize;
use worker::{Context, Env, Request, Response, Router, event};

pub use aggregator::{DataAggregator, leverage, notional_value};
pub use client::{BrokerageApi, TastytradeClient};
pub use config::Config;
pub use controller::DashboardController;
pub use error::{DashboardError, Result};
pub use presentation::{DashboardView, Field, Section, ViewState, format_leverage, format_usd};
pub use session::{Credentials, LoginPayload, SessionManager, SessionToken};
pub use storage::{KvTokenStore, MemoryTokenStore, TokenStore};
pub use types::*;

/// Result type alias for worker operations
type WResult<T> = std::result::Result<T, worker::Error>;

type WorkerController = DashboardController<TastytradeClient, KvTokenStore, ViewState>;

/// Body of POST /api/session/login
#[derive(Debug, Default, Deserialize)]
struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

/// Main Worker entry point
#[event(fetch)]
async fn fetch(req: Request, env: Env, _ctx: Context) -> WResult<Response> {
    console_error_panic_hook::set_once();

    let router = Router::new();

    router
        // Health check
        .get_async("/health", |_req, ctx| async move {
            let config = match Config::from_env(&ctx.env) {
                Ok(c) => c,
                Err(e) => return Response::error(format!("Config error: {e}"), 500),
            };

            Response::from_json(&serde_json::json!({
                "status": "healthy",
                "version": env!("CARGO_PKG_VERSION"),
                "environment": config.environment,
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }))
        })
        // Dashboard UI
        .get("/", |_req, _ctx| Response::from_html(dashboard::dashboard_html()))
        .get("/dashboard", |_req, _ctx| {
            Response::from_html(dashboard::dashboard_html())
        })
        // Page load: silent login with the stored remember-token
        .post_async("/api/session/resume", |_req, ctx| async move {
            let controller = build_controller(&ctx.env)?;
            if let Err(e) = controller.resume().await {
                debug!("Resume ended with error: {e}");
            }
            Response::from_json(&controller.into_view())
        })
        // Login form
        .post_async("/api/session/login", |mut req, ctx| async move {
            let form = req.json::<LoginForm>().await.unwrap_or_default();
            let controller = build_controller(&ctx.env)?;
            let credentials = Credentials::new(form.username, form.password);
            if let Err(e) = controller.submit_login(credentials).await {
                debug!("Login ended with error: {e}");
            }
            Response::from_json(&controller.into_view())
        })
        // Logout
        .post_async("/api/session/logout", |_req, ctx| async move {
            let controller = build_controller(&ctx.env)?;
            controller.logout().await?;
            Response::from_json(&controller.into_view())
        })
        .run(req, env)
        .await
}

/// Wire config, logging, client and KV store into a controller for one request
fn build_controller(env: &Env) -> std::result::Result<WorkerController, DashboardError> {
    let config = Config::from_env(env)?;
    logging::init(config.level_filter()?);

    let kv = env.kv(&config.kv_binding)?;
    let store = KvTokenStore::new(kv, config.remember_token_key.clone());
    let client = TastytradeClient::new(&config);

    Ok(DashboardController::new(client, store, ViewState::default()))
}
