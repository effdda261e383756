//! Webhook receiver.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::net::SocketAddr;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::app::CommitlintBot;
use crate::data::PullRequestEvent;
use crate::error::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

const EVENT_HEADER: &str = "x-github-event";
const SIGNATURE_HEADER: &str = "x-hub-signature-256";

#[derive(Clone)]
pub struct AppState {
    pub bot: CommitlintBot,
    pub webhook_secret: Option<Arc<[u8]>>,
}

impl AppState {
    pub fn new(bot: CommitlintBot, webhook_secret: Option<String>) -> Self {
        Self {
            bot,
            webhook_secret: webhook_secret.map(|s| Arc::from(s.into_bytes())),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhook", post(webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    if state.webhook_secret.is_none() {
        tracing::warn!("No webhook secret configured, deliveries are not verified");
    }

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("commitlint-bot listening on {}", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("commitlint-bot shutting down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Received Ctrl+C, initiating graceful shutdown");
}

async fn health() -> &'static str {
    "ok"
}

async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    if let Some(secret) = &state.webhook_secret {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok());
        if let Err(err) = verify_signature(secret, &body, signature) {
            tracing::warn!("Rejected webhook delivery: {}", err);
            return Err(err);
        }
    }

    let event_name = headers
        .get(EVENT_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    match event_name {
        "ping" => return Ok((StatusCode::OK, "pong").into_response()),
        "pull_request" => {}
        other => {
            tracing::debug!("Ignoring {} event", other);
            return Ok(StatusCode::NO_CONTENT.into_response());
        }
    }

    let event: PullRequestEvent = serde_json::from_slice(&body)?;
    if !event.triggers_lint() {
        tracing::debug!("Ignoring pull_request.{} event", event.action);
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let ctx = event.into_context()?;

    // The run owns its task so a dropped connection cannot cut it short.
    let bot = state.bot.clone();
    let run = tokio::spawn(async move {
        let result = bot.run(&ctx).await;
        if let Err(err) = &result {
            tracing::error!("{}: run aborted: {}", ctx.slug(), err);
        }
        result
    });

    let report = run.await??;
    Ok((StatusCode::OK, Json(report)).into_response())
}

/// Check a `sha256=<hex>` signature header against the raw body.
pub fn verify_signature(secret: &[u8], body: &[u8], header: Option<&str>) -> Result<()> {
    let expected = header
        .and_then(|h| h.strip_prefix("sha256="))
        .and_then(|h| hex::decode(h).ok())
        .ok_or(Error::Signature)?;

    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| Error::Signature)?;
    mac.update(body);
    let actual = mac.finalize().into_bytes();

    if expected.len() != actual.len() || !bool::from(expected.ct_eq(actual.as_slice())) {
        return Err(Error::Signature);
    }
    Ok(())
}

/// Signature header value for `body`, as the hosting platform computes it.
pub fn sign(secret: &[u8], body: &[u8]) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| Error::Signature)?;
    mac.update(body);
    Ok(format!("sha256={}", hex::encode(mac.finalize().into_bytes())))
}
