//! Thin HTTP transport wrapper
//!
//! Serde in, serde out: the handlers only extract the caller identity
//! (established upstream — this layer performs no authentication), build a
//! per-request cancellation token and translate [`RelayError`] kinds into
//! status codes. All behavior lives in [`CommandRelay`].

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use gantry_common::RelayRequest;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::cancel::CancelToken;
use crate::error::RelayError;
use crate::relay::CommandRelay;

/// Header carrying the authenticated caller identity, set by the upstream
/// proxy
pub const CALLER_HEADER: &str = "x-gantry-caller";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<CommandRelay>,
}

/// Build the service router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/accounts", get(list_accounts))
        .route("/api/clusters", get(list_clusters))
        .route("/api/accounts/:account/clusters", get(list_account_clusters))
        .route("/api/relay", post(relay_command))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Standard JSON error envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub timestamp: String,
}

impl ErrorResponse {
    fn new(status: u16, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            message: message.into(),
            output: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let mut response = match &self {
            RelayError::ClusterNotFound { .. } => ErrorResponse::new(404, "NOT_FOUND", message),
            RelayError::CredentialNotFound(_) => ErrorResponse::new(404, "NOT_FOUND", message),
            RelayError::Validation(_) => ErrorResponse::new(400, "BAD_REQUEST", message),
            RelayError::Cancelled => ErrorResponse::new(408, "CANCELLED", message),
            RelayError::CommandFailed { .. } => ErrorResponse::new(502, "COMMAND_FAILED", message),
            RelayError::Provider(_) | RelayError::Runner(_) | RelayError::Enumeration { .. } => {
                ErrorResponse::new(502, "UPSTREAM_ERROR", message)
            }
            RelayError::Inventory(_)
            | RelayError::ConnectionConfig(_)
            | RelayError::Internal(_) => {
                tracing::error!(error = %self, "internal relay error");
                ErrorResponse::new(500, "INTERNAL_ERROR", message)
            }
        };
        // Captured output survives execution failures
        if let RelayError::CommandFailed { output, .. } = self {
            response.output = Some(output);
        }
        let status =
            StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(response)).into_response()
    }
}

fn caller_id(headers: &HeaderMap) -> Result<String, RelayError> {
    headers
        .get(CALLER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| RelayError::Validation(format!("missing {} header", CALLER_HEADER)))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_accounts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, RelayError> {
    let caller = caller_id(&headers)?;
    let cancel = CancelToken::new();
    let accounts = state.relay.list_accounts(&cancel, &caller).await?;
    Ok(Json(accounts))
}

async fn list_clusters(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, RelayError> {
    let caller = caller_id(&headers)?;
    let cancel = CancelToken::new();
    let clusters = state.relay.list_clusters(&cancel, &caller).await?;
    Ok(Json(clusters))
}

async fn list_account_clusters(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(account): Path<String>,
) -> Result<impl IntoResponse, RelayError> {
    let caller = caller_id(&headers)?;
    let cancel = CancelToken::new();
    let clusters = state
        .relay
        .list_clusters_for_account(&cancel, &caller, &account)
        .await?;
    Ok(Json(clusters))
}

async fn relay_command(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut request): Json<RelayRequest>,
) -> Result<impl IntoResponse, RelayError> {
    // The transport, not the body, is authoritative for the caller identity
    request.caller_id = caller_id(&headers)?;
    let cancel = CancelToken::new();
    let response = state.relay.relay(&cancel, &request).await?;
    Ok(Json(response))
}
