//! HTTP relay exposing `POST /api/generate`.
//!
//! Accepts `{"prompt": "..."}` and answers `{"text": "..."}`, or
//! `{"error": "...", "detail": "..."}` with a 4xx/5xx status.
//!
//! Enabled with the `server` feature.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{RelayError, TextGenerator};

pub const GENERATE_PATH: &str = "/api/generate";

/// Shared state behind the relay route.
#[derive(Clone, Debug)]
pub enum RelayState {
    Ready(Arc<TextGenerator>),
    /// No credential was available at startup; every request answers 500.
    Unconfigured {
        /// Name of the missing credential variable.
        missing: String,
    },
}

impl RelayState {
    pub fn ready(generator: TextGenerator) -> Self {
        Self::Ready(Arc::new(generator))
    }

    pub fn unconfigured(missing: impl Into<String>) -> Self {
        Self::Unconfigured {
            missing: missing.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    #[serde(default)]
    prompt: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct GenerateResponse {
    text: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

fn error_response(status: StatusCode, error: impl Into<String>, detail: Option<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: error.into(),
            detail,
        }),
    )
        .into_response()
}

/// Builds the relay router.
pub fn router(state: RelayState) -> Router {
    Router::new()
        .route(GENERATE_PATH, post(generate_handler))
        .with_state(state)
}

async fn generate_handler(State(state): State<RelayState>, body: Bytes) -> Response {
    let prompt = serde_json::from_slice::<GenerateRequest>(&body)
        .ok()
        .and_then(|request| match request.prompt {
            Some(serde_json::Value::String(prompt)) if !prompt.trim().is_empty() => Some(prompt),
            _ => None,
        });
    let Some(prompt) = prompt else {
        return error_response(StatusCode::BAD_REQUEST, "Missing prompt", None);
    };

    let generator = match state {
        RelayState::Ready(generator) => generator,
        RelayState::Unconfigured { missing } => {
            tracing::error!(%missing, "relay has no upstream credential");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Missing {missing}"),
                None,
            );
        }
    };

    match generator.generate(&prompt).await {
        Ok(output) => Json(GenerateResponse {
            text: output.into_display_text(),
        })
        .into_response(),
        Err(RelayError::Http {
            status,
            status_text,
            body,
        }) => {
            tracing::warn!(status, %status_text, "upstream rejected prompt");
            error_response(StatusCode::BAD_GATEWAY, "Upstream error", Some(body))
        }
        Err(err) => {
            tracing::warn!(error = %err, "prompt relay failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), None)
        }
    }
}
