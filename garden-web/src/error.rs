//! Uniform JSON error responses.
//!
//! Every failure path answers with `{"error": <reason>}` (plus `detail` for
//! upstream provider failures) so clients never have to parse HTML or empty
//! bodies.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use garden_core::{GatewayError, ProfileError};
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    /// 400 with a short machine-readable reason.
    BadRequest(String),
    /// 401, no valid session on a protected route.
    Unauthorized,
    /// 401, login/signup with bad credentials.
    InvalidCredentials,
    /// 500 with the fixed credential-missing message.
    MissingApiKey,
    /// The weather provider answered non-2xx; its status is propagated.
    Upstream { status: u16, detail: String },
    /// 500 with a best-effort message.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(reason) => {
                (StatusCode::BAD_REQUEST, json!({ "error": reason }))
            }
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "authentication required" }),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "invalid username or password" }),
            ),
            ApiError::MissingApiKey => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "OPENWEATHER_KEY missing on server" }),
            ),
            ApiError::Upstream { status, detail } => {
                let status =
                    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                let reason = status.canonical_reason().unwrap_or("Upstream Error");
                (
                    status,
                    json!({
                        "error": format!("{} {}", status.as_u16(), reason),
                        "detail": detail,
                    }),
                )
            }
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": message }))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Upstream { status, detail } => ApiError::Upstream { status, detail },
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ProfileError> for ApiError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::InvalidPot | ProfileError::InvalidWatts => {
                ApiError::BadRequest(err.to_string())
            }
            ProfileError::Persist(_) => ApiError::Internal(err.to_string()),
        }
    }
}
