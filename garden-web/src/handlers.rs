//! Request handlers for the landing page, weather lookups and preferences.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::response::Html;
use garden_core::{UserProfile, WeatherReport, suggest_action};
use serde::Deserialize;
use serde_json::Value;

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::error::ApiError;

/// Landing page; all further interaction goes through the JSON API.
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}

#[derive(Debug, Deserialize)]
pub struct WeatherParams {
    #[serde(default)]
    city: String,
}

/// `GET /api/weather?city=` — fetch current conditions and attach the
/// gardening recommendation.
pub async fn weather(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> Result<Json<WeatherReport>, ApiError> {
    let city = params.city.trim();
    if city.is_empty() {
        return Err(ApiError::BadRequest("city parameter required".to_string()));
    }

    let gateway = state.gateway.as_ref().ok_or(ApiError::MissingApiKey)?;
    let reading = gateway.fetch_reading(city).await?;
    let suggestion = suggest_action(&reading);
    tracing::debug!(city, ?suggestion, "weather lookup");

    Ok(Json(WeatherReport::new(city, reading, suggestion)))
}

/// `GET /api/preferences` — the stored profile, created on first access.
pub async fn get_preferences(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<UserProfile>, ApiError> {
    Ok(Json(state.profiles.get_or_create(&user)?))
}

#[derive(Debug, Deserialize)]
pub struct PreferencesBody {
    pot: Option<Value>,
    watts: Option<Value>,
    #[serde(default)]
    city: String,
}

/// `POST /api/preferences` — whole-record replace with validation.
///
/// `pot` and `watts` are accepted only as JSON numbers; a string "40" is a
/// rejected write, same as the missing field.
pub async fn update_preferences(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<PreferencesBody>, JsonRejection>,
) -> Result<Json<UserProfile>, ApiError> {
    let Json(body) = body.map_err(|_| ApiError::BadRequest("Invalid JSON".to_string()))?;

    let pot = body
        .pot
        .as_ref()
        .and_then(Value::as_f64)
        .ok_or_else(|| ApiError::BadRequest("pot must be positive number".to_string()))?;
    let watts = body
        .watts
        .as_ref()
        .and_then(Value::as_f64)
        .ok_or_else(|| ApiError::BadRequest("watts must be positive number".to_string()))?;

    let profile = state.profiles.update(&user, pot, watts, body.city.trim())?;
    Ok(Json(profile))
}
