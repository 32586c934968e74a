//! Router assembly and server startup.

use anyhow::Context;
use axum::Router;
use axum::routing::{get, post};
use garden_core::{Config, OpenWeatherGateway, PreferenceStore, WeatherGateway};
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::auth::AuthStore;
use crate::{auth, handlers};

#[derive(Clone)]
pub struct AppState {
    /// None when no credential is configured; weather lookups then answer
    /// with the fixed configuration error.
    pub gateway: Option<Arc<dyn WeatherGateway>>,
    pub profiles: Arc<PreferenceStore>,
    pub auth: Arc<AuthStore>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/weather", get(handlers::weather))
        .route(
            "/api/preferences",
            get(handlers::get_preferences).post(handlers::update_preferences),
        )
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/session", get(auth::session))
        .with_state(state)
}

/// Build state from config and serve until ctrl-c.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let gateway: Option<Arc<dyn WeatherGateway>> = match &config.openweather_api_key {
        Some(key) => Some(Arc::new(OpenWeatherGateway::new(key.clone())?)),
        None => {
            tracing::warn!("no OpenWeather API key configured; weather lookups will fail");
            None
        }
    };

    let profiles_path = config.profiles_path()?;
    let users_path = profiles_path.with_file_name("users.json");
    let profiles = Arc::new(PreferenceStore::open(profiles_path)?);
    let auth = Arc::new(AuthStore::open(users_path)?);

    let state = AppState { gateway, profiles, auth };

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "garden planner listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("failed to install ctrl-c handler");
    }
}
