//! Session-cookie authentication for the preference endpoints.
//!
//! Users live in a JSON file next to the profile store, passwords as salted
//! SHA-256 hashes. Sessions are opaque tokens held in memory and handed to
//! the browser in an HttpOnly cookie; they do not survive a restart.

use anyhow::Context;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

pub const SESSION_COOKIE: &str = "garden_session";

const MIN_PASSWORD_CHARS: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("username required")]
    EmptyUsername,

    #[error("password must be at least {MIN_PASSWORD_CHARS} characters")]
    WeakPassword,

    #[error("username already taken")]
    UserExists,

    #[error("invalid username or password")]
    BadCredentials,

    #[error("failed to persist users: {0}")]
    Persist(#[source] anyhow::Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::BadCredentials => ApiError::InvalidCredentials,
            AuthError::Persist(_) => ApiError::Internal(err.to_string()),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredUser {
    salt: String,
    password_hash: String,
}

/// File-backed user registry plus in-memory session table.
#[derive(Debug)]
pub struct AuthStore {
    path: PathBuf,
    users: Mutex<HashMap<String, StoredUser>>,
    /// session token -> username
    sessions: RwLock<HashMap<String, String>>,
}

impl AuthStore {
    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let users = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read user store: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse user store: {}", path.display()))?
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            users: Mutex::new(users),
            sessions: RwLock::new(HashMap::new()),
        })
    }

    /// Register a new user. The username is stored as given (minus
    /// surrounding whitespace); duplicate names are rejected.
    pub fn signup(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::EmptyUsername);
        }
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AuthError::WeakPassword);
        }

        let mut users = self.users.lock();
        if users.contains_key(username) {
            return Err(AuthError::UserExists);
        }

        let salt = Uuid::new_v4().to_string();
        let password_hash = hash_password(&salt, password);
        users.insert(username.to_string(), StoredUser { salt, password_hash });
        self.write(&users)?;
        Ok(())
    }

    /// Check a username/password pair.
    pub fn verify(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let users = self.users.lock();
        let user = users.get(username.trim()).ok_or(AuthError::BadCredentials)?;
        if hash_password(&user.salt, password) == user.password_hash {
            Ok(())
        } else {
            Err(AuthError::BadCredentials)
        }
    }

    /// Mint a fresh opaque session token for a user.
    pub fn create_session(&self, username: &str) -> String {
        let token = Uuid::new_v4().to_string();
        self.sessions
            .write()
            .insert(token.clone(), username.trim().to_string());
        token
    }

    pub fn session_user(&self, token: &str) -> Option<String> {
        self.sessions.read().get(token).cloned()
    }

    pub fn remove_session(&self, token: &str) {
        self.sessions.write().remove(token);
    }

    fn write(&self, users: &HashMap<String, StoredUser>) -> Result<(), AuthError> {
        let persist = || -> anyhow::Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create user store directory: {}", parent.display())
                })?;
            }
            let json =
                serde_json::to_string_pretty(users).context("Failed to serialize users")?;
            fs::write(&self.path, json)
                .with_context(|| format!("Failed to write user store: {}", self.path.display()))?;
            Ok(())
        };

        persist().map_err(AuthError::Persist)
    }
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Pull a named cookie out of the `Cookie` header.
fn cookie_value(headers: &axum::http::HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        (k == name).then(|| v.to_string())
    })
}

/// Extractor for the logged-in user. Rejects with 401 when the session
/// cookie is absent or stale.
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = cookie_value(&parts.headers, SESSION_COOKIE).ok_or(ApiError::Unauthorized)?;
        let username = state
            .auth
            .session_user(&token)
            .ok_or(ApiError::Unauthorized)?;
        Ok(AuthUser(username))
    }
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

fn session_set_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

fn session_clear_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

fn with_cookie(body: serde_json::Value, cookie: &str) -> Result<Response, ApiError> {
    let mut res = Json(body).into_response();
    let value = HeaderValue::from_str(cookie)
        .map_err(|e| ApiError::Internal(format!("invalid cookie header: {e}")))?;
    res.headers_mut().insert(header::SET_COOKIE, value);
    Ok(res)
}

pub async fn signup(
    State(state): State<AppState>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(creds) = body.map_err(|_| ApiError::BadRequest("Invalid JSON".to_string()))?;

    state.auth.signup(&creds.username, &creds.password)?;
    let username = creds.username.trim().to_string();
    let token = state.auth.create_session(&username);
    tracing::info!(%username, "new user signed up");

    with_cookie(json!({ "username": username }), &session_set_cookie(&token))
}

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(creds) = body.map_err(|_| ApiError::BadRequest("Invalid JSON".to_string()))?;

    state.auth.verify(&creds.username, &creds.password)?;
    let username = creds.username.trim().to_string();
    let token = state.auth.create_session(&username);

    with_cookie(json!({ "username": username }), &session_set_cookie(&token))
}

pub async fn logout(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> Result<Response, ApiError> {
    if let Some(token) = cookie_value(&headers, SESSION_COOKIE) {
        state.auth.remove_session(&token);
    }
    with_cookie(json!({ "ok": true }), &session_clear_cookie())
}

/// Who am I, for the landing page to decide what to render.
pub async fn session(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> Json<serde_json::Value> {
    let username = cookie_value(&headers, SESSION_COOKIE)
        .and_then(|token| state.auth.session_user(&token));

    Json(json!({
        "authenticated": username.is_some(),
        "username": username,
    }))
}
