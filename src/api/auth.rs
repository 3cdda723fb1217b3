//! Auth endpoints and the in-memory session.

use super::{take_field, ApiClient, ApiError, Method};
use crate::utils::persistence;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

/// File holding the cached, non-sensitive user profile.
pub const PROFILE_CACHE_FILE: &str = "profile.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Credentials live only as long as the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub access_token: Option<String>,
    pub csrf_token: Option<String>,
    pub user: Option<UserProfile>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.user.is_some()
    }

    pub fn clear(&mut self) {
        self.access_token = None;
        self.user = None;
    }

    /// Takes tokens and the user profile from a login/refresh envelope.
    fn absorb(&mut self, envelope: &Value) {
        if let Some(token) = envelope.get("access_token").and_then(Value::as_str) {
            self.access_token = Some(token.to_string());
        }
        if let Some(user) = envelope.get("user") {
            match serde_json::from_value::<UserProfile>(user.clone()) {
                Ok(user) => self.user = Some(user),
                Err(e) => warn!("ignoring malformed user profile: {}", e),
            }
        }
    }

    /// Like `absorb`, but a login must name its own user.
    fn absorb_login(&mut self, envelope: &Value) -> Result<UserProfile, ApiError> {
        self.user = None;
        self.absorb(envelope);
        self.user
            .clone()
            .ok_or_else(|| ApiError::Decode("login response has no user".into()))
    }
}

impl ApiClient {
    pub fn fetch_csrf_token(&mut self) -> Result<String, ApiError> {
        let envelope = self.send(Method::Get, "/csrf-token", None)?;
        let token: String = take_field(envelope, "csrf_token")?;
        self.session_mut().csrf_token = Some(token.clone());
        Ok(token)
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        let body = json!({ "email": email, "password": password });
        let envelope = self.send(Method::Post, "/api/auth/login", Some(&body))?;
        let user = self.session_mut().absorb_login(&envelope)?;
        info!(user = %user.id, "logged in");
        if let Err(e) = cache_profile(&user) {
            warn!("could not cache profile: {}", e);
        }
        Ok(user)
    }

    pub fn register(&self, registration: &Registration) -> Result<UserProfile, ApiError> {
        let body =
            serde_json::to_value(registration).map_err(|e| ApiError::Decode(e.to_string()))?;
        let envelope = self.send(Method::Post, "/api/auth/register", Some(&body))?;
        take_field(envelope, "user")
    }

    /// Clears the local session even when the server call fails.
    pub fn logout(&mut self) -> Result<(), ApiError> {
        let result = self.send(Method::Post, "/api/auth/logout", None);
        self.session_mut().clear();
        clear_cached_profile();
        result.map(|_| ())
    }

    pub fn refresh(&mut self) -> Result<(), ApiError> {
        let envelope = self.send(Method::Post, "/api/auth/refresh", None)?;
        self.session_mut().absorb(&envelope);
        Ok(())
    }

    pub fn me(&mut self) -> Result<UserProfile, ApiError> {
        let envelope = self.send(Method::Get, "/api/auth/me", None)?;
        let user: UserProfile = take_field(envelope, "user")?;
        self.session_mut().user = Some(user.clone());
        Ok(user)
    }

    pub fn resend_verification(&self, email: &str) -> Result<(), ApiError> {
        let body = json!({ "email": email });
        self.send(Method::Post, "/api/auth/resend-verification", Some(&body))?;
        Ok(())
    }
}

pub fn cache_profile(user: &UserProfile) -> std::io::Result<()> {
    persistence::save_json(PROFILE_CACHE_FILE, user)
}

pub fn cached_profile() -> Option<UserProfile> {
    persistence::load_json_or_default::<Option<UserProfile>>(PROFILE_CACHE_FILE)
}

fn clear_cached_profile() {
    if let Ok(path) = persistence::save_path(PROFILE_CACHE_FILE) {
        std::fs::remove_file(path).ok();
    }
}
