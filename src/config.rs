//! Runtime configuration.
//!
//! Values come from built-in defaults, overridden by environment variables
//! prefixed with `CADASTRO_`; nested keys are separated by `__`, e.g.
//! `CADASTRO_BASIC__DATABASE_URL` or `CADASTRO_AUTH__PASSWORD`.

use axum_extra::extract::cookie::Key;
use chrono::TimeDelta;
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CadastroError;

pub const ENV_PREFIX: &str = "CADASTRO_";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub basic: BasicConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    pub listen_addr: String,
    pub database_url: String,
    pub max_connections: u32,
    pub loglevel: String,
    /// Master key for the private session cookie. Must be at least 64 bytes;
    /// when absent a random key is generated on every start.
    pub cookie_secret: Option<String>,
    /// Mark the session cookie `Secure`. Only enable behind HTTPS; browsers
    /// drop secure cookies set over plain HTTP.
    pub secure_cookie: bool,
    /// Idle sessions older than this are treated as logged out.
    pub session_ttl_hours: u32,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            database_url: "sqlite:database.sqlite".to_string(),
            max_connections: 5,
            loglevel: "info".to_string(),
            cookie_secret: None,
            secure_cookie: false,
            session_ttl_hours: 12,
        }
    }
}

/// The single login accepted by the session gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub login: String,
    pub password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login: "admin".to_string(),
            password: "admin".to_string(),
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self, CadastroError> {
        Ok(Self::figment().extract()?)
    }

    pub fn session_ttl(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.basic.session_ttl_hours))
    }

    pub fn cookie_key(&self) -> Key {
        match self.basic.cookie_secret.as_deref() {
            Some(secret) => Key::try_from(secret.as_bytes()).unwrap_or_else(|e| {
                warn!(error = %e, "cookie_secret rejected; using a random key");
                Key::generate()
            }),
            None => Key::generate(),
        }
    }
}
