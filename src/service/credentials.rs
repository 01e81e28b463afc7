use subtle::ConstantTimeEq;

use crate::config::AuthConfig;

/// Decides whether a submitted login/password pair opens a session.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, login: &str, password: &str) -> bool;
}

/// A single configured login pair, compared exactly.
pub struct FixedCredentials {
    login: String,
    password: String,
}

impl FixedCredentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

impl From<&AuthConfig> for FixedCredentials {
    fn from(cfg: &AuthConfig) -> Self {
        Self::new(cfg.login.clone(), cfg.password.clone())
    }
}

impl CredentialVerifier for FixedCredentials {
    fn verify(&self, login: &str, password: &str) -> bool {
        let login_ok = login.as_bytes().ct_eq(self.login.as_bytes());
        let password_ok = password.as_bytes().ct_eq(self.password.as_bytes());
        bool::from(login_ok & password_ok)
    }
}
