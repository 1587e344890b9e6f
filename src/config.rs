//! Session configuration: storage key names, identity-service endpoints, and
//! fallback failure messages.
//!
//! DESIGN
//! ======
//! Values are plain owned strings so a single `SessionConfig` can be shared by
//! the credential store, the cross-context listener, and the HTTP identity
//! client without lifetimes leaking into the manager type.

pub const DEFAULT_STORAGE_PREFIX: &str = "careline";
pub const DEFAULT_API_BASE_URL: &str = "/api";
pub const DEFAULT_LOGIN_PATH: &str = "/auth/login";
pub const DEFAULT_SIGNUP_PATH: &str = "/auth/register";
pub const DEFAULT_VERIFY_PATH: &str = "/auth/verify";

pub const DEFAULT_LOGIN_FAILED_MESSAGE: &str = "Login failed. Please try again.";
pub const DEFAULT_SIGNUP_FAILED_MESSAGE: &str = "Signup failed. Please try again.";
pub const DEFAULT_VERIFY_FAILED_MESSAGE: &str = "Verification failed. Please try again.";

/// Errors produced while building a [`SessionConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    Parse(String),
}

/// The two storage slots that make up a persisted credential record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub token: String,
    pub user: String,
}

impl StorageKeys {
    /// Derive `{prefix}_token` / `{prefix}_user`.
    #[must_use]
    pub fn with_prefix(prefix: &str) -> Self {
        Self { token: format!("{prefix}_token"), user: format!("{prefix}_user") }
    }

    /// Whether `key` names one of the two credential slots.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        key == self.token || key == self.user
    }
}

/// Identity-service endpoint layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub base_url: String,
    pub login_path: String,
    pub signup_path: String,
    pub verify_path: String,
}

impl Endpoints {
    #[must_use]
    pub fn login_url(&self) -> String {
        join_url(&self.base_url, &self.login_path)
    }

    #[must_use]
    pub fn signup_url(&self) -> String {
        join_url(&self.base_url, &self.signup_path)
    }

    #[must_use]
    pub fn verify_url(&self) -> String {
        join_url(&self.base_url, &self.verify_path)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_owned(),
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
            signup_path: DEFAULT_SIGNUP_PATH.to_owned(),
            verify_path: DEFAULT_VERIFY_PATH.to_owned(),
        }
    }
}

/// Messages stored in the session when a failure cannot be shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureMessages {
    pub login: String,
    pub signup: String,
    pub verify: String,
}

impl Default for FailureMessages {
    fn default() -> Self {
        Self {
            login: DEFAULT_LOGIN_FAILED_MESSAGE.to_owned(),
            signup: DEFAULT_SIGNUP_FAILED_MESSAGE.to_owned(),
            verify: DEFAULT_VERIFY_FAILED_MESSAGE.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub storage_keys: StorageKeys,
    pub endpoints: Endpoints,
    pub messages: FailureMessages,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_keys: StorageKeys::with_prefix(DEFAULT_STORAGE_PREFIX),
            endpoints: Endpoints::default(),
            messages: FailureMessages::default(),
        }
    }
}

impl SessionConfig {
    /// Build typed session config from environment variables.
    ///
    /// Optional:
    /// - `CARELINE_STORAGE_PREFIX`: storage key prefix (default `careline`)
    /// - `CARELINE_API_BASE_URL`: identity-service base URL (default `/api`)
    /// - `CARELINE_LOGIN_PATH`, `CARELINE_SIGNUP_PATH`, `CARELINE_VERIFY_PATH`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the storage prefix is blank or
    /// contains whitespace, or if an endpoint path does not start with `/`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup (env, query string, test map).
    ///
    /// # Errors
    ///
    /// Same as [`SessionConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let prefix = parse_prefix(lookup("CARELINE_STORAGE_PREFIX").as_deref())?;
        let base_url = lookup("CARELINE_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();

        let endpoints = Endpoints {
            base_url,
            login_path: parse_path("CARELINE_LOGIN_PATH", lookup("CARELINE_LOGIN_PATH"), DEFAULT_LOGIN_PATH)?,
            signup_path: parse_path("CARELINE_SIGNUP_PATH", lookup("CARELINE_SIGNUP_PATH"), DEFAULT_SIGNUP_PATH)?,
            verify_path: parse_path("CARELINE_VERIFY_PATH", lookup("CARELINE_VERIFY_PATH"), DEFAULT_VERIFY_PATH)?,
        };

        Ok(Self { storage_keys: StorageKeys::with_prefix(&prefix), endpoints, messages: FailureMessages::default() })
    }
}

fn parse_prefix(raw: Option<&str>) -> Result<String, ConfigError> {
    let prefix = raw.unwrap_or(DEFAULT_STORAGE_PREFIX).trim();
    if prefix.is_empty() {
        return Err(ConfigError::Parse("CARELINE_STORAGE_PREFIX must not be blank".to_owned()));
    }
    if prefix.chars().any(char::is_whitespace) {
        return Err(ConfigError::Parse(format!("CARELINE_STORAGE_PREFIX contains whitespace: '{prefix}'")));
    }
    Ok(prefix.to_owned())
}

fn parse_path(var: &str, raw: Option<String>, default: &str) -> Result<String, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default.to_owned());
    };
    let path = raw.trim();
    if !path.starts_with('/') {
        return Err(ConfigError::Parse(format!("{var} must start with '/': '{path}'")));
    }
    Ok(path.to_owned())
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{path}", base.trim_end_matches('/'))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
