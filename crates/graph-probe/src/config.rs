use std::fmt;

use thiserror::Error;

pub const URI_VAR: &str = "NEO4J_URI";
pub const USER_VAR: &str = "NEO4J_USER";
pub const PASSWORD_VAR: &str = "NEO4J_PASSWORD";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{} must be set (add them to the environment or a .env file)", .0.join(", "))]
    Missing(Vec<&'static str>),
}

// ---------------------------------------------------------------------------
// ConnectionConfig
// ---------------------------------------------------------------------------

/// Where and as whom to connect. Every field is non-empty once built.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
}

impl ConnectionConfig {
    /// Read the connection parameters from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Missing and empty values are both errors,
    /// and the error names every offending variable, not only the first.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let uri = read(URI_VAR);
        let user = read(USER_VAR);
        let password = read(PASSWORD_VAR);

        match (uri, user, password) {
            (Some(uri), Some(user), Some(password)) => Ok(ConnectionConfig {
                uri,
                user,
                password,
            }),
            (uri, user, password) => {
                let missing = [
                    (URI_VAR, uri.is_none()),
                    (USER_VAR, user.is_none()),
                    (PASSWORD_VAR, password.is_none()),
                ]
                .into_iter()
                .filter_map(|(key, absent)| absent.then_some(key))
                .collect();
                Err(ConfigError::Missing(missing))
            }
        }
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("uri", &self.uri)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Seed the environment from a `.env` file, if one exists.
///
/// Variables already present in the environment win. Returns the path that
/// was loaded, or `None` when there was no file.
pub fn load_dotenv() -> Option<std::path::PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => Some(path),
        Err(e) if e.not_found() => None,
        Err(e) => {
            tracing::warn!("ignoring unreadable .env file: {e}");
            None
        }
    }
}
