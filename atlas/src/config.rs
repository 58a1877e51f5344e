use std::{env, fmt};

use crate::error::ConfigError;

pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Connection settings read from the environment.
///
/// `DATABASE_URL` wins when set; otherwise the url is built from
/// `DB_USERNAME`, `DB_PASSWORD`, `DB_ADDRESS`, `DB_NAME` and `DB_PORT`.
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl DbConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!("no .env loaded: {e}");
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;

        if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.is_empty()) {
            return Ok(Self {
                url,
                max_connections,
            });
        }

        let require = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));
        let username = require("DB_USERNAME")?;
        let password = require("DB_PASSWORD")?;
        let address = require("DB_ADDRESS")?;
        let name = require("DB_NAME")?;
        let port = parse_or(&lookup, "DB_PORT", DEFAULT_PORT)?;

        Ok(Self {
            url: format!("postgres://{username}:{password}@{address}:{port}/{name}"),
            max_connections,
        })
    }
}

pub fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
    }
}
