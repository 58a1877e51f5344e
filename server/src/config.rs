use std::env;

use atlas::{parse_or, ConfigError};

pub const DEFAULT_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
}

impl ServerConfig {
    /// Reads `BIND_ADDRESS` and `PORT`. Call after `.env` has been loaded.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            address: lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_ADDRESS.into()),
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
        })
    }
}
