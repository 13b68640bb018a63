use std::fmt;

use crate::error::{Error, Result};

/// Connection settings for the read-only event database.
///
/// Credentials are never compiled in: host, user, password, and database
/// name must come from the environment. Only port, charset, and timeouts
/// have defaults.
#[derive(Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    pub charset: String,
    /// Per-attempt connection timeout (seconds).
    pub connect_timeout_secs: u64,
    /// Per-query read timeout (seconds).
    pub read_timeout_secs: u64,
}

impl DbConfig {
    /// Load config from `DB_*` environment variables.
    ///
    /// `DB_HOST`, `DB_USER`, `DB_PASSWORD`, and `DB_NAME` are required;
    /// `DB_PORT` (3306), `DB_CHARSET` (utf8mb4), `DB_CONNECT_TIMEOUT`
    /// (10s), and `DB_READ_TIMEOUT` (30s) are optional.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: require("DB_HOST")?,
            port: std::env::var("DB_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3306),
            username: require("DB_USER")?,
            password: require("DB_PASSWORD")?,
            database: require("DB_NAME")?,
            charset: std::env::var("DB_CHARSET").unwrap_or_else(|_| "utf8mb4".to_string()),
            connect_timeout_secs: std::env::var("DB_CONNECT_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            read_timeout_secs: std::env::var("DB_READ_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        })
    }
}

fn require(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| Error::Config(format!("{name} must be set")))
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("database", &self.database)
            .field("charset", &self.charset)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("read_timeout_secs", &self.read_timeout_secs)
            .finish()
    }
}
