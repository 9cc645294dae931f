use std::time::Duration;

use anyhow::Context;
use time::UtcOffset;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub request_timeout: Duration,
    pub assets_dir: String,
    pub index_page: String,
    /// Offset used to pick "today" for exercises logged without a date.
    pub local_offset: UtcOffset,
}

impl AppConfig {
    /// Reads configuration from the environment. `PORT` and `DATABASE_URL`
    /// are mandatory; everything else falls back to a default.
    pub fn from_env(local_offset: UtcOffset) -> anyhow::Result<Self> {
        let port = std::env::var("PORT")
            .context("$PORT is not set")?
            .parse::<u16>()
            .context("$PORT is not a valid port number")?;
        let database = DatabaseConfig {
            url: std::env::var("DATABASE_URL").context("$DATABASE_URL is not set")?,
            max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(10),
        };
        let request_timeout = std::env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            database,
            request_timeout,
            assets_dir: std::env::var("ASSETS_DIR").unwrap_or_else(|_| "assets".into()),
            index_page: std::env::var("INDEX_PAGE")
                .unwrap_or_else(|_| "views/index.html".into()),
            local_offset,
        })
    }
}

/// Must run before the async runtime starts its worker threads: on Unix the
/// local offset is only readable while the process is single-threaded.
///
/// The offset is read once, so after a daylight-saving change "today" keeps
/// following the old offset until the process is restarted.
pub fn detect_local_offset() -> UtcOffset {
    match UtcOffset::current_local_offset() {
        Ok(offset) => offset,
        Err(e) => {
            tracing::warn!(error = %e, "could not determine local UTC offset; using UTC");
            UtcOffset::UTC
        }
    }
}
