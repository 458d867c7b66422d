use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    /// How long the health check reports 503 before the listener closes.
    pub drain_delay: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let db_path = lookup("REVIEWER_DB_PATH").unwrap_or_else(|| "reviewer.db".into());
        let host = lookup("REVIEWER_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match lookup("REVIEWER_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("REVIEWER_PORT is not a valid port: {raw:?}"))?,
            None => 8080,
        };
        let drain_delay = match lookup("REVIEWER_DRAIN_DELAY_SECS") {
            Some(raw) => raw.parse().map(Duration::from_secs).with_context(|| {
                format!("REVIEWER_DRAIN_DELAY_SECS is not a number of seconds: {raw:?}")
            })?,
            None => Duration::from_secs(5),
        };

        Ok(Self {
            db_path: db_path.into(),
            host,
            port,
            drain_delay,
        })
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
