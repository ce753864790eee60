use std::net::SocketAddr;

use anyhow::Context;

const DEFAULT_LISTEN: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub listen: SocketAddr,
    /// Reject version reports; reads keep working.
    pub read_only: bool,
    pub db_max_connections: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL is required"))?;

        let listen = std::env::var("VERSIONMGR_LISTEN")
            .unwrap_or_else(|_| DEFAULT_LISTEN.to_string())
            .parse()
            .context("VERSIONMGR_LISTEN must be a socket address")?;

        let db_max_connections = match std::env::var("VERSIONMGR_DB_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .context("VERSIONMGR_DB_MAX_CONNECTIONS must be a positive integer")?
                .max(1),
            Err(_) => DEFAULT_DB_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url,
            listen,
            read_only: std::env::var("VERSIONMGR_READ_ONLY").is_ok_and(|v| is_truthy(&v)),
            db_max_connections,
        })
    }
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
