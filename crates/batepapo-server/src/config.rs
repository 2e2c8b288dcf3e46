use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use batepapo_core::reaper::{DEFAULT_IDLE_AFTER, DEFAULT_SWEEP_INTERVAL};

/// Database path that selects the process-local store instead of SQLite.
pub const IN_MEMORY: &str = ":memory:";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub idle_after: Duration,
    pub sweep_interval: Duration,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = var("BATEPAPO_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = var("BATEPAPO_PORT")
            .unwrap_or_else(|| "5000".into())
            .parse()
            .context("BATEPAPO_PORT must be a port number")?;
        let db_path: PathBuf = var("BATEPAPO_DB_PATH")
            .unwrap_or_else(|| "batepapo.db".into())
            .into();
        let idle_after = seconds(&var, "BATEPAPO_IDLE_SECS", DEFAULT_IDLE_AFTER)?;
        let sweep_interval =
            seconds(&var, "BATEPAPO_REAPER_INTERVAL_SECS", DEFAULT_SWEEP_INTERVAL)?;

        Ok(Self {
            host,
            port,
            db_path,
            idle_after,
            sweep_interval,
        })
    }

    pub fn in_memory(&self) -> bool {
        self.db_path.as_os_str() == IN_MEMORY
    }
}

fn seconds(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<Duration> {
    match var(key) {
        Some(raw) => {
            let secs: u64 = raw
                .parse()
                .with_context(|| format!("{key} must be a whole number of seconds"))?;
            anyhow::ensure!(secs > 0, "{key} must be greater than zero");
            Ok(Duration::from_secs(secs))
        }
        None => Ok(default),
    }
}
