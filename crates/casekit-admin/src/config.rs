//! Environment-driven configuration for the admin CLI.
//!
//! Environment variables:
//!   DATABASE_URL             - PostgreSQL URL (default: "postgres://localhost/casekit")
//!   DB_MAX_CONNECTIONS       - pool size (default: 5)
//!   DB_CONNECT_TIMEOUT_SECS  - acquire timeout (default: 30)
//!   LOG_FORMAT               - "json" or "text" (default: "text")
//!   LOG_FILE                 - path to log file (optional, enables file logging)
//!   LOG_ANSI                 - "true"/"false" override ANSI colors (auto-detected by default)
//!   RUST_LOG                 - standard env filter (default: info for the casekit crates)

use std::time::Duration;

use anyhow::{bail, Context};
use casekit_db::PoolConfig;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/casekit";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    pub file: Option<String>,
    pub ansi: Option<bool>,
}

/// Resolved CLI configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub database_url: String,
    pub pool: PoolConfig,
    pub log: LogConfig,
}

impl AdminConfig {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let mut pool = PoolConfig::new();
        if let Some(raw) = lookup("DB_MAX_CONNECTIONS") {
            let n: u32 = raw
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS must be an integer, got {raw:?}"))?;
            if n == 0 {
                bail!("DB_MAX_CONNECTIONS must be at least 1");
            }
            pool = pool.max_connections(n);
        }
        if let Some(raw) = lookup("DB_CONNECT_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().with_context(|| {
                format!("DB_CONNECT_TIMEOUT_SECS must be an integer, got {raw:?}")
            })?;
            pool = pool.connect_timeout(Duration::from_secs(secs));
        }

        let format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => bail!("LOG_FORMAT must be \"text\" or \"json\", got {other:?}"),
        };

        Ok(Self {
            database_url,
            pool,
            log: LogConfig {
                format,
                file: lookup("LOG_FILE"),
                ansi: lookup("LOG_ANSI").map(|v| v == "true" || v == "1"),
            },
        })
    }

    /// Replace the database URL, e.g. from a command-line flag.
    pub fn with_database_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.database_url = url;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<AdminConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AdminConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(cfg.log.format, LogFormat::Text);
        assert!(cfg.log.file.is_none());
        assert!(cfg.log.ansi.is_none());
    }

    #[test]
    fn test_reads_variables() {
        let cfg = config(&[
            ("DATABASE_URL", "postgres://db/ir"),
            ("DB_MAX_CONNECTIONS", "3"),
            ("DB_CONNECT_TIMEOUT_SECS", "7"),
            ("LOG_FORMAT", "json"),
            ("LOG_FILE", "/var/log/casekit/admin.log"),
            ("LOG_ANSI", "1"),
        ])
        .unwrap();

        assert_eq!(cfg.database_url, "postgres://db/ir");
        assert_eq!(cfg.pool.max_connections, 3);
        assert_eq!(cfg.pool.connect_timeout, Duration::from_secs(7));
        assert_eq!(cfg.log.format, LogFormat::Json);
        assert_eq!(cfg.log.file.as_deref(), Some("/var/log/casekit/admin.log"));
        assert_eq!(cfg.log.ansi, Some(true));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(config(&[("DB_MAX_CONNECTIONS", "many")]).is_err());
        assert!(config(&[("DB_MAX_CONNECTIONS", "0")]).is_err());
        assert!(config(&[("LOG_FORMAT", "xml")]).is_err());
    }

    #[test]
    fn test_flag_overrides_url() {
        let cfg = config(&[("DATABASE_URL", "postgres://env/db")])
            .unwrap()
            .with_database_url(Some("postgres://flag/db".to_string()));
        assert_eq!(cfg.database_url, "postgres://flag/db");

        let cfg = cfg.with_database_url(None);
        assert_eq!(cfg.database_url, "postgres://flag/db");
    }
}
