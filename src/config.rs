use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => anyhow::bail!("unknown APP_ENV value: {other}"),
        }
    }

    /// Whether internal error detail may be echoed back to clients.
    pub fn exposes_error_detail(self) -> bool {
        self == Self::Development
    }
}

#[derive(Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub master_key: String,
    pub env: AppEnv,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub storage_timeout_secs: u64,
}

// Hand-written so the master key never ends up in logs.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("db_max_connections", &self.db_max_connections)
            .field("storage_timeout_secs", &self.storage_timeout_secs)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = get("DATABASE_URL").context("DATABASE_URL must be set")?;
        let master_key = get("MASTER_KEY")
            .filter(|v| !v.is_empty())
            .context("MASTER_KEY must be set to a non-empty value")?;
        let env = match get("APP_ENV") {
            Some(raw) => AppEnv::parse(&raw)?,
            None => AppEnv::Production,
        };
        let port = get("APP_PORT")
            .or_else(|| get("PORT"))
            .map(|v| v.parse::<u16>())
            .transpose()
            .context("APP_PORT must be a valid port number")?
            .unwrap_or(7000);

        Ok(Self {
            database_url,
            master_key,
            env,
            host: get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            db_max_connections: get("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(10),
            storage_timeout_secs: get("STORAGE_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(10),
        })
    }

    pub fn storage_timeout(&self) -> Duration {
        Duration::from_secs(self.storage_timeout_secs)
    }
}
