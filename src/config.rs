use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => anyhow::bail!("unknown APP_ENV `{other}` (expected development or production)"),
        }
    }

    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub uri: String,
    pub db_name: String,
    pub app_name: String,
    pub max_pool_size: Option<u32>,
    pub shutdown_timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub whitelist_origins: Vec<String>,
    pub docs_url: String,
    pub database: DatabaseConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got `{raw}`"))?,
            None => 3000,
        };

        let environment = match lookup("APP_ENV") {
            Some(raw) => Environment::parse(&raw)?,
            None => Environment::Development,
        };

        let whitelist_origins = lookup("WHITELIST_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let max_pool_size = lookup("MONGO_MAX_POOL_SIZE")
            .map(|raw| {
                raw.trim()
                    .parse::<u32>()
                    .with_context(|| format!("MONGO_MAX_POOL_SIZE must be a number, got `{raw}`"))
            })
            .transpose()?;

        let shutdown_secs = lookup("SHUTDOWN_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(10);

        // Left empty when unset; `Database::connect` rejects it.
        let database = DatabaseConfig {
            uri: lookup("MONGO_URI").unwrap_or_default(),
            db_name: lookup("MONGO_DB_NAME").unwrap_or_else(|| "blog-db".into()),
            app_name: lookup("MONGO_APP_NAME").unwrap_or_else(|| "blog".into()),
            max_pool_size,
            shutdown_timeout: Duration::from_secs(shutdown_secs),
        };

        Ok(Self {
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            environment,
            whitelist_origins,
            docs_url: lookup("DOCS_URL").unwrap_or_else(|| "https://docs.blog.ssr0016.com".into()),
            database,
        })
    }
}
