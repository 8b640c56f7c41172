use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    pub admin_api_key: String,
    pub cors_allowed_origins: AllowedOrigins,
    pub log_format: LogFormat,
    pub resolver: ResolverConfig,
}

/// Settings for the client-side settings resolver.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    pub base_url: String,
    pub stale_after_secs: u64,
    pub refresh_every_secs: u64,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok(); // Load .env file if present

        let server_port: u16 = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        let admin_api_key = env::var("ADMIN_API_KEY")?;
        if admin_api_key.trim().is_empty() {
            anyhow::bail!("ADMIN_API_KEY must not be empty");
        }

        Ok(Config {
            server_port,
            database_url: env::var("DATABASE_URL")?,
            admin_api_key,
            cors_allowed_origins: parse_allowed_origins(
                &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
            )?,
            log_format: LogFormat::from_env()?,
            resolver: ResolverConfig::from_env(&format!("http://127.0.0.1:{}", server_port))?,
        })
    }
}

impl ResolverConfig {
    /// Reads `SETTINGS_*` variables; `default_base_url` applies when unset.
    pub fn from_env(default_base_url: &str) -> anyhow::Result<Self> {
        dotenv().ok();

        let base_url =
            env::var("SETTINGS_BASE_URL").unwrap_or_else(|_| default_base_url.to_string());
        url::Url::parse(&base_url)
            .map_err(|e| anyhow::anyhow!("SETTINGS_BASE_URL is not a valid URL: {}", e))?;

        let stale_after_secs = env::var("SETTINGS_STALE_SECS")
            .unwrap_or_else(|_| "1".to_string())
            .parse()?;
        let refresh_every_secs: u64 = env::var("SETTINGS_REFRESH_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()?;
        if refresh_every_secs == 0 {
            anyhow::bail!("SETTINGS_REFRESH_SECS must be greater than 0");
        }

        Ok(Self {
            base_url,
            stale_after_secs,
            refresh_every_secs,
        })
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_secs)
    }

    pub fn refresh_every(&self) -> Duration {
        Duration::from_secs(self.refresh_every_secs)
    }
}

impl LogFormat {
    pub fn from_env() -> Result<Self> {
        match env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "text".to_string())
            .to_lowercase()
            .as_str()
        {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("LOG_FORMAT must be 'text' or 'json', got '{}'", other),
        }
    }
}

fn parse_allowed_origins(raw: &str) -> anyhow::Result<AllowedOrigins> {
    let value = raw.trim();
    if value == "*" {
        return Ok(AllowedOrigins::Any);
    }

    let origins = value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            url::Url::parse(entry)
                .map(|_| entry.trim_end_matches('/').to_string())
                .map_err(|e| anyhow::anyhow!("invalid origin '{}': {}", entry, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if origins.is_empty() {
        anyhow::bail!("CORS_ALLOWED_ORIGINS must be '*' or a comma-separated list of origins");
    }

    Ok(AllowedOrigins::List(origins))
}
