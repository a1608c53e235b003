/**
 * Server Configuration
 *
 * This module loads the server configuration from environment variables
 * (after `.env` has been read by the binary). Every setting has a default
 * suitable for local development except the Gemini API key. Without one
 * the server runs with generation disabled; a key that is set but unusable
 * stops startup.
 *
 * # Environment Variables
 *
 * | Variable                      | Default                     |
 * |-------------------------------|-----------------------------|
 * | `SERVER_HOST`                 | `0.0.0.0`                   |
 * | `SERVER_PORT`                 | `8000`                      |
 * | `STORAGE_BACKEND`             | `postgres` if `DATABASE_URL` is set, else `file` |
 * | `DATABASE_URL`                | unset                       |
 * | `BLOG_DATA_FILE`              | `blog_data.json`            |
 * | `JWT_SECRET`                  | development secret (warned) |
 * | `BCRYPT_COST`                 | `12`                        |
 * | `GEMINI_API_KEY`              | unset                       |
 * | `GEMINI_MODEL`                | `gemini-pro`                |
 * | `GEMINI_BASE_URL`             | Generative Language API     |
 * | `GENERATION_INITIAL_DELAY_MS` | `1000`                      |
 * | `GENERATION_MAX_DELAY_MS`     | `10000`                     |
 * | `GENERATION_DEADLINE_SECS`    | `60`                        |
 * | `CORS_ORIGINS`                | `["http://localhost:5173"]` |
 * | `EXPOSE_RESET_TOKENS`         | `false`                     |
 *
 * `EXPOSE_RESET_TOKENS=true` returns password reset tokens in the
 * forgot-password response. Only for local development without mail.
 */

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::backend::generation::gemini::{GeminiSettings, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::backend::generation::RetryPolicy;
use crate::backend::storage::StorageBackend;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DATA_FILE: &str = "blog_data.json";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

/// Used only when `JWT_SECRET` is unset
const DEVELOPMENT_JWT_SECRET: &str = "your-secret-key-change-in-production";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
    /// `None` when `GEMINI_API_KEY` is unset
    pub gemini: Option<GeminiSettings>,
    pub retry: RetryPolicy,
    pub cors_origins: Vec<String>,
    /// Return reset tokens over HTTP instead of only logging them
    pub expose_reset_tokens: bool,
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = get("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or("SERVER_PORT", get("SERVER_PORT"), DEFAULT_PORT)?;

        let database_url = get("DATABASE_URL");
        let storage = match get("STORAGE_BACKEND").map(|b| b.to_lowercase()).as_deref() {
            Some("postgres") | Some("postgresql") => match database_url {
                Some(url) => StorageBackend::Postgres { url },
                None => {
                    return Err(ConfigError::invalid(
                        "STORAGE_BACKEND",
                        "postgres",
                        "DATABASE_URL must be set",
                    ))
                }
            },
            Some("file") => StorageBackend::File {
                path: data_file(get("BLOG_DATA_FILE")),
            },
            Some(other) => {
                return Err(ConfigError::invalid(
                    "STORAGE_BACKEND",
                    other,
                    "expected 'file' or 'postgres'",
                ))
            }
            None => match database_url {
                Some(url) => StorageBackend::Postgres { url },
                None => StorageBackend::File {
                    path: data_file(get("BLOG_DATA_FILE")),
                },
            },
        };

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set, using an insecure development secret");
            DEVELOPMENT_JWT_SECRET.to_string()
        });

        let bcrypt_cost = parse_or("BCRYPT_COST", get("BCRYPT_COST"), bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::invalid(
                "BCRYPT_COST",
                &bcrypt_cost.to_string(),
                "must be between 4 and 31",
            ));
        }

        let gemini = get("GEMINI_API_KEY").map(|api_key| {
            let mut settings = GeminiSettings::new(api_key);
            settings.model = get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
            settings.base_url = get("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
            settings
        });
        if gemini.is_none() {
            tracing::warn!("GEMINI_API_KEY not set. Generation features will be disabled.");
        }

        let defaults = RetryPolicy::default();
        let retry = RetryPolicy {
            initial_delay: Duration::from_millis(parse_or(
                "GENERATION_INITIAL_DELAY_MS",
                get("GENERATION_INITIAL_DELAY_MS"),
                defaults.initial_delay.as_millis() as u64,
            )?),
            max_delay: Duration::from_millis(parse_or(
                "GENERATION_MAX_DELAY_MS",
                get("GENERATION_MAX_DELAY_MS"),
                defaults.max_delay.as_millis() as u64,
            )?),
            deadline: Duration::from_secs(parse_or(
                "GENERATION_DEADLINE_SECS",
                get("GENERATION_DEADLINE_SECS"),
                defaults.deadline.as_secs(),
            )?),
            ..defaults
        };

        let cors_origins = match get("CORS_ORIGINS") {
            Some(raw) => parse_origins(&raw)?,
            None => vec![DEFAULT_CORS_ORIGIN.to_string()],
        };

        let expose_reset_tokens =
            parse_or("EXPOSE_RESET_TOKENS", get("EXPOSE_RESET_TOKENS"), false)?;
        if expose_reset_tokens {
            tracing::warn!("EXPOSE_RESET_TOKENS is on; reset tokens are returned over HTTP");
        }

        Ok(Self {
            host,
            port,
            storage,
            jwt_secret,
            bcrypt_cost,
            gemini,
            retry,
            cors_origins,
            expose_reset_tokens,
        })
    }

    /// `host:port` for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn data_file(value: Option<String>) -> PathBuf {
    PathBuf::from(value.unwrap_or_else(|| DEFAULT_DATA_FILE.to_string()))
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(key, &raw, e.to_string())),
        None => Ok(default),
    }
}

/// Accepts a JSON array (`["a","b"]`) or a comma-separated list
fn parse_origins(raw: &str) -> Result<Vec<String>, ConfigError> {
    let origins: Vec<String> = if raw.starts_with('[') {
        serde_json::from_str::<Vec<String>>(raw)
            .map_err(|e| ConfigError::invalid("CORS_ORIGINS", raw, e.to_string()))?
    } else {
        raw.split(',').map(str::to_string).collect()
    };

    Ok(origins
        .into_iter()
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect())
}

/// Builder for assembling a `ServerConfig` in code
#[derive(Debug, Clone)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl Default for ServerConfigBuilder {
    fn default() -> Self {
        Self {
            config: ServerConfig {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
                storage: StorageBackend::File {
                    path: PathBuf::from(DEFAULT_DATA_FILE),
                },
                jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
                bcrypt_cost: bcrypt::DEFAULT_COST,
                gemini: None,
                retry: RetryPolicy::default(),
                cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
                expose_reset_tokens: false,
            },
        }
    }
}

impl ServerConfigBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn storage(mut self, storage: StorageBackend) -> Self {
        self.config.storage = storage;
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.jwt_secret = secret.into();
        self
    }

    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.config.bcrypt_cost = cost;
        self
    }

    pub fn gemini(mut self, settings: GeminiSettings) -> Self {
        self.config.gemini = Some(settings);
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    pub fn cors_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.cors_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    pub fn expose_reset_tokens(mut self, expose: bool) -> Self {
        self.config.expose_reset_tokens = expose;
        self
    }

    pub fn build(self) -> ServerConfig {
        self.config
    }
}
