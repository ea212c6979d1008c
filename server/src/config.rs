//! Process configuration read from the environment.
//!
//! # Design
//! `Config::load` reads an optional `.env` file and then the process
//! environment. All parsing goes through `Config::from_lookup`, which takes a
//! lookup closure, so tests never touch the real environment.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use axum::http::HeaderValue;
use thiserror::Error;
use todo_core::mongo::{DEFAULT_COLLECTION, DEFAULT_DATABASE};

use crate::{Frontend, UpdateMode};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_STATIC_DIR: &str = "./client/dist";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
/// Used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {var}={value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to read env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
}

/// Deployment environment, selected by `ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Only the exact value `production` selects production.
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some("production") => Self::Production,
            _ => Self::Development,
        }
    }
}

impl FromStr for UpdateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "force-complete" => Ok(Self::ForceComplete),
            "apply" => Ok(Self::ApplyBody),
            other => Err(format!(
                "expected `force-complete` or `apply`, got `{other}`"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub json: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mongo_uri: String,
    pub database: String,
    pub collection: String,
    pub port: u16,
    pub environment: Environment,
    pub static_dir: PathBuf,
    pub cors_origin: HeaderValue,
    pub update_mode: UpdateMode,
    pub log: LogConfig,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(err) if err.not_found() => {}
            Err(err) => return Err(err.into()),
        }
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mongo_uri = lookup("MONGO_DB_URI")
            .filter(|uri| !uri.is_empty())
            .ok_or(ConfigError::Missing("MONGO_DB_URI"))?;

        let port = match lookup("PORT").filter(|p| !p.is_empty()) {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: "PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let cors_origin = lookup("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());
        let cors_origin =
            HeaderValue::from_str(&cors_origin).map_err(|e| ConfigError::Invalid {
                var: "CORS_ORIGIN",
                value: cors_origin.clone(),
                reason: e.to_string(),
            })?;

        let update_mode = match lookup("UPDATE_MODE") {
            Some(raw) => raw.parse::<UpdateMode>().map_err(|reason| ConfigError::Invalid {
                var: "UPDATE_MODE",
                value: raw.clone(),
                reason,
            })?,
            None => UpdateMode::default(),
        };

        let json = match lookup("LOG_FORMAT").as_deref() {
            None | Some("text") => false,
            Some("json") => true,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "LOG_FORMAT",
                    value: other.to_string(),
                    reason: "expected `text` or `json`".to_string(),
                })
            }
        };

        Ok(Self {
            mongo_uri,
            database: lookup("MONGO_DB_NAME").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            collection: lookup("MONGO_COLLECTION")
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            port,
            environment: Environment::from_value(lookup("ENV").as_deref()),
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            cors_origin,
            update_mode,
            log: LogConfig { json },
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }

    /// Static bundle in production, single-origin CORS otherwise.
    pub fn frontend(&self) -> Frontend {
        match self.environment {
            Environment::Production => Frontend::Static {
                dir: self.static_dir.clone(),
            },
            Environment::Development => Frontend::Cors {
                origin: self.cors_origin.clone(),
            },
        }
    }
}
