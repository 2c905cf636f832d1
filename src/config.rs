use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::{env, io};

use thiserror::Error;

use crate::directive::DirectiveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),

    #[error("invalid configuration: {0}")]
    Invalid(&'static str),

    #[error("token is empty")]
    EmptyToken,

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Directive(#[from] DirectiveError),
}

/// Where the expected token comes from.
#[derive(Debug, Clone)]
pub enum TokenSource {
    /// Path of a file holding an `apipass` directive block.
    DirectiveFile(PathBuf),
    /// Raw token value, placeholders not yet resolved.
    Value(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub token_source: TokenSource,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = env::var("APIPASS_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("APIPASS_PORT"))?;

        let app_env = AppEnv::from_env();

        // APIPASS_CONFIG (a directive file) takes precedence over APIPASS_TOKEN.
        let token_source = if let Ok(path) = env::var("APIPASS_CONFIG") {
            TokenSource::DirectiveFile(PathBuf::from(path))
        } else if let Ok(token) = env::var("APIPASS_TOKEN") {
            TokenSource::Value(token)
        } else {
            return Err(ConfigError::Missing("APIPASS_CONFIG or APIPASS_TOKEN"));
        };

        Ok(Config {
            addr,
            app_env,
            token_source,
        })
    }
}
