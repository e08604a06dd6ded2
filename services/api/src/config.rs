//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub admin_password: String,
    pub database_url: Option<String>,
    pub data_file: PathBuf,
    pub static_dir: PathBuf,
    pub mail_from: String,
    pub mail_api_url: String,
    pub mail_api_token: Option<String>,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let admin_password = std::env::var("ADMIN_PASSWORD")
            .map_err(|_| ConfigError::MissingVar("ADMIN_PASSWORD".to_string()))?;

        // --- Storage Backend (Postgres when DATABASE_URL is set, JSON file otherwise) ---
        let database_url = std::env::var("DATABASE_URL").ok();
        let data_file = std::env::var("DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data.json"));

        let static_dir = std::env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./web"));

        // --- Outbound Mail (HTTP provider when MAIL_API_TOKEN is set, SMTP otherwise) ---
        let mail_from = std::env::var("MAIL_FROM")
            .unwrap_or_else(|_| "Daily Reflections <no-reply@localhost>".to_string());
        let mail_api_url = std::env::var("MAIL_API_URL")
            .unwrap_or_else(|_| "https://api.postmarkapp.com".to_string());
        let mail_api_token = std::env::var("MAIL_API_TOKEN").ok();

        let smtp_host = std::env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string());
        let smtp_port = match std::env::var("SMTP_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| {
                ConfigError::InvalidValue(
                    "SMTP_PORT".to_string(),
                    format!("'{}' is not a valid port number", raw),
                )
            })?,
            Err(_) => 587,
        };
        let smtp_username = std::env::var("SMTP_USERNAME").ok();
        let smtp_password = std::env::var("SMTP_PASSWORD").ok();

        Ok(Self {
            bind_address,
            log_level,
            admin_password,
            database_url,
            data_file,
            static_dir,
            mail_from,
            mail_api_url,
            mail_api_token,
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
        })
    }
}
