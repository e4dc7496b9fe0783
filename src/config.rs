//! Application configuration loaded from environment variables
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `JWT_SECRET`: token signing secret, at least 32 characters (required)
//! - `HOST`: bind host (default `0.0.0.0`)
//! - `PORT`: bind port (default `3000`)
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default `5`)
//! - `CLOUDINARY_CLOUD_NAME`, `CLOUDINARY_API_KEY`, `CLOUDINARY_API_SECRET`:
//!   image host credentials, all or none
//! - `UPLOAD_TIMEOUT_SECS`: image upload timeout (default `30`)

use std::{collections::HashMap, time::Duration};

use thiserror::Error;

/// Minimum accepted signing secret length
pub const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("JWT_SECRET must be at least 32 characters long")]
    WeakSecret,

    #[error("CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET must be set together")]
    PartialCloudinary,
}

/// Cloudinary credentials
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub cloudinary: Option<CloudinaryConfig>,
    pub upload_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from the process environment (and `.env`, if present)
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_vars(std::env::vars().collect())
    }

    /// Build configuration from an explicit variable map
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |name: &str| vars.get(name).filter(|v| !v.is_empty()).cloned();

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::WeakSecret);
        }

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&vars, "PORT", 3000u16)?;
        let database_max_connections = parse_or(&vars, "DATABASE_MAX_CONNECTIONS", 5u32)?;
        let upload_timeout_secs = parse_or(&vars, "UPLOAD_TIMEOUT_SECS", 30u64)?;

        let cloudinary = match (
            get("CLOUDINARY_CLOUD_NAME"),
            get("CLOUDINARY_API_KEY"),
            get("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
            }),
            (None, None, None) => None,
            _ => return Err(ConfigError::PartialCloudinary),
        };

        Ok(Self {
            host,
            port,
            database_url,
            database_max_connections,
            jwt_secret,
            cloudinary,
            upload_timeout: Duration::from_secs(upload_timeout_secs),
        })
    }

    /// Address to bind the HTTP listener to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(
    vars: &HashMap<String, String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match vars.get(name).filter(|v| !v.is_empty()) {
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
            name,
            value: value.clone(),
        }),
        None => Ok(default),
    }
}
