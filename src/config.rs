use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid {key} value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_name: String,
    pub recipes_collection: String,
    pub users_collection: String,
    pub blob_container_url: String,
    pub jwt: JwtConfig,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

impl Config {
    /// Reads the service configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default = |key: &str, default: &str| {
            lookup(key).unwrap_or_else(|| {
                log::debug!("{} not set, using default: {}", key, default);
                default.to_string()
            })
        };
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let port_raw = or_default("PORT", "5000");
        let port = port_raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
            key: "PORT",
            value: port_raw.clone(),
        })?;

        Ok(Self {
            host: or_default("HOST", "0.0.0.0"),
            port,
            database_url: required("DATABASE_URL")?,
            database_name: or_default("DATABASE_NAME", "CulinaryDB"),
            recipes_collection: or_default("RECIPES_COLLECTION", "Recipes"),
            users_collection: or_default("USERS_COLLECTION", "Users"),
            blob_container_url: required("BLOB_CONTAINER_URL")?,
            jwt: JwtConfig {
                secret: or_default("JWT_SECRET", "default-secret-change-me"),
                issuer: or_default("JWT_ISSUER", "recipe-service"),
                audience: or_default("JWT_AUDIENCE", "recipe-api"),
            },
        })
    }
}
