use std::net::{IpAddr, SocketAddr};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
///
/// | Env Var        | Default                 |
/// |----------------|-------------------------|
/// | `DATABASE_URL` | required                |
/// | `HOST`         | `0.0.0.0`               |
/// | `PORT`         | `3001`                  |
/// | `API_PREFIX`   | `api`                   |
/// | `CORS_ORIGIN`  | `http://localhost:3000` |
/// | `APP_ENV`      | `development`           |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    /// Path segment every route is nested under, without slashes.
    pub api_prefix: String,
    pub cors_origin: String,
    pub environment: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            host: IpAddr::from([0, 0, 0, 0]),
            port: 3001,
            api_prefix: "api".to_string(),
            cors_origin: "http://localhost:3000".to_string(),
            environment: "development".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let defaults = Self::default();

        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let host = match lookup("HOST") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "HOST", value })?,
            None => defaults.host,
        };

        let port = match lookup("PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value })?,
            None => defaults.port,
        };

        let api_prefix = lookup("API_PREFIX")
            .map(|p| p.trim_matches('/').to_string())
            .unwrap_or(defaults.api_prefix);

        Ok(Self {
            database_url,
            host,
            port,
            api_prefix,
            cors_origin: lookup("CORS_ORIGIN").unwrap_or(defaults.cors_origin),
            environment: lookup("APP_ENV").unwrap_or(defaults.environment),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// `/api`, or an empty string when no prefix is configured.
    pub fn route_prefix(&self) -> String {
        if self.api_prefix.is_empty() {
            String::new()
        } else {
            format!("/{}", self.api_prefix)
        }
    }
}
