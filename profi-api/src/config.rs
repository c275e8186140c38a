/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: SQLite connection string (required)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 5)
/// - `GROQ_API_KEY`: Upstream chat key; without it the mock provider serves
/// - `GROQ_MODEL`: Chat model override (default: llama3-70b-8192)
/// - `CHAT_TIMEOUT_SECONDS`: Per-request chat deadline (default: 60)
/// - `OPENWEATHER_API_KEY`: Weather lookup key (optional)
/// - `PROFI_BOOTSTRAP_ADMIN`: Username granted admin at startup (optional)
/// - `RUST_LOG`: Log level (default: info)
///
/// # Example
///
/// ```no_run
/// use profi_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}:{}", config.api.host, config.api.port);
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Chat provider configuration
    pub chat: ChatConfig,

    /// Weather lookup configuration
    pub weather: WeatherConfig,

    /// Username granted admin rights at startup, if set
    pub bootstrap_admin: Option<String>,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Chat provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Groq API key; `None` selects the mock provider
    pub groq_api_key: Option<String>,

    /// Model identifier
    pub model: String,

    /// Per-request deadline in seconds; the stream is cancelled when it
    /// elapses
    pub timeout_seconds: u64,
}

/// Weather lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeather API key; lookups degrade to a placeholder without it
    pub api_key: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `DATABASE_URL` is missing
    /// - Numeric variables have invalid values
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()?;

        let groq_api_key = env::var("GROQ_API_KEY").ok().filter(|k| !k.is_empty());
        let model = env::var("GROQ_MODEL").unwrap_or_else(|_| "llama3-70b-8192".to_string());
        let timeout_seconds = env::var("CHAT_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()?;

        let weather_api_key = env::var("OPENWEATHER_API_KEY").ok().filter(|k| !k.is_empty());

        let bootstrap_admin = env::var("PROFI_BOOTSTRAP_ADMIN").ok().filter(|u| !u.is_empty());

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            chat: ChatConfig {
                groq_api_key,
                model,
                timeout_seconds,
            },
            weather: WeatherConfig {
                api_key: weather_api_key,
            },
            bootstrap_admin,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 5,
            },
            chat: ChatConfig {
                groq_api_key: None,
                model: "llama3-70b-8192".to_string(),
                timeout_seconds: 60,
            },
            weather: WeatherConfig { api_key: None },
            bootstrap_admin: None,
        }
    }

    #[test]
    fn test_bind_address() {
        let config = test_config();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }
}
