//! Configuration management for the catalog server.

use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,
    #[serde(default = "default_pool_timeout")]
    pub pool_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret for bearer tokens.
    #[serde(default = "default_token_secret")]
    pub token_secret: String,
    /// Access token lifetime in minutes.
    #[serde(default = "default_token_expire_minutes")]
    pub token_expire_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_database_url() -> String {
    "sqlite://libris.db".to_string()
}

fn default_pool_max_size() -> u32 {
    5
}

fn default_pool_timeout() -> u64 {
    30
}

fn default_token_secret() -> String {
    // Dev-only fallback; override via LIBRIS__AUTH__TOKEN_SECRET in any
    // real deployment.
    "insecure-dev-secret".to_string()
}

fn default_token_expire_minutes() -> i64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from defaults, an optional `config` file and
    /// `LIBRIS__*` environment variables.
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .set_default("database.url", default_database_url())?
            .set_default("database.pool_max_size", default_pool_max_size())?
            .set_default("database.pool_timeout_seconds", default_pool_timeout())?
            .set_default("auth.token_secret", default_token_secret())?
            .set_default("auth.token_expire_minutes", default_token_expire_minutes())?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.json", false)?
            // Add config file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables, double underscore maps to
            // nested keys: LIBRIS__DATABASE__URL -> config.database.url
            .add_source(
                config::Environment::with_prefix("LIBRIS")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: Self = config.try_deserialize()?;

        // Convenience escape hatch: DATABASE_URL sets `database.url` when no
        // explicit LIBRIS__DATABASE__URL override is present.
        if std::env::var("LIBRIS__DATABASE__URL").is_err() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                config.database.url = url;
            }
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        Ok(addr.parse()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.database.url.is_empty() {
            return Err("database.url must not be empty".to_string());
        }
        if self.database.pool_max_size == 0 {
            return Err("database.pool_max_size must be > 0".to_string());
        }
        if self.auth.token_secret.is_empty() {
            return Err("auth.token_secret must not be empty".to_string());
        }
        if self.auth.token_expire_minutes <= 0 {
            return Err("auth.token_expire_minutes must be > 0".to_string());
        }
        Ok(())
    }
}
