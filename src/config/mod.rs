use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Placeholder secret shipped in `.env` templates. Only tolerated locally.
pub const DEFAULT_SECRET_KEY: &str = "changethis";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("The value of {0} is \"changethis\", change it before deploying")]
    InsecureDefault(&'static str),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Local,
    Staging,
    Production,
}

impl Environment {
    pub fn is_local(self) -> bool {
        matches!(self, Environment::Local)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Prefix every resource router is nested under
    pub prefix: String,
    pub default_page_limit: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub secret_key: String,
    pub access_token_expire_minutes: i64,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup so tests never
    /// have to mutate the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Local,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Local => Self::local(),
        }
        .with_overrides(lookup)
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        // Server overrides
        if let Some(v) = lookup("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("BUDGET_API_PORT").or_else(|| lookup("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // API overrides
        if let Some(v) = lookup("API_V1_STR") {
            self.api.prefix = v;
        }
        if let Some(v) = lookup("API_DEFAULT_PAGE_LIMIT") {
            self.api.default_page_limit = v.parse().unwrap_or(self.api.default_page_limit);
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Some(v) = lookup("DATABASE_RUN_MIGRATIONS") {
            self.database.run_migrations = v.parse().unwrap_or(self.database.run_migrations);
        }

        // Security overrides
        if let Some(v) = lookup("SECRET_KEY") {
            self.security.secret_key = v;
        }
        if let Some(v) = lookup("ACCESS_TOKEN_EXPIRE_MINUTES") {
            self.security.access_token_expire_minutes =
                v.parse().unwrap_or(self.security.access_token_expire_minutes);
        }
        if let Some(v) = lookup("BACKEND_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self
    }

    /// Rejects settings that must never reach a deployed environment.
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.security.secret_key.is_empty() {
            return Err(ConfigError::Missing("SECRET_KEY"));
        }
        if self.security.secret_key == DEFAULT_SECRET_KEY {
            if self.environment.is_local() {
                tracing::warn!("SECRET_KEY is \"changethis\", acceptable for local development only");
            } else {
                return Err(ConfigError::InsecureDefault("SECRET_KEY"));
            }
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn local() -> Self {
        Self {
            environment: Environment::Local,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            api: ApiConfig {
                prefix: "/api/v1".to_string(),
                default_page_limit: 100,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
                run_migrations: true,
            },
            security: SecurityConfig {
                secret_key: DEFAULT_SECRET_KEY.to_string(),
                access_token_expire_minutes: 60 * 24 * 8, // 8 days
                cors_origins: vec!["http://localhost:5173".to_string()],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
                ..Self::local().database
            },
            security: SecurityConfig {
                secret_key: String::new(),
                access_token_expire_minutes: 60 * 24,
                cors_origins: Vec::new(),
            },
            ..Self::local()
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
                ..Self::local().database
            },
            security: SecurityConfig {
                secret_key: String::new(),
                access_token_expire_minutes: 60 * 4,
                cors_origins: Vec::new(),
            },
            ..Self::local()
        }
    }
}
