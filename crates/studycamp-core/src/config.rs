//! Configuration management for the StudyCamp API
//!
//! Sources, highest priority first:
//! - Legacy deployment variables: `PORT`, `DB_USER`, `DB_PASS`, `ACCESS_TOKEN_SECRET`
//! - Prefixed environment variables, e.g. `STUDYCAMP__DATABASE__BACKEND=memory`
//! - Config file named by `STUDYCAMP_CONFIG`, then `./config/studycamp.*`
//! - Hardcoded defaults
//!
//! Missing credentials or signing secret are not rejected here; the store
//! connection or token signing fails on first use instead.

use config::{Config, ConfigBuilder, ConfigError, Environment, File, Map};
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StudyCampConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StudyCampConfig {
    /// Load configuration from the process environment and config files.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(std::env::vars().collect())
    }

    /// Load configuration using `vars` in place of the process environment.
    pub fn load_from(vars: Map<String, String>) -> Result<Self, ConfigError> {
        let mut builder = Self::set_defaults(Config::builder())?;

        if let Some(config_path) = vars.get("STUDYCAMP_CONFIG") {
            builder = builder.add_source(File::with_name(config_path).required(false));
        }

        builder = builder
            .add_source(File::with_name("./config/studycamp").required(false))
            .add_source(
                Environment::with_prefix("STUDYCAMP")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars.clone())),
            );

        let port = match vars.get("PORT") {
            Some(raw) => Some(raw.trim().parse::<i64>().map_err(|e| {
                ConfigError::Message(format!("PORT must be a port number, got '{raw}': {e}"))
            })?),
            None => None,
        };

        builder = builder
            .set_override_option("server.port", port)?
            .set_override_option("database.user", vars.get("DB_USER").cloned())?
            .set_override_option("database.password", vars.get("DB_PASS").cloned())?
            .set_override_option(
                "auth.access_token_secret",
                vars.get("ACCESS_TOKEN_SECRET").cloned(),
            )?;

        let config: StudyCampConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn set_defaults(
        builder: ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        builder
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .set_default("database.backend", "mongo")?
            .set_default("database.cluster", default_cluster())?
            .set_default("database.name", default_database_name())?
            .set_default("auth.token_ttl_hours", default_token_ttl_hours())?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.token_ttl_hours <= 0 {
            return Err(ConfigError::Message(
                "auth.token_ttl_hours must be > 0".to_string(),
            ));
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::Message(format!(
                "logging.format must be 'pretty' or 'json', got '{}'",
                self.logging.format
            )));
        }

        if self.database.backend == StoreBackend::Mongo && self.database.name.is_empty() {
            return Err(ConfigError::Message(
                "database.name must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Socket address string the HTTP server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Bind host (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port (default: 5000)
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Which document store implementation backs the API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Mongo,
    Memory,
}

/// Document database configuration
#[derive(Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Full connection string; takes precedence over the fields below
    #[serde(default)]
    pub uri: Option<String>,

    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Atlas cluster host
    #[serde(default = "default_cluster")]
    pub cluster: String,

    /// Database holding the StudyCamp collections (default: "studyCamp")
    #[serde(default = "default_database_name")]
    pub name: String,
}

impl DatabaseConfig {
    /// Connection string for the MongoDB driver.
    pub fn connection_uri(&self) -> String {
        if let Some(uri) = &self.uri {
            return uri.clone();
        }

        match (&self.user, &self.password) {
            (Some(user), Some(password)) => format!(
                "mongodb+srv://{user}:{password}@{}/?retryWrites=true&w=majority",
                self.cluster
            ),
            _ => format!(
                "mongodb+srv://{}/?retryWrites=true&w=majority",
                self.cluster
            ),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            uri: None,
            user: None,
            password: None,
            cluster: default_cluster(),
            name: default_database_name(),
        }
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("backend", &self.backend)
            .field("uri", &self.uri.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("cluster", &self.cluster)
            .field("name", &self.name)
            .finish()
    }
}

/// Session token configuration
#[derive(Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign and verify session tokens
    #[serde(default)]
    pub access_token_secret: Option<String>,

    /// Token lifetime in hours (default: 24)
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_secret: None,
            token_ttl_hours: default_token_ttl_hours(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field(
                "access_token_secret",
                &self.access_token_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("token_ttl_hours", &self.token_ttl_hours)
            .finish()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is unset (default: "info")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty (default: "pretty")
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_cluster() -> String {
    "cluster0.vweq3se.mongodb.net".to_string()
}

fn default_database_name() -> String {
    "studyCamp".to_string()
}

fn default_token_ttl_hours() -> i64 {
    24
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
