use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

const DEFAULT_ENV_FILE: &str = ".env";
const ENV_FILE_VAR: &str = "BOOKSHELF_ENV_FILE";
const APP_PREFIX: &str = "BOOKSHELF";
const DB_PREFIX: &str = "DB";

/// Environment variables as handed to the configuration layer. `None` reads
/// the process environment.
pub type EnvSource = Option<config::Map<String, String>>;

/// Errors raised while assembling [`Settings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load environment file '{}'", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("failed to read configuration")]
    Config(#[from] config::ConfigError),

    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("DB_PORT must be a port number, got '{0}'")]
    InvalidPort(String),
}

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

/// Top-level configuration assembled from the `.env` file and the environment.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub environment: Environment,
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub telemetry: TelemetrySettings,
}

/// `BOOKSHELF_*` variables; nested keys use `__`.
#[derive(Debug, Deserialize)]
struct AppLayer {
    #[serde(default)]
    environment: Environment,
    #[serde(default)]
    server: ServerSettings,
    #[serde(default)]
    database: PoolSettings,
    #[serde(default)]
    telemetry: TelemetrySettings,
}

/// `DB_*` variables exactly as found. Validated into [`DatabaseSettings`].
#[derive(Debug, Default, Deserialize)]
struct RawDatabaseSettings {
    host: Option<String>,
    port: Option<String>,
    user: Option<String>,
    pass: Option<String>,
    name: Option<String>,
    sslmode: Option<String>,
}

impl Settings {
    /// Load the `.env` file (mandatory) and build settings from the process
    /// environment.
    pub fn load() -> Result<Self, SettingsError> {
        let path = std::env::var(ENV_FILE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_ENV_FILE));

        dotenvy::from_path(&path).map_err(|source| SettingsError::EnvFile {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "environment file loaded");

        Self::from_env(None)
    }

    /// Build settings from `vars`, or from the process environment when `None`.
    pub fn from_env(vars: EnvSource) -> Result<Self, SettingsError> {
        let app: AppLayer = config::Config::builder()
            .add_source(
                config::Environment::with_prefix(APP_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(vars.clone()),
            )
            .build()?
            .try_deserialize()?;

        let raw: RawDatabaseSettings = config::Config::builder()
            .add_source(
                config::Environment::with_prefix(DB_PREFIX)
                    .prefix_separator("_")
                    .source(vars),
            )
            .build()?
            .try_deserialize()?;

        Ok(Self {
            environment: app.environment,
            server: app.server,
            database: raw.validate(app.database)?,
            telemetry: app.telemetry,
        })
    }
}

impl RawDatabaseSettings {
    fn validate(self, pool: PoolSettings) -> Result<DatabaseSettings, SettingsError> {
        let port = required(self.port, "DB_PORT")?;
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| SettingsError::InvalidPort(port))?;

        Ok(DatabaseSettings {
            host: required(self.host, "DB_HOST")?,
            port,
            user: required(self.user, "DB_USER")?,
            password: required(self.pass, "DB_PASS")?,
            name: required(self.name, "DB_NAME")?,
            sslmode: required(self.sslmode, "DB_SSLMODE")?,
            pool,
        })
    }
}

fn required(value: Option<String>, var: &'static str) -> Result<String, SettingsError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(SettingsError::Missing(var)),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
        }
    }
}

/// Connection parameters for the relational store. Every field except `pool`
/// is required at load time.
#[derive(Clone)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub sslmode: String,
    pub pool: PoolSettings,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            name: "bookshelf".to_string(),
            sslmode: "disable".to_string(),
            pool: PoolSettings::default(),
        }
    }
}

impl fmt::Display for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "postgres://{}:***@{}:{}/{}?sslmode={}",
            self.user, self.host, self.port, self.name, self.sslmode
        )
    }
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("name", &self.name)
            .field("sslmode", &self.sslmode)
            .field("pool", &self.pool)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolSettings {
    #[serde(default = "PoolSettings::default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "PoolSettings::default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl PoolSettings {
    fn default_max_connections() -> u32 {
        10
    }

    fn default_connect_timeout_secs() -> u64 {
        5
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: Self::default_max_connections(),
            connect_timeout_secs: Self::default_connect_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default = "TelemetrySettings::default_filter")]
    pub filter: String,
}

impl TelemetrySettings {
    fn default_filter() -> String {
        "info,sqlx=warn".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            filter: Self::default_filter(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}
