use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use url::Url;

const DEFAULT_RECORD_STORE_URL: &str = "https://api.airtable.com";
const DEFAULT_VENUE_TABLE: &str = "Venues";
const DEFAULT_WORKER_TABLE: &str = "Workers";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub record_store: RecordStoreConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            record_store: RecordStoreConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Connection settings for the external record store.
///
/// Credentials are optional here: a service without them still starts and
/// reports a configuration failure per submission.
#[derive(Clone)]
pub struct RecordStoreConfig {
    pub api_key: Option<String>,
    pub base_id: Option<String>,
    pub api_url: Url,
    pub venue_table: String,
    pub worker_table: String,
    pub timeout: Duration,
}

impl RecordStoreConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw_url =
            env::var("AIRTABLE_API_URL").unwrap_or_else(|_| DEFAULT_RECORD_STORE_URL.to_string());
        let api_url = parse_api_url(raw_url.trim())?;

        let timeout_secs = match non_empty_var("AIRTABLE_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout)?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key: non_empty_var("AIRTABLE_API_KEY"),
            base_id: non_empty_var("AIRTABLE_BASE_ID"),
            api_url,
            venue_table: non_empty_var("AIRTABLE_VENUE_TABLE")
                .unwrap_or_else(|| DEFAULT_VENUE_TABLE.to_string()),
            worker_table: non_empty_var("AIRTABLE_WORKER_TABLE")
                .unwrap_or_else(|| DEFAULT_WORKER_TABLE.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Configuration pointing at an arbitrary API root, used by tests and local mocks.
    pub fn with_api_url(api_url: Url) -> Self {
        Self {
            api_key: None,
            base_id: None,
            api_url,
            venue_table: DEFAULT_VENUE_TABLE.to_string(),
            worker_table: DEFAULT_WORKER_TABLE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_credentials(mut self, api_key: &str, base_id: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self.base_id = Some(base_id.to_string());
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some() && self.base_id.is_some()
    }
}

impl fmt::Debug for RecordStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStoreConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_id", &self.base_id)
            .field("api_url", &self.api_url.as_str())
            .field("venue_table", &self.venue_table)
            .field("worker_table", &self.worker_table)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// The record store is only reachable over http(s) and table paths are
/// appended to the URL, so it must be able to act as a base.
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|source| ConfigError::InvalidRecordStoreUrl { source })?;
    match url.scheme() {
        "http" | "https" if !url.cannot_be_a_base() => Ok(url),
        scheme => Err(ConfigError::UnsupportedRecordStoreScheme {
            scheme: scheme.to_string(),
        }),
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidRecordStoreUrl { source: url::ParseError },
    UnsupportedRecordStoreScheme { scheme: String },
    InvalidTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidRecordStoreUrl { .. } => {
                write!(f, "AIRTABLE_API_URL must be an absolute URL")
            }
            ConfigError::UnsupportedRecordStoreScheme { scheme } => {
                write!(f, "AIRTABLE_API_URL must use http or https, got '{scheme}'")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "AIRTABLE_TIMEOUT_SECS must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidTimeout
            | ConfigError::UnsupportedRecordStoreScheme { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidRecordStoreUrl { source } => Some(source),
        }
    }
}
