//! Configuration for the jsondb client
//!
//! Centralized configuration with sensible defaults. A `Config` is built once
//! (by hand, from a `.env.<environment>` file, or from process environment
//! variables) and handed to `Client::new`; nothing is cached process-wide.
//!
//! ## Recognized keys
//! - `HOST`             server host (default `localhost`)
//! - `PORT`             server port (default `5555`)
//! - `SERVER_PASSWORD`  password for the AUTH handshake (optional)
//! - `TIMEOUT_MS`       connect/read/write timeout (default `5000`)
//! - `ENVIRONMENT`      `development` | `production` | `testing`

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ClientError, Result};

/// Directory that holds the `.env.<environment>` files
pub const ENV_DIR: &str = "jsondb";

/// Smallest timeout applied to any socket operation (milliseconds)
pub const MIN_TIMEOUT_MS: u64 = 100;

/// Main configuration for a client
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Server Address
    // -------------------------------------------------------------------------
    /// Server host name or IP
    pub host: String,

    /// Server TCP port
    pub port: u16,

    // -------------------------------------------------------------------------
    // Authentication
    // -------------------------------------------------------------------------
    /// Password sent when the server asks for `AUTH`, quotes already stripped
    pub password: Option<String>,

    // -------------------------------------------------------------------------
    // Timeouts
    // -------------------------------------------------------------------------
    /// TCP connect timeout (milliseconds, raised to `MIN_TIMEOUT_MS`)
    pub connect_timeout_ms: u64,

    /// Socket read timeout (milliseconds, raised to `MIN_TIMEOUT_MS`)
    pub read_timeout_ms: u64,

    /// Socket write timeout (milliseconds, raised to `MIN_TIMEOUT_MS`)
    pub write_timeout_ms: u64,

    /// Which `.env.<environment>` file this config came from
    pub environment: Environment,
}

/// Deployment environment, selects the env file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Testing => "testing",
        }
    }

    /// e.g. `.env.development`
    pub fn env_file_name(&self) -> String {
        format!(".env.{}", self.as_str())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "testing" | "test" => Ok(Environment::Testing),
            other => Err(ClientError::Config(format!("unknown environment: {}", other))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5555,
            password: None,
            connect_timeout_ms: 5000,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
            environment: Environment::Development,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// `host:port`
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The configured password with surrounding quotes stripped, if non-empty
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().map(strip_quotes).filter(|p| !p.is_empty())
    }

    pub fn connect_timeout(&self) -> Duration {
        bounded(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        bounded(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        bounded(self.write_timeout_ms)
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Load a config from a dotenv-style file, starting from the defaults
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;

        let mut config = Config::default();
        config.apply(parse_env(&contents)?)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Walk upward from `start_dir` looking for `jsondb/.env.<environment>`
    pub fn find_env_file(environment: Environment, start_dir: impl AsRef<Path>) -> Option<PathBuf> {
        let file_name = environment.env_file_name();
        start_dir
            .as_ref()
            .ancestors()
            .map(|dir| dir.join(ENV_DIR).join(&file_name))
            .find(|candidate| candidate.is_file())
    }

    /// Locate and load the env file for `environment`
    pub fn discover(environment: Environment, start_dir: impl AsRef<Path>) -> Result<Self> {
        let start_dir = start_dir.as_ref();
        let path = Self::find_env_file(environment, start_dir).ok_or_else(|| {
            ClientError::Config(format!(
                "Environment file not found for {} (searched upward from {})",
                environment,
                start_dir.display()
            ))
        })?;

        let mut config = Self::from_env_file(&path)?;
        config.environment = environment;
        Ok(config)
    }

    /// Apply process environment variables on top of this config
    pub fn with_env_overrides(mut self) -> Result<Self> {
        let vars = ["HOST", "PORT", "SERVER_PASSWORD", "TIMEOUT_MS", "ENVIRONMENT"]
            .iter()
            .filter_map(|key| std::env::var(key).ok().map(|value| (key.to_string(), value)));
        self.apply(vars)?;
        Ok(self)
    }

    fn apply(&mut self, vars: impl IntoIterator<Item = (String, String)>) -> Result<()> {
        for (key, value) in vars {
            let value = strip_quotes(&value);
            match key.as_str() {
                "HOST" => self.host = value.to_string(),
                "PORT" => {
                    self.port = value
                        .parse()
                        .map_err(|_| ClientError::Config(format!("invalid PORT: {}", value)))?;
                }
                "SERVER_PASSWORD" => {
                    self.password = Some(value.to_string()).filter(|p| !p.is_empty());
                }
                "TIMEOUT_MS" => {
                    let ms: u64 = value
                        .parse()
                        .ok()
                        .filter(|ms| *ms > 0)
                        .ok_or_else(|| ClientError::Config(format!("invalid TIMEOUT_MS: {}", value)))?;
                    self.connect_timeout_ms = ms;
                    self.read_timeout_ms = ms;
                    self.write_timeout_ms = ms;
                }
                "ENVIRONMENT" => self.environment = value.parse()?,
                // Server-side settings share the same file
                _ => tracing::trace!("Ignoring configuration key {}", key),
            }
        }
        Ok(())
    }
}

/// Every socket operation gets a finite, non-zero bound
fn bounded(ms: u64) -> Duration {
    Duration::from_millis(ms.max(MIN_TIMEOUT_MS))
}

/// Remove surrounding whitespace and single/double quotes
pub fn strip_quotes(value: &str) -> &str {
    value.trim().trim_matches(|c| c == '\'' || c == '"')
}

/// Parse dotenv-style `KEY=VALUE` lines
///
/// Blank lines and `#` comments are skipped, an `export ` prefix is allowed,
/// and everything after the first `=` is the value.
pub fn parse_env(contents: &str) -> Result<Vec<(String, String)>> {
    let mut vars = Vec::new();
    for (idx, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let (key, value) = line.split_once('=').ok_or_else(|| {
            ClientError::Config(format!("line {}: expected KEY=VALUE", idx + 1))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ClientError::Config(format!("line {}: empty key", idx + 1)));
        }
        vars.push((key.to_string(), strip_quotes(value).to_string()));
    }
    Ok(vars)
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the AUTH password; surrounding quotes are stripped
    pub fn password(mut self, password: impl AsRef<str>) -> Self {
        self.config.password = Some(strip_quotes(password.as_ref()).to_string()).filter(|p| !p.is_empty());
        self
    }

    /// Set connect, read and write timeouts at once (in milliseconds)
    ///
    /// Values below [`MIN_TIMEOUT_MS`], including `0`, are raised to it.
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self.config.read_timeout_ms = ms;
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.config.environment = environment;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
