use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "tollgate.toml",
    "config/tollgate.toml",
    "crates/config/tollgate.toml",
    "../tollgate.toml",
    "../config/tollgate.toml",
    "../crates/config/tollgate.toml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Reject settings the service cannot run with.
    ///
    /// ```
    /// use tollgate_config::AppConfig;
    ///
    /// let mut config = AppConfig::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.auth.signing_key.clear();
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.auth.signing_key.is_empty() {
            bail!("auth.signing_key must not be empty");
        }
        if self.auth.hash_salt.is_empty() {
            bail!("auth.hash_salt must not be empty");
        }
        if self.auth.token_ttl_seconds == 0 {
            bail!("auth.token_ttl_seconds must be greater than zero");
        }
        if self.database.max_connections == 0 {
            bail!("database.max_connections must be greater than zero");
        }
        if self.http.request_timeout_seconds == 0 {
            bail!("http.request_timeout_seconds must be greater than zero");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
    #[serde(default = "HttpConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl HttpConfig {
    const fn default_request_timeout() -> u64 {
        10
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 7070,
            request_timeout_seconds: Self::default_request_timeout(),
        }
    }
}

/// Which user store adapter the process wires in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Sqlite => "sqlite",
            StoreBackend::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: "sqlite://tollgate.db".to_string(),
            max_connections: 10,
        }
    }
}

/// Credential and token settings, fixed for the lifetime of the process.
///
/// ```
/// use tollgate_config::AuthConfig;
///
/// let auth = AuthConfig::default();
/// assert_eq!(auth.token_ttl_seconds, 86_400);
/// assert!(!auth.signing_key.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "AuthConfig::default_hash_salt")]
    pub hash_salt: String,
    #[serde(default = "AuthConfig::default_signing_key")]
    pub signing_key: String,
    #[serde(default = "AuthConfig::default_token_ttl")]
    pub token_ttl_seconds: u64,
}

impl AuthConfig {
    fn default_hash_salt() -> String {
        "hash_salt".to_string()
    }

    fn default_signing_key() -> String {
        "signing_key".to_string()
    }

    const fn default_token_ttl() -> u64 {
        86_400
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            hash_salt: Self::default_hash_salt(),
            signing_key: Self::default_signing_key(),
            token_ttl_seconds: Self::default_token_ttl(),
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use tollgate_config::load;
///
/// std::env::remove_var("TOLLGATE_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let token_ttl = i64::try_from(defaults.auth.token_ttl_seconds).unwrap_or(i64::MAX);
    let request_timeout =
        i64::try_from(defaults.http.request_timeout_seconds).unwrap_or(i64::MAX);

    let builder = config::Config::builder()
        .set_default("http.address", defaults.http.address.clone())?
        .set_default("http.port", i64::from(defaults.http.port))?
        .set_default("http.request_timeout_seconds", request_timeout)?
        .set_default("database.backend", defaults.database.backend.as_str())?
        .set_default("database.url", defaults.database.url.clone())?
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )?
        .set_default("auth.hash_salt", defaults.auth.hash_salt.clone())?
        .set_default("auth.signing_key", defaults.auth.signing_key.clone())?
        .set_default("auth.token_ttl_seconds", token_ttl)?;

    let mut builder = builder;
    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("TOLLGATE_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via TOLLGATE_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(config::Environment::with_prefix("TOLLGATE").separator("__"));

    let cfg = builder.build().context("unable to build configuration")?;

    let mut config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    if config.auth.token_ttl_seconds > i64::MAX as u64 {
        config.auth.token_ttl_seconds = i64::MAX as u64;
    }

    config.validate().context("invalid configuration")?;

    debug!(
        address = %config.http.address,
        port = config.http.port,
        backend = config.database.backend.as_str(),
        token_ttl_seconds = config.auth.token_ttl_seconds,
        "loaded configuration"
    );
    Ok(config)
}
