//! Connection settings for the graph store
//!
//! Read once at startup and passed explicitly to the adapter and services.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use tracing::{info, warn};

use crate::data::CoreError;
use crate::services::statements::Vocabulary;

/// Graph store configuration
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the Stardog server
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default = "default_password", skip_serializing)]
    pub password: String,

    /// Database holding the character graph
    #[serde(default = "default_database")]
    pub database: String,

    /// Namespace of every dataset resource, ending in `/` or `#`
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_endpoint() -> String {
    "http://localhost:5820".to_string()
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_password() -> String {
    "admin".to_string()
}

fn default_database() -> String {
    "starwars".to_string()
}

fn default_namespace() -> String {
    crate::services::statements::DEFAULT_NAMESPACE.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl StoreConfig {
    /// Load configuration from a `.env` file (if any) and environment variables
    pub fn load() -> Result<Self, CoreError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(endpoint) = lookup("STARDOG_ENDPOINT") {
            config.endpoint = endpoint.trim_end_matches('/').to_string();
        }

        if let Some(username) = lookup("STARDOG_USERNAME") {
            config.username = username;
        }

        if let Some(password) = lookup("STARDOG_PASSWORD") {
            config.password = password;
        }

        if let Some(database) = lookup("STARDOG_DATABASE") {
            config.database = database;
        }

        if let Some(namespace) = lookup("STARWARS_NAMESPACE") {
            config.namespace = namespace;
        }

        if let Some(timeout) = lookup("STARDOG_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse::<u64>() {
                config.timeout_secs = secs;
            } else {
                warn!("Invalid STARDOG_TIMEOUT_SECS value: {}", timeout);
            }
        }

        if let Some(log_level) = lookup("LOG_LEVEL") {
            config.log_level = log_level;
        }

        config.validate()?;

        if config.password == default_password() {
            warn!("Using the default Stardog password");
        }

        info!(endpoint = %config.endpoint, database = %config.database, "Loaded store configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.endpoint.is_empty() {
            return Err(CoreError::Configuration("Stardog endpoint is required".to_string()));
        }

        if self.database.is_empty() {
            return Err(CoreError::Configuration("Database name is required".to_string()));
        }

        if !(self.namespace.ends_with('/') || self.namespace.ends_with('#')) {
            return Err(CoreError::Configuration(format!(
                "Namespace must end in '/' or '#': {}",
                self.namespace
            )));
        }

        Ok(())
    }

    /// Vocabulary over the configured namespace.
    pub fn vocabulary(&self) -> Result<Vocabulary, CoreError> {
        Vocabulary::new(self.namespace.as_str())
            .map_err(|e| CoreError::Configuration(format!("Invalid namespace: {}", e)))
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            username: default_username(),
            password: default_password(),
            database: default_database(),
            namespace: default_namespace(),
            timeout_secs: default_timeout_secs(),
            log_level: default_log_level(),
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"***")
            .field("database", &self.database)
            .field("namespace", &self.namespace)
            .field("timeout_secs", &self.timeout_secs)
            .field("log_level", &self.log_level)
            .finish()
    }
}
