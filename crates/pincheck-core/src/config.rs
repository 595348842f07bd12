//! Configuration management for pincheck
//!
//! Loads and validates the YAML configuration that names the pinning
//! services to test and tunes HTTP behavior. The file lives at
//! `~/.config/pincheck/config.yaml` by default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{AccessToken, ServiceEndpoint, ServiceTokenPair};

// ============================================================================
// Configuration structures
// ============================================================================

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Pinning services to run checks against
    #[serde(default)]
    pub services: Vec<ServiceEntry>,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Report output settings
    #[serde(default)]
    pub report: ReportConfig,
}

/// One pinning service entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceEntry {
    /// Optional display name; the endpoint host is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Base URL of the pinning service API
    pub endpoint: ServiceEndpoint,

    /// Bearer token for the service
    pub token: AccessToken,
}

impl ServiceEntry {
    /// Name used in reports and log lines
    #[must_use]
    pub fn display_name(&self) -> &str {
        match &self.name {
            Some(name) => name,
            None => self.endpoint.as_str(),
        }
    }

    /// The endpoint/token pair the checks consume
    #[must_use]
    pub fn token_pair(&self) -> ServiceTokenPair {
        ServiceTokenPair::new(self.endpoint.clone(), self.token.clone())
    }
}

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("pincheck/{}", env!("CARGO_PKG_VERSION"))
}

/// Report output settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Keep full request/response transcripts in the report output
    #[serde(default)]
    pub include_detail: bool,
}

// ============================================================================
// Validation
// ============================================================================

/// A single configuration validation problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field
    pub field: String,
    /// Human readable description
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate semantic constraints the type system cannot express
    ///
    /// Returns all problems found rather than stopping at the first one.
    #[must_use]
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.http.timeout_secs == 0 {
            errors.push(ValidationError {
                field: "http.timeout_secs".to_string(),
                message: "timeout must be greater than zero".to_string(),
            });
        }

        if self.http.user_agent.trim().is_empty() {
            errors.push(ValidationError {
                field: "http.user_agent".to_string(),
                message: "user agent cannot be empty".to_string(),
            });
        }

        for (i, service) in self.services.iter().enumerate() {
            if let Some(name) = &service.name {
                if name.trim().is_empty() {
                    errors.push(ValidationError {
                        field: format!("services[{i}].name"),
                        message: "name cannot be blank".to_string(),
                    });
                }
            }
        }

        errors
    }

    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read, parsed, or fails validation
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file {}: {e}", path.display()))?;

        let config: Self = serde_yaml::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file {}: {e}", path.display()))?;

        let errors = config.validate();
        if !errors.is_empty() {
            let joined = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(anyhow::anyhow!("Invalid configuration: {joined}"));
        }

        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be loaded
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    /// Returns error if serialization or writing fails
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!("Failed to create config directory {}: {e}", parent.display())
            })?;
        }

        let contents = serde_yaml::to_string(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize config: {e}"))?;

        fs::write(path, contents)
            .map_err(|e| anyhow::anyhow!("Failed to write config file {}: {e}", path.display()))?;

        Ok(())
    }

    /// Default configuration file path
    ///
    /// # Errors
    /// Returns error if the platform config directory cannot be determined
    pub fn default_path() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("pincheck").join("config.yaml"))
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for constructing a [`Config`] programmatically
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use pincheck_core::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .timeout_secs(10)
///     .user_agent("pincheck-ci/1.0")
///     .include_detail(true)
///     .build()
///     .expect("valid configuration");
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a service to test
    #[must_use]
    pub fn service(mut self, name: Option<String>, endpoint: ServiceEndpoint, token: AccessToken) -> Self {
        self.config.services.push(ServiceEntry {
            name,
            endpoint,
            token,
        });
        self
    }

    /// Set the per-request timeout
    #[must_use]
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.http.timeout_secs = secs;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.http.user_agent = agent.into();
        self
    }

    /// Keep full transcripts in report output
    #[must_use]
    pub fn include_detail(mut self, include: bool) -> Self {
        self.config.report.include_detail = include;
        self
    }

    /// Build the final configuration
    ///
    /// # Errors
    /// Returns error if the configuration fails validation
    pub fn build(self) -> anyhow::Result<Config> {
        let errors = self.config.validate();
        if !errors.is_empty() {
            let joined = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(anyhow::anyhow!("Invalid configuration: {joined}"));
        }
        Ok(self.config)
    }
}

// ============================================================================
// Tests
// ============================================================================
