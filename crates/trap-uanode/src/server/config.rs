// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Address-space server configuration.
//!
//! Configuration is loaded from YAML, TOML or JSON. The format follows the
//! file extension:
//!
//! ```yaml
//! name: Line 3 Gateway
//! locale: en-US
//! port: 4840
//! role: client_server
//! application_uri: urn:sylvex:trap:line3
//! capabilities: [DA, LDS]
//! namespace_index: 2
//! discovery:
//!   server_uri: opc.tcp://lds.local:4840
//!   register_interval: 10m
//!   initial_delay: 500ms
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ConfigurationError, NodeResult};

/// Default server name.
pub const DEFAULT_SERVER_NAME: &str = "TRAP OPC UA Server";

/// Default listening port.
pub const DEFAULT_PORT: u16 = 4840;

// =============================================================================
// ServerRole
// =============================================================================

/// Role of the server on the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerRole {
    /// Plain server.
    #[default]
    Server,
    /// Server that also acts as a client, e.g. toward a discovery server.
    ClientServer,
}

impl ServerRole {
    /// Returns the role name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Server => "server",
            Self::ClientServer => "client_server",
        }
    }
}

// =============================================================================
// DiscoveryConfig
// =============================================================================

/// Periodic registration with a discovery server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Discovery server endpoint.
    pub server_uri: String,
    /// Interval between registrations.
    #[serde(with = "humantime_serde")]
    pub register_interval: Duration,
    /// Delay before the first registration.
    #[serde(with = "humantime_serde")]
    pub initial_delay: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            server_uri: String::new(),
            register_interval: Duration::from_secs(10 * 60),
            initial_delay: Duration::from_millis(500),
        }
    }
}

impl DiscoveryConfig {
    /// Creates a discovery configuration with default timing.
    pub fn new(server_uri: impl Into<String>) -> Self {
        Self {
            server_uri: server_uri.into(),
            ..Self::default()
        }
    }
}

// =============================================================================
// ServerConfig
// =============================================================================

/// Configuration of the address-space server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server name.
    pub name: String,
    /// Locale of rendered texts.
    pub locale: String,
    /// Listening port.
    pub port: u16,
    /// Network role.
    pub role: ServerRole,
    /// Application URI.
    pub application_uri: Option<String>,
    /// Advertised server capabilities.
    pub capabilities: BTreeSet<String>,
    /// Namespace index of created nodes.
    pub namespace_index: u16,
    /// Discovery registration.
    pub discovery: Option<DiscoveryConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_SERVER_NAME.to_string(),
            locale: crate::types::DEFAULT_LOCALE.to_string(),
            port: DEFAULT_PORT,
            role: ServerRole::Server,
            application_uri: None,
            capabilities: BTreeSet::new(),
            namespace_index: crate::types::DEFAULT_NAMESPACE,
            discovery: None,
        }
    }
}

impl ServerConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Loads a configuration file. The format follows the extension.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing or unreadable, the extension is not
    /// supported, the content does not parse, or validation fails.
    pub fn load(path: impl AsRef<Path>) -> NodeResult<Self> {
        let path = path.as_ref();
        info!("Loading server configuration from: {}", path.display());

        if !path.exists() {
            return Err(ConfigurationError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        let format = ConfigFormat::from_path(path)?;
        let content = fs::read_to_string(path).map_err(|e| ConfigurationError::io(path, e))?;

        Self::from_str(&content, format)
    }

    /// Parses and validates a configuration.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str, format: ConfigFormat) -> NodeResult<Self> {
        let config: ServerConfig = match format {
            ConfigFormat::Yaml => parse_yaml(content)?,
            ConfigFormat::Toml => {
                toml::from_str(content).map_err(|e| ConfigurationError::parse(e.to_string()))?
            }
            ConfigFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigurationError::parse(e.to_string()))?,
        };

        config.validate()?;
        debug!(
            name = %config.name,
            port = config.port,
            role = config.role.name(),
            "Server configuration parsed"
        );
        Ok(config)
    }

    /// Serializes the configuration.
    pub fn serialize_as(&self, format: ConfigFormat) -> NodeResult<String> {
        match format {
            // YAML output shares the JSON data model; JSON is valid YAML.
            ConfigFormat::Yaml | ConfigFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| ConfigurationError::parse(e.to_string()).into()),
            ConfigFormat::Toml => {
                toml::to_string(self).map_err(|e| ConfigurationError::parse(e.to_string()).into())
            }
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> NodeResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigurationError::invalid_value("name", "must not be empty").into());
        }
        if self.locale.trim().is_empty() {
            return Err(ConfigurationError::invalid_value("locale", "must not be empty").into());
        }
        if self.port == 0 {
            return Err(ConfigurationError::invalid_value("port", "must be non-zero").into());
        }
        if self.namespace_index == 0 {
            return Err(ConfigurationError::invalid_value(
                "namespace_index",
                "namespace 0 is reserved",
            )
            .into());
        }
        if matches!(&self.application_uri, Some(uri) if uri.trim().is_empty()) {
            return Err(
                ConfigurationError::invalid_value("application_uri", "must not be empty").into(),
            );
        }
        if let Some(discovery) = &self.discovery {
            if discovery.server_uri.trim().is_empty() {
                return Err(ConfigurationError::invalid_value(
                    "discovery.server_uri",
                    "must not be empty",
                )
                .into());
            }
            if discovery.register_interval.is_zero() {
                return Err(ConfigurationError::invalid_value(
                    "discovery.register_interval",
                    "must be non-zero",
                )
                .into());
            }
        }
        Ok(())
    }

    /// Adds a capability. Empty strings and duplicates are ignored.
    ///
    /// Returns `true` if the capability was added.
    pub fn add_capability(&mut self, capability: impl Into<String>) -> bool {
        let capability = capability.into();
        if capability.is_empty() {
            return false;
        }
        self.capabilities.insert(capability)
    }

    /// Removes a capability. Returns `true` if it was present.
    pub fn remove_capability(&mut self, capability: &str) -> bool {
        self.capabilities.remove(capability)
    }

    /// Returns `true` if the capability is advertised.
    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }

    /// Sets the application URI, replacing any previous one.
    pub fn set_application_uri(&mut self, uri: impl Into<String>) {
        self.application_uri = Some(uri.into());
    }

    /// Removes the application URI.
    pub fn clear_application_uri(&mut self) {
        self.application_uri = None;
    }

    /// Returns `true` if the server registers with a discovery server.
    pub fn is_discovery_enabled(&self) -> bool {
        self.discovery.is_some()
    }
}

// =============================================================================
// ServerConfigBuilder
// =============================================================================

/// Builder for [`ServerConfig`].
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    /// Sets the server name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Sets the locale.
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.config.locale = locale.into();
        self
    }

    /// Sets the port.
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Sets the role.
    pub fn role(mut self, role: ServerRole) -> Self {
        self.config.role = role;
        self
    }

    /// Sets the application URI.
    pub fn application_uri(mut self, uri: impl Into<String>) -> Self {
        self.config.set_application_uri(uri);
        self
    }

    /// Adds a capability.
    pub fn capability(mut self, capability: impl Into<String>) -> Self {
        self.config.add_capability(capability);
        self
    }

    /// Sets the namespace index of created nodes.
    pub fn namespace_index(mut self, namespace_index: u16) -> Self {
        self.config.namespace_index = namespace_index;
        self
    }

    /// Enables discovery registration.
    pub fn discovery(mut self, discovery: DiscoveryConfig) -> Self {
        self.config.discovery = Some(discovery);
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> NodeResult<ServerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format.
    Yaml,
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file path.
    pub fn from_path(path: &Path) -> NodeResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            other => Err(ConfigurationError::UnsupportedFormat {
                extension: other.unwrap_or("(no extension)").to_string(),
            }
            .into()),
        }
    }

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Json => "json",
        }
    }
}

fn parse_yaml<T: DeserializeOwned>(content: &str) -> NodeResult<T> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(content, config::FileFormat::Yaml))
        .build()
        .map_err(|e| ConfigurationError::parse(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| ConfigurationError::parse(e.to_string()).into())
}

// =============================================================================
// humantime_serde module for Duration
// =============================================================================

mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Tests
// =============================================================================
