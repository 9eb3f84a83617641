// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Server Configuration Loading Tests
//!
//! Loads server configurations from files in every supported format and
//! checks the failure paths of the loader.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p trap-uanode --test config
//! ```

use std::fs;
use std::time::Duration;

use tempfile::TempDir;
use trap_uanode::error::{ConfigurationError, NodeError};
use trap_uanode::server::{ConfigFormat, MemoryServer, ServerConfig, ServerRole, DEFAULT_PORT};

// =============================================================================
// Test Configuration
// =============================================================================

const YAML_CONFIG: &str = r#"
name: Line 3 Gateway
port: 4841
role: client_server
application_uri: urn:trap:line3
capabilities:
  - DA
  - LDS
namespace_index: 2
discovery:
  server_uri: opc.tcp://lds.local:4840
  register_interval: 30s
"#;

const TOML_CONFIG: &str = r#"
name = "Line 3 Gateway"
locale = "de-DE"
capabilities = ["DA"]

[discovery]
server_uri = "opc.tcp://lds.local:4840"
initial_delay = "2s"
"#;

const JSON_CONFIG: &str = r#"{
  "name": "Line 3 Gateway",
  "port": 4850,
  "role": "server"
}"#;

fn write_config(dir: &TempDir, file_name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(file_name);
    fs::write(&path, content).unwrap();
    path
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_load_yaml() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "server.yaml", YAML_CONFIG);

    let config = ServerConfig::load(&path).unwrap();
    assert_eq!(config.name, "Line 3 Gateway");
    assert_eq!(config.port, 4841);
    assert_eq!(config.role, ServerRole::ClientServer);
    assert_eq!(config.application_uri.as_deref(), Some("urn:trap:line3"));
    assert!(config.has_capability("LDS"));
    assert_eq!(config.namespace_index, 2);

    let discovery = config.discovery.as_ref().unwrap();
    assert_eq!(discovery.register_interval, Duration::from_secs(30));
    assert_eq!(discovery.initial_delay, Duration::from_millis(500));
    assert!(config.is_discovery_enabled());
}

#[test]
fn test_load_toml_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "server.toml", TOML_CONFIG);

    let config = ServerConfig::load(&path).unwrap();
    assert_eq!(config.locale, "de-DE");
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.role, ServerRole::Server);
    assert!(config.application_uri.is_none());

    let discovery = config.discovery.unwrap();
    assert_eq!(discovery.initial_delay, Duration::from_secs(2));
    assert_eq!(discovery.register_interval, Duration::from_secs(600));
}

#[test]
fn test_load_json() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "server.json", JSON_CONFIG);

    let config = ServerConfig::load(&path).unwrap();
    assert_eq!(config.port, 4850);
    assert!(config.capabilities.is_empty());
    assert!(!config.is_discovery_enabled());
}

#[test]
fn test_saved_config_loads_back() {
    let dir = TempDir::new().unwrap();
    let mut original = ServerConfig::builder()
        .name("Packaging")
        .port(4900)
        .capability("DA")
        .build()
        .unwrap();
    original.set_application_uri("urn:trap:packaging");

    for format in [ConfigFormat::Toml, ConfigFormat::Json] {
        let content = original.serialize_as(format).unwrap();
        let path = write_config(&dir, &format!("saved.{}", format.extension()), &content);
        assert_eq!(ServerConfig::load(&path).unwrap(), original);
    }
}

#[test]
fn test_loaded_config_drives_memory_server() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "server.yml", YAML_CONFIG);

    let server = MemoryServer::new(ServerConfig::load(&path).unwrap());
    assert_eq!(server.config().name, "Line 3 Gateway");
    assert_eq!(server.node_count(), 2);
}

// =============================================================================
// Failure Paths
// =============================================================================

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = ServerConfig::load(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(
        err,
        NodeError::Configuration(ConfigurationError::FileNotFound { .. })
    ));
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "server.ini", "name = x");
    let err = ServerConfig::load(&path).unwrap_err();
    match err {
        NodeError::Configuration(ConfigurationError::UnsupportedFormat { extension }) => {
            assert_eq!(extension, "ini");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_invalid_values_rejected() {
    let dir = TempDir::new().unwrap();

    let path = write_config(&dir, "zero_port.json", r#"{ "port": 0 }"#);
    let err = ServerConfig::load(&path).unwrap_err();
    assert!(matches!(
        err,
        NodeError::Configuration(ConfigurationError::InvalidValue { .. })
    ));

    let path = write_config(&dir, "reserved_ns.toml", "namespace_index = 0");
    assert!(ServerConfig::load(&path).is_err());

    let path = write_config(&dir, "broken.json", "{ \"port\": ");
    let err = ServerConfig::load(&path).unwrap_err();
    assert!(matches!(
        err,
        NodeError::Configuration(ConfigurationError::Parse { .. })
    ));
}
