// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Logging initialization for hosts embedding the node layer.

use std::fmt;
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::{fmt as fmt_layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{ConfigurationError, NodeError, NodeResult};

// =============================================================================
// LogFormat
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
    /// Minimal single-line output.
    Compact,
}

impl FromStr for LogFormat {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(ConfigurationError::invalid_value(
                "log_format",
                format!("unknown format '{}'", other),
            )
            .into()),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Compact => write!(f, "compact"),
        }
    }
}

// =============================================================================
// Logging Initialization
// =============================================================================

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level` when set.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(level: &str, format: LogFormat) -> NodeResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Text => {
            let is_terminal = std::io::IsTerminal::is_terminal(&std::io::stdout());
            registry
                .with(
                    fmt_layer::layer()
                        .with_target(true)
                        .with_file(false)
                        .with_line_number(false)
                        .with_ansi(is_terminal),
                )
                .try_init()
        }
        LogFormat::Json => registry
            .with(
                fmt_layer::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_current_span(true),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt_layer::layer().compact().with_target(false))
            .try_init(),
    };

    result.map_err(|e| {
        ConfigurationError::Logging {
            message: e.to_string(),
        }
        .into()
    })
}

// =============================================================================
// Log Level Parsing
// =============================================================================

/// Parses a log level name. Unknown names fall back to `INFO`.
pub fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level("warning"), Level::WARN);
        assert_eq!(parse_level("nonsense"), Level::INFO);
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
        assert_eq!(LogFormat::Compact.to_string(), "compact");
    }

    #[test]
    fn test_second_init_fails() {
        // the first call may lose against another test's subscriber
        let _ = init_logging("debug", LogFormat::Compact);
        assert!(init_logging("debug", LogFormat::Text).is_err());
    }
}
