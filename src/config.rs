//! Configuration for tableproc
//!
//! Wire constants with the defaults spoken by every backend, overridable
//! through a builder.

use crate::error::{Result, TableError};

/// Protocol version literal written in every request header
pub const DEFAULT_PROTOCOL_VERSION: &str = "0.1";

/// Literal preceding the request id in every response line
pub const DEFAULT_RESPONSE_PREFIX: &str = "table-result|";

/// Maximum accepted line length, excluding the trailing newline
pub const DEFAULT_MAX_LINE_LENGTH: usize = 2048;

/// Framing parameters shared by the encoder and decoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolConfig {
    /// Version field of the request header
    pub protocol_version: String,

    /// Fixed literal a response line must start with
    pub response_prefix: String,

    /// Lines longer than this (in bytes, newline excluded) are rejected
    pub max_line_length: usize,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            protocol_version: DEFAULT_PROTOCOL_VERSION.to_string(),
            response_prefix: DEFAULT_RESPONSE_PREFIX.to_string(),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

impl ProtocolConfig {
    /// Create a new config builder
    pub fn builder() -> ProtocolConfigBuilder {
        ProtocolConfigBuilder::default()
    }
}

/// Builder for ProtocolConfig
#[derive(Default)]
pub struct ProtocolConfigBuilder {
    config: ProtocolConfig,
}

impl ProtocolConfigBuilder {
    /// Set the protocol version literal
    pub fn protocol_version(mut self, version: impl Into<String>) -> Self {
        self.config.protocol_version = version.into();
        self
    }

    /// Set the response prefix literal
    pub fn response_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.response_prefix = prefix.into();
        self
    }

    /// Set the maximum line length (in bytes)
    pub fn max_line_length(mut self, len: usize) -> Self {
        self.config.max_line_length = len;
        self
    }

    pub fn build(self) -> Result<ProtocolConfig> {
        let config = self.config;

        if config.protocol_version.is_empty()
            || config
                .protocol_version
                .bytes()
                .any(|b| matches!(b, b'|' | b'\n' | b'\r'))
        {
            return Err(TableError::Config(format!(
                "protocol version {:?} must be non-empty and delimiter-free",
                config.protocol_version
            )));
        }

        if config.response_prefix.is_empty() || config.response_prefix.contains('\n') {
            return Err(TableError::Config(
                "response prefix must be non-empty and contain no newline".to_string(),
            ));
        }

        if config.max_line_length < config.response_prefix.len() {
            return Err(TableError::Config(format!(
                "max line length {} is shorter than the response prefix",
                config.max_line_length
            )));
        }

        Ok(config)
    }
}
