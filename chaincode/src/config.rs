//! Host configuration module.
//!
//! This module provides configuration loading for the chaincode host from
//! environment variables.
//!
//! # Environment Variables
//!
//! - `CHAINCODE_STATE_FILE`: Path of the state log (default: `./ledger.log`)
//! - `CHAINCODE_STRICT_DECODING`: `true` to fail on unreadable or missing
//!   records instead of using zero-valued ones (default: `false`)
//! - `CHAINCODE_REINDEX_ON_UPDATE`: `true` to move the operator index entry
//!   when an update changes the operator (default: `false`)
//!
//! # Invariants
//!
//! - `state_file` is always a valid path (may not exist yet)
//! - boolean flags accept only `true`/`false`/`1`/`0`, case-insensitively;
//!   an empty value counts as unset

use std::path::PathBuf;

use crate::contract::ContractConfig;

/// Host configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Log file backing the ledger state.
    pub state_file: PathBuf,
    /// Behavior switches passed to the contract.
    pub contract: ContractConfig,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl HostConfig {
    /// Default state log path.
    pub const DEFAULT_STATE_FILE: &'static str = "./ledger.log";

    const STATE_FILE_VAR: &'static str = "CHAINCODE_STATE_FILE";
    const STRICT_DECODING_VAR: &'static str = "CHAINCODE_STRICT_DECODING";
    const REINDEX_ON_UPDATE_VAR: &'static str = "CHAINCODE_REINDEX_ON_UPDATE";

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a boolean flag is set to something other than
    /// `true`, `false`, `1` or `0`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let state_file = lookup(Self::STATE_FILE_VAR)
            .filter(|value| !value.is_empty())
            .map_or_else(|| PathBuf::from(Self::DEFAULT_STATE_FILE), PathBuf::from);

        let strict_decoding =
            parse_flag(Self::STRICT_DECODING_VAR, lookup(Self::STRICT_DECODING_VAR))?;
        let reindex_on_update = parse_flag(
            Self::REINDEX_ON_UPDATE_VAR,
            lookup(Self::REINDEX_ON_UPDATE_VAR),
        )?;

        Ok(Self {
            state_file,
            contract: ContractConfig {
                strict_decoding,
                reindex_on_update,
            },
        })
    }
}

/// Parse a boolean flag; an unset variable is `false`.
fn parse_flag(name: &str, value: Option<String>) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(false);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" => Ok(false),
        "true" | "1" => Ok(true),
        _ => Err(ConfigError::InvalidValue {
            name: name.to_string(),
            message: format!("'{value}' is not a boolean (expected true or false)"),
        }),
    }
}
