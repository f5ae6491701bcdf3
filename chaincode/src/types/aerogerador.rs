//! Wind turbine record and its JSON codec.
//!
//! Records are stored as compact JSON objects with four string fields:
//!
//! ```text
//! {"localizacao":"RS","operador":"José","status":"Em operacao","balanceado":"Balanceado"}
//! ```
//!
//! Field names and their order are part of the wire format seen by every
//! consumer of the ledger, so they must not change.
//!
//! # Decoding
//!
//! Missing fields decode as empty strings and unknown fields are ignored.
//! Empty or malformed input is an error from [`Aerogerador::from_bytes`];
//! [`Aerogerador::from_bytes_lenient`] turns any error into the zero record.

use serde::{Deserialize, Serialize};

/// A wind turbine record.
///
/// The record does not carry its own store key; it is addressed externally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Aerogerador {
    /// Location (state code, e.g. `RS`).
    pub localizacao: String,
    /// Operator responsible for the turbine.
    pub operador: String,
    /// Operational status.
    pub status: String,
    /// Balance state of the rotor.
    pub balanceado: String,
}

impl Aerogerador {
    #[must_use]
    pub fn new(
        localizacao: impl Into<String>,
        operador: impl Into<String>,
        status: impl Into<String>,
        balanceado: impl Into<String>,
    ) -> Self {
        Self {
            localizacao: localizacao.into(),
            operador: operador.into(),
            status: status.into(),
            balanceado: balanceado.into(),
        }
    }

    /// Serialize this record to its JSON encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(self).map_err(CodecError::Encode)
    }

    /// Deserialize a record from its JSON encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.is_empty() {
            return Err(CodecError::Empty);
        }
        serde_json::from_slice(bytes).map_err(CodecError::Malformed)
    }

    /// Deserialize a record, yielding the zero record on any error.
    ///
    /// The whole record is discarded on error: a field of the wrong type
    /// also drops the fields that did decode.
    #[must_use]
    pub fn from_bytes_lenient(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes).unwrap_or_default()
    }
}

/// Errors that can occur while encoding or decoding a record.
#[derive(Debug)]
pub enum CodecError {
    /// Input was empty.
    Empty,
    /// Input was not a JSON object of the record shape.
    Malformed(serde_json::Error),
    /// Serialization failed.
    Encode(serde_json::Error),
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "record is empty"),
            Self::Malformed(e) => write!(f, "malformed record: {e}"),
            Self::Encode(e) => write!(f, "failed to encode record: {e}"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Empty => None,
            Self::Malformed(e) | Self::Encode(e) => Some(e),
        }
    }
}
