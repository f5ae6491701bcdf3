//! Contract-level errors.
//!
//! Every variant becomes the message of a failure [`Response`]; none of them
//! abort the host process.
//!
//! [`Response`]: crate::shim::Response

use crate::shim::{CompositeKeyError, StateError};
use crate::types::CodecError;

/// Errors that can occur while handling an invocation.
#[derive(Debug)]
pub enum ContractError {
    /// Wrong number of positional arguments.
    ArgumentCount { expected: usize, actual: usize },
    /// No operation with the requested name.
    UnknownFunction(String),
    /// State access failed.
    State(StateError),
    /// Composite key construction failed.
    CompositeKey(CompositeKeyError),
    /// A stored record could not be decoded, or a record could not be encoded.
    Codec(CodecError),
    /// The record to update does not exist (strict decoding only).
    NotFound(String),
}

impl std::fmt::Display for ContractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ArgumentCount { expected: 1, .. } => {
                write!(f, "Número incorreto de argumentos. Esperado 1 argumento.")
            }
            Self::ArgumentCount { expected, .. } => {
                write!(
                    f,
                    "Número incorreto de argumentos. Esperado {expected} argumentos."
                )
            }
            Self::UnknownFunction(_) => write!(f, "Invalid Smart Contract function name."),
            Self::State(e) => write!(f, "{e}"),
            Self::CompositeKey(e) => write!(f, "{e}"),
            Self::Codec(e) => write!(f, "{e}"),
            Self::NotFound(key) => write!(f, "Aerogerador {key} não encontrado."),
        }
    }
}

impl std::error::Error for ContractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::State(e) => Some(e),
            Self::CompositeKey(e) => Some(e),
            Self::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StateError> for ContractError {
    fn from(e: StateError) -> Self {
        Self::State(e)
    }
}

impl From<CompositeKeyError> for ContractError {
    fn from(e: CompositeKeyError) -> Self {
        Self::CompositeKey(e)
    }
}

impl From<CodecError> for ContractError {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}
