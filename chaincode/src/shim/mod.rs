//! State access interface between the contract and its host.
//!
//! The contract never touches a storage engine directly. Every read, write
//! and scan goes through [`ChaincodeStub`], which the host implements:
//!
//! - [`MemoryState`]: ordered in-memory map with fault injection, for tests
//! - [`FileState`]: append-only checksummed log, for the CLI host
//!
//! # Key Space
//!
//! Simple keys are non-empty strings that do not start with `U+0000`.
//! Composite keys (see [`composite_key`]) always start with `U+0000`, so a
//! range scan over simple keys never returns index entries.

pub mod composite_key;
mod file;
mod memory;
mod response;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub use composite_key::{
    COMPOSITE_KEY_NAMESPACE, CompositeKeyError, create_composite_key, partial_key_range,
    split_composite_key,
};
pub use file::{FileState, LogError};
pub use memory::{FaultConfig, MemoryState};
pub use response::{ERROR, OK, Response};

/// Lowest simple key; substituted for an empty range start.
const EMPTY_KEY_SUBSTITUTE: &str = "\u{1}";

/// A single key/value pair produced by a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

/// Ordered results of a range scan.
///
/// The iterator is a scoped resource. It is released when [`close`] is
/// called or when it is dropped, whichever happens first, so an early
/// return through `?` never leaks it.
///
/// [`close`]: StateIterator::close
#[derive(Debug)]
pub struct StateIterator {
    results: std::vec::IntoIter<Result<KeyValue, StateError>>,
    open_scans: Option<Arc<AtomicUsize>>,
}

impl StateIterator {
    /// Wrap already-materialized scan results.
    #[must_use]
    pub fn new(results: Vec<Result<KeyValue, StateError>>) -> Self {
        Self {
            results: results.into_iter(),
            open_scans: None,
        }
    }

    /// Wrap scan results and count this iterator as open until released.
    #[must_use]
    pub fn tracked(
        results: Vec<Result<KeyValue, StateError>>,
        open_scans: Arc<AtomicUsize>,
    ) -> Self {
        open_scans.fetch_add(1, Ordering::SeqCst);
        Self {
            results: results.into_iter(),
            open_scans: Some(open_scans),
        }
    }

    /// Release the iterator.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(open_scans) = self.open_scans.take() {
            open_scans.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl Iterator for StateIterator {
    type Item = Result<KeyValue, StateError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.results.next()
    }
}

impl Drop for StateIterator {
    fn drop(&mut self) {
        self.release();
    }
}

/// Host-provided access to ledger state.
///
/// Implementors supply the four primitive operations; key validation for
/// range scans and the composite-key helpers are provided.
pub trait ChaincodeStub {
    /// Read the value stored at `key`, or `None` if the key is absent.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StateError>;

    /// Write `value` at `key`, replacing any previous value.
    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), StateError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn del_state(&mut self, key: &str) -> Result<(), StateError>;

    /// Raw ordered scan over `[start_key, end_key)`; `None` means unbounded.
    fn scan(&self, start_key: &str, end_key: Option<&str>) -> Result<StateIterator, StateError>;

    /// Ordered scan over simple keys in `[start_key, end_key)`.
    ///
    /// An empty `start_key` starts at the first simple key and an empty
    /// `end_key` leaves the range unbounded above.
    fn get_state_by_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> Result<StateIterator, StateError> {
        validate_simple_key(start_key)?;
        validate_simple_key(end_key)?;

        let start_key = if start_key.is_empty() {
            EMPTY_KEY_SUBSTITUTE
        } else {
            start_key
        };
        let end_key = (!end_key.is_empty()).then_some(end_key);
        self.scan(start_key, end_key)
    }

    /// Scan every composite key that begins with `object_type` and the
    /// given leading attributes.
    fn get_state_by_partial_composite_key(
        &self,
        object_type: &str,
        attributes: &[&str],
    ) -> Result<StateIterator, StateError> {
        let (start_key, end_key) = partial_key_range(object_type, attributes)?;
        self.scan(&start_key, Some(&end_key))
    }

    fn create_composite_key(
        &self,
        object_type: &str,
        attributes: &[&str],
    ) -> Result<String, CompositeKeyError> {
        create_composite_key(object_type, attributes)
    }

    fn split_composite_key(&self, key: &str) -> Result<(String, Vec<String>), CompositeKeyError> {
        split_composite_key(key)
    }
}

/// Reject keys that cannot be stored.
pub fn validate_key(key: &str) -> Result<(), StateError> {
    if key.is_empty() {
        return Err(StateError::EmptyKey);
    }
    Ok(())
}

fn validate_simple_key(key: &str) -> Result<(), StateError> {
    if key.starts_with(composite_key::COMPOSITE_KEY_NAMESPACE) {
        return Err(StateError::InvalidRangeKey(key.escape_debug().to_string()));
    }
    Ok(())
}

/// Split raw invocation arguments into the function name and its parameters.
///
/// The first argument names the function; an empty argument list yields an
/// empty name, which no operation matches.
#[must_use]
pub fn function_and_parameters(mut args: Vec<String>) -> (String, Vec<String>) {
    if args.is_empty() {
        return (String::new(), args);
    }
    let function = args.remove(0);
    (function, args)
}

/// Errors that can occur while accessing state.
#[derive(Debug)]
pub enum StateError {
    /// A write or delete used an empty key.
    EmptyKey,
    /// A range bound started with the composite key namespace.
    InvalidRangeKey(String),
    /// Composite key construction failed.
    CompositeKey(CompositeKeyError),
    /// The file-backed log failed.
    Log(LogError),
    /// Injected fault for testing.
    InjectedFault(String),
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyKey => write!(f, "key must not be an empty string"),
            Self::InvalidRangeKey(key) => write!(
                f,
                "first character of the key [{key}] contains a null character which is not allowed"
            ),
            Self::CompositeKey(e) => write!(f, "{e}"),
            Self::Log(e) => write!(f, "state log error: {e}"),
            Self::InjectedFault(msg) => write!(f, "injected fault: {msg}"),
        }
    }
}

impl std::error::Error for StateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CompositeKey(e) => Some(e),
            Self::Log(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CompositeKeyError> for StateError {
    fn from(e: CompositeKeyError) -> Self {
        Self::CompositeKey(e)
    }
}

impl From<LogError> for StateError {
    fn from(e: LogError) -> Self {
        Self::Log(e)
    }
}
