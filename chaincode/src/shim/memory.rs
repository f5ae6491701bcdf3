//! In-memory state for tests.
//!
//! Keys are kept in a `BTreeMap`, so scans return them in the same
//! lexicographic byte order a ledger would. Faults can be injected at the
//! put, get, scan and iteration boundaries, and every scan iterator is
//! counted until it is released.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::shim::{ChaincodeStub, KeyValue, StateError, StateIterator, validate_key};

/// Configuration for fault injection.
#[derive(Debug, Clone, Default)]
pub struct FaultConfig {
    /// Fail the put with this zero-based index (counted across the lifetime
    /// of the state, including failed attempts).
    pub fail_put_at: Option<usize>,
    /// Fail every `get_state`.
    pub fail_gets: bool,
    /// Fail every attempt to open a scan.
    pub fail_scans: bool,
    /// Yield an error after this many scan results.
    pub fail_iteration_after: Option<usize>,
}

impl FaultConfig {
    /// No faults.
    #[must_use]
    pub fn no_faults() -> Self {
        Self::default()
    }

    /// Fail the `n`th put (zero-based).
    #[must_use]
    pub fn fail_put_at(n: usize) -> Self {
        Self {
            fail_put_at: Some(n),
            ..Self::default()
        }
    }
}

/// Ordered in-memory key/value state.
#[derive(Debug, Default)]
pub struct MemoryState {
    entries: BTreeMap<String, Vec<u8>>,
    faults: FaultConfig,
    puts_attempted: usize,
    mutations: usize,
    open_scans: Arc<AtomicUsize>,
}

impl MemoryState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_faults(faults: FaultConfig) -> Self {
        Self {
            faults,
            ..Self::default()
        }
    }

    /// Replace the fault configuration.
    pub fn set_faults(&mut self, faults: FaultConfig) {
        self.faults = faults;
    }

    /// Number of keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Borrow the value at `key` without going through the stub interface.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// All stored keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of successful puts and deletes so far.
    #[must_use]
    pub const fn mutation_count(&self) -> usize {
        self.mutations
    }

    /// Number of scan iterators that have not been released.
    #[must_use]
    pub fn open_scans(&self) -> usize {
        self.open_scans.load(Ordering::SeqCst)
    }
}

impl ChaincodeStub for MemoryState {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StateError> {
        if self.faults.fail_gets {
            return Err(StateError::InjectedFault(format!("get {key}")));
        }
        Ok(self.entries.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), StateError> {
        validate_key(key)?;

        let attempt = self.puts_attempted;
        self.puts_attempted += 1;
        if self.faults.fail_put_at == Some(attempt) {
            return Err(StateError::InjectedFault(format!("put {}", key.escape_debug())));
        }

        self.entries.insert(key.to_owned(), value.to_vec());
        self.mutations += 1;
        Ok(())
    }

    fn del_state(&mut self, key: &str) -> Result<(), StateError> {
        validate_key(key)?;
        self.entries.remove(key);
        self.mutations += 1;
        Ok(())
    }

    fn scan(&self, start_key: &str, end_key: Option<&str>) -> Result<StateIterator, StateError> {
        if self.faults.fail_scans {
            return Err(StateError::InjectedFault("scan".to_owned()));
        }

        let end = end_key.map_or(Bound::Unbounded, Bound::Excluded);
        if end_key.is_some_and(|end_key| end_key <= start_key) {
            return Ok(StateIterator::tracked(Vec::new(), Arc::clone(&self.open_scans)));
        }

        let mut results: Vec<Result<KeyValue, StateError>> = self
            .entries
            .range::<str, _>((Bound::Included(start_key), end))
            .map(|(key, value)| {
                Ok(KeyValue {
                    key: key.clone(),
                    value: value.clone(),
                })
            })
            .collect();

        if let Some(limit) = self.faults.fail_iteration_after {
            results.truncate(limit);
            results.push(Err(StateError::InjectedFault(format!(
                "iteration after {limit} results"
            ))));
        }

        Ok(StateIterator::tracked(results, Arc::clone(&self.open_scans)))
    }
}
