//! JSON array builder for range query results.
//!
//! Produces the exact byte layout ledger clients already parse:
//!
//! ```text
//! [{"Key":"AEROGERADOR0", "Record":{...}},{"Key":"AEROGERADOR1", "Record":{...}}]
//! ```
//!
//! The stored record bytes are embedded as-is, without re-encoding.

use crate::shim::KeyValue;
use crate::types::CodecError;

/// Accumulates scan results into a JSON array.
#[derive(Debug)]
pub struct QueryResultsWriter {
    buffer: Vec<u8>,
    count: usize,
}

impl QueryResultsWriter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: vec![b'['],
            count: 0,
        }
    }

    /// Append one `{"Key": ..., "Record": ...}` element.
    pub fn push(&mut self, entry: &KeyValue) -> Result<(), CodecError> {
        if self.count > 0 {
            self.buffer.push(b',');
        }
        self.buffer.extend_from_slice(b"{\"Key\":");
        serde_json::to_writer(&mut self.buffer, &entry.key).map_err(CodecError::Encode)?;
        self.buffer.extend_from_slice(b", \"Record\":");
        self.buffer.extend_from_slice(&entry.value);
        self.buffer.push(b'}');
        self.count += 1;
        Ok(())
    }

    /// Number of elements written so far.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Close the array and return its bytes.
    #[must_use]
    pub fn finish(mut self) -> Vec<u8> {
        self.buffer.push(b']');
        self.buffer
    }
}

impl Default for QueryResultsWriter {
    fn default() -> Self {
        Self::new()
    }
}
