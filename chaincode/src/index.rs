//! Secondary index from operator to record key.
//!
//! Each created record gets one entry under the `owner~key` object type:
//!
//! ```text
//! composite("owner~key", [operador, key]) -> 0x00
//! ```
//!
//! The value carries no payload; the key alone is the index entry. Entries
//! are written when a record is created. Unless the contract is configured
//! to reindex, changing a record's operator leaves the old entry in place,
//! so lookups by operator can return keys whose record now names someone
//! else.

use crate::shim::{ChaincodeStub, CompositeKeyError, StateError};

/// Object type of the operator index.
pub const OWNER_INDEX: &str = "owner~key";

/// Value stored at every index entry.
pub const INDEX_ENTRY_VALUE: [u8; 1] = [0x00];

/// Composite key of the index entry for `key` owned by `operator`.
pub fn owner_index_key<S: ChaincodeStub + ?Sized>(
    stub: &S,
    operator: &str,
    key: &str,
) -> Result<String, CompositeKeyError> {
    stub.create_composite_key(OWNER_INDEX, &[operator, key])
}

/// Record keys indexed under `operator`, in key order.
pub fn keys_by_operator<S: ChaincodeStub + ?Sized>(
    stub: &S,
    operator: &str,
) -> Result<Vec<String>, StateError> {
    let entries = stub.get_state_by_partial_composite_key(OWNER_INDEX, &[operator])?;

    let mut keys = Vec::new();
    for entry in entries {
        let entry = entry?;
        let (_, mut attributes) = stub.split_composite_key(&entry.key)?;
        if attributes.len() != 2 {
            tracing::warn!(
                entry = %entry.key.escape_debug(),
                "skipping owner index entry with {} attributes",
                attributes.len()
            );
            continue;
        }
        if let Some(key) = attributes.pop() {
            keys.push(key);
        }
    }
    Ok(keys)
}
