//! Composite key encoding.
//!
//! A composite key packs an object type and an ordered list of attributes
//! into a single store key:
//!
//! ```text
//! 0x00 | object_type | 0x00 | attr_0 | 0x00 | attr_1 | 0x00 | ...
//! ```
//!
//! Every part is terminated by `U+0000`, so an attribute can never bleed
//! into the next one and empty attributes stay distinguishable. The leading
//! `U+0000` keeps composite keys out of ordinary range scans, which start at
//! `U+0001`.
//!
//! # Invariants
//!
//! - No part contains `U+0000` (the delimiter) or `U+10FFFF` (the upper
//!   bound used by partial-key scans).
//! - `split_composite_key(create_composite_key(t, a)) == (t, a)`.

/// Namespace byte that prefixes every composite key.
pub const COMPOSITE_KEY_NAMESPACE: char = '\u{0}';

/// Delimiter placed after the object type and after every attribute.
const DELIMITER: char = '\u{0}';

/// Largest Unicode scalar value; appended to a prefix to bound a scan.
pub const MAX_UNICODE_RUNE: char = '\u{10FFFF}';

/// Build a composite key from an object type and its attributes.
pub fn create_composite_key(
    object_type: &str,
    attributes: &[&str],
) -> Result<String, CompositeKeyError> {
    if object_type.is_empty() {
        return Err(CompositeKeyError::EmptyObjectType);
    }
    validate_part(object_type)?;

    let capacity = 2 + object_type.len() + attributes.iter().map(|a| a.len() + 1).sum::<usize>();
    let mut key = String::with_capacity(capacity);
    key.push(COMPOSITE_KEY_NAMESPACE);
    key.push_str(object_type);
    key.push(DELIMITER);

    for attribute in attributes {
        validate_part(attribute)?;
        key.push_str(attribute);
        key.push(DELIMITER);
    }

    Ok(key)
}

/// Split a composite key back into its object type and attributes.
pub fn split_composite_key(key: &str) -> Result<(String, Vec<String>), CompositeKeyError> {
    let Some(body) = key.strip_prefix(COMPOSITE_KEY_NAMESPACE) else {
        return Err(CompositeKeyError::NotComposite);
    };
    let Some(body) = body.strip_suffix(DELIMITER) else {
        return Err(CompositeKeyError::Unterminated);
    };

    let mut parts = body.split(DELIMITER).map(str::to_owned);
    let object_type = match parts.next() {
        Some(object_type) if !object_type.is_empty() => object_type,
        _ => return Err(CompositeKeyError::EmptyObjectType),
    };

    Ok((object_type, parts.collect()))
}

/// Half-open key range `[start, end)` covering every composite key that
/// begins with the given object type and attribute prefix.
pub fn partial_key_range(
    object_type: &str,
    attributes: &[&str],
) -> Result<(String, String), CompositeKeyError> {
    let start = create_composite_key(object_type, attributes)?;
    let mut end = String::with_capacity(start.len() + MAX_UNICODE_RUNE.len_utf8());
    end.push_str(&start);
    end.push(MAX_UNICODE_RUNE);
    Ok((start, end))
}

fn validate_part(part: &str) -> Result<(), CompositeKeyError> {
    match part
        .char_indices()
        .find(|&(_, c)| c == DELIMITER || c == MAX_UNICODE_RUNE)
    {
        Some((position, character)) => Err(CompositeKeyError::ReservedCharacter {
            character,
            position,
        }),
        None => Ok(()),
    }
}

/// Errors produced while building or splitting composite keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositeKeyError {
    /// The object type (index name) was empty.
    EmptyObjectType,
    /// A part contained `U+0000` or `U+10FFFF`.
    ReservedCharacter { character: char, position: usize },
    /// The key does not start with the composite namespace.
    NotComposite,
    /// The key is missing its final delimiter.
    Unterminated,
}

impl std::fmt::Display for CompositeKeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyObjectType => write!(f, "composite key object type must not be empty"),
            Self::ReservedCharacter {
                character,
                position,
            } => write!(
                f,
                "input contains unicode U+{:04X} starting at position [{position}]. \
                 U+0000 and U+10FFFF are not allowed in the input attribute of a composite key",
                u32::from(*character)
            ),
            Self::NotComposite => write!(f, "key is not a composite key"),
            Self::Unterminated => write!(f, "composite key is missing its final delimiter"),
        }
    }
}

impl std::error::Error for CompositeKeyError {}
