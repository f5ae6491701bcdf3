//! File-backed state.
//!
//! State is persisted as an append-only log of put/delete records and
//! replayed into an ordered map on open. Every mutation appends and syncs
//! one record before it is applied in memory.
//!
//! # Log Record Format
//!
//! ```text
//! +----------+--------------------------------------------------+
//! | 0-3      | record_length (4 bytes, includes header+crc)     |
//! | 4        | record_type (1 byte)                             |
//! | 5-8      | key_length (4 bytes)                             |
//! | 9-K      | key (UTF-8)                                      |
//! | K-K+3    | value_length (4 bytes, 0 for deletes)            |
//! | K+4-N    | value                                            |
//! | N-N+3    | CRC32 checksum (4 bytes)                         |
//! +----------+--------------------------------------------------+
//! ```
//!
//! All integers are little-endian.
//!
//! # Recovery
//!
//! A record that is truncated or fails its checksum ends the replay. The
//! file is truncated back to the last complete record, which discards a
//! torn final write. Appends always land right after the last complete
//! record, and a failed append is truncated away, so a torn record can
//! only ever be the last one in the file.

// record lengths fit in u32; larger values are rejected before encoding
#![allow(clippy::cast_possible_truncation)]

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::ops::Bound;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::shim::{ChaincodeStub, KeyValue, StateError, StateIterator, validate_key};

/// `record_length` (4) + `record_type` (1) + `key_length` (4) + `value_length` (4)
const RECORD_HEADER_SIZE: usize = 13;

/// CRC32 checksum size at end of record.
const CHECKSUM_SIZE: usize = 4;

/// Log record types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum LogRecordType {
    Put = 0x01,
    Delete = 0x02,
}

impl TryFrom<u8> for LogRecordType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Self::Put),
            0x02 => Ok(Self::Delete),
            _ => Err(value),
        }
    }
}

/// A single mutation in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LogRecord {
    Put { key: String, value: Vec<u8> },
    Delete { key: String },
}

impl LogRecord {
    const fn record_type(&self) -> LogRecordType {
        match self {
            Self::Put { .. } => LogRecordType::Put,
            Self::Delete { .. } => LogRecordType::Delete,
        }
    }

    fn key(&self) -> &str {
        match self {
            Self::Put { key, .. } | Self::Delete { key } => key,
        }
    }

    fn value(&self) -> &[u8] {
        match self {
            Self::Put { value, .. } => value,
            Self::Delete { .. } => &[],
        }
    }

    fn to_bytes(&self) -> Result<Vec<u8>, LogError> {
        let key = self.key().as_bytes();
        let value = self.value();
        let total_len = RECORD_HEADER_SIZE + key.len() + value.len() + CHECKSUM_SIZE;
        if u32::try_from(total_len).is_err() {
            return Err(LogError::RecordTooLarge(total_len));
        }

        let mut bytes = Vec::with_capacity(total_len);
        bytes.extend_from_slice(&(total_len as u32).to_le_bytes());
        bytes.push(self.record_type() as u8);
        bytes.extend_from_slice(&(key.len() as u32).to_le_bytes());
        bytes.extend_from_slice(key);
        bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
        bytes.extend_from_slice(value);

        // CRC32 checksum (4 bytes) - computed over everything before it
        let checksum = crc32fast::hash(&bytes);
        bytes.extend_from_slice(&checksum.to_le_bytes());

        Ok(bytes)
    }

    /// Deserialize a record from bytes.
    ///
    /// Returns the record and the number of bytes consumed.
    fn from_bytes(bytes: &[u8]) -> Result<(Self, usize), LogError> {
        if bytes.len() < RECORD_HEADER_SIZE + CHECKSUM_SIZE {
            return Err(LogError::CorruptRecord);
        }

        let record_len = read_u32(bytes, 0) as usize;
        if record_len < RECORD_HEADER_SIZE + CHECKSUM_SIZE || record_len > bytes.len() {
            return Err(LogError::CorruptRecord);
        }

        let stored_checksum = read_u32(bytes, record_len - CHECKSUM_SIZE);
        let computed_checksum = crc32fast::hash(&bytes[..record_len - CHECKSUM_SIZE]);
        if stored_checksum != computed_checksum {
            return Err(LogError::ChecksumMismatch {
                expected: stored_checksum,
                actual: computed_checksum,
            });
        }

        let record_type = LogRecordType::try_from(bytes[4]).map_err(LogError::InvalidRecordType)?;

        let key_len = read_u32(bytes, 5) as usize;
        let key_end = 9 + key_len;
        if key_end + 4 > record_len - CHECKSUM_SIZE {
            return Err(LogError::CorruptRecord);
        }
        let key = std::str::from_utf8(&bytes[9..key_end])
            .map_err(|_| LogError::InvalidKey)?
            .to_owned();

        let value_len = read_u32(bytes, key_end) as usize;
        let value_start = key_end + 4;
        if value_start + value_len != record_len - CHECKSUM_SIZE {
            return Err(LogError::CorruptRecord);
        }
        let value = bytes[value_start..value_start + value_len].to_vec();

        let record = match record_type {
            LogRecordType::Put => Self::Put { key, value },
            LogRecordType::Delete => Self::Delete { key },
        };
        Ok((record, record_len))
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Key/value state persisted in an append-only log file.
#[derive(Debug)]
pub struct FileState {
    path: PathBuf,
    file: File,
    /// Length of the log up to the end of the last complete record.
    log_len: u64,
    entries: BTreeMap<String, Vec<u8>>,
}

impl FileState {
    /// Open the log at `path`, creating it if it does not exist, and replay
    /// it into memory.
    pub fn open(path: &Path) -> Result<Self, LogError> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;

        let mut entries = BTreeMap::new();
        let mut offset = 0;
        let mut replayed = 0usize;
        while offset < bytes.len() {
            match LogRecord::from_bytes(&bytes[offset..]) {
                Ok((record, consumed)) => {
                    apply(&mut entries, record);
                    offset += consumed;
                    replayed += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        offset,
                        discarded = bytes.len() - offset,
                        "discarding damaged log tail: {e}"
                    );
                    file.set_len(offset as u64)?;
                    file.sync_all()?;
                    break;
                }
            }
        }

        tracing::debug!(
            path = %path.display(),
            records = replayed,
            keys = entries.len(),
            "state log replayed"
        );

        Ok(Self {
            path: path.to_path_buf(),
            file,
            log_len: offset as u64,
            entries,
        })
    }

    /// Path of the backing log.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of live keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrite the log so it holds exactly one put per live key.
    ///
    /// The new log is written to a temporary file in the same directory and
    /// renamed over the old one, then the directory is synced.
    pub fn compact(&mut self) -> Result<(), LogError> {
        let directory = log_directory(&self.path);
        let mut compact = NamedTempFile::new_in(directory)?;
        let mut compact_len = 0u64;
        for (key, value) in &self.entries {
            let record = LogRecord::Put {
                key: key.clone(),
                value: value.clone(),
            };
            let bytes = record.to_bytes()?;
            compact.write_all(&bytes)?;
            compact_len += bytes.len() as u64;
        }
        compact.as_file().sync_all()?;

        self.file = compact.persist(&self.path).map_err(|e| e.error)?;
        sync_directory(directory)?;
        self.log_len = compact_len;

        tracing::debug!(
            path = %self.path.display(),
            keys = self.entries.len(),
            "state log compacted"
        );
        Ok(())
    }

    /// Append one record after the last complete record and apply it.
    ///
    /// A failed append truncates the log back to its previous length, so a
    /// torn record never sits in front of later ones.
    fn append(&mut self, record: LogRecord) -> Result<(), LogError> {
        let bytes = record.to_bytes()?;
        if let Err(e) = self.write_at_end(&bytes) {
            if let Err(truncate_error) = self.file.set_len(self.log_len) {
                tracing::error!(
                    path = %self.path.display(),
                    "failed to discard partial log record: {truncate_error}"
                );
            }
            return Err(e);
        }
        self.log_len += bytes.len() as u64;
        apply(&mut self.entries, record);
        Ok(())
    }

    fn write_at_end(&mut self, bytes: &[u8]) -> Result<(), LogError> {
        if self.file.metadata()?.len() != self.log_len {
            tracing::warn!(
                path = %self.path.display(),
                expected = self.log_len,
                "discarding bytes after the last complete log record"
            );
            self.file.set_len(self.log_len)?;
        }
        self.file.seek(SeekFrom::Start(self.log_len))?;
        self.file.write_all(bytes)?;
        self.file.sync_data()?;
        Ok(())
    }
}

fn log_directory(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[cfg(unix)]
fn sync_directory(directory: &Path) -> Result<(), LogError> {
    File::open(directory)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_directory(_directory: &Path) -> Result<(), LogError> {
    Ok(())
}

fn apply(entries: &mut BTreeMap<String, Vec<u8>>, record: LogRecord) {
    match record {
        LogRecord::Put { key, value } => {
            entries.insert(key, value);
        }
        LogRecord::Delete { key } => {
            entries.remove(&key);
        }
    }
}

impl ChaincodeStub for FileState {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), StateError> {
        validate_key(key)?;
        self.append(LogRecord::Put {
            key: key.to_owned(),
            value: value.to_vec(),
        })?;
        Ok(())
    }

    fn del_state(&mut self, key: &str) -> Result<(), StateError> {
        validate_key(key)?;
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        self.append(LogRecord::Delete {
            key: key.to_owned(),
        })?;
        Ok(())
    }

    fn scan(&self, start_key: &str, end_key: Option<&str>) -> Result<StateIterator, StateError> {
        if end_key.is_some_and(|end_key| end_key <= start_key) {
            return Ok(StateIterator::new(Vec::new()));
        }

        let end = end_key.map_or(Bound::Unbounded, Bound::Excluded);
        let results = self
            .entries
            .range::<str, _>((Bound::Included(start_key), end))
            .map(|(key, value)| {
                Ok(KeyValue {
                    key: key.clone(),
                    value: value.clone(),
                })
            })
            .collect();
        Ok(StateIterator::new(results))
    }
}

/// Errors that can occur while reading or writing the state log.
#[derive(Debug)]
pub enum LogError {
    /// I/O error.
    Io(std::io::Error),
    /// Record is truncated or its lengths are inconsistent.
    CorruptRecord,
    /// Stored checksum does not match the record contents.
    ChecksumMismatch { expected: u32, actual: u32 },
    /// Unknown record type byte.
    InvalidRecordType(u8),
    /// Key bytes are not valid UTF-8.
    InvalidKey,
    /// Record does not fit the 32-bit length field.
    RecordTooLarge(usize),
}

impl std::fmt::Display for LogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::CorruptRecord => write!(f, "corrupt log record"),
            Self::ChecksumMismatch { expected, actual } => write!(
                f,
                "checksum mismatch: expected {expected:#010x}, got {actual:#010x}"
            ),
            Self::InvalidRecordType(t) => write!(f, "invalid log record type: {t:#04x}"),
            Self::InvalidKey => write!(f, "log record key is not valid UTF-8"),
            Self::RecordTooLarge(len) => write!(f, "log record too large: {len} bytes"),
        }
    }
}

impl std::error::Error for LogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LogError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
