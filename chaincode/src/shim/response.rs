//! Invocation result returned to the host.

/// Status for a successful invocation.
pub const OK: i32 = 200;

/// Status for a failed invocation.
pub const ERROR: i32 = 500;

/// Result of a single invocation: a status code, a message for failures
/// and a payload for successes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: i32,
    pub message: String,
    pub payload: Vec<u8>,
}

impl Response {
    #[must_use]
    pub const fn success(payload: Vec<u8>) -> Self {
        Self {
            status: OK,
            message: String::new(),
            payload,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ERROR,
            message: message.into(),
            payload: Vec::new(),
        }
    }

    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status == OK
    }
}
