//! End-to-end tests at the invocation level.
//!
//! Each test file covers a specific scenario, driving the contract through
//! `invoke` against in-memory or file-backed state.

#![cfg(test)]


mod test_argument_count;
mod test_encoded_invocation;
mod test_strict_decoding;
