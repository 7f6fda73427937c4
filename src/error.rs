//! Caller-contract errors.
//!
//! Problems in the submitted source code are never errors here: they become
//! diagnostic strings on the structural model. This type only covers calls
//! that are malformed from the caller's side.

use thiserror::Error;

/// Errors signalling that the caller violated the analyzer's contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("source is not valid UTF-8 text: {0}")]
    InvalidSource(#[from] std::str::Utf8Error),
    #[error("unknown language: {0:?} (expected motoko, rust, or javascript)")]
    UnknownLanguage(String),
    #[error("no language is associated with file extension {0:?}")]
    UnsupportedExtension(String),
}
