//! Asset retrieval error types
//!
//! Covers IO failures, payload decode failures, and a retrieval backend
//! that shut down before a request completed.

use std::fmt;
use std::io;

/// Error type for asset retrieval and decoding
#[derive(Debug)]
pub enum AssetError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Decode error (bytes could not be turned into a payload)
    Decode(String),
    /// The retrieval backend exited before the request completed
    SourceClosed,
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Io(err) => write!(f, "Asset IO error: {}", err),
            AssetError::Decode(msg) => write!(f, "Asset decode error: {}", msg),
            AssetError::SourceClosed => write!(f, "Asset source closed"),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Io(err) => Some(err),
            AssetError::Decode(_) => None,
            AssetError::SourceClosed => None,
        }
    }
}

impl From<io::Error> for AssetError {
    fn from(err: io::Error) -> Self {
        AssetError::Io(err)
    }
}

impl From<String> for AssetError {
    fn from(msg: String) -> Self {
        AssetError::Decode(msg)
    }
}

impl From<&str> for AssetError {
    fn from(msg: &str) -> Self {
        AssetError::Decode(msg.to_string())
    }
}
