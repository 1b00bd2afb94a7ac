//! Error types for `RipperCore`

use thiserror::Error;

/// The error type for `RipperCore` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== Decode Errors ====================
    /// A read ran past the end of the asset's region.
    #[error("truncated input at offset {offset}: needed {needed} bytes, {available} available")]
    TruncatedInput {
        /// Cursor position (relative to the region start) where the read began.
        offset: usize,
        /// Number of bytes the read required.
        needed: usize,
        /// Number of bytes left in the region.
        available: usize,
    },

    /// A mandatory vertex channel is missing for the requested operation.
    #[error("required channel absent: {channel}")]
    RequiredChannelAbsent {
        /// Name of the missing channel.
        channel: &'static str,
    },

    /// Channel format/dimension combination the codec does not handle.
    #[error("unsupported channel format {format} with dimension {dimension}")]
    UnsupportedChannelFormat {
        /// Raw format code.
        format: u8,
        /// Component count.
        dimension: u8,
    },

    /// A format revision with no known layout branch.
    #[error("unsupported revision {version}: {context}")]
    UnsupportedRevision {
        /// Printed format version.
        version: String,
        /// What could not be handled.
        context: String,
    },

    // ==================== Input Errors ====================
    /// A format version string could not be parsed.
    #[error("invalid format version: {0}")]
    InvalidVersion(String),

    /// Caller-supplied input is inconsistent.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    // ==================== Registry Errors ====================
    /// A file with the same name is already registered.
    #[error("file already loaded: {0}")]
    DuplicateFile(String),

    // ==================== Export Errors ====================
    /// JSON rendering of an export document failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Byte offset carried by the error, when the failure happened at a known position.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::TruncatedInput { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

/// A specialized Result type for `RipperCore` operations.
pub type Result<T> = std::result::Result<T, Error>;
