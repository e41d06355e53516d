//! Error handling for the DSP kernels
//!
//! The numeric kernels themselves are total functions over fixed-size
//! buffers. Errors only surface at the edges: slice-based entry points
//! whose lengths do not match the kernel, malformed codebooks and invalid
//! analysis configuration.

#![allow(missing_docs)]

use std::fmt;
use thiserror::Error;

/// Result type alias for DSP operations
pub type Result<T> = std::result::Result<T, DspError>;

/// Error type for DSP operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DspError {
    /// Invalid analysis configuration
    #[error("Invalid configuration: {details}")]
    InvalidConfig { details: String },

    /// Buffer length does not match the kernel's fixed size
    #[error("Invalid frame size: expected {expected}, got {actual}")]
    InvalidFrameSize { expected: usize, actual: usize },

    /// Buffer too small to hold the required history or output
    #[error("Buffer too small: need {needed} samples, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    /// Codebook shape is inconsistent with its dimension
    #[error("Invalid codebook: {details}")]
    InvalidCodebook { details: String },

    /// Internal error (should not occur in normal operation)
    #[error("Internal error: {message} (this is a bug, please report it)")]
    InternalError { message: String },
}

impl DspError {
    /// Create a new invalid configuration error
    pub fn invalid_config(details: impl Into<String>) -> Self {
        Self::InvalidConfig {
            details: details.into(),
        }
    }

    /// Create a new invalid codebook error
    pub fn invalid_codebook(details: impl Into<String>) -> Self {
        Self::InvalidCodebook {
            details: details.into(),
        }
    }

    /// Create a new internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Check if this error is recoverable
    ///
    /// Length mismatches are recoverable by resubmitting a correctly sized
    /// buffer; configuration and codebook errors need a code change.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidFrameSize { .. } | Self::BufferTooSmall { .. } => true,

            Self::InvalidConfig { .. }
            | Self::InvalidCodebook { .. }
            | Self::InternalError { .. } => false,
        }
    }

    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidConfig { .. } | Self::InvalidCodebook { .. } => {
                ErrorCategory::Configuration
            }
            Self::InvalidFrameSize { .. } => ErrorCategory::Processing,
            Self::BufferTooSmall { .. } => ErrorCategory::Memory,
            Self::InternalError { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error category for grouping related errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Configuration and parameter errors
    Configuration,
    /// Signal processing errors
    Processing,
    /// Buffer sizing errors
    Memory,
    /// Internal library errors
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::Processing => write!(f, "Processing"),
            Self::Memory => write!(f, "Memory"),
            Self::Internal => write!(f, "Internal"),
        }
    }
}
