// ============================================
// File: crates/petrel-core/src/error.rs
// ============================================
//! # Core Error Types
//!
//! ## Creation Reason
//! Defines the error taxonomy for frame parsing, sealing and encryption
//! in the Petrel core crate. The session layer drives different
//! peer-trust policies off these classes, so they must stay
//! distinguishable.
//!
//! ## Main Functionality
//! - `CoreError`: Primary error enum for core operations
//! - Classification helpers (`is_format_error`, `is_crypto_error`, ...)
//!
//! ## Error Categories
//! 1. **Format Errors**: Structural violations in a received frame
//! 2. **Authentication Errors**: Seal mismatch or missing required seal
//! 3. **Crypto Errors**: Algorithm, key or primitive failures
//! 4. **Capacity Errors**: Destination buffer sizing signal (non-fatal)
//!
//! ## Propagation Rules
//! All errors are local to a single frame and returned synchronously.
//! The core never retries and never logs a failure; the caller decides
//! whether to drop, log or penalize the remote peer.
//!
//! ## ⚠️ Important Note for Next Developer
//! - NEVER include key material in error messages
//! - A format error and an authentication error are different signals
//!   upstream; do not merge variants across classes
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use thiserror::Error;

use petrel_common::error::CommonError;

// ============================================
// Result Type Alias
// ============================================

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

// ============================================
// CoreError
// ============================================

/// Core error types for frame parsing, sealing and encryption.
///
/// # Security Note
/// Error messages are designed to be informative for debugging
/// without revealing sensitive information like key material.
#[derive(Error, Debug)]
pub enum CoreError {
    // ========================================
    // Format Errors
    // ========================================

    /// Frame body is too short to be valid.
    #[error("Frame too short: expected at least {expected} bytes, got {actual}")]
    MessageTooShort {
        /// Minimum expected length
        expected: usize,
        /// Actual length received
        actual: usize,
    },

    /// A declared length field claims more bytes than remain in the buffer.
    #[error("Length overrun in '{field}': claims {claimed} bytes, {remaining} remain")]
    LengthOverrun {
        /// Which variable-length field overran
        field: &'static str,
        /// Length the field declared
        claimed: usize,
        /// Bytes actually remaining in the buffer
        remaining: usize,
    },

    /// Frame body exceeds what the envelope length field can carry.
    #[error("Frame too large: max {max} bytes, got {actual}")]
    MessageTooLarge {
        /// Maximum allowed size
        max: usize,
        /// Actual size
        actual: usize,
    },

    /// Unknown or unsupported frame type tag.
    #[error("Unknown frame kind: 0x{0:02x}")]
    UnknownFrameKind(u8),

    /// Envelope version mismatch.
    #[error("Unsupported envelope version: {got}, expected {expected}")]
    UnsupportedVersion {
        /// Version received
        got: u8,
        /// Version expected
        expected: u8,
    },

    /// Auxiliary payload is not an exact multiple of its record size.
    #[error("Malformed auxiliary data: {actual} bytes is not a multiple of {record_size}")]
    MalformedAuxiliary {
        /// Fixed record size the payload must align to
        record_size: usize,
        /// Actual payload length
        actual: usize,
    },

    // ========================================
    // Authentication Errors
    // ========================================

    /// Recomputed seal does not match the one carried by the frame.
    #[error("Seal verification failed")]
    SealMismatch,

    /// Frame is unauthenticated and the caller's policy forbids that.
    #[error("Unauthenticated frame rejected by policy")]
    SealRequired,

    // ========================================
    // Crypto Errors
    // ========================================

    /// Algorithm identifier is not supported by this build.
    #[error("Unsupported algorithm: 0x{0:02x}")]
    UnsupportedAlgorithm(u8),

    /// Key material has the wrong length for the selected algorithm.
    #[error("Key length mismatch: expected {expected} bytes, got {actual}")]
    KeyLengthMismatch {
        /// Length the algorithm requires
        expected: usize,
        /// Length supplied
        actual: usize,
    },

    /// IV has the wrong length for the selected cipher.
    #[error("IV length mismatch: expected {expected} bytes, got {actual}")]
    IvLengthMismatch {
        /// Length the cipher requires
        expected: usize,
        /// Length supplied
        actual: usize,
    },

    /// The underlying cipher primitive failed.
    #[error("Cipher operation failed: {context}")]
    CipherFailure {
        /// What operation failed (never includes key material)
        context: String,
    },

    /// Requested seal digest is not compiled in and strict mode forbids
    /// falling back to a weaker one.
    #[error("Digest algorithm unavailable in this build: {digest}")]
    DigestUnavailable {
        /// Name of the unavailable digest
        digest: &'static str,
    },

    // ========================================
    // Capacity Errors
    // ========================================

    /// Destination buffer is smaller than the frame being written.
    ///
    /// This is a sizing signal, not a protocol violation: callers are
    /// expected to query the frame size, allocate, and retry.
    #[error("Destination buffer too small: need {required} bytes, have {available}")]
    BufferTooSmall {
        /// Bytes the frame requires
        required: usize,
        /// Bytes the caller supplied
        available: usize,
    },

    // ========================================
    // Wrapped Errors
    // ========================================

    /// Validation error from the common crate.
    #[error(transparent)]
    Common(#[from] CommonError),
}

impl CoreError {
    // ========================================
    // Convenience Constructors
    // ========================================

    /// Creates a `MessageTooShort` error.
    #[must_use]
    pub const fn too_short(expected: usize, actual: usize) -> Self {
        Self::MessageTooShort { expected, actual }
    }

    /// Creates a `LengthOverrun` error.
    #[must_use]
    pub const fn overrun(field: &'static str, claimed: usize, remaining: usize) -> Self {
        Self::LengthOverrun {
            field,
            claimed,
            remaining,
        }
    }

    /// Creates a `CipherFailure` error.
    pub fn cipher_failure(context: impl Into<String>) -> Self {
        Self::CipherFailure {
            context: context.into(),
        }
    }

    /// Creates a `BufferTooSmall` error.
    #[must_use]
    pub const fn buffer_too_small(required: usize, available: usize) -> Self {
        Self::BufferTooSmall {
            required,
            available,
        }
    }

    // ========================================
    // Error Classification
    // ========================================

    /// Returns `true` if this is a format error.
    ///
    /// Format errors indicate a structurally invalid frame; always fatal
    /// to the single frame only.
    #[must_use]
    pub const fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::MessageTooShort { .. }
                | Self::LengthOverrun { .. }
                | Self::MessageTooLarge { .. }
                | Self::UnknownFrameKind(_)
                | Self::UnsupportedVersion { .. }
                | Self::MalformedAuxiliary { .. }
                | Self::Common(_)
        )
    }

    /// Returns `true` if this is an authentication error.
    ///
    /// Authentication errors must block decryption from running.
    #[must_use]
    pub const fn is_authentication_error(&self) -> bool {
        matches!(self, Self::SealMismatch | Self::SealRequired)
    }

    /// Returns `true` if this is a cryptographic operation error.
    #[must_use]
    pub const fn is_crypto_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedAlgorithm(_)
                | Self::KeyLengthMismatch { .. }
                | Self::IvLengthMismatch { .. }
                | Self::CipherFailure { .. }
                | Self::DigestUnavailable { .. }
        )
    }

    /// Returns `true` if this is a capacity (sizing) signal.
    #[must_use]
    pub const fn is_capacity_error(&self) -> bool {
        matches!(self, Self::BufferTooSmall { .. })
    }

    /// Returns `true` if this error might indicate an attack.
    ///
    /// These errors warrant additional logging/monitoring upstream.
    #[must_use]
    pub const fn is_suspicious(&self) -> bool {
        matches!(
            self,
            Self::SealMismatch | Self::LengthOverrun { .. } | Self::SealRequired
        )
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::too_short(10, 4);
        assert!(err.to_string().contains("10"));
        assert!(err.to_string().contains('4'));

        let err = CoreError::overrun("iv", 600, 12);
        assert!(err.to_string().contains("iv"));
        assert!(err.to_string().contains("600"));
    }

    #[test]
    fn test_error_classification() {
        assert!(CoreError::too_short(10, 4).is_format_error());
        assert!(CoreError::overrun("hmac", 99, 0).is_format_error());

        assert!(CoreError::SealMismatch.is_authentication_error());
        assert!(CoreError::SealMismatch.is_suspicious());
        assert!(!CoreError::SealMismatch.is_format_error());

        assert!(CoreError::UnsupportedAlgorithm(0x7f).is_crypto_error());
        assert!(CoreError::buffer_too_small(64, 63).is_capacity_error());
        assert!(!CoreError::buffer_too_small(64, 63).is_suspicious());
    }

    #[test]
    fn test_classes_are_disjoint() {
        let errors = [
            CoreError::too_short(10, 4),
            CoreError::SealMismatch,
            CoreError::UnsupportedAlgorithm(0xff),
            CoreError::buffer_too_small(1, 0),
        ];
        for err in &errors {
            let classes = [
                err.is_format_error(),
                err.is_authentication_error(),
                err.is_crypto_error(),
                err.is_capacity_error(),
            ];
            assert_eq!(classes.iter().filter(|&&c| c).count(), 1, "{err}");
        }
    }

    #[test]
    fn test_common_error_conversion() {
        let common = CommonError::invalid_length(32, 16);
        let core: CoreError = common.into();
        assert!(matches!(core, CoreError::Common(_)));
        assert!(core.is_format_error());
    }
}
