// ============================================
// File: crates/petrel-core/src/protocol/mod.rs
// ============================================
//! # Protocol Module
//!
//! ## Creation Reason
//! Defines the Petrel secure datagram wire format: the outer envelope,
//! the encrypted frame body, and the auxiliary control payloads.
//!
//! ## Main Functionality
//!
//! ### Submodules
//! - [`messages`]: Frame kinds and typed cleartext payloads
//! - [`envelope`]: Outer envelope (version, type, length)
//! - [`frame`]: Read path - validated frame views, seal checking
//! - [`codec`]: Write path - frame construction and sizing
//! - [`aux`]: Digest-list and contact-map codecs
//!
//! ## Frame Body Layout
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ sequence_number (4 bytes)     │ sender counter       │
//! ├──────────────────────────────────────────────────────┤
//! │ iv_len (2) ‖ iv (iv_len)      │ fresh per frame      │
//! ├──────────────────────────────────────────────────────┤
//! │ ciphertext_len (2) ‖ ct       │ encrypted cleartext  │
//! ├──────────────────────────────────────────────────────┤
//! │ hmac_len (2) ‖ hmac           │ 0 ⇒ unauthenticated  │
//! └──────────────────────────────────────────────────────┘
//! ```
//! All multi-byte integers are network byte order. The seal covers the
//! `iv_len..ciphertext_end` span.
//!
//! ## Receive-Path State Machine
//! RAW → FORMAT_CHECKED → SEALED_OK → DECRYPTED → INTERPRETED; every
//! failed transition is terminal for that frame only.
//!
//! ## ⚠️ Important Note for Next Developer
//! - Field offsets are chained: each depends on the declared length of
//!   the field before it, and those lengths are peer-controlled.
//!   Validate before deriving, always
//! - Big endian on the wire; do not mirror host byte order
//!
//! ## Last Modified
//! v0.1.0 - Initial protocol definitions

pub mod aux;
pub mod codec;
pub mod envelope;
pub mod frame;
pub mod messages;

// Re-export primary types
pub use envelope::{Envelope, ENVELOPE_HEADER_SIZE, ENVELOPE_VERSION};
pub use frame::{FrameView, SealedFrame};
pub use messages::{Cleartext, FrameKind};

// ============================================
// Wire Constants
// ============================================

/// Size of the sequence-number field in bytes.
pub const SEQUENCE_NUMBER_SIZE: usize = 4;

/// Size of each variable-field length prefix in bytes.
pub const LENGTH_FIELD_SIZE: usize = 2;

/// Size of the channel-number prefix inside a data frame's cleartext.
pub const CHANNEL_NUMBER_SIZE: usize = 2;

/// Minimum valid frame body: the sequence number plus the three length
/// fields, each declaring zero bytes.
pub const MIN_BODY_LENGTH: usize = SEQUENCE_NUMBER_SIZE + 3 * LENGTH_FIELD_SIZE;
