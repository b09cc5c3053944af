// ============================================
// File: crates/petrel-core/src/lib.rs
// ============================================
//! # Petrel Core - Secure Datagram Framing Library
//!
//! ## Creation Reason
//! Implements the encrypted frame layer of the Petrel peer-to-peer
//! secure channel: building, parsing, sealing and verifying the
//! datagrams exchanged between established peers.
//!
//! ## Main Functionality
//! - [`protocol`]: Envelope and frame wire codecs, read/write paths
//! - [`crypto`]: Cipher codec, seal computation and verification
//! - [`error`]: Core error taxonomy with class predicates
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   session layer (external)                  │
//! │      key agreement, peer trust, retransmission policy       │
//! ├─────────────────────────────────────────────────────────────┤
//! │                       petrel-core  ◄── You are here         │
//! │                                                             │
//! │   send:    cleartext ─► encrypt ─► seal ─► frame ─► bytes   │
//! │   receive: bytes ─► parse ─► verify seal ─► decrypt ─► msg  │
//! ├─────────────────────────────────────────────────────────────┤
//! │                       petrel-common                         │
//! │              shared wire types and validation               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Security Model
//! - Session keys are agreed out of band and passed in per call; this
//!   crate never stores or derives key material
//! - Verify-then-decrypt is enforced structurally: decryption is only
//!   reachable through a frame whose seal check already passed
//! - Seal comparison is constant-time
//!
//! ## ⚠️ Important Note for Next Developer
//! - Every length field in a received frame is peer-controlled input
//! - The `strong-digests` feature gates SHA-256; constrained builds
//!   without it follow the explicit fallback policy in [`crypto::seal`]
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod crypto;
pub mod error;
pub mod protocol;

// Re-export commonly used items at crate root
pub use crypto::{CipherAlgorithm, DigestAlgorithm, SealMode, SealPolicy, SealStatus};
pub use error::{CoreError, Result};
pub use protocol::{Cleartext, Envelope, FrameKind, FrameView, SealedFrame};
