// ============================================
// File: crates/petrel-core/src/crypto/mod.rs
// ============================================
//! # Cryptography Module
//!
//! ## Creation Reason
//! Centralizes the cryptographic half of the framing core: cipher
//! orchestration, seal computation/verification, and the algorithm
//! descriptors both peers agree on at session setup.
//!
//! ## Main Functionality
//!
//! ### Submodules
//! - [`algorithms`]: Cipher/digest descriptors, seal mode and policy
//! - [`cipher`]: Cipher codec (AES-CBC encrypt/decrypt)
//! - [`seal`]: Seal computation, verification and fallback policy
//!
//! ## Cryptographic Design
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Send Path                             │
//! │                                                             │
//! │  cleartext ──► AES-CBC(enc_key, fresh IV) ──► ciphertext    │
//! │  iv_len ‖ iv ‖ ct_len ‖ ct ──► HMAC(seal_key) ──► seal      │
//! │                                                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      Receive Path                           │
//! │                                                             │
//! │  seal check (constant-time) ──► only then ──► AES-CBC⁻¹     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Security Properties
//! - **Confidentiality**: AES-CBC with a fresh random IV per frame
//! - **Integrity**: keyed seal over the IV and ciphertext fields
//! - **Verify-then-decrypt**: enforced by the frame type-state, so a
//!   forged ciphertext never reaches the block cipher
//!
//! ## ⚠️ Important Note for Next Developer
//! - ALL implementations use RustCrypto (audited)
//! - NEVER roll your own crypto
//! - Key material is borrowed from the caller and never retained
//!
//! ## Last Modified
//! v0.1.0 - Initial crypto module

pub mod algorithms;
pub mod cipher;
pub mod seal;

// Re-export primary types at module level
pub use algorithms::{CipherAlgorithm, DigestAlgorithm, SealMode, SealPolicy};
pub use seal::SealStatus;
