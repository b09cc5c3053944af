// ============================================
// File: crates/petrel-common/src/lib.rs
// ============================================
//! # Petrel Common - Shared Wire Types Library
//!
//! ## Creation Reason
//! Provides the value types and base validation errors shared across the
//! Petrel secure channel crates, keeping the framing core free of
//! duplicated byte-level plumbing.
//!
//! ## Main Functionality
//! - [`types`]: Wire-level value types (`IdentityDigest`, `PeerEndpoint`)
//! - [`error`]: Base validation error type and result alias
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │               session layer (external)              │
//! │                        │                            │
//! │                        ▼                            │
//! │                  petrel-core                        │
//! │                        │                            │
//! │                        ▼                            │
//! │                 petrel-common  ◄── You are here     │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dependencies
//! - No internal crate dependencies (leaf node)
//! - Minimal external dependencies for maximum compatibility
//!
//! ## ⚠️ Important Note for Next Developer
//! - This crate is the foundation - changes affect everything
//! - Wire representations here are peer-visible; changing them is a
//!   protocol change, not a refactor
//! - All public types should implement standard traits (Debug, Clone, etc.)
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{CommonError, Result};
pub use types::{IdentityDigest, PeerEndpoint};
