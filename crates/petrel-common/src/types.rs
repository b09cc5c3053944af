// ============================================
// File: crates/petrel-common/src/types.rs
// ============================================
//! # Wire-Level Type Definitions
//!
//! ## Creation Reason
//! Centralizes the value types that appear inside Petrel control frames,
//! ensuring type safety and a single source of truth for their wire
//! representations.
//!
//! ## Main Functionality
//! - `IdentityDigest`: Fixed-width digest identifying a peer (32 bytes)
//! - `PeerEndpoint`: Reachable peer address with a fixed 18-byte wire form
//! - `ChannelNumber` / `SequenceNumber`: Protocol integer aliases
//!
//! ## Main Logical Flow
//! 1. Types are produced by the session layer (peer discovery, key setup)
//! 2. Carried inside encrypted contact and contact-request frames
//! 3. Serialized to fixed-width records by the auxiliary codec
//!
//! ## ⚠️ Important Note for Next Developer
//! - Wire widths here are part of the protocol; the auxiliary codec's
//!   exact-multiple validation depends on them staying fixed
//! - IPv4 endpoints travel v4-mapped so every record is the same width
//!
//! ## Last Modified
//! v0.1.0 - Initial type definitions

use std::fmt;
use std::net::{IpAddr, Ipv6Addr, SocketAddr};

use serde::{Deserialize, Serialize};

use crate::error::{CommonError, Result};

// ============================================
// Constants
// ============================================

/// Size of an identity digest in bytes (SHA-256 width).
pub const DIGEST_SIZE: usize = 32;

/// Size of a serialized peer endpoint in bytes (address + port).
pub const ENDPOINT_WIRE_SIZE: usize = 18;

// ============================================
// Protocol Integer Aliases
// ============================================

/// Application-level multiplexing tag carried inside a data frame.
pub type ChannelNumber = u16;

/// Sender-assigned frame counter (ordering is enforced upstream).
pub type SequenceNumber = u32;

// ============================================
// IdentityDigest
// ============================================

/// Fixed-width digest identifying a peer.
///
/// # Purpose
/// Peers advertise and request contacts by the digest of their identity
/// certificate rather than the certificate itself. The digest is opaque
/// to this layer: it is compared, ordered and copied, never recomputed.
///
/// # Wire Format
/// Exactly [`DIGEST_SIZE`] raw bytes, no length prefix. Lists of digests
/// are validated as exact multiples of this width.
///
/// # Example
/// ```
/// use petrel_common::types::{IdentityDigest, DIGEST_SIZE};
///
/// let digest = IdentityDigest::from_bytes(&[0xab; DIGEST_SIZE]).unwrap();
/// assert_eq!(digest.as_bytes().len(), DIGEST_SIZE);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IdentityDigest([u8; DIGEST_SIZE]);

impl IdentityDigest {
    /// Creates an identity digest from raw bytes.
    ///
    /// # Errors
    /// Returns `InvalidLength` if `bytes` is not exactly [`DIGEST_SIZE`]
    /// bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != DIGEST_SIZE {
            return Err(CommonError::invalid_length(DIGEST_SIZE, bytes.len()));
        }
        let mut digest = [0u8; DIGEST_SIZE];
        digest.copy_from_slice(bytes);
        Ok(Self(digest))
    }

    /// Returns the raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    /// Returns the raw digest bytes (owned).
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; DIGEST_SIZE] {
        self.0
    }

    /// Generates a random digest for tests.
    #[cfg(test)]
    #[must_use]
    pub fn random() -> Self {
        use rand::RngCore;
        let mut digest = [0u8; DIGEST_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut digest);
        Self(digest)
    }
}

impl fmt::Debug for IdentityDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only show first 4 bytes; full digests bloat logs
        write!(
            f,
            "IdentityDigest({:02x}{:02x}{:02x}{:02x}...)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

impl fmt::Display for IdentityDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl Serialize for IdentityDigest {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for IdentityDigest {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            if s.len() != DIGEST_SIZE * 2 {
                return Err(serde::de::Error::invalid_length(s.len(), &"64 hex chars"));
            }
            let mut digest = [0u8; DIGEST_SIZE];
            for (i, chunk) in s.as_bytes().chunks_exact(2).enumerate() {
                let pair = std::str::from_utf8(chunk).map_err(serde::de::Error::custom)?;
                digest[i] =
                    u8::from_str_radix(pair, 16).map_err(serde::de::Error::custom)?;
            }
            Ok(Self(digest))
        } else {
            let bytes = <Vec<u8>>::deserialize(deserializer)?;
            Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
        }
    }
}

// ============================================
// PeerEndpoint
// ============================================

/// Reachable endpoint for a peer, carried inside contact frames.
///
/// # Wire Format (18 bytes)
/// ```text
/// ┌────────────────────────────────────────────┐
/// │ address (16 bytes)  │ IPv6, or IPv4 mapped │
/// ├────────────────────────────────────────────┤
/// │ port (2 bytes)      │ network byte order   │
/// └────────────────────────────────────────────┘
/// ```
///
/// IPv4 addresses are carried in their v4-mapped IPv6 form so that every
/// contact record has the same width, which lets the auxiliary codec
/// enforce exact-multiple validation on contact maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerEndpoint(SocketAddr);

impl PeerEndpoint {
    /// Creates an endpoint from a socket address.
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self(addr)
    }

    /// Returns the socket address.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        self.0
    }

    /// Serializes the endpoint into its fixed 18-byte wire form.
    #[must_use]
    pub fn to_wire(&self) -> [u8; ENDPOINT_WIRE_SIZE] {
        let mut wire = [0u8; ENDPOINT_WIRE_SIZE];
        let v6 = match self.0.ip() {
            IpAddr::V4(v4) => v4.to_ipv6_mapped(),
            IpAddr::V6(v6) => v6,
        };
        wire[..16].copy_from_slice(&v6.octets());
        wire[16..].copy_from_slice(&self.0.port().to_be_bytes());
        wire
    }

    /// Deserializes an endpoint from its fixed wire form.
    ///
    /// V4-mapped addresses are demoted back to IPv4 so that round-trips
    /// preserve the caller's address family.
    ///
    /// # Errors
    /// Returns `InvalidLength` if `bytes` is not exactly
    /// [`ENDPOINT_WIRE_SIZE`] bytes long.
    pub fn from_wire(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != ENDPOINT_WIRE_SIZE {
            return Err(CommonError::invalid_length(ENDPOINT_WIRE_SIZE, bytes.len()));
        }
        let mut octets = [0u8; 16];
        octets.copy_from_slice(&bytes[..16]);
        let v6 = Ipv6Addr::from(octets);
        let ip = match v6.to_ipv4_mapped() {
            Some(v4) => IpAddr::V4(v4),
            None => IpAddr::V6(v6),
        };
        let port = u16::from_be_bytes([bytes[16], bytes[17]]);
        Ok(Self(SocketAddr::new(ip, port)))
    }
}

impl fmt::Display for PeerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SocketAddr> for PeerEndpoint {
    fn from(addr: SocketAddr) -> Self {
        Self(addr)
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_from_bytes_validates_length() {
        assert!(IdentityDigest::from_bytes(&[0u8; DIGEST_SIZE]).is_ok());
        assert!(IdentityDigest::from_bytes(&[0u8; 16]).is_err());
        assert!(IdentityDigest::from_bytes(&[]).is_err());
    }

    #[test]
    fn test_digest_debug_is_truncated() {
        let digest = IdentityDigest::from_bytes(&[0xab; DIGEST_SIZE]).unwrap();
        let debug = format!("{digest:?}");
        assert!(debug.contains("abababab"));
        assert!(debug.contains("..."));
        assert!(debug.len() < DIGEST_SIZE * 2);
    }

    #[test]
    fn test_digest_serde_roundtrip() {
        let digest = IdentityDigest::random();
        let json = serde_json::to_string(&digest).unwrap();
        let restored: IdentityDigest = serde_json::from_str(&json).unwrap();
        assert_eq!(digest, restored);
    }

    #[test]
    fn test_digest_ordering_is_stable() {
        let low = IdentityDigest::from_bytes(&[0u8; DIGEST_SIZE]).unwrap();
        let high = IdentityDigest::from_bytes(&[1u8; DIGEST_SIZE]).unwrap();
        assert!(low < high);
    }

    #[test]
    fn test_endpoint_wire_roundtrip_v4() {
        let endpoint = PeerEndpoint::new("192.0.2.17:12000".parse().unwrap());
        let wire = endpoint.to_wire();
        assert_eq!(wire.len(), ENDPOINT_WIRE_SIZE);

        let restored = PeerEndpoint::from_wire(&wire).unwrap();
        assert_eq!(endpoint, restored);
        assert!(restored.socket_addr().is_ipv4());
    }

    #[test]
    fn test_endpoint_wire_roundtrip_v6() {
        let endpoint = PeerEndpoint::new("[2001:db8::42]:443".parse().unwrap());
        let restored = PeerEndpoint::from_wire(&endpoint.to_wire()).unwrap();
        assert_eq!(endpoint, restored);
        assert!(restored.socket_addr().is_ipv6());
    }

    #[test]
    fn test_endpoint_from_wire_validates_length() {
        assert!(PeerEndpoint::from_wire(&[0u8; 17]).is_err());
        assert!(PeerEndpoint::from_wire(&[0u8; 19]).is_err());
    }
}
