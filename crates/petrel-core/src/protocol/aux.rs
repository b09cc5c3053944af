// ============================================
// File: crates/petrel-core/src/protocol/aux.rs
// ============================================
//! # Auxiliary Payload Codecs
//!
//! ## Creation Reason
//! Encodes and decodes the two control-message payload structures that
//! travel encrypted inside contact and contact-request frames.
//!
//! ## Main Functionality
//! - `parse_digest_list` / `write_digest_list`: ordered digest sequences
//! - `parse_contact_map` / `write_contact_map`: digest → endpoint records
//!
//! ## Alignment Rule
//! Both payloads are sequences of fixed-width records. An input whose
//! length is not an exact multiple of the record size is malformed in
//! its entirety - it is never truncated to the last whole record.
//!
//! ## ⚠️ Important Note for Next Developer
//! - Contact records are written in digest order (BTreeMap iteration),
//!   which keeps encodings deterministic across peers
//!
//! ## Last Modified
//! v0.1.0 - Initial auxiliary codecs

use std::collections::BTreeMap;

use petrel_common::types::{IdentityDigest, PeerEndpoint, DIGEST_SIZE, ENDPOINT_WIRE_SIZE};

use crate::error::{CoreError, Result};

// ============================================
// Constants
// ============================================

/// Size of one contact record: digest followed by endpoint.
pub const CONTACT_RECORD_SIZE: usize = DIGEST_SIZE + ENDPOINT_WIRE_SIZE;

// ============================================
// ContactMap
// ============================================

/// Mapping from peer identity digest to reachable endpoint.
///
/// Ordered so that encoding the same map always yields the same bytes.
pub type ContactMap = BTreeMap<IdentityDigest, PeerEndpoint>;

// ============================================
// Digest Lists
// ============================================

/// Parses an ordered digest list from a decrypted payload.
///
/// # Errors
/// `MalformedAuxiliary` if `buf` is not an exact multiple of
/// [`DIGEST_SIZE`].
pub fn parse_digest_list(buf: &[u8]) -> Result<Vec<IdentityDigest>> {
    if buf.len() % DIGEST_SIZE != 0 {
        return Err(CoreError::MalformedAuxiliary {
            record_size: DIGEST_SIZE,
            actual: buf.len(),
        });
    }

    buf.chunks_exact(DIGEST_SIZE)
        .map(|chunk| IdentityDigest::from_bytes(chunk).map_err(CoreError::from))
        .collect()
}

/// Serializes an ordered digest list.
#[must_use]
pub fn write_digest_list(digests: &[IdentityDigest]) -> Vec<u8> {
    let mut out = Vec::with_capacity(digests.len() * DIGEST_SIZE);
    for digest in digests {
        out.extend_from_slice(digest.as_bytes());
    }
    out
}

// ============================================
// Contact Maps
// ============================================

/// Parses a contact map from a decrypted payload.
///
/// Duplicate digests keep the last record, matching map-insertion
/// semantics on the sending side.
///
/// # Errors
/// `MalformedAuxiliary` if `buf` is not an exact multiple of
/// [`CONTACT_RECORD_SIZE`].
pub fn parse_contact_map(buf: &[u8]) -> Result<ContactMap> {
    if buf.len() % CONTACT_RECORD_SIZE != 0 {
        return Err(CoreError::MalformedAuxiliary {
            record_size: CONTACT_RECORD_SIZE,
            actual: buf.len(),
        });
    }

    let mut map = ContactMap::new();
    for record in buf.chunks_exact(CONTACT_RECORD_SIZE) {
        let digest = IdentityDigest::from_bytes(&record[..DIGEST_SIZE])?;
        let endpoint = PeerEndpoint::from_wire(&record[DIGEST_SIZE..])?;
        map.insert(digest, endpoint);
    }
    Ok(map)
}

/// Serializes a contact map into fixed-width records.
#[must_use]
pub fn write_contact_map(contacts: &ContactMap) -> Vec<u8> {
    let mut out = Vec::with_capacity(contacts.len() * CONTACT_RECORD_SIZE);
    for (digest, endpoint) in contacts {
        out.extend_from_slice(digest.as_bytes());
        out.extend_from_slice(&endpoint.to_wire());
    }
    out
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(addr: &str) -> PeerEndpoint {
        PeerEndpoint::new(addr.parse().unwrap())
    }

    #[test]
    fn test_digest_list_roundtrip() {
        let digests = vec![
            IdentityDigest::from_bytes(&[0x01; DIGEST_SIZE]).unwrap(),
            IdentityDigest::from_bytes(&[0x02; DIGEST_SIZE]).unwrap(),
            IdentityDigest::from_bytes(&[0x03; DIGEST_SIZE]).unwrap(),
        ];
        let encoded = write_digest_list(&digests);
        assert_eq!(encoded.len(), 3 * DIGEST_SIZE);

        let parsed = parse_digest_list(&encoded).unwrap();
        assert_eq!(parsed, digests);
    }

    #[test]
    fn test_digest_list_preserves_order() {
        let digests = vec![
            IdentityDigest::from_bytes(&[0xff; DIGEST_SIZE]).unwrap(),
            IdentityDigest::from_bytes(&[0x00; DIGEST_SIZE]).unwrap(),
        ];
        let parsed = parse_digest_list(&write_digest_list(&digests)).unwrap();
        assert_eq!(parsed, digests);
    }

    #[test]
    fn test_digest_list_alignment() {
        // 50 bytes is not a multiple of 32: malformed
        assert!(matches!(
            parse_digest_list(&[0u8; 50]),
            Err(CoreError::MalformedAuxiliary {
                record_size: DIGEST_SIZE,
                actual: 50
            })
        ));

        // 64 bytes yields exactly two digests
        let parsed = parse_digest_list(&[0u8; 64]).unwrap();
        assert_eq!(parsed.len(), 2);

        // Empty list is a valid (empty) request
        assert!(parse_digest_list(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_contact_map_roundtrip() {
        let mut contacts = ContactMap::new();
        contacts.insert(
            IdentityDigest::from_bytes(&[0x0a; DIGEST_SIZE]).unwrap(),
            endpoint("192.0.2.1:12000"),
        );
        contacts.insert(
            IdentityDigest::from_bytes(&[0x0b; DIGEST_SIZE]).unwrap(),
            endpoint("[2001:db8::7]:443"),
        );

        let encoded = write_contact_map(&contacts);
        assert_eq!(encoded.len(), 2 * CONTACT_RECORD_SIZE);

        let parsed = parse_contact_map(&encoded).unwrap();
        assert_eq!(parsed, contacts);
    }

    #[test]
    fn test_contact_map_alignment() {
        let result = parse_contact_map(&[0u8; CONTACT_RECORD_SIZE + 1]);
        assert!(matches!(
            result,
            Err(CoreError::MalformedAuxiliary {
                record_size: CONTACT_RECORD_SIZE,
                ..
            })
        ));

        assert!(parse_contact_map(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_contact_map_encoding_is_deterministic() {
        let mut a = ContactMap::new();
        let mut b = ContactMap::new();
        let d1 = IdentityDigest::from_bytes(&[0x01; DIGEST_SIZE]).unwrap();
        let d2 = IdentityDigest::from_bytes(&[0x02; DIGEST_SIZE]).unwrap();
        let ep = endpoint("198.51.100.9:5000");

        a.insert(d1, ep);
        a.insert(d2, ep);
        b.insert(d2, ep);
        b.insert(d1, ep);

        assert_eq!(write_contact_map(&a), write_contact_map(&b));
    }
}
