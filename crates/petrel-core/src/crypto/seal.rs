// ============================================
// File: crates/petrel-core/src/crypto/seal.rs
// ============================================
//! # Seal Computation and Verification
//!
//! ## Creation Reason
//! Implements the keyed seal that authenticates a frame's IV and
//! ciphertext before any decryption is attempted. Verify-then-decrypt is
//! a hard protocol rule; this module is the "verify" half.
//!
//! ## Main Functionality
//! - `compute_tag`: HMAC over the sealed region, sized to the target
//!   seal length (truncated or zero-expanded)
//! - `check_seal`: policy-driven verification with constant-time compare
//! - `resolve_digest`: availability check with explicit fallback rules
//! - `SealStatus`: observable verification outcome, including downgrades
//!
//! ## Fallback Rules
//! A digest missing from the build is substituted with
//! [`DigestAlgorithm::WEAK_FALLBACK`] only when the caller's policy is
//! not strict, and the substitution is always visible in the returned
//! `SealStatus`. Strict mode turns unavailability into a hard error.
//!
//! ## ⚠️ Important Note for Next Developer
//! - Seal comparison MUST stay constant-time (`subtle::ConstantTimeEq`)
//! - The sealed region is `iv_len..ciphertext_end`; the sequence number
//!   is NOT covered (historical wire format, peers depend on it)
//!
//! ## Last Modified
//! v0.1.0 - Initial seal verifier

use hmac::{Hmac, Mac};
use sha1::Sha1;
#[cfg(feature = "strong-digests")]
use sha2::Sha256;
use subtle::ConstantTimeEq;

use petrel_common::error::CommonError;

use crate::crypto::{DigestAlgorithm, SealMode, SealPolicy};
use crate::error::{CoreError, Result};

// ============================================
// SealStatus
// ============================================

/// Outcome of a successful seal check.
///
/// Carried by the sealed frame so the session layer can observe which
/// digest actually ran and whether a fallback occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SealStatus {
    /// The seal was recomputed and matched.
    Verified {
        /// Digest that actually performed the verification.
        digest: DigestAlgorithm,
        /// `true` if the requested digest was unavailable and the weak
        /// fallback substituted for it.
        downgraded: bool,
    },
    /// The frame carried no seal and the policy allowed that.
    Unauthenticated,
}

impl SealStatus {
    /// Returns `true` if the frame's seal was verified.
    #[must_use]
    pub const fn is_verified(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }

    /// Returns `true` if verification ran on a downgraded digest.
    #[must_use]
    pub const fn is_downgraded(&self) -> bool {
        matches!(self, Self::Verified { downgraded: true, .. })
    }
}

// ============================================
// Digest Resolution
// ============================================

/// Resolves the digest that will actually run, applying the fallback
/// policy for digests not compiled into this build.
///
/// # Returns
/// The effective digest and whether it is a downgrade.
///
/// # Errors
/// `DigestUnavailable` when the digest is missing and `strict` is set.
pub fn resolve_digest(
    requested: DigestAlgorithm,
    strict: bool,
) -> Result<(DigestAlgorithm, bool)> {
    if requested.is_available() {
        return Ok((requested, false));
    }
    if strict {
        return Err(CoreError::DigestUnavailable {
            digest: requested.name(),
        });
    }
    Ok((DigestAlgorithm::WEAK_FALLBACK, true))
}

// ============================================
// Tag Computation
// ============================================

fn raw_tag(digest: DigestAlgorithm, key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    match digest {
        #[cfg(feature = "strong-digests")]
        DigestAlgorithm::Sha256 => {
            let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(key)
                .map_err(|_| CoreError::cipher_failure("HMAC-SHA-256 key setup"))?;
            mac.update(data);
            Ok(mac.finalize().into_bytes().to_vec())
        }
        #[cfg(not(feature = "strong-digests"))]
        DigestAlgorithm::Sha256 => Err(CoreError::DigestUnavailable {
            digest: DigestAlgorithm::Sha256.name(),
        }),
        DigestAlgorithm::Sha1 => {
            let mut mac = <Hmac<Sha1> as Mac>::new_from_slice(key)
                .map_err(|_| CoreError::cipher_failure("HMAC-SHA-1 key setup"))?;
            mac.update(data);
            Ok(mac.finalize().into_bytes().to_vec())
        }
    }
}

/// Computes the seal over `data`, sized to exactly `tag_len` bytes.
///
/// Tags shorter than the raw digest are truncated; longer ones are
/// zero-expanded so both peers derive an identical value. No strength is
/// claimed for the padding bytes.
///
/// # Errors
/// - `Common(InvalidInput)` if `tag_len` is zero (zero means
///   "unauthenticated" on the wire and must not reach this function)
/// - `DigestUnavailable` if `digest` is not compiled in
pub fn compute_tag(
    digest: DigestAlgorithm,
    key: &[u8],
    data: &[u8],
    tag_len: usize,
) -> Result<Vec<u8>> {
    if tag_len == 0 {
        return Err(CommonError::invalid_input("tag_len", "must be non-zero").into());
    }

    let full = raw_tag(digest, key, data)?;
    let mut tag = vec![0u8; tag_len];
    let keep = tag_len.min(full.len());
    tag[..keep].copy_from_slice(&full[..keep]);
    Ok(tag)
}

// ============================================
// Seal Verification
// ============================================

/// Checks a frame's seal against the caller's session parameters.
///
/// # Arguments
/// * `mode` - Sealing configuration agreed for the session
/// * `policy` - Strict-mode and unauthenticated-frame policy
/// * `seal_key` - Seal key for the remote peer
/// * `sealed_region` - The `iv_len..ciphertext_end` slice of the body
/// * `stored_seal` - The seal bytes carried by the frame
///
/// # Errors
/// - `SealRequired` if the frame is unauthenticated (or sealing was
///   expected and no seal bytes are present) against a forbidding policy
/// - `SealMismatch` on any comparison failure
/// - `DigestUnavailable` under strict mode with a missing digest
pub fn check_seal(
    mode: &SealMode,
    policy: &SealPolicy,
    seal_key: &[u8],
    sealed_region: &[u8],
    stored_seal: &[u8],
) -> Result<SealStatus> {
    match *mode {
        SealMode::Unauthenticated => {
            if policy.allow_unauthenticated {
                Ok(SealStatus::Unauthenticated)
            } else {
                Err(CoreError::SealRequired)
            }
        }
        SealMode::Authenticated { digest, tag_len } => {
            if stored_seal.is_empty() {
                // Peer sent an explicitly unauthenticated frame on a
                // session that seals; never silently accept it.
                return Err(CoreError::SealRequired);
            }

            let (effective, downgraded) = resolve_digest(digest, policy.strict)?;
            let expected = compute_tag(effective, seal_key, sealed_region, tag_len)?;

            if stored_seal.len() != expected.len()
                || !bool::from(expected.ct_eq(stored_seal))
            {
                return Err(CoreError::SealMismatch);
            }

            Ok(SealStatus::Verified {
                digest: effective,
                downgraded,
            })
        }
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 32] = [0x11; 32];
    const DATA: &[u8] = b"0123456789 sealed region 9876543210";

    fn sealed_mode(digest: DigestAlgorithm, tag_len: usize) -> SealMode {
        SealMode::Authenticated { digest, tag_len }
    }

    #[test]
    fn test_tag_truncation_is_a_prefix() {
        let full = compute_tag(DigestAlgorithm::Sha1, &KEY, DATA, 20).unwrap();
        let short = compute_tag(DigestAlgorithm::Sha1, &KEY, DATA, 10).unwrap();
        assert_eq!(short, full[..10]);
    }

    #[test]
    fn test_tag_expansion_pads_with_zeros() {
        let full = compute_tag(DigestAlgorithm::Sha1, &KEY, DATA, 20).unwrap();
        let long = compute_tag(DigestAlgorithm::Sha1, &KEY, DATA, 32).unwrap();
        assert_eq!(long[..20], full[..]);
        assert!(long[20..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_zero_tag_len_is_rejected() {
        let result = compute_tag(DigestAlgorithm::Sha1, &KEY, DATA, 0);
        assert!(matches!(result, Err(CoreError::Common(_))));
    }

    #[test]
    fn test_check_seal_verifies_matching_tag() {
        let mode = sealed_mode(DigestAlgorithm::Sha1, 16);
        let tag = compute_tag(DigestAlgorithm::Sha1, &KEY, DATA, 16).unwrap();

        let status =
            check_seal(&mode, &SealPolicy::default(), &KEY, DATA, &tag).unwrap();
        assert_eq!(
            status,
            SealStatus::Verified {
                digest: DigestAlgorithm::Sha1,
                downgraded: false
            }
        );
        assert!(status.is_verified());
        assert!(!status.is_downgraded());
    }

    #[test]
    fn test_check_seal_rejects_tampered_tag() {
        let mode = sealed_mode(DigestAlgorithm::Sha1, 16);
        let mut tag = compute_tag(DigestAlgorithm::Sha1, &KEY, DATA, 16).unwrap();
        tag[3] ^= 0x01;

        let result = check_seal(&mode, &SealPolicy::default(), &KEY, DATA, &tag);
        assert!(matches!(result, Err(CoreError::SealMismatch)));
    }

    #[test]
    fn test_check_seal_rejects_wrong_length_tag() {
        let mode = sealed_mode(DigestAlgorithm::Sha1, 16);
        let tag = compute_tag(DigestAlgorithm::Sha1, &KEY, DATA, 16).unwrap();

        let result = check_seal(&mode, &SealPolicy::default(), &KEY, DATA, &tag[..15]);
        assert!(matches!(result, Err(CoreError::SealMismatch)));
    }

    #[test]
    fn test_check_seal_rejects_wrong_key() {
        let mode = sealed_mode(DigestAlgorithm::Sha1, 16);
        let tag = compute_tag(DigestAlgorithm::Sha1, &KEY, DATA, 16).unwrap();

        let mut wrong_key = KEY;
        wrong_key[0] ^= 0x80;
        let result = check_seal(&mode, &SealPolicy::default(), &wrong_key, DATA, &tag);
        assert!(matches!(result, Err(CoreError::SealMismatch)));
    }

    #[test]
    fn test_unauthenticated_requires_explicit_opt_in() {
        let mode = SealMode::Unauthenticated;

        let result = check_seal(&mode, &SealPolicy::default(), &KEY, DATA, &[]);
        assert!(matches!(result, Err(CoreError::SealRequired)));

        let permissive = SealPolicy {
            allow_unauthenticated: true,
            ..SealPolicy::default()
        };
        let status = check_seal(&mode, &permissive, &KEY, DATA, &[]).unwrap();
        assert_eq!(status, SealStatus::Unauthenticated);
        assert!(!status.is_verified());
    }

    #[test]
    fn test_sealed_session_rejects_sealless_frame() {
        let mode = sealed_mode(DigestAlgorithm::Sha1, 16);
        let result = check_seal(&mode, &SealPolicy::default(), &KEY, DATA, &[]);
        assert!(matches!(result, Err(CoreError::SealRequired)));
    }

    #[cfg(feature = "strong-digests")]
    #[test]
    fn test_sha256_no_downgrade_when_available() {
        let (digest, downgraded) = resolve_digest(DigestAlgorithm::Sha256, true).unwrap();
        assert_eq!(digest, DigestAlgorithm::Sha256);
        assert!(!downgraded);
    }

    #[cfg(not(feature = "strong-digests"))]
    #[test]
    fn test_missing_sha256_follows_policy() {
        // Strict mode: hard error, never a silent downgrade
        let result = resolve_digest(DigestAlgorithm::Sha256, true);
        assert!(matches!(result, Err(CoreError::DigestUnavailable { .. })));

        // Relaxed mode: observable downgrade to the weak fallback
        let (digest, downgraded) = resolve_digest(DigestAlgorithm::Sha256, false).unwrap();
        assert_eq!(digest, DigestAlgorithm::WEAK_FALLBACK);
        assert!(downgraded);
    }
}
