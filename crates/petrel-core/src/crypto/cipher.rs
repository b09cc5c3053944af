// ============================================
// File: crates/petrel-core/src/crypto/cipher.rs
// ============================================
//! # Cipher Codec
//!
//! ## Creation Reason
//! Thin orchestration over the RustCrypto block-cipher primitives:
//! selects the cipher by descriptor, validates key and IV lengths, and
//! maps primitive failures into the core error taxonomy.
//!
//! ## Main Functionality
//! - `encrypt` / `decrypt`: CBC with PKCS#7 padding, atomic output
//! - `ciphertext_size`: exact padded size for frame sizing
//!
//! ## Protocol Rule
//! `decrypt` must only run after seal verification succeeds. The frame
//! layer enforces this with a type-state (`SealedFrame`); nothing in this
//! module may be reachable from an unverified frame.
//!
//! ## ⚠️ Important Note for Next Developer
//! - ALL implementations use RustCrypto (audited); NEVER roll your own
//! - A padding failure on decrypt means a wrong key or corrupted
//!   ciphertext; report it, never return partial plaintext
//!
//! ## Last Modified
//! v0.1.0 - Initial cipher codec

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use crate::crypto::CipherAlgorithm;
use crate::error::{CoreError, Result};

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;
type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

// ============================================
// Size Queries
// ============================================

/// Returns the exact ciphertext size for a cleartext of `cleartext_len`
/// bytes under `alg`.
///
/// PKCS#7 always pads, so the result is the next block multiple strictly
/// greater than `cleartext_len`.
#[must_use]
pub const fn ciphertext_size(alg: CipherAlgorithm, cleartext_len: usize) -> usize {
    let block = alg.block_size();
    (cleartext_len / block + 1) * block
}

// ============================================
// Validation
// ============================================

fn check_lengths(alg: CipherAlgorithm, key: &[u8], iv: &[u8]) -> Result<()> {
    if key.len() != alg.key_size() {
        return Err(CoreError::KeyLengthMismatch {
            expected: alg.key_size(),
            actual: key.len(),
        });
    }
    if iv.len() != alg.iv_size() {
        return Err(CoreError::IvLengthMismatch {
            expected: alg.iv_size(),
            actual: iv.len(),
        });
    }
    Ok(())
}

// ============================================
// Encrypt / Decrypt
// ============================================

/// Encrypts `cleartext` under `alg` with the given key and IV.
///
/// # Returns
/// The complete padded ciphertext; output is all-or-nothing.
///
/// # Errors
/// - `KeyLengthMismatch` / `IvLengthMismatch` on bad key material sizes
/// - `CipherFailure` if the primitive rejects its inputs
pub fn encrypt(
    alg: CipherAlgorithm,
    key: &[u8],
    iv: &[u8],
    cleartext: &[u8],
) -> Result<Vec<u8>> {
    check_lengths(alg, key, iv)?;

    let ciphertext = match alg {
        CipherAlgorithm::Aes128Cbc => Aes128CbcEnc::new_from_slices(key, iv)
            .map_err(|_| CoreError::cipher_failure("AES-128-CBC init"))?
            .encrypt_padded_vec_mut::<Pkcs7>(cleartext),
        CipherAlgorithm::Aes256Cbc => Aes256CbcEnc::new_from_slices(key, iv)
            .map_err(|_| CoreError::cipher_failure("AES-256-CBC init"))?
            .encrypt_padded_vec_mut::<Pkcs7>(cleartext),
    };

    debug_assert_eq!(ciphertext.len(), ciphertext_size(alg, cleartext.len()));
    Ok(ciphertext)
}

/// Decrypts `ciphertext` under `alg` with the given key and IV.
///
/// Must only be called on ciphertext taken from a seal-verified frame;
/// see the module docs.
///
/// # Errors
/// - `KeyLengthMismatch` / `IvLengthMismatch` on bad key material sizes
/// - `CipherFailure` if the ciphertext is not block-aligned or the
///   padding does not verify (wrong key or corruption)
pub fn decrypt(
    alg: CipherAlgorithm,
    key: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    check_lengths(alg, key, iv)?;

    if ciphertext.is_empty() || ciphertext.len() % alg.block_size() != 0 {
        return Err(CoreError::cipher_failure(format!(
            "ciphertext length {} is not a positive multiple of the {}-byte block",
            ciphertext.len(),
            alg.block_size()
        )));
    }

    match alg {
        CipherAlgorithm::Aes128Cbc => Aes128CbcDec::new_from_slices(key, iv)
            .map_err(|_| CoreError::cipher_failure("AES-128-CBC init"))?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| CoreError::cipher_failure("PKCS#7 padding check")),
        CipherAlgorithm::Aes256Cbc => Aes256CbcDec::new_from_slices(key, iv)
            .map_err(|_| CoreError::cipher_failure("AES-256-CBC init"))?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| CoreError::cipher_failure("PKCS#7 padding check")),
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_256: [u8; 32] = [0x42; 32];
    const KEY_128: [u8; 16] = [0x42; 16];
    const IV: [u8; 16] = [0x24; 16];

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let cleartext = b"attack at dawn";
        let ciphertext =
            encrypt(CipherAlgorithm::Aes256Cbc, &KEY_256, &IV, cleartext).unwrap();
        assert_ne!(&ciphertext[..cleartext.len()], cleartext.as_slice());

        let decrypted =
            decrypt(CipherAlgorithm::Aes256Cbc, &KEY_256, &IV, &ciphertext).unwrap();
        assert_eq!(decrypted, cleartext);
    }

    #[test]
    fn test_roundtrip_aes128() {
        let cleartext = vec![0x5a; 333];
        let ciphertext =
            encrypt(CipherAlgorithm::Aes128Cbc, &KEY_128, &IV, &cleartext).unwrap();
        let decrypted =
            decrypt(CipherAlgorithm::Aes128Cbc, &KEY_128, &IV, &ciphertext).unwrap();
        assert_eq!(decrypted, cleartext);
    }

    #[test]
    fn test_ciphertext_size_is_exact() {
        for len in [0usize, 1, 15, 16, 17, 1000] {
            let cleartext = vec![0u8; len];
            let ciphertext =
                encrypt(CipherAlgorithm::Aes256Cbc, &KEY_256, &IV, &cleartext).unwrap();
            assert_eq!(
                ciphertext.len(),
                ciphertext_size(CipherAlgorithm::Aes256Cbc, len)
            );
            // PKCS#7 always pads: strictly larger than the input
            assert!(ciphertext.len() > len);
        }
    }

    #[test]
    fn test_key_length_mismatch() {
        let result = encrypt(CipherAlgorithm::Aes256Cbc, &KEY_128, &IV, b"x");
        assert!(matches!(
            result,
            Err(CoreError::KeyLengthMismatch {
                expected: 32,
                actual: 16
            })
        ));
    }

    #[test]
    fn test_iv_length_mismatch() {
        let result = encrypt(CipherAlgorithm::Aes256Cbc, &KEY_256, &IV[..8], b"x");
        assert!(matches!(result, Err(CoreError::IvLengthMismatch { .. })));
    }

    #[test]
    fn test_decrypt_rejects_unaligned_ciphertext() {
        let result = decrypt(CipherAlgorithm::Aes256Cbc, &KEY_256, &IV, &[0u8; 17]);
        assert!(matches!(result, Err(CoreError::CipherFailure { .. })));

        let result = decrypt(CipherAlgorithm::Aes256Cbc, &KEY_256, &IV, &[]);
        assert!(matches!(result, Err(CoreError::CipherFailure { .. })));
    }

    #[test]
    fn test_decrypt_with_wrong_key_never_yields_plaintext() {
        let cleartext = b"sixteen byte msg";
        let ciphertext =
            encrypt(CipherAlgorithm::Aes256Cbc, &KEY_256, &IV, cleartext).unwrap();

        let wrong_key = [0x43u8; 32];
        // Padding may accidentally verify under a wrong key; either way
        // the original plaintext must not come back.
        match decrypt(CipherAlgorithm::Aes256Cbc, &wrong_key, &IV, &ciphertext) {
            Err(err) => assert!(err.is_crypto_error()),
            Ok(garbage) => assert_ne!(garbage, cleartext),
        }
    }
}
