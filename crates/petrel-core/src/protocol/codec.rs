// ============================================
// File: crates/petrel-core/src/protocol/codec.rs
// ============================================
//! # Frame Write Path
//!
//! ## Creation Reason
//! Builds outgoing frames: one writer per frame kind over a shared raw
//! writer, plus exact size queries so callers can allocate (or reject)
//! before any cryptography runs.
//!
//! ## Main Functionality
//! - `frame_size` and per-kind size queries: exact, no over-allocation
//! - `write_data` / `write_contact_request` / `write_contact` /
//!   `write_keep_alive`: encrypt-then-seal into a caller buffer
//! - `encode_*`: allocating conveniences returning a [`BytesMut`]
//!
//! ## Write Order
//! sequence_number, iv_len, iv, ciphertext_len, ciphertext, then the
//! seal over the bytes just written (`iv_len..ciphertext_end`), then
//! hmac_len and the seal itself.
//!
//! ## ⚠️ Important Note for Next Developer
//! - Capacity and parameter checks run BEFORE any byte lands in `dst`;
//!   a returned error means `dst` is untouched
//! - The IV comes from `OsRng` for every frame. Never reuse one
//! - Cleartext scratch buffers are wiped before the writer returns
//!
//! ## Last Modified
//! v0.1.0 - Initial frame writers

use bytes::BytesMut;
use rand::{rngs::OsRng, RngCore};
use tracing::trace;
use zeroize::Zeroize;

use petrel_common::error::CommonError;
use petrel_common::types::{
    ChannelNumber, IdentityDigest, SequenceNumber, DIGEST_SIZE,
};

use crate::crypto::{cipher, seal, CipherAlgorithm, SealMode};
use crate::error::{CoreError, Result};
use crate::protocol::aux::{self, ContactMap, CONTACT_RECORD_SIZE};
use crate::protocol::{CHANNEL_NUMBER_SIZE, LENGTH_FIELD_SIZE, SEQUENCE_NUMBER_SIZE};

// ============================================
// Size Queries
// ============================================

/// Returns the exact encoded frame-body size for a cleartext of
/// `cleartext_len` bytes under the given cipher and seal mode.
#[must_use]
pub const fn frame_size(
    cipher_alg: CipherAlgorithm,
    seal_mode: &SealMode,
    cleartext_len: usize,
) -> usize {
    SEQUENCE_NUMBER_SIZE
        + LENGTH_FIELD_SIZE
        + cipher_alg.iv_size()
        + LENGTH_FIELD_SIZE
        + cipher::ciphertext_size(cipher_alg, cleartext_len)
        + LENGTH_FIELD_SIZE
        + seal_mode.tag_len()
}

/// Exact body size of a data frame carrying `payload_len` payload bytes.
#[must_use]
pub const fn data_frame_size(
    cipher_alg: CipherAlgorithm,
    seal_mode: &SealMode,
    payload_len: usize,
) -> usize {
    frame_size(cipher_alg, seal_mode, CHANNEL_NUMBER_SIZE + payload_len)
}

/// Exact body size of a contact-request frame for `digest_count` digests.
#[must_use]
pub const fn contact_request_frame_size(
    cipher_alg: CipherAlgorithm,
    seal_mode: &SealMode,
    digest_count: usize,
) -> usize {
    frame_size(cipher_alg, seal_mode, digest_count * DIGEST_SIZE)
}

/// Exact body size of a contact frame for `contact_count` records.
#[must_use]
pub const fn contact_frame_size(
    cipher_alg: CipherAlgorithm,
    seal_mode: &SealMode,
    contact_count: usize,
) -> usize {
    frame_size(cipher_alg, seal_mode, contact_count * CONTACT_RECORD_SIZE)
}

/// Exact body size of a keep-alive frame with `random_len` filler bytes.
#[must_use]
pub const fn keep_alive_frame_size(
    cipher_alg: CipherAlgorithm,
    seal_mode: &SealMode,
    random_len: usize,
) -> usize {
    frame_size(cipher_alg, seal_mode, random_len)
}

// ============================================
// Raw Writer
// ============================================

/// Writes one u16 length prefix, big endian.
fn put_len(dst: &mut [u8], offset: &mut usize, len: usize) {
    dst[*offset..*offset + LENGTH_FIELD_SIZE]
        .copy_from_slice(&(len as u16).to_be_bytes());
    *offset += LENGTH_FIELD_SIZE;
}

fn put_bytes(dst: &mut [u8], offset: &mut usize, bytes: &[u8]) {
    dst[*offset..*offset + bytes.len()].copy_from_slice(bytes);
    *offset += bytes.len();
}

/// Encrypts `cleartext` and writes the complete frame body into `dst`.
///
/// All parameter checks run before the first byte is written, so a
/// returned error leaves `dst` untouched.
///
/// # Returns
/// The number of bytes written, always equal to
/// `frame_size(cipher_alg, seal_mode, cleartext.len())`.
///
/// # Errors
/// - `MessageTooLarge` if the padded ciphertext or the seal would
///   overflow its 16-bit length field
/// - `BufferTooSmall` if `dst` cannot hold the frame
/// - `DigestUnavailable` if the seal digest is not compiled in
/// - `Common(InvalidInput)` if the seal mode declares a zero tag length
/// - Cipher-codec errors on bad key material
fn raw_write(
    dst: &mut [u8],
    sequence_number: SequenceNumber,
    cipher_alg: CipherAlgorithm,
    seal_mode: &SealMode,
    cleartext: &[u8],
    seal_key: &[u8],
    enc_key: &[u8],
) -> Result<usize> {
    let ciphertext_len = cipher::ciphertext_size(cipher_alg, cleartext.len());
    if ciphertext_len > usize::from(u16::MAX) {
        return Err(CoreError::MessageTooLarge {
            max: usize::from(u16::MAX),
            actual: ciphertext_len,
        });
    }

    if let SealMode::Authenticated { digest, tag_len } = *seal_mode {
        if !digest.is_available() {
            return Err(CoreError::DigestUnavailable {
                digest: digest.name(),
            });
        }
        if tag_len == 0 {
            return Err(
                CommonError::invalid_input("tag_len", "must be non-zero").into()
            );
        }
        // The seal length must fit its 16-bit wire field
        if tag_len > usize::from(u16::MAX) {
            return Err(CoreError::MessageTooLarge {
                max: usize::from(u16::MAX),
                actual: tag_len,
            });
        }
    }

    let required = frame_size(cipher_alg, seal_mode, cleartext.len());
    if dst.len() < required {
        return Err(CoreError::buffer_too_small(required, dst.len()));
    }

    let mut iv = vec![0u8; cipher_alg.iv_size()];
    OsRng.fill_bytes(&mut iv);

    let ciphertext = cipher::encrypt(cipher_alg, enc_key, &iv, cleartext)?;

    let mut offset = 0;
    put_bytes(dst, &mut offset, &sequence_number.to_be_bytes());
    put_len(dst, &mut offset, iv.len());
    put_bytes(dst, &mut offset, &iv);
    put_len(dst, &mut offset, ciphertext.len());
    put_bytes(dst, &mut offset, &ciphertext);
    let sealed_end = offset;

    match *seal_mode {
        SealMode::Authenticated { digest, tag_len } => {
            let tag = seal::compute_tag(
                digest,
                seal_key,
                &dst[SEQUENCE_NUMBER_SIZE..sealed_end],
                tag_len,
            )?;
            put_len(dst, &mut offset, tag.len());
            put_bytes(dst, &mut offset, &tag);
        }
        SealMode::Unauthenticated => put_len(dst, &mut offset, 0),
    }

    debug_assert_eq!(offset, required);
    trace!(bytes = required, sequence_number, "frame written");
    Ok(required)
}

// ============================================
// Per-Kind Writers
// ============================================

/// Writes a data frame carrying `payload` on `channel`.
///
/// # Errors
/// See [`raw_write`](self) error conditions; `dst` is untouched on error.
#[allow(clippy::too_many_arguments)]
pub fn write_data(
    dst: &mut [u8],
    channel: ChannelNumber,
    sequence_number: SequenceNumber,
    cipher_alg: CipherAlgorithm,
    seal_mode: &SealMode,
    payload: &[u8],
    seal_key: &[u8],
    enc_key: &[u8],
) -> Result<usize> {
    let mut cleartext = Vec::with_capacity(CHANNEL_NUMBER_SIZE + payload.len());
    cleartext.extend_from_slice(&channel.to_be_bytes());
    cleartext.extend_from_slice(payload);

    let written = raw_write(
        dst,
        sequence_number,
        cipher_alg,
        seal_mode,
        &cleartext,
        seal_key,
        enc_key,
    );
    cleartext.zeroize();
    written
}

/// Writes a contact-request frame for the given digests.
///
/// # Errors
/// See [`raw_write`](self) error conditions; `dst` is untouched on error.
pub fn write_contact_request(
    dst: &mut [u8],
    sequence_number: SequenceNumber,
    cipher_alg: CipherAlgorithm,
    seal_mode: &SealMode,
    digests: &[IdentityDigest],
    seal_key: &[u8],
    enc_key: &[u8],
) -> Result<usize> {
    let cleartext = aux::write_digest_list(digests);
    raw_write(
        dst,
        sequence_number,
        cipher_alg,
        seal_mode,
        &cleartext,
        seal_key,
        enc_key,
    )
}

/// Writes a contact frame advertising the given endpoints.
///
/// # Errors
/// See [`raw_write`](self) error conditions; `dst` is untouched on error.
pub fn write_contact(
    dst: &mut [u8],
    sequence_number: SequenceNumber,
    cipher_alg: CipherAlgorithm,
    seal_mode: &SealMode,
    contacts: &ContactMap,
    seal_key: &[u8],
    enc_key: &[u8],
) -> Result<usize> {
    let cleartext = aux::write_contact_map(contacts);
    raw_write(
        dst,
        sequence_number,
        cipher_alg,
        seal_mode,
        &cleartext,
        seal_key,
        enc_key,
    )
}

/// Writes a keep-alive frame filled with `random_len` random bytes.
///
/// The filler is drawn fresh from `OsRng`; its content is opaque and
/// carries no meaning to the receiver.
///
/// # Errors
/// See [`raw_write`](self) error conditions; `dst` is untouched on error.
pub fn write_keep_alive(
    dst: &mut [u8],
    sequence_number: SequenceNumber,
    cipher_alg: CipherAlgorithm,
    seal_mode: &SealMode,
    random_len: usize,
    seal_key: &[u8],
    enc_key: &[u8],
) -> Result<usize> {
    let mut filler = vec![0u8; random_len];
    OsRng.fill_bytes(&mut filler);
    raw_write(
        dst,
        sequence_number,
        cipher_alg,
        seal_mode,
        &filler,
        seal_key,
        enc_key,
    )
}

// ============================================
// Allocating Conveniences
// ============================================

/// Encodes a data frame into a freshly sized buffer.
///
/// # Errors
/// Same conditions as [`write_data`].
pub fn encode_data(
    channel: ChannelNumber,
    sequence_number: SequenceNumber,
    cipher_alg: CipherAlgorithm,
    seal_mode: &SealMode,
    payload: &[u8],
    seal_key: &[u8],
    enc_key: &[u8],
) -> Result<BytesMut> {
    let mut buf =
        BytesMut::zeroed(data_frame_size(cipher_alg, seal_mode, payload.len()));
    write_data(
        &mut buf,
        channel,
        sequence_number,
        cipher_alg,
        seal_mode,
        payload,
        seal_key,
        enc_key,
    )?;
    Ok(buf)
}

/// Encodes a contact-request frame into a freshly sized buffer.
///
/// # Errors
/// Same conditions as [`write_contact_request`].
pub fn encode_contact_request(
    sequence_number: SequenceNumber,
    cipher_alg: CipherAlgorithm,
    seal_mode: &SealMode,
    digests: &[IdentityDigest],
    seal_key: &[u8],
    enc_key: &[u8],
) -> Result<BytesMut> {
    let mut buf = BytesMut::zeroed(contact_request_frame_size(
        cipher_alg,
        seal_mode,
        digests.len(),
    ));
    write_contact_request(
        &mut buf,
        sequence_number,
        cipher_alg,
        seal_mode,
        digests,
        seal_key,
        enc_key,
    )?;
    Ok(buf)
}

/// Encodes a contact frame into a freshly sized buffer.
///
/// # Errors
/// Same conditions as [`write_contact`].
pub fn encode_contact(
    sequence_number: SequenceNumber,
    cipher_alg: CipherAlgorithm,
    seal_mode: &SealMode,
    contacts: &ContactMap,
    seal_key: &[u8],
    enc_key: &[u8],
) -> Result<BytesMut> {
    let mut buf = BytesMut::zeroed(contact_frame_size(
        cipher_alg,
        seal_mode,
        contacts.len(),
    ));
    write_contact(
        &mut buf,
        sequence_number,
        cipher_alg,
        seal_mode,
        contacts,
        seal_key,
        enc_key,
    )?;
    Ok(buf)
}

/// Encodes a keep-alive frame into a freshly sized buffer.
///
/// # Errors
/// Same conditions as [`write_keep_alive`].
pub fn encode_keep_alive(
    sequence_number: SequenceNumber,
    cipher_alg: CipherAlgorithm,
    seal_mode: &SealMode,
    random_len: usize,
    seal_key: &[u8],
    enc_key: &[u8],
) -> Result<BytesMut> {
    let mut buf = BytesMut::zeroed(keep_alive_frame_size(
        cipher_alg,
        seal_mode,
        random_len,
    ));
    write_keep_alive(
        &mut buf,
        sequence_number,
        cipher_alg,
        seal_mode,
        random_len,
        seal_key,
        enc_key,
    )?;
    Ok(buf)
}

// ============================================
// Tests
// ============================================
