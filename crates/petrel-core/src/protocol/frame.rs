// ============================================
// File: crates/petrel-core/src/protocol/frame.rs
// ============================================
//! # Frame Read Path
//!
//! ## Creation Reason
//! Maps a raw received buffer into typed, bounds-checked field views and
//! carries the frame through the receive-path state machine without ever
//! exposing a partially validated object.
//!
//! ## Main Functionality
//! - `FrameView::parse`: ordered structural validation (`check_format`)
//! - Zero-copy accessors over validated, chained field offsets
//! - `FrameView::check_seal`: gateway to the `SealedFrame` type-state
//! - `SealedFrame`: the only path to decryption and interpretation
//!
//! ## Parsing Strategy
//! 1. Check the minimum body length
//! 2. Walk the three variable fields in wire order, checking each
//!    declared length against the bytes that actually remain
//! 3. Record the validated ranges; accessors never re-derive offsets
//!
//! ## ⚠️ Important Note for Next Developer
//! - Every length field is peer-controlled; treat each as hostile until
//!   `take_field` has checked it
//! - Decryption is only reachable through `SealedFrame`. Do not add a
//!   shortcut from `FrameView` to the cipher codec
//!
//! ## Last Modified
//! v0.1.0 - Initial frame read path

use std::ops::Range;

use tracing::trace;
use zeroize::Zeroize;

use petrel_common::types::SequenceNumber;

use crate::crypto::{cipher, seal, CipherAlgorithm, SealMode, SealPolicy, SealStatus};
use crate::error::{CoreError, Result};
use crate::protocol::messages::{Cleartext, FrameKind};
use crate::protocol::{LENGTH_FIELD_SIZE, MIN_BODY_LENGTH, SEQUENCE_NUMBER_SIZE};

// ============================================
// FrameView
// ============================================

/// Validated, zero-copy view over a received frame body.
///
/// # Guarantees
/// Construction runs the full format check; a `FrameView` therefore
/// never exists for a structurally invalid body, and every accessor is
/// a pure slice over ranges proven in-bounds at parse time.
///
/// # What This Does NOT Guarantee
/// - Authenticity: the seal has not been checked yet
/// - Meaningful cleartext: the ciphertext has not been decrypted
///
/// Both require progressing to [`SealedFrame`] via [`check_seal`].
///
/// [`check_seal`]: FrameView::check_seal
#[derive(Debug)]
pub struct FrameView<'a> {
    body: &'a [u8],
    iv: Range<usize>,
    ciphertext: Range<usize>,
    hmac: Range<usize>,
}

impl<'a> FrameView<'a> {
    /// Parses and validates a frame body.
    ///
    /// Validation happens in wire order: minimum length first, then each
    /// variable field's declared length against the remaining buffer.
    ///
    /// # Errors
    /// - `MessageTooShort` if the fixed skeleton does not fit
    /// - `LengthOverrun` if any declared length exceeds what remains
    pub fn parse(body: &'a [u8]) -> Result<Self> {
        if body.len() < MIN_BODY_LENGTH {
            return Err(CoreError::too_short(MIN_BODY_LENGTH, body.len()));
        }

        let mut offset = SEQUENCE_NUMBER_SIZE;
        let iv = Self::take_field(body, &mut offset, "iv")?;
        let ciphertext = Self::take_field(body, &mut offset, "ciphertext")?;
        let hmac = Self::take_field(body, &mut offset, "hmac")?;

        trace!(body_len = body.len(), "frame format validated");

        Ok(Self {
            body,
            iv,
            ciphertext,
            hmac,
        })
    }

    /// Reads one length-prefixed field, advancing `offset` past it.
    fn take_field(
        body: &[u8],
        offset: &mut usize,
        field: &'static str,
    ) -> Result<Range<usize>> {
        if body.len() - *offset < LENGTH_FIELD_SIZE {
            return Err(CoreError::too_short(
                *offset + LENGTH_FIELD_SIZE,
                body.len(),
            ));
        }
        let claimed =
            u16::from_be_bytes([body[*offset], body[*offset + 1]]) as usize;

        let start = *offset + LENGTH_FIELD_SIZE;
        let remaining = body.len() - start;
        if claimed > remaining {
            return Err(CoreError::overrun(field, claimed, remaining));
        }

        *offset = start + claimed;
        Ok(start..start + claimed)
    }

    // ========================================
    // Field Accessors
    // ========================================

    /// Returns the sender-assigned sequence number.
    #[must_use]
    pub fn sequence_number(&self) -> SequenceNumber {
        u32::from_be_bytes([self.body[0], self.body[1], self.body[2], self.body[3]])
    }

    /// Returns the IV bytes.
    #[must_use]
    pub fn iv(&self) -> &'a [u8] {
        &self.body[self.iv.clone()]
    }

    /// Returns the declared IV length.
    #[must_use]
    pub fn iv_len(&self) -> usize {
        self.iv.len()
    }

    /// Returns the ciphertext bytes.
    #[must_use]
    pub fn ciphertext(&self) -> &'a [u8] {
        &self.body[self.ciphertext.clone()]
    }

    /// Returns the declared ciphertext length.
    #[must_use]
    pub fn ciphertext_len(&self) -> usize {
        self.ciphertext.len()
    }

    /// Returns the seal bytes carried by the frame (empty if the frame
    /// is explicitly unauthenticated).
    #[must_use]
    pub fn hmac(&self) -> &'a [u8] {
        &self.body[self.hmac.clone()]
    }

    /// Returns the declared seal length.
    #[must_use]
    pub fn hmac_len(&self) -> usize {
        self.hmac.len()
    }

    /// Returns `true` if the frame carries a seal.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.hmac.is_empty()
    }

    /// Returns the span the seal covers: `iv_len` through the end of the
    /// ciphertext. The sequence number is not covered (wire format
    /// compatibility).
    #[must_use]
    pub fn sealed_region(&self) -> &'a [u8] {
        &self.body[SEQUENCE_NUMBER_SIZE..self.ciphertext.end]
    }

    // ========================================
    // State Transition: FORMAT_CHECKED → SEALED_OK
    // ========================================

    /// Verifies the frame's seal, yielding the only handle from which
    /// decryption is reachable.
    ///
    /// # Errors
    /// - `SealMismatch` if the recomputed tag differs
    /// - `SealRequired` if the frame is unauthenticated against a
    ///   forbidding policy, or sealless on a sealing session
    /// - `DigestUnavailable` under strict mode with a missing digest
    pub fn check_seal(
        &self,
        mode: &SealMode,
        policy: &SealPolicy,
        seal_key: &[u8],
    ) -> Result<SealedFrame<'_, 'a>> {
        let status =
            seal::check_seal(mode, policy, seal_key, self.sealed_region(), self.hmac())?;
        Ok(SealedFrame { view: self, status })
    }
}

// ============================================
// SealedFrame
// ============================================

/// A frame whose seal check has passed.
///
/// Exists only as the output of [`FrameView::check_seal`], which makes
/// verify-then-decrypt a compile-time property rather than a convention.
#[derive(Debug)]
pub struct SealedFrame<'v, 'a> {
    view: &'v FrameView<'a>,
    status: SealStatus,
}

impl<'v, 'a> SealedFrame<'v, 'a> {
    /// Returns the verification outcome, including any digest downgrade.
    #[must_use]
    pub const fn status(&self) -> SealStatus {
        self.status
    }

    /// Returns the underlying validated view.
    #[must_use]
    pub const fn view(&self) -> &'v FrameView<'a> {
        self.view
    }

    // ========================================
    // State Transition: SEALED_OK → DECRYPTED
    // ========================================

    /// Decrypts the frame's ciphertext.
    ///
    /// # Errors
    /// Propagates cipher-codec failures (`KeyLengthMismatch`,
    /// `IvLengthMismatch`, `CipherFailure`).
    pub fn cleartext(&self, cipher_alg: CipherAlgorithm, enc_key: &[u8]) -> Result<Vec<u8>> {
        cipher::decrypt(cipher_alg, enc_key, self.view.iv(), self.view.ciphertext())
    }

    // ========================================
    // State Transition: DECRYPTED → INTERPRETED
    // ========================================

    /// Decrypts and interprets the frame in one step, wiping the
    /// intermediate cleartext buffer.
    ///
    /// # Errors
    /// Propagates decryption failures and interpretation errors
    /// (`MessageTooShort`, `MalformedAuxiliary`).
    pub fn interpret(
        &self,
        kind: FrameKind,
        cipher_alg: CipherAlgorithm,
        enc_key: &[u8],
    ) -> Result<Cleartext> {
        let mut cleartext = self.cleartext(cipher_alg, enc_key)?;
        let interpreted = Cleartext::interpret(kind, &cleartext);
        cleartext.zeroize();
        interpreted
    }
}

// ============================================
// Tests
// ============================================
