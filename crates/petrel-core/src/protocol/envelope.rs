// ============================================
// File: crates/petrel-core/src/protocol/envelope.rs
// ============================================
//! # Outer Envelope
//!
//! ## Creation Reason
//! Every Petrel datagram starts with the same four-byte header naming
//! the protocol version, the frame kind and the body length. This
//! module owns that header so the frame layer never has to.
//!
//! ## Wire Format
//! ```text
//! version (1) ‖ kind (1) ‖ length (2, BE) ‖ body (length bytes)
//! ```
//! Bytes past `length` are ignored on parse; datagram transports may
//! pad.
//!
//! ## Last Modified
//! v0.1.0 - Initial envelope codec

use bytes::BytesMut;

use crate::error::{CoreError, Result};
use crate::protocol::messages::FrameKind;

// ============================================
// Constants
// ============================================

/// Protocol version carried in every envelope.
pub const ENVELOPE_VERSION: u8 = 0x03;

/// Fixed envelope header size in bytes.
pub const ENVELOPE_HEADER_SIZE: usize = 4;

// ============================================
// Envelope
// ============================================

/// Borrowed view of one datagram: header fields plus the body slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<'a> {
    kind: FrameKind,
    body: &'a [u8],
}

impl<'a> Envelope<'a> {
    /// Wraps a frame body for sending.
    ///
    /// # Errors
    /// `MessageTooLarge` if `body` overflows the 16-bit length field.
    pub fn new(kind: FrameKind, body: &'a [u8]) -> Result<Self> {
        if body.len() > usize::from(u16::MAX) {
            return Err(CoreError::MessageTooLarge {
                max: usize::from(u16::MAX),
                actual: body.len(),
            });
        }
        Ok(Self { kind, body })
    }

    /// Parses an envelope from a received datagram.
    ///
    /// # Errors
    /// - `MessageTooShort` if the header or declared body does not fit
    /// - `UnsupportedVersion` on a version byte other than
    ///   [`ENVELOPE_VERSION`]
    /// - `UnknownFrameKind` on an unrecognized kind byte
    pub fn parse(buf: &'a [u8]) -> Result<Self> {
        if buf.len() < ENVELOPE_HEADER_SIZE {
            return Err(CoreError::too_short(ENVELOPE_HEADER_SIZE, buf.len()));
        }
        if buf[0] != ENVELOPE_VERSION {
            return Err(CoreError::UnsupportedVersion {
                got: buf[0],
                expected: ENVELOPE_VERSION,
            });
        }
        let kind = FrameKind::try_from(buf[1])?;

        let length = usize::from(u16::from_be_bytes([buf[2], buf[3]]));
        let remaining = buf.len() - ENVELOPE_HEADER_SIZE;
        if length > remaining {
            return Err(CoreError::overrun("body", length, remaining));
        }

        Ok(Self {
            kind,
            body: &buf[ENVELOPE_HEADER_SIZE..ENVELOPE_HEADER_SIZE + length],
        })
    }

    /// Returns the frame kind.
    #[must_use]
    pub const fn kind(&self) -> FrameKind {
        self.kind
    }

    /// Returns the frame body.
    #[must_use]
    pub const fn body(&self) -> &'a [u8] {
        self.body
    }

    /// Returns the encoded datagram size.
    #[must_use]
    pub const fn wire_size(&self) -> usize {
        ENVELOPE_HEADER_SIZE + self.body.len()
    }

    /// Writes the envelope into `dst`.
    ///
    /// # Errors
    /// `BufferTooSmall` if `dst` cannot hold the datagram; `dst` is
    /// untouched on error.
    pub fn write(&self, dst: &mut [u8]) -> Result<usize> {
        let required = self.wire_size();
        if dst.len() < required {
            return Err(CoreError::buffer_too_small(required, dst.len()));
        }

        dst[0] = ENVELOPE_VERSION;
        dst[1] = self.kind.as_byte();
        dst[2..4].copy_from_slice(&(self.body.len() as u16).to_be_bytes());
        dst[ENVELOPE_HEADER_SIZE..required].copy_from_slice(self.body);
        Ok(required)
    }

    /// Encodes the envelope into a freshly sized buffer.
    #[must_use]
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.wire_size());
        buf.extend_from_slice(&[
            ENVELOPE_VERSION,
            self.kind.as_byte(),
        ]);
        buf.extend_from_slice(&(self.body.len() as u16).to_be_bytes());
        buf.extend_from_slice(self.body);
        buf
    }
}

// ============================================
// Tests
// ============================================
