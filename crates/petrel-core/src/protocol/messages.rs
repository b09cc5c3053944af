// ============================================
// File: crates/petrel-core/src/protocol/messages.rs
// ============================================
//! # Frame Kinds and Cleartext Payloads
//!
//! ## Creation Reason
//! Defines the four encrypted frame subtypes and the typed cleartext
//! each one carries after decryption.
//!
//! ## Main Functionality
//! - `FrameKind`: Subtype discriminant (carried in the outer envelope)
//! - `Cleartext`: Tagged variant over the decrypted payloads
//! - `Cleartext::interpret`: Final state-machine step (DECRYPTED →
//!   INTERPRETED)
//!
//! ## Kind Values
//! | Value | Kind |
//! |-------|------|
//! | 0x70 | Data |
//! | 0xFD | ContactRequest |
//! | 0xFE | Contact |
//! | 0xFF | KeepAlive |
//!
//! ## ⚠️ Important Note for Next Developer
//! - The low range below 0x70 is reserved for session-establishment
//!   messages owned by the session layer; never allocate into it here
//! - Cleartext layouts are peer-visible; field order is frozen
//!
//! ## Last Modified
//! v0.1.0 - Initial message definitions

use serde::{Deserialize, Serialize};

use petrel_common::types::{ChannelNumber, IdentityDigest};

use crate::error::{CoreError, Result};
use crate::protocol::aux::{self, ContactMap};
use crate::protocol::CHANNEL_NUMBER_SIZE;

// ============================================
// FrameKind
// ============================================

/// Encrypted frame subtype identifier.
///
/// # Wire Format
/// Single byte carried in the outer envelope's type field; the frame
/// body itself is identical across kinds, only the cleartext differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FrameKind {
    /// Application data multiplexed by channel number.
    Data = 0x70,
    /// Request for contact information about a list of peers.
    ContactRequest = 0xFD,
    /// Advertisement of peer contact endpoints.
    Contact = 0xFE,
    /// Random filler keeping a peering alive.
    KeepAlive = 0xFF,
}

impl FrameKind {
    /// Converts a byte to a `FrameKind`.
    ///
    /// # Returns
    /// - `Some(FrameKind)` if the byte is a valid frame kind
    /// - `None` if the byte is unknown
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x70 => Some(Self::Data),
            0xFD => Some(Self::ContactRequest),
            0xFE => Some(Self::Contact),
            0xFF => Some(Self::KeepAlive),
            _ => None,
        }
    }

    /// Converts the `FrameKind` to its byte representation.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Checks if this is a peer-discovery control frame.
    #[must_use]
    pub const fn is_control(self) -> bool {
        matches!(self, Self::ContactRequest | Self::Contact)
    }

    /// Checks if this is an application data frame.
    #[must_use]
    pub const fn is_data(self) -> bool {
        matches!(self, Self::Data)
    }
}

impl TryFrom<u8> for FrameKind {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self> {
        Self::from_byte(value).ok_or(CoreError::UnknownFrameKind(value))
    }
}

impl From<FrameKind> for u8 {
    fn from(kind: FrameKind) -> Self {
        kind.as_byte()
    }
}

// ============================================
// Cleartext
// ============================================

/// Decrypted frame payload, tagged by subtype.
///
/// # Cleartext Layouts
/// - `Data`: `channel_number` (2 bytes, BE) ‖ opaque payload
/// - `ContactRequest`: N × 32-byte identity digests
/// - `Contact`: N × 50-byte (digest, endpoint) records
/// - `KeepAlive`: opaque random filler, semantically empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cleartext {
    /// Application payload on a multiplexing channel.
    Data {
        /// Channel the payload belongs to.
        channel: ChannelNumber,
        /// Opaque application bytes.
        payload: Vec<u8>,
    },
    /// Digests of peers whose contact information is requested.
    ContactRequest(Vec<IdentityDigest>),
    /// Advertised peer endpoints keyed by identity digest.
    Contact(ContactMap),
    /// Random filler bytes; content carries no meaning.
    KeepAlive(Vec<u8>),
}

impl Cleartext {
    /// Returns the frame kind this cleartext belongs to.
    #[must_use]
    pub const fn kind(&self) -> FrameKind {
        match self {
            Self::Data { .. } => FrameKind::Data,
            Self::ContactRequest(_) => FrameKind::ContactRequest,
            Self::Contact(_) => FrameKind::Contact,
            Self::KeepAlive(_) => FrameKind::KeepAlive,
        }
    }

    /// Interprets decrypted bytes according to the frame kind.
    ///
    /// This is the final receive-path step; it runs only on cleartext
    /// recovered from a seal-verified frame.
    ///
    /// # Errors
    /// - `MessageTooShort` if a data cleartext lacks its channel prefix
    /// - `MalformedAuxiliary` if a control payload is misaligned
    pub fn interpret(kind: FrameKind, bytes: &[u8]) -> Result<Self> {
        match kind {
            FrameKind::Data => {
                if bytes.len() < CHANNEL_NUMBER_SIZE {
                    return Err(CoreError::too_short(CHANNEL_NUMBER_SIZE, bytes.len()));
                }
                let channel = u16::from_be_bytes([bytes[0], bytes[1]]);
                Ok(Self::Data {
                    channel,
                    payload: bytes[CHANNEL_NUMBER_SIZE..].to_vec(),
                })
            }
            FrameKind::ContactRequest => {
                Ok(Self::ContactRequest(aux::parse_digest_list(bytes)?))
            }
            FrameKind::Contact => Ok(Self::Contact(aux::parse_contact_map(bytes)?)),
            FrameKind::KeepAlive => Ok(Self::KeepAlive(bytes.to_vec())),
        }
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_kind_roundtrip() {
        for kind in [
            FrameKind::Data,
            FrameKind::ContactRequest,
            FrameKind::Contact,
            FrameKind::KeepAlive,
        ] {
            assert_eq!(FrameKind::from_byte(kind.as_byte()), Some(kind));
        }
    }

    #[test]
    fn test_frame_kind_unknown() {
        assert!(FrameKind::from_byte(0x00).is_none());
        assert!(FrameKind::from_byte(0x71).is_none());
        assert!(matches!(
            FrameKind::try_from(0x42),
            Err(CoreError::UnknownFrameKind(0x42))
        ));
    }

    #[test]
    fn test_frame_kind_classification() {
        assert!(FrameKind::Data.is_data());
        assert!(!FrameKind::Data.is_control());
        assert!(FrameKind::Contact.is_control());
        assert!(FrameKind::ContactRequest.is_control());
        assert!(!FrameKind::KeepAlive.is_control());
    }

    #[test]
    fn test_interpret_data() {
        let mut bytes = 7u16.to_be_bytes().to_vec();
        bytes.extend_from_slice(b"PING");

        let cleartext = Cleartext::interpret(FrameKind::Data, &bytes).unwrap();
        assert_eq!(
            cleartext,
            Cleartext::Data {
                channel: 7,
                payload: b"PING".to_vec()
            }
        );
        assert_eq!(cleartext.kind(), FrameKind::Data);
    }

    #[test]
    fn test_interpret_data_requires_channel_prefix() {
        let result = Cleartext::interpret(FrameKind::Data, &[0x01]);
        assert!(matches!(result, Err(CoreError::MessageTooShort { .. })));
    }

    #[test]
    fn test_interpret_empty_data_payload() {
        let cleartext =
            Cleartext::interpret(FrameKind::Data, &3u16.to_be_bytes()).unwrap();
        assert_eq!(
            cleartext,
            Cleartext::Data {
                channel: 3,
                payload: Vec::new()
            }
        );
    }

    #[test]
    fn test_interpret_keep_alive_is_opaque() {
        let filler = vec![0xa5; 64];
        let cleartext = Cleartext::interpret(FrameKind::KeepAlive, &filler).unwrap();
        assert_eq!(cleartext, Cleartext::KeepAlive(filler));
        assert_eq!(cleartext.kind(), FrameKind::KeepAlive);
    }

    #[test]
    fn test_interpret_misaligned_contact_request_fails() {
        let result = Cleartext::interpret(FrameKind::ContactRequest, &[0u8; 33]);
        assert!(matches!(result, Err(CoreError::MalformedAuxiliary { .. })));
    }
}
