// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Roughtime tag identifiers and their canonical wire ordering.
//!
//! Tags are 4-byte ASCII values compared as little-endian `u32` for sort
//! order. The tag set is closed: a 32-bit value outside the enumerated set is
//! not a tag. Each variant's discriminant is its wire value, so the derived
//! `Ord` *is* the canonical message ordering and an ordered container keyed
//! by [`RtTag`] needs no separate comparator.

use core::fmt;

use crate::error::WireError;

// Convert a 4-byte ASCII tag to its little-endian u32 wire value.
macro_rules! tag_to_u32 {
    ($w:expr) => {
        ($w[0] as u32)
            | (($w[1] as u32) << 8)
            | (($w[2] as u32) << 16)
            | (($w[3] as u32) << 24)
    };
}

/// A Roughtime message tag.
///
/// Shorter tag names are padded to 4 bytes: `SIG` and `VER` with a trailing
/// `0x00`, `PAD` with a trailing `0xff`. The `0xff` pad byte sorts `PAD`
/// after every alphabetic tag, which is what lets a builder append filler of
/// arbitrary length as the final value of a message.
#[repr(u32)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum RtTag {
    /// Certificate: nested message containing DELE and SIG.
    Cert = tag_to_u32!(b"CERT"),
    /// Delegation: nested message containing MINT, MAXT, and PUBK.
    Dele = tag_to_u32!(b"DELE"),
    /// Index of the request's nonce in the response Merkle tree.
    Indx = tag_to_u32!(b"INDX"),
    /// Maximum delegation time (microseconds since the Unix epoch).
    Maxt = tag_to_u32!(b"MAXT"),
    /// Midpoint timestamp (microseconds since the Unix epoch).
    Midp = tag_to_u32!(b"MIDP"),
    /// Minimum delegation time (microseconds since the Unix epoch).
    Mint = tag_to_u32!(b"MINT"),
    /// Client nonce.
    Nonc = tag_to_u32!(b"NONC"),
    /// Padding used to reach the minimum request length.
    Pad = tag_to_u32!(b"PAD\xff"),
    /// Merkle tree path from the client's nonce to the root.
    Path = tag_to_u32!(b"PATH"),
    /// Delegated Ed25519 public key.
    Pubk = tag_to_u32!(b"PUBK"),
    /// Radius of uncertainty around the midpoint (microseconds).
    Radi = tag_to_u32!(b"RADI"),
    /// Merkle tree root.
    Root = tag_to_u32!(b"ROOT"),
    /// Ed25519 signature.
    Sig = tag_to_u32!(b"SIG\0"),
    /// Signed response: nested message containing MIDP, RADI, and ROOT.
    Srep = tag_to_u32!(b"SREP"),
    /// Protocol version.
    Ver = tag_to_u32!(b"VER\0"),
}

impl RtTag {
    /// Resolve a little-endian wire value to a tag.
    ///
    /// Fails with [`WireError::InvalidTag`] when the value does not name a
    /// tag in the closed set.
    pub fn from_wire_value(value: u32) -> Result<Self, WireError> {
        match value {
            v if v == RtTag::Cert as u32 => Ok(RtTag::Cert),
            v if v == RtTag::Dele as u32 => Ok(RtTag::Dele),
            v if v == RtTag::Indx as u32 => Ok(RtTag::Indx),
            v if v == RtTag::Maxt as u32 => Ok(RtTag::Maxt),
            v if v == RtTag::Midp as u32 => Ok(RtTag::Midp),
            v if v == RtTag::Mint as u32 => Ok(RtTag::Mint),
            v if v == RtTag::Nonc as u32 => Ok(RtTag::Nonc),
            v if v == RtTag::Pad as u32 => Ok(RtTag::Pad),
            v if v == RtTag::Path as u32 => Ok(RtTag::Path),
            v if v == RtTag::Pubk as u32 => Ok(RtTag::Pubk),
            v if v == RtTag::Radi as u32 => Ok(RtTag::Radi),
            v if v == RtTag::Root as u32 => Ok(RtTag::Root),
            v if v == RtTag::Sig as u32 => Ok(RtTag::Sig),
            v if v == RtTag::Srep as u32 => Ok(RtTag::Srep),
            v if v == RtTag::Ver as u32 => Ok(RtTag::Ver),
            _ => Err(WireError::InvalidTag { value }),
        }
    }

    /// Resolve the 4 on-wire bytes of a tag.
    pub fn from_wire_bytes(bytes: [u8; 4]) -> Result<Self, WireError> {
        Self::from_wire_value(u32::from_le_bytes(bytes))
    }

    /// The tag's wire value: its 4 ASCII bytes read as a little-endian u32.
    ///
    /// This is the sole ordering key used everywhere tags are compared.
    pub fn wire_value(self) -> u32 {
        self as u32
    }

    /// The tag's 4 on-wire bytes.
    pub fn wire_bytes(self) -> [u8; 4] {
        (self as u32).to_le_bytes()
    }

    /// Whether this tag's value conventionally carries a nested encoded
    /// message (CERT, DELE, SREP).
    pub fn is_nested(self) -> bool {
        matches!(self, RtTag::Cert | RtTag::Dele | RtTag::Srep)
    }
}

impl fmt::Display for RtTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.wire_bytes() {
            if b.is_ascii_alphabetic() {
                write!(f, "{}", b as char)?;
            }
        }
        Ok(())
    }
}
