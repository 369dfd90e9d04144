// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Decoded Roughtime messages and the decode validation state machine.
//!
//! [`RtMessage::from_bytes`] parses protocol peer input, which is never
//! trusted: every length-derived bound is validated before it is used to
//! size or index into memory. Decoding is fail-fast; the first violation
//! aborts with no partial result.
//!
//! A decoded [`RtMessage`] owns copies of all value bytes and is immutable
//! from construction, so it outlives the buffer it was decoded from and is
//! safe to share across threads for reads.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::error::WireError;
use crate::tag::RtTag;
use crate::wire;

/// The minimum wire size of an `n`-tag message is `8n` bytes, so a count
/// above this bound could not be encoded within a u32-addressable buffer.
/// Rejecting it up front keeps all later header arithmetic in range.
const MAX_NUM_TAGS: u32 = u32::MAX / 8;

/// An immutable Roughtime message: an ordered mapping from tag to opaque
/// value bytes.
///
/// Tags are pairwise distinct and iterate in strictly increasing wire order,
/// the canonical form required for bit-exact re-encoding. Produced by
/// [`RtMessage::from_bytes`] or by
/// [`RtMessageBuilder::build`](crate::RtMessageBuilder::build).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RtMessage {
    pub(crate) map: BTreeMap<RtTag, Vec<u8>>,
}

impl RtMessage {
    /// Decode a message from its wire encoding.
    ///
    /// The buffer must hold exactly one encoded message; values extend to
    /// the end of the buffer.
    pub fn from_bytes(buf: &[u8]) -> Result<Self, WireError> {
        if buf.len() < 4 {
            return Err(WireError::MessageTooShort {
                needed: 4,
                available: buf.len(),
            });
        }
        if buf.len() % 4 != 0 {
            return Err(WireError::MessageUnaligned { length: buf.len() });
        }

        let num_tags = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);

        if num_tags == 0 {
            // A zero tag count accounts for exactly the 4-byte header;
            // trailing bytes belong to no value.
            if buf.len() != 4 {
                return Err(WireError::InvalidNumTags { num_tags });
            }
            return Ok(RtMessage {
                map: BTreeMap::new(),
            });
        }
        if num_tags > MAX_NUM_TAGS {
            return Err(WireError::InvalidNumTags { num_tags });
        }

        // Header: 4 (num_tags) + 4*(N-1) (offsets) + 4*N (tags). After the
        // MAX_NUM_TAGS check this cannot overflow, and after the length check
        // below N is bounded by the bytes the peer actually sent.
        let n = num_tags as usize;
        let offsets_len = (n - 1) * 4;
        let header_len = 4 + offsets_len + n * 4;
        if buf.len() < header_len {
            return Err(WireError::MessageTooShort {
                needed: header_len,
                available: buf.len(),
            });
        }

        let offset_bytes = &buf[4..4 + offsets_len];
        let tag_bytes = &buf[4 + offsets_len..header_len];
        let values = &buf[header_len..];

        // Each explicit offset starts the value after it; value 0 starts at
        // the implicit offset 0. Offsets must be 4-byte aligned, strictly
        // increasing, and bounded by the value region.
        let mut ends = Vec::with_capacity(n);
        let mut prev = 0u32;
        for (i, chunk) in offset_bytes.chunks_exact(4).enumerate() {
            let offset = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            if offset % 4 != 0 {
                return Err(WireError::TagOffsetUnaligned { index: i, offset });
            }
            if offset <= prev {
                return Err(WireError::TagOffsetOverflow { index: i, offset });
            }
            if offset as usize > values.len() {
                return Err(WireError::TagOffsetOverflow { index: i, offset });
            }
            prev = offset;
            ends.push(offset as usize);
        }
        ends.push(values.len());

        let mut map = BTreeMap::new();
        let mut prev_tag: Option<RtTag> = None;
        let mut start = 0;
        for (i, chunk) in tag_bytes.chunks_exact(4).enumerate() {
            let tag = RtTag::from_wire_value(u32::from_le_bytes([
                chunk[0], chunk[1], chunk[2], chunk[3],
            ]))?;
            if let Some(prev_tag) = prev_tag {
                if prev_tag.wire_value() >= tag.wire_value() {
                    return Err(WireError::TagsNotIncreasing { index: i });
                }
            }
            // Bounds hold: offsets are increasing and capped by values.len().
            map.insert(tag, values[start..ends[i]].to_vec());
            start = ends[i];
            prev_tag = Some(tag);
        }

        Ok(RtMessage { map })
    }

    pub(crate) fn from_map(map: BTreeMap<RtTag, Vec<u8>>) -> Self {
        RtMessage { map }
    }

    /// Number of tags in the message.
    pub fn num_tags(&self) -> usize {
        self.map.len()
    }

    /// Look up a tag's value. Returns `None` if the tag is not present.
    pub fn get(&self, tag: RtTag) -> Option<&[u8]> {
        self.map.get(&tag).map(Vec::as_slice)
    }

    /// Look up a required tag's value.
    ///
    /// Fails with [`WireError::MissingTag`] if the tag is not present.
    pub fn require(&self, tag: RtTag) -> Result<&[u8], WireError> {
        self.get(tag).ok_or(WireError::MissingTag { tag })
    }

    /// Decode a tag's value as a nested message.
    ///
    /// Nested messages are ordinary values holding a complete encoding with
    /// no additional framing, e.g. the delegation inside a certificate.
    pub fn get_message(&self, tag: RtTag) -> Result<RtMessage, WireError> {
        RtMessage::from_bytes(self.require(tag)?)
    }

    /// Read a tag's value as a little-endian `u32`.
    ///
    /// Fails with [`WireError::InvalidValueLength`] unless the value is
    /// exactly 4 bytes.
    pub fn get_u32(&self, tag: RtTag) -> Result<u32, WireError> {
        let value = self.require(tag)?;
        match *value {
            [a, b, c, d] => Ok(u32::from_le_bytes([a, b, c, d])),
            _ => Err(WireError::InvalidValueLength {
                tag,
                expected: 4,
                actual: value.len(),
            }),
        }
    }

    /// Read a tag's value as a little-endian `u64`.
    ///
    /// Fails with [`WireError::InvalidValueLength`] unless the value is
    /// exactly 8 bytes.
    pub fn get_u64(&self, tag: RtTag) -> Result<u64, WireError> {
        let value = self.require(tag)?;
        match *value {
            [a, b, c, d, e, f, g, h] => Ok(u64::from_le_bytes([a, b, c, d, e, f, g, h])),
            _ => Err(WireError::InvalidValueLength {
                tag,
                expected: 8,
                actual: value.len(),
            }),
        }
    }

    /// Iterate over the tags in wire order.
    pub fn tags(&self) -> impl Iterator<Item = RtTag> + '_ {
        self.map.keys().copied()
    }

    /// Iterate over `(tag, value)` entries in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (RtTag, &[u8])> {
        self.map.iter().map(|(tag, value)| (*tag, value.as_slice()))
    }

    /// The exact byte length of this message's wire encoding.
    pub fn encoded_size(&self) -> usize {
        wire::encoded_size(self)
    }

    /// Encode this message to its canonical wire form.
    pub fn to_wire(&self) -> Vec<u8> {
        wire::to_wire(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // From the protocol specification: an empty message is the 4-byte
    // zero header.
    #[test]
    fn test_empty_message() {
        let msg = RtMessage::from_bytes(&[0x00, 0x00, 0x00, 0x00]).unwrap();
        assert_eq!(msg.num_tags(), 0);
        assert_eq!(msg.get(RtTag::Cert), None);
    }

    #[test]
    fn test_empty_message_rejects_trailing_bytes() {
        let result = RtMessage::from_bytes(&[0x00, 0x00, 0x00, 0x00, 0x50, 0x50, 0x50, 0x50]);
        assert_eq!(result, Err(WireError::InvalidNumTags { num_tags: 0 }));
    }

    #[test]
    fn test_single_tag_message() {
        #[rustfmt::skip]
        let buf = [
            0x01, 0x00, 0x00, 0x00, // 1 tag, no offsets
            b'C', b'E', b'R', b'T',
            0x50, 0x50, 0x50, 0x50,
        ];
        let msg = RtMessage::from_bytes(&buf).unwrap();
        assert_eq!(msg.num_tags(), 1);
        assert_eq!(msg.get(RtTag::Cert), Some(&[0x50, 0x50, 0x50, 0x50][..]));
    }

    #[test]
    fn test_single_tag_empty_value() {
        let buf = [0x01, 0x00, 0x00, 0x00, b'C', b'E', b'R', b'T'];
        let msg = RtMessage::from_bytes(&buf).unwrap();
        assert_eq!(msg.get(RtTag::Cert), Some(&[][..]));
    }

    #[test]
    fn test_three_tag_message() {
        #[rustfmt::skip]
        let buf = [
            0x03, 0x00, 0x00, 0x00, // 3 tags
            0x04, 0x00, 0x00, 0x00, // tag 1 value starts at offset 4
            0x08, 0x00, 0x00, 0x00, // tag 2 value starts at offset 8
            b'D', b'E', b'L', b'E',
            b'I', b'N', b'D', b'X',
            b'P', b'A', b'D', 0xff,
            0x11, 0x11, 0x11, 0x11, // DELE value
            0x22, 0x22, 0x22, 0x22, // INDX value
            0x33, 0x33, 0x33, 0x33, // PAD value
        ];
        let msg = RtMessage::from_bytes(&buf).unwrap();
        assert_eq!(msg.num_tags(), 3);
        assert_eq!(msg.get(RtTag::Dele), Some(&[0x11; 4][..]));
        assert_eq!(msg.get(RtTag::Indx), Some(&[0x22; 4][..]));
        assert_eq!(msg.get(RtTag::Pad), Some(&[0x33; 4][..]));
        let tags: Vec<RtTag> = msg.tags().collect();
        assert_eq!(tags, [RtTag::Dele, RtTag::Indx, RtTag::Pad]);
    }

    #[test]
    fn test_zero_length_buffer() {
        assert_eq!(
            RtMessage::from_bytes(&[]),
            Err(WireError::MessageTooShort {
                needed: 4,
                available: 0
            })
        );
    }

    #[test]
    fn test_buffer_under_four_bytes() {
        assert_eq!(
            RtMessage::from_bytes(&[0x01]),
            Err(WireError::MessageTooShort {
                needed: 4,
                available: 1
            })
        );
    }

    #[test]
    fn test_buffer_not_multiple_of_four() {
        let result = RtMessage::from_bytes(&[0x00, 0x01, 0x00, 0x00, 0x00]);
        assert_eq!(result, Err(WireError::MessageUnaligned { length: 5 }));
    }

    #[test]
    fn test_implausible_num_tags() {
        let result = RtMessage::from_bytes(&[0xff, 0xff, 0xff, 0xef]);
        assert_eq!(
            result,
            Err(WireError::InvalidNumTags {
                num_tags: 0xefff_ffff
            })
        );
    }

    #[test]
    fn test_insufficient_payload() {
        // Declares 2 tags but ends after the offset table.
        #[rustfmt::skip]
        let buf = [
            0x02, 0x00, 0x00, 0x00,
            0x04, 0x00, 0x00, 0x00,
        ];
        assert_eq!(
            RtMessage::from_bytes(&buf),
            Err(WireError::MessageTooShort {
                needed: 16,
                available: 8
            })
        );
    }

    #[test]
    fn test_offset_not_multiple_of_four() {
        #[rustfmt::skip]
        let buf = [
            0x03, 0x00, 0x00, 0x00,
            0x04, 0x00, 0x00, 0x00,
            0x07, 0x00, 0x00, 0x00, // invalid: offset 7
            b'D', b'E', b'L', b'E',
            b'I', b'N', b'D', b'X',
            b'P', b'A', b'D', 0xff,
            0x11, 0x11, 0x11, 0x11,
            0x22, 0x22, 0x22, 0x22,
            0x33, 0x33, 0x33, 0x33,
        ];
        assert_eq!(
            RtMessage::from_bytes(&buf),
            Err(WireError::TagOffsetUnaligned {
                index: 1,
                offset: 7
            })
        );
    }

    #[test]
    fn test_offset_past_end_of_message() {
        #[rustfmt::skip]
        let buf = [
            0x02, 0x00, 0x00, 0x00,
            0x04, 0x03, 0x02, 0x01, // invalid: offset 0x01020304
            b'D', b'E', b'L', b'E',
            b'I', b'N', b'D', b'X',
            0x50, 0x50, 0x50, 0x50,
            0x60, 0x60, 0x60, 0x60,
        ];
        assert_eq!(
            RtMessage::from_bytes(&buf),
            Err(WireError::TagOffsetOverflow {
                index: 0,
                offset: 0x0102_0304
            })
        );
    }

    #[test]
    fn test_offset_not_increasing() {
        // Second explicit offset equals the first.
        #[rustfmt::skip]
        let buf = [
            0x03, 0x00, 0x00, 0x00,
            0x04, 0x00, 0x00, 0x00,
            0x04, 0x00, 0x00, 0x00, // invalid: not strictly increasing
            b'D', b'E', b'L', b'E',
            b'I', b'N', b'D', b'X',
            b'P', b'A', b'D', 0xff,
            0x11, 0x11, 0x11, 0x11,
            0x22, 0x22, 0x22, 0x22,
            0x33, 0x33, 0x33, 0x33,
        ];
        assert_eq!(
            RtMessage::from_bytes(&buf),
            Err(WireError::TagOffsetOverflow {
                index: 1,
                offset: 4
            })
        );
    }

    #[test]
    fn test_first_offset_zero_rejected() {
        #[rustfmt::skip]
        let buf = [
            0x02, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, // invalid: offset 0 is implicit
            b'D', b'E', b'L', b'E',
            b'I', b'N', b'D', b'X',
            0x50, 0x50, 0x50, 0x50,
        ];
        assert_eq!(
            RtMessage::from_bytes(&buf),
            Err(WireError::TagOffsetOverflow {
                index: 0,
                offset: 0
            })
        );
    }

    #[test]
    fn test_tags_not_increasing() {
        #[rustfmt::skip]
        let buf = [
            0x02, 0x00, 0x00, 0x00,
            0x04, 0x00, 0x00, 0x00,
            b'I', b'N', b'D', b'X',
            b'D', b'E', b'L', b'E', // invalid: DELE sorts before INDX
            0x50, 0x50, 0x50, 0x50,
            0x60, 0x60, 0x60, 0x60,
        ];
        assert_eq!(
            RtMessage::from_bytes(&buf),
            Err(WireError::TagsNotIncreasing { index: 1 })
        );
    }

    #[test]
    fn test_duplicate_tags_rejected() {
        #[rustfmt::skip]
        let buf = [
            0x02, 0x00, 0x00, 0x00,
            0x04, 0x00, 0x00, 0x00,
            b'D', b'E', b'L', b'E',
            b'D', b'E', b'L', b'E',
            0x50, 0x50, 0x50, 0x50,
            0x60, 0x60, 0x60, 0x60,
        ];
        assert_eq!(
            RtMessage::from_bytes(&buf),
            Err(WireError::TagsNotIncreasing { index: 1 })
        );
    }

    #[test]
    fn test_unknown_tag_rejected() {
        #[rustfmt::skip]
        let buf = [
            0x01, 0x00, 0x00, 0x00,
            b'Q', b'Q', b'Q', b'Q',
            0x50, 0x50, 0x50, 0x50,
        ];
        assert_eq!(
            RtMessage::from_bytes(&buf),
            Err(WireError::InvalidTag {
                value: u32::from_le_bytes(*b"QQQQ")
            })
        );
    }

    #[test]
    fn test_values_are_owned_copies() {
        let mut buf = alloc::vec![
            0x01, 0x00, 0x00, 0x00, b'C', b'E', b'R', b'T', 0x50, 0x50, 0x50, 0x50,
        ];
        let msg = RtMessage::from_bytes(&buf).unwrap();
        buf[8] = 0xff;
        assert_eq!(msg.get(RtTag::Cert), Some(&[0x50, 0x50, 0x50, 0x50][..]));
    }

    #[test]
    fn test_require_missing_tag() {
        let msg = RtMessage::from_bytes(&[0x00, 0x00, 0x00, 0x00]).unwrap();
        assert_eq!(
            msg.require(RtTag::Nonc),
            Err(WireError::MissingTag { tag: RtTag::Nonc })
        );
    }

    #[test]
    fn test_get_u32_and_u64() {
        #[rustfmt::skip]
        let buf = [
            0x02, 0x00, 0x00, 0x00,
            0x04, 0x00, 0x00, 0x00, // MIDP starts after RADI's 4 bytes
            b'R', b'A', b'D', b'I',
            b'M', b'I', b'D', b'P',
            0x40, 0x42, 0x0f, 0x00, // RADI = 1_000_000
            0x00, 0x00, 0xf4, 0x48, 0x82, 0x09, 0x06, 0x00, // MIDP
        ];
        let msg = RtMessage::from_bytes(&buf).unwrap();
        assert_eq!(msg.get_u32(RtTag::Radi), Ok(1_000_000));
        assert_eq!(msg.get_u64(RtTag::Midp), Ok(0x0006_0982_48f4_0000));
        assert_eq!(
            msg.get_u64(RtTag::Radi),
            Err(WireError::InvalidValueLength {
                tag: RtTag::Radi,
                expected: 8,
                actual: 4
            })
        );
    }
}
