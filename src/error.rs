// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Error types for Roughtime wire format decoding and message building.
//!
//! [`WireError`] is `no_std`-compatible, using no heap allocation. When the
//! `std` feature is enabled, it also implements [`std::error::Error`] and can
//! be converted to [`std::io::Error`].

use core::fmt;

use crate::tag::RtTag;

/// Errors that can occur while decoding a Roughtime message or building one.
///
/// Every variant is terminal for the decode or build attempt that produced
/// it: no partial message is ever returned. A decode failure means "reject
/// this message", not a process-fatal condition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WireError {
    /// The buffer is too short for the minimum message header, or too short
    /// for the header and values its `num_tags` field declares.
    MessageTooShort {
        /// Number of bytes needed.
        needed: usize,
        /// Number of bytes available.
        available: usize,
    },
    /// The total message length is not a multiple of 4.
    MessageUnaligned {
        /// The offending length.
        length: usize,
    },
    /// The declared tag count is implausible for any encodable message, or
    /// inconsistent with the buffer contents.
    InvalidNumTags {
        /// The declared tag count.
        num_tags: u32,
    },
    /// An offset table entry is not a multiple of 4.
    TagOffsetUnaligned {
        /// Zero-based index of the offending offset.
        index: usize,
        /// The offending offset value.
        offset: u32,
    },
    /// An offset table entry is not strictly increasing or points beyond the
    /// value region.
    TagOffsetOverflow {
        /// Zero-based index of the offending offset.
        index: usize,
        /// The offending offset value.
        offset: u32,
    },
    /// Tag identifiers are not in strictly increasing wire order.
    TagsNotIncreasing {
        /// Zero-based index of the first out-of-order tag.
        index: usize,
    },
    /// A 32-bit value does not name any tag in the closed tag set.
    InvalidTag {
        /// The unrecognized wire value.
        value: u32,
    },
    /// A required tag is missing from the message.
    MissingTag {
        /// The tag that was expected.
        tag: RtTag,
    },
    /// A tag's value has an unexpected length for its fixed-width type.
    InvalidValueLength {
        /// The tag whose value was read.
        tag: RtTag,
        /// The expected length.
        expected: usize,
        /// The actual length.
        actual: usize,
    },
    /// `build()` was called on a builder with no entries.
    EmptyMessage,
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireError::MessageTooShort { needed, available } => {
                write!(
                    f,
                    "message too short: needed {} bytes, got {}",
                    needed, available
                )
            }
            WireError::MessageUnaligned { length } => {
                write!(f, "message length {} not multiple of 4", length)
            }
            WireError::InvalidNumTags { num_tags } => {
                write!(f, "invalid num_tags: {}", num_tags)
            }
            WireError::TagOffsetUnaligned { index, offset } => {
                write!(f, "offset {} not multiple of 4: {}", index, offset)
            }
            WireError::TagOffsetOverflow { index, offset } => {
                write!(f, "offset {} overflow: {}", index, offset)
            }
            WireError::TagsNotIncreasing { index } => {
                write!(f, "tags not strictly increasing at index {}", index)
            }
            WireError::InvalidTag { value } => {
                write!(f, "invalid tag: {:#010x}", value)
            }
            WireError::MissingTag { tag } => {
                write!(f, "missing required tag: {}", tag)
            }
            WireError::InvalidValueLength {
                tag,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "tag {} value has invalid length: expected {}, got {}",
                    tag, expected, actual
                )
            }
            WireError::EmptyMessage => write!(f, "cannot build an empty message"),
        }
    }
}

#[cfg(feature = "std")]
impl From<WireError> for std::io::Error {
    fn from(err: WireError) -> std::io::Error {
        let kind = match &err {
            WireError::MessageTooShort { .. } => std::io::ErrorKind::UnexpectedEof,
            _ => std::io::ErrorKind::InvalidData,
        };
        std::io::Error::new(kind, err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for WireError {}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn test_display_message_too_short() {
        let err = WireError::MessageTooShort {
            needed: 4,
            available: 1,
        };
        assert_eq!(err.to_string(), "message too short: needed 4 bytes, got 1");
    }

    #[test]
    fn test_display_message_unaligned() {
        let err = WireError::MessageUnaligned { length: 5 };
        assert_eq!(err.to_string(), "message length 5 not multiple of 4");
    }

    #[test]
    fn test_display_invalid_num_tags() {
        let err = WireError::InvalidNumTags {
            num_tags: 0xefff_ffff,
        };
        assert_eq!(err.to_string(), "invalid num_tags: 4026531839");
    }

    #[test]
    fn test_display_offset_unaligned() {
        let err = WireError::TagOffsetUnaligned {
            index: 1,
            offset: 7,
        };
        assert_eq!(err.to_string(), "offset 1 not multiple of 4: 7");
    }

    #[test]
    fn test_display_offset_overflow() {
        let err = WireError::TagOffsetOverflow {
            index: 0,
            offset: 0x0102_0304,
        };
        assert_eq!(err.to_string(), "offset 0 overflow: 16909060");
    }

    #[test]
    fn test_display_tags_not_increasing() {
        let err = WireError::TagsNotIncreasing { index: 1 };
        assert_eq!(err.to_string(), "tags not strictly increasing at index 1");
    }

    #[test]
    fn test_display_invalid_tag_is_hex() {
        let err = WireError::InvalidTag { value: 0xfeed_face };
        assert_eq!(err.to_string(), "invalid tag: 0xfeedface");
    }

    #[test]
    fn test_display_missing_tag() {
        let err = WireError::MissingTag { tag: RtTag::Nonc };
        assert_eq!(err.to_string(), "missing required tag: NONC");
    }

    #[test]
    fn test_display_invalid_value_length() {
        let err = WireError::InvalidValueLength {
            tag: RtTag::Midp,
            expected: 8,
            actual: 4,
        };
        assert_eq!(
            err.to_string(),
            "tag MIDP value has invalid length: expected 8, got 4"
        );
    }

    #[test]
    fn test_display_empty_message() {
        assert_eq!(
            WireError::EmptyMessage.to_string(),
            "cannot build an empty message"
        );
    }

    #[test]
    fn test_into_io_error() {
        let err = WireError::InvalidTag { value: 1 };
        let io_err: std::io::Error = err.into();
        assert_eq!(io_err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_message_too_short_io_error_kind() {
        let err = WireError::MessageTooShort {
            needed: 4,
            available: 0,
        };
        let io_err: std::io::Error = err.into();
        assert_eq!(io_err.kind(), std::io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_wire_error_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(WireError::EmptyMessage);
        assert_eq!(err.to_string(), "cannot build an empty message");
    }
}
