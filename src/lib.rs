// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Roughtime tag-value message wire format.
//!
//! Roughtime exchanges signed time assertions as self-describing tagged
//! binary messages: a header with tag count and cumulative offsets, sorted
//! 4-byte tags, then the concatenated values.
//!
//! Layout:
//! ```text
//! num_tags: u32 LE
//! offsets:  [u32 LE; N-1]   (cumulative byte offsets into value region)
//! tags:     [[u8; 4]; N]    (sorted ascending by LE u32 value)
//! values:   [u8]            (concatenated, 4-byte aligned)
//! ```
//!
//! This crate is the codec only: [`RtMessage::from_bytes`] validates every
//! bound of untrusted peer input before trusting any length-derived
//! computation, and the encoder always produces the one canonical byte
//! layout, so signed sub-messages are bit-reproducible. Transport,
//! signature verification, and the request/response exchange are the
//! caller's concern.
//!
//! # Usage
//!
//! ```
//! use securetime_proto::{RtMessage, RtMessageBuilder, RtTag};
//!
//! let message = RtMessageBuilder::new()
//!     .add(RtTag::Nonc, [0x2a; 64])
//!     .add(RtTag::Ver, 1u32.to_le_bytes())
//!     .add_padding(true)
//!     .build()?;
//! let bytes = message.to_wire();
//!
//! let decoded = RtMessage::from_bytes(&bytes)?;
//! assert_eq!(decoded.get(RtTag::Nonc), Some(&[0x2a; 64][..]));
//! assert_eq!(decoded.get_u32(RtTag::Ver)?, 1);
//! # Ok::<(), securetime_proto::WireError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Message assembly with canonical ordering and anti-amplification padding.
pub mod builder;

/// Error types for wire format decoding and message building.
pub mod error;

/// Decoded messages and the decode validation state machine.
pub mod message;

/// Tag identifiers and their canonical wire ordering.
pub mod tag;

/// Canonical wire encoding, size computation, and protocol constants.
pub mod wire;

pub use builder::RtMessageBuilder;
pub use error::WireError;
pub use message::RtMessage;
pub use tag::RtTag;
pub use wire::{BufferSource, HeapBufferSource, MIN_REQUEST_LENGTH};
