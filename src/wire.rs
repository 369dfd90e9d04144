// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Canonical wire encoding of Roughtime messages.
//!
//! Layout, little-endian throughout:
//! ```text
//! num_tags: u32
//! offsets:  [u32; N-1]   (cumulative byte offsets into the value region)
//! tags:     [[u8; 4]; N] (ascending by LE u32 value)
//! values:   [u8]         (concatenated, in tag order)
//! ```
//!
//! A message with one tag omits the offset table; a message with zero tags
//! is the bare `num_tags` field. Encoding a given map always produces one
//! byte layout: signatures are computed over encoded bytes, so canonical
//! form is a correctness requirement, not a convention.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

#[cfg(feature = "std")]
use byteorder::{LE, WriteBytesExt};
#[cfg(feature = "std")]
use std::io;

use crate::error::WireError;
use crate::message::RtMessage;
use crate::tag::RtTag;

/// Minimum size in bytes of a request message. Requests shorter than a
/// response could be abused for traffic amplification, so the builder pads
/// them up to this size.
pub const MIN_REQUEST_LENGTH: usize = 1024;

/// Size in bytes of a client nonce (`NONC` value).
pub const NONCE_LENGTH: usize = 64;

/// Size in bytes of an Ed25519 signature (`SIG` value).
pub const SIGNATURE_LENGTH: usize = 64;

/// Size in bytes of an Ed25519 public key (`PUBK` value).
pub const PUBKEY_LENGTH: usize = 32;

/// Size in bytes of a timestamp value (`MIDP`, `MINT`, `MAXT`).
pub const TIMESTAMP_LENGTH: usize = 8;

/// Size in bytes of an uncertainty radius value (`RADI`).
pub const RADIUS_LENGTH: usize = 4;

/// A buffer-allocation strategy for encoding.
///
/// This is a seam for callers that manage their own memory (pools, arenas),
/// not part of the wire contract. [`HeapBufferSource`] is the default.
pub trait BufferSource {
    /// Return an empty buffer with at least `capacity` bytes reserved.
    fn buffer(&self, capacity: usize) -> Vec<u8>;
}

/// The default heap-backed buffer source.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeapBufferSource;

impl BufferSource for HeapBufferSource {
    fn buffer(&self, capacity: usize) -> Vec<u8> {
        Vec::with_capacity(capacity)
    }
}

/// The exact byte length of a message's wire encoding.
pub fn encoded_size(message: &RtMessage) -> usize {
    encoded_size_of_map(&message.map)
}

pub(crate) fn encoded_size_of_map(map: &BTreeMap<RtTag, Vec<u8>>) -> usize {
    let n = map.len();
    if n == 0 {
        return 4;
    }
    let values: usize = map.values().map(Vec::len).sum();
    4 + 4 * (n - 1) + 4 * n + values
}

/// Encode a message into `buf`, returning the number of bytes written.
///
/// Fails with [`WireError::MessageTooShort`] if `buf` cannot hold the full
/// encoding; nothing is written in that case.
///
/// # Panics
///
/// Panics if any value except the last (in tag order) is not a multiple of
/// 4 bytes: such a map has no canonical encoding, since offsets are
/// required to be 4-byte aligned.
pub fn encode_into(message: &RtMessage, buf: &mut [u8]) -> Result<usize, WireError> {
    encode_map_into(&message.map, buf)
}

pub(crate) fn encode_map_into(
    map: &BTreeMap<RtTag, Vec<u8>>,
    buf: &mut [u8],
) -> Result<usize, WireError> {
    check_value_alignment(map);
    let size = encoded_size_of_map(map);
    if buf.len() < size {
        return Err(WireError::MessageTooShort {
            needed: size,
            available: buf.len(),
        });
    }
    Ok(write_map_unchecked(map, buf))
}

/// Encode a message to a freshly allocated buffer.
///
/// # Panics
///
/// See [`encode_into`].
pub fn to_wire(message: &RtMessage) -> Vec<u8> {
    to_wire_in(message, &HeapBufferSource)
}

/// Encode a message to a buffer obtained from `source`.
///
/// # Panics
///
/// See [`encode_into`].
pub fn to_wire_in<B: BufferSource>(message: &RtMessage, source: &B) -> Vec<u8> {
    let map = &message.map;
    check_value_alignment(map);
    let size = encoded_size_of_map(map);
    let mut buf = source.buffer(size);
    buf.resize(size, 0);
    write_map_unchecked(map, &mut buf);
    buf
}

/// Write a message's wire encoding to `writer`.
///
/// Streaming counterpart of [`encode_into`] for `io::Write` destinations.
///
/// # Panics
///
/// See [`encode_into`].
#[cfg(feature = "std")]
pub fn write_wire<W: WriteBytesExt>(message: &RtMessage, mut writer: W) -> io::Result<()> {
    let map = &message.map;
    check_value_alignment(map);
    let n = map.len();
    writer.write_u32::<LE>(n as u32)?;
    if n > 1 {
        let mut cumulative = 0u32;
        for value in map.values().take(n - 1) {
            cumulative += value.len() as u32;
            writer.write_u32::<LE>(cumulative)?;
        }
    }
    for tag in map.keys() {
        writer.write_all(&tag.wire_bytes())?;
    }
    for value in map.values() {
        writer.write_all(value)?;
    }
    Ok(())
}

// Offsets are cumulative value lengths, so every value before the last must
// keep them 4-byte aligned.
fn check_value_alignment(map: &BTreeMap<RtTag, Vec<u8>>) {
    let n = map.len();
    for (tag, value) in map.iter().take(n.saturating_sub(1)) {
        assert!(
            value.len() % 4 == 0,
            "value for tag {} is {} bytes; every value before the last must be a multiple of 4",
            tag,
            value.len()
        );
    }
}

// Caller has verified `buf` holds at least `encoded_size_of_map` bytes.
fn write_map_unchecked(map: &BTreeMap<RtTag, Vec<u8>>, buf: &mut [u8]) -> usize {
    let n = map.len();
    buf[0..4].copy_from_slice(&(n as u32).to_le_bytes());
    let mut pos = 4;

    if n > 1 {
        let mut cumulative = 0u32;
        for value in map.values().take(n - 1) {
            cumulative += value.len() as u32;
            buf[pos..pos + 4].copy_from_slice(&cumulative.to_le_bytes());
            pos += 4;
        }
    }

    for tag in map.keys() {
        buf[pos..pos + 4].copy_from_slice(&tag.wire_bytes());
        pos += 4;
    }

    for value in map.values() {
        buf[pos..pos + value.len()].copy_from_slice(value);
        pos += value.len();
    }

    pos
}
