// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Assembly of canonical Roughtime messages.
//!
//! [`RtMessageBuilder`] keeps its entries in a map ordered by tag wire
//! value, so the canonical-order invariant holds by construction and no
//! sort pass is needed at encode time. `build` consumes the builder: the
//! accumulating/built state machine is enforced by ownership, and a built
//! [`RtMessage`] can never be mutated through its builder.

use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;

use crate::error::WireError;
use crate::message::RtMessage;
use crate::tag::RtTag;
use crate::wire::{self, BufferSource, HeapBufferSource, MIN_REQUEST_LENGTH};

/// Builder for [`RtMessage`] values.
///
/// ```
/// use securetime_proto::{RtMessageBuilder, RtTag};
///
/// let message = RtMessageBuilder::new()
///     .add(RtTag::Nonc, [0u8; 64])
///     .add_padding(true)
///     .build()?;
/// assert_eq!(message.encoded_size(), securetime_proto::MIN_REQUEST_LENGTH);
/// # Ok::<(), securetime_proto::WireError>(())
/// ```
#[derive(Clone, Debug)]
pub struct RtMessageBuilder<B: BufferSource = HeapBufferSource> {
    map: BTreeMap<RtTag, Vec<u8>>,
    source: B,
    pad_to_minimum: bool,
}

impl RtMessageBuilder<HeapBufferSource> {
    /// Create an empty builder using the default heap buffer source.
    pub fn new() -> Self {
        RtMessageBuilder {
            map: BTreeMap::new(),
            source: HeapBufferSource,
            pad_to_minimum: false,
        }
    }
}

impl Default for RtMessageBuilder<HeapBufferSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: BufferSource> RtMessageBuilder<B> {
    /// Add a tag with a copy of the given value bytes.
    ///
    /// The bytes are copied immediately, so the source may be transient.
    /// Adding a tag that is already present replaces its value.
    pub fn add<V: AsRef<[u8]>>(mut self, tag: RtTag, value: V) -> Self {
        self.map.insert(tag, value.as_ref().to_vec());
        self
    }

    /// Add a tag whose value is the encoding of a nested message.
    ///
    /// The message is encoded through this builder's buffer source and
    /// stored as an ordinary opaque value with no additional framing.
    pub fn add_message(mut self, tag: RtTag, message: &RtMessage) -> Self {
        self.map.insert(tag, wire::to_wire_in(message, &self.source));
        self
    }

    /// Enable or disable padding to [`MIN_REQUEST_LENGTH`]. Off by default.
    pub fn add_padding(mut self, pad: bool) -> Self {
        self.pad_to_minimum = pad;
        self
    }

    /// Replace the buffer source used when encoding nested messages.
    pub fn buffer_source<B2: BufferSource>(self, source: B2) -> RtMessageBuilder<B2> {
        RtMessageBuilder {
            map: self.map,
            source,
            pad_to_minimum: self.pad_to_minimum,
        }
    }

    /// Build the message, consuming the builder.
    ///
    /// Fails with [`WireError::EmptyMessage`] if nothing was added: the wire
    /// format can represent zero tags, but building one is treated as a
    /// usage error.
    ///
    /// With padding enabled, a message whose encoding falls short of
    /// [`MIN_REQUEST_LENGTH`] gets a zero-filled `PAD` entry sized to reach
    /// it exactly. The `PAD` tag sorts after every other tag, so the filler
    /// is always the final value and may take any length.
    pub fn build(mut self) -> Result<RtMessage, WireError> {
        if self.map.is_empty() {
            return Err(WireError::EmptyMessage);
        }

        let encoded_size = wire::encoded_size_of_map(&self.map);
        if self.pad_to_minimum && encoded_size < MIN_REQUEST_LENGTH {
            // Adding PAD grows the header by 8 bytes: one offset entry plus
            // the tag itself. The overhead alone may reach the minimum, in
            // which case the pad value is empty.
            let pad_overhead = 8;
            let padding = MIN_REQUEST_LENGTH.saturating_sub(encoded_size + pad_overhead);
            self.map.insert(RtTag::Pad, vec![0u8; padding]);
        }

        Ok(RtMessage::from_map(self.map))
    }
}
