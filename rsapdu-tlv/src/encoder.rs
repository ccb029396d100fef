//! BER-TLV encoder
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use rsapdu_tlv::{Tag, TlvEncoder};
//!
//! let mut encoder = TlvEncoder::new();
//! encoder.encode_constructed(&Tag::application(true, 0x0F), |inner| {
//!     inner.encode_tlv(&Tag::context_specific(false, 4), &[0xA0, 0x00]);
//!     Ok(())
//! })?;
//! let bytes = encoder.into_bytes();
//! ```

use crate::error::ApduResult;
use crate::types::{Length, Tag};

/// Accumulates BER-TLV encoded nodes
#[derive(Debug, Default, Clone)]
pub struct TlvEncoder {
    buffer: Vec<u8>,
}

impl TlvEncoder {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Append one node with an already encoded value
    pub fn encode_tlv(&mut self, tag: &Tag, value: &[u8]) {
        self.buffer.extend_from_slice(&tag.encode());
        self.buffer.extend_from_slice(&Length::new(value.len()).encode());
        self.buffer.extend_from_slice(value);
    }

    /// Append a constructed node whose children are written by `build`
    pub fn encode_constructed<F>(&mut self, tag: &Tag, build: F) -> ApduResult<()>
    where
        F: FnOnce(&mut TlvEncoder) -> ApduResult<()>,
    {
        let mut inner = TlvEncoder::new();
        build(&mut inner)?;
        self.encode_tlv(tag, &inner.buffer);
        Ok(())
    }

    /// Append raw, pre-encoded bytes
    pub fn append_raw(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}
