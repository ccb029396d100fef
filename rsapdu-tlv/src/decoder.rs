//! Untyped BER-TLV parsing
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use rsapdu_tlv::decoder::{Tlv, TlvReader};
//!
//! let tlv = Tlv::parse(&data)?;
//! for child in tlv.children() {
//!     let child = child?;
//!     println!("{} => {} bytes", child.tag(), child.length());
//! }
//! ```

use crate::error::{ApduError, ApduResult};
use crate::types::{Length, Tag};

/// One parsed tag/length/value node
///
/// The node borrows its value from the parsed buffer; nothing is copied.
///
/// # Offsets
///
/// `end_offset` is the position right after the value, relative to the
/// buffer handed to [`Tlv::parse`], so sibling nodes can be read without
/// re-slicing:
///
/// ```text
/// | tag | length | value ........ | next sibling ...
/// 0     header_length             end_offset
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tlv<'a> {
    tag: Tag,
    value: &'a [u8],
    header_length: usize,
    end_offset: usize,
}

impl<'a> Tlv<'a> {
    /// Parse the node starting at offset 0 of `buffer`
    ///
    /// Bytes after the node are left alone; use [`end_offset`](Self::end_offset)
    /// or [`TlvReader`] to continue with the next sibling.
    ///
    /// # Arguments
    /// * `buffer` - Buffer whose first byte is a tag byte
    ///
    /// # Returns
    /// The node, its value borrowed from `buffer`
    ///
    /// # Errors
    /// - `ApduError::Range` if the buffer ends before the declared value does
    /// - `ApduError::Protocol` for malformed tag or length encodings
    pub fn parse(buffer: &'a [u8]) -> ApduResult<Self> {
        let (tag, length, header_length) = Self::parse_header(buffer)?;
        let end_offset = header_length + length;
        if end_offset > buffer.len() {
            return Err(ApduError::Range(format!(
                "TLV {} declares {} value bytes, only {} available",
                tag,
                length,
                buffer.len() - header_length
            )));
        }

        Ok(Self {
            tag,
            value: &buffer[header_length..end_offset],
            header_length,
            end_offset,
        })
    }

    /// Parse only the tag and length fields
    ///
    /// Does not check that the value fits in `buffer`, so callers can report
    /// an overrun in their own terms.
    ///
    /// # Arguments
    /// * `buffer` - Buffer whose first byte is a tag byte
    ///
    /// # Returns
    /// `(tag, value_length, header_length)`
    ///
    /// # Errors
    /// Same as [`Tag::decode`] and [`Length::decode`]
    pub fn parse_header(buffer: &[u8]) -> ApduResult<(Tag, usize, usize)> {
        let (tag, tag_bytes) = Tag::decode(buffer)?;
        let (length, length_bytes) = Length::decode(&buffer[tag_bytes..])?;
        Ok((tag, length.value(), tag_bytes + length_bytes))
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Declared value length
    pub fn length(&self) -> usize {
        self.value.len()
    }

    pub fn value(&self) -> &'a [u8] {
        self.value
    }

    /// Size of the tag and length fields
    pub fn header_length(&self) -> usize {
        self.header_length
    }

    /// Position immediately after the value
    pub fn end_offset(&self) -> usize {
        self.end_offset
    }

    /// Iterate over the nodes nested in a constructed value
    ///
    /// On a primitive node this reads the value bytes as TLVs, which is
    /// rarely meaningful; check [`Tag::is_constructed`] first.
    pub fn children(&self) -> TlvReader<'a> {
        TlvReader::new(self.value)
    }
}

/// Sequential reader over sibling TLVs in one buffer
///
/// # Position Tracking
///
/// Each read advances the position by the node's `end_offset`. As an
/// [`Iterator`] the reader yields `ApduResult<Tlv>` and stops after the first
/// malformed node, since the framing of everything behind it is unknown.
#[derive(Debug, Clone)]
pub struct TlvReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> TlvReader<'a> {
    /// Create a reader at the start of `buffer`
    ///
    /// # Arguments
    /// * `buffer` - Concatenated sibling TLVs
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Offset of the next node in the buffer
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn has_remaining(&self) -> bool {
        self.position < self.buffer.len()
    }

    /// Read the next sibling, advancing by its `end_offset`
    ///
    /// # Errors
    /// Same as [`Tlv::parse`]; the position is not advanced on error
    pub fn read_tlv(&mut self) -> ApduResult<Tlv<'a>> {
        let tlv = Tlv::parse(&self.buffer[self.position..])?;
        self.position += tlv.end_offset();
        Ok(tlv)
    }
}

impl<'a> Iterator for TlvReader<'a> {
    type Item = ApduResult<Tlv<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_remaining() {
            return None;
        }
        match self.read_tlv() {
            Ok(tlv) => Some(Ok(tlv)),
            Err(e) => {
                // Stop after the first malformed node
                self.position = self.buffer.len();
                Some(Err(e))
            }
        }
    }
}

/// Depth-first search for `tag` in a sequence of sibling TLVs
///
/// Constructed nodes are entered before their next sibling is read, so the
/// first match in document order wins. The walk keeps its own stack of
/// readers instead of recursing, so nesting depth is bounded only by the
/// buffer size.
///
/// # Arguments
/// * `buffer` - Concatenated sibling TLVs
/// * `tag` - Tag to look for, compared on class, constructed flag and number
///
/// # Returns
/// The first matching node, or `None` if no node carries `tag`
///
/// # Errors
/// Same as [`Tlv::parse`] for the first malformed node met before a match
pub fn find_tag<'a>(buffer: &'a [u8], tag: &Tag) -> ApduResult<Option<Tlv<'a>>> {
    let mut stack = vec![TlvReader::new(buffer)];

    while let Some(reader) = stack.last_mut() {
        let tlv = match reader.next() {
            Some(tlv) => tlv?,
            None => {
                stack.pop();
                continue;
            }
        };

        if tlv.tag() == tag {
            return Ok(Some(tlv));
        }
        if tlv.tag().is_constructed() {
            stack.push(tlv.children());
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TagClass;

    #[test]
    fn test_parse_primitive() {
        let data = [0x80, 0x02, 0xAB, 0xCD, 0xFF];
        let tlv = Tlv::parse(&data).unwrap();
        assert_eq!(tlv.tag().class(), TagClass::ContextSpecific);
        assert!(!tlv.tag().is_constructed());
        assert_eq!(tlv.tag().number(), 0);
        assert_eq!(tlv.value(), &[0xAB, 0xCD]);
        assert_eq!(tlv.end_offset(), 4);
    }

    #[test]
    fn test_parse_long_length() {
        let mut data = vec![0x04, 0x82, 0x01, 0x00];
        data.extend(std::iter::repeat(0x55).take(256));
        let tlv = Tlv::parse(&data).unwrap();
        assert_eq!(tlv.length(), 256);
        assert_eq!(tlv.header_length(), 4);
        assert_eq!(tlv.end_offset(), 260);
    }

    #[test]
    fn test_parse_truncated_value() {
        assert!(matches!(Tlv::parse(&[0x80, 0x05, 0x01]), Err(ApduError::Range(_))));
    }

    #[test]
    fn test_reader_siblings() {
        let data = [0x80, 0x01, 0x01, 0x81, 0x00, 0x82, 0x02, 0x02, 0x03];
        let nodes: Vec<_> = TlvReader::new(&data).collect::<ApduResult<_>>().unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[1].length(), 0);
        assert_eq!(nodes[2].value(), &[0x02, 0x03]);
    }

    #[test]
    fn test_find_tag_nested() {
        // 6F { 84 01 A0, A5 { 50 02 'O' 'K' } }
        let data = [0x6F, 0x09, 0x84, 0x01, 0xA0, 0xA5, 0x04, 0x50, 0x02, b'O', b'K'];
        let found = find_tag(&data, &Tag::application(false, 0x10)).unwrap().unwrap();
        assert_eq!(found.value(), b"OK");
        assert!(find_tag(&data, &Tag::private(false, 1)).unwrap().is_none());
    }

    #[test]
    fn test_find_tag_document_order() {
        // A1 { 80 01 01 } 80 01 02: the nested 80 comes first
        let data = [0xA1, 0x03, 0x80, 0x01, 0x01, 0x80, 0x01, 0x02];
        let found = find_tag(&data, &Tag::context_specific(false, 0)).unwrap().unwrap();
        assert_eq!(found.value(), &[0x01]);
    }

    #[test]
    fn test_find_tag_deep_nesting() {
        // 20000 nested constructed nodes around one primitive leaf
        let leaf = [0x80, 0x01, 0x7A];
        let mut headers = Vec::new();
        let mut inner_len = leaf.len();
        for _ in 0..20_000 {
            let mut header = vec![0x20];
            header.extend(Length::new(inner_len).encode());
            inner_len += header.len();
            headers.push(header);
        }
        let mut data: Vec<u8> = headers.into_iter().rev().flatten().collect();
        data.extend_from_slice(&leaf);
        assert_eq!(data.len(), inner_len);
        assert!(data.len() > 60_000);

        let found = find_tag(&data, &Tag::context_specific(false, 0)).unwrap().unwrap();
        assert_eq!(found.value(), &[0x7A]);
        assert!(find_tag(&data, &Tag::private(false, 9)).unwrap().is_none());
    }

    #[test]
    fn test_find_tag_malformed_child() {
        // A1 declares a child of 5 bytes but holds 1
        let data = [0xA1, 0x03, 0x80, 0x05, 0x01];
        assert!(matches!(
            find_tag(&data, &Tag::private(false, 1)),
            Err(ApduError::Range(_))
        ));
    }
}
