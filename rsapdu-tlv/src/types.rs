//! BER-TLV tag and length fields
//!
//! Both fields encode and decode symmetrically. Decoding works on the start
//! of a slice and reports how many bytes it consumed, so callers can walk a
//! buffer without an intermediate cursor type.
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use rsapdu_tlv::types::{Length, Tag};
//!
//! let (tag, tag_bytes) = Tag::decode(&data)?;
//! let (length, length_bytes) = Length::decode(&data[tag_bytes..])?;
//! let value = &data[tag_bytes + length_bytes..][..length.value()];
//! ```

use crate::error::{ApduError, ApduResult};
use std::fmt;

/// Tag class (bits 8-7 of the first tag byte)
///
/// ISO 7816-4 data objects mostly use Application (`01`) and
/// Context-specific (`10`) classes; Private (`11`) shows up in card-specific
/// structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagClass {
    /// Universal class (00)
    Universal = 0,
    /// Application class (01)
    Application = 1,
    /// Context-specific class (10)
    ContextSpecific = 2,
    /// Private class (11)
    Private = 3,
}

impl TagClass {
    /// Get tag class from the first tag byte
    ///
    /// # Arguments
    /// * `byte` - First tag byte; only bits 8-7 are read
    pub fn from_bits(byte: u8) -> Self {
        match (byte >> 6) & 0x03 {
            0 => TagClass::Universal,
            1 => TagClass::Application,
            2 => TagClass::ContextSpecific,
            _ => TagClass::Private,
        }
    }

    /// Class bits positioned for the first tag byte
    pub fn to_bits(self) -> u8 {
        (self as u8) << 6
    }
}

impl fmt::Display for TagClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TagClass::Universal => "Universal",
            TagClass::Application => "Application",
            TagClass::ContextSpecific => "ContextSpecific",
            TagClass::Private => "Private",
        };
        f.write_str(name)
    }
}

/// BER-TLV tag
///
/// Short form (tag number 0-30):
/// ```text
/// Bits: 8 7 6 5 4 3 2 1
///       C C P T T T T T
/// ```
///
/// Long form (tag number > 30):
/// ```text
/// First byte:      C C P 1 1 1 1 1
/// Following bytes: 1 T T T T T T T  (last byte has bit 8 = 0)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    class: TagClass,
    constructed: bool,
    number: u32,
}

impl Tag {
    /// Create a tag
    ///
    /// # Arguments
    /// * `class` - Tag class
    /// * `constructed` - Whether the value holds nested TLVs
    /// * `number` - Tag number; numbers above 30 use the long form
    pub fn new(class: TagClass, constructed: bool, number: u32) -> Self {
        Self {
            class,
            constructed,
            number,
        }
    }

    pub fn universal(constructed: bool, number: u32) -> Self {
        Self::new(TagClass::Universal, constructed, number)
    }

    pub fn application(constructed: bool, number: u32) -> Self {
        Self::new(TagClass::Application, constructed, number)
    }

    pub fn context_specific(constructed: bool, number: u32) -> Self {
        Self::new(TagClass::ContextSpecific, constructed, number)
    }

    pub fn private(constructed: bool, number: u32) -> Self {
        Self::new(TagClass::Private, constructed, number)
    }

    pub fn class(&self) -> TagClass {
        self.class
    }

    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Encode tag to bytes
    ///
    /// # Returns
    /// One byte for numbers 0-30, otherwise `0x1F`-marked first byte
    /// followed by base-128 groups, most significant first
    pub fn encode(&self) -> Vec<u8> {
        let leading = self.class.to_bits() | if self.constructed { 0x20 } else { 0x00 };

        if self.number <= 30 {
            return vec![leading | self.number as u8];
        }

        let mut groups = Vec::new();
        let mut remaining = self.number;
        while remaining > 0 {
            groups.push((remaining & 0x7F) as u8);
            remaining >>= 7;
        }

        let mut result = Vec::with_capacity(groups.len() + 1);
        result.push(leading | 0x1F);
        let last = groups.len() - 1;
        for (i, group) in groups.iter().rev().enumerate() {
            result.push(if i < last { group | 0x80 } else { *group });
        }
        result
    }

    /// Decode tag from the start of `data`
    ///
    /// # Arguments
    /// * `data` - Buffer whose first byte is a tag byte
    ///
    /// # Returns
    /// `(tag, bytes_consumed)`
    ///
    /// # Errors
    /// - `ApduError::Range` on an empty buffer
    /// - `ApduError::Protocol` if the long-form continuation is cut off or
    ///   does not fit in 32 bits
    pub fn decode(data: &[u8]) -> ApduResult<(Self, usize)> {
        let first = *data
            .first()
            .ok_or_else(|| ApduError::Range("Empty buffer for tag decoding".to_string()))?;

        let class = TagClass::from_bits(first);
        let constructed = first & 0x20 != 0;
        let low = first & 0x1F;

        if low != 0x1F {
            return Ok((Self::new(class, constructed, low as u32), 1));
        }

        let mut number = 0u32;
        let mut pos = 1;
        loop {
            let byte = *data.get(pos).ok_or_else(|| {
                ApduError::Protocol("Incomplete long-form tag encoding".to_string())
            })?;
            pos += 1;

            if number > (u32::MAX >> 7) {
                return Err(ApduError::Protocol(
                    "Tag number too large for 32 bits".to_string(),
                ));
            }
            number = (number << 7) | (byte & 0x7F) as u32;

            if byte & 0x80 == 0 {
                break;
            }
        }

        Ok((Self::new(class, constructed, number), pos))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.encode() {
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

/// BER-TLV length field
///
/// ```text
/// Short form: 0 L L L L L L L              (0-127)
/// Long form:  1 N N N N N N N  + N bytes   (big-endian, N = 1..=4)
/// ```
///
/// The indefinite form (`0x80`) is not used by ISO 7816-4 data objects and
/// is rejected on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Length {
    /// Short form: length 0-127 in a single byte
    Short(u8),
    /// Long form: `0x80 | n` followed by `n` big-endian bytes
    Long(usize),
}

impl Length {
    /// Pick the shortest form for `length`
    pub fn new(length: usize) -> Self {
        if length < 128 {
            Length::Short(length as u8)
        } else {
            Length::Long(length)
        }
    }

    /// Length in bytes of the value
    pub fn value(&self) -> usize {
        match self {
            Length::Short(l) => *l as usize,
            Length::Long(l) => *l,
        }
    }

    /// Encode length to bytes
    ///
    /// # Returns
    /// The short form, or the long form with no leading zero bytes
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Length::Short(length) => vec![*length],
            Length::Long(length) => {
                let be = length.to_be_bytes();
                let skip = be.iter().take_while(|b| **b == 0).count().min(be.len() - 1);
                let mut result = Vec::with_capacity(1 + be.len() - skip);
                result.push(0x80 | (be.len() - skip) as u8);
                result.extend_from_slice(&be[skip..]);
                result
            }
        }
    }

    /// Decode length from the start of `data`
    ///
    /// # Arguments
    /// * `data` - Buffer whose first byte is the length byte
    ///
    /// # Returns
    /// `(length, bytes_consumed)`
    ///
    /// # Errors
    /// - `ApduError::Range` if the buffer ends inside the length field
    /// - `ApduError::Protocol` for the indefinite form or more than 4 length bytes
    pub fn decode(data: &[u8]) -> ApduResult<(Self, usize)> {
        let first = *data
            .first()
            .ok_or_else(|| ApduError::Range("Empty buffer for length decoding".to_string()))?;

        if first & 0x80 == 0 {
            return Ok((Length::Short(first), 1));
        }

        let num_bytes = (first & 0x7F) as usize;
        if num_bytes == 0 {
            return Err(ApduError::Protocol(
                "Indefinite length encoding not supported".to_string(),
            ));
        }
        if num_bytes > 4 {
            return Err(ApduError::Protocol(format!(
                "Length encoding too large: {} bytes (max 4)",
                num_bytes
            )));
        }
        if data.len() < 1 + num_bytes {
            return Err(ApduError::Range(format!(
                "Buffer too short for long form length: need {} bytes, got {}",
                1 + num_bytes,
                data.len()
            )));
        }

        let length = data[1..=num_bytes]
            .iter()
            .fold(0usize, |acc, b| (acc << 8) | *b as usize);
        Ok((Length::Long(length), 1 + num_bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_short_form() {
        let (tag, consumed) = Tag::decode(&[0x61]).unwrap();
        assert_eq!(consumed, 1);
        assert_eq!(tag.class(), TagClass::Application);
        assert!(tag.is_constructed());
        assert_eq!(tag.number(), 1);
        assert_eq!(tag.encode(), vec![0x61]);
    }

    #[test]
    fn test_tag_long_form() {
        // 5F 20: Application, primitive, tag 0x20
        let (tag, consumed) = Tag::decode(&[0x5F, 0x20]).unwrap();
        assert_eq!(consumed, 2);
        assert_eq!(tag, Tag::application(false, 0x20));
        assert_eq!(tag.encode(), vec![0x5F, 0x20]);

        // 9F 81 01: two continuation bytes, tag 0x81
        let (tag, consumed) = Tag::decode(&[0x9F, 0x81, 0x01]).unwrap();
        assert_eq!(consumed, 3);
        assert_eq!(tag.number(), 0x81);
        assert_eq!(tag.encode(), vec![0x9F, 0x81, 0x01]);
    }

    #[test]
    fn test_tag_incomplete_continuation() {
        assert!(matches!(Tag::decode(&[0x5F]), Err(ApduError::Protocol(_))));
        assert!(matches!(Tag::decode(&[0x5F, 0x81]), Err(ApduError::Protocol(_))));
    }

    #[test]
    fn test_length_short() {
        let (length, consumed) = Length::decode(&[0x05]).unwrap();
        assert_eq!(consumed, 1);
        assert_eq!(length.value(), 5);
    }

    #[test]
    fn test_length_long() {
        let (length, consumed) = Length::decode(&[0x82, 0x01, 0x00]).unwrap();
        assert_eq!(consumed, 3);
        assert_eq!(length.value(), 256);
        assert_eq!(Length::new(256).encode(), vec![0x82, 0x01, 0x00]);
        assert_eq!(Length::new(200).encode(), vec![0x81, 0xC8]);
    }

    #[test]
    fn test_length_errors() {
        assert!(matches!(Length::decode(&[0x80]), Err(ApduError::Protocol(_))));
        assert!(matches!(Length::decode(&[0x85, 0, 0, 0, 0, 1]), Err(ApduError::Protocol(_))));
        assert!(matches!(Length::decode(&[0x82, 0x01]), Err(ApduError::Range(_))));
    }
}
