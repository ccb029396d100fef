//! Hex string conversion for APDU traces
//!
//! Accepts the formats commonly found in card traces: `00A4040007`,
//! `00 a4 04 00 07`, or split across lines. Output is always compact uppercase.

use crate::error::{ApduError, ApduResult};
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));
static NON_HEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9A-Fa-f]").expect("static regex"));

/// Decode a hex string into bytes
///
/// # Errors
/// Returns `ApduError::Validation` if the string contains a non-hex character
/// or has an odd number of digits.
pub fn decode_hex(s: &str) -> ApduResult<Vec<u8>> {
    let compact = WHITESPACE.replace_all(s, "");

    if let Some(m) = NON_HEX.find(&compact) {
        return Err(ApduError::Validation(format!(
            "Invalid hex character '{}' at position {}",
            m.as_str(),
            m.start()
        )));
    }

    if compact.len() % 2 != 0 {
        return Err(ApduError::Validation(format!(
            "Hex string has odd length: {}",
            compact.len()
        )));
    }

    compact
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            let digits = std::str::from_utf8(pair)
                .map_err(|e| ApduError::Validation(format!("Invalid hex digits: {}", e)))?;
            u8::from_str_radix(digits, 16)
                .map_err(|e| ApduError::Validation(format!("Invalid hex byte '{}': {}", digits, e)))
        })
        .collect()
}

/// Encode bytes as compact uppercase hex
pub fn encode_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push_str(&format!("{:02X}", byte));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hex_with_spacing() {
        assert_eq!(decode_hex("00 a4 04\n00").unwrap(), vec![0x00, 0xA4, 0x04, 0x00]);
        assert_eq!(decode_hex("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_decode_hex_rejects_bad_input() {
        assert!(matches!(decode_hex("ABC"), Err(ApduError::Validation(_))));
        assert!(matches!(decode_hex("0G"), Err(ApduError::Validation(_))));
    }

    #[test]
    fn test_encode_hex() {
        assert_eq!(encode_hex(&[0x90, 0x00, 0x0a]), "90000A");
    }
}
