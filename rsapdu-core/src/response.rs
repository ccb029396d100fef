//! Response APDU (data field followed by SW1 SW2)

use crate::error::{ApduError, ApduResult};
use crate::hex;
use crate::status;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Response APDU containing data and status word
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResponseApdu {
    #[serde(with = "serde_bytes")]
    data: Vec<u8>,
    sw1: u8,
    sw2: u8,
}

impl ResponseApdu {
    /// Create a response from its parts
    pub fn new(data: impl Into<Vec<u8>>, sw1: u8, sw2: u8) -> Self {
        Self {
            data: data.into(),
            sw1,
            sw2,
        }
    }

    /// Parse a complete raw response: the last two bytes are SW1 SW2
    ///
    /// # Errors
    /// Returns `ApduError::Range` if fewer than 2 bytes are given.
    pub fn from_bytes(bytes: &[u8]) -> ApduResult<Self> {
        if bytes.len() < 2 {
            return Err(ApduError::Range(format!(
                "Response APDU too short: {} bytes (need at least SW1 SW2)",
                bytes.len()
            )));
        }
        let split = bytes.len() - 2;
        Ok(Self {
            data: bytes[..split].to_vec(),
            sw1: bytes[split],
            sw2: bytes[split + 1],
        })
    }

    /// Serialize as data followed by SW1 SW2
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() + 2);
        out.extend_from_slice(&self.data);
        out.push(self.sw1);
        out.push(self.sw2);
        out
    }

    pub fn from_hex(s: &str) -> ApduResult<Self> {
        Self::from_bytes(&hex::decode_hex(s)?)
    }

    pub fn to_hex(&self) -> String {
        hex::encode_hex(&self.to_bytes())
    }

    /// Response data without the status word
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Take ownership of the response data
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn sw1(&self) -> u8 {
        self.sw1
    }

    pub fn sw2(&self) -> u8 {
        self.sw2
    }

    /// Full status word as a 16-bit value
    pub fn sw(&self) -> u16 {
        ((self.sw1 as u16) << 8) | (self.sw2 as u16)
    }

    /// Check if the response indicates success (9000)
    pub fn is_success(&self) -> bool {
        self.sw() == status::SUCCESS
    }

    /// Status word as hex string (e.g., "9000")
    pub fn status_string(&self) -> String {
        format!("{:02X}{:02X}", self.sw1, self.sw2)
    }

    /// Number of bytes still available when SW1 is 61
    pub fn bytes_remaining(&self) -> Option<u8> {
        (self.sw1 == status::SW1_MORE_DATA).then_some(self.sw2)
    }

    /// Remaining verification attempts when the status word is 63Cx
    pub fn retries_remaining(&self) -> Option<u8> {
        (self.sw1 == status::SW1_WARNING_NV_CHANGED && self.sw2 & 0xF0 == 0xC0)
            .then_some(self.sw2 & 0x0F)
    }
}

impl fmt::Display for ResponseApdu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<&[u8]> for ResponseApdu {
    type Error = ApduError;

    fn try_from(bytes: &[u8]) -> ApduResult<Self> {
        Self::from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes() {
        let resp = ResponseApdu::from_bytes(&[0x01, 0x02, 0x90, 0x00]).unwrap();
        assert_eq!(resp.data(), &[0x01, 0x02]);
        assert_eq!(resp.sw(), 0x9000);
        assert!(resp.is_success());
        assert_eq!(resp.status_string(), "9000");
    }

    #[test]
    fn test_status_only() {
        let resp = ResponseApdu::from_bytes(&[0x6A, 0x82]).unwrap();
        assert!(resp.data().is_empty());
        assert!(!resp.is_success());
    }

    #[test]
    fn test_too_short() {
        assert!(matches!(ResponseApdu::from_bytes(&[0x90]), Err(ApduError::Range(_))));
        assert!(matches!(ResponseApdu::from_bytes(&[]), Err(ApduError::Range(_))));
    }

    #[test]
    fn test_round_trip() {
        for raw in [vec![0x90, 0x00], vec![0xAA; 258], vec![0x00, 0x61, 0x10]] {
            assert_eq!(ResponseApdu::from_bytes(&raw).unwrap().to_bytes(), raw);
        }
    }

    #[test]
    fn test_status_helpers() {
        assert_eq!(ResponseApdu::new(vec![], 0x61, 0x0A).bytes_remaining(), Some(10));
        assert_eq!(ResponseApdu::new(vec![], 0x63, 0xC2).retries_remaining(), Some(2));
        assert_eq!(ResponseApdu::new(vec![], 0x63, 0x00).retries_remaining(), None);
        assert_eq!(ResponseApdu::new(vec![], 0x90, 0x00).bytes_remaining(), None);
    }
}
