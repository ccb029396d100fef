//! In-memory transport replaying a recorded exchange
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use rsapdu_transport::ScriptedTransport;
//!
//! let transport = ScriptedTransport::new()
//!     .expect_hex("00A4040007A0000000031010", "6F10...9000")?
//!     .expect_hex("00C0000010", "...9000")?;
//! ```

use crate::error::{ApduError, ApduResult};
use crate::transport::Transport;
use async_trait::async_trait;
use log::trace;
use rsapdu_core::hex::{decode_hex, encode_hex};
use std::collections::VecDeque;

/// Transport that answers from a queue of expected command/response pairs
///
/// Every command received is recorded, including unexpected ones, so a
/// test can inspect what was actually sent after a failure.
#[derive(Debug, Default, Clone)]
pub struct ScriptedTransport {
    script: VecDeque<(Vec<u8>, Vec<u8>)>,
    sent: Vec<Vec<u8>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one exchange
    pub fn expect(mut self, command: impl Into<Vec<u8>>, response: impl Into<Vec<u8>>) -> Self {
        self.script.push_back((command.into(), response.into()));
        self
    }

    /// Queue one exchange given as hex strings
    ///
    /// # Errors
    /// Returns `ApduError::Validation` if either string is not valid hex
    pub fn expect_hex(self, command: &str, response: &str) -> ApduResult<Self> {
        let command = decode_hex(command)?;
        let response = decode_hex(response)?;
        Ok(self.expect(command, response))
    }

    /// Commands received so far, in order
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }

    /// Number of queued exchanges not yet consumed
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.script.is_empty()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn raw_transmit(&mut self, command: &[u8]) -> ApduResult<Vec<u8>> {
        self.sent.push(command.to_vec());

        let (expected, response) = self.script.pop_front().ok_or_else(|| {
            ApduError::Transmission(format!(
                "Script exhausted, unexpected command {}",
                encode_hex(command)
            ))
        })?;

        if expected != command {
            return Err(ApduError::Transmission(format!(
                "Unexpected command: expected {}, got {}",
                encode_hex(&expected),
                encode_hex(command)
            )));
        }

        trace!("scripted {} -> {}", encode_hex(command), encode_hex(&response));
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsapdu_core::ErrorCode;

    #[tokio::test]
    async fn test_replay() {
        let mut transport = ScriptedTransport::new()
            .expect(vec![0x00, 0x84, 0x00, 0x00, 0x08], vec![1, 2, 3, 4, 5, 6, 7, 8, 0x90, 0x00])
            .expect_hex("00 C0 00 00 02", "AABB9000")
            .unwrap();
        assert_eq!(transport.remaining(), 2);

        let response = transport.raw_transmit(&[0x00, 0x84, 0x00, 0x00, 0x08]).await.unwrap();
        assert_eq!(response.len(), 10);
        let response = transport.raw_transmit(&[0x00, 0xC0, 0x00, 0x00, 0x02]).await.unwrap();
        assert_eq!(response, vec![0xAA, 0xBB, 0x90, 0x00]);

        assert!(transport.is_exhausted());
        assert_eq!(transport.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_unexpected_command() {
        let mut transport = ScriptedTransport::new().expect(vec![0x00, 0xB0, 0x00, 0x00, 0x00], vec![0x90, 0x00]);
        let err = transport.raw_transmit(&[0x00, 0xB2, 0x01, 0x0C, 0x00]).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Transmission);
        assert_eq!(transport.sent(), &[vec![0x00, 0xB2, 0x01, 0x0C, 0x00]]);
    }

    #[tokio::test]
    async fn test_exhausted() {
        let mut transport = ScriptedTransport::new();
        assert!(matches!(
            transport.raw_transmit(&[0x00, 0x00, 0x00, 0x00]).await,
            Err(ApduError::Transmission(_))
        ));
    }

    #[test]
    fn test_expect_hex_invalid() {
        assert!(ScriptedTransport::new().expect_hex("0G", "9000").is_err());
    }
}
