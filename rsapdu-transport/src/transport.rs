//! Transport trait and physical protocol selection

use crate::error::ApduResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One physical APDU exchange with a card
///
/// Implementations send `command` as-is and return the raw response bytes
/// including SW1-SW2. Timeouts, reconnection and reader selection are the
/// implementation's concern; a failed exchange is reported as
/// `ApduError::Transmission` or `ApduError::Connection`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Exchange one command APDU
    ///
    /// # Arguments
    ///
    /// * `command` - Serialized command APDU
    ///
    /// # Returns
    ///
    /// Response data followed by SW1 and SW2
    async fn raw_transmit(&mut self, command: &[u8]) -> ApduResult<Vec<u8>>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn raw_transmit(&mut self, command: &[u8]) -> ApduResult<Vec<u8>> {
        (**self).raw_transmit(command).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &mut T {
    async fn raw_transmit(&mut self, command: &[u8]) -> ApduResult<Vec<u8>> {
        (**self).raw_transmit(command).await
    }
}

/// Negotiated transmission protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Protocol {
    /// Character-oriented contact protocol; short APDUs only
    T0,
    /// Block-oriented contact protocol
    #[default]
    T1,
    /// Contactless (ISO 14443-4)
    #[serde(rename = "TCL")]
    Tcl,
}

impl Protocol {
    /// Whether extended Lc/Le can be carried
    pub fn supports_extended(&self) -> bool {
        !matches!(self, Protocol::T0)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Protocol::T0 => "T=0",
            Protocol::T1 => "T=1",
            Protocol::Tcl => "T=CL",
        };
        f.write_str(name)
    }
}
