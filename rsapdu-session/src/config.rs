//! Session configuration

use crate::error::{ApduError, ApduResult};
use rsapdu_core::commands::CLA_ISO;
use rsapdu_transport::Protocol;
use serde::{Deserialize, Serialize};

/// Upper bound on physical exchanges per logical transmit
pub const MAX_ITERATIONS: usize = 256;

/// Session settings
///
/// # Example
///
/// ```rust,ignore
/// let config = SessionConfig::new()
///     .with_protocol(Protocol::T0)
///     .with_max_iterations(32);
/// config.validate()?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Protocol negotiated with the card
    pub protocol: Protocol,
    /// Physical exchanges allowed for one logical transmit (1..=256)
    pub max_iterations: usize,
    /// On T=0, drop the Le of case 4 commands and fetch the data with GET RESPONSE
    pub strip_le_on_t0: bool,
    /// CLA used for MANAGE CHANNEL on the basic channel
    pub basic_cla: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            protocol: Protocol::T1,
            max_iterations: MAX_ITERATIONS,
            strip_le_on_t0: true,
            basic_cla: CLA_ISO,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_strip_le_on_t0(mut self, strip: bool) -> Self {
        self.strip_le_on_t0 = strip;
        self
    }

    pub fn with_basic_cla(mut self, cla: u8) -> Self {
        self.basic_cla = cla;
        self
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns `ApduError::InvalidParameter` if `max_iterations` is outside
    /// 1..=256 or `basic_cla` is in the reserved `0010xxxx` range or `0xFF`
    pub fn validate(&self) -> ApduResult<()> {
        if !(1..=MAX_ITERATIONS).contains(&self.max_iterations) {
            return Err(ApduError::InvalidParameter(format!(
                "max_iterations must be 1..={}, got {}",
                MAX_ITERATIONS, self.max_iterations
            )));
        }
        if self.basic_cla & 0xF0 == 0x20 || self.basic_cla == 0xFF {
            return Err(ApduError::InvalidParameter(format!(
                "basic_cla 0x{:02X} is reserved",
                self.basic_cla
            )));
        }
        Ok(())
    }
}
