//! Logical channel numbers in the CLA byte (ISO 7816-4 §5.4.1)
//!
//! ```text
//! Channels 0-3  (first interindustry):   x 0 0 x  x x C C   mask 0xBC
//! Channels 4-19 (further interindustry): x 1 x x  C C C C   mask 0xB0, C = channel - 4
//! ```

use crate::error::{ApduError, ApduResult};

/// Highest addressable logical channel
pub const MAX_CHANNEL: u8 = 19;

/// Encode `channel` into `cla`
///
/// Channel 0 leaves the CLA untouched, whatever its value, so proprietary
/// and reader pseudo-APDU classes (`FF CA ..`) pass through on the basic
/// channel.
///
/// # Errors
/// Returns `ApduError::InvalidParameter` if `channel` exceeds 19, or if
/// `channel` is non-zero and `cla` is in the reserved `0010xxxx` range or
/// is `0xFF`
pub fn encode_channel(cla: u8, channel: u8) -> ApduResult<u8> {
    if channel == 0 {
        return Ok(cla);
    }
    if cla & 0xF0 == 0x20 || cla == 0xFF {
        return Err(ApduError::InvalidParameter(format!(
            "CLA 0x{:02X} is reserved",
            cla
        )));
    }

    match channel {
        1..=3 => Ok((cla & 0xBC) | channel),
        4..=MAX_CHANNEL => Ok((cla & 0xB0) | 0x40 | (channel - 4)),
        _ => Err(ApduError::InvalidParameter(format!(
            "Logical channel {} out of range (max {})",
            channel, MAX_CHANNEL
        ))),
    }
}

/// Logical channel carried by an interindustry CLA
pub fn channel_of(cla: u8) -> u8 {
    if cla & 0x40 != 0 {
        (cla & 0x0F) + 4
    } else {
        cla & 0x03
    }
}
