//! Command APDU encoding and decoding (ISO 7816-4 §5.1)
//!
//! A command APDU is a 4-byte header followed by an optional body:
//!
//! ```text
//! Case 1:   CLA INS P1 P2
//! Case 2S:  CLA INS P1 P2 Le
//! Case 3S:  CLA INS P1 P2 Lc Data(Lc)
//! Case 4S:  CLA INS P1 P2 Lc Data(Lc) Le
//! Case 2E:  CLA INS P1 P2 00 Le1 Le2
//! Case 3E:  CLA INS P1 P2 00 Lc1 Lc2 Data(Lc)
//! Case 4E:  CLA INS P1 P2 00 Lc1 Lc2 Data(Lc) Le1 Le2
//! ```
//!
//! The extended form is chosen for the whole command as soon as the data is
//! longer than 255 bytes or Le is greater than 256. Le `00` means 256 in the
//! short form and `0000` means 65536 in the extended form.

use crate::error::{ApduError, ApduResult};
use crate::hex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Header length in bytes
pub const HEADER_LENGTH: usize = 4;
/// Largest command data field
pub const MAX_DATA_LENGTH: usize = 65535;
/// Largest expected response length
pub const MAX_LE: u32 = 65536;
/// Largest Le representable in short form
pub const MAX_SHORT_LE: u32 = 256;
/// Largest Lc representable in short form
pub const MAX_SHORT_LC: usize = 255;

/// ISO 7816-4 command case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApduCase {
    /// No data, no Le
    Case1,
    /// Le only
    Case2,
    /// Data only
    Case3,
    /// Data and Le
    Case4,
}

/// Command APDU
///
/// Immutable once constructed. Header bytes are typed as `u8`, so they are
/// always in range; the data field and Le are range-checked by the
/// constructors. Deserialization goes through [`CommandApdu::from_parts`]
/// and applies the same checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "CommandApduFields")]
pub struct CommandApdu {
    cla: u8,
    ins: u8,
    p1: u8,
    p2: u8,
    #[serde(serialize_with = "serde_bytes::serialize")]
    data: Option<Vec<u8>>,
    le: Option<u32>,
}

/// Unchecked deserialized form of [`CommandApdu`]
#[derive(Deserialize)]
struct CommandApduFields {
    cla: u8,
    ins: u8,
    p1: u8,
    p2: u8,
    #[serde(with = "serde_bytes", default)]
    data: Option<Vec<u8>>,
    #[serde(default)]
    le: Option<u32>,
}

impl TryFrom<CommandApduFields> for CommandApdu {
    type Error = ApduError;

    fn try_from(fields: CommandApduFields) -> ApduResult<Self> {
        Self::from_parts(
            fields.cla,
            fields.ins,
            fields.p1,
            fields.p2,
            fields.data,
            fields.le,
        )
    }
}

impl CommandApdu {
    /// Create a case 1 command (header only)
    pub fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            le: None,
        }
    }

    /// Create a command from all of its fields
    ///
    /// # Errors
    /// Returns `ApduError::Range` if `data` is longer than 65535 bytes or
    /// `le` is greater than 65536.
    pub fn from_parts(
        cla: u8,
        ins: u8,
        p1: u8,
        p2: u8,
        data: Option<Vec<u8>>,
        le: Option<u32>,
    ) -> ApduResult<Self> {
        let mut command = Self::new(cla, ins, p1, p2);
        if let Some(data) = data {
            command = command.with_data(data)?;
        }
        if let Some(le) = le {
            command = command.with_le(le)?;
        }
        Ok(command)
    }

    /// Attach a command data field
    ///
    /// An empty data field is the same as no data field.
    pub fn with_data(mut self, data: impl Into<Vec<u8>>) -> ApduResult<Self> {
        let data = data.into();
        if data.len() > MAX_DATA_LENGTH {
            return Err(ApduError::Range(format!(
                "Command data too long: {} bytes (max {})",
                data.len(),
                MAX_DATA_LENGTH
            )));
        }
        self.data = if data.is_empty() { None } else { Some(data) };
        Ok(self)
    }

    /// Set the expected response length
    ///
    /// `0` is taken as "maximum short length" and stored as 256, matching how
    /// the byte `00` is read back from the wire.
    pub fn with_le(mut self, le: u32) -> ApduResult<Self> {
        if le > MAX_LE {
            return Err(ApduError::Range(format!(
                "Le out of range: {} (max {})",
                le, MAX_LE
            )));
        }
        self.le = Some(if le == 0 { MAX_SHORT_LE } else { le });
        Ok(self)
    }

    /// Drop the expected response length, turning case 2/4 into case 1/3
    pub fn without_le(mut self) -> Self {
        self.le = None;
        self
    }

    pub fn cla(&self) -> u8 {
        self.cla
    }

    pub fn ins(&self) -> u8 {
        self.ins
    }

    pub fn p1(&self) -> u8 {
        self.p1
    }

    pub fn p2(&self) -> u8 {
        self.p2
    }

    /// Command data, if any
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Expected response length, if any
    pub fn le(&self) -> Option<u32> {
        self.le
    }

    /// Copy of this command with a different CLA byte
    pub fn with_cla(&self, cla: u8) -> Self {
        Self {
            cla,
            ..self.clone()
        }
    }

    /// ISO case of this command
    pub fn case(&self) -> ApduCase {
        match (self.data.is_some(), self.le.is_some()) {
            (false, false) => ApduCase::Case1,
            (false, true) => ApduCase::Case2,
            (true, false) => ApduCase::Case3,
            (true, true) => ApduCase::Case4,
        }
    }

    /// Whether the command needs the extended length encoding
    pub fn is_extended(&self) -> bool {
        self.data.as_ref().is_some_and(|d| d.len() > MAX_SHORT_LC)
            || self.le.is_some_and(|le| le > MAX_SHORT_LE)
    }

    /// Length of the serialized command
    pub fn encoded_len(&self) -> usize {
        let extended = self.is_extended();
        let mut len = HEADER_LENGTH;
        if let Some(data) = &self.data {
            len += if extended { 3 } else { 1 } + data.len();
        }
        if self.le.is_some() {
            len += match (extended, self.data.is_some()) {
                (false, _) => 1,
                (true, true) => 2,
                (true, false) => 3,
            };
        }
        len
    }

    /// Serialize to wire bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let extended = self.is_extended();
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(&[self.cla, self.ins, self.p1, self.p2]);

        if let Some(data) = &self.data {
            if extended {
                out.push(0x00);
                out.extend_from_slice(&(data.len() as u16).to_be_bytes());
            } else {
                out.push(data.len() as u8);
            }
            out.extend_from_slice(data);
        }

        if let Some(le) = self.le {
            if extended {
                if self.data.is_none() {
                    out.push(0x00);
                }
                // 65536 wraps to 0x0000
                out.extend_from_slice(&((le & 0xFFFF) as u16).to_be_bytes());
            } else {
                // 256 wraps to 0x00
                out.push((le & 0xFF) as u8);
            }
        }

        out
    }

    /// Parse a command from wire bytes
    ///
    /// # Errors
    /// - `ApduError::Range("too short")` if fewer than 4 bytes are given
    /// - `ApduError::Range("invalid structure")` if the body length does not
    ///   match any ISO case
    pub fn from_bytes(bytes: &[u8]) -> ApduResult<Self> {
        if bytes.len() < HEADER_LENGTH {
            return Err(ApduError::Range(format!(
                "Command APDU too short: {} bytes",
                bytes.len()
            )));
        }

        let mut command = Self::new(bytes[0], bytes[1], bytes[2], bytes[3]);
        let body = &bytes[HEADER_LENGTH..];

        match body.len() {
            0 => {}
            1 => {
                command.le = Some(decode_short_le(body[0]));
            }
            _ if body[0] != 0x00 => {
                // Short form: Lc Data [Le]
                let lc = body[0] as usize;
                let rest = &body[1..];
                if rest.len() == lc {
                    command.data = Some(rest.to_vec());
                } else if rest.len() == lc + 1 {
                    command.data = Some(rest[..lc].to_vec());
                    command.le = Some(decode_short_le(rest[lc]));
                } else {
                    return Err(invalid_structure(bytes.len()));
                }
            }
            3 => {
                // Extended Le only: 00 Le1 Le2
                command.le = Some(decode_extended_le(body[1], body[2]));
            }
            n if n > 3 => {
                // Extended form: 00 Lc1 Lc2 Data [Le1 Le2]
                let lc = u16::from_be_bytes([body[1], body[2]]) as usize;
                if lc == 0 {
                    return Err(invalid_structure(bytes.len()));
                }
                let rest = &body[3..];
                if rest.len() == lc {
                    command.data = Some(rest.to_vec());
                } else if rest.len() == lc + 2 {
                    command.data = Some(rest[..lc].to_vec());
                    command.le = Some(decode_extended_le(rest[lc], rest[lc + 1]));
                } else {
                    return Err(invalid_structure(bytes.len()));
                }
            }
            _ => return Err(invalid_structure(bytes.len())),
        }

        Ok(command)
    }

    /// Parse a command from a hex string
    pub fn from_hex(s: &str) -> ApduResult<Self> {
        Self::from_bytes(&hex::decode_hex(s)?)
    }

    /// Serialize to compact uppercase hex
    pub fn to_hex(&self) -> String {
        hex::encode_hex(&self.to_bytes())
    }
}

fn decode_short_le(byte: u8) -> u32 {
    if byte == 0 { MAX_SHORT_LE } else { byte as u32 }
}

fn decode_extended_le(hi: u8, lo: u8) -> u32 {
    match u16::from_be_bytes([hi, lo]) {
        0 => MAX_LE,
        le => le as u32,
    }
}

fn invalid_structure(len: usize) -> ApduError {
    ApduError::Range(format!(
        "Command APDU has invalid structure: {} bytes do not match any ISO 7816-4 case",
        len
    ))
}

impl fmt::Display for CommandApdu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<&[u8]> for CommandApdu {
    type Error = ApduError;

    fn try_from(bytes: &[u8]) -> ApduResult<Self> {
        Self::from_bytes(bytes)
    }
}

impl From<&CommandApdu> for Vec<u8> {
    fn from(command: &CommandApdu) -> Self {
        command.to_bytes()
    }
}
