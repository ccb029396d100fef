//! Interindustry command builders (ISO 7816-4 §11)

use crate::command::CommandApdu;
use crate::error::{ApduError, ApduResult};

/// Instruction bytes
pub mod ins {
    pub const SELECT: u8 = 0xA4;
    pub const VERIFY: u8 = 0x20;
    pub const READ_BINARY: u8 = 0xB0;
    pub const READ_RECORD: u8 = 0xB2;
    pub const GET_DATA: u8 = 0xCA;
    pub const GET_CHALLENGE: u8 = 0x84;
    pub const GET_RESPONSE: u8 = 0xC0;
    pub const INTERNAL_AUTHENTICATE: u8 = 0x88;
    pub const MANAGE_CHANNEL: u8 = 0x70;
}

/// Interindustry class byte, basic channel, no secure messaging
pub const CLA_ISO: u8 = 0x00;

/// SELECT by DF name (AID), first or only occurrence, return FCI
pub fn select_df_by_name(aid: &[u8]) -> ApduResult<CommandApdu> {
    if aid.is_empty() || aid.len() > 16 {
        return Err(ApduError::Range(format!(
            "AID length must be 1..=16 bytes, got {}",
            aid.len()
        )));
    }
    CommandApdu::new(CLA_ISO, ins::SELECT, 0x04, 0x00)
        .with_data(aid)?
        .with_le(256)
}

/// SELECT an elementary file by its 2-byte file identifier, no response data
pub fn select_ef(fid: u16) -> ApduResult<CommandApdu> {
    CommandApdu::new(CLA_ISO, ins::SELECT, 0x02, 0x0C).with_data(fid.to_be_bytes())
}

/// VERIFY with a reference data value (PIN)
pub fn verify(reference: u8, pin: &[u8]) -> ApduResult<CommandApdu> {
    if pin.is_empty() {
        return Err(ApduError::Validation("PIN must not be empty".to_string()));
    }
    CommandApdu::new(CLA_ISO, ins::VERIFY, 0x00, reference).with_data(pin)
}

/// VERIFY without data: ask the card for the verification status (63Cx)
pub fn verify_status(reference: u8) -> CommandApdu {
    CommandApdu::new(CLA_ISO, ins::VERIFY, 0x00, reference)
}

/// READ BINARY from the currently selected EF
///
/// `offset` is limited to 15 bits since bit 8 of P1 selects the SFI form.
pub fn read_binary(offset: u16, le: u32) -> ApduResult<CommandApdu> {
    if offset > 0x7FFF {
        return Err(ApduError::Range(format!(
            "READ BINARY offset out of range: {} (max 32767)",
            offset
        )));
    }
    let [p1, p2] = offset.to_be_bytes();
    CommandApdu::new(CLA_ISO, ins::READ_BINARY, p1, p2).with_le(le)
}

/// READ BINARY with a short file identifier
pub fn read_binary_sfi(sfi: u8, offset: u8, le: u32) -> ApduResult<CommandApdu> {
    if sfi == 0 || sfi > 30 {
        return Err(ApduError::Range(format!("SFI out of range: {} (1..=30)", sfi)));
    }
    CommandApdu::new(CLA_ISO, ins::READ_BINARY, 0x80 | sfi, offset).with_le(le)
}

/// READ RECORD by record number from a short file identifier
pub fn read_record(record: u8, sfi: u8) -> ApduResult<CommandApdu> {
    if sfi > 30 {
        return Err(ApduError::Range(format!("SFI out of range: {} (0..=30)", sfi)));
    }
    let p2 = (sfi << 3) | 0x04;
    CommandApdu::new(CLA_ISO, ins::READ_RECORD, record, p2).with_le(256)
}

/// GET DATA for a 1- or 2-byte tag placed in P1-P2
pub fn get_data(tag: u16, le: u32) -> ApduResult<CommandApdu> {
    let [p1, p2] = tag.to_be_bytes();
    CommandApdu::new(CLA_ISO, ins::GET_DATA, p1, p2).with_le(le)
}

/// GET CHALLENGE for `length` random bytes
pub fn get_challenge(length: u32) -> ApduResult<CommandApdu> {
    CommandApdu::new(CLA_ISO, ins::GET_CHALLENGE, 0x00, 0x00).with_le(length)
}

/// GET RESPONSE on the given class byte, `le` as reported by SW2 of a 61xx
pub fn get_response(cla: u8, le: u8) -> ApduResult<CommandApdu> {
    CommandApdu::new(cla, ins::GET_RESPONSE, 0x00, 0x00).with_le(le as u32)
}

/// INTERNAL AUTHENTICATE with the given challenge data
pub fn internal_authenticate(data: &[u8]) -> ApduResult<CommandApdu> {
    CommandApdu::new(CLA_ISO, ins::INTERNAL_AUTHENTICATE, 0x00, 0x00)
        .with_data(data)?
        .with_le(256)
}

/// MANAGE CHANNEL open: card assigns the channel number, returned in one byte
pub fn manage_channel_open(cla: u8) -> ApduResult<CommandApdu> {
    CommandApdu::new(cla, ins::MANAGE_CHANNEL, 0x00, 0x00).with_le(1)
}

/// MANAGE CHANNEL close for `channel`
pub fn manage_channel_close(cla: u8, channel: u8) -> CommandApdu {
    CommandApdu::new(cla, ins::MANAGE_CHANNEL, 0x80, channel)
}
