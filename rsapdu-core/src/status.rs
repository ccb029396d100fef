//! Status word constants (ISO 7816-4 §5.1.3)
//!
//! Only `61xx` and `6Cxx` are acted on by the session layer; everything else
//! is passed through to the caller unchanged.

/// Normal processing
pub const SUCCESS: u16 = 0x9000;

/// SW1: response bytes still available, SW2 = count
pub const SW1_MORE_DATA: u8 = 0x61;
/// SW1: wrong Le, SW2 = exact length
pub const SW1_WRONG_LE: u8 = 0x6C;
/// SW1: warning, non-volatile memory changed (63Cx = verification retries)
pub const SW1_WARNING_NV_CHANGED: u8 = 0x63;

pub const WRONG_LENGTH: u16 = 0x6700;
pub const LOGICAL_CHANNEL_NOT_SUPPORTED: u16 = 0x6881;
pub const SECURE_MESSAGING_NOT_SUPPORTED: u16 = 0x6882;
pub const SECURITY_STATUS_NOT_SATISFIED: u16 = 0x6982;
pub const AUTHENTICATION_METHOD_BLOCKED: u16 = 0x6983;
pub const CONDITIONS_NOT_SATISFIED: u16 = 0x6985;
pub const COMMAND_NOT_ALLOWED: u16 = 0x6986;
pub const WRONG_DATA: u16 = 0x6A80;
pub const FUNCTION_NOT_SUPPORTED: u16 = 0x6A81;
pub const FILE_NOT_FOUND: u16 = 0x6A82;
pub const RECORD_NOT_FOUND: u16 = 0x6A83;
pub const INCORRECT_P1_P2: u16 = 0x6A86;
pub const REFERENCED_DATA_NOT_FOUND: u16 = 0x6A88;
pub const WRONG_P1_P2: u16 = 0x6B00;
pub const INS_NOT_SUPPORTED: u16 = 0x6D00;
pub const CLA_NOT_SUPPORTED: u16 = 0x6E00;
pub const UNKNOWN_ERROR: u16 = 0x6F00;
