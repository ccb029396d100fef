//! rsapdu - ISO 7816-4 smart card APDU exchange and BER-TLV decoding
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `rsapdu-core`: error taxonomy, command/response codec, hex helpers,
//!   status words and interindustry command builders
//! - `rsapdu-tlv`: BER-TLV tag/length codec, untyped parser, encoder and the
//!   schema-driven parser with sync and async leaf decoders
//! - `rsapdu-transport`: the `Transport` capability and a scripted transport
//! - `rsapdu-session`: response chaining, logical channels, `CardSession`
//!
//! # Usage
//!
//! ```rust,ignore
//! use rsapdu::commands::read_binary;
//! use rsapdu::tlv::schema::{constructed, parse, primitive, SchemaNode};
//! use rsapdu::CardSession;
//!
//! let session = CardSession::new(reader);
//! let response = session.transmit(&read_binary(0, 256)?).await?;
//! let holder = parse(&schema, response.data())?;
//! ```

// Re-export core types
pub use rsapdu_core::{
    ApduCase, ApduError, ApduResult, CommandApdu, ErrorCode, ResponseApdu, SchemaViolation,
    ViolationKind,
};
pub use rsapdu_core::{commands, hex, status};

// Re-export session API
pub use rsapdu_session::{CardSession, ChainState, Exchange, LogicalChannel, SessionConfig};

// Re-export transport API
pub use rsapdu_transport::{Protocol, ScriptedTransport, Transport};

// Re-export BER-TLV API
pub mod tlv {
    pub use rsapdu_tlv::*;
}
