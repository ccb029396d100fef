//! Core types and utilities for ISO 7816-4 APDU exchange
//!
//! This crate provides the command/response codec, the error taxonomy shared
//! by every layer, and the interindustry command builders.

pub mod command;
pub mod commands;
pub mod error;
pub mod hex;
pub mod response;
pub mod status;

pub use command::{ApduCase, CommandApdu};
pub use error::{ApduError, ApduResult, ErrorCode, SchemaViolation, ViolationKind};
pub use response::ResponseApdu;
