//! Error types shared with the APDU core

pub use rsapdu_core::error::{ApduError, ApduResult, ErrorCode, SchemaViolation, ViolationKind};
