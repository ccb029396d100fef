use std::fmt;
use thiserror::Error;

/// Main error type for APDU exchange and BER-TLV decoding
#[derive(Error, Debug)]
pub enum ApduError {
    /// Malformed construction input (bad hex, out-of-range field)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Framing error: buffer too short, inconsistent Lc/Le framing
    #[error("Range error: {0}")]
    Range(String),

    /// Protocol constraint violated (extended APDU on T=0, bad TLV continuation)
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Physical exchange failed or chaining did not converge
    #[error("Transmission error: {0}")]
    Transmission(String),

    /// I/O failure reported by a transport
    #[error("Connection error: {0}")]
    Connection(#[from] std::io::Error),

    /// Caller passed an argument the engine refuses
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Card or platform answered in an unexpected shape
    #[error("Platform error: {0}")]
    Platform(String),

    /// BER-TLV data does not match the expected schema
    #[error("Schema validation error: {0}")]
    SchemaValidation(#[from] SchemaViolation),
}

impl ApduError {
    /// Stable error code for programmatic matching
    pub fn code(&self) -> ErrorCode {
        match self {
            ApduError::Validation(_) => ErrorCode::Validation,
            ApduError::Range(_) => ErrorCode::Range,
            ApduError::Protocol(_) => ErrorCode::Protocol,
            ApduError::Transmission(_) | ApduError::Connection(_) => ErrorCode::Transmission,
            ApduError::InvalidParameter(_) => ErrorCode::InvalidParameter,
            ApduError::Platform(_) => ErrorCode::Platform,
            ApduError::SchemaValidation(_) => ErrorCode::SchemaValidation,
        }
    }
}

/// Error classification shared by every layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Validation,
    Range,
    Protocol,
    Transmission,
    InvalidParameter,
    Platform,
    SchemaValidation,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Validation => "VALIDATION_ERROR",
            ErrorCode::Range => "RANGE_ERROR",
            ErrorCode::Protocol => "PROTOCOL_ERROR",
            ErrorCode::Transmission => "TRANSMISSION_ERROR",
            ErrorCode::InvalidParameter => "INVALID_PARAMETER",
            ErrorCode::Platform => "PLATFORM_ERROR",
            ErrorCode::SchemaValidation => "SCHEMA_VALIDATION_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which schema check failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    TagClass,
    TagNumber,
    Constructed,
    /// Children of a constructed node did not consume its value exactly
    Length,
    /// Leaf decoder rejected the value
    Decode,
}

/// A schema mismatch, located by the dotted path of the offending node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub path: String,
    pub kind: ViolationKind,
    pub expected: String,
    pub actual: String,
}

impl SchemaViolation {
    pub fn new(
        path: impl Into<String>,
        kind: ViolationKind,
        expected: impl fmt::Display,
        actual: impl fmt::Display,
    ) -> Self {
        Self {
            path: path.into(),
            kind,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ViolationKind::TagClass => write!(
                f,
                "{}: tag class mismatch: expected {}, got {}",
                self.path, self.expected, self.actual
            ),
            ViolationKind::TagNumber => write!(
                f,
                "{}: tag number mismatch: expected {}, got {}",
                self.path, self.expected, self.actual
            ),
            ViolationKind::Constructed => write!(
                f,
                "{}: constructed flag mismatch: expected {}, got {}",
                self.path, self.expected, self.actual
            ),
            ViolationKind::Length => write!(
                f,
                "{}: constructed value does not end exactly: declared {} bytes, children consumed {}",
                self.path, self.expected, self.actual
            ),
            ViolationKind::Decode => write!(
                f,
                "{}: decoder failed: expected {}, got {}",
                self.path, self.expected, self.actual
            ),
        }
    }
}

impl std::error::Error for SchemaViolation {}

/// Result type alias for APDU operations
pub type ApduResult<T> = Result<T, ApduError>;
