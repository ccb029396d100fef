//! Transport layer for ISO 7816-4 APDU exchange
//!
//! This crate defines the single capability the session layer consumes from
//! a card reader: one physical APDU exchange per call. Reader bindings
//! (PC/SC, NFC stacks, remote relays) live outside this workspace and
//! implement [`Transport`]; [`ScriptedTransport`] replays recorded traces.

pub mod error;
pub mod scripted;
pub mod transport;

pub use error::{ApduError, ApduResult};
pub use scripted::ScriptedTransport;
pub use transport::{Protocol, Transport};
