//! Session layer for ISO 7816-4 APDU exchange
//!
//! This crate turns one logical `transmit` into the physical exchanges a card
//! asks for (61xx GET RESPONSE chaining, 6Cxx Le correction), applies the
//! logical channel number to the CLA byte, and opens/closes logical channels
//! with MANAGE CHANNEL.
//!
//! # Architecture
//!
//! - [`chaining::Exchange`] is a sans-IO state machine: it yields the next
//!   command bytes and consumes raw responses, so it can be driven by any
//!   transport or tested without one.
//! - [`CardSession`] drives an `Exchange` against a [`Transport`] held behind
//!   a `tokio::sync::Mutex`, keeping the lock for the whole logical call.

pub mod channel;
pub mod chaining;
pub mod config;
pub mod error;
pub mod session;

pub use chaining::{ChainState, Exchange};
pub use config::SessionConfig;
pub use error::{ApduError, ApduResult};
pub use rsapdu_transport::{Protocol, Transport};
pub use session::{CardSession, LogicalChannel};
