//! Response chaining state machine
//!
//! [`Exchange`] resolves one logical command into the sequence of physical
//! exchanges the card requests, without doing any I/O itself:
//!
//! ```text
//! loop {
//!     let bytes = exchange.next_command()?;   // CLA carries the channel
//!     let raw = transport.raw_transmit(&bytes).await?;
//!     if let Some(response) = exchange.on_response(&raw)? {
//!         break response;
//!     }
//! }
//! ```
//!
//! # State Transitions
//! ```text
//! Sending       -> AwaitingMore   (61xx: data kept, GET RESPONSE queued)
//! Sending       -> AwaitingRetry  (6Cxx on a short Le: same command, Le = SW2)
//! Sending       -> Done           (any other status)
//! AwaitingMore  -> ...            (same rules for the GET RESPONSE answer)
//! AwaitingRetry -> ...            (same rules for the resent command)
//! ```

use crate::channel::encode_channel;
use crate::config::SessionConfig;
use crate::error::{ApduError, ApduResult};
use bytes::BytesMut;
use log::trace;
use rsapdu_core::commands::{get_response, ins};
use rsapdu_core::status::{SW1_MORE_DATA, SW1_WRONG_LE};
use rsapdu_core::{ApduCase, CommandApdu, ResponseApdu};
use rsapdu_transport::Protocol;

/// Where an exchange stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChainState {
    /// The caller's command is next to be sent (initial state)
    #[default]
    Sending,
    /// The card reported more data; GET RESPONSE is next
    AwaitingMore,
    /// The card reported the correct Le; the command is resent with it
    AwaitingRetry,
    /// A final response has been assembled
    Done,
}

impl ChainState {
    pub fn is_done(&self) -> bool {
        matches!(self, ChainState::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChainState::Sending => "Sending",
            ChainState::AwaitingMore => "AwaitingMore",
            ChainState::AwaitingRetry => "AwaitingRetry",
            ChainState::Done => "Done",
        }
    }
}

/// One logical transmit in progress
#[derive(Debug, Clone)]
pub struct Exchange {
    /// CLA of the caller's command before channel encoding
    original_cla: u8,
    channel: u8,
    current: CommandApdu,
    state: ChainState,
    iterations: usize,
    max_iterations: usize,
    accumulated: BytesMut,
}

impl Exchange {
    /// Start an exchange for `command` on logical `channel`
    ///
    /// # Errors
    /// - `ApduError::InvalidParameter` for MANAGE CHANNEL (use the session's
    ///   channel operations), an out-of-range channel or a reserved CLA
    /// - `ApduError::Protocol` for an extended command on T=0
    pub fn new(command: &CommandApdu, channel: u8, config: &SessionConfig) -> ApduResult<Self> {
        if command.ins() == ins::MANAGE_CHANNEL {
            return Err(ApduError::InvalidParameter(
                "MANAGE CHANNEL must go through open/close logical channel".to_string(),
            ));
        }

        encode_channel(command.cla(), channel)?;

        let mut current = command.clone();
        if config.protocol == Protocol::T0 {
            if command.is_extended() {
                return Err(ApduError::Protocol(
                    "Extended length APDU cannot be sent over T=0".to_string(),
                ));
            }
            if config.strip_le_on_t0 && command.case() == ApduCase::Case4 {
                trace!("T=0: stripping Le from case 4 command");
                current = current.without_le();
            }
        }

        Ok(Self {
            original_cla: command.cla(),
            channel,
            current,
            state: ChainState::Sending,
            iterations: 0,
            max_iterations: config.max_iterations,
            accumulated: BytesMut::new(),
        })
    }

    pub fn state(&self) -> ChainState {
        self.state
    }

    /// Physical exchanges issued so far
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Command that [`next_command`](Self::next_command) will encode
    pub fn current(&self) -> &CommandApdu {
        &self.current
    }

    /// Bytes of the next physical command, CLA carrying the channel
    ///
    /// # Errors
    /// - `ApduError::Transmission` once the iteration limit is reached
    /// - `ApduError::Protocol` if the exchange is already done
    pub fn next_command(&mut self) -> ApduResult<Vec<u8>> {
        if self.state.is_done() {
            return Err(ApduError::Protocol("Exchange already complete".to_string()));
        }
        if self.iterations >= self.max_iterations {
            return Err(ApduError::Transmission(format!(
                "iteration limit exceeded ({})",
                self.max_iterations
            )));
        }
        self.iterations += 1;

        let cla = encode_channel(self.current.cla(), self.channel)?;
        Ok(self.current.with_cla(cla).to_bytes())
    }

    /// Feed the raw answer to the last command
    ///
    /// # Returns
    /// `Some(response)` when the exchange is complete, `None` when
    /// [`next_command`](Self::next_command) has another command to send
    ///
    /// # Errors
    /// Returns `ApduError::Range` if `raw` is shorter than a status word
    pub fn on_response(&mut self, raw: &[u8]) -> ApduResult<Option<ResponseApdu>> {
        if self.state.is_done() {
            return Err(ApduError::Protocol("Exchange already complete".to_string()));
        }
        if raw.len() < 2 {
            return Err(ApduError::Range(format!(
                "Response APDU too short: {} bytes",
                raw.len()
            )));
        }

        let (body, sw) = raw.split_at(raw.len() - 2);
        let (sw1, sw2) = (sw[0], sw[1]);

        if sw1 == SW1_MORE_DATA {
            trace!("61{:02X}: {} bytes kept, GET RESPONSE", sw2, body.len());
            self.accumulated.extend_from_slice(body);
            self.current = get_response(self.original_cla, sw2)?;
            self.state = ChainState::AwaitingMore;
            return Ok(None);
        }

        if sw1 == SW1_WRONG_LE && self.has_short_le() {
            trace!("6C{:02X}: resending with corrected Le", sw2);
            self.current = self.current.clone().with_le(sw2 as u32)?;
            self.state = ChainState::AwaitingRetry;
            return Ok(None);
        }

        self.accumulated.extend_from_slice(raw);
        self.state = ChainState::Done;
        let response = ResponseApdu::from_bytes(&self.accumulated.split())?;
        Ok(Some(response))
    }

    fn has_short_le(&self) -> bool {
        self.current.le().is_some() && !self.current.is_extended()
    }
}
