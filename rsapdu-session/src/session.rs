//! Card session: logical transmit and logical channel management
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use rsapdu_session::{CardSession, SessionConfig};
//! use rsapdu_core::commands::select_df_by_name;
//!
//! let session = CardSession::new(reader);
//! let fci = session.transmit(&select_df_by_name(&aid)?).await?;
//!
//! let channel = session.open_logical_channel().await?;
//! let response = channel.transmit(&command).await?;
//! channel.close().await?;
//! ```

use crate::chaining::Exchange;
use crate::channel::{encode_channel, MAX_CHANNEL};
use crate::config::SessionConfig;
use crate::error::{ApduError, ApduResult};
use log::debug;
use rsapdu_core::commands::{manage_channel_close, manage_channel_open};
use rsapdu_core::hex::encode_hex;
use rsapdu_core::{CommandApdu, ResponseApdu};
use rsapdu_transport::Transport;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Transport plus the logical channels currently open on it
struct Link<T> {
    transport: T,
    /// Bit `n` set while channel `n` is open
    open_channels: u32,
}

impl<T> Link<T> {
    fn new(transport: T) -> Self {
        Self {
            transport,
            open_channels: 0,
        }
    }

    fn is_open(&self, channel: u8) -> bool {
        channel == 0 || self.open_channels & (1 << channel) != 0
    }
}

/// Shared handle to a card behind one transport
///
/// Clones and [`LogicalChannel`] handles share the transport. Each logical
/// call (`transmit`, `open_logical_channel`, `close_logical_channel`) holds
/// the transport lock from its first physical exchange to its last, so
/// GET RESPONSE sequences of concurrent callers never interleave.
pub struct CardSession<T> {
    link: Arc<Mutex<Link<T>>>,
    config: Arc<SessionConfig>,
}

impl<T> Clone for CardSession<T> {
    fn clone(&self) -> Self {
        Self {
            link: Arc::clone(&self.link),
            config: Arc::clone(&self.config),
        }
    }
}

impl<T: Transport> CardSession<T> {
    /// Create a session with the default configuration (T=1)
    pub fn new(transport: T) -> Self {
        Self {
            link: Arc::new(Mutex::new(Link::new(transport))),
            config: Arc::new(SessionConfig::default()),
        }
    }

    /// Create a session with an explicit configuration
    ///
    /// # Errors
    /// Returns `ApduError::InvalidParameter` if the configuration is invalid
    pub fn with_config(transport: T, config: SessionConfig) -> ApduResult<Self> {
        config.validate()?;
        Ok(Self {
            link: Arc::new(Mutex::new(Link::new(transport))),
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Send a command on the basic channel
    ///
    /// 61xx and 6Cxx answers are resolved internally; the returned response
    /// carries the concatenated data and the final status word.
    ///
    /// # Errors
    /// - `ApduError::InvalidParameter` for MANAGE CHANNEL commands
    /// - `ApduError::Protocol` for an extended command on T=0
    /// - `ApduError::Transmission` if the transport fails or the card keeps
    ///   chaining past the iteration limit
    pub async fn transmit(&self, command: &CommandApdu) -> ApduResult<ResponseApdu> {
        self.transmit_on(command, 0).await
    }

    async fn transmit_on(&self, command: &CommandApdu, channel: u8) -> ApduResult<ResponseApdu> {
        let mut exchange = Exchange::new(command, channel, &self.config)?;
        let mut link = self.link.lock().await;
        if !link.is_open(channel) {
            return Err(ApduError::InvalidParameter(format!(
                "Logical channel {} is not open",
                channel
            )));
        }

        loop {
            let bytes = exchange.next_command()?;
            let raw = exchange_raw(&mut link.transport, &bytes).await?;
            if let Some(response) = exchange.on_response(&raw)? {
                return Ok(response);
            }
        }
    }

    /// Open a logical channel with MANAGE CHANNEL
    ///
    /// # Errors
    /// Returns `ApduError::Platform` unless the card answers with exactly
    /// `[channel, 90, 00]` and a channel number in 1..=19
    pub async fn open_logical_channel(&self) -> ApduResult<LogicalChannel<T>> {
        let command = manage_channel_open(self.config.basic_cla)?;
        let mut link = self.link.lock().await;
        let raw = exchange_raw(&mut link.transport, &command.to_bytes()).await?;

        match raw.as_slice() {
            [number, 0x90, 0x00] if (1..=MAX_CHANNEL).contains(number) => {
                link.open_channels |= 1 << *number;
                debug!("opened logical channel {}", number);
                Ok(LogicalChannel {
                    session: self.clone(),
                    number: *number,
                })
            }
            _ => Err(ApduError::Platform(format!(
                "Unexpected MANAGE CHANNEL open response: {}",
                encode_hex(&raw)
            ))),
        }
    }

    /// Close logical channel `channel` with MANAGE CHANNEL
    ///
    /// Also closes channels opened outside this session. Once the card
    /// confirms, [`LogicalChannel`] handles for `channel` are refused with
    /// `ApduError::InvalidParameter` until the channel is opened again.
    ///
    /// # Errors
    /// - `ApduError::InvalidParameter` for channel 0 or above 19
    /// - `ApduError::Platform` if the card does not answer 9000
    pub async fn close_logical_channel(&self, channel: u8) -> ApduResult<()> {
        if channel == 0 {
            return Err(ApduError::InvalidParameter(
                "The basic channel cannot be closed".to_string(),
            ));
        }

        let cla = encode_channel(self.config.basic_cla, channel)?;
        let command = manage_channel_close(cla, channel);
        let mut link = self.link.lock().await;
        let raw = exchange_raw(&mut link.transport, &command.to_bytes()).await?;

        let response = ResponseApdu::from_bytes(&raw)?;
        if !response.is_success() {
            return Err(ApduError::Platform(format!(
                "MANAGE CHANNEL close of channel {} failed: {}",
                channel,
                response.status_string()
            )));
        }

        link.open_channels &= !(1 << channel);
        debug!("closed logical channel {}", channel);
        Ok(())
    }
}

async fn exchange_raw<T: Transport + ?Sized>(transport: &mut T, command: &[u8]) -> ApduResult<Vec<u8>> {
    debug!(">> {}", encode_hex(command));
    let raw = transport.raw_transmit(command).await?;
    debug!("<< {}", encode_hex(&raw));
    Ok(raw)
}

/// Handle to an open logical channel
///
/// Commands sent through the handle get the channel number in their CLA.
/// The channel stays open on the card until [`close`](Self::close) is called.
pub struct LogicalChannel<T> {
    session: CardSession<T>,
    number: u8,
}

impl<T: Transport> LogicalChannel<T> {
    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn session(&self) -> &CardSession<T> {
        &self.session
    }

    /// Send a command on this channel
    ///
    /// # Errors
    /// As [`CardSession::transmit`], plus `ApduError::InvalidParameter` once
    /// the channel has been closed, or if the CLA is reserved
    pub async fn transmit(&self, command: &CommandApdu) -> ApduResult<ResponseApdu> {
        self.session.transmit_on(command, self.number).await
    }

    /// Close the channel on the card
    pub async fn close(self) -> ApduResult<()> {
        self.session.close_logical_channel(self.number).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::{mock, Sequence};
    use rsapdu_core::ErrorCode;
    use rsapdu_transport::{Protocol, ScriptedTransport};

    mock! {
        pub Reader {}

        #[async_trait]
        impl Transport for Reader {
            async fn raw_transmit(&mut self, command: &[u8]) -> ApduResult<Vec<u8>>;
        }
    }

    fn expect(reader: &mut MockReader, seq: &mut Sequence, command: Vec<u8>, response: Vec<u8>) {
        reader
            .expect_raw_transmit()
            .withf(move |sent: &[u8]| sent == command.as_slice())
            .times(1)
            .in_sequence(seq)
            .returning(move |_| Ok(response.clone()));
    }

    #[tokio::test]
    async fn test_chaining_convergence() {
        let mut reader = MockReader::new();
        let mut seq = Sequence::new();
        expect(&mut reader, &mut seq, vec![0x00, 0xCA, 0x9F, 0x7F, 0x00], vec![0x01, 0x02, 0x61, 0x0A]);
        expect(&mut reader, &mut seq, vec![0x00, 0xC0, 0x00, 0x00, 0x0A], vec![0x03, 0x61, 0x05]);
        expect(&mut reader, &mut seq, vec![0x00, 0xC0, 0x00, 0x00, 0x05], vec![0x04, 0x05, 0x90, 0x00]);

        let session = CardSession::new(reader);
        let cmd = CommandApdu::new(0x00, 0xCA, 0x9F, 0x7F).with_le(256).unwrap();
        let response = session.transmit(&cmd).await.unwrap();
        assert_eq!(response.data(), &[0x01, 0x02, 0x03, 0x04, 0x05]);
        assert_eq!(response.sw(), 0x9000);
    }

    #[tokio::test]
    async fn test_wrong_le_retry() {
        let mut reader = MockReader::new();
        let mut seq = Sequence::new();
        expect(&mut reader, &mut seq, vec![0x00, 0xB0, 0x00, 0x00, 0x00], vec![0x6C, 0x10]);
        let mut body = vec![0x5A; 0x10];
        body.extend_from_slice(&[0x90, 0x00]);
        expect(&mut reader, &mut seq, vec![0x00, 0xB0, 0x00, 0x00, 0x10], body);

        let session = CardSession::new(reader);
        let cmd = CommandApdu::new(0x00, 0xB0, 0x00, 0x00).with_le(256).unwrap();
        let response = session.transmit(&cmd).await.unwrap();
        assert_eq!(response.data().len(), 0x10);
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let mut reader = MockReader::new();
        reader
            .expect_raw_transmit()
            .withf(|sent: &[u8]| sent == [0x00u8, 0x84, 0x00, 0x00, 0x08])
            .returning(|_| {
                Err(ApduError::from(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    "reader timeout",
                )))
            });

        let session = CardSession::new(reader);
        let cmd = CommandApdu::new(0x00, 0x84, 0x00, 0x00).with_le(8).unwrap();
        let err = session.transmit(&cmd).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Transmission);
    }

    #[tokio::test]
    async fn test_t0_rejects_extended_without_sending() {
        let reader = MockReader::new();
        let config = SessionConfig::new().with_protocol(Protocol::T0);
        let session = CardSession::with_config(reader, config).unwrap();
        let cmd = CommandApdu::new(0x00, 0xB0, 0x00, 0x00).with_le(65536).unwrap();
        assert!(matches!(session.transmit(&cmd).await, Err(ApduError::Protocol(_))));
    }

    #[tokio::test]
    async fn test_logical_channel_lifecycle() {
        let transport = ScriptedTransport::new()
            .expect(vec![0x00, 0x70, 0x00, 0x00, 0x01], vec![0x02, 0x90, 0x00])
            .expect(vec![0x02, 0xA4, 0x04, 0x00, 0x02, 0xA0, 0x01], vec![0x90, 0x00])
            .expect(vec![0x02, 0x70, 0x80, 0x02], vec![0x90, 0x00]);
        let session = CardSession::new(transport);

        let channel = session.open_logical_channel().await.unwrap();
        assert_eq!(channel.number(), 2);

        let select = CommandApdu::new(0x00, 0xA4, 0x04, 0x00).with_data(vec![0xA0, 0x01]).unwrap();
        assert!(channel.transmit(&select).await.unwrap().is_success());
        channel.close().await.unwrap();

        assert!(session.link.lock().await.transport.is_exhausted());
    }

    #[tokio::test]
    async fn test_reader_pseudo_apdu_on_basic_channel() {
        let transport = ScriptedTransport::new()
            .expect(vec![0xFF, 0xCA, 0x00, 0x00, 0x00], vec![0x04, 0xA2, 0x2B, 0x6E, 0x90, 0x00])
            .expect(vec![0x20, 0xCA, 0x00, 0x00], vec![0x90, 0x00]);
        let session = CardSession::new(transport);

        let uid = CommandApdu::new(0xFF, 0xCA, 0x00, 0x00).with_le(256).unwrap();
        assert_eq!(session.transmit(&uid).await.unwrap().data(), &[0x04, 0xA2, 0x2B, 0x6E]);

        let proprietary = CommandApdu::new(0x20, 0xCA, 0x00, 0x00);
        assert!(session.transmit(&proprietary).await.unwrap().is_success());
        assert!(session.link.lock().await.transport.is_exhausted());
    }

    #[tokio::test]
    async fn test_reserved_cla_rejected_on_logical_channel() {
        let transport = ScriptedTransport::new()
            .expect(vec![0x00, 0x70, 0x00, 0x00, 0x01], vec![0x01, 0x90, 0x00]);
        let session = CardSession::new(transport);
        let channel = session.open_logical_channel().await.unwrap();

        let uid = CommandApdu::new(0xFF, 0xCA, 0x00, 0x00).with_le(256).unwrap();
        assert!(matches!(
            channel.transmit(&uid).await,
            Err(ApduError::InvalidParameter(_))
        ));
    }

    #[tokio::test]
    async fn test_handle_refused_after_direct_close() {
        let transport = ScriptedTransport::new()
            .expect(vec![0x00, 0x70, 0x00, 0x00, 0x01], vec![0x03, 0x90, 0x00])
            .expect(vec![0x03, 0x70, 0x80, 0x03], vec![0x90, 0x00])
            .expect(vec![0x00, 0x70, 0x00, 0x00, 0x01], vec![0x03, 0x90, 0x00])
            .expect(vec![0x03, 0xB0, 0x00, 0x00, 0x01], vec![0x7E, 0x90, 0x00]);
        let session = CardSession::new(transport);

        let stale = session.open_logical_channel().await.unwrap();
        session.close_logical_channel(3).await.unwrap();

        let cmd = CommandApdu::new(0x00, 0xB0, 0x00, 0x00).with_le(1).unwrap();
        let err = stale.transmit(&cmd).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidParameter);
        assert_eq!(session.link.lock().await.transport.sent().len(), 2);

        // Reopening the same number makes handles usable again
        let fresh = session.open_logical_channel().await.unwrap();
        assert_eq!(fresh.transmit(&cmd).await.unwrap().data(), &[0x7E]);
    }

    #[tokio::test]
    async fn test_further_channel_cla() {
        let transport = ScriptedTransport::new()
            .expect(vec![0x00, 0x70, 0x00, 0x00, 0x01], vec![0x05, 0x90, 0x00])
            .expect(vec![0x41, 0xB0, 0x00, 0x00, 0x02], vec![0x61, 0x02])
            .expect(vec![0x41, 0xC0, 0x00, 0x00, 0x02], vec![0xAB, 0xCD, 0x90, 0x00]);
        let session = CardSession::new(transport);

        let channel = session.open_logical_channel().await.unwrap();
        let cmd = CommandApdu::new(0x00, 0xB0, 0x00, 0x00).with_le(2).unwrap();
        assert_eq!(channel.transmit(&cmd).await.unwrap().data(), &[0xAB, 0xCD]);
    }

    #[tokio::test]
    async fn test_open_channel_bad_response() {
        for answer in [vec![0x6A, 0x81], vec![0x00, 0x90, 0x00], vec![0x14, 0x90, 0x00], vec![0x01, 0x62, 0x83]] {
            let transport = ScriptedTransport::new().expect(vec![0x00, 0x70, 0x00, 0x00, 0x01], answer);
            let session = CardSession::new(transport);
            let err = session.open_logical_channel().await.err().unwrap();
            assert_eq!(err.code(), ErrorCode::Platform);
        }
    }

    #[tokio::test]
    async fn test_close_channel_errors() {
        let session = CardSession::new(ScriptedTransport::new());
        assert!(matches!(
            session.close_logical_channel(0).await,
            Err(ApduError::InvalidParameter(_))
        ));
        assert!(matches!(
            session.close_logical_channel(20).await,
            Err(ApduError::InvalidParameter(_))
        ));

        let transport = ScriptedTransport::new().expect(vec![0x03, 0x70, 0x80, 0x03], vec![0x68, 0x81]);
        let session = CardSession::new(transport);
        assert!(matches!(
            session.close_logical_channel(3).await,
            Err(ApduError::Platform(_))
        ));
    }

    #[tokio::test]
    async fn test_manage_channel_via_transmit_rejected() {
        let session = CardSession::new(ScriptedTransport::new());
        let cmd = CommandApdu::new(0x00, 0x70, 0x80, 0x01);
        let err = session.transmit(&cmd).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidParameter);
        assert!(session.link.lock().await.transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_transport() {
        let transport = ScriptedTransport::new()
            .expect(vec![0x00, 0x84, 0x00, 0x00, 0x02], vec![0x01, 0x02, 0x90, 0x00])
            .expect(vec![0x00, 0x84, 0x00, 0x00, 0x02], vec![0x03, 0x04, 0x90, 0x00]);
        let session = CardSession::new(transport);
        let other = session.clone();
        let cmd = CommandApdu::new(0x00, 0x84, 0x00, 0x00).with_le(2).unwrap();

        let (a, b) = tokio::join!(session.transmit(&cmd), other.transmit(&cmd));
        let mut data = vec![a.unwrap().into_data(), b.unwrap().into_data()];
        data.sort();
        assert_eq!(data, vec![vec![0x01, 0x02], vec![0x03, 0x04]]);
    }
}
