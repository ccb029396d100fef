//! Leaf decoders for primitive schema nodes
//!
//! A decoder turns the value bytes of a primitive TLV into a typed value.
//! Synchronous decoders implement [`Decode`]; decoders that have to wait
//! on something (a blocking crypto import, a key store) implement
//! [`AsyncDecode`]. A schema containing an async decoder can only be parsed
//! with [`parse_async`](crate::schema::parse_async); the type system rejects
//! it in [`parse`](crate::schema::parse).

use crate::error::{ApduError, ApduResult};
use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// Synchronous leaf decoder
pub trait Decode: Send + Sync {
    type Output: Send;

    fn decode(&self, value: &[u8]) -> ApduResult<Self::Output>;
}

/// Asynchronous leaf decoder
#[async_trait]
pub trait AsyncDecode: Send + Sync {
    type Output: Send;

    async fn decode_async(&self, value: &[u8]) -> ApduResult<Self::Output>;
}

/// Keep the value bytes as they are
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawBytes;

impl Decode for RawBytes {
    type Output = Vec<u8>;

    fn decode(&self, value: &[u8]) -> ApduResult<Vec<u8>> {
        Ok(value.to_vec())
    }
}

/// UTF-8 text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Utf8;

impl Decode for Utf8 {
    type Output = String;

    fn decode(&self, value: &[u8]) -> ApduResult<String> {
        String::from_utf8(value.to_vec())
            .map_err(|e| ApduError::Validation(format!("Invalid UTF-8 text: {}", e)))
    }
}

/// 7-bit ASCII text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ascii;

impl Decode for Ascii {
    type Output = String;

    fn decode(&self, value: &[u8]) -> ApduResult<String> {
        if let Some(pos) = value.iter().position(|b| !b.is_ascii()) {
            return Err(ApduError::Validation(format!(
                "Non-ASCII byte 0x{:02X} at position {}",
                value[pos], pos
            )));
        }
        Ok(value.iter().map(|b| *b as char).collect())
    }
}

/// Big-endian unsigned integer of at most 8 bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Uint;

impl Decode for Uint {
    type Output = u64;

    fn decode(&self, value: &[u8]) -> ApduResult<u64> {
        if value.is_empty() || value.len() > 8 {
            return Err(ApduError::Validation(format!(
                "Unsigned integer must be 1..=8 bytes, got {}",
                value.len()
            )));
        }
        Ok(value.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64))
    }
}

/// Packed BCD digits, trailing `F` nibbles treated as padding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bcd;

impl Decode for Bcd {
    type Output = String;

    fn decode(&self, value: &[u8]) -> ApduResult<String> {
        let nibbles: Vec<u8> = value.iter().flat_map(|b| [b >> 4, b & 0x0F]).collect();
        let digits = nibbles
            .iter()
            .rposition(|n| *n != 0x0F)
            .map_or(&nibbles[..0], |last| &nibbles[..=last]);

        digits
            .iter()
            .map(|n| match n {
                0..=9 => Ok((b'0' + n) as char),
                _ => Err(ApduError::Validation(format!("Invalid BCD nibble 0x{:X}", n))),
            })
            .collect()
    }
}

/// Synchronous decoder from a closure, see [`from_fn`]
pub struct FnDecoder<F, T> {
    f: F,
    _output: PhantomData<fn() -> T>,
}

/// Wrap a closure as a synchronous decoder
pub fn from_fn<F, T>(f: F) -> FnDecoder<F, T>
where
    F: Fn(&[u8]) -> ApduResult<T> + Send + Sync,
    T: Send,
{
    FnDecoder {
        f,
        _output: PhantomData,
    }
}

impl<F, T> Decode for FnDecoder<F, T>
where
    F: Fn(&[u8]) -> ApduResult<T> + Send + Sync,
    T: Send,
{
    type Output = T;

    fn decode(&self, value: &[u8]) -> ApduResult<T> {
        (self.f)(value)
    }
}

/// Asynchronous decoder from a closure returning a future, see [`from_async_fn`]
pub struct AsyncFnDecoder<F, T> {
    f: F,
    _output: PhantomData<fn() -> T>,
}

/// Wrap a closure returning a future as an asynchronous decoder
///
/// The closure receives an owned copy of the value bytes so the future can
/// be `'static`.
pub fn from_async_fn<F, Fut, T>(f: F) -> AsyncFnDecoder<F, T>
where
    F: Fn(Vec<u8>) -> Fut + Send + Sync,
    Fut: Future<Output = ApduResult<T>> + Send + 'static,
    T: Send,
{
    AsyncFnDecoder {
        f,
        _output: PhantomData,
    }
}

#[async_trait]
impl<F, Fut, T> AsyncDecode for AsyncFnDecoder<F, T>
where
    F: Fn(Vec<u8>) -> Fut + Send + Sync,
    Fut: Future<Output = ApduResult<T>> + Send + 'static,
    T: Send,
{
    type Output = T;

    async fn decode_async(&self, value: &[u8]) -> ApduResult<T> {
        (self.f)(value.to_vec()).await
    }
}

/// Run a synchronous decoder on tokio's blocking pool
///
/// Useful for CPU-heavy decoders such as key imports, which would otherwise
/// stall the reactor thread driving the card exchange.
pub struct Blocking<D> {
    inner: Arc<D>,
}

impl<D> Blocking<D> {
    pub fn new(decoder: D) -> Self {
        Self {
            inner: Arc::new(decoder),
        }
    }
}

#[async_trait]
impl<D> AsyncDecode for Blocking<D>
where
    D: Decode + 'static,
    D::Output: 'static,
{
    type Output = D::Output;

    async fn decode_async(&self, value: &[u8]) -> ApduResult<D::Output> {
        let decoder = Arc::clone(&self.inner);
        let value = value.to_vec();
        tokio::task::spawn_blocking(move || decoder.decode(&value))
            .await
            .map_err(|e| ApduError::Platform(format!("Blocking decoder task failed: {}", e)))?
    }
}
