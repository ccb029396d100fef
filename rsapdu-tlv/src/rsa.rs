//! RSA public keys carried as modulus/exponent TLV pairs
//!
//! Cards typically return a public key as a constructed object holding the
//! modulus and the public exponent as separate primitive values (for example
//! `7F49 { 81 <modulus>, 82 <exponent> }`). [`rsa_public_key_schema`] decodes
//! that shape into an [`RsaPublicKey`], which can verify PKCS#1 v1.5
//! signatures through `ring`.

use crate::error::{ApduError, ApduResult};
use crate::schema::{constructed, primitive, Constructed, Primitive, SchemaNode, TryMap};
use crate::types::Tag;
use ring::signature::{self, RsaPublicKeyComponents};
use std::borrow::Cow;

const MIN_MODULUS_BITS: usize = 1024;
const MAX_MODULUS_BITS: usize = 8192;
const MAX_EXPONENT_BITS: usize = 33;

/// RSA public key in big-endian component form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    modulus: Vec<u8>,
    exponent: Vec<u8>,
}

impl RsaPublicKey {
    /// Build a key from raw big-endian modulus and exponent
    ///
    /// Leading zero bytes are stripped from both components.
    ///
    /// # Errors
    /// Returns `ApduError::Validation` if the modulus is outside 1024..=8192
    /// bits or the exponent is zero or longer than 33 bits.
    pub fn from_components(modulus: &[u8], exponent: &[u8]) -> ApduResult<Self> {
        let modulus = strip_leading_zeros(modulus);
        let exponent = strip_leading_zeros(exponent);

        let modulus_bits = bit_length(modulus);
        if !(MIN_MODULUS_BITS..=MAX_MODULUS_BITS).contains(&modulus_bits) {
            return Err(ApduError::Validation(format!(
                "RSA modulus must be {}..={} bits, got {}",
                MIN_MODULUS_BITS, MAX_MODULUS_BITS, modulus_bits
            )));
        }

        let exponent_bits = bit_length(exponent);
        if exponent_bits == 0 || exponent_bits > MAX_EXPONENT_BITS {
            return Err(ApduError::Validation(format!(
                "RSA exponent must be 1..={} bits, got {}",
                MAX_EXPONENT_BITS, exponent_bits
            )));
        }

        Ok(Self {
            modulus: modulus.to_vec(),
            exponent: exponent.to_vec(),
        })
    }

    pub fn modulus(&self) -> &[u8] {
        &self.modulus
    }

    pub fn exponent(&self) -> &[u8] {
        &self.exponent
    }

    /// Modulus size in bits
    pub fn bits(&self) -> usize {
        bit_length(&self.modulus)
    }

    /// Verify an RSASSA-PKCS1-v1_5 signature over `message` with SHA-256
    ///
    /// Keys below 2048 bits are accepted, as national ID cards still issue
    /// 1024-bit signing keys.
    ///
    /// # Errors
    /// Returns `ApduError::Validation` if the signature does not verify.
    pub fn verify_pkcs1_sha256(&self, message: &[u8], signature: &[u8]) -> ApduResult<()> {
        let params = if self.bits() >= 2048 {
            &signature::RSA_PKCS1_2048_8192_SHA256
        } else {
            &signature::RSA_PKCS1_1024_8192_SHA256_FOR_LEGACY_USE_ONLY
        };

        RsaPublicKeyComponents {
            n: self.modulus.as_slice(),
            e: self.exponent.as_slice(),
        }
        .verify(params, message, signature)
        .map_err(|_| ApduError::Validation("RSA signature verification failed".to_string()))
    }
}

fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

fn bit_length(bytes: &[u8]) -> usize {
    match bytes.first() {
        Some(first) => bytes.len() * 8 - first.leading_zeros() as usize,
        None => 0,
    }
}

fn key_from_pair((modulus, exponent): (Vec<u8>, Vec<u8>)) -> ApduResult<RsaPublicKey> {
    RsaPublicKey::from_components(&modulus, &exponent)
}

/// Schema type returned by [`rsa_public_key_schema`]
pub type RsaPublicKeySchema = TryMap<
    Constructed<(Primitive, Primitive)>,
    fn((Vec<u8>, Vec<u8>)) -> ApduResult<RsaPublicKey>,
>;

/// Constructed node `name` holding the modulus then the exponent
///
/// The outer tag is not checked; the component tags must match
/// `modulus_tag` and `exponent_tag` by class and number.
pub fn rsa_public_key_schema(
    name: impl Into<Cow<'static, str>>,
    modulus_tag: Tag,
    exponent_tag: Tag,
) -> RsaPublicKeySchema {
    constructed(
        name,
        (
            primitive("modulus").with_tag(modulus_tag.class(), modulus_tag.number()),
            primitive("exponent").with_tag(exponent_tag.class(), exponent_tag.number()),
        ),
    )
    .try_map(key_from_pair as fn((Vec<u8>, Vec<u8>)) -> ApduResult<RsaPublicKey>)
}
