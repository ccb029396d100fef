//! BER-TLV processing for ISO 7816-4 data objects
//!
//! This crate provides the tag/length codec, an untyped parser with sibling
//! and depth-first traversal, an encoder, and a schema-driven parser that
//! validates tags and decodes leaves into typed values, synchronously or
//! asynchronously.

pub mod decoder;
pub mod decoders;
pub mod encoder;
pub mod error;
pub mod rsa;
pub mod schema;
pub mod types;

pub use decoder::{find_tag, Tlv, TlvReader};
pub use encoder::TlvEncoder;
pub use error::{ApduError, ApduResult};
pub use rsa::{rsa_public_key_schema, RsaPublicKey};
pub use schema::{
    constructed, parse, parse_async, primitive, AsyncSchema, Schema, SchemaNode,
};
pub use types::{Length, Tag, TagClass};
