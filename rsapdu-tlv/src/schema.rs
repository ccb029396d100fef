//! Schema-driven BER-TLV parsing
//!
//! A schema is a tree of plain values built once and shared across parses.
//! Leaves are [`Primitive`] (sync decoder) or [`AsyncPrimitive`] (async
//! decoder) nodes; inner nodes are [`Constructed`] nodes holding a tuple of
//! child schemas. The result type follows the shape of the schema: a
//! primitive yields its decoder's output, a constructed node yields the tuple
//! of its children's outputs, and [`SchemaNode::map`] / [`SchemaNode::try_map`]
//! turn those tuples into named structs.
//!
//! [`parse`] accepts only schemas whose every leaf is synchronous. Schemas
//! with an async leaf implement [`AsyncSchema`] only and must go through
//! [`parse_async`].
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use rsapdu_tlv::schema::{constructed, parse, primitive, SchemaNode};
//! use rsapdu_tlv::decoders::{Ascii, Uint};
//! use rsapdu_tlv::TagClass;
//!
//! struct Holder { name: String, serial: u64 }
//!
//! let schema = constructed(
//!     "holder",
//!     (
//!         primitive("name").with_tag(TagClass::ContextSpecific, 1).decoder(Ascii),
//!         primitive("serial").with_tag(TagClass::ContextSpecific, 2).decoder(Uint),
//!     ),
//! )
//! .with_tag(TagClass::Application, 0x21)
//! .map(|(name, serial)| Holder { name, serial });
//!
//! let holder = parse(&schema, &data)?;
//! ```

use crate::decoder::Tlv;
use crate::decoders::{AsyncDecode, Decode, RawBytes};
use crate::error::{ApduError, ApduResult, SchemaViolation, ViolationKind};
use crate::types::{Tag, TagClass};
use async_trait::async_trait;
use std::borrow::Cow;

/// Name and optional tag constraints of a schema node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSpec {
    name: Cow<'static, str>,
    class: Option<TagClass>,
    number: Option<u32>,
}

impl NodeSpec {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            class: None,
            number: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Required tag class, `None` accepts any
    pub fn class(&self) -> Option<TagClass> {
        self.class
    }

    /// Required tag number, `None` accepts any
    pub fn number(&self) -> Option<u32> {
        self.number
    }
}

/// Common part of every schema node
pub trait SchemaNode: Send + Sync {
    /// Value produced for a matching TLV
    type Output: Send;

    fn spec(&self) -> &NodeSpec;

    /// Whether the node expects a constructed TLV
    fn is_constructed(&self) -> bool;

    /// Transform the decoded output
    fn map<F, T>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> T + Send + Sync,
    {
        Map { inner: self, f }
    }

    /// Transform the decoded output with a fallible function
    ///
    /// An error returned by `f` is reported as a decode violation at this
    /// node's path.
    fn try_map<F, T>(self, f: F) -> TryMap<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> ApduResult<T> + Send + Sync,
    {
        TryMap { inner: self, f }
    }
}

/// Schema that decodes synchronously
pub trait Schema: SchemaNode {
    /// Decode the value of a TLV whose tag already passed the node's checks
    fn decode_value(&self, value: &[u8], path: &str) -> ApduResult<Self::Output>;
}

/// Schema that may suspend while decoding
#[async_trait]
pub trait AsyncSchema: SchemaNode {
    async fn decode_value_async(&self, value: &[u8], path: &str) -> ApduResult<Self::Output>;
}

/// Parse the TLV at the start of `buffer` against `schema`
///
/// Bytes after the top-level TLV are ignored.
///
/// # Errors
/// - `ApduError::Range` / `ApduError::Protocol` for malformed TLV framing
/// - `ApduError::SchemaValidation` when a tag, constructed flag, length or
///   leaf value does not match the schema
pub fn parse<S: Schema>(schema: &S, buffer: &[u8]) -> ApduResult<S::Output> {
    let tlv = Tlv::parse(buffer)?;
    let path = schema.spec().name();
    check_tag(schema, tlv.tag(), path)?;
    schema.decode_value(tlv.value(), path)
}

/// Asynchronous form of [`parse`]
///
/// Leaves are decoded one at a time in schema order.
pub async fn parse_async<S: AsyncSchema>(
    schema: &S,
    buffer: &[u8],
) -> ApduResult<S::Output> {
    let tlv = Tlv::parse(buffer)?;
    let path = schema.spec().name();
    check_tag(schema, tlv.tag(), path)?;
    schema.decode_value_async(tlv.value(), path).await
}

fn check_tag<N: SchemaNode + ?Sized>(node: &N, tag: &Tag, path: &str) -> ApduResult<()> {
    let spec = node.spec();

    if let Some(class) = spec.class {
        if class != tag.class() {
            return Err(SchemaViolation::new(path, ViolationKind::TagClass, class, tag.class()).into());
        }
    }

    if let Some(number) = spec.number {
        if number != tag.number() {
            return Err(SchemaViolation::new(
                path,
                ViolationKind::TagNumber,
                format!("0x{:02X}", number),
                format!("0x{:02X}", tag.number()),
            )
            .into());
        }
    }

    if node.is_constructed() != tag.is_constructed() {
        let describe = |constructed: bool| if constructed { "constructed" } else { "primitive" };
        return Err(SchemaViolation::new(
            path,
            ViolationKind::Constructed,
            describe(node.is_constructed()),
            describe(tag.is_constructed()),
        )
        .into());
    }

    Ok(())
}

/// Attach a leaf failure to `path`, keeping violations already located deeper
fn decode_failure(path: &str, error: ApduError) -> ApduError {
    match error {
        ApduError::SchemaValidation(_) => error,
        other => SchemaViolation::new(path, ViolationKind::Decode, "decodable value", other).into(),
    }
}

/// Walks the children of one constructed value in schema order
pub struct FieldCursor<'v, 'p> {
    value: &'v [u8],
    offset: usize,
    path: &'p str,
}

impl<'v, 'p> FieldCursor<'v, 'p> {
    fn new(value: &'v [u8], path: &'p str) -> Self {
        Self {
            value,
            offset: 0,
            path,
        }
    }

    /// Decode the next child with a synchronous schema
    pub fn decode<S: Schema>(&mut self, schema: &S) -> ApduResult<S::Output> {
        let (value, path) = self.next_child(schema)?;
        schema.decode_value(value, &path)
    }

    /// Decode the next child with an asynchronous schema
    pub async fn decode_async<S: AsyncSchema>(
        &mut self,
        schema: &S,
    ) -> ApduResult<S::Output> {
        let (value, path) = self.next_child(schema)?;
        schema.decode_value_async(value, &path).await
    }

    /// Split off the next child TLV and check its tag
    ///
    /// A child that is missing or runs past the parent's value means the
    /// children do not fit the declared length.
    fn next_child<N: SchemaNode + ?Sized>(&mut self, node: &N) -> ApduResult<(&'v [u8], String)> {
        let path = format!("{}.{}", self.path, node.spec().name());
        let value: &'v [u8] = self.value;
        let remaining = &value[self.offset..];

        let overrun = || {
            ApduError::from(SchemaViolation::new(
                self.path,
                ViolationKind::Length,
                self.value.len(),
                format!("more than {}", self.value.len()),
            ))
        };

        if remaining.is_empty() {
            return Err(overrun());
        }

        let (tag, length, header_length) = match Tlv::parse_header(remaining) {
            Ok(header) => header,
            Err(ApduError::Range(_)) => return Err(overrun()),
            Err(e) => return Err(e),
        };

        let end = header_length + length;
        if end > remaining.len() {
            return Err(overrun());
        }

        check_tag(node, &tag, &path)?;

        self.offset += end;
        Ok((&remaining[header_length..end], path))
    }

    /// Require that the children consumed the whole value
    fn finish(&self) -> ApduResult<()> {
        if self.offset != self.value.len() {
            return Err(SchemaViolation::new(
                self.path,
                ViolationKind::Length,
                self.value.len(),
                self.offset,
            )
            .into());
        }
        Ok(())
    }
}

/// Children of a constructed node
///
/// Implemented for tuples of schema nodes up to arity 12; the output is the
/// tuple of the children's outputs.
pub trait FieldList: Send + Sync {
    type Output: Send;
}

/// Field list whose children all decode synchronously
pub trait Fields: FieldList {
    fn decode_fields(&self, cursor: &mut FieldCursor<'_, '_>) -> ApduResult<Self::Output>;
}

/// Field list with at least one asynchronous child
#[async_trait]
pub trait AsyncFields: FieldList {
    async fn decode_fields_async(
        &self,
        cursor: &mut FieldCursor<'_, '_>,
    ) -> ApduResult<Self::Output>;
}

impl FieldList for () {
    type Output = ();
}

impl Fields for () {
    fn decode_fields(&self, _cursor: &mut FieldCursor<'_, '_>) -> ApduResult<()> {
        Ok(())
    }
}

#[async_trait]
impl AsyncFields for () {
    async fn decode_fields_async(&self, _cursor: &mut FieldCursor<'_, '_>) -> ApduResult<()> {
        Ok(())
    }
}

macro_rules! impl_fields {
    ($($ty:ident => $var:ident),+) => {
        impl<$($ty: SchemaNode),+> FieldList for ($($ty,)+) {
            type Output = ($($ty::Output,)+);
        }

        impl<$($ty: Schema),+> Fields for ($($ty,)+) {
            fn decode_fields(&self, cursor: &mut FieldCursor<'_, '_>) -> ApduResult<Self::Output> {
                let ($($var,)+) = self;
                Ok(($(cursor.decode($var)?,)+))
            }
        }

        #[async_trait]
        impl<$($ty: AsyncSchema),+> AsyncFields for ($($ty,)+) {
            async fn decode_fields_async(
                &self,
                cursor: &mut FieldCursor<'_, '_>,
            ) -> ApduResult<Self::Output> {
                let ($($var,)+) = self;
                Ok(($(cursor.decode_async($var).await?,)+))
            }
        }
    };
}

impl_fields!(A => a);
impl_fields!(A => a, B => b);
impl_fields!(A => a, B => b, C => c);
impl_fields!(A => a, B => b, C => c, D => d);
impl_fields!(A => a, B => b, C => c, D => d, E => e);
impl_fields!(A => a, B => b, C => c, D => d, E => e, F => f);
impl_fields!(A => a, B => b, C => c, D => d, E => e, F => f, G => g);
impl_fields!(A => a, B => b, C => c, D => d, E => e, F => f, G => g, H => h);
impl_fields!(A => a, B => b, C => c, D => d, E => e, F => f, G => g, H => h, I => i);
impl_fields!(A => a, B => b, C => c, D => d, E => e, F => f, G => g, H => h, I => i, J => j);
impl_fields!(A => a, B => b, C => c, D => d, E => e, F => f, G => g, H => h, I => i, J => j, K => k);
impl_fields!(A => a, B => b, C => c, D => d, E => e, F => f, G => g, H => h, I => i, J => j, K => k, L => l);

macro_rules! tag_builders {
    () => {
        /// Require both tag class and tag number
        pub fn with_tag(mut self, class: TagClass, number: u32) -> Self {
            self.spec.class = Some(class);
            self.spec.number = Some(number);
            self
        }

        pub fn with_class(mut self, class: TagClass) -> Self {
            self.spec.class = Some(class);
            self
        }

        pub fn with_number(mut self, number: u32) -> Self {
            self.spec.number = Some(number);
            self
        }
    };
}

/// Primitive node with a synchronous decoder
#[derive(Debug, Clone)]
pub struct Primitive<D = RawBytes> {
    spec: NodeSpec,
    decoder: D,
}

/// Primitive node keeping the raw value bytes
pub fn primitive(name: impl Into<Cow<'static, str>>) -> Primitive {
    Primitive {
        spec: NodeSpec::new(name),
        decoder: RawBytes,
    }
}

impl<D> Primitive<D> {
    tag_builders!();

    /// Replace the leaf decoder
    pub fn decoder<E: Decode>(self, decoder: E) -> Primitive<E> {
        Primitive {
            spec: self.spec,
            decoder,
        }
    }

    /// Replace the leaf decoder with an asynchronous one
    pub fn async_decoder<E: AsyncDecode>(self, decoder: E) -> AsyncPrimitive<E> {
        AsyncPrimitive {
            spec: self.spec,
            decoder,
        }
    }
}

impl<D: Decode> SchemaNode for Primitive<D> {
    type Output = D::Output;

    fn spec(&self) -> &NodeSpec {
        &self.spec
    }

    fn is_constructed(&self) -> bool {
        false
    }
}

impl<D: Decode> Schema for Primitive<D> {
    fn decode_value(&self, value: &[u8], path: &str) -> ApduResult<D::Output> {
        self.decoder
            .decode(value)
            .map_err(|e| decode_failure(path, e))
    }
}

#[async_trait]
impl<D: Decode> AsyncSchema for Primitive<D> {
    async fn decode_value_async(&self, value: &[u8], path: &str) -> ApduResult<D::Output> {
        self.decode_value(value, path)
    }
}

/// Primitive node with an asynchronous decoder
#[derive(Debug, Clone)]
pub struct AsyncPrimitive<D> {
    spec: NodeSpec,
    decoder: D,
}

impl<D> AsyncPrimitive<D> {
    tag_builders!();
}

impl<D: AsyncDecode> SchemaNode for AsyncPrimitive<D> {
    type Output = D::Output;

    fn spec(&self) -> &NodeSpec {
        &self.spec
    }

    fn is_constructed(&self) -> bool {
        false
    }
}

#[async_trait]
impl<D: AsyncDecode> AsyncSchema for AsyncPrimitive<D> {
    async fn decode_value_async(&self, value: &[u8], path: &str) -> ApduResult<D::Output> {
        self.decoder
            .decode_async(value)
            .await
            .map_err(|e| decode_failure(path, e))
    }
}

/// Constructed node whose children must consume its value exactly
#[derive(Debug, Clone)]
pub struct Constructed<F> {
    spec: NodeSpec,
    fields: F,
}

/// Constructed node with `fields` decoded in order
pub fn constructed<F: FieldList>(name: impl Into<Cow<'static, str>>, fields: F) -> Constructed<F> {
    Constructed {
        spec: NodeSpec::new(name),
        fields,
    }
}

impl<F> Constructed<F> {
    tag_builders!();
}

impl<F: FieldList> SchemaNode for Constructed<F> {
    type Output = F::Output;

    fn spec(&self) -> &NodeSpec {
        &self.spec
    }

    fn is_constructed(&self) -> bool {
        true
    }
}

impl<F: Fields> Schema for Constructed<F> {
    fn decode_value(&self, value: &[u8], path: &str) -> ApduResult<F::Output> {
        let mut cursor = FieldCursor::new(value, path);
        let output = self.fields.decode_fields(&mut cursor)?;
        cursor.finish()?;
        Ok(output)
    }
}

#[async_trait]
impl<F: AsyncFields> AsyncSchema for Constructed<F> {
    async fn decode_value_async(&self, value: &[u8], path: &str) -> ApduResult<F::Output> {
        let mut cursor = FieldCursor::new(value, path);
        let output = self.fields.decode_fields_async(&mut cursor).await?;
        cursor.finish()?;
        Ok(output)
    }
}

/// Output transformed by a function, see [`SchemaNode::map`]
#[derive(Debug, Clone)]
pub struct Map<S, F> {
    inner: S,
    f: F,
}

impl<S, F, T> SchemaNode for Map<S, F>
where
    S: SchemaNode,
    F: Fn(S::Output) -> T + Send + Sync,
    T: Send,
{
    type Output = T;

    fn spec(&self) -> &NodeSpec {
        self.inner.spec()
    }

    fn is_constructed(&self) -> bool {
        self.inner.is_constructed()
    }
}

impl<S, F, T> Schema for Map<S, F>
where
    S: Schema,
    F: Fn(S::Output) -> T + Send + Sync,
    T: Send,
{
    fn decode_value(&self, value: &[u8], path: &str) -> ApduResult<T> {
        self.inner.decode_value(value, path).map(&self.f)
    }
}

#[async_trait]
impl<S, F, T> AsyncSchema for Map<S, F>
where
    S: AsyncSchema,
    F: Fn(S::Output) -> T + Send + Sync,
    T: Send,
{
    async fn decode_value_async(&self, value: &[u8], path: &str) -> ApduResult<T> {
        let output = self.inner.decode_value_async(value, path).await?;
        Ok((self.f)(output))
    }
}

/// Output transformed by a fallible function, see [`SchemaNode::try_map`]
#[derive(Debug, Clone)]
pub struct TryMap<S, F> {
    inner: S,
    f: F,
}

impl<S, F, T> SchemaNode for TryMap<S, F>
where
    S: SchemaNode,
    F: Fn(S::Output) -> ApduResult<T> + Send + Sync,
    T: Send,
{
    type Output = T;

    fn spec(&self) -> &NodeSpec {
        self.inner.spec()
    }

    fn is_constructed(&self) -> bool {
        self.inner.is_constructed()
    }
}

impl<S, F, T> Schema for TryMap<S, F>
where
    S: Schema,
    F: Fn(S::Output) -> ApduResult<T> + Send + Sync,
    T: Send,
{
    fn decode_value(&self, value: &[u8], path: &str) -> ApduResult<T> {
        let output = self.inner.decode_value(value, path)?;
        (self.f)(output).map_err(|e| decode_failure(path, e))
    }
}

#[async_trait]
impl<S, F, T> AsyncSchema for TryMap<S, F>
where
    S: AsyncSchema,
    F: Fn(S::Output) -> ApduResult<T> + Send + Sync,
    T: Send,
{
    async fn decode_value_async(&self, value: &[u8], path: &str) -> ApduResult<T> {
        let output = self.inner.decode_value_async(value, path).await?;
        (self.f)(output).map_err(|e| decode_failure(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoders::{from_async_fn, Ascii, Blocking, Uint};
    use crate::encoder::TlvEncoder;

    #[derive(Debug, PartialEq)]
    struct Holder {
        name: String,
        serial: u64,
        raw: Vec<u8>,
    }

    fn holder_schema() -> impl Schema<Output = Holder> + AsyncSchema {
        constructed(
            "holder",
            (
                primitive("name")
                    .with_tag(TagClass::ContextSpecific, 1)
                    .decoder(Ascii),
                primitive("serial")
                    .with_tag(TagClass::ContextSpecific, 2)
                    .decoder(Uint),
                primitive("raw"),
            ),
        )
        .with_tag(TagClass::Application, 0x21)
        .map(|(name, serial, raw)| Holder { name, serial, raw })
    }

    fn holder_bytes() -> Vec<u8> {
        let mut encoder = TlvEncoder::new();
        encoder
            .encode_constructed(&Tag::application(true, 0x21), |inner| {
                inner.encode_tlv(&Tag::context_specific(false, 1), b"ALICE");
                inner.encode_tlv(&Tag::context_specific(false, 2), &[0x01, 0x02]);
                inner.encode_tlv(&Tag::private(false, 5), &[0xEE]);
                Ok(())
            })
            .unwrap();
        encoder.into_bytes()
    }

    fn violation(result: ApduResult<impl std::fmt::Debug>) -> SchemaViolation {
        match result {
            Err(ApduError::SchemaValidation(v)) => v,
            other => panic!("expected schema violation, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_nested() {
        let holder = parse(&holder_schema(), &holder_bytes()).unwrap();
        assert_eq!(
            holder,
            Holder {
                name: "ALICE".to_string(),
                serial: 0x0102,
                raw: vec![0xEE],
            }
        );
    }

    #[test]
    fn test_parse_idempotent() {
        let schema = holder_schema();
        let data = holder_bytes();
        assert_eq!(parse(&schema, &data).unwrap(), parse(&schema, &data).unwrap());
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut data = holder_bytes();
        data.extend_from_slice(&[0x00, 0x00]);
        assert!(parse(&holder_schema(), &data).is_ok());
    }

    #[test]
    fn test_tag_class_mismatch() {
        // Private, primitive, tag 0x22 against Application 0x21
        let data = [0xDF, 0x22, 0x01, 0x00];
        let schema = primitive("id").with_tag(TagClass::Application, 0x21);
        let v = violation(parse(&schema, &data));
        assert_eq!(v.kind, ViolationKind::TagClass);
        assert_eq!(v.expected, "Application");
        assert_eq!(v.actual, "Private");
    }

    #[test]
    fn test_tag_number_mismatch() {
        let data = [0x5F, 0x22, 0x01, 0x00];
        let schema = primitive("id").with_tag(TagClass::Application, 0x21);
        let v = violation(parse(&schema, &data));
        assert_eq!(v.kind, ViolationKind::TagNumber);
        assert_eq!(v.expected, "0x21");
        assert_eq!(v.actual, "0x22");
    }

    #[test]
    fn test_constructed_flag_mismatch() {
        let v = violation(parse(&primitive("leaf"), &[0x30, 0x00]));
        assert_eq!(v.kind, ViolationKind::Constructed);

        let v = violation(parse(&constructed("node", ()), &[0x04, 0x00]));
        assert_eq!(v.kind, ViolationKind::Constructed);
        assert_eq!(v.expected, "constructed");
    }

    #[test]
    fn test_under_consumption() {
        // Two children declared in the value, schema only reads one
        let data = [0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02];
        let schema = constructed("seq", (primitive("a"),));
        let err = parse(&schema, &data).unwrap_err();
        assert!(err.to_string().contains("does not end exactly"));
        assert!(err.to_string().contains("seq"));
    }

    #[test]
    fn test_over_consumption() {
        // Child claims 4 bytes inside a parent of 3
        let data = [0x30, 0x03, 0x02, 0x04, 0x01, 0x02, 0x03, 0x04];
        let schema = constructed("seq", (primitive("a"),));
        assert!(parse(&schema, &data).unwrap_err().to_string().contains("does not end exactly"));

        // Schema expects more children than present
        let data = [0x30, 0x03, 0x02, 0x01, 0x01];
        let schema = constructed("seq", (primitive("a"), primitive("b")));
        let v = violation(parse(&schema, &data));
        assert_eq!(v.kind, ViolationKind::Length);
    }

    #[test]
    fn test_decode_error_path() {
        let data = [0x30, 0x03, 0x04, 0x01, 0x80];
        let schema = constructed("doc", (primitive("text").decoder(Ascii),));
        let v = violation(parse(&schema, &data));
        assert_eq!(v.kind, ViolationKind::Decode);
        assert_eq!(v.path, "doc.text");
    }

    #[test]
    fn test_try_map_error() {
        let schema = primitive("n")
            .decoder(Uint)
            .try_map(|n| {
                u8::try_from(n).map_err(|_| ApduError::Validation(format!("{} exceeds u8", n)))
            });
        assert_eq!(parse(&schema, &[0x02, 0x01, 0x7F]).unwrap(), 0x7F);
        let v = violation(parse(&schema, &[0x02, 0x02, 0x01, 0x00]));
        assert_eq!(v.kind, ViolationKind::Decode);
        assert_eq!(v.path, "n");
    }

    #[tokio::test]
    async fn test_parse_async_matches_sync() {
        let schema = holder_schema();
        let data = holder_bytes();
        assert_eq!(
            parse_async(&schema, &data).await.unwrap(),
            parse(&schema, &data).unwrap()
        );
    }

    #[tokio::test]
    async fn test_parse_async_leaf() {
        let schema = constructed(
            "pair",
            (
                primitive("slow")
                    .with_number(1)
                    .async_decoder(from_async_fn(|value: Vec<u8>| async move {
                        tokio::task::yield_now().await;
                        Ok(value.len())
                    })),
                primitive("blocking").with_number(2).async_decoder(Blocking::new(Uint)),
            ),
        );
        let data = [0x30, 0x07, 0x81, 0x02, 0xAA, 0xBB, 0x82, 0x01, 0x09];
        assert_eq!(parse_async(&schema, &data).await.unwrap(), (2, 9));
    }

    #[tokio::test]
    async fn test_parse_async_violation() {
        let schema = constructed(
            "pair",
            (primitive("a").async_decoder(Blocking::new(Uint)),),
        );
        let data = [0x30, 0x04, 0x02, 0x01, 0x01, 0x00];
        let err = parse_async(&schema, &data).await.unwrap_err();
        assert!(err.to_string().contains("does not end exactly"));
    }
}
