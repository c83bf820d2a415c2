//! Nodes of a decoded or constructed tree.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.

use std::str::FromStr;
use bytes::Bytes;
use crate::encode::Values;
use crate::error::Error;
use crate::ident::{Class, Ident};
use crate::int::Integer;
use crate::length::LengthBlock;
use crate::mode::Mode;
use crate::oid::Oid;
use crate::string::{BitString, CharString, OctetString, StringKind};
use crate::tag;
use crate::time::{GeneralizedTime, Timestamp, UtcTime};
use crate::value::Value;


//------------ Node ----------------------------------------------------------

/// A single encoded value with all its children.
///
/// A node consists of the identifier octets, the length octets, and the
/// value. Nodes that came out of decoding also keep everything the decoder
/// noticed along the way: anomalies that didn’t stop decoding end up in
/// [`warnings`][Self::warnings], an error that did is in
/// [`error`][Self::error], and the octets the node was decoded from are
/// available via [`captured`][Self::captured].
///
/// Nodes can also be built from scratch through the constructor functions
/// such as [`boolean`][Self::boolean] or [`sequence`][Self::sequence].
/// These nodes use the shortest definite length. A node can carry a name
/// and an optional flag so it can serve as a template for a schema via
/// [`Schema::template`][crate::Schema::template].
///
/// Two nodes compare equal if their tags and values are equal. Lengths,
/// names and diagnostics are ignored.
#[derive(Clone, Debug)]
pub struct Node {
    /// The identifier octets.
    ident: Ident,

    /// The length octets.
    length: LengthBlock,

    /// The value.
    value: Value,

    /// A name for use as a schema template.
    name: Option<String>,

    /// Whether the node is optional when used as a schema template.
    optional: bool,

    /// The error that stopped decoding this node.
    error: Option<Error>,

    /// Anomalies found while decoding.
    warnings: Vec<String>,

    /// The length of the complete encoded node.
    block_len: usize,

    /// The encoded octets the node was decoded from.
    captured: Option<Bytes>,
}

/// # Creation
///
impl Node {
    /// Creates a node from identifier octets and a value.
    ///
    /// The constructed flag of `ident` is replaced by the one required by
    /// `value`.
    pub fn new(ident: Ident, value: Value) -> Self {
        let ident = ident.with_constructed(value.is_constructed());
        // Constructed strings only keep their form in BER.
        let content_len = value.content_len(
            if ident.is_constructed() { Mode::Ber } else { Mode::Der }
        );
        let length = LengthBlock::definite(content_len);
        let block_len = ident.encoded_len() + length.block_len() + content_len;
        Node {
            ident, length, value,
            name: None,
            optional: false,
            error: None,
            warnings: Vec::new(),
            block_len,
            captured: None,
        }
    }

    /// Creates a node from decoded parts.
    pub(crate) fn decoded(
        ident: Ident,
        length: LengthBlock,
        value: Value,
        error: Option<Error>,
        warnings: Vec<String>,
        captured: Bytes,
    ) -> Self {
        Node {
            ident, length, value,
            name: None,
            optional: false,
            error,
            warnings,
            block_len: captured.len(),
            captured: Some(captured),
        }
    }

    fn universal(number: u64, value: Value) -> Self {
        Self::new(Ident::universal(number, false), value)
    }

    /// Creates an end-of-contents marker.
    pub fn end_of_contents() -> Self {
        Self::universal(tag::END_OF_CONTENTS, Value::EndOfContents)
    }

    /// Creates a BOOLEAN.
    pub fn boolean(value: bool) -> Self {
        Self::universal(tag::BOOLEAN, Value::Boolean(value))
    }

    /// Creates an INTEGER.
    pub fn integer(value: impl Into<Integer>) -> Self {
        Self::universal(tag::INTEGER, Value::Integer(value.into()))
    }

    /// Creates an ENUMERATED value.
    pub fn enumerated(value: impl Into<Integer>) -> Self {
        Self::universal(tag::ENUMERATED, Value::Enumerated(value.into()))
    }

    /// Creates a BIT STRING.
    pub fn bit_string(value: BitString) -> Self {
        Self::universal(tag::BIT_STRING, Value::BitString(value))
    }

    /// Creates a primitive OCTET STRING.
    pub fn octet_string(value: impl Into<Bytes>) -> Self {
        Self::universal(
            tag::OCTET_STRING,
            Value::OctetString(OctetString::new(value.into()))
        )
    }

    /// Creates a NULL.
    pub fn null() -> Self {
        Self::universal(tag::NULL, Value::Null)
    }

    /// Creates an OBJECT IDENTIFIER from its dotted representation.
    pub fn oid(dotted: &str) -> Result<Self, Error> {
        Oid::from_str(dotted).map(Self::oid_value)
    }

    /// Creates an OBJECT IDENTIFIER.
    pub fn oid_value(oid: Oid) -> Self {
        Self::universal(tag::OID, Value::Oid(oid))
    }

    /// Creates a character string of the given kind.
    pub fn string(kind: StringKind, text: &str) -> Result<Self, Error> {
        let string = CharString::from_text(kind, text)?;
        Ok(Self::universal(kind.number(), Value::String(string)))
    }

    /// Creates a UTF8String.
    pub fn utf8_string(text: &str) -> Self {
        Self::universal(tag::UTF8_STRING, Value::String(
            CharString::from_utf8(text)
        ))
    }

    /// Creates a UTCTime.
    pub fn utc_time(timestamp: Timestamp) -> Result<Self, Error> {
        let time = UtcTime::new(timestamp)?;
        Ok(Self::universal(tag::UTC_TIME, Value::UtcTime(time)))
    }

    /// Creates a GeneralizedTime.
    pub fn generalized_time(timestamp: Timestamp) -> Result<Self, Error> {
        let time = GeneralizedTime::new(timestamp)?;
        Ok(Self::universal(
            tag::GENERALIZED_TIME, Value::GeneralizedTime(time)
        ))
    }

    /// Creates a SEQUENCE.
    pub fn sequence(children: Vec<Node>) -> Self {
        Self::universal(tag::SEQUENCE, Value::Sequence(children))
    }

    /// Creates a SET.
    ///
    /// The children are kept in the given order.
    pub fn set(children: Vec<Node>) -> Self {
        Self::universal(tag::SET, Value::Set(children))
    }

    /// Creates a primitive node with an arbitrary tag and content.
    pub fn primitive(class: Class, number: u64, content: Bytes) -> Self {
        Self::new(Ident::new(class, false, number), Value::Primitive(content))
    }

    /// Creates a constructed node with an arbitrary tag.
    pub fn constructed(class: Class, number: u64, children: Vec<Node>) -> Self {
        Self::new(
            Ident::new(class, true, number), Value::Constructed(children)
        )
    }

    /// Creates an explicitly tagged value.
    ///
    /// This is a constructed node with the given context-specific tag
    /// number and `inner` as its only child.
    pub fn explicit(number: u64, inner: Node) -> Self {
        Self::constructed(Class::Context, number, vec![inner])
    }

    /// Returns the node with a name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the node marked as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Returns the node using indefinite length when encoded as BER.
    ///
    /// This has no effect on primitive nodes.
    pub fn with_indefinite_length(mut self) -> Self {
        if self.value.is_constructed() {
            self.length = LengthBlock::indefinite();
        }
        self
    }
}

/// # Access
///
impl Node {
    /// Returns the identifier octets.
    pub fn ident(&self) -> &Ident {
        &self.ident
    }

    /// Returns the length octets.
    pub fn length(&self) -> &LengthBlock {
        &self.length
    }

    /// Returns the value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Converts the node into its value.
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Returns the name if there is one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns whether the node is optional.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Returns the error that stopped decoding this node.
    ///
    /// For nodes in the partial tree of a failed decoding, this is the
    /// error that stopped decoding. A node with a time value that couldn’t
    /// be parsed carries an error, too, even if decoding succeeded.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Returns the anomalies found while decoding.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Adds a warning.
    pub(crate) fn push_warning(&mut self, warning: String) {
        self.warnings.push(warning)
    }

    /// Returns the length of the complete encoded node.
    ///
    /// For decoded nodes, this includes the end-of-contents marker of an
    /// indefinite length value.
    pub fn block_len(&self) -> usize {
        self.block_len
    }

    /// Returns the octets the node was decoded from.
    pub fn captured(&self) -> Option<&Bytes> {
        self.captured.as_ref()
    }

    /// Returns whether the node is constructed.
    pub fn is_constructed(&self) -> bool {
        self.ident.is_constructed()
    }

    /// Returns whether the node is an end-of-contents marker.
    pub fn is_end_of_contents(&self) -> bool {
        matches!(self.value, Value::EndOfContents)
    }

    /// Returns the children of a constructed node.
    ///
    /// Returns an empty slice for primitive nodes.
    pub fn children(&self) -> &[Node] {
        self.value.children().unwrap_or_default()
    }
}

/// # Encoding
///
impl Node {
    /// Returns the encoded node.
    pub fn encode(&self, mode: Mode) -> Vec<u8> {
        self.to_vec(mode)
    }

    /// Returns whether the node is written with indefinite length.
    pub(crate) fn uses_indefinite(&self, mode: Mode) -> bool {
        mode.allows_indefinite()
            && self.length.is_indefinite()
            && self.value.encodes_constructed(mode)
    }
}


//--- PartialEq and Eq

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.ident == other.ident && self.value == other.value
    }
}

impl Eq for Node { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn constructors() {
        assert_eq!(Node::boolean(true).encode(Mode::Der), b"\x01\x01\xFF");
        assert_eq!(Node::boolean(false).encode(Mode::Der), b"\x01\x01\x00");
        assert_eq!(Node::integer(127).encode(Mode::Der), b"\x02\x01\x7F");
        assert_eq!(Node::integer(-128).encode(Mode::Der), b"\x02\x01\x80");
        assert_eq!(Node::integer(128).encode(Mode::Der), b"\x02\x02\x00\x80");
        assert_eq!(Node::enumerated(1).encode(Mode::Der), b"\x0A\x01\x01");
        assert_eq!(Node::null().encode(Mode::Der), b"\x05\x00");
        assert_eq!(
            Node::oid("1.2.840.113549").unwrap().encode(Mode::Der),
            b"\x06\x06\x2A\x86\x48\x86\xF7\x0D"
        );
        assert!(Node::oid("3.1").is_err());
        assert_eq!(
            Node::utf8_string("ü").encode(Mode::Der), b"\x0C\x02\xC3\xBC"
        );
        assert_eq!(
            Node::string(StringKind::Printable, "ab").unwrap().encode(Mode::Der),
            b"\x13\x02ab"
        );
        assert_eq!(
            Node::utc_time(
                Timestamp::new(2049, 12, 31, 23, 59, 59).unwrap()
            ).unwrap().encode(Mode::Der),
            b"\x17\x0D491231235959Z"
        );
        assert_eq!(
            Node::primitive(Class::Private, 31, Bytes::from_static(b"x"))
                .encode(Mode::Der),
            b"\xDF\x1F\x01x"
        );
    }

    #[test]
    fn nested() {
        let node = Node::sequence(vec![
            Node::integer(1),
            Node::explicit(0, Node::boolean(true)),
        ]);
        assert!(node.is_constructed());
        assert_eq!(node.children().len(), 2);
        assert_eq!(node.block_len(), 10);
        assert_eq!(
            node.encode(Mode::Der),
            b"\x30\x08\x02\x01\x01\xA0\x03\x01\x01\xFF"
        );
        assert_eq!(node.encode(Mode::Ber), node.encode(Mode::Der));
    }

    #[test]
    fn indefinite_length() {
        let node = Node::sequence(vec![Node::null()]).with_indefinite_length();
        assert_eq!(node.encode(Mode::Ber), b"\x30\x80\x05\x00\x00\x00");
        assert_eq!(node.encode(Mode::Der), b"\x30\x02\x05\x00");
        assert!(!Node::null().with_indefinite_length().length().is_indefinite());
    }

    #[test]
    fn constructed_strings() {
        let node = Node::new(
            Ident::universal(tag::OCTET_STRING, false),
            Value::OctetString(OctetString::from_segments(vec![
                Node::octet_string(&b"ab"[..]),
                Node::octet_string(&b"c"[..]),
            ]).unwrap())
        );
        assert!(node.is_constructed());
        assert_eq!(node.length().to_definite(), Some(7));
        assert_eq!(node.block_len(), 9);
        assert_eq!(
            node.encode(Mode::Ber), b"\x24\x07\x04\x02ab\x04\x01c"
        );
        assert_eq!(node.encode(Mode::Der), b"\x04\x03abc");
    }

    #[test]
    fn equality_ignores_metadata() {
        let plain = Node::sequence(vec![Node::null()]);
        let other = Node::sequence(vec![Node::null()])
            .with_indefinite_length()
            .named("x")
            .optional();
        assert_eq!(plain, other);
        assert_ne!(plain, Node::set(vec![Node::null()]));
    }
}
