//! The value of a node.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.

use bytes::Bytes;
use crate::encode::{Target, Values};
use crate::error::{Error, Pos};
use crate::ident::Ident;
use crate::int::Integer;
use crate::mode::Mode;
use crate::node::Node;
use crate::oid::Oid;
use crate::string::{BitString, CharString, OctetString, StringKind};
use crate::tag;
use crate::time::{GeneralizedTime, UtcTime};


//------------ Value ---------------------------------------------------------

/// The value of a node.
///
/// There is one variant for each universal type we interpret. Values with
/// any other tag end up as [`Value::Primitive`] or [`Value::Constructed`]
/// which keep the content octets or the child nodes, respectively, so they
/// can be encoded again unchanged.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    /// The end-of-contents marker of an indefinite length value.
    EndOfContents,

    /// A BOOLEAN.
    Boolean(bool),

    /// An INTEGER.
    Integer(Integer),

    /// An ENUMERATED value.
    Enumerated(Integer),

    /// A BIT STRING in either primitive or constructed form.
    BitString(BitString),

    /// An OCTET STRING in either primitive or constructed form.
    OctetString(OctetString),

    /// A NULL.
    Null,

    /// An OBJECT IDENTIFIER.
    Oid(Oid),

    /// One of the character string types.
    String(CharString),

    /// A UTCTime.
    UtcTime(UtcTime),

    /// A GeneralizedTime.
    GeneralizedTime(GeneralizedTime),

    /// A SEQUENCE or SEQUENCE OF.
    Sequence(Vec<Node>),

    /// A SET or SET OF.
    Set(Vec<Node>),

    /// Any other primitive value.
    Primitive(Bytes),

    /// Any other constructed value.
    Constructed(Vec<Node>),
}

/// The result of interpreting the content of a value.
///
/// A value that could be interpreted may still carry an error that doesn’t
/// stop decoding. A value that couldn’t be interpreted carries a fallback
/// value for the partial tree along with the fatal error.
pub(crate) type ValueResult = Result<(Value, Option<Error>), (Value, Error)>;

/// # Decoding
///
impl Value {
    /// Interprets the content octets of a primitive value.
    ///
    /// The position `pos` is that of the content octets. Anomalies are
    /// added to `warnings`.
    pub(crate) fn from_primitive(
        ident: &Ident, content: Bytes, pos: Pos, warnings: &mut Vec<String>
    ) -> ValueResult {
        let number = match ident.universal_number() {
            Some(number) => number,
            None => return Ok((Value::Primitive(content), None)),
        };
        let fallback = content.clone();
        let fatal = |err: Error| (Value::Primitive(fallback), err);
        let value = match number {
            tag::END_OF_CONTENTS => {
                if !content.is_empty() {
                    return Err(fatal(Error::ReservedTag(
                        pos, "end-of-contents marker with content"
                    )))
                }
                Value::EndOfContents
            }
            tag::BOOLEAN => {
                if content.is_empty() {
                    return Err(fatal(Error::format("empty BOOLEAN content")))
                }
                if content.len() > 1 {
                    warnings.push(
                        "BOOLEAN value encoded in more than 1 octet".into()
                    );
                }
                Value::Boolean(content.iter().any(|&octet| octet != 0))
            }
            tag::INTEGER => {
                match Integer::from_content(content, warnings) {
                    Ok(int) => Value::Integer(int),
                    Err(err) => return Err(fatal(err)),
                }
            }
            tag::ENUMERATED => {
                match Integer::from_content(content, warnings) {
                    Ok(int) => Value::Enumerated(int),
                    Err(err) => return Err(fatal(err)),
                }
            }
            tag::BIT_STRING => {
                match BitString::from_content(content) {
                    Ok(bits) => Value::BitString(bits),
                    Err(err) => return Err(fatal(err)),
                }
            }
            tag::OCTET_STRING => Value::OctetString(OctetString::new(content)),
            tag::NULL => {
                if !content.is_empty() {
                    warnings.push(
                        "non-zero length of value block for NULL type".into()
                    );
                }
                Value::Null
            }
            tag::OID => {
                match Oid::from_content(content, pos, warnings) {
                    Ok(oid) => Value::Oid(oid),
                    Err(err) => return Err(fatal(err)),
                }
            }
            tag::UTC_TIME => {
                return match UtcTime::from_content(content.clone()) {
                    Ok(time) => Ok((Value::UtcTime(time), None)),
                    Err(err) => {
                        Ok((
                            Value::UtcTime(UtcTime::unparsed(content)),
                            Some(err)
                        ))
                    }
                }
            }
            tag::GENERALIZED_TIME => {
                return match GeneralizedTime::from_content(content.clone()) {
                    Ok(time) => Ok((Value::GeneralizedTime(time), None)),
                    Err(err) => {
                        Ok((
                            Value::GeneralizedTime(
                                GeneralizedTime::unparsed(content)
                            ),
                            Some(err)
                        ))
                    }
                }
            }
            tag::SEQUENCE | tag::SET => {
                warnings.push(format!("primitive encoding of {}", ident));
                Value::Primitive(content)
            }
            number => {
                match StringKind::from_number(number) {
                    Some(kind) => {
                        Value::String(
                            CharString::from_content(kind, content, warnings)
                        )
                    }
                    None => Value::Primitive(content),
                }
            }
        };
        Ok((value, None))
    }

    /// Interprets the children of a constructed value.
    pub(crate) fn from_constructed(
        ident: &Ident, children: Vec<Node>
    ) -> ValueResult {
        match ident.universal_number() {
            Some(tag::BIT_STRING) => {
                match BitString::concat(&children) {
                    Ok((unused, bits)) => Ok((
                        Value::BitString(
                            BitString::from_parts(unused, bits, children)
                        ),
                        None
                    )),
                    Err(err) => Err((Value::Constructed(children), err)),
                }
            }
            Some(tag::OCTET_STRING) => {
                match OctetString::concat(&children) {
                    Ok(octets) => Ok((
                        Value::OctetString(
                            OctetString::from_parts(octets, children)
                        ),
                        None
                    )),
                    Err(err) => Err((Value::Constructed(children), err)),
                }
            }
            _ => Ok((Self::partial(ident, children), None))
        }
    }

    /// Returns a value for the children of a constructed value.
    ///
    /// This is used for values whose decoding failed part way.
    pub(crate) fn partial(ident: &Ident, children: Vec<Node>) -> Self {
        match ident.universal_number() {
            Some(tag::SEQUENCE) => Value::Sequence(children),
            Some(tag::SET) => Value::Set(children),
            _ => Value::Constructed(children),
        }
    }
}

/// # Access
///
impl Value {
    /// Returns whether the value uses constructed encoding.
    pub fn is_constructed(&self) -> bool {
        match *self {
            Value::Sequence(_) | Value::Set(_) | Value::Constructed(_) => true,
            Value::BitString(ref bits) => bits.segments().is_some(),
            Value::OctetString(ref octets) => octets.segments().is_some(),
            _ => false,
        }
    }

    /// Returns the child nodes of a constructed value.
    ///
    /// For constructed bit and octet strings, these are the segments.
    pub fn children(&self) -> Option<&[Node]> {
        match *self {
            Value::Sequence(ref children)
                | Value::Set(ref children)
                | Value::Constructed(ref children) => Some(children),
            Value::BitString(ref bits) => bits.segments(),
            Value::OctetString(ref octets) => octets.segments(),
            _ => None,
        }
    }

    /// Returns the octets carried by a primitive value.
    ///
    /// For bit strings, these are the octets containing the bits without
    /// the initial octet with the number of unused bits. Returns `None`
    /// for values without content octets or with child nodes.
    pub fn content_octets(&self) -> Option<Bytes> {
        match *self {
            Value::Integer(ref int) | Value::Enumerated(ref int) => {
                Some(int.as_bytes().clone())
            }
            Value::BitString(ref bits) => Some(bits.octet_bytes()),
            Value::OctetString(ref octets) => Some(octets.to_bytes()),
            Value::Oid(ref oid) => Some(oid.as_bytes().clone()),
            Value::String(ref string) => Some(string.as_bytes().clone()),
            Value::UtcTime(ref time) => Some(time.as_bytes().clone()),
            Value::GeneralizedTime(ref time) => {
                Some(time.as_bytes().clone())
            }
            Value::Primitive(ref octets) => Some(octets.clone()),
            _ => None,
        }
    }

    /// Returns the value of a BOOLEAN.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Boolean(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the value of an INTEGER or ENUMERATED.
    pub fn as_integer(&self) -> Option<&Integer> {
        match *self {
            Value::Integer(ref int) | Value::Enumerated(ref int) => Some(int),
            _ => None,
        }
    }

    /// Returns the value of an OBJECT IDENTIFIER.
    pub fn as_oid(&self) -> Option<&Oid> {
        match *self {
            Value::Oid(ref oid) => Some(oid),
            _ => None,
        }
    }

    /// Returns the value of a BIT STRING.
    pub fn as_bit_string(&self) -> Option<&BitString> {
        match *self {
            Value::BitString(ref bits) => Some(bits),
            _ => None,
        }
    }

    /// Returns the value of an OCTET STRING.
    pub fn as_octet_string(&self) -> Option<&OctetString> {
        match *self {
            Value::OctetString(ref octets) => Some(octets),
            _ => None,
        }
    }

    /// Returns the text of a character string.
    pub fn as_str(&self) -> Option<&str> {
        match *self {
            Value::String(ref string) => Some(string.as_str()),
            _ => None,
        }
    }

    /// Returns the value of a UTCTime.
    pub fn as_utc_time(&self) -> Option<&UtcTime> {
        match *self {
            Value::UtcTime(ref time) => Some(time),
            _ => None,
        }
    }

    /// Returns the value of a GeneralizedTime.
    pub fn as_generalized_time(&self) -> Option<&GeneralizedTime> {
        match *self {
            Value::GeneralizedTime(ref time) => Some(time),
            _ => None,
        }
    }

    /// Returns a human readable rendering of primitive values.
    pub fn to_text(&self) -> Option<String> {
        match *self {
            Value::Boolean(value) => Some(value.to_string()),
            Value::Integer(ref int) | Value::Enumerated(ref int) => {
                Some(int.to_string())
            }
            Value::Oid(ref oid) => Some(oid.to_string()),
            Value::String(ref string) => Some(string.to_string()),
            Value::UtcTime(ref time) => Some(time.to_string()),
            Value::GeneralizedTime(ref time) => Some(time.to_string()),
            _ => None,
        }
    }
}

/// # Encoding
///
impl Value {
    /// Returns whether the value is encoded as constructed in `mode`.
    ///
    /// DER requires the primitive form for bit and octet strings.
    pub(crate) fn encodes_constructed(&self, mode: Mode) -> bool {
        match *self {
            Value::BitString(_) | Value::OctetString(_) => {
                mode == Mode::Ber && self.is_constructed()
            }
            _ => self.is_constructed()
        }
    }

    /// Returns the length of the content octets when encoded in `mode`.
    pub(crate) fn content_len(&self, mode: Mode) -> usize {
        if let Some(children) = self.encoded_children(mode) {
            return children.encoded_len(mode)
        }
        match *self {
            Value::EndOfContents | Value::Null => 0,
            Value::Boolean(_) => 1,
            Value::BitString(ref bits) => bits.primitive_content_len(),
            _ => self.content_octets().map_or(0, |octets| octets.len()),
        }
    }

    /// Writes the content octets encoded in `mode` to a target.
    pub(crate) fn write_content<T: Target>(
        &self, mode: Mode, target: &mut T
    ) -> Result<(), T::Error> {
        if let Some(children) = self.encoded_children(mode) {
            return children.write_encoded(mode, target)
        }
        match *self {
            Value::EndOfContents | Value::Null => Ok(()),
            Value::Boolean(true) => target.write_all(&[0xFF]),
            Value::Boolean(false) => target.write_all(&[0x00]),
            Value::BitString(ref bits) => {
                target.write_all(&[bits.unused()])?;
                target.write_all(bits.octet_slice())
            }
            Value::Integer(ref int) | Value::Enumerated(ref int) => {
                target.write_all(int.as_slice())
            }
            Value::OctetString(ref octets) => {
                target.write_all(octets.as_slice())
            }
            Value::Oid(ref oid) => target.write_all(oid.as_slice()),
            Value::String(ref string) => target.write_all(string.as_slice()),
            Value::UtcTime(ref time) => target.write_all(time.as_slice()),
            Value::GeneralizedTime(ref time) => {
                target.write_all(time.as_slice())
            }
            Value::Primitive(ref octets) => target.write_all(octets),
            Value::Sequence(_) | Value::Set(_) | Value::Constructed(_) => {
                Ok(())
            }
        }
    }

    /// Returns the children to encode in `mode` if any.
    fn encoded_children(&self, mode: Mode) -> Option<&[Node]> {
        if self.encodes_constructed(mode) {
            self.children()
        }
        else {
            None
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn primitive(
        number: u64, content: &'static [u8]
    ) -> (ValueResult, Vec<String>) {
        let mut warnings = Vec::new();
        let res = Value::from_primitive(
            &Ident::universal(number, false),
            Bytes::from_static(content), Pos::from(2), &mut warnings
        );
        (res, warnings)
    }

    fn value(number: u64, content: &'static [u8]) -> Value {
        match primitive(number, content).0 {
            Ok((value, None)) => value,
            _ => panic!("decoding failed"),
        }
    }

    #[test]
    fn boolean() {
        assert_eq!(value(tag::BOOLEAN, b"\xFF"), Value::Boolean(true));
        assert_eq!(value(tag::BOOLEAN, b"\x00"), Value::Boolean(false));
        assert_eq!(value(tag::BOOLEAN, b"\x01"), Value::Boolean(true));
        let (res, warnings) = primitive(tag::BOOLEAN, b"\x00\x01");
        assert_eq!(res.unwrap().0, Value::Boolean(true));
        assert_eq!(warnings.len(), 1);
        assert!(primitive(tag::BOOLEAN, b"").0.is_err());
    }

    #[test]
    fn null() {
        assert_eq!(value(tag::NULL, b""), Value::Null);
        let (res, warnings) = primitive(tag::NULL, b"\x00");
        assert_eq!(res.unwrap().0, Value::Null);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn end_of_contents() {
        assert_eq!(value(tag::END_OF_CONTENTS, b""), Value::EndOfContents);
        assert!(matches!(
            primitive(tag::END_OF_CONTENTS, b"\x00").0,
            Err((_, Error::ReservedTag(..)))
        ));
    }

    #[test]
    fn times() {
        assert!(matches!(
            value(tag::UTC_TIME, b"991231235959Z"), Value::UtcTime(_)
        ));
        match primitive(tag::UTC_TIME, b"garbage").0 {
            Ok((Value::UtcTime(time), Some(Error::Format(_)))) => {
                assert_eq!(time.timestamp(), None);
                assert_eq!(time.as_slice(), b"garbage");
            }
            _ => panic!("expected a flawed UTCTime")
        }
        assert!(matches!(
            primitive(tag::GENERALIZED_TIME, b"2001").0,
            Ok((Value::GeneralizedTime(_), Some(_)))
        ));
    }

    #[test]
    fn strings_and_fallbacks() {
        assert_eq!(value(tag::PRINTABLE_STRING, b"abc").as_str(), Some("abc"));
        assert_eq!(value(tag::DATE, b"2020-01-01").as_str(), Some("2020-01-01"));
        assert_eq!(
            value(7, b"\x01"), Value::Primitive(Bytes::from_static(b"\x01"))
        );
        let mut warnings = Vec::new();
        let res = Value::from_primitive(
            &Ident::context(0, false), Bytes::from_static(b"\x05"),
            Pos::from(0), &mut warnings
        );
        assert_eq!(
            res.unwrap().0, Value::Primitive(Bytes::from_static(b"\x05"))
        );
    }

    #[test]
    fn constructed_strings() {
        let ident = Ident::universal(tag::OCTET_STRING, true);
        let (value, _) = Value::from_constructed(&ident, vec![
            Node::octet_string(&b"ab"[..]),
            Node::octet_string(&b"c"[..]),
        ]).unwrap();
        assert_eq!(
            value.as_octet_string().map(|s| s.as_slice()),
            Some(b"abc".as_ref())
        );
        assert!(value.is_constructed());
        assert!(!value.encodes_constructed(Mode::Der));
        assert!(value.encodes_constructed(Mode::Ber));
        assert_eq!(value.content_len(Mode::Der), 3);
        assert_eq!(value.content_len(Mode::Ber), 7);

        let (value, err) = Value::from_constructed(
            &ident, vec![Node::null()]
        ).unwrap_err();
        assert!(matches!(value, Value::Constructed(ref c) if c.len() == 1));
        assert!(matches!(err, Error::Format(_)));
    }
}
