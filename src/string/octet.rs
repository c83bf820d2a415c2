//! A BER-encoded OCTET STRING.
//!
//! This is an internal module. It’s public types are re-exported by the
//! parent.

use std::hash;
use bytes::{Bytes, BytesMut};
use crate::error::Error;
use crate::node::Node;
use crate::value::Value;


//------------ OctetString ---------------------------------------------------

/// An octet string value.
///
/// An octet string is a sequence of octets, i.e., a glorified `[u8]`. Basic
/// Encoding Rules, however, allow this sequence to be broken up into chunks
/// that are encoded separatedly to allow for very large octet strings and
/// cases where one doesn’t yet know the length of the string.
///
/// A value of this type always provides the complete string. If it was
/// decoded from the constructed form, it also keeps the chunks so that the
/// value can be encoded again in the same form.
///
/// Octet strings are sometimes used to store BER encoded data. Schemas can
/// decode such content through
/// [`Schema::with_primitive_schema`][crate::Schema::with_primitive_schema].
///
/// # BER Encoding
///
/// Octet strings are either encoded as a primitive or a constructed value.
/// In the primitive form, the content octets are the string’s octets. In a
/// constructed form, the content is a sequence of encoded octets strings
/// which in turn may be primitive or constructed. In this case, the string’s
/// octets are the concatenation of all the content octets of the primitive
/// forms in the order as encountered.
///
/// In DER, only the primitive form is allowed.
#[derive(Clone, Debug)]
pub struct OctetString {
    /// The octets of the string.
    octets: Bytes,

    /// The segments of a constructed octet string.
    segments: Option<Vec<Node>>,
}

impl OctetString {
    /// Creates an octet string from a Bytes value.
    pub fn new(octets: Bytes) -> Self {
        OctetString { octets, segments: None }
    }

    /// Creates an octet string from the segments of a constructed value.
    ///
    /// All segments must be octet strings themselves.
    pub fn from_segments(segments: Vec<Node>) -> Result<Self, Error> {
        let octets = Self::concat(&segments)?;
        Ok(Self::from_parts(octets, segments))
    }

    /// Concatenates the octets of the segments of a constructed value.
    pub(crate) fn concat(segments: &[Node]) -> Result<Bytes, Error> {
        let mut octets = BytesMut::new();
        for segment in segments {
            match segment.value() {
                Value::OctetString(inner) => {
                    octets.extend_from_slice(&inner.octets)
                }
                _ => {
                    return Err(Error::format(format!(
                        "{} inside constructed OCTET STRING",
                        segment.ident()
                    )))
                }
            }
        }
        Ok(octets.freeze())
    }

    /// Creates a value from already concatenated segments.
    pub(crate) fn from_parts(octets: Bytes, segments: Vec<Node>) -> Self {
        OctetString { octets, segments: Some(segments) }
    }

    /// Returns the length of the string.
    pub fn len(&self) -> usize {
        self.octets.len()
    }

    /// Returns whether the string is empty.
    pub fn is_empty(&self) -> bool {
        self.octets.is_empty()
    }

    /// Returns the octets of the string.
    pub fn as_slice(&self) -> &[u8] {
        self.octets.as_ref()
    }

    /// Returns the octets of the string as a bytes value.
    pub fn to_bytes(&self) -> Bytes {
        self.octets.clone()
    }

    /// Returns the segments if the string was constructed.
    pub fn segments(&self) -> Option<&[Node]> {
        self.segments.as_deref()
    }
}


//--- AsRef

impl AsRef<[u8]> for OctetString {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}


//--- PartialEq and Eq

impl PartialEq for OctetString {
    fn eq(&self, other: &Self) -> bool {
        self.octets == other.octets
    }
}

impl Eq for OctetString { }


//--- Hash

impl hash::Hash for OctetString {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.octets.hash(state)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn segments() {
        let string = OctetString::from_segments(vec![
            Node::octet_string(&b"ab"[..]),
            Node::octet_string(&b""[..]),
            Node::octet_string(&b"cde"[..]),
        ]).unwrap();
        assert_eq!(string.as_slice(), b"abcde");
        assert_eq!(string.len(), 5);
        assert_eq!(string.segments().map(|s| s.len()), Some(3));
        assert_eq!(string, OctetString::new(Bytes::from_static(b"abcde")));

        assert!(
            OctetString::from_segments(vec![Node::boolean(true)]).is_err()
        );
    }
}
