//! BER-encoded bit strings.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::{Bytes, BytesMut};
use crate::error::Error;
use crate::node::Node;
use crate::value::Value;


//------------ BitString -----------------------------------------------------

/// A bit string value.
///
/// Bit strings are a sequence of bits. Unlike
/// [`OctetString`][crate::string::OctetString]s, they do not need to contain
/// a multiple of eight bits.
///
/// There are two types of methods for accessing the data in a bit string.
/// Methods starting with `bit` operate on the individual bits while those
/// prefixed with `octet` access entire octets and ignore the fact that there
/// may be unused bits in the final octet.
///
/// # BER Encoding
///
/// When encoded in BER, bit strings can either be a primitive or
/// constructed value.
///
/// If encoded as a primitive value, the first octet of the
/// content contains the number of unused bits in the last octet and the
/// following octets contain the bits with the first bit in the most
/// significant bit of the octet.
///
/// In the constructed encoding, the bit string is represented as a sequence
/// of bit strings which in turn may either be constructed or primitive
/// encodings. The only limitation in this nesting is that only the last
/// bit string may have a non-zero number of unused bits. A decoded
/// constructed bit string keeps its segments so it can be encoded again in
/// the same way. With DER, only the primitive form is allowed.
#[derive(Clone, Debug)]
pub struct BitString {
    /// The number of unused bits in the last byte.
    unused: u8,

    /// The bytes of the bit string.
    ///
    /// For a constructed bit string, this is the concatenation of all
    /// segments.
    bits: Bytes,

    /// The segments of a constructed bit string.
    segments: Option<Vec<Node>>,
}

impl BitString {
    /// Creates a new bit string.
    ///
    /// Fails if `unused` is larger than 7 or if there are unused bits but
    /// no octets.
    pub fn new(unused: u8, bits: Bytes) -> Result<Self, Error> {
        if unused > 7 {
            return Err(Error::format(format!(
                "unused bit count {} in BIT STRING", unused
            )))
        }
        if unused > 0 && bits.is_empty() {
            return Err(Error::format("unused bits in empty BIT STRING"))
        }
        Ok(BitString { unused, bits, segments: None })
    }

    /// Creates a new bit string that uses all bits of its octets.
    pub fn from_bytes(bits: Bytes) -> Self {
        BitString { unused: 0, bits, segments: None }
    }

    /// Creates a bit string from the content octets of a primitive value.
    pub fn from_content(content: Bytes) -> Result<Self, Error> {
        let unused = match content.first() {
            Some(unused) => *unused,
            None => return Err(Error::format("empty BIT STRING content")),
        };
        Self::new(unused, content.slice(1..))
    }

    /// Creates a bit string from the segments of a constructed value.
    ///
    /// All segments must be bit strings themselves and only the last one
    /// may have unused bits.
    pub fn from_segments(segments: Vec<Node>) -> Result<Self, Error> {
        let (unused, bits) = Self::concat(&segments)?;
        Ok(Self::from_parts(unused, bits, segments))
    }

    /// Creates a value from already concatenated segments.
    pub(crate) fn from_parts(
        unused: u8, bits: Bytes, segments: Vec<Node>
    ) -> Self {
        BitString { unused, bits, segments: Some(segments) }
    }

    /// Concatenates the segments of a constructed value.
    ///
    /// Returns the number of unused bits and the octets.
    pub(crate) fn concat(segments: &[Node]) -> Result<(u8, Bytes), Error> {
        let mut bits = BytesMut::new();
        let mut unused = 0;
        for (idx, segment) in segments.iter().enumerate() {
            let inner = match segment.value() {
                Value::BitString(inner) => inner,
                _ => {
                    return Err(Error::format(format!(
                        "{} inside constructed BIT STRING",
                        segment.ident()
                    )))
                }
            };
            if inner.unused != 0 && idx + 1 != segments.len() {
                return Err(Error::format(
                    "unused bits in inner segment of BIT STRING"
                ))
            }
            bits.extend_from_slice(&inner.bits);
            unused = inner.unused;
        }
        Ok((unused, bits.freeze()))
    }

    /// Returns the value of the given bit.
    ///
    /// Bits beyond the end of the string are `false`.
    pub fn bit(&self, bit: usize) -> bool {
        if bit >= self.bit_len() {
            return false
        }
        let shift = 7 - (bit & 7);
        self.bits[bit >> 3] & (1 << shift) != 0
    }

    /// Returns the number of bits in the bit string.
    pub fn bit_len(&self) -> usize {
        (self.bits.len() << 3) - usize::from(self.unused)
    }

    /// Returns the number of unused bits in the last octet.
    pub fn unused(&self) -> u8 {
        self.unused
    }

    /// Returns the number of octets in the bit string.
    pub fn octet_len(&self) -> usize {
        self.bits.len()
    }

    /// Returns a slice of the octets in the bit string.
    pub fn octet_slice(&self) -> &[u8] {
        self.bits.as_ref()
    }

    /// Returns a bytes value of the octets of the bit string.
    pub fn octet_bytes(&self) -> Bytes {
        self.bits.clone()
    }

    /// Returns the segments if the bit string was constructed.
    pub fn segments(&self) -> Option<&[Node]> {
        self.segments.as_deref()
    }

    /// Returns the length of the content of a primitive encoding.
    pub(crate) fn primitive_content_len(&self) -> usize {
        self.bits.len() + 1
    }
}


//--- PartialEq and Eq

impl PartialEq for BitString {
    fn eq(&self, other: &Self) -> bool {
        self.unused == other.unused && self.bits == other.bits
    }
}

impl Eq for BitString { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn content() {
        let bits = BitString::from_content(
            Bytes::from_static(b"\x04\xA0\xF0")
        ).unwrap();
        assert_eq!(bits.unused(), 4);
        assert_eq!(bits.bit_len(), 12);
        assert_eq!(bits.octet_slice(), b"\xA0\xF0");
        assert!(bits.bit(0));
        assert!(!bits.bit(1));
        assert!(bits.bit(2));
        assert!(bits.bit(11));
        assert!(!bits.bit(12));
        assert!(!bits.bit(100));

        assert!(BitString::from_content(Bytes::from_static(b"\x00")).is_ok());
        assert!(BitString::from_content(Bytes::new()).is_err());
        assert!(
            BitString::from_content(Bytes::from_static(b"\x08\xFF")).is_err()
        );
        assert!(BitString::from_content(Bytes::from_static(b"\x01")).is_err());
    }

    #[test]
    fn segments() {
        let first = Node::bit_string(BitString::from_bytes(
            Bytes::from_static(b"\x01\x02")
        ));
        let last = Node::bit_string(
            BitString::new(3, Bytes::from_static(b"\xF8")).unwrap()
        );
        let bits = BitString::from_segments(
            vec![first.clone(), last.clone()]
        ).unwrap();
        assert_eq!(bits.octet_slice(), b"\x01\x02\xF8");
        assert_eq!(bits.unused(), 3);
        assert_eq!(bits.segments().map(|s| s.len()), Some(2));

        assert!(BitString::from_segments(vec![last, first]).is_err());
        assert!(
            BitString::from_segments(vec![Node::null()]).is_err()
        );
    }
}
