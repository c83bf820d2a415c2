//! The identifier octets of a BER encoded value.
//!
//! This is a private module. The relevant items are re-exported by the
//! parent.

use std::fmt;
use serde::Serialize;
use smallvec::SmallVec;
use crate::encode::Target;
use crate::error::{Error, Pos};
use crate::oid::{base128_len, encode_base128};
use crate::region::Region;
use crate::tag;


//------------ Class ---------------------------------------------------------

/// The class of a tag.
///
/// Tag numbers are only unique within their class. The universal class is
/// used by the types defined by ASN.1 itself, the other three are available
/// to specifications using ASN.1.
#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize
)]
pub enum Class {
    /// The universal class, used for the built-in types.
    Universal,

    /// The application class.
    Application,

    /// The context-specific class.
    Context,

    /// The private class.
    Private,
}

impl Class {
    /// Returns the class encoded in the top two bits of the first octet.
    const fn from_u8(octet: u8) -> Self {
        match octet & 0xC0 {
            0x00 => Class::Universal,
            0x40 => Class::Application,
            0x80 => Class::Context,
            _ => Class::Private,
        }
    }

    /// Returns the bits for the class in the first octet.
    const fn into_u8(self) -> u8 {
        match self {
            Class::Universal => 0x00,
            Class::Application => 0x40,
            Class::Context => 0x80,
            Class::Private => 0xC0,
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            Class::Universal => "UNIVERSAL",
            Class::Application => "APPLICATION",
            Class::Context => "CONTEXT-SPECIFIC",
            Class::Private => "PRIVATE",
        })
    }
}


//------------ TagNumber -----------------------------------------------------

/// The number of a tag within its class.
///
/// Tag numbers are unbounded in BER. Numbers that need more than
/// [`TagNumber::MAX_OCTETS`] subsequent octets are kept as these octets
/// only.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum TagNumber {
    /// A tag number that fits into a native integer.
    Number(u64),

    /// The subsequent identifier octets of a tag number too large for us.
    ///
    /// The octets are kept exactly as encoded, including the continuation
    /// bit in all but the last octet.
    HexOnly(SmallVec<[u8; 16]>),
}

impl TagNumber {
    /// The maximum number of subsequent octets decoded into a number.
    ///
    /// Nine octets carry 63 bits which always fit into a `u64`.
    pub const MAX_OCTETS: usize = 9;

    /// Returns the tag number as an integer if it is one.
    pub fn to_u64(&self) -> Option<u64> {
        match *self {
            TagNumber::Number(number) => Some(number),
            TagNumber::HexOnly(_) => None,
        }
    }

    /// Returns whether the number is only available as raw octets.
    pub fn is_hex_only(&self) -> bool {
        matches!(*self, TagNumber::HexOnly(_))
    }

    /// Returns the number of octets following the first identifier octet.
    fn subsequent_len(&self) -> usize {
        match *self {
            TagNumber::Number(number) if number < 0x1F => 0,
            TagNumber::Number(number) => base128_len(number),
            TagNumber::HexOnly(ref octets) => octets.len(),
        }
    }
}

impl fmt::Display for TagNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            TagNumber::Number(number) => number.fmt(f),
            TagNumber::HexOnly(ref octets) => {
                f.write_str("{")?;
                for octet in octets {
                    write!(f, "{:02X}", octet)?;
                }
                f.write_str("}")
            }
        }
    }
}


//------------ Ident ---------------------------------------------------------

/// The identifier octets of an encoded value.
///
/// The identifier octets contain the tag of a value, made up of its class
/// and number, and whether the value uses primitive or constructed encoding.
///
/// # BER Encoding
///
/// The top two bits of the first octet contain the class and the next bit
/// is set if the value is constructed. If the tag number is less than 31,
/// it is kept in the remaining five bits. Otherwise those five bits are all
/// set and the number follows in base 128 in as many octets as necessary.
/// All these subsequent octets except for the last one have their most
/// significant bit set.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Ident {
    /// The class of the tag.
    class: Class,

    /// Whether the value is constructed.
    constructed: bool,

    /// The tag number.
    number: TagNumber,
}

impl Ident {
    /// Creates identifier octets from their components.
    pub fn new(class: Class, constructed: bool, number: u64) -> Self {
        Ident { class, constructed, number: TagNumber::Number(number) }
    }

    /// Creates identifier octets for a universal tag.
    pub fn universal(number: u64, constructed: bool) -> Self {
        Self::new(Class::Universal, constructed, number)
    }

    /// Creates identifier octets for a context-specific tag.
    pub fn context(number: u64, constructed: bool) -> Self {
        Self::new(Class::Context, constructed, number)
    }

    /// Creates identifier octets from the raw octets of a tag number.
    ///
    /// The octets must be encoded as they appear after the first
    /// identifier octet. That is, all but the last octet need to have
    /// their most significant bit set.
    pub fn hex_only(
        class: Class, constructed: bool, octets: &[u8]
    ) -> Result<Self, Error> {
        match octets.split_last() {
            Some((last, head))
                if last & 0x80 == 0 && head.iter().all(|x| x & 0x80 != 0)
            => {
                Ok(Ident {
                    class, constructed,
                    number: TagNumber::HexOnly(octets.into())
                })
            }
            _ => Err(Error::Param("malformed tag number octets")),
        }
    }

    /// Returns the class of the tag.
    pub fn class(&self) -> Class {
        self.class
    }

    /// Returns whether the value is constructed.
    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    /// Returns the tag number.
    pub fn number(&self) -> &TagNumber {
        &self.number
    }

    /// Returns the tag number if this is a universal tag.
    pub fn universal_number(&self) -> Option<u64> {
        match self.class {
            Class::Universal => self.number.to_u64(),
            _ => None,
        }
    }

    /// Returns whether this is the given universal tag.
    pub fn is_universal(&self, number: u64) -> bool {
        self.universal_number() == Some(number)
    }

    /// Returns identifier octets with the same tag and the given encoding.
    pub fn with_constructed(mut self, constructed: bool) -> Self {
        self.constructed = constructed;
        self
    }

    /// Takes the identifier octets from the beginning of a region.
    ///
    /// Anomalies that don’t prevent decoding are added to `warnings`.
    pub fn take_from(
        source: &mut Region, warnings: &mut Vec<String>
    ) -> Result<Self, Error> {
        let start = source.pos();
        let first = source.take_u8()?;
        let class = Class::from_u8(first);
        let constructed = first & 0x20 != 0;

        let number = if first & 0x1F != 0x1F {
            TagNumber::Number(u64::from(first & 0x1F))
        }
        else {
            let mut octets = SmallVec::<[u8; 16]>::new();
            loop {
                let octet = source.take_u8()?;
                octets.push(octet);
                if octet & 0x80 == 0 {
                    break
                }
            }
            if octets.len() > TagNumber::MAX_OCTETS {
                warnings.push(
                    "tag too long, represented as hex-coded".into()
                );
                TagNumber::HexOnly(octets)
            }
            else {
                let number = octets.iter().fold(0u64, |res, octet| {
                    res << 7 | u64::from(octet & 0x7F)
                });
                if octets[0] == 0x80 || number < 0x1F {
                    warnings.push("needlessly long encoded tag number".into());
                }
                TagNumber::Number(number)
            }
        };

        if let (Class::Universal, true, Some(number))
            = (class, constructed, number.to_u64())
        {
            if tag::is_primitive_only(number) {
                return Err(Error::ConstructedPrimitiveMismatch(
                    start, "constructed encoding used for primitive type"
                ))
            }
        }
        Ok(Ident { class, constructed, number })
    }

    /// Decodes identifier octets from `len` octets of `data` at `offset`.
    ///
    /// Returns the identifier octets and the offset of the first octet
    /// after them.
    pub fn decode(
        data: &[u8], offset: usize, len: usize
    ) -> Result<(Self, usize), Error> {
        let mut source = Region::copy_from_slice(data, offset, len)?;
        let res = Self::take_from(&mut source, &mut Vec::new())?;
        Ok((res, source.pos().offset()))
    }

    /// Returns the length of the encoded identifier octets.
    pub fn encoded_len(&self) -> usize {
        1 + self.number.subsequent_len()
    }

    /// Writes the encoded identifier octets to a target.
    pub fn write_encoded<T: Target>(
        &self, target: &mut T
    ) -> Result<(), T::Error> {
        self.write_as(self.constructed, target)
    }

    /// Writes the identifier octets with the given encoding to a target.
    pub(crate) fn write_as<T: Target>(
        &self, constructed: bool, target: &mut T
    ) -> Result<(), T::Error> {
        let mut first = self.class.into_u8();
        if constructed {
            first |= 0x20
        }
        match self.number {
            TagNumber::Number(number) if number < 0x1F => {
                target.write_all(&[first | number as u8])
            }
            TagNumber::Number(number) => {
                target.write_all(&[first | 0x1F])?;
                let mut buf = [0u8; 10];
                target.write_all(encode_base128(number, &mut buf))
            }
            TagNumber::HexOnly(ref octets) => {
                target.write_all(&[first | 0x1F])?;
                target.write_all(octets)
            }
        }
    }

    /// Returns the position-independent error for a reserved tag, if any.
    ///
    /// UNIVERSAL 15 and all universal tags from 37 onwards are reserved.
    /// The end-of-contents tag must be primitive.
    pub(crate) fn check_reserved(&self, pos: Pos) -> Result<(), Error> {
        match self.universal_number() {
            Some(tag::RESERVED) => {
                Err(Error::ReservedTag(pos, "UNIVERSAL 15 is reserved"))
            }
            Some(number) if number >= tag::FIRST_UNASSIGNED => {
                Err(Error::ReservedTag(pos, "UNIVERSAL tag number reserved"))
            }
            Some(tag::END_OF_CONTENTS) if self.constructed => {
                Err(Error::ReservedTag(
                    pos, "constructed end-of-contents marker"
                ))
            }
            _ => Ok(())
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(name) = self.universal_number().and_then(tag::name) {
            return f.write_str(name)
        }
        match self.class {
            Class::Universal => write!(f, "[UNIVERSAL {}]", self.number),
            Class::Application => write!(f, "[APPLICATION {}]", self.number),
            Class::Context => write!(f, "[{}]", self.number),
            Class::Private => write!(f, "[PRIVATE {}]", self.number),
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn take(data: &[u8]) -> (Result<Ident, Error>, Vec<String>) {
        let mut warnings = Vec::new();
        let mut source = Region::from_bytes(
            bytes::Bytes::copy_from_slice(data)
        ).unwrap();
        (Ident::take_from(&mut source, &mut warnings), warnings)
    }

    fn encode(ident: &Ident) -> Vec<u8> {
        let mut res = Vec::new();
        crate::encode::infallible(ident.write_encoded(&mut res));
        assert_eq!(res.len(), ident.encoded_len());
        res
    }

    #[test]
    fn single_octet() {
        let (ident, warnings) = take(b"\x30");
        let ident = ident.unwrap();
        assert!(warnings.is_empty());
        assert_eq!(ident.class(), Class::Universal);
        assert!(ident.is_constructed());
        assert_eq!(ident.number(), &TagNumber::Number(16));
        assert_eq!(encode(&ident), b"\x30");

        let ident = take(b"\xA3").0.unwrap();
        assert_eq!(ident.class(), Class::Context);
        assert_eq!(ident, Ident::context(3, true));
        assert_eq!(take(b"\x5E").0.unwrap().class(), Class::Application);
        assert_eq!(take(b"\xDE").0.unwrap().class(), Class::Private);
    }

    #[test]
    fn multi_octet() {
        let (ident, warnings) = take(b"\x1F\x1F");
        assert_eq!(ident.unwrap().number(), &TagNumber::Number(31));
        assert!(warnings.is_empty());

        let ident = take(b"\x9F\x81\x00").0.unwrap();
        assert_eq!(ident, Ident::context(128, false));
        assert_eq!(encode(&ident), b"\x9F\x81\x00");

        assert_eq!(
            encode(&Ident::new(Class::Private, true, 0x3FFF)),
            b"\xFF\xFF\x7F"
        );
    }

    #[test]
    fn redundant_encodings() {
        let (ident, warnings) = take(b"\x1F\x80\x21");
        assert_eq!(ident.unwrap().number(), &TagNumber::Number(33));
        assert_eq!(warnings.len(), 1);

        let (ident, warnings) = take(b"\x1F\x05");
        assert_eq!(ident.unwrap().number(), &TagNumber::Number(5));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn hex_only() {
        let data = b"\x9F\x81\x82\x83\x84\x85\x86\x87\x88\x89\x0A";
        let (ident, warnings) = take(data);
        let ident = ident.unwrap();
        assert!(ident.number().is_hex_only());
        assert_eq!(warnings, ["tag too long, represented as hex-coded"]);
        assert_eq!(encode(&ident), data);
        assert_eq!(ident.to_string(), "[{8182838485868788890A}]");
        assert_eq!(
            ident,
            Ident::hex_only(
                Class::Context, false, &data[1..]
            ).unwrap()
        );
        assert!(Ident::hex_only(Class::Context, false, b"\x81").is_err());
        assert!(Ident::hex_only(Class::Context, false, b"").is_err());
    }

    #[test]
    fn truncated() {
        assert_eq!(take(b"\x1F").0, Err(Error::TruncatedInput(1.into())));
        assert_eq!(
            take(b"\x1F\x81\x82").0, Err(Error::TruncatedInput(3.into()))
        );
    }

    #[test]
    fn constructed_primitive_types() {
        for octet in [0x21, 0x22, 0x25, 0x26, 0x29, 0x2E, 0x37, 0x38] {
            assert!(matches!(
                take(&[octet]).0,
                Err(Error::ConstructedPrimitiveMismatch(..))
            ));
        }
        assert!(take(b"\x23").0.is_ok());
        assert!(take(b"\x24").0.is_ok());
        assert!(take(b"\x81").0.is_ok());
        assert!(take(b"\xA1").0.is_ok());
    }

    #[test]
    fn reserved() {
        let pos = Pos::from(0);
        assert!(Ident::universal(15, false).check_reserved(pos).is_err());
        assert!(Ident::universal(37, false).check_reserved(pos).is_err());
        assert!(Ident::universal(0, true).check_reserved(pos).is_err());
        assert!(Ident::universal(36, false).check_reserved(pos).is_ok());
        assert!(Ident::context(37, false).check_reserved(pos).is_ok());
    }

    #[test]
    fn decode_with_offset() {
        let (ident, next) = Ident::decode(b"\x00\x00\x02\x01", 2, 2).unwrap();
        assert_eq!(ident, Ident::universal(2, false));
        assert_eq!(next, 3);
        assert!(Ident::decode(b"\x02", 1, 1).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Ident::universal(16, true).to_string(), "SEQUENCE");
        assert_eq!(Ident::context(0, true).to_string(), "[0]");
        assert_eq!(
            Ident::new(Class::Application, false, 2).to_string(),
            "[APPLICATION 2]"
        );
    }
}
