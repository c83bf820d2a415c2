//! Object Identifiers.
//!
//! This module contains the [`Oid`] type that implements object identifiers,
//! a construct used by ASN.1 to uniquely identify all sorts of things. The
//! type can be converted to and from the familiar dotted notation.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.

use std::{fmt, hash};
use std::str::FromStr;
use bytes::Bytes;
use crate::error::{Error, Pos};


//------------ Oid -----------------------------------------------------------

/// An object identifier.
///
/// Object identifiers are globally unique, hierarchical values that are used
/// to identify objects or their type. When written, they are presented as a
/// sequence of integers separated by dots such as ‘1.3.6.1.5.5.7.1’ or with
/// the integers separated by white space and enclosed in curly braces such
/// as ‘{ 1 3 6 1 5 5 7 1 }’. Individual integers or sequences of integers
/// can also be given names which then are used instead of the integers.
///
/// Values of this type keep a single object identifier in its BER encoding
/// as a `Bytes` value. They can be compared to each other, printed in
/// dotted notation, and parsed from it. The [`Display`] implementation
/// prints components too large for a `u64` as the hex digits of their
/// seven bit groups in curly braces.
///
/// # BER Encoding
///
/// The content octets are a sequence of sub-identifiers. Each of them is
/// an unsigned integer in base 128 with the most significant bit of every
/// octet but the last one set. The first sub-identifier combines the first
/// two components as `40 * first + second`.
///
/// [`Display`]: std::fmt::Display
#[derive(Clone, Debug)]
pub struct Oid(Bytes);

impl Oid {
    /// Creates an object identifier from its content octets.
    ///
    /// The position `pos` of the content is used in errors. Anomalies are
    /// added to `warnings`.
    pub fn from_content(
        octets: Bytes, pos: Pos, warnings: &mut Vec<String>
    ) -> Result<Self, Error> {
        match octets.last() {
            None => return Err(Error::format("empty OBJECT IDENTIFIER")),
            Some(last) if last & 0x80 != 0 => {
                return Err(Error::TruncatedInput(
                    (pos.offset() + octets.len()).into()
                ))
            }
            _ => { }
        }
        let mut start = true;
        for &octet in octets.iter() {
            if start && octet == 0x80 {
                warnings.push(
                    "needlessly long format of SID encoding".into()
                );
                break
            }
            start = octet & 0x80 == 0;
        }
        Ok(Oid(octets))
    }

    /// Creates an object identifier from its components.
    ///
    /// There must be at least two components. The first must be 0, 1, or
    /// 2 and the second must be less than 40 unless the first is 2.
    pub fn from_components(components: &[u64]) -> Result<Self, Error> {
        let (first, second, tail) = match components {
            [first, second, tail @ ..] => (*first, *second, tail),
            _ => {
                return Err(Error::format(
                    "at least two OID components required"
                ))
            }
        };
        if first > 2 {
            return Err(Error::format(
                "first OID component can only be 0, 1, or 2"
            ))
        }
        if first < 2 && second >= 40 {
            return Err(Error::format(
                "second OID component for 0. and 1. must be less than 40"
            ))
        }
        let head = (first * 40).checked_add(second).ok_or_else(|| {
            Error::format("second OID component too large")
        })?;
        let mut res = Vec::new();
        let mut buf = [0u8; 10];
        res.extend_from_slice(encode_base128(head, &mut buf));
        for &item in tail {
            res.extend_from_slice(encode_base128(item, &mut buf));
        }
        Ok(Oid(res.into()))
    }

    /// Returns an iterator over the components of the identifier.
    pub fn iter(&self) -> Iter {
        Iter::new(self.0.as_ref())
    }

    /// Returns the content octets.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Returns the content octets as a bytes value.
    pub fn as_bytes(&self) -> &Bytes {
        &self.0
    }
}


//--- AsRef

impl AsRef<[u8]> for Oid {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}


//--- PartialEq and Eq

impl PartialEq for Oid {
    fn eq(&self, other: &Oid) -> bool {
        self.0.as_ref() == other.0.as_ref()
    }
}

impl Eq for Oid { }


//--- Hash

impl hash::Hash for Oid {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.0.as_ref().hash(state)
    }
}


//--- FromStr

impl FromStr for Oid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(Error::format("empty OID string"))
        }
        let components = s.split('.').map(|item| {
            u64::from_str(item).map_err(|_| {
                Error::format(format!("invalid OID component '{}'", item))
            })
        }).collect::<Result<Vec<_>, _>>()?;
        Self::from_components(&components)
    }
}


//--- Display

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (idx, component) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str(".")?
            }
            component.fmt(f)?
        }
        Ok(())
    }
}


//------------ Component -----------------------------------------------------

/// A component of an object identifier.
///
/// Although these components are integers, they are encoded in a slightly
/// inconvenient way. Because of this we don’t convert them to native integers
/// but rather keep them as references to the underlying octets.
///
/// This type allows comparison and formatting, which hopefully is all you’ll
/// need. If you insist, the method `to_u64` allows you to try to convert a
/// component to a native integer.
#[derive(Clone, Copy, Debug)]
pub struct Component<'a> {
    /// The position of the component in the object identifer.
    position: Position,

    /// The octets of the subidentifer.
    ///
    /// The most significant bit of each octet indicates whether there are
    /// more octets to follow, the lower seven bits are then shifted
    /// accordingly to make up an unsigned integer in big endian notation.
    slice: &'a [u8],
}

/// The position of the component in the object identifier.
///
/// As the first two components of the object identifer are encoded in the
/// first subidentifier of the encoded value, we have three different cases.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
enum Position {
    /// This is the first component of the identifier.
    ///
    /// This is 0 if the integer value of the subidentifer is 0..39,
    /// 1 for 40..79, and 2 for anything else.
    First,

    /// This is the second component of the identifier.
    ///
    /// This is the integer value of the subidentifer module 40 if the value
    /// is below 80 and otherwise the value minus 80.
    Second,

    /// This is any later component of the identifier.
    ///
    /// This is identical to the integer value of the subidentifier.
    Other,
}

impl<'a> Component<'a> {
    /// Creates a new component.
    fn new(slice: &'a [u8], position: Position) -> Self {
        Component { slice, position }
    }

    /// Attempts to convert the component to `u64`.
    ///
    /// Since the component’s value can be larger than the maximum value of
    /// a `u64`, this may fail in which case the method will return `None`.
    /// The first component always succeeds.
    pub fn to_u64(self) -> Option<u64> {
        let res = self.subidentifier();
        match self.position {
            Position::First => {
                match res {
                    Some(res) if res < 40 => Some(0),
                    Some(res) if res < 80 => Some(1),
                    _ => Some(2),
                }
            }
            Position::Second => {
                let res = res?;
                if res < 80 {
                    Some(res % 40)
                }
                else {
                    Some(res - 80)
                }
            }
            Position::Other => res
        }
    }

    /// Returns the value of the whole subidentifier if it fits.
    fn subidentifier(self) -> Option<u64> {
        self.slice.iter().try_fold(0u64, |res, &ch| {
            res.checked_mul(0x80)?.checked_add(u64::from(ch & 0x7F))
        })
    }
}


//--- PartialEq and Eq

impl PartialEq for Component<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position && self.slice == other.slice
    }
}

impl Eq for Component<'_> { }


//--- Display

impl fmt::Display for Component<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(value) = self.to_u64() {
            return value.fmt(f)
        }
        f.write_str("{")?;
        for &ch in self.slice {
            write!(f, "{:02X}", ch & 0x7F)?;
        }
        if self.position == Position::Second {
            f.write_str(" - 80")?;
        }
        f.write_str("}")
    }
}


//------------ Iter ----------------------------------------------------------

/// An iterator over the components in an object identifier.
pub struct Iter<'a> {
    /// The remainder of the object identifier’s encoded octets.
    slice: &'a [u8],

    /// The position of the next component.
    position: Position,
}

impl<'a> Iter<'a> {
    /// Creates a new iterator.
    fn new(slice: &'a [u8]) -> Self {
        Iter {
            slice,
            position: Position::First
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = Component<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.slice.is_empty() {
            return None
        }
        let len = self.slice.iter().position(|ch| ch & 0x80 == 0).map_or(
            self.slice.len(), |idx| idx + 1
        );
        let (head, tail) = self.slice.split_at(len);
        let position = self.position;
        self.position = match position {
            // The first two components share the first subidentifier.
            Position::First => Position::Second,
            _ => {
                self.slice = tail;
                Position::Other
            }
        };
        Some(Component::new(head, position))
    }
}


//------------ Base 128 helpers ----------------------------------------------

/// Returns the number of octets needed to encode a value in base 128.
pub(crate) fn base128_len(value: u64) -> usize {
    let bits = u64::BITS - value.leading_zeros();
    (bits.max(1) as usize).div_ceil(7)
}

/// Encodes a value in base 128 into the end of `buf`.
///
/// Returns the slice of `buf` containing the encoded value.
pub(crate) fn encode_base128(value: u64, buf: &mut [u8; 10]) -> &[u8] {
    let len = base128_len(value);
    let start = buf.len() - len;
    let mut value = value;
    for (idx, octet) in buf[start..].iter_mut().enumerate().rev() {
        *octet = (value & 0x7F) as u8;
        if idx + 1 < len {
            *octet |= 0x80
        }
        value >>= 7;
    }
    &buf[start..]
}


//============ Tests =========================================================
