//! BER encoding for various strings types.
//!
//! This module provides types that match the various string encodings
//! provided by ASN.1 and BER.
//!
//! There are two types of strings for binary data. [`OctetString`]s contain
//! a unrestricted sequence of octets while [`BitString`]s contain a sequence
//! of bits that does not need to be of a length divisible by eight. Both
//! can use primitive or constructed encoding.
//!
//! In addition, there are a number of so-called restricted character strings
//! that each contain a sequence of characters according to a pre-defined
//! character set. All of them are represented by [`CharString`] with a
//! [`StringKind`] telling them apart. The kinds differ in how characters
//! are encoded:
//!
//! * UTF8String as well as the TIME, DATE, and DATE-TIME types use UTF-8,
//! * BMPString uses UTF-16 in big-endian byte order,
//! * UniversalString uses UTF-32 in big-endian byte order,
//! * all other kinds are treated as one octet per character.

//--- Re-exports

pub use self::bit::BitString;
pub use self::octet::OctetString;
pub use self::restricted::{CharString, StringKind};

pub(crate) use self::restricted::latin1;

//--- Private modules

mod bit;
mod octet;
mod restricted;
