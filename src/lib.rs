//! Generic trees of BER and DER encoded data.
//!
//! This crate decodes data encoded according to the Basic Encoding Rules
//! (BER) or Distinguished Encoding Rules (DER) of ASN.1 into a tree of
//! [`Node`]s without needing to know the ASN.1 module describing the data.
//! Every node keeps its identifier and length octets as well as its
//! decoded [`Value`], so a tree can be inspected, modified, and encoded
//! again. Nodes can also be created from scratch and encoded either as BER
//! or as DER as selected by a [`Mode`].
//!
//! Decoding is forgiving. Anomalies that don’t stop the decoder from making
//! sense of the data are kept as warnings on the affected node. If decoding
//! fails, the returned [`DecodeError`] carries the part of the tree decoded
//! up to the failure.
//!
//! ```
//! use bertree::{Mode, Node};
//!
//! let node = bertree::decode(b"\x30\x80\x02\x01\x05\x05\x00\x00\x00")
//!     .unwrap();
//! assert_eq!(node.children(), [Node::integer(5), Node::null()]);
//! assert_eq!(
//!     node.encode(Mode::Der), b"\x30\x05\x02\x01\x05\x05\x00"
//! );
//! ```
//!
//! Decoded trees can be checked against a [`Schema`] which describes the
//! expected structure. The [`schema`] module explains how.

pub use self::decode::{Decoder, decode, decode_with};
pub use self::encode::{encode, encoded_len};
pub use self::error::{DecodeError, Error, Pos};
pub use self::ident::{Class, Ident, TagNumber};
pub use self::int::Integer;
pub use self::length::LengthBlock;
pub use self::mode::{DecodeOptions, Mode};
pub use self::node::Node;
pub use self::oid::Oid;
pub use self::region::Region;
pub use self::schema::{
    Binding, Bindings, Mismatch, Schema, SchemaKind, Verification, verify,
    verify_node, verify_with,
};
pub use self::string::{BitString, CharString, OctetString, StringKind};
pub use self::time::{GeneralizedTime, Timestamp, UtcTime};
pub use self::value::Value;

pub mod debug;
pub mod decode;
pub mod encode;
pub mod oid;
pub mod schema;
pub mod string;
pub mod tag;

mod error;
mod ident;
mod int;
mod length;
mod mode;
mod node;
mod region;
mod time;
mod value;
