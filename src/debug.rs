//! Structured views of nodes for debugging.
//!
//! The types in this module render a node and its parts as plain values
//! that can be serialized with any serde serializer, for instance to dump
//! a decoded tree as JSON while looking for a problem. Octets are given as
//! upper case hex strings.
//!
//! The structure of these types is meant for humans. It may change at any
//! time.

use std::fmt::Write;
use serde::Serialize;
use crate::encode::infallible;
use crate::ident::{Class, Ident};
use crate::length::LengthBlock;
use crate::mode::Mode;
use crate::node::Node;


//------------ NodeDebug -----------------------------------------------------

/// A structured view of a node.
#[derive(Clone, Debug, Serialize)]
pub struct NodeDebug {
    /// The name of the type, e.g., `"SEQUENCE"` or `"[0]"`.
    pub block_name: String,

    /// The identifier octets.
    pub ident: IdentDebug,

    /// The length octets.
    pub length: LengthDebug,

    /// The name of a template node.
    pub name: Option<String>,

    /// Whether a template node is optional.
    pub optional: bool,

    /// The error that stopped decoding the node.
    pub error: Option<String>,

    /// The anomalies found while decoding.
    pub warnings: Vec<String>,

    /// The length of the complete encoded node.
    pub block_len: usize,

    /// The content octets of a primitive node.
    pub value_hex: String,

    /// A textual rendering of the value if there is one.
    pub text: Option<String>,

    /// The children of a constructed node.
    pub children: Vec<NodeDebug>,
}

impl Node {
    /// Returns a structured view of the node for debugging.
    pub fn to_debug_object(&self) -> NodeDebug {
        let value_hex = if self.value().is_constructed() {
            String::new()
        }
        else {
            let mut content = Vec::new();
            infallible(self.value().write_content(Mode::Ber, &mut content));
            hex(&content)
        };
        NodeDebug {
            block_name: self.ident().to_string(),
            ident: self.ident().to_debug_object(),
            length: self.length().to_debug_object(),
            name: self.name().map(Into::into),
            optional: self.is_optional(),
            error: self.error().map(ToString::to_string),
            warnings: self.warnings().into(),
            block_len: self.block_len(),
            value_hex,
            text: self.value().to_text(),
            children: self.children().iter().map(Node::to_debug_object)
                .collect(),
        }
    }
}


//------------ IdentDebug ----------------------------------------------------

/// A structured view of identifier octets.
#[derive(Clone, Debug, Serialize)]
pub struct IdentDebug {
    /// The tag class.
    pub class: Class,

    /// The tag number in decimal or, if hex-only, as hex octets.
    pub number: String,

    /// Whether the constructed bit is set.
    pub constructed: bool,

    /// Whether the tag number is too large to be decoded.
    pub hex_only: bool,

    /// The encoded identifier octets.
    pub value_hex: String,
}

impl Ident {
    /// Returns a structured view of the identifier octets for debugging.
    pub fn to_debug_object(&self) -> IdentDebug {
        let mut octets = Vec::new();
        infallible(self.write_encoded(&mut octets));
        IdentDebug {
            class: self.class(),
            number: self.number().to_string(),
            constructed: self.is_constructed(),
            hex_only: self.number().is_hex_only(),
            value_hex: hex(&octets),
        }
    }
}


//------------ LengthDebug ---------------------------------------------------

/// A structured view of length octets.
#[derive(Clone, Debug, Serialize)]
pub struct LengthDebug {
    /// The definite length or `None` if indefinite.
    pub length: Option<usize>,

    /// Whether the indefinite form was used.
    pub indefinite: bool,

    /// Whether the long definite form was used.
    pub long_form: bool,

    /// The number of length octets.
    pub block_len: usize,

    /// The length octets in the form they were decoded from.
    pub value_hex: String,
}

impl LengthBlock {
    /// Returns a structured view of the length octets for debugging.
    pub fn to_debug_object(&self) -> LengthDebug {
        LengthDebug {
            length: self.to_definite(),
            indefinite: self.is_indefinite(),
            long_form: self.is_long_form(),
            block_len: self.block_len(),
            value_hex: hex(&length_octets(self)),
        }
    }
}

/// Returns the length octets including any padding of the long form.
fn length_octets(length: &LengthBlock) -> Vec<u8> {
    match length.to_definite() {
        None => vec![0x80],
        Some(len) if !length.is_long_form() => {
            vec![len as u8]
        }
        Some(len) => {
            let count = length.block_len().saturating_sub(1);
            let mut res = Vec::with_capacity(count + 1);
            res.push(0x80 | count as u8);
            res.extend((0..count).rev().map(|i| {
                if i < 8 { (len as u64 >> (i * 8)) as u8 } else { 0 }
            }));
            res
        }
    }
}


//------------ hex -----------------------------------------------------------

/// Returns octets as an upper case hex string.
pub fn hex(octets: &[u8]) -> String {
    let mut res = String::with_capacity(octets.len() * 2);
    for octet in octets {
        // Writing to a string never fails.
        let _ = write!(res, "{:02X}", octet);
    }
    res
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::decode::decode;

    #[test]
    fn node_debug() {
        let node = decode(b"\x30\x81\x06\x02\x01\x80\x9F\x22\x00").unwrap();
        let debug = node.to_debug_object();
        assert_eq!(debug.block_name, "SEQUENCE");
        assert_eq!(debug.ident.value_hex, "30");
        assert_eq!(debug.length.value_hex, "8106");
        assert_eq!(debug.length.length, Some(6));
        assert!(debug.length.long_form);
        assert_eq!(debug.warnings, ["unnecessary usage of long length form"]);
        assert_eq!(debug.block_len, 9);
        assert_eq!(debug.value_hex, "");
        assert_eq!(debug.children.len(), 2);

        let int = &debug.children[0];
        assert_eq!(int.block_name, "INTEGER");
        assert_eq!(int.value_hex, "80");
        assert_eq!(int.text.as_deref(), Some("-128"));

        let generic = &debug.children[1];
        assert_eq!(generic.block_name, "[34]");
        assert_eq!(generic.ident.class, Class::Context);
        assert_eq!(generic.ident.number, "34");
        assert_eq!(generic.ident.value_hex, "9F22");
    }

    #[test]
    fn length_debug() {
        let node = decode(b"\x04\x82\x00\x01\xAA").unwrap();
        let debug = node.length().to_debug_object();
        assert_eq!(debug.value_hex, "820001");
        assert_eq!(debug.block_len, 3);
        assert_eq!(
            LengthBlock::indefinite().to_debug_object().value_hex, "80"
        );
        assert_eq!(LengthBlock::definite(5).to_debug_object().value_hex, "05");
    }

    #[test]
    fn serializable() {
        fn assert_serialize<T: Serialize>(_: &T) { }
        let debug = Node::sequence(vec![Node::null()]).to_debug_object();
        assert_serialize(&debug);
        assert_eq!(debug.children[0].block_name, "NULL");
        assert_eq!(debug.length.value_hex, "02");
    }

    #[test]
    fn hex_octets() {
        assert_eq!(hex(b""), "");
        assert_eq!(hex(b"\x00\xAB\x0f"), "00AB0F");
    }
}
