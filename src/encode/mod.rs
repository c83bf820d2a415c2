//! Encoding trees in BER and DER.
//!
//! Any [`Node`], whether decoded or built from scratch, can be encoded
//! again. Encoding is done via the [`Values`] trait which is implemented
//! for nodes and collections of nodes. It determines the length of the
//! encoding first so that length octets can be written before the content,
//! then writes everything to a [`Target`].
//!
//! The [`Mode`] decides how the choices BER leaves to the encoder are made.
//! The functions [`encode`] and [`encoded_len`] use DER.
//!
//! [`Node`]: crate::Node
//! [`Mode`]: crate::Mode

pub use self::target::{IoTarget, Target, infallible};
pub use self::values::Values;

use crate::mode::Mode;
use crate::node::Node;

mod target;
mod values;


//------------ encode and encoded_len ----------------------------------------

/// Encodes a node using DER.
pub fn encode(node: &Node) -> Vec<u8> {
    node.to_vec(Mode::Der)
}

/// Returns the length of the DER encoding of a node.
///
/// This doesn’t produce any output.
pub fn encoded_len(node: &Node) -> usize {
    node.encoded_len(Mode::Der)
}
