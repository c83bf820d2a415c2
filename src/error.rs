//! Error handling.
//!
//! This is a private module. Its public content is re-exported by the
//! parent module.

use std::fmt;
use thiserror::Error;
use crate::node::Node;


//------------ Pos -----------------------------------------------------------

/// The position of an octet within the data being decoded.
///
/// Positions are always counted from the start of the buffer handed to the
/// decoder, even if decoding started at a later offset.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Pos(usize);

impl Pos {
    /// Returns the offset of the position.
    pub fn offset(self) -> usize {
        self.0
    }
}

impl From<usize> for Pos {
    fn from(pos: usize) -> Pos {
        Pos(pos)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}


//------------ Error ---------------------------------------------------------

/// An error happened while decoding data or verifying it against a schema.
///
/// Anomalies that don’t prevent decoding, such as redundant length octets,
/// are not errors. They are collected as warnings of the node they were
/// found in instead.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// The buffer, offset, and length provided don’t describe valid data.
    #[error("invalid parameter: {0}")]
    Param(&'static str),

    /// The data ended before the value was complete.
    #[error("unexpected end of data at offset {0}")]
    TruncatedInput(Pos),

    /// A reserved tag was used.
    #[error("{1} at offset {0}")]
    ReservedTag(Pos, &'static str),

    /// Constructed and primitive encoding were confused.
    #[error("{1} at offset {0}")]
    ConstructedPrimitiveMismatch(Pos, &'static str),

    /// A length was encoded in more octets than we can handle.
    #[error("excessive length at offset {0}")]
    TooBigInteger(Pos),

    /// The content of a value is malformed.
    #[error("malformed value: {0}")]
    Format(String),

    /// A value didn’t match the schema it was verified against.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Values were nested deeper than allowed.
    #[error("nesting exceeds the limit of {0} levels")]
    TooDeep(usize),
}

impl Error {
    /// Creates a format error from something displayable.
    pub(crate) fn format(msg: impl fmt::Display) -> Self {
        Error::Format(msg.to_string())
    }

    /// Creates a schema mismatch from something displayable.
    pub(crate) fn mismatch(msg: impl fmt::Display) -> Self {
        Error::SchemaMismatch(msg.to_string())
    }
}


//------------ DecodeError ---------------------------------------------------

/// Decoding failed.
///
/// In addition to the error itself, the type keeps whatever could be
/// decoded before the error happened. This partial tree contains the values
/// enclosing the failed value with all their siblings decoded up to that
/// point. Each of the enclosing nodes has its error set.
#[derive(Clone, Debug, Error)]
#[error("{error}")]
pub struct DecodeError {
    /// The error that stopped decoding.
    error: Error,

    /// The partially decoded tree, if anything could be decoded at all.
    partial: Option<Box<Node>>,
}

impl DecodeError {
    /// Creates a decode error without a partial tree.
    pub fn new(error: Error) -> Self {
        DecodeError { error, partial: None }
    }

    /// Returns a reference to the error.
    pub fn error(&self) -> &Error {
        &self.error
    }

    /// Returns the partially decoded tree if there is one.
    pub fn partial(&self) -> Option<&Node> {
        self.partial.as_deref()
    }

    /// Converts the value into the error.
    pub fn into_error(self) -> Error {
        self.error
    }

    /// Takes the partial tree out of the error.
    pub(crate) fn take_partial(&mut self) -> Option<Node> {
        self.partial.take().map(|node| *node)
    }

    /// Replaces the partial tree.
    pub(crate) fn with_partial(mut self, node: Node) -> Self {
        self.partial = Some(Box::new(node));
        self
    }
}

impl From<Error> for DecodeError {
    fn from(error: Error) -> Self {
        DecodeError::new(error)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            Error::TruncatedInput(Pos::from(12)).to_string(),
            "unexpected end of data at offset 12"
        );
        assert_eq!(
            Error::ReservedTag(Pos::from(0), "reserved tag").to_string(),
            "reserved tag at offset 0"
        );
        assert_eq!(
            DecodeError::from(Error::TooDeep(4)).to_string(),
            "nesting exceeds the limit of 4 levels"
        );
    }
}
