//! Decoding BER encoded data into a tree of nodes.
//!
//! Decoding is done by a [`Decoder`] which walks the encoded data
//! recursively and produces a [`Node`] for every value it encounters. The
//! decoder accepts anything BER allows, and then some. Anomalies that don’t
//! keep it from making sense of the data are added to the warnings of the
//! node they were found in. Problems that do are reported as a
//! [`DecodeError`] which keeps the tree decoded up to that point.
//!
//! For the common case of decoding a complete buffer with the default
//! options, there are the functions [`decode`] and [`decode_with`].
//!
//! [`Node`]: crate::Node
//! [`DecodeError`]: crate::DecodeError

use bytes::Bytes;
use log::{debug, trace};
use crate::error::{DecodeError, Error, Pos};
use crate::ident::Ident;
use crate::length::LengthBlock;
use crate::mode::DecodeOptions;
use crate::node::Node;
use crate::region::Region;
use crate::value::Value;



//------------ decode and decode_with ----------------------------------------

/// Decodes a node from a slice using the default options.
///
/// The slice must contain exactly one encoded value. Any data following
/// that value is ignored but leaves a warning on the returned node.
pub fn decode(data: &[u8]) -> Result<Node, DecodeError> {
    Decoder::default().decode(data)
}

/// Decodes a node from a slice using the given options.
pub fn decode_with(
    data: &[u8], options: &DecodeOptions
) -> Result<Node, DecodeError> {
    Decoder::new(*options).decode(data)
}


//------------ Decoder -------------------------------------------------------

/// A decoder for encoded data.
#[derive(Clone, Copy, Debug, Default)]
pub struct Decoder {
    /// The options to use.
    options: DecodeOptions,
}

/// Children decoded before an error happened and the error.
type PartialChildren = (Vec<Node>, DecodeError);

impl Decoder {
    /// Creates a decoder using the given options.
    pub fn new(options: DecodeOptions) -> Self {
        Decoder { options }
    }

    /// Returns the options of the decoder.
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decodes a node from a slice.
    ///
    /// The data is copied into a bytes value first so the nodes can keep
    /// their content.
    pub fn decode(&self, data: &[u8]) -> Result<Node, DecodeError> {
        self.decode_bytes(Bytes::copy_from_slice(data))
    }

    /// Decodes a node from a bytes value.
    ///
    /// The nodes keep references to the data rather than copies.
    pub fn decode_bytes(&self, data: Bytes) -> Result<Node, DecodeError> {
        let len = data.len();
        self.decode_region(data, 0, len)
    }

    /// Decodes a node from `len` octets of `data` starting at `offset`.
    ///
    /// Positions reported in errors are relative to the start of `data`.
    pub fn decode_region(
        &self, data: Bytes, offset: usize, len: usize
    ) -> Result<Node, DecodeError> {
        let mut source = Region::new(data, offset, len)?;
        self.decode_root(&mut source, 1)
    }

    /// Decodes the only value of a region.
    ///
    /// The value will be at the given depth.
    pub(crate) fn decode_root(
        &self, source: &mut Region, depth: usize
    ) -> Result<Node, DecodeError> {
        let mut node = self.take_node(source, depth)?;
        if !source.is_empty() {
            let warning = format!(
                "{} octets of trailing data at offset {}",
                source.len(), source.pos()
            );
            debug!("{}", warning);
            node.push_warning(warning);
        }
        Ok(node)
    }

    /// Takes a single node from the beginning of a region.
    fn take_node(
        &self, source: &mut Region, depth: usize
    ) -> Result<Node, DecodeError> {
        let start = source.pos();
        if depth > self.options.max_depth() {
            debug!("nesting too deep at offset {}", start);
            return Err(Error::TooDeep(self.options.max_depth()).into())
        }
        let mut warnings = Vec::new();
        let ident = Ident::take_from(source, &mut warnings)?;
        let length = LengthBlock::take_from(source, &mut warnings)?;
        ident.check_reserved(start)?;
        trace!(
            "decoding {} at offset {} with length {:?}",
            ident, start, length.to_definite()
        );

        let res = if ident.is_constructed() {
            match self.take_children(source, &length, depth, &mut warnings) {
                Ok(children) => Value::from_constructed(&ident, children),
                Err((mut children, mut err)) => {
                    if let Some(child) = err.take_partial() {
                        children.push(child)
                    }
                    let value = Value::partial(&ident, children);
                    return Err(Self::fail(
                        source, start, ident, length, value, warnings, err
                    ))
                }
            }
        }
        else {
            let len = match length.to_definite() {
                Some(len) => len,
                None => {
                    return Err(Error::ConstructedPrimitiveMismatch(
                        start, "indefinite length used for primitive value"
                    ).into())
                }
            };
            let pos = source.pos();
            let content = source.take_bytes(len)?;
            Value::from_primitive(&ident, content, pos, &mut warnings)
        };

        let (value, error) = match res {
            Ok(some) => some,
            Err((value, err)) => {
                return Err(Self::fail(
                    source, start, ident, length, value, warnings, err.into()
                ))
            }
        };
        if !warnings.is_empty() {
            debug!(
                "{} at offset {}: {}", ident, start, warnings.join("; ")
            );
        }
        if let Some(ref err) = error {
            debug!("{} at offset {}: {}", ident, start, err);
        }
        Ok(Node::decoded(
            ident, length, value, error, warnings,
            source.captured_since(start)
        ))
    }

    /// Takes the children of a constructed value.
    ///
    /// If this fails, returns the children decoded so far and the error.
    fn take_children(
        &self,
        source: &mut Region,
        length: &LengthBlock,
        depth: usize,
        warnings: &mut Vec<String>,
    ) -> Result<Vec<Node>, PartialChildren> {
        let mut children = Vec::new();
        match length.to_definite() {
            Some(len) => {
                let mut content = match source.split_to(len) {
                    Ok(content) => content,
                    Err(err) => return Err((children, err.into())),
                };
                while !content.is_empty() {
                    let pos = content.pos();
                    match self.take_node(&mut content, depth + 1) {
                        Ok(child) if child.is_end_of_contents() => {
                            return Err((
                                children,
                                Error::format(format!(
                                    "end-of-contents marker in definite \
                                     length value at offset {}", pos
                                )).into()
                            ))
                        }
                        Ok(child) => children.push(child),
                        Err(err) => return Err((children, err)),
                    }
                }
            }
            None => {
                loop {
                    if source.is_empty() {
                        warnings.push("no EOC block encoded".into());
                        break
                    }
                    match self.take_node(source, depth + 1) {
                        Ok(child) if child.is_end_of_contents() => break,
                        Ok(child) => children.push(child),
                        Err(err) => return Err((children, err)),
                    }
                }
            }
        }
        Ok(children)
    }

    /// Produces the error for a failed node including the partial node.
    fn fail(
        source: &Region,
        start: Pos,
        ident: Ident,
        length: LengthBlock,
        value: Value,
        warnings: Vec<String>,
        err: DecodeError,
    ) -> DecodeError {
        debug!("{} at offset {}: {}", ident, start, err);
        let node = Node::decoded(
            ident, length, value, Some(err.error().clone()), warnings,
            source.captured_since(start)
        );
        err.with_partial(node)
    }
}
