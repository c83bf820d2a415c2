//! Everything related to the `Values` trait.
//!
//! This is an internal module. The relevant items are re-exported by the
//! parent.

use crate::length::LengthBlock;
use crate::mode::Mode;
use crate::node::Node;
use super::target::{Target, infallible};


//------------ Values --------------------------------------------------------

/// A type that encodes into a sequence of BER encoded values.
///
/// The trait is implemented for [`Node`] as well as for collections of
/// nodes, so the children of a constructed value can be encoded in one go.
/// Encoding happens in two passes: [`encoded_len`][Self::encoded_len]
/// determines the length without producing any output so that length
/// octets can be written before the content.
pub trait Values {
    /// Returns the length of the encoded values for the given mode.
    fn encoded_len(&self, mode: Mode) -> usize;

    /// Encodes the values in the given mode and writes them to `target`.
    fn write_encoded<T: Target>(
        &self, mode: Mode, target: &mut T
    ) -> Result<(), T::Error>;


    //--- Provided methods

    /// Returns the values encoded in the given mode.
    fn to_vec(&self, mode: Mode) -> Vec<u8> {
        let mut target = Vec::with_capacity(self.encoded_len(mode));
        infallible(self.write_encoded(mode, &mut target));
        target
    }
}


//--- Blanket impls

impl<V: Values + ?Sized> Values for &'_ V {
    fn encoded_len(&self, mode: Mode) -> usize {
        (*self).encoded_len(mode)
    }

    fn write_encoded<T: Target>(
        &self, mode: Mode, target: &mut T
    ) -> Result<(), T::Error> {
        (*self).write_encoded(mode, target)
    }
}


//--- Impl for Node

impl Values for Node {
    fn encoded_len(&self, mode: Mode) -> usize {
        let content_len = self.value().content_len(mode);
        if self.uses_indefinite(mode) {
            self.ident().encoded_len()
                + LengthBlock::encoded_len(None)
                + content_len
                + 2
        }
        else {
            self.ident().encoded_len()
                + LengthBlock::encoded_len(Some(content_len))
                + content_len
        }
    }

    fn write_encoded<T: Target>(
        &self, mode: Mode, target: &mut T
    ) -> Result<(), T::Error> {
        let constructed = self.value().encodes_constructed(mode);
        self.ident().write_as(constructed, target)?;
        if self.uses_indefinite(mode) {
            LengthBlock::write_encoded(None, target)?;
            self.value().write_content(mode, target)?;
            target.write_all(&[0, 0])
        }
        else {
            LengthBlock::write_encoded(
                Some(self.value().content_len(mode)), target
            )?;
            self.value().write_content(mode, target)
        }
    }
}


//--- Impl for Option

/// Encoding of an optional value.
///
/// This implementation encodes `None` as nothing, i.e., as an OPTIONAL
/// in ASN.1 parlance.
impl<V: Values> Values for Option<V> {
    fn encoded_len(&self, mode: Mode) -> usize {
        match self {
            Some(v) => v.encoded_len(mode),
            None => 0,
        }
    }

    fn write_encoded<T: Target>(
        &self, mode: Mode, target: &mut T
    ) -> Result<(), T::Error> {
        match self {
            Some(v) => v.write_encoded(mode, target),
            None => Ok(())
        }
    }
}


//--- Impl for slice and Vec

impl<V: Values> Values for [V] {
    fn encoded_len(&self, mode: Mode) -> usize {
        self.iter().map(|v| v.encoded_len(mode)).sum()
    }

    fn write_encoded<T: Target>(
        &self, mode: Mode, target: &mut T
    ) -> Result<(), T::Error> {
        for i in self {
            i.write_encoded(mode, target)?;
        };
        Ok(())
    }
}

impl<V: Values> Values for Vec<V> {
    fn encoded_len(&self, mode: Mode) -> usize {
        self.as_slice().encoded_len(mode)
    }

    fn write_encoded<T: Target>(
        &self, mode: Mode, target: &mut T
    ) -> Result<(), T::Error> {
        self.as_slice().write_encoded(mode, target)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn encoded_len_matches_output() {
        let long = Node::octet_string(vec![0xAAu8; 300]);
        let node = Node::sequence(vec![
            Node::integer(-1),
            Node::sequence(vec![long]).with_indefinite_length(),
            Node::null(),
        ]).with_indefinite_length();
        for mode in [Mode::Ber, Mode::Der] {
            assert_eq!(node.encoded_len(mode), node.to_vec(mode).len());
        }
        assert_eq!(node.encoded_len(Mode::Der), 4 + 3 + 4 + 304 + 2);
        assert_eq!(node.encoded_len(Mode::Ber), 2 + 3 + 2 + 304 + 2 + 2 + 2);
    }

    #[test]
    fn collections() {
        let nodes = vec![Node::null(), Node::boolean(true)];
        assert_eq!(
            Values::to_vec(&nodes, Mode::Der), b"\x05\x00\x01\x01\xFF"
        );
        assert_eq!(Some(Node::null()).to_vec(Mode::Der), b"\x05\x00");
        assert_eq!(None::<Node>.encoded_len(Mode::Der), 0);
    }
}
