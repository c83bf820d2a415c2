//! Targets for encoding.
//!
//! This is a private module. The relevant items are re-exported by the
//! parent.

use std::{error, io};
use std::convert::Infallible;
use bytes::BytesMut;


//------------ Target --------------------------------------------------------

/// Something encoded octets can be written to.
///
/// Unlike `io::Write`, each target picks its own error type. In-memory
/// targets use `Infallible` so the result of writing to them can be
/// unwrapped with [`infallible`].
pub trait Target {
    /// The error returned when writing fails.
    type Error: error::Error;

    /// Appends all of `data` to the target.
    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

impl<T: Target> Target for &mut T {
    type Error = T::Error;

    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        (*self).write_all(data)
    }
}

impl Target for Vec<u8> {
    type Error = Infallible;

    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.extend_from_slice(data);
        Ok(())
    }
}

impl Target for BytesMut {
    type Error = Infallible;

    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.extend_from_slice(data);
        Ok(())
    }
}


//------------ IoTarget ------------------------------------------------------

/// A target writing to an `io::Write` value.
pub struct IoTarget<W>(W);

impl<W> IoTarget<W> {
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self(writer)
    }

    /// Returns the wrapped writer.
    pub fn into_writer(self) -> W {
        self.0
    }
}

impl<W: io::Write> Target for IoTarget<W> {
    type Error = io::Error;

    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.0.write_all(data)
    }
}


//------------ infallible ----------------------------------------------------

/// Returns the value of a result whose error can’t happen.
pub fn infallible<T, E: Into<Infallible>>(res: Result<T, E>) -> T {
    match res {
        Ok(some) => some,
        Err(err) => match Into::<Infallible>::into(err) { },
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn targets() {
        let mut vec = Vec::new();
        infallible(vec.write_all(b"ab"));
        infallible((&mut vec).write_all(b"c"));
        assert_eq!(vec, b"abc");

        let mut bytes = BytesMut::new();
        infallible(bytes.write_all(b"ab"));
        assert_eq!(bytes.as_ref(), b"ab");

        let mut io = IoTarget::new(Vec::new());
        io.write_all(b"xyz").unwrap();
        assert_eq!(io.into_writer(), b"xyz");
    }
}
