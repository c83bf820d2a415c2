//! The length octets.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.

use crate::encode::Target;
use crate::error::Error;
use crate::region::Region;


//------------ LengthBlock ---------------------------------------------------

/// The length octets of an encoded value.
///
/// A length value can either be definite, meaning it provides the actual
/// number of content octets in the value, or indefinite, in which case the
/// content is delimited by a special end-of-contents marker.
///
/// # BER Encoding
///
/// The length can be encoded in one of two basic ways. Which one is used is
/// determined by the most significant bit of the first octet. If it is not
/// set, the length octets is one octet long and the remaining bits of this
/// first octet provide the definite length. Thus, if the first octet is
/// less than 128, it provides the definite length already.
///
/// If the most significant bit is set, the remaining bits of the first
/// octet specify the number of octets that follow to encode the actual
/// length. If they specify that there are zero more octets, i.e., the
/// value of the first octet is 128, the length is indefinite. Otherwise,
/// those following octets give the big-endian encoding of the definite
/// length of the content octets. The value 0xFF is reserved.
///
/// BER allows the long form for lengths below 128 and leading zero octets
/// in the long form. We accept both but leave a warning.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct LengthBlock {
    /// The definite length or zero for the indefinite form.
    length: usize,

    /// Whether the indefinite form is used.
    indefinite: bool,

    /// Whether the long form is used.
    long_form: bool,

    /// The number of octets in the encoded length.
    block_len: usize,
}

impl LengthBlock {
    /// The maximum number of octets following the first octet.
    pub const MAX_OCTETS: usize = 8;

    /// Creates a definite length in its shortest encoding.
    pub fn definite(length: usize) -> Self {
        LengthBlock {
            length,
            indefinite: false,
            long_form: length > 0x7F,
            block_len: Self::encoded_len(Some(length)),
        }
    }

    /// Creates an indefinite length.
    pub fn indefinite() -> Self {
        LengthBlock {
            length: 0, indefinite: true, long_form: false, block_len: 1
        }
    }

    /// Returns the length if it is definite.
    pub fn to_definite(&self) -> Option<usize> {
        if self.indefinite {
            None
        }
        else {
            Some(self.length)
        }
    }

    /// Returns whether the length is indefinite.
    pub fn is_indefinite(&self) -> bool {
        self.indefinite
    }

    /// Returns whether the long form was used.
    pub fn is_long_form(&self) -> bool {
        self.long_form
    }

    /// Returns the number of octets the length was encoded in.
    pub fn block_len(&self) -> usize {
        self.block_len
    }

    /// Takes the length octets from the beginning of a region.
    ///
    /// Anomalies that don’t prevent decoding are added to `warnings`.
    pub fn take_from(
        source: &mut Region, warnings: &mut Vec<String>
    ) -> Result<Self, Error> {
        let start = source.pos();
        let first = source.take_u8()?;
        match first {
            0x80 => return Ok(Self::indefinite()),
            0xFF => {
                return Err(Error::format(format!(
                    "length octet 0xFF is reserved at offset {}", start
                )))
            }
            n if n & 0x80 == 0 => {
                return Ok(LengthBlock {
                    length: usize::from(n),
                    indefinite: false,
                    long_form: false,
                    block_len: 1,
                })
            }
            _ => { }
        }

        let count = usize::from(first & 0x7F);
        if count > Self::MAX_OCTETS {
            return Err(Error::TooBigInteger(start))
        }
        let octets = source.take_bytes(count)?;
        if octets[0] == 0 {
            warnings.push("needlessly long encoded length".into());
        }
        let mut length = 0u64;
        for &octet in octets.iter() {
            length = length << 8 | u64::from(octet);
        }
        let length = match usize::try_from(length) {
            Ok(length) => length,
            Err(_) => return Err(Error::TooBigInteger(start)),
        };
        if length <= 0x7F {
            warnings.push("unnecessary usage of long length form".into());
        }
        Ok(LengthBlock {
            length,
            indefinite: false,
            long_form: true,
            block_len: count + 1,
        })
    }

    /// Decodes length octets from `len` octets of `data` at `offset`.
    ///
    /// Returns the length and the offset of the first octet after it.
    pub fn decode(
        data: &[u8], offset: usize, len: usize
    ) -> Result<(Self, usize), Error> {
        let mut source = Region::copy_from_slice(data, offset, len)?;
        let res = Self::take_from(&mut source, &mut Vec::new())?;
        Ok((res, source.pos().offset()))
    }

    /// Returns the length of the shortest encoding of a length.
    ///
    /// A length of `None` is the indefinite form.
    pub fn encoded_len(length: Option<usize>) -> usize {
        match length {
            None => 1,
            Some(length) if length <= 0x7F => 1,
            Some(length) => {
                1 + (usize::BITS - length.leading_zeros()).div_ceil(8)
                    as usize
            }
        }
    }

    /// Writes the shortest encoding of a length to a target.
    ///
    /// A length of `None` is the indefinite form.
    pub fn write_encoded<T: Target>(
        length: Option<usize>, target: &mut T
    ) -> Result<(), T::Error> {
        match length {
            None => target.write_all(&[0x80]),
            Some(length) if length <= 0x7F => {
                target.write_all(&[length as u8])
            }
            Some(length) => {
                let octets = length.to_be_bytes();
                let count = Self::encoded_len(Some(length)) - 1;
                target.write_all(&[0x80 | count as u8])?;
                target.write_all(&octets[octets.len() - count..])
            }
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn take(data: &[u8]) -> (Result<LengthBlock, Error>, Vec<String>) {
        let mut warnings = Vec::new();
        let mut source = Region::from_bytes(
            bytes::Bytes::copy_from_slice(data)
        ).unwrap();
        (LengthBlock::take_from(&mut source, &mut warnings), warnings)
    }

    fn encode(length: Option<usize>) -> Vec<u8> {
        let mut res = Vec::new();
        crate::encode::infallible(
            LengthBlock::write_encoded(length, &mut res)
        );
        assert_eq!(res.len(), LengthBlock::encoded_len(length));
        res
    }

    #[test]
    fn short_form() {
        let (len, warnings) = take(b"\x05");
        let len = len.unwrap();
        assert_eq!(len.to_definite(), Some(5));
        assert!(!len.is_long_form());
        assert_eq!(len.block_len(), 1);
        assert!(warnings.is_empty());
        assert_eq!(take(b"\x7F").0.unwrap().to_definite(), Some(127));
    }

    #[test]
    fn long_form() {
        let (len, warnings) = take(b"\x81\x80");
        let len = len.unwrap();
        assert_eq!(len.to_definite(), Some(128));
        assert!(len.is_long_form());
        assert_eq!(len.block_len(), 2);
        assert!(warnings.is_empty());

        let len = take(b"\x82\x12\x34").0.unwrap();
        assert_eq!(len.to_definite(), Some(0x1234));
        assert_eq!(len.block_len(), 3);
    }

    #[test]
    fn needless_long_form() {
        let (len, warnings) = take(b"\x81\x05");
        assert_eq!(len.unwrap().to_definite(), Some(5));
        assert_eq!(warnings, ["unnecessary usage of long length form"]);

        let (len, warnings) = take(b"\x83\x00\x01\x00");
        assert_eq!(len.unwrap().to_definite(), Some(256));
        assert_eq!(warnings, ["needlessly long encoded length"]);
    }

    #[test]
    fn indefinite() {
        let len = take(b"\x80").0.unwrap();
        assert!(len.is_indefinite());
        assert_eq!(len.to_definite(), None);
        assert_eq!(len, LengthBlock::indefinite());
    }

    #[test]
    fn errors() {
        assert!(matches!(take(b"\xFF").0, Err(Error::Format(_))));
        assert_eq!(
            take(b"\x89\x01\x01\x01\x01\x01\x01\x01\x01\x01").0,
            Err(Error::TooBigInteger(0.into()))
        );
        assert_eq!(
            take(b"\x82\x01").0, Err(Error::TruncatedInput(1.into()))
        );
    }

    #[test]
    fn encode_lengths() {
        assert_eq!(encode(None), b"\x80");
        assert_eq!(encode(Some(0)), b"\x00");
        assert_eq!(encode(Some(127)), b"\x7F");
        assert_eq!(encode(Some(128)), b"\x81\x80");
        assert_eq!(encode(Some(256)), b"\x82\x01\x00");
        assert_eq!(encode(Some(0x0001_0000)), b"\x83\x01\x00\x00");
        assert_eq!(LengthBlock::definite(300).block_len(), 3);
    }

    #[test]
    fn decode_with_offset() {
        let (len, next) = LengthBlock::decode(b"\x30\x81\x90", 1, 2).unwrap();
        assert_eq!(len.to_definite(), Some(0x90));
        assert_eq!(next, 3);
        assert_eq!(
            LengthBlock::decode(b"\x30\x82\x01\x00", 1, 2).unwrap_err(),
            Error::TruncatedInput(2.into())
        );
        assert!(LengthBlock::decode(b"\x30\x05", 1, 2).is_err());
    }
}
