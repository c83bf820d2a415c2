//! BER encoded integers.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.

use std::fmt;
use bytes::Bytes;
use crate::error::Error;


//------------ Integer -------------------------------------------------------

/// A BER encoded integer.
///
/// As integers are variable length in BER, this type keeps the raw content
/// octets. If there are no more than four of them, the value is also
/// available as an `i32`. Larger integers are only available through their
/// content octets. We call these ‘hex-only.’
///
/// The type is used for both the INTEGER and ENUMERATED types.
///
/// # BER Encoding
///
/// In BER, an INTEGER is encoded as a primitive value with the content octets
/// providing a variable-length, big-endian, two‘s complement byte sequence of
/// that integer. Thus, the most-significant bit of the first octet serves as
/// the sign bit.
///
/// The encoding should be as short as possible. That is, the first nine
/// bits of a multi-octet integer shall not all be the same. This is only
/// enforced when encoding. Decoding accepts longer encodings with a
/// warning.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Integer {
    /// The content octets.
    octets: Bytes,

    /// The native value if the content is short enough.
    value: Option<i32>,
}

impl Integer {
    /// The maximum number of content octets decoded into a native value.
    pub const MAX_NATIVE_LEN: usize = 4;

    /// Creates an integer from its content octets.
    ///
    /// The content must not be empty. Anomalies are added to `warnings`.
    pub fn from_content(
        octets: Bytes, warnings: &mut Vec<String>
    ) -> Result<Self, Error> {
        if octets.is_empty() {
            return Err(Error::format("empty INTEGER content"))
        }
        if !is_minimal(&octets) {
            warnings.push("needlessly long format of INTEGER".into());
        }
        let value = if octets.len() > Self::MAX_NATIVE_LEN {
            warnings.push("too big INTEGER for decoding, hex only".into());
            None
        }
        else {
            let mut buf = if octets[0] & 0x80 != 0 {
                [0xFF; 4]
            }
            else {
                [0; 4]
            };
            buf[Self::MAX_NATIVE_LEN - octets.len()..]
                .copy_from_slice(&octets);
            Some(i32::from_be_bytes(buf))
        };
        Ok(Integer { octets, value })
    }

    /// Returns the native value unless the integer is hex-only.
    pub fn to_i32(&self) -> Option<i32> {
        self.value
    }

    /// Returns whether the integer is only available as content octets.
    pub fn is_hex_only(&self) -> bool {
        self.value.is_none()
    }

    /// Returns whether the integer is less than zero.
    pub fn is_negative(&self) -> bool {
        self.octets[0] & 0x80 != 0
    }

    /// Returns the content octets.
    pub fn as_slice(&self) -> &[u8] {
        self.octets.as_ref()
    }

    /// Returns the content octets as a bytes value.
    pub fn as_bytes(&self) -> &Bytes {
        &self.octets
    }
}


//--- From

impl From<i32> for Integer {
    fn from(value: i32) -> Self {
        let octets = value.to_be_bytes();
        let mut start = 0;
        while !is_minimal(&octets[start..]) {
            start += 1;
        }
        Integer {
            octets: Bytes::copy_from_slice(&octets[start..]),
            value: Some(value),
        }
    }
}


//--- Display

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.value {
            Some(value) => value.fmt(f),
            None => {
                f.write_str("0x")?;
                for octet in self.octets.iter() {
                    write!(f, "{:02X}", octet)?;
                }
                Ok(())
            }
        }
    }
}


//------------ Helpers -------------------------------------------------------

/// Returns whether the content octets are the shortest possible encoding.
fn is_minimal(octets: &[u8]) -> bool {
    match (octets.first(), octets.get(1).map(|x| x & 0x80 != 0)) {
        (Some(0), Some(false)) => false,
        (Some(0xFF), Some(true)) => false,
        _ => true
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn decode(octets: &'static [u8]) -> (Result<Integer, Error>, Vec<String>) {
        let mut warnings = Vec::new();
        let res = Integer::from_content(
            Bytes::from_static(octets), &mut warnings
        );
        (res, warnings)
    }

    #[test]
    fn decode_native() {
        assert_eq!(decode(b"\x00").0.unwrap().to_i32(), Some(0));
        assert_eq!(decode(b"\x7F").0.unwrap().to_i32(), Some(127));
        assert_eq!(decode(b"\x80").0.unwrap().to_i32(), Some(-128));
        assert_eq!(decode(b"\xFF").0.unwrap().to_i32(), Some(-1));
        assert_eq!(decode(b"\x00\x80").0.unwrap().to_i32(), Some(128));
        assert_eq!(decode(b"\x80\xFF").0.unwrap().to_i32(), Some(-32513));
        assert_eq!(
            decode(b"\x7F\xFF\xFF\xFF").0.unwrap().to_i32(),
            Some(i32::MAX)
        );
        assert_eq!(
            decode(b"\x80\x00\x00\x00").0.unwrap().to_i32(),
            Some(i32::MIN)
        );
        assert!(decode(b"\x80\x00\x00\x00").1.is_empty());
    }

    #[test]
    fn decode_hex_only() {
        let (int, warnings) = decode(b"\x01\x00\x00\x00\x00");
        let int = int.unwrap();
        assert!(int.is_hex_only());
        assert_eq!(int.to_i32(), None);
        assert_eq!(int.as_slice(), b"\x01\x00\x00\x00\x00");
        assert_eq!(int.to_string(), "0x0100000000");
        assert_eq!(warnings, ["too big INTEGER for decoding, hex only"]);
    }

    #[test]
    fn decode_anomalies() {
        let (int, warnings) = decode(b"\x00\x7F");
        assert_eq!(int.unwrap().to_i32(), Some(127));
        assert_eq!(warnings, ["needlessly long format of INTEGER"]);

        let (int, warnings) = decode(b"\xFF\x80");
        assert_eq!(int.unwrap().to_i32(), Some(-128));
        assert_eq!(warnings.len(), 1);

        assert!(matches!(decode(b"").0, Err(Error::Format(_))));
    }

    #[test]
    fn encode_minimal() {
        assert_eq!(Integer::from(0).as_slice(), b"\x00");
        assert_eq!(Integer::from(127).as_slice(), b"\x7F");
        assert_eq!(Integer::from(128).as_slice(), b"\x00\x80");
        assert_eq!(Integer::from(-128).as_slice(), b"\x80");
        assert_eq!(Integer::from(-129).as_slice(), b"\xFF\x7F");
        assert_eq!(Integer::from(-1).as_slice(), b"\xFF");
        assert_eq!(Integer::from(i32::MIN).as_slice(), b"\x80\x00\x00\x00");
    }

    #[test]
    fn twos_complement_symmetry() {
        for value in [
            0, 1, -1, 127, -128, 128, -129, 255, 256, 32767, -32768,
            0x7F_FFFF, -0x80_0000, i32::MAX, i32::MIN
        ] {
            let int = Integer::from(value);
            let (decoded, warnings) = {
                let mut warnings = Vec::new();
                let res = Integer::from_content(
                    int.as_bytes().clone(), &mut warnings
                );
                (res, warnings)
            };
            assert_eq!(decoded.unwrap().to_i32(), Some(value));
            assert!(warnings.is_empty());
        }
    }
}
