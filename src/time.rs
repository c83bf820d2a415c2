//! UTCTime and GeneralizedTime.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.

use std::fmt;
use bytes::Bytes;
use crate::error::Error;
use crate::string::latin1;


//------------ Timestamp -----------------------------------------------------

/// The components of a point in time as used by the time types.
///
/// All times are in UTC. There is no support for fractional seconds.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Timestamp {
    /// The full year.
    pub year: u16,

    /// The month, starting at 1.
    pub month: u8,

    /// The day of the month, starting at 1.
    pub day: u8,

    /// The hour, 0 to 23.
    pub hour: u8,

    /// The minute, 0 to 59.
    pub minute: u8,

    /// The second, 0 to 59.
    pub second: u8,
}

impl Timestamp {
    /// Creates a timestamp from its components.
    ///
    /// Fails if any of the components is out of range. Days are only
    /// checked against 31 for every month.
    pub fn new(
        year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8
    ) -> Result<Self, Error> {
        let res = Timestamp { year, month, day, hour, minute, second };
        res.check()?;
        Ok(res)
    }

    /// Checks that the components are in range.
    fn check(&self) -> Result<(), Error> {
        if !(1..=12).contains(&self.month)
            || !(1..=31).contains(&self.day)
            || self.hour > 23 || self.minute > 59 || self.second > 59
        {
            return Err(Error::format(format!(
                "time component out of range in {:?}", self
            )))
        }
        Ok(())
    }

    /// Parses all but the year from the ten digits after the year.
    fn parse_tail(year: u16, s: &[u8]) -> Result<Self, Error> {
        let field = |idx: usize| -> Result<u8, Error> {
            Ok(digits(&s[idx..idx + 2])? as u8)
        };
        let res = Timestamp {
            year,
            month: field(0)?,
            day: field(2)?,
            hour: field(4)?,
            minute: field(6)?,
            second: field(8)?,
        };
        res.check()?;
        Ok(res)
    }
}


//------------ UtcTime -------------------------------------------------------

/// A UTCTime value.
///
/// # BER Encoding
///
/// The value is encoded as the string `YYMMDDHHMMSSZ` with a two digit
/// year. Years less than 50 are in the 21st century, all others in the
/// 20th.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct UtcTime {
    /// The content octets.
    octets: Bytes,

    /// The parsed timestamp.
    ///
    /// This is `None` if the content couldn’t be parsed.
    timestamp: Option<Timestamp>,
}

impl UtcTime {
    /// Creates a value from the content octets.
    pub fn from_content(octets: Bytes) -> Result<Self, Error> {
        let timestamp = Self::parse(&octets)?;
        Ok(UtcTime { octets, timestamp: Some(timestamp) })
    }

    /// Creates a value from content octets that failed to parse.
    pub(crate) fn unparsed(octets: Bytes) -> Self {
        UtcTime { octets, timestamp: None }
    }

    /// Creates a value for a timestamp.
    ///
    /// Fails unless the year is between 1950 and 2049.
    pub fn new(timestamp: Timestamp) -> Result<Self, Error> {
        timestamp.check()?;
        if !(1950..=2049).contains(&timestamp.year) {
            return Err(Error::format(format!(
                "year {} out of range for UTCTime", timestamp.year
            )))
        }
        let octets = format!(
            "{:02}{:02}{:02}{:02}{:02}{:02}Z",
            timestamp.year % 100, timestamp.month, timestamp.day,
            timestamp.hour, timestamp.minute, timestamp.second,
        );
        Ok(UtcTime {
            octets: octets.into_bytes().into(),
            timestamp: Some(timestamp)
        })
    }

    /// Parses the content octets.
    fn parse(s: &[u8]) -> Result<Timestamp, Error> {
        if s.len() != 13 || !matches!(s[12], b'Z' | b'z') {
            return Err(Error::format(format!(
                "wrong input string for conversion to UTCTime: {:?}",
                latin1(s)
            )))
        }
        let year = digits(&s[..2])?;
        let year = if year < 50 { 2000 + year } else { 1900 + year };
        Timestamp::parse_tail(year, &s[2..12])
    }

    /// Returns the timestamp if the content could be parsed.
    pub fn timestamp(&self) -> Option<Timestamp> {
        self.timestamp
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

impl fmt::Display for UtcTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&latin1(&self.octets))
    }
}


//------------ GeneralizedTime -----------------------------------------------

/// A GeneralizedTime value.
///
/// # BER Encoding
///
/// The value is encoded as the string `YYYYMMDDHHMMSSZ`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct GeneralizedTime {
    /// The content octets.
    octets: Bytes,

    /// The parsed timestamp.
    timestamp: Option<Timestamp>,
}

impl GeneralizedTime {
    /// Creates a value from the content octets.
    pub fn from_content(octets: Bytes) -> Result<Self, Error> {
        let timestamp = Self::parse(&octets)?;
        Ok(GeneralizedTime { octets, timestamp: Some(timestamp) })
    }

    /// Creates a value from content octets that failed to parse.
    pub(crate) fn unparsed(octets: Bytes) -> Self {
        GeneralizedTime { octets, timestamp: None }
    }

    /// Creates a value for a timestamp.
    pub fn new(timestamp: Timestamp) -> Result<Self, Error> {
        timestamp.check()?;
        if timestamp.year > 9999 {
            return Err(Error::format(format!(
                "year {} out of range for GeneralizedTime", timestamp.year
            )))
        }
        let octets = format!(
            "{:04}{:02}{:02}{:02}{:02}{:02}Z",
            timestamp.year, timestamp.month, timestamp.day,
            timestamp.hour, timestamp.minute, timestamp.second,
        );
        Ok(GeneralizedTime {
            octets: octets.into_bytes().into(),
            timestamp: Some(timestamp)
        })
    }

    /// Parses the content octets.
    fn parse(s: &[u8]) -> Result<Timestamp, Error> {
        if s.len() != 15 || !matches!(s[14], b'Z' | b'z') {
            return Err(Error::format(format!(
                "wrong input string for conversion to GeneralizedTime: {:?}",
                latin1(s)
            )))
        }
        let year = digits(&s[..4])?;
        Timestamp::parse_tail(year, &s[4..14])
    }

    /// Returns the timestamp if the content could be parsed.
    pub fn timestamp(&self) -> Option<Timestamp> {
        self.timestamp
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

impl fmt::Display for GeneralizedTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&latin1(&self.octets))
    }
}


//------------ Helpers -------------------------------------------------------

/// Parses a sequence of ASCII digits.
fn digits(s: &[u8]) -> Result<u16, Error> {
    s.iter().try_fold(0u16, |res, &ch| {
        if ch.is_ascii_digit() {
            Ok(res * 10 + u16::from(ch - b'0'))
        }
        else {
            Err(Error::format(format!(
                "non-digit in time string: {:?}", latin1(s)
            )))
        }
    })
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn utc_time() {
        let time = UtcTime::from_content(
            Bytes::from_static(b"491231235959Z")
        ).unwrap();
        assert_eq!(
            time.timestamp(),
            Some(Timestamp::new(2049, 12, 31, 23, 59, 59).unwrap())
        );
        let time = UtcTime::from_content(
            Bytes::from_static(b"500101000000Z")
        ).unwrap();
        assert_eq!(time.timestamp().unwrap().year, 1950);
        assert_eq!(time.to_string(), "500101000000Z");

        assert!(UtcTime::from_content(Bytes::from_static(b"5001010000Z"))
            .is_err());
        assert!(UtcTime::from_content(Bytes::from_static(b"500101000000"))
            .is_err());
        assert!(UtcTime::from_content(Bytes::from_static(b"50010100000aZ"))
            .is_err());
        assert!(UtcTime::from_content(Bytes::from_static(b"501301000000Z"))
            .is_err());
    }

    #[test]
    fn utc_time_encode() {
        let time = UtcTime::new(
            Timestamp::new(2005, 3, 7, 9, 4, 1).unwrap()
        ).unwrap();
        assert_eq!(time.as_slice(), b"050307090401Z");
        assert!(UtcTime::new(
            Timestamp::new(2050, 1, 1, 0, 0, 0).unwrap()
        ).is_err());
    }

    #[test]
    fn generalized_time() {
        let time = GeneralizedTime::from_content(
            Bytes::from_static(b"20230115083000Z")
        ).unwrap();
        assert_eq!(
            time.timestamp(),
            Some(Timestamp::new(2023, 1, 15, 8, 30, 0).unwrap())
        );
        assert!(GeneralizedTime::from_content(
            Bytes::from_static(b"230115083000Z")
        ).is_err());

        let time = GeneralizedTime::new(
            Timestamp::new(812, 6, 1, 12, 0, 0).unwrap()
        ).unwrap();
        assert_eq!(time.as_slice(), b"08120601120000Z");
    }

    #[test]
    fn timestamp_ranges() {
        assert!(Timestamp::new(2000, 0, 1, 0, 0, 0).is_err());
        assert!(Timestamp::new(2000, 1, 32, 0, 0, 0).is_err());
        assert!(Timestamp::new(2000, 1, 1, 24, 0, 0).is_err());
        assert!(Timestamp::new(2000, 1, 1, 0, 60, 0).is_err());
        assert!(Timestamp::new(2000, 1, 1, 0, 0, 60).is_err());
    }
}
