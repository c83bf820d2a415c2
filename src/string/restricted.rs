//! Character strings.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.

use std::fmt;
use bytes::Bytes;
use crate::error::Error;
use crate::tag;


//------------ StringKind ----------------------------------------------------

/// The kinds of character strings.
///
/// ASN.1 defines quite a few string types. They differ in the character set
/// they allow and in how characters are encoded. We only distinguish the
/// latter.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum StringKind {
    /// UTF8String, encoded as UTF-8.
    Utf8,

    /// NumericString, one octet per character.
    Numeric,

    /// PrintableString, one octet per character.
    Printable,

    /// TeletexString, one octet per character.
    Teletex,

    /// VideotexString, one octet per character.
    Videotex,

    /// IA5String, one octet per character.
    Ia5,

    /// GraphicString, one octet per character.
    Graphic,

    /// VisibleString, one octet per character.
    Visible,

    /// GeneralString, one octet per character.
    General,

    /// UniversalString, encoded as UTF-32 big endian.
    Universal,

    /// CHARACTER STRING, one octet per character.
    Character,

    /// BMPString, encoded as UTF-16 big endian.
    Bmp,

    /// The TIME type, encoded as a UTF-8 string.
    Time,

    /// The DATE type, encoded as a UTF-8 string.
    Date,

    /// The DATE-TIME type, encoded as a UTF-8 string.
    DateTime,
}

impl StringKind {
    /// Returns the kind for a universal tag number.
    pub fn from_number(number: u64) -> Option<Self> {
        let res = match number {
            tag::UTF8_STRING => StringKind::Utf8,
            tag::NUMERIC_STRING => StringKind::Numeric,
            tag::PRINTABLE_STRING => StringKind::Printable,
            tag::TELETEX_STRING => StringKind::Teletex,
            tag::VIDEOTEX_STRING => StringKind::Videotex,
            tag::IA5_STRING => StringKind::Ia5,
            tag::GRAPHIC_STRING => StringKind::Graphic,
            tag::VISIBLE_STRING => StringKind::Visible,
            tag::GENERAL_STRING => StringKind::General,
            tag::UNIVERSAL_STRING => StringKind::Universal,
            tag::CHARACTER_STRING => StringKind::Character,
            tag::BMP_STRING => StringKind::Bmp,
            tag::TIME => StringKind::Time,
            tag::DATE => StringKind::Date,
            tag::DATE_TIME => StringKind::DateTime,
            _ => return None
        };
        Some(res)
    }

    /// Returns the universal tag number of the kind.
    pub fn number(self) -> u64 {
        match self {
            StringKind::Utf8 => tag::UTF8_STRING,
            StringKind::Numeric => tag::NUMERIC_STRING,
            StringKind::Printable => tag::PRINTABLE_STRING,
            StringKind::Teletex => tag::TELETEX_STRING,
            StringKind::Videotex => tag::VIDEOTEX_STRING,
            StringKind::Ia5 => tag::IA5_STRING,
            StringKind::Graphic => tag::GRAPHIC_STRING,
            StringKind::Visible => tag::VISIBLE_STRING,
            StringKind::General => tag::GENERAL_STRING,
            StringKind::Universal => tag::UNIVERSAL_STRING,
            StringKind::Character => tag::CHARACTER_STRING,
            StringKind::Bmp => tag::BMP_STRING,
            StringKind::Time => tag::TIME,
            StringKind::Date => tag::DATE,
            StringKind::DateTime => tag::DATE_TIME,
        }
    }

    /// Returns how characters of this kind are encoded.
    fn encoding(self) -> Encoding {
        match self {
            StringKind::Utf8 | StringKind::Time | StringKind::Date
                | StringKind::DateTime => Encoding::Utf8,
            StringKind::Bmp => Encoding::Utf16,
            StringKind::Universal => Encoding::Utf32,
            _ => Encoding::Octets,
        }
    }
}

impl fmt::Display for StringKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(tag::name(self.number()).unwrap_or("string"))
    }
}


//------------ Encoding ------------------------------------------------------

/// The character encodings used by the string kinds.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Encoding {
    /// UTF-8.
    Utf8,

    /// UTF-16 in big-endian byte order.
    Utf16,

    /// UTF-32 in big-endian byte order.
    Utf32,

    /// One octet per character.
    ///
    /// The restricted string types use subsets of ISO 8859-1 or escape
    /// sequences we don’t interpret, so we map each octet to the code
    /// point of the same value.
    Octets,
}


//------------ CharString ----------------------------------------------------

/// A character string.
///
/// The string keeps both its content octets and the text decoded from
/// them. Decoding never fails: if the octets aren’t valid in the string’s
/// encoding, the text is derived as well as possible and a warning is
/// left.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct CharString {
    /// The kind of string.
    kind: StringKind,

    /// The content octets.
    octets: Bytes,

    /// The decoded text.
    text: String,
}

impl CharString {
    /// Creates a string from its content octets.
    ///
    /// Problems with the encoding are added to `warnings`.
    pub fn from_content(
        kind: StringKind, octets: Bytes, warnings: &mut Vec<String>
    ) -> Self {
        let text: String = match kind.encoding() {
            Encoding::Utf8 => {
                match std::str::from_utf8(&octets) {
                    Ok(text) => text.into(),
                    Err(_) => {
                        warnings.push(format!(
                            "invalid UTF-8 in {}, decoded as Latin-1", kind
                        ));
                        latin1(&octets)
                    }
                }
            }
            Encoding::Utf16 => {
                if octets.len() % 2 != 0 {
                    warnings.push(format!("odd length of {}", kind));
                }
                let units = octets.chunks_exact(2).map(|chunk| {
                    u16::from_be_bytes([chunk[0], chunk[1]])
                });
                let mut invalid = false;
                let text: String = char::decode_utf16(units).map(|ch| {
                    ch.unwrap_or_else(|_| {
                        invalid = true;
                        char::REPLACEMENT_CHARACTER
                    })
                }).collect();
                if invalid {
                    warnings.push(format!("invalid UTF-16 in {}", kind));
                }
                text
            }
            Encoding::Utf32 => {
                if octets.len() % 4 != 0 {
                    warnings.push(format!(
                        "length of {} not a multiple of 4", kind
                    ));
                }
                let mut invalid = false;
                let text: String = octets.chunks_exact(4).map(|chunk| {
                    let ch = u32::from_be_bytes(
                        [chunk[0], chunk[1], chunk[2], chunk[3]]
                    );
                    char::from_u32(ch).unwrap_or_else(|| {
                        invalid = true;
                        char::REPLACEMENT_CHARACTER
                    })
                }).collect();
                if invalid {
                    warnings.push(format!("invalid code point in {}", kind));
                }
                text
            }
            Encoding::Octets => latin1(&octets),
        };
        CharString { kind, octets, text }
    }

    /// Creates a string from text.
    ///
    /// Fails if the text contains characters that can’t be encoded in the
    /// given kind of string. For kinds using one octet per character, these
    /// are all characters beyond U+00FF.
    pub fn from_text(kind: StringKind, text: &str) -> Result<Self, Error> {
        let octets: Vec<u8> = match kind.encoding() {
            Encoding::Utf8 => text.as_bytes().into(),
            Encoding::Utf16 => {
                text.encode_utf16().flat_map(u16::to_be_bytes).collect()
            }
            Encoding::Utf32 => {
                text.chars().flat_map(|ch| u32::from(ch).to_be_bytes())
                    .collect()
            }
            Encoding::Octets => {
                text.chars().map(|ch| {
                    u8::try_from(ch).map_err(|_| Error::format(format!(
                        "character {:?} not allowed in {}", ch, kind
                    )))
                }).collect::<Result<_, _>>()?
            }
        };
        Ok(CharString { kind, octets: octets.into(), text: text.into() })
    }

    /// Creates a UTF8String from text.
    pub fn from_utf8(text: &str) -> Self {
        CharString {
            kind: StringKind::Utf8,
            octets: Bytes::copy_from_slice(text.as_bytes()),
            text: text.into(),
        }
    }

    /// Returns the kind of string.
    pub fn kind(&self) -> StringKind {
        self.kind
    }

    /// Returns the text of the string.
    pub fn as_str(&self) -> &str {
        &self.text
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

impl fmt::Display for CharString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}


//------------ Helpers -------------------------------------------------------

/// Decodes octets as ISO 8859-1.
pub(crate) fn latin1(octets: &[u8]) -> String {
    octets.iter().copied().map(char::from).collect()
}


//============ Tests =========================================================
