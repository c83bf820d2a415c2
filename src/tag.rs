//! Numbers of the UNIVERSAL tags.
//!
//! See clause 8.4 of ITU Recommendation X.690. The constants are plain
//! numbers so they can be used as patterns when matching on the number of
//! an [`Ident`][crate::Ident].

/// The end-of-contents marker of indefinite length values, UNIVERSAL 0.
pub const END_OF_CONTENTS: u64 = 0;

/// The tag for the BOOLEAN type, UNIVERSAL 1.
pub const BOOLEAN: u64 = 1;

/// The tag for the INTEGER type, UNIVERSAL 2.
pub const INTEGER: u64 = 2;

/// The tag for the BIT STRING type, UNIVERSAL 3.
pub const BIT_STRING: u64 = 3;

/// The tag for the OCTET STRING type, UNIVERSAL 4.
pub const OCTET_STRING: u64 = 4;

/// The tag for the NULL type, UNIVERSAL 5.
pub const NULL: u64 = 5;

/// The tag for the OBJECT IDENTIFIER type, UNIVERSAL 6.
pub const OID: u64 = 6;

/// The tag for the REAL type, UNIVERSAL 9.
pub const REAL: u64 = 9;

/// The tag for the ENUMERATED type, UNIVERSAL 10.
pub const ENUMERATED: u64 = 10;

/// The tag for the UTF8String type, UNIVERSAL 12
pub const UTF8_STRING: u64 = 12;

/// The tag for the TIME type, UNIVERSAL 14.
pub const TIME: u64 = 14;

/// The reserved tag UNIVERSAL 15.
pub const RESERVED: u64 = 15;

/// The tag for the SEQUENCE and SEQUENCE OF types, UNIVERSAL 16.
pub const SEQUENCE: u64 = 16;

/// The tag for the SET and SET OF types, UNIVERSAL 17.
pub const SET: u64 = 17;

/// The tag for the NumericString type, UNIVERSAL 18.
pub const NUMERIC_STRING: u64 = 18;

/// The tag for the PrintableString type, UNIVERSAL 19.
pub const PRINTABLE_STRING: u64 = 19;

/// The tag for the TeletexString type, UNIVERSAL 20.
pub const TELETEX_STRING: u64 = 20;

/// The tag for the VideotexString type, UNIVERSAL 21.
pub const VIDEOTEX_STRING: u64 = 21;

/// The tag for the IA5String type, UNIVERSAL 22.
pub const IA5_STRING: u64 = 22;

/// The tag for the UTCTime type, UNIVERSAL 23.
pub const UTC_TIME: u64 = 23;

/// The tag for the GeneralizedTime type, UNIVERSAL 24.
pub const GENERALIZED_TIME: u64 = 24;

/// The tag for the GraphicString type, UNIVERSAL 25.
pub const GRAPHIC_STRING: u64 = 25;

/// The tag for the VisibleString type, UNIVERSAL 26.
pub const VISIBLE_STRING: u64 = 26;

/// The tag for the GeneralString type, UNIVERSAL 27.
pub const GENERAL_STRING: u64 = 27;

/// The tag for the UniversalString type, UNIVERSAL 28.
pub const UNIVERSAL_STRING: u64 = 28;

/// The tag for the CHARACTER STRING type, UNIVERSAL 29.
pub const CHARACTER_STRING: u64 = 29;

/// The tag for the BMPString type, UNIVERSAL 30.
pub const BMP_STRING: u64 = 30;

/// The tag for the DATE type, UNIVERSAL 31.
pub const DATE: u64 = 31;

/// The tag for the TIME-OF-DAY type, UNIVERSAL 32.
pub const TIME_OF_DAY: u64 = 32;

/// The tag for the DATE-TIME type, UNIVERSAL 33.
pub const DATE_TIME: u64 = 33;

/// The tag for the DURATION type, UNIVERSAL 34.
pub const DURATION: u64 = 34;

/// The first UNIVERSAL tag number not assigned to any type.
pub const FIRST_UNASSIGNED: u64 = 37;

/// Returns the ASN.1 name of a UNIVERSAL tag number.
pub fn name(number: u64) -> Option<&'static str> {
    let res = match number {
        END_OF_CONTENTS => "END OF CONTENT",
        BOOLEAN => "BOOLEAN",
        INTEGER => "INTEGER",
        BIT_STRING => "BIT STRING",
        OCTET_STRING => "OCTET STRING",
        NULL => "NULL",
        OID => "OBJECT IDENTIFIER",
        7 => "ObjectDescriptor",
        8 => "EXTERNAL",
        REAL => "REAL",
        ENUMERATED => "ENUMERATED",
        11 => "EMBEDDED PDV",
        UTF8_STRING => "UTF8String",
        13 => "RELATIVE-OID",
        TIME => "TIME",
        SEQUENCE => "SEQUENCE",
        SET => "SET",
        NUMERIC_STRING => "NumericString",
        PRINTABLE_STRING => "PrintableString",
        TELETEX_STRING => "TeletexString",
        VIDEOTEX_STRING => "VideotexString",
        IA5_STRING => "IA5String",
        UTC_TIME => "UTCTime",
        GENERALIZED_TIME => "GeneralizedTime",
        GRAPHIC_STRING => "GraphicString",
        VISIBLE_STRING => "VisibleString",
        GENERAL_STRING => "GeneralString",
        UNIVERSAL_STRING => "UniversalString",
        CHARACTER_STRING => "CHARACTER STRING",
        BMP_STRING => "BMPString",
        DATE => "DATE",
        TIME_OF_DAY => "TIME-OF-DAY",
        DATE_TIME => "DATE-TIME",
        DURATION => "DURATION",
        35 => "OID-IRI",
        36 => "RELATIVE-OID-IRI",
        _ => return None,
    };
    Some(res)
}

/// Returns whether a UNIVERSAL type must always use primitive encoding.
pub fn is_primitive_only(number: u64) -> bool {
    matches!(
        number,
        BOOLEAN | INTEGER | NULL | OID | REAL | TIME | UTC_TIME
        | GENERALIZED_TIME | DATE | TIME_OF_DAY | DATE_TIME | DURATION
    )
}
