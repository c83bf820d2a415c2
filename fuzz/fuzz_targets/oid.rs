#![no_main]

use std::str::FromStr;
use libfuzzer_sys::fuzz_target;
use bertree::Oid;

fuzz_target!(|data: &[u8]| {
    let text = match std::str::from_utf8(data) {
        Ok(text) => text,
        Err(_) => return,
    };
    if let Ok(oid) = Oid::from_str(text) {
        let again = Oid::from_str(&oid.to_string()).expect("display parses");
        assert_eq!(oid, again);
    }
});
