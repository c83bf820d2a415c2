#![no_main]

use libfuzzer_sys::fuzz_target;
use bertree::{DecodeOptions, Mode, decode_with};

fuzz_target!(|data: &[u8]| {
    let options = DecodeOptions::new().with_max_depth(32);
    let node = match decode_with(data, &options) {
        Ok(node) => node,
        Err(err) => {
            if let Some(partial) = err.partial() {
                let _ = partial.encode(Mode::Ber);
            }
            return
        }
    };
    let _ = node.to_debug_object();

    // The DER form of a tree decodes again and is stable.
    let der = node.encode(Mode::Der);
    let again = decode_with(&der, &options).expect("DER output decodes");
    assert_eq!(again.encode(Mode::Der), der);
});
