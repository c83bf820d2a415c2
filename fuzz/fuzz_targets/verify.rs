#![no_main]

use libfuzzer_sys::fuzz_target;
use bertree::Schema;

fuzz_target!(|data: &[u8]| {
    let schema = Schema::sequence(vec![
        Schema::integer().named("version").optional(),
        Schema::choice(vec![
            Schema::oid().named("oid"),
            Schema::explicit(0, Schema::any()).named("tagged"),
        ]),
        Schema::repeated(Schema::any().named("item")).optional(),
    ]);
    let _ = bertree::verify(data, &schema).into_result();
});
