//! Unpack fuzz target: feed arbitrary bytes to Record::unpack.
//! Unpack must not panic; it returns Ok(Record) or Err(StructError).
//! Build with: cargo fuzz run unpack_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fn fuzz_schema() -> std::sync::Arc<cstructrs::Schema> {
    use cstructrs::{PrimType, Schema};
    let inner = Schema::builder("Inner")
        .field("a", PrimType::I16)
        .field("b", PrimType::F32)
        .build()
        .expect("inner schema");
    Schema::builder("Fuzzed")
        .field("flag", PrimType::Bool)
        .field("tag", PrimType::CharArray(6))
        .field("pad", PrimType::Padding(2))
        .field("inner", inner)
        .field(
            "xs",
            PrimType::array(PrimType::U32, 3).expect("array type"),
        )
        .build()
        .expect("fuzz schema")
}

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    use std::sync::OnceLock;
    static SCHEMA: OnceLock<std::sync::Arc<cstructrs::Schema>> = OnceLock::new();
    let schema = SCHEMA.get_or_init(fuzz_schema);
    let _ = cstructrs::Record::unpack(schema, data);
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run unpack_fuzz");
}
