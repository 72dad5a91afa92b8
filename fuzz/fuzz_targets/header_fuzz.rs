//! Header parser fuzz target: feed arbitrary bytes to the extractor.
//! The parser must not panic; unrecognized text just yields no definitions.
//! Build with: cargo fuzz run header_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    for def in cstructrs::parse_header(s) {
        let _ = def.to_schema();
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run header_fuzz");
}
