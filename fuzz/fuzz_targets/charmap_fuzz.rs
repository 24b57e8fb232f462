#![no_main]
use libfuzzer_sys::fuzz_target;

use diffscan::charmap::CharMap;
use diffscan::word::Width;

fuzz_target!(|data: &[u8]| {
    // Arbitrary map text must parse or error, never panic.
    let cursor = std::io::Cursor::new(data);
    let _ = CharMap::parse(cursor, Width::W8, true);
});
