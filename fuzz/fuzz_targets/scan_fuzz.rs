#![no_main]
use libfuzzer_sys::fuzz_target;

use diffscan::engine::{self, ScanConfig};
use diffscan::pattern::DiffPattern;
use diffscan::word::{Endianness, Width};

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    // First bytes pick the configuration, the rest is the stream.
    let width = match data[0] % 4 {
        0 => Width::W8,
        1 => Width::W16,
        2 => Width::W24,
        _ => Width::W32,
    };
    let endianness = if data[1] % 2 == 0 {
        Endianness::Little
    } else {
        Endianness::Big
    };
    let reference = data[2] as i64;
    let exact = data[3] % 2 == 0;
    let stream = &data[4..];

    let pattern = DiffPattern::from_values(reference, &[reference + 1, reference - 1]).unwrap();
    let config = ScanConfig {
        width,
        endianness,
        exact,
        ..Default::default()
    };

    // Scanning arbitrary bytes must terminate cleanly and never panic.
    let mut cursor = std::io::Cursor::new(stream);
    let _ = engine::scan_to_vec(&mut cursor, &config, &pattern);
});
