#![no_main]
use bsdiffhs::compress::{self, Params};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes through the segment decoder must never panic.
    let _ = compress::decompress(data, Params::default());

    // Compressing arbitrary bytes must roundtrip exactly.
    if data.len() >= 2 {
        let window_bits = 4 + (data[0] % 12);
        let lookahead_bits = 3 + (data[1] % 12);
        if let Ok(params) = Params::new(window_bits, lookahead_bits) {
            let input = &data[2..];
            let packed = compress::compress(input, params);
            let unpacked = compress::decompress(&packed, params).unwrap();
            assert_eq!(unpacked, input);
        }
    }
});
