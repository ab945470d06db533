#![no_main]
use bsdiffhs::{Params, diff, patch};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let window_bits = 4 + (data[0] % 12);
    let lookahead_bits = 3 + (data[1] % 12);
    let Ok(params) = Params::new(window_bits, lookahead_bits) else {
        return;
    };

    let split = 2 + (data[2] as usize % (data.len() - 2));
    let source = &data[2..split];
    let target = &data[split..];

    let stream = diff(source, target, params);
    let rebuilt = patch(source, &stream, params).unwrap();
    assert_eq!(rebuilt, target);
});
