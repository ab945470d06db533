#![no_main]
use bsdiffhs::{Params, patch};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes fed as a patch stream must never panic, only
    // return errors.
    let _ = patch(&[], data, Params::default());

    // Also fuzz with a non-empty source.
    if data.len() >= 2 {
        let split = data.len() / 2;
        let (source, stream) = data.split_at(split);
        let _ = patch(source, stream, Params::default());
    }
});
