// High-level diff/patch entry points.
//
// Ties the delta engine to the container codec: `diff` produces a
// complete patch stream, `patch` reconstructs the destination from a
// source and a patch stream. Both are pure, blocking, CPU-bound calls
// over in-memory buffers; independent calls share no state and may run
// on separate threads without coordination.

use log::debug;

use crate::apply;
use crate::compress::Params;
use crate::container;
use crate::delta;
use crate::error::PatchError;

/// Compute a BSDIFFHS patch stream that transforms `src` into `dst`.
///
/// Total over all inputs: any pair of byte buffers, including empty
/// ones, yields a valid patch.
pub fn diff(src: &[u8], dst: &[u8], params: Params) -> Vec<u8> {
    let plan = delta::diff_plan(src, dst);
    let stream = container::write_patch(&plan, params);
    debug!(
        "diff: src {} B, dst {} B -> patch {} B",
        src.len(),
        dst.len(),
        stream.len()
    );
    stream
}

/// Apply a BSDIFFHS patch stream to `src`, reconstructing the
/// destination.
///
/// `params` must match the producer's; the format carries no parameter
/// fields, so a mismatch surfaces as `TruncatedPatch` or
/// `MalformedPatch` rather than a distinct error.
pub fn patch(src: &[u8], patch_stream: &[u8], params: Params) -> Result<Vec<u8>, PatchError> {
    let plan = container::read_patch(patch_stream, params)?;
    apply::apply(src, &plan)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(src: &[u8], dst: &[u8]) {
        let params = Params::default();
        let stream = diff(src, dst, params);
        let rebuilt = patch(src, &stream, params).expect("patch failed");
        assert_eq!(rebuilt, dst);
    }

    #[test]
    fn roundtrip_identical() {
        let data = b"The quick brown fox jumps over the lazy dog.";
        roundtrip(data, data);
    }

    #[test]
    fn roundtrip_small_edit() {
        roundtrip(b"hello world", b"hello there");
    }

    #[test]
    fn roundtrip_empty_source() {
        roundtrip(b"", b"ABCDEFGHIJKLMNOPQRSTUVWXYZ");
    }

    #[test]
    fn roundtrip_empty_destination() {
        roundtrip(b"some source", b"");
    }

    #[test]
    fn roundtrip_both_empty() {
        roundtrip(b"", b"");
    }

    #[test]
    fn roundtrip_nondefault_params() {
        let src: Vec<u8> = (0..=255u8).cycle().take(2000).collect();
        let mut dst = src.clone();
        dst[500] ^= 0xFF;
        for (w, l) in [(8, 4), (11, 6), (15, 14)] {
            let params = Params::new(w, l).unwrap();
            let stream = diff(&src, &dst, params);
            assert_eq!(patch(&src, &stream, params).unwrap(), dst);
        }
    }

    #[test]
    fn similar_inputs_produce_small_patches() {
        let src: Vec<u8> = (0..8192u32).map(|i| (i % 251) as u8).collect();
        let mut dst = src.clone();
        dst[4096] ^= 0xFF;
        let stream = diff(&src, &dst, Params::default());
        assert!(
            stream.len() < dst.len() / 4,
            "patch {} B for dst {} B",
            stream.len(),
            dst.len()
        );
    }

    #[test]
    fn patch_rejects_huge_declared_length() {
        // Valid magic, absurd destination length, no segment groups:
        // must error, never allocate or panic.
        let mut stream = crate::container::MAGIC.to_vec();
        stream.extend_from_slice(&u64::MAX.to_le_bytes());
        assert!(matches!(
            patch(b"src", &stream, Params::default()),
            Err(PatchError::MalformedPatch(_))
        ));
    }

    #[test]
    fn patch_rejects_non_patch_input() {
        assert!(matches!(
            patch(b"src", b"definitely not a patch", Params::default()),
            Err(PatchError::BadMagic)
        ));
    }
}
