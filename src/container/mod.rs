// BSDIFFHS patch stream serialization.
//
// Layout:
//   offset 0   8-byte magic "BSDIFFHS" (first 7 bytes significant,
//              byte 8 reserved)
//   offset 8   8-byte destination length
//   then one segment group per control tuple:
//     compressed(24-byte record: diff_len, extra_len, seek)
//     compressed(diff_len raw diff-stream bytes)
//     compressed(extra_len raw extra-stream bytes)   -- always present
//
// No per-segment compressed length is stored. The reader recovers each
// boundary by feeding the decoder until the segment's known
// uncompressed size is reached (control records first, so the lengths
// of the paired diff/extra segments are always known). Decoding is a
// pure function of the consumed prefix, so the incremental probe is
// byte-identical to re-decoding a growing prefix from scratch.

pub mod fields;

use log::trace;

use crate::compress::{self, Params, SegmentDecoder};
use crate::delta::{ControlTuple, PatchPlan};
use crate::error::PatchError;

/// Patch header tag. The trailing byte is reserved and not compared.
pub const MAGIC: [u8; 8] = *b"BSDIFFHS";

const MAGIC_SIGNIFICANT: usize = 7;
const HEADER_LEN: usize = 16;
const CONTROL_RECORD_LEN: usize = 3 * fields::FIELD_LEN;

// ---------------------------------------------------------------------------
// Write
// ---------------------------------------------------------------------------

/// Serialize a patch plan into a complete patch stream.
pub fn write_patch(plan: &PatchPlan, params: Params) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + plan.diff.len() / 2 + plan.extra.len() / 2);
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&fields::encode_u64(plan.dst_len));

    let mut diff_off = 0usize;
    let mut extra_off = 0usize;

    for tuple in &plan.tuples {
        let mut record = [0u8; CONTROL_RECORD_LEN];
        record[..8].copy_from_slice(&fields::encode_u64(tuple.diff_len));
        record[8..16].copy_from_slice(&fields::encode_u64(tuple.extra_len));
        record[16..].copy_from_slice(&fields::encode_i64(tuple.seek));
        out.extend_from_slice(&compress::compress(&record, params));

        let diff_end = diff_off + tuple.diff_len as usize;
        out.extend_from_slice(&compress::compress(&plan.diff[diff_off..diff_end], params));
        diff_off = diff_end;

        // The extra segment is written even when empty; an empty input
        // compresses to an empty block and the reader probes zero bytes
        // for it. Older format variants disagree on this point, so the
        // behavior is load-bearing.
        let extra_end = extra_off + tuple.extra_len as usize;
        out.extend_from_slice(&compress::compress(
            &plan.extra[extra_off..extra_end],
            params,
        ));
        extra_off = extra_end;
    }

    trace!(
        "write_patch: {} tuples -> {} bytes",
        plan.tuples.len(),
        out.len()
    );
    out
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// Deserialize a patch stream back into a patch plan.
pub fn read_patch(input: &[u8], params: Params) -> Result<PatchPlan, PatchError> {
    if input.len() < MAGIC.len() {
        return Err(PatchError::TruncatedPatch("header shorter than magic"));
    }
    if input[..MAGIC_SIGNIFICANT] != MAGIC[..MAGIC_SIGNIFICANT] {
        return Err(PatchError::BadMagic);
    }
    if input.len() < HEADER_LEN {
        return Err(PatchError::TruncatedPatch("header shorter than 16 bytes"));
    }
    let dst_len = fields::decode_u64(&input[MAGIC.len()..]);

    let mut plan = PatchPlan {
        tuples: Vec::new(),
        diff: Vec::new(),
        extra: Vec::new(),
        dst_len,
    };

    let mut off = HEADER_LEN;
    while off < input.len() {
        let (record, used) = decode_segment(&input[off..], CONTROL_RECORD_LEN, params)?;
        off += used;

        let diff_len = fields::decode_u64(&record);
        let extra_len = fields::decode_u64(&record[8..]);
        let seek = fields::decode_i64(&record[16..]);

        // Structural bound: the streams of a well-formed patch never
        // exceed the declared destination length.
        let claimed = (plan.diff.len() + plan.extra.len()) as u64;
        if diff_len
            .checked_add(extra_len)
            .and_then(|t| t.checked_add(claimed))
            .is_none_or(|total| total > dst_len)
        {
            return Err(PatchError::malformed(format!(
                "control record claims {diff_len}+{extra_len} bytes beyond destination length {dst_len}"
            )));
        }

        let (diff_bytes, used) = decode_segment(&input[off..], diff_len as usize, params)?;
        off += used;
        plan.diff.extend_from_slice(&diff_bytes);

        let (extra_bytes, used) = decode_segment(&input[off..], extra_len as usize, params)?;
        off += used;
        plan.extra.extend_from_slice(&extra_bytes);

        plan.tuples.push(ControlTuple {
            diff_len,
            extra_len,
            seek,
        });
    }

    trace!(
        "read_patch: {} tuples from {} bytes",
        plan.tuples.len(),
        input.len()
    );
    Ok(plan)
}

/// Decode one compressed segment whose uncompressed size is known,
/// returning the decoded bytes and the number of compressed bytes
/// consumed.
fn decode_segment(
    input: &[u8],
    target: usize,
    params: Params,
) -> Result<(Vec<u8>, usize), PatchError> {
    let mut dec = SegmentDecoder::new(params);
    let mut used = 0usize;

    while dec.output_len() < target {
        let Some(&byte) = input.get(used) else {
            return Err(PatchError::TruncatedPatch(
                "stream ends inside a compressed segment",
            ));
        };
        dec.feed(byte)
            .map_err(|e| PatchError::malformed(format!("corrupt compressed segment: {e}")))?;
        used += 1;
    }

    if dec.output_len() > target {
        return Err(PatchError::malformed(format!(
            "segment decoded to {} bytes, expected {target}",
            dec.output_len()
        )));
    }

    Ok((dec.into_output(), used))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
