// Patch application: the structural inverse of the delta engine.
//
// No search, pure linear reconstruction. The applier validates the
// arithmetic the container cannot: source-cursor bounds, stream
// exhaustion, and the declared destination length. It never returns
// partial output.

use crate::delta::PatchPlan;
use crate::error::PatchError;

/// Reconstruct the destination from `src` and a patch plan.
///
/// The result is exactly `plan.dst_len` bytes or an error; a plan whose
/// tuple arithmetic is inconsistent with its streams or with `src` is
/// rejected as `MalformedPatch`.
pub fn apply(src: &[u8], plan: &PatchPlan) -> Result<Vec<u8>, PatchError> {
    // The declared length bounds the allocation below, so it must be
    // checked against the actual streams before any memory is reserved.
    // Every well-formed plan satisfies this exactly.
    let stream_total = (plan.diff.len() + plan.extra.len()) as u64;
    if plan.dst_len != stream_total {
        return Err(PatchError::malformed(format!(
            "declared length {} disagrees with stream total {stream_total}",
            plan.dst_len
        )));
    }
    let dst_len = usize::try_from(plan.dst_len)
        .map_err(|_| PatchError::malformed("destination length exceeds address space"))?;

    let mut out = Vec::with_capacity(dst_len);
    let mut src_cursor: i64 = 0;
    let mut diff_off = 0usize;
    let mut extra_off = 0usize;

    for (n, tuple) in plan.tuples.iter().enumerate() {
        let diff_len = usize::try_from(tuple.diff_len)
            .map_err(|_| PatchError::malformed(format!("tuple {n}: diff length overflow")))?;
        let extra_len = usize::try_from(tuple.extra_len)
            .map_err(|_| PatchError::malformed(format!("tuple {n}: extra length overflow")))?;

        if diff_off + diff_len > plan.diff.len() {
            return Err(PatchError::malformed(format!(
                "tuple {n}: diff stream exhausted ({} of {} bytes left)",
                plan.diff.len() - diff_off,
                diff_len
            )));
        }
        if extra_off + extra_len > plan.extra.len() {
            return Err(PatchError::malformed(format!(
                "tuple {n}: extra stream exhausted ({} of {} bytes left)",
                plan.extra.len() - extra_off,
                extra_len
            )));
        }
        if out.len() + diff_len + extra_len > dst_len {
            return Err(PatchError::malformed(format!(
                "tuple {n}: output exceeds declared length {dst_len}"
            )));
        }

        if diff_len > 0 {
            let start = usize::try_from(src_cursor).map_err(|_| {
                PatchError::malformed(format!("tuple {n}: source cursor {src_cursor} negative"))
            })?;
            let end = start.checked_add(diff_len).filter(|&e| e <= src.len()).ok_or_else(|| {
                PatchError::malformed(format!(
                    "tuple {n}: copy of {diff_len} bytes at {start} reads past source ({})",
                    src.len()
                ))
            })?;
            for (s, d) in src[start..end]
                .iter()
                .zip(&plan.diff[diff_off..diff_off + diff_len])
            {
                out.push(s.wrapping_add(*d));
            }
            diff_off += diff_len;
        }

        out.extend_from_slice(&plan.extra[extra_off..extra_off + extra_len]);
        extra_off += extra_len;

        src_cursor = src_cursor
            .checked_add(diff_len as i64)
            .and_then(|c| c.checked_add(tuple.seek))
            .ok_or_else(|| PatchError::malformed(format!("tuple {n}: source cursor overflow")))?;
    }

    if out.len() != dst_len {
        return Err(PatchError::malformed(format!(
            "reconstructed {} bytes, declared {dst_len}",
            out.len()
        )));
    }

    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
