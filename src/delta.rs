// Delta engine: converts a (source, destination) pair into a patch plan.
//
// Single forward scan over the destination. Each cycle finds the best
// source match via the suffix index, extends the previous match region
// forward and the new one backward under a matches-minus-mismatches
// score, resolves any overlap, and emits one control tuple plus the
// corresponding diff-stream residuals and extra-stream literals.
//
// The engine is total: every byte-buffer pair, including empty ones,
// produces a valid plan.

use log::debug;

use crate::suffix::SuffixIndex;

/// A match may lead the running score by at most this many mismatches
/// before the scan commits to it.
const MISMATCH_LEAD: i64 = 8;

// ---------------------------------------------------------------------------
// Data model
// ---------------------------------------------------------------------------

/// One reconstruction step: copy-with-residuals, then literal insert,
/// then reposition the source cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlTuple {
    /// Bytes copied from the source cursor, combined with residuals
    /// from the diff stream.
    pub diff_len: u64,
    /// Literal bytes taken from the extra stream.
    pub extra_len: u64,
    /// Signed source-cursor jump applied after this tuple. May be
    /// negative: overlapping and backward reuse of source regions is
    /// legal and expected.
    pub seek: i64,
}

/// In-memory delta: control tuples plus the two raw byte streams.
///
/// Invariants: `sum(diff_len) == diff.len()`,
/// `sum(extra_len) == extra.len()`, and their total equals `dst_len`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchPlan {
    pub tuples: Vec<ControlTuple>,
    /// Byte-wise residuals (`dst - src mod 256`) over matched regions.
    pub diff: Vec<u8>,
    /// Literal destination bytes with no source counterpart.
    pub extra: Vec<u8>,
    pub dst_len: u64,
}

// ---------------------------------------------------------------------------
// Scan state
// ---------------------------------------------------------------------------

/// Loop-local cursors threaded through the scan, so each step's
/// invariants stay locally checkable.
#[derive(Default)]
struct ScanState {
    /// Destination cursor.
    scan: usize,
    /// Length of the match found at `scan`.
    len: usize,
    /// Source position of that match.
    pos: usize,
    /// Destination position up to which output has been committed.
    last_scan: usize,
    /// Source position paired with `last_scan`.
    last_pos: usize,
    /// `last_pos - last_scan`: projects destination positions into the
    /// source for scoring the previous alignment.
    last_offset: isize,
}

impl ScanState {
    #[inline]
    fn projected(&self, dst_pos: usize) -> Option<usize> {
        dst_pos.checked_add_signed(self.last_offset)
    }
}

// ---------------------------------------------------------------------------
// Diff
// ---------------------------------------------------------------------------

/// Compute the delta between `src` and `dst`.
pub fn diff_plan(src: &[u8], dst: &[u8]) -> PatchPlan {
    let index = SuffixIndex::build(src);
    let mut plan = PatchPlan {
        tuples: Vec::new(),
        diff: Vec::new(),
        extra: Vec::new(),
        dst_len: dst.len() as u64,
    };
    let mut st = ScanState::default();

    while st.scan < dst.len() {
        let mut old_score: i64 = 0;
        st.scan += st.len;
        let mut subscan = st.scan;

        while st.scan < dst.len() {
            let preferred = st
                .projected(st.scan)
                .unwrap_or(0)
                .min(src.len());
            let m = index.search(&dst[st.scan..], preferred);
            st.pos = m.pos;
            st.len = m.len;

            // Score how well the previous alignment already covers the
            // bytes the new match would claim.
            while subscan < st.scan + st.len {
                if let Some(i) = st.projected(subscan) {
                    if i < src.len() && src[i] == dst[subscan] {
                        old_score += 1;
                    }
                }
                subscan += 1;
            }

            let len = st.len as i64;
            if (len == old_score && len != 0) || len > old_score + MISMATCH_LEAD {
                break;
            }

            if let Some(i) = st.projected(st.scan) {
                if i < src.len() && src[i] == dst[st.scan] {
                    old_score -= 1;
                }
            }
            st.scan += 1;
        }

        if st.len as i64 != old_score || st.scan == dst.len() {
            let lenb = emit_tuple(&st, src, dst, &mut plan);
            st.last_scan = st.scan - lenb;
            st.last_pos = st.pos - lenb;
            st.last_offset = st.pos as isize - st.scan as isize;
        }
    }

    debug!(
        "diff: {} tuples, diff stream {} B, extra stream {} B (dst {} B)",
        plan.tuples.len(),
        plan.diff.len(),
        plan.extra.len(),
        plan.dst_len
    );
    plan
}

/// Forward extension of the committed region: longest prefix where the
/// running score `matches*2 - length` peaks.
fn forward_len(st: &ScanState, src: &[u8], dst: &[u8]) -> usize {
    let mut matches: i64 = 0;
    let mut best_score: i64 = 0;
    let mut len = 0;
    let mut i = 0;
    while st.last_scan + i < st.scan && st.last_pos + i < src.len() {
        if src[st.last_pos + i] == dst[st.last_scan + i] {
            matches += 1;
        }
        i += 1;
        if matches * 2 - i as i64 > best_score * 2 - len as i64 {
            best_score = matches;
            len = i;
        }
    }
    len
}

/// Backward extension of the new match, mirroring `forward_len`.
fn back_len(st: &ScanState, src: &[u8], dst: &[u8]) -> usize {
    if st.scan >= dst.len() {
        return 0;
    }
    let mut matches: i64 = 0;
    let mut best_score: i64 = 0;
    let mut len = 0;
    let mut i = 1;
    while st.scan >= st.last_scan + i && st.pos >= i {
        if src[st.pos - i] == dst[st.scan - i] {
            matches += 1;
        }
        if matches * 2 - i as i64 > best_score * 2 - len as i64 {
            best_score = matches;
            len = i;
        }
        i += 1;
    }
    len
}

/// Emit one control tuple plus its stream bytes. Returns the committed
/// backward extension so the caller can advance the scan state.
fn emit_tuple(st: &ScanState, src: &[u8], dst: &[u8], plan: &mut PatchPlan) -> usize {
    let mut lenf = forward_len(st, src, dst);
    let mut lenb = back_len(st, src, dst);

    // The forward and backward extensions may claim the same
    // destination bytes; split the overlap where the score flips.
    if st.last_scan + lenf > st.scan - lenb {
        let overlap = (st.last_scan + lenf) - (st.scan - lenb);
        let mut score: i64 = 0;
        let mut best: i64 = 0;
        let mut split = 0;
        for i in 0..overlap {
            if dst[st.last_scan + lenf - overlap + i] == src[st.last_pos + lenf - overlap + i] {
                score += 1;
            }
            if dst[st.scan - lenb + i] == src[st.pos - lenb + i] {
                score -= 1;
            }
            if score > best {
                best = score;
                split = i + 1;
            }
        }
        lenf = lenf + split - overlap;
        lenb -= split;
    }

    for i in 0..lenf {
        plan.diff
            .push(dst[st.last_scan + i].wrapping_sub(src[st.last_pos + i]));
    }
    let extra_start = st.last_scan + lenf;
    let extra_end = st.scan - lenb;
    plan.extra.extend_from_slice(&dst[extra_start..extra_end]);

    // The trailing tuple's seek repositions nothing; keep it zero.
    let seek = if st.scan == dst.len() {
        0
    } else {
        (st.pos - lenb) as i64 - (st.last_pos + lenf) as i64
    };

    plan.tuples.push(ControlTuple {
        diff_len: lenf as u64,
        extra_len: (extra_end - extra_start) as u64,
        seek,
    });

    lenb
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn check_accounting(plan: &PatchPlan, dst: &[u8]) {
        let diff_total: u64 = plan.tuples.iter().map(|t| t.diff_len).sum();
        let extra_total: u64 = plan.tuples.iter().map(|t| t.extra_len).sum();
        assert_eq!(diff_total, plan.diff.len() as u64);
        assert_eq!(extra_total, plan.extra.len() as u64);
        assert_eq!(diff_total + extra_total, dst.len() as u64);
        assert_eq!(plan.dst_len, dst.len() as u64);
    }

    #[test]
    fn identical_buffers_yield_single_zero_tuple() {
        let data = b"same bytes on both sides of the delta";
        let plan = diff_plan(data, data);
        check_accounting(&plan, data);
        assert_eq!(
            plan.tuples,
            vec![ControlTuple {
                diff_len: data.len() as u64,
                extra_len: 0,
                seek: 0,
            }]
        );
        assert!(plan.diff.iter().all(|&b| b == 0));
        assert!(plan.extra.is_empty());
    }

    #[test]
    fn empty_source_is_pure_insertion() {
        let dst = b"everything here is literal";
        let plan = diff_plan(b"", dst);
        check_accounting(&plan, dst);
        assert!(plan.tuples.iter().all(|t| t.diff_len == 0));
        assert_eq!(plan.extra, dst);
        assert!(plan.diff.is_empty());
    }

    #[test]
    fn empty_destination_yields_empty_plan() {
        let plan = diff_plan(b"some source", b"");
        assert!(plan.tuples.is_empty());
        assert!(plan.diff.is_empty());
        assert!(plan.extra.is_empty());
        assert_eq!(plan.dst_len, 0);
    }

    #[test]
    fn both_empty() {
        let plan = diff_plan(b"", b"");
        assert!(plan.tuples.is_empty());
        assert_eq!(plan.dst_len, 0);
    }

    #[test]
    fn hello_world_to_hello_there() {
        let src = b"hello world";
        let dst = b"hello there";
        let plan = diff_plan(src, dst);
        check_accounting(&plan, dst);

        // The common prefix "hello " is a 6-byte copy; "there" is a
        // literal insertion with an empty tail.
        let first = plan.tuples[0];
        assert_eq!(first.diff_len, 6);
        assert_eq!(first.extra_len, 5);
        assert_eq!(&plan.diff[..6], &[0, 0, 0, 0, 0, 0]);
        assert_eq!(&plan.extra, b"there");
    }

    #[test]
    fn disjoint_buffers_degrade_to_literals() {
        let src = vec![0x11u8; 64];
        let dst = vec![0xEEu8; 64];
        let plan = diff_plan(&src, &dst);
        check_accounting(&plan, &dst);
        assert!(plan.diff.is_empty());
        assert_eq!(plan.extra, dst);
    }

    #[test]
    fn accounting_holds_for_mixed_edits() {
        let src: Vec<u8> = (0..=255u8).cycle().take(2048).collect();
        let mut dst = src.clone();
        dst[100] = 0xFF;
        dst.splice(700..700, b"inserted run of bytes".iter().copied());
        dst.truncate(1500);
        let plan = diff_plan(&src, &dst);
        check_accounting(&plan, &dst);
        assert!(plan.tuples.len() >= 1);
    }

    #[test]
    fn repeated_pattern_with_insertion() {
        // Many equal-length match candidates in the source; the scan
        // must still produce a consistent plan.
        let src: Vec<u8> = b"WXYZ".iter().copied().cycle().take(4096).collect();
        let mut dst = src.clone();
        dst.insert(2048, 0x00);
        let plan = diff_plan(&src, &dst);
        check_accounting(&plan, &dst);
    }
}
