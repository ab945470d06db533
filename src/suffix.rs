// Suffix-array index over the source buffer.
//
// Built once per diff call and discarded with it. Construction is
// prefix-doubling rank sort (O(n log^2 n)); the order satisfies
// `source[sa[i]..] <= source[sa[i+1]..]` for all adjacent pairs.
// `search` binary-searches that order for the longest common prefix
// with a destination suffix.

/// A located match in the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Start position in the source.
    pub pos: usize,
    /// Number of matching bytes.
    pub len: usize,
}

/// Sorted suffix ordering over one source buffer.
pub struct SuffixIndex<'a> {
    source: &'a [u8],
    sa: Vec<u32>,
}

#[inline]
fn pair_key(rank: &[u32], i: usize, k: usize) -> (u32, u32) {
    // Second component is rank of the suffix k positions later, shifted
    // by one so that "past the end" sorts before every real rank.
    let second = if i + k < rank.len() { rank[i + k] + 1 } else { 0 };
    (rank[i], second)
}

#[inline]
fn common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

impl<'a> SuffixIndex<'a> {
    /// Sort all suffix start positions of `source` by suffix content.
    pub fn build(source: &'a [u8]) -> Self {
        let n = source.len();
        let mut sa: Vec<u32> = (0..n as u32).collect();
        let mut rank: Vec<u32> = source.iter().map(|&b| u32::from(b)).collect();
        let mut next: Vec<u32> = vec![0; n];

        let mut k = 1;
        while k < n {
            sa.sort_unstable_by_key(|&i| pair_key(&rank, i as usize, k));

            next[sa[0] as usize] = 0;
            for w in 1..n {
                let prev = sa[w - 1] as usize;
                let cur = sa[w] as usize;
                let bump = u32::from(pair_key(&rank, cur, k) != pair_key(&rank, prev, k));
                next[cur] = next[prev] + bump;
            }
            std::mem::swap(&mut rank, &mut next);

            // All ranks distinct: the order is final.
            if rank[sa[n - 1] as usize] as usize == n - 1 {
                break;
            }
            k <<= 1;
        }

        Self { source, sa }
    }

    #[inline]
    fn suffix(&self, idx: u32) -> &[u8] {
        &self.source[idx as usize..]
    }

    /// Longest common prefix between `query` and any source suffix.
    ///
    /// Among equally long matches the binary search exposes two
    /// neighboring candidates; ties between them go to the position
    /// closest to `preferred`, which keeps downstream seek values small.
    /// An empty source yields a zero-length match.
    pub fn search(&self, query: &[u8], preferred: usize) -> Match {
        if self.sa.is_empty() {
            return Match { pos: 0, len: 0 };
        }

        let mut lo = 0;
        let mut hi = self.sa.len() - 1;
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            let suf = self.suffix(self.sa[mid]);
            let n = suf.len().min(query.len());
            if suf[..n] < query[..n] {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        let a = self.sa[lo] as usize;
        let b = self.sa[hi] as usize;
        let a_len = common_prefix(&self.source[a..], query);
        let b_len = common_prefix(&self.source[b..], query);

        if a_len > b_len {
            Match { pos: a, len: a_len }
        } else if b_len > a_len {
            Match { pos: b, len: b_len }
        } else if a.abs_diff(preferred) <= b.abs_diff(preferred) {
            Match { pos: a, len: a_len }
        } else {
            Match { pos: b, len: b_len }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
