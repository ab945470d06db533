// One-shot LZSS segment compression.
//
// Tokens are written MSB-first into a bit stream:
//   1 + bbbbbbbb                      literal byte
//   0 + d{window_sz2} + l{lookahead_sz2}   back-reference (dist-1, len-1)
//
// Match search uses a per-byte chain index (most recent prior position
// of each byte value), the same scheme heatshrink's indexed encoder
// uses. An empty input produces an empty output block; the container
// relies on this for zero-length extra segments.

use super::Params;

/// Sentinel for "no previous occurrence" in the chain index.
const NO_POS: u32 = u32::MAX;

// ---------------------------------------------------------------------------
// Bit writer
// ---------------------------------------------------------------------------

struct BitWriter {
    out: Vec<u8>,
    acc: u64,
    nbits: u32,
}

impl BitWriter {
    fn new() -> Self {
        Self {
            out: Vec::new(),
            acc: 0,
            nbits: 0,
        }
    }

    /// Append the low `count` bits of `value`, most significant first.
    #[inline]
    fn push(&mut self, value: u32, count: u32) {
        debug_assert!(count <= 32);
        self.acc = (self.acc << count) | u64::from(value);
        self.nbits += count;
        while self.nbits >= 8 {
            self.nbits -= 8;
            self.out.push((self.acc >> self.nbits) as u8);
        }
    }

    /// Flush the final partial byte, zero-padded in the low bits.
    ///
    /// The pad is at most 7 bits and the smallest token is 8 bits wide,
    /// so a decoder can never mistake the pad for another token.
    fn finish(mut self) -> Vec<u8> {
        if self.nbits > 0 {
            let pad = 8 - self.nbits;
            self.out.push(((self.acc << pad) & 0xFF) as u8);
        }
        self.out
    }
}

// ---------------------------------------------------------------------------
// Match search
// ---------------------------------------------------------------------------

struct ChainIndex {
    /// Most recent position seen for each byte value.
    head: [u32; 256],
    /// Previous position with the same leading byte, per position.
    prev: Vec<u32>,
}

impl ChainIndex {
    fn new(len: usize) -> Self {
        Self {
            head: [NO_POS; 256],
            prev: vec![NO_POS; len],
        }
    }

    #[inline]
    fn insert(&mut self, input: &[u8], pos: usize) {
        let b = input[pos] as usize;
        self.prev[pos] = self.head[b];
        self.head[b] = pos as u32;
    }

    /// Find the longest match for `input[pos..]` within the sliding
    /// window, up to `max_len` bytes. Returns `(distance, length)`.
    fn longest_match(&self, input: &[u8], pos: usize, params: Params) -> (usize, usize) {
        let max_len = params.max_match().min(input.len() - pos);
        let window_start = pos.saturating_sub(params.window_size());

        let mut best_len = 0;
        let mut best_dist = 0;
        let mut cand = self.head[input[pos] as usize];

        while cand != NO_POS && cand as usize >= window_start {
            let c = cand as usize;
            // Overlapping matches are fine: the decoder copies forward
            // one byte at a time.
            let mut len = 0;
            while len < max_len && input[c + len] == input[pos + len] {
                len += 1;
            }
            if len > best_len {
                best_len = len;
                best_dist = pos - c;
                if best_len == max_len {
                    break;
                }
            }
            cand = self.prev[c];
        }

        (best_dist, best_len)
    }
}

// ---------------------------------------------------------------------------
// Compression
// ---------------------------------------------------------------------------

/// Compress `input` into a self-contained bit stream.
///
/// Deterministic for a given `(input, params)` pair; `compress(b"", _)`
/// is the empty byte string.
pub fn compress(input: &[u8], params: Params) -> Vec<u8> {
    let mut bits = BitWriter::new();
    let mut index = ChainIndex::new(input.len());
    let mut pos = 0;

    while pos < input.len() {
        let (dist, len) = index.longest_match(input, pos, params);

        // A back-reference must beat the literal encoding of the same
        // span (9 bits per literal byte).
        if len * 9 > params.backref_bits() {
            bits.push(0, 1);
            bits.push((dist - 1) as u32, params.window_sz2 as u32);
            bits.push((len - 1) as u32, params.lookahead_sz2 as u32);
            for p in pos..pos + len {
                index.insert(input, p);
            }
            pos += len;
        } else {
            bits.push(1, 1);
            bits.push(input[pos] as u32, 8);
            index.insert(input, pos);
            pos += 1;
        }
    }

    bits.finish()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
