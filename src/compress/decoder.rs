// Incremental LZSS segment decoding.
//
// SegmentDecoder is the boundary-probing state machine: the container
// feeds it one compressed byte at a time and watches the decoded length
// until a segment's known uncompressed size is reached. Feeding byte by
// byte is equivalent to re-decoding a growing prefix from scratch
// (decoding is a pure function of the consumed prefix), but runs in a
// single streaming pass.
//
// Bits left over after the last complete token are flush padding and
// produce no output.

use super::Params;

// ---------------------------------------------------------------------------
// SegmentDecoder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Expecting a 1-bit token tag.
    Tag,
    /// Expecting 8 literal bits.
    Literal,
    /// Expecting `window_sz2` distance bits.
    BackrefDist,
    /// Expecting `lookahead_sz2` length bits.
    BackrefLen,
}

/// Streaming decoder for one compressed segment.
pub struct SegmentDecoder {
    params: Params,
    acc: u64,
    nbits: u32,
    state: State,
    /// Distance of the back-reference currently being parsed.
    dist: usize,
    out: Vec<u8>,
}

impl SegmentDecoder {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            acc: 0,
            nbits: 0,
            state: State::Tag,
            dist: 0,
            out: Vec::new(),
        }
    }

    /// Number of decoded bytes produced so far. Monotonically
    /// non-decreasing across `feed` calls.
    #[inline]
    pub fn output_len(&self) -> usize {
        self.out.len()
    }

    /// Decoded bytes produced so far.
    pub fn output(&self) -> &[u8] {
        &self.out
    }

    /// Consume the decoder, returning the decoded bytes.
    pub fn into_output(self) -> Vec<u8> {
        self.out
    }

    /// Feed one compressed byte, emitting any tokens it completes.
    pub fn feed(&mut self, byte: u8) -> Result<(), CorruptSegment> {
        self.acc = (self.acc << 8) | u64::from(byte);
        self.nbits += 8;

        loop {
            match self.state {
                State::Tag => {
                    let Some(tag) = self.take(1) else { return Ok(()) };
                    self.state = if tag == 1 {
                        State::Literal
                    } else {
                        State::BackrefDist
                    };
                }
                State::Literal => {
                    let Some(b) = self.take(8) else { return Ok(()) };
                    self.out.push(b as u8);
                    self.state = State::Tag;
                }
                State::BackrefDist => {
                    let Some(d) = self.take(self.params.window_sz2 as u32) else {
                        return Ok(());
                    };
                    self.dist = d as usize + 1;
                    self.state = State::BackrefLen;
                }
                State::BackrefLen => {
                    let Some(l) = self.take(self.params.lookahead_sz2 as u32) else {
                        return Ok(());
                    };
                    let len = l as usize + 1;
                    if self.dist > self.out.len() {
                        return Err(CorruptSegment {
                            dist: self.dist,
                            available: self.out.len(),
                        });
                    }
                    // Byte-at-a-time copy: distances shorter than the
                    // length replicate recent output (RLE-style).
                    for _ in 0..len {
                        let b = self.out[self.out.len() - self.dist];
                        self.out.push(b);
                    }
                    self.state = State::Tag;
                }
            }
        }
    }

    /// Take `count` bits from the accumulator, MSB-first, or `None` if
    /// not enough bits have been fed yet.
    #[inline]
    fn take(&mut self, count: u32) -> Option<u64> {
        if self.nbits < count {
            return None;
        }
        self.nbits -= count;
        Some((self.acc >> self.nbits) & ((1 << count) - 1))
    }
}

// ---------------------------------------------------------------------------
// One-shot decompression
// ---------------------------------------------------------------------------

/// Decompress a complete compressed block.
pub fn decompress(input: &[u8], params: Params) -> Result<Vec<u8>, CorruptSegment> {
    let mut dec = SegmentDecoder::new(params);
    for &b in input {
        dec.feed(b)?;
    }
    Ok(dec.into_output())
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A back-reference pointed before the start of the decoded output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorruptSegment {
    pub dist: usize,
    pub available: usize,
}

impl std::fmt::Display for CorruptSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "back-reference distance {} exceeds decoded output ({} bytes)",
            self.dist, self.available
        )
    }
}

impl std::error::Error for CorruptSegment {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compress::compress;

    #[test]
    fn empty_input_decodes_to_empty() {
        assert!(decompress(b"", Params::default()).unwrap().is_empty());
    }

    #[test]
    fn feed_matches_one_shot() {
        let params = Params::default();
        let packed = compress(b"incremental == one-shot, incremental == one-shot", params);

        let mut dec = SegmentDecoder::new(params);
        for &b in &packed {
            dec.feed(b).unwrap();
        }
        assert_eq!(dec.output(), decompress(&packed, params).unwrap());
    }

    #[test]
    fn output_grows_monotonically_over_prefixes() {
        let params = Params::default();
        let data = b"abcabcabcabc hello hello hello world world";
        let packed = compress(data, params);
        let full = decompress(&packed, params).unwrap();

        let mut prev_len = 0;
        for n in 0..=packed.len() {
            let partial = decompress(&packed[..n], params).unwrap();
            assert!(partial.len() >= prev_len, "output shrank at prefix {n}");
            assert_eq!(&full[..partial.len()], &partial[..], "prefix {n} diverged");
            prev_len = partial.len();
        }
        assert_eq!(prev_len, data.len());
    }

    #[test]
    fn every_proper_prefix_is_short() {
        // The final byte always carries bits of the last token, so no
        // proper prefix may already reach the full decoded length.
        let params = Params::default();
        let data = b"prefix-exactness is what makes probing unambiguous";
        let packed = compress(data, params);
        for n in 0..packed.len() {
            let partial = decompress(&packed[..n], params).unwrap();
            assert!(partial.len() < data.len(), "prefix {n} already complete");
        }
    }

    #[test]
    fn backref_before_output_start_is_rejected() {
        // 0x00 0x00: tag=0, dist bits all zero -> dist 1 with no output.
        let err = decompress(&[0x00, 0x00], Params::default()).unwrap_err();
        assert_eq!(err.dist, 1);
        assert_eq!(err.available, 0);
    }

    #[test]
    fn trailing_pad_bits_produce_no_output() {
        let params = Params::default();
        let data = b"zzz";
        let packed = compress(data, params);
        let decoded = decompress(&packed, params).unwrap();
        assert_eq!(decoded, data);
    }
}
