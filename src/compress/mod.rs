// Sliding-window LZSS codec for patch stream segments.
//
// The container compresses every segment (control records, diff slices,
// extra slices) independently through this codec:
//
// - `encoder` — one-shot compression into an MSB-first bit stream
// - `decoder` — incremental segment decoder (drives boundary probing)
//
// The bit stream is heatshrink-shaped: a `1` flag bit introduces an
// 8-bit literal, a `0` flag bit introduces a back-reference of
// `window_sz2` distance bits and `lookahead_sz2` length bits. Decoding
// is a pure function of the compressed prefix consumed so far, and the
// decoded output grows monotonically with that prefix — the two
// properties the container's self-delimiting format depends on.

pub mod decoder;
pub mod encoder;

pub use decoder::{SegmentDecoder, decompress};
pub use encoder::compress;

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Codec parameters, shared by producer and consumer.
///
/// Both sides of a patch exchange must use the same parameters; the
/// format stores no negotiation fields, so a mismatch surfaces as a
/// truncated or malformed patch rather than a distinct error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    /// Base-2 log of the sliding window size, in `4..=15`.
    pub window_sz2: u8,
    /// Base-2 log of the maximum match length, in `3..window_sz2`.
    pub lookahead_sz2: u8,
}

impl Params {
    pub const DEFAULT_WINDOW_SZ2: u8 = 10;
    pub const DEFAULT_LOOKAHEAD_SZ2: u8 = 4;

    pub const MIN_WINDOW_SZ2: u8 = 4;
    pub const MAX_WINDOW_SZ2: u8 = 15;
    // Keeps the smallest token (1 + window_sz2 + lookahead_sz2 bits) at
    // least one byte wide, so flush padding can never form a token.
    pub const MIN_LOOKAHEAD_SZ2: u8 = 3;

    /// Create validated parameters.
    pub fn new(window_sz2: u8, lookahead_sz2: u8) -> Result<Self, InvalidParams> {
        if !(Self::MIN_WINDOW_SZ2..=Self::MAX_WINDOW_SZ2).contains(&window_sz2) {
            return Err(InvalidParams::Window(window_sz2));
        }
        if lookahead_sz2 < Self::MIN_LOOKAHEAD_SZ2 || lookahead_sz2 >= window_sz2 {
            return Err(InvalidParams::Lookahead(lookahead_sz2));
        }
        Ok(Self {
            window_sz2,
            lookahead_sz2,
        })
    }

    /// Sliding window size in bytes.
    #[inline]
    pub fn window_size(&self) -> usize {
        1 << self.window_sz2
    }

    /// Maximum back-reference length in bytes.
    #[inline]
    pub fn max_match(&self) -> usize {
        1 << self.lookahead_sz2
    }

    /// Bit cost of a back-reference token.
    #[inline]
    pub(crate) fn backref_bits(&self) -> usize {
        1 + self.window_sz2 as usize + self.lookahead_sz2 as usize
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            window_sz2: Self::DEFAULT_WINDOW_SZ2,
            lookahead_sz2: Self::DEFAULT_LOOKAHEAD_SZ2,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Out-of-range codec parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidParams {
    Window(u8),
    Lookahead(u8),
}

impl std::fmt::Display for InvalidParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Window(v) => write!(
                f,
                "window_sz2 {v} out of range {}..={}",
                Params::MIN_WINDOW_SZ2,
                Params::MAX_WINDOW_SZ2
            ),
            Self::Lookahead(v) => write!(
                f,
                "lookahead_sz2 {v} out of range {}..window_sz2",
                Params::MIN_LOOKAHEAD_SZ2
            ),
        }
    }
}

impl std::error::Error for InvalidParams {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
