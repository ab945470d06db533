// Error taxonomy for patch reading and application.
//
// All three format errors are non-retryable and surfaced distinctly:
// a reconstructed buffer is either byte-exact or not returned at all.

use std::io;

use thiserror::Error;

/// Errors produced while reading or applying a BSDIFFHS patch.
#[derive(Debug, Error)]
pub enum PatchError {
    /// The header tag does not match — the input is not a patch of this
    /// format.
    #[error("bad magic: input is not a BSDIFFHS patch")]
    BadMagic,

    /// The stream ended before a segment or control record was fully
    /// decodable — corrupt or incomplete transfer.
    #[error("truncated patch: {0}")]
    TruncatedPatch(&'static str),

    /// Structurally parseable but arithmetically inconsistent: cursor
    /// arithmetic would read outside source bounds, streams run short, or
    /// the reconstructed length disagrees with the declared one.
    #[error("malformed patch: {0}")]
    MalformedPatch(String),

    /// I/O error from file-oriented helpers.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl PatchError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedPatch(msg.into())
    }
}
