// File-level helpers for diffing and patching.
//
// Buffers are read fully into memory: the suffix index needs the whole
// source, and the container's boundary probing walks the whole patch.
// Output files are written only after reconstruction succeeds, so a
// failed patch never leaves partial output behind.

use std::fs;
use std::path::Path;

use log::debug;

use crate::compress::Params;
use crate::container;
use crate::delta;
use crate::error::PatchError;
use crate::{apply, engine};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `diff_file()`.
#[derive(Debug, Clone)]
pub struct DiffStats {
    /// Source file size in bytes.
    pub source_size: u64,
    /// Destination file size in bytes.
    pub target_size: u64,
    /// Patch output size in bytes.
    pub patch_size: u64,
    /// Number of control tuples in the patch.
    pub tuples: u64,
}

/// Statistics returned by `patch_file()` and `patch_file_in_place()`.
#[derive(Debug, Clone)]
pub struct PatchStats {
    /// Source size in bytes.
    pub source_size: u64,
    /// Patch file size in bytes.
    pub patch_size: u64,
    /// Reconstructed output size in bytes.
    pub output_size: u64,
    /// Number of control tuples applied.
    pub tuples: u64,
}

// ---------------------------------------------------------------------------
// diff_file
// ---------------------------------------------------------------------------

/// Diff two files, writing a BSDIFFHS patch to `patch_path`.
pub fn diff_file(
    source_path: &Path,
    target_path: &Path,
    patch_path: &Path,
    params: Params,
) -> Result<DiffStats, PatchError> {
    let source = fs::read(source_path)?;
    let target = fs::read(target_path)?;

    let plan = delta::diff_plan(&source, &target);
    let tuples = plan.tuples.len() as u64;
    let stream = container::write_patch(&plan, params);
    fs::write(patch_path, &stream)?;

    debug!(
        "diff_file: {} -> {} ({} tuples, {} B patch)",
        source_path.display(),
        target_path.display(),
        tuples,
        stream.len()
    );

    Ok(DiffStats {
        source_size: source.len() as u64,
        target_size: target.len() as u64,
        patch_size: stream.len() as u64,
        tuples,
    })
}

// ---------------------------------------------------------------------------
// patch_file
// ---------------------------------------------------------------------------

/// Apply a BSDIFFHS patch file to `source_path`, writing the
/// reconstructed destination to `output_path`.
pub fn patch_file(
    source_path: &Path,
    patch_path: &Path,
    output_path: &Path,
    params: Params,
) -> Result<PatchStats, PatchError> {
    let source = fs::read(source_path)?;
    let stream = fs::read(patch_path)?;

    let plan = container::read_patch(&stream, params)?;
    let tuples = plan.tuples.len() as u64;
    let output = apply::apply(&source, &plan)?;
    fs::write(output_path, &output)?;

    Ok(PatchStats {
        source_size: source.len() as u64,
        patch_size: stream.len() as u64,
        output_size: output.len() as u64,
        tuples,
    })
}

/// Apply a BSDIFFHS patch file to `path` in place.
///
/// The file is rewritten with the reconstructed destination only after
/// the whole reconstruction has succeeded.
pub fn patch_file_in_place(
    path: &Path,
    patch_path: &Path,
    params: Params,
) -> Result<PatchStats, PatchError> {
    let source = fs::read(path)?;
    let stream = fs::read(patch_path)?;

    let plan = container::read_patch(&stream, params)?;
    let tuples = plan.tuples.len() as u64;
    let output = apply::apply(&source, &plan)?;
    fs::write(path, &output)?;

    Ok(PatchStats {
        source_size: source.len() as u64,
        patch_size: stream.len() as u64,
        output_size: output.len() as u64,
        tuples,
    })
}

/// Convenience: in-memory diff matching `diff_file`'s parameters.
pub fn diff_bytes(source: &[u8], target: &[u8], params: Params) -> Vec<u8> {
    engine::diff(source, target, params)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
