//! Bsdiffhs: BSDIFFHS binary diff/patch in Rust.
//!
//! Computes binary deltas between two byte buffers with a
//! suffix-array longest-match search, and serializes them as compact
//! patch streams whose segments are independently LZSS-compressed.
//! Aimed at embedded/firmware update flows where patches must be small
//! and applicable with bounded memory.
//!
//! The crate provides:
//! - Buffer-level `diff`/`patch` (`engine`)
//! - The delta scan and patch plan model (`delta`, `apply`, `suffix`)
//! - The self-delimiting container format (`container`)
//! - The segment codec (`compress`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use bsdiffhs::{Params, diff, patch};
//!
//! let source = b"hello world";
//! let target = b"hello there";
//!
//! let stream = diff(source, target, Params::default());
//! let rebuilt = patch(source, &stream, Params::default()).unwrap();
//! assert_eq!(rebuilt, target);
//! ```

pub mod apply;
pub mod compress;
pub mod container;
pub mod delta;
pub mod engine;
pub mod error;
pub mod io;
pub mod suffix;

#[cfg(feature = "cli")]
pub mod cli;

pub use compress::Params;
pub use delta::{ControlTuple, PatchPlan};
pub use engine::{diff, patch};
pub use error::PatchError;
