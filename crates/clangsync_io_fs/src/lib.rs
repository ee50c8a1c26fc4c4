//! `clangsync_io_fs` v1:
//! Rust-side mirror engine for libclang headers, sources and bindings.
//!
//! Module layout:
//! - `mirror` : per-pair listing, comparison and copy orchestration
//! - `spec`   : enums/options/mapping table/errors
//! - `report` : run-time report model
//! - `util`   : shared helper functions

pub mod mirror;
pub mod report;
pub mod spec;
mod util;

pub use mirror::{mirror_llvm_checkout, mirror_pairs};
pub use report::{ReportMirror, ReportMirrorBuilder, SpecMirrorAction};
pub use spec::{
    EnumMirrorPatternMode, LLVM_FILE_PATTERNS, LLVM_MIRROR_PAIRS, LLVM_REQUIRED_SUBPATH,
    MirrorError, SpecMirrorOptions, SpecMirrorPair,
};
pub use util::SpecMirrorFilter;
