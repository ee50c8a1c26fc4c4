//! Mirror report models and mutable report builder.

use std::fmt;
use std::path::PathBuf;

/// One file copy, performed or (in dry-run) planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecMirrorAction {
    /// Absolute or root-joined source file.
    pub path_file_src: PathBuf,
    /// Destination relative to the install root, used for display.
    pub path_display_dst: PathBuf,
}

impl fmt::Display for SpecMirrorAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cp {} {}",
            self.path_file_src.display(),
            self.path_display_dst.display()
        )
    }
}

/// Aggregate counters and diagnostics for one mirror run.
#[derive(Debug, Default, Clone)]
pub struct ReportMirror {
    /// Total listed source entries.
    pub cnt_scanned: u64,
    /// Number of regular files that matched the filter.
    pub cnt_matched: u64,
    /// Number of files copied (or planned, in dry-run).
    pub cnt_copied: u64,
    /// Number of matched files left untouched because content was identical.
    pub cnt_skipped: u64,
    /// Non-fatal notes collected during listing.
    pub warnings: Vec<String>,
}

impl ReportMirror {
    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} scanned={} matched={} copied={} skipped={} warnings={}",
            self.cnt_scanned,
            self.cnt_matched,
            self.cnt_copied,
            self.cnt_skipped,
            self.warning_count()
        )
    }
}

impl fmt::Display for ReportMirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[MIRROR]"))
    }
}

/// Mutable accumulator for mirror statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportMirrorBuilder {
    /// See [`ReportMirror::cnt_scanned`].
    pub cnt_scanned: u64,
    /// See [`ReportMirror::cnt_matched`].
    pub cnt_matched: u64,
    /// See [`ReportMirror::cnt_copied`].
    pub cnt_copied: u64,
    /// See [`ReportMirror::cnt_skipped`].
    pub cnt_skipped: u64,
    /// See [`ReportMirror::warnings`].
    pub warnings: Vec<String>,
}

impl ReportMirrorBuilder {
    pub fn add_scanned(&mut self) {
        self.cnt_scanned += 1;
    }

    pub fn add_matched(&mut self) {
        self.cnt_matched += 1;
    }

    pub fn add_skipped(&mut self) {
        self.cnt_skipped += 1;
    }

    pub fn add_copied(&mut self) {
        self.cnt_copied += 1;
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportMirror {
        ReportMirror {
            cnt_scanned: self.cnt_scanned,
            cnt_matched: self.cnt_matched,
            cnt_copied: self.cnt_copied,
            cnt_skipped: self.cnt_skipped,
            warnings: self.warnings,
        }
    }
}
