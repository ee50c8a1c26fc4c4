//! Mirror specification models and top-level error types.

use std::fmt;
use std::path::{Path, PathBuf};

////////////////////////////////////////////////////////////////////////////////
// #region Constants

/// Subpath that must exist under the LLVM checkout root.
pub const LLVM_REQUIRED_SUBPATH: &str = "tools/clang";

/// Ordered `(source, destination)` pairs.
///
/// Sources are relative to `<llvm-dir>/tools/clang`, destinations to the
/// install root.
pub const LLVM_MIRROR_PAIRS: [(&str, &str); 4] = [
    ("bindings/python/clang", "."),
    ("include/clang-c", "clang-c"),
    ("tools/libclang", "src"),
    (".", "."),
];

/// Glob patterns selecting headers, sources, python bindings and the license.
pub const LLVM_FILE_PATTERNS: [&str; 4] = ["*.h", "*.cpp", "*.py", "LICENSE.TXT"];

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Pattern matching mode for the file filter.
///
/// Matching is applied to the entry basename and is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumMirrorPatternMode {
    /// Shell-like wildcards (`*`, `?`, character classes).
    Glob,
    /// Regular expression pattern.
    Regex,
    /// Exact string match.
    Literal,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// One `(source subdirectory -> destination subdirectory)` mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecMirrorPair {
    /// Directory whose immediate entries are mirrored, relative to the source root.
    pub dir_source_sub: PathBuf,
    /// Directory receiving the entries, relative to the install root.
    pub dir_destination_sub: PathBuf,
}

impl SpecMirrorPair {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(dir_source_sub: P, dir_destination_sub: Q) -> Self {
        Self {
            dir_source_sub: dir_source_sub.as_ref().to_path_buf(),
            dir_destination_sub: dir_destination_sub.as_ref().to_path_buf(),
        }
    }

    /// The fixed LLVM mapping table as owned pairs.
    pub fn llvm_defaults() -> Vec<Self> {
        LLVM_MIRROR_PAIRS
            .iter()
            .map(|(src, dst)| Self::new(src, dst))
            .collect()
    }
}

/// Input options for `mirror_llvm_checkout`.
#[derive(Debug, Clone)]
pub struct SpecMirrorOptions {
    /// Include patterns applied to file basename.
    pub patterns_include_files: Vec<String>,
    /// Pattern interpretation mode.
    pub rule_pattern: EnumMirrorPatternMode,
    /// Do not mutate filesystem; record what would happen.
    pub if_dry_run: bool,
}

impl Default for SpecMirrorOptions {
    fn default() -> Self {
        Self {
            patterns_include_files: LLVM_FILE_PATTERNS.iter().map(|p| p.to_string()).collect(),
            rule_pattern: EnumMirrorPatternMode::Glob,
            if_dry_run: false,
        }
    }
}

/// Errors that abort a mirror run. There is no partial-failure recovery.
#[derive(Debug)]
pub enum MirrorError {
    /// Required subpath missing under the source root.
    MissingRequiredSubpath(PathBuf),
    /// Required subpath exists but is not a directory.
    RequiredSubpathNotDirectory(PathBuf),
    /// Invalid include pattern.
    InvalidPattern(String),
    /// Destination subdirectory could not be created.
    DestinationInitFailed {
        /// Destination directory that failed initialization.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
    /// Source subdirectory could not be listed.
    SourceReadFailed {
        /// Source directory being listed.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
    /// A non-file occupies the destination file path.
    DestinationNotFile(PathBuf),
    /// Source/destination content comparison failed.
    CompareFailed {
        /// Destination path being compared.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
    /// Copy primitive failed.
    CopyFailed {
        /// Source file.
        source: PathBuf,
        /// Destination file.
        destination: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
}

impl fmt::Display for MirrorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequiredSubpath(path) => {
                write!(f, "Required directory does not exist: {}", path.display())
            }
            Self::RequiredSubpathNotDirectory(path) => {
                write!(f, "Required path is not a directory: {}", path.display())
            }
            Self::InvalidPattern(msg) => write!(f, "{msg}"),
            Self::DestinationInitFailed { path, message } => {
                write!(
                    f,
                    "Failed to initialize destination {}: {message}",
                    path.display()
                )
            }
            Self::SourceReadFailed { path, message } => {
                write!(f, "Failed to read directory {}: {message}", path.display())
            }
            Self::DestinationNotFile(path) => {
                write!(f, "Destination is not a regular file: {}", path.display())
            }
            Self::CompareFailed { path, message } => {
                write!(f, "Failed to compare {}: {message}", path.display())
            }
            Self::CopyFailed {
                source,
                destination,
                message,
            } => write!(
                f,
                "Failed to copy {} -> {}: {message}",
                source.display(),
                destination.display()
            ),
        }
    }
}

impl std::error::Error for MirrorError {}

// #endregion
////////////////////////////////////////////////////////////////////////////////
