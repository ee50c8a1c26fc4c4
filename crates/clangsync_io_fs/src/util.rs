use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

use globset::{Glob, GlobMatcher};
use regex::bytes::Regex;

use crate::spec::{EnumMirrorPatternMode, MirrorError};

const N_COMPARE_CHUNK_BYTES: usize = 64 * 1024;

////////////////////////////////////////////////////////////////////////////////
// #region PatternMatching

#[derive(Debug, Clone)]
enum TypeMirrorPatternSeq {
    Literal(Vec<String>),
    Glob(Vec<GlobMatcher>),
    Regex(Vec<Regex>),
}

/// Compiled filename filter. Matches raw basenames only, case-sensitively.
///
/// Names need not be valid UTF-8; regex mode matches the encoded bytes.
#[derive(Debug, Clone)]
pub struct SpecMirrorFilter {
    patterns_include_files: TypeMirrorPatternSeq,
}

impl SpecMirrorFilter {
    /// Compile raw patterns under `rule_pattern`.
    ///
    /// An empty pattern list yields a filter that matches nothing.
    pub fn from_raw<S: AsRef<str>>(
        patterns: &[S],
        rule_pattern: EnumMirrorPatternMode,
    ) -> Result<Self, MirrorError> {
        let patterns_include_files = match rule_pattern {
            EnumMirrorPatternMode::Literal => TypeMirrorPatternSeq::Literal(
                patterns.iter().map(|p| p.as_ref().to_string()).collect(),
            ),
            EnumMirrorPatternMode::Glob => {
                let mut l_glob = Vec::with_capacity(patterns.len());
                for pattern in patterns {
                    let matcher = Glob::new(pattern.as_ref())
                        .map_err(|e| {
                            MirrorError::InvalidPattern(format!("Invalid file pattern: {e}"))
                        })?
                        .compile_matcher();
                    l_glob.push(matcher);
                }
                TypeMirrorPatternSeq::Glob(l_glob)
            }
            EnumMirrorPatternMode::Regex => {
                let mut l_regex = Vec::with_capacity(patterns.len());
                for pattern in patterns {
                    let regex = Regex::new(pattern.as_ref()).map_err(|e| {
                        MirrorError::InvalidPattern(format!("Invalid file pattern: {e}"))
                    })?;
                    l_regex.push(regex);
                }
                TypeMirrorPatternSeq::Regex(l_regex)
            }
        };
        Ok(Self {
            patterns_include_files,
        })
    }

    pub fn is_match<S: AsRef<OsStr>>(&self, name: S) -> bool {
        let name = name.as_ref();
        match &self.patterns_include_files {
            TypeMirrorPatternSeq::Literal(v) => v.iter().any(|p| name == p.as_str()),
            TypeMirrorPatternSeq::Glob(v) => v.iter().any(|p| p.is_match(name)),
            TypeMirrorPatternSeq::Regex(v) => {
                let raw_name = name.as_encoded_bytes();
                v.iter().any(|p| p.is_match(raw_name))
            }
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ContentComparison

fn _read_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut n_filled = 0;
    while n_filled < buf.len() {
        match reader.read(&mut buf[n_filled..]) {
            Ok(0) => break,
            Ok(n) => n_filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(n_filled)
}

/// Byte-for-byte equality of two files.
///
/// Returns `Ok(false)` when `path_file_dst` does not exist.
pub(crate) fn is_same_content(path_file_src: &Path, path_file_dst: &Path) -> io::Result<bool> {
    let meta_dst = match fs::metadata(path_file_dst) {
        Ok(v) => v,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    let meta_src = fs::metadata(path_file_src)?;
    if meta_src.len() != meta_dst.len() {
        return Ok(false);
    }

    let mut file_src = File::open(path_file_src)?;
    let mut file_dst = File::open(path_file_dst)?;
    let mut buf_src = vec![0_u8; N_COMPARE_CHUNK_BYTES];
    let mut buf_dst = vec![0_u8; N_COMPARE_CHUNK_BYTES];
    loop {
        let n_src = _read_chunk(&mut file_src, &mut buf_src)?;
        let n_dst = _read_chunk(&mut file_dst, &mut buf_dst)?;
        if n_src != n_dst || buf_src[..n_src] != buf_dst[..n_dst] {
            return Ok(false);
        }
        if n_src == 0 {
            return Ok(true);
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

/// Destination path relative to the install root, with `.` components dropped.
///
/// `("clang-c", "Index.h")` gives `clang-c/Index.h`; `(".", "cindex.py")`
/// gives `cindex.py`.
pub(crate) fn derive_display_destination(path_dir_dst_sub: &Path, name_file: &OsStr) -> PathBuf {
    let mut path_display = PathBuf::new();
    for part in path_dir_dst_sub.components() {
        if part != Component::CurDir {
            path_display.push(part.as_os_str());
        }
    }
    path_display.push(name_file);
    path_display
}

/// Join `path_sub` under `path_root`, treating `.` as the root itself.
pub(crate) fn join_subpath(path_root: &Path, path_sub: &Path) -> PathBuf {
    if path_sub == Path::new(".") {
        return path_root.to_path_buf();
    }
    path_root.join(path_sub)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
