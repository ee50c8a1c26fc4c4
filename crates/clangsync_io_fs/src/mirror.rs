//! Per-pair directory listing, comparison and copy orchestration.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, trace, warn};

use crate::report::{ReportMirror, ReportMirrorBuilder, SpecMirrorAction};
use crate::spec::{LLVM_REQUIRED_SUBPATH, MirrorError, SpecMirrorOptions, SpecMirrorPair};
use crate::util::{SpecMirrorFilter, derive_display_destination, is_same_content, join_subpath};

#[derive(Debug, Clone)]
struct SpecFileEntry {
    path_file_src: PathBuf,
    name_file: OsString,
}

#[derive(Debug)]
struct SpecMirrorContext {
    path_dir_src_root: PathBuf,
    path_dir_install_root: PathBuf,
    if_dry_run: bool,
    builder_mirror_report: ReportMirrorBuilder,
}

/// Mirror an LLVM+Clang checkout into `dir_install_root`.
///
/// `<dir_llvm>/tools/clang` is checked once before anything is written; the
/// fixed [`LLVM_MIRROR_PAIRS`](crate::spec::LLVM_MIRROR_PAIRS) table is then
/// applied with the filter compiled from `spec_mirror_options`.
pub fn mirror_llvm_checkout<P, Q, C>(
    dir_llvm: P,
    dir_install_root: Q,
    spec_mirror_options: &SpecMirrorOptions,
    on_copy: C,
) -> Result<ReportMirror, MirrorError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    C: FnMut(&SpecMirrorAction),
{
    let path_dir_clang = dir_llvm.as_ref().join(LLVM_REQUIRED_SUBPATH);
    if !path_dir_clang.exists() {
        return Err(MirrorError::MissingRequiredSubpath(path_dir_clang));
    }
    if !path_dir_clang.is_dir() {
        return Err(MirrorError::RequiredSubpathNotDirectory(path_dir_clang));
    }

    let spec_filter = SpecMirrorFilter::from_raw(
        spec_mirror_options.patterns_include_files.as_slice(),
        spec_mirror_options.rule_pattern,
    )?;

    mirror_pairs(
        &path_dir_clang,
        dir_install_root,
        &SpecMirrorPair::llvm_defaults(),
        |name| spec_filter.is_match(name),
        spec_mirror_options.if_dry_run,
        on_copy,
    )
}

/// Mirror the immediate files of each source subdirectory into its destination.
///
/// For every pair, in order:
/// 1. Create the destination subdirectory (skipped in dry-run).
/// 2. List the source subdirectory, sorted by name.
/// 3. For each regular file whose name passes `filter`, copy it unless the
///    destination already holds identical bytes.
///
/// `on_copy` fires right after each copy. The first IO failure aborts the run.
pub fn mirror_pairs<P, Q, F, C>(
    dir_source_root: P,
    dir_install_root: Q,
    pairs: &[SpecMirrorPair],
    filter: F,
    if_dry_run: bool,
    mut on_copy: C,
) -> Result<ReportMirror, MirrorError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    F: Fn(&OsStr) -> bool,
    C: FnMut(&SpecMirrorAction),
{
    let mut spec_mirror_ctx = SpecMirrorContext {
        path_dir_src_root: dir_source_root.as_ref().to_path_buf(),
        path_dir_install_root: dir_install_root.as_ref().to_path_buf(),
        if_dry_run,
        builder_mirror_report: ReportMirrorBuilder::default(),
    };

    for spec_pair in pairs {
        mirror_one_pair(spec_pair, &filter, &mut on_copy, &mut spec_mirror_ctx)?;
    }
    Ok(spec_mirror_ctx.builder_mirror_report.build())
}

fn mirror_one_pair<F, C>(
    spec_pair: &SpecMirrorPair,
    filter: &F,
    on_copy: &mut C,
    spec_mirror_ctx: &mut SpecMirrorContext,
) -> Result<(), MirrorError>
where
    F: Fn(&OsStr) -> bool,
    C: FnMut(&SpecMirrorAction),
{
    let path_dir_dst = join_subpath(
        &spec_mirror_ctx.path_dir_install_root,
        &spec_pair.dir_destination_sub,
    );
    if !spec_mirror_ctx.if_dry_run {
        fs::create_dir_all(&path_dir_dst).map_err(|e| MirrorError::DestinationInitFailed {
            path: path_dir_dst.clone(),
            message: e.to_string(),
        })?;
    }

    let path_dir_src = join_subpath(&spec_mirror_ctx.path_dir_src_root, &spec_pair.dir_source_sub);
    debug!(
        "mirroring {} -> {}",
        path_dir_src.display(),
        path_dir_dst.display()
    );

    for spec_file_entry in list_entries(&path_dir_src, spec_mirror_ctx)? {
        if !filter(spec_file_entry.name_file.as_os_str()) {
            trace!("filtered out: {}", spec_file_entry.path_file_src.display());
            continue;
        }
        handle_file_entry(
            spec_file_entry,
            &spec_pair.dir_destination_sub,
            &path_dir_dst,
            on_copy,
            spec_mirror_ctx,
        )?;
    }
    Ok(())
}

fn list_entries(
    path_dir_src: &Path,
    spec_mirror_ctx: &mut SpecMirrorContext,
) -> Result<Vec<SpecFileEntry>, MirrorError> {
    let to_read_error = |e: std::io::Error| MirrorError::SourceReadFailed {
        path: path_dir_src.to_path_buf(),
        message: e.to_string(),
    };

    let mut l_files = Vec::new();
    for entry_res in fs::read_dir(path_dir_src).map_err(to_read_error)? {
        let entry = entry_res.map_err(to_read_error)?;
        spec_mirror_ctx.builder_mirror_report.add_scanned();

        l_files.push(SpecFileEntry {
            path_file_src: entry.path(),
            name_file: entry.file_name(),
        });
    }
    l_files.sort_by(|a, b| a.name_file.cmp(&b.name_file));
    Ok(l_files)
}

fn handle_file_entry<C>(
    spec_file_entry: SpecFileEntry,
    path_dir_dst_sub: &Path,
    path_dir_dst: &Path,
    on_copy: &mut C,
    spec_mirror_ctx: &mut SpecMirrorContext,
) -> Result<(), MirrorError>
where
    C: FnMut(&SpecMirrorAction),
{
    let path_file_src = spec_file_entry.path_file_src;
    if !path_file_src.is_file() {
        let warning = format!("Non-regular entry skipped: {}", path_file_src.display());
        warn!("{warning}");
        spec_mirror_ctx.builder_mirror_report.add_warning(warning);
        return Ok(());
    }
    spec_mirror_ctx.builder_mirror_report.add_matched();

    let path_file_dst = path_dir_dst.join(&spec_file_entry.name_file);
    if path_file_dst.exists() && !path_file_dst.is_file() {
        return Err(MirrorError::DestinationNotFile(path_file_dst));
    }

    let if_same = is_same_content(&path_file_src, &path_file_dst).map_err(|e| {
        MirrorError::CompareFailed {
            path: path_file_dst.clone(),
            message: e.to_string(),
        }
    })?;
    if if_same {
        debug!("up to date: {}", path_file_dst.display());
        spec_mirror_ctx.builder_mirror_report.add_skipped();
        return Ok(());
    }

    if !spec_mirror_ctx.if_dry_run {
        fs::copy(&path_file_src, &path_file_dst).map_err(|e| MirrorError::CopyFailed {
            source: path_file_src.clone(),
            destination: path_file_dst,
            message: e.to_string(),
        })?;
    }

    let spec_action = SpecMirrorAction {
        path_display_dst: derive_display_destination(
            path_dir_dst_sub,
            &spec_file_entry.name_file,
        ),
        path_file_src,
    };
    info!("{spec_action}");
    on_copy(&spec_action);
    spec_mirror_ctx.builder_mirror_report.add_copied();
    Ok(())
}
