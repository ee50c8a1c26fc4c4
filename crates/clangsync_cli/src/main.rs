use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clangsync_io_fs::{
    EnumMirrorPatternMode, MirrorError, SpecMirrorOptions, mirror_llvm_checkout,
};
use clap::{ArgAction, Parser};
use log::{LevelFilter, info};

/// Mirror libclang headers, sources, python bindings and license out of an
/// LLVM+Clang checkout. Files already identical at the destination are left alone.
#[derive(Debug, Parser)]
#[command(name = "clangsync", version)]
struct Cli {
    /// LLVM checkout root; must contain `tools/clang`
    llvm_dir: PathBuf,
    /// Directory receiving `clang-c/`, `src/` and the top-level files
    /// [default: current directory]
    #[arg(long, env = "CLANGSYNC_INSTALL_ROOT")]
    install_root: Option<PathBuf>,
    /// Report what would be copied without writing anything
    #[arg(long)]
    dry_run: bool,
    /// Override the file patterns (repeatable)
    #[arg(long = "pattern", value_name = "PATTERN")]
    patterns: Vec<String>,
    /// How `--pattern` values are interpreted: glob, regex or literal
    #[arg(long, default_value = "glob", value_parser = parse_rule_pattern)]
    pattern_mode: EnumMirrorPatternMode,
    #[arg(short, long, action = ArgAction::Count)]
    /// Verbose mode (-v info, -vv debug, -vvv trace)
    verbose: u8,
}

fn parse_rule_pattern(value: &str) -> Result<EnumMirrorPatternMode, String> {
    match value {
        "glob" => Ok(EnumMirrorPatternMode::Glob),
        "regex" => Ok(EnumMirrorPatternMode::Regex),
        "literal" => Ok(EnumMirrorPatternMode::Literal),
        _ => Err(format!(
            "Invalid pattern mode: `{value}`. Expected one of: ['glob', 'regex', 'literal']"
        )),
    }
}

fn init_log(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();
}

fn clangsync(cli: Cli) -> Result<()> {
    let dir_install_root = match cli.install_root {
        Some(path) => path,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };

    let mut spec_mirror_options = SpecMirrorOptions {
        rule_pattern: cli.pattern_mode,
        if_dry_run: cli.dry_run,
        ..SpecMirrorOptions::default()
    };
    if !cli.patterns.is_empty() {
        spec_mirror_options.patterns_include_files = cli.patterns;
    }

    info!(
        "mirroring {} into {}",
        cli.llvm_dir.display(),
        dir_install_root.display()
    );
    let report = mirror_llvm_checkout(
        &cli.llvm_dir,
        &dir_install_root,
        &spec_mirror_options,
        |spec_action| println!("{spec_action}"),
    )?;
    info!("{report}");
    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_log(cli.verbose);

    match clangsync(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(
                err_mirror @ (MirrorError::MissingRequiredSubpath(_)
                | MirrorError::RequiredSubpathNotDirectory(_)),
            ) = err.downcast_ref::<MirrorError>()
            {
                eprintln!(
                    "fatal: {err_mirror}; expected an LLVM checkout with clang in tools/clang"
                );
            } else {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
