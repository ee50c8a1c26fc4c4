use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn write_text(path: &Path, txt: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, txt).expect("write text");
}

fn make_llvm_tree(root: &Path) -> PathBuf {
    let llvm = root.join("llvm");
    let clang = llvm.join("tools/clang");
    write_text(&clang.join("bindings/python/clang/cindex.py"), "py");
    write_text(&clang.join("include/clang-c/Index.h"), "A");
    write_text(&clang.join("include/clang-c/Index.hpp"), "no");
    write_text(&clang.join("tools/libclang/CIndex.cpp"), "cpp");
    write_text(&clang.join("LICENSE.TXT"), "license");
    write_text(&clang.join("license.txt"), "no");
    llvm
}

fn clangsync(llvm: &Path, install: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_clangsync"))
        .arg(llvm)
        .arg("--install-root")
        .arg(install)
        .env_remove("RUST_LOG")
        .output()
        .expect("run clangsync")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn wrong_argument_count_exits_one_with_usage() {
    let output = Command::new(env!("CARGO_BIN_EXE_clangsync"))
        .output()
        .expect("run clangsync");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));

    let output = Command::new(env!("CARGO_BIN_EXE_clangsync"))
        .args(["one", "two"])
        .output()
        .expect("run clangsync");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn help_exits_zero() {
    let output = Command::new(env!("CARGO_BIN_EXE_clangsync"))
        .arg("--help")
        .output()
        .expect("run clangsync");
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn missing_clang_is_fatal_and_writes_nothing() {
    let tmp = TempDir::new().expect("tempdir");
    let llvm = tmp.path().join("llvm");
    fs::create_dir_all(llvm.join("tools")).expect("mkdir");
    let install = tmp.path().join("install");

    let output = clangsync(&llvm, &install);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("fatal"));
    assert!(output.stdout.is_empty());
    assert!(!install.exists());
}

#[test]
fn copies_filtered_files_then_is_idempotent() {
    let tmp = TempDir::new().expect("tempdir");
    let llvm = make_llvm_tree(tmp.path());
    let install = tmp.path().join("install");

    let output = clangsync(&llvm, &install);
    assert_eq!(output.status.code(), Some(0));
    let l_lines = stdout_lines(&output);
    assert_eq!(l_lines.len(), 4);
    assert!(l_lines.iter().all(|l| l.starts_with("cp ")));
    assert!(install.join("cindex.py").is_file());
    assert!(install.join("clang-c/Index.h").is_file());
    assert!(install.join("src/CIndex.cpp").is_file());
    assert!(install.join("LICENSE.TXT").is_file());
    assert!(!install.join("clang-c/Index.hpp").exists());
    assert!(!install.join("license.txt").exists());

    let output = clangsync(&llvm, &install);
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
}

#[test]
fn changed_destination_is_overwritten_and_logged() {
    let tmp = TempDir::new().expect("tempdir");
    let llvm = make_llvm_tree(tmp.path());
    let install = tmp.path().join("install");
    assert!(clangsync(&llvm, &install).status.success());
    write_text(&install.join("clang-c/Index.h"), "B");

    let output = clangsync(&llvm, &install);

    let path_src = llvm.join("tools/clang/include/clang-c/Index.h");
    assert_eq!(
        stdout_lines(&output),
        vec![format!("cp {} clang-c/Index.h", path_src.display())]
    );
    assert_eq!(
        fs::read_to_string(install.join("clang-c/Index.h")).expect("read"),
        "A"
    );
}

#[test]
fn dry_run_prints_actions_without_writing() {
    let tmp = TempDir::new().expect("tempdir");
    let llvm = make_llvm_tree(tmp.path());
    let install = tmp.path().join("install");

    let output = Command::new(env!("CARGO_BIN_EXE_clangsync"))
        .arg(&llvm)
        .arg("--install-root")
        .arg(&install)
        .arg("--dry-run")
        .output()
        .expect("run clangsync");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_lines(&output).len(), 4);
    assert!(!install.exists());
}

#[test]
fn install_root_defaults_to_current_directory() {
    let tmp = TempDir::new().expect("tempdir");
    let llvm = make_llvm_tree(tmp.path());
    let install = tmp.path().join("install");
    fs::create_dir_all(&install).expect("mkdir install");

    let output = Command::new(env!("CARGO_BIN_EXE_clangsync"))
        .arg(&llvm)
        .current_dir(&install)
        .env_remove("CLANGSYNC_INSTALL_ROOT")
        .output()
        .expect("run clangsync");

    assert_eq!(output.status.code(), Some(0));
    assert!(install.join("clang-c/Index.h").is_file());
}

#[test]
fn clang_path_that_is_a_file_is_fatal() {
    let tmp = TempDir::new().expect("tempdir");
    let llvm = tmp.path().join("llvm");
    write_text(&llvm.join("tools/clang"), "file");
    let install = tmp.path().join("install");

    let output = clangsync(&llvm, &install);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("fatal:"));
    assert!(stderr.contains("is not a directory"));
    assert!(!install.exists());
}

#[test]
fn unreadable_source_subdir_reports_error_and_exits_one() {
    let tmp = TempDir::new().expect("tempdir");
    let llvm = make_llvm_tree(tmp.path());
    fs::remove_dir_all(llvm.join("tools/clang/include/clang-c")).expect("remove include");
    let install = tmp.path().join("install");

    let output = clangsync(&llvm, &install);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("error:"), "stderr: {stderr}");
    assert!(stderr.contains("include/clang-c"));
    // The bindings pair ran before the failure.
    assert_eq!(stdout_lines(&output).len(), 1);
    assert!(!install.join("src").exists());
}

#[test]
fn matching_directory_is_skipped_with_warning_on_stderr() {
    let tmp = TempDir::new().expect("tempdir");
    let llvm = make_llvm_tree(tmp.path());
    fs::create_dir_all(llvm.join("tools/clang/include/clang-c/dir.h")).expect("mkdir dir.h");
    let install = tmp.path().join("install");

    let output = clangsync(&llvm, &install);

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Non-regular entry skipped"));
    assert_eq!(stdout_lines(&output).len(), 4);
    assert!(!install.join("clang-c/dir.h").exists());
}

#[cfg(unix)]
#[test]
fn non_utf8_header_name_is_mirrored() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let tmp = TempDir::new().expect("tempdir");
    let llvm = make_llvm_tree(tmp.path());
    let name = OsStr::from_bytes(b"caf\xe9.h");
    fs::write(llvm.join("tools/clang/include/clang-c").join(name), "latin1")
        .expect("write non utf-8 name");
    let install = tmp.path().join("install");

    let output = clangsync(&llvm, &install);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_lines(&output).len(), 5);
    assert_eq!(
        fs::read(install.join("clang-c").join(name)).expect("read"),
        b"latin1"
    );
}
