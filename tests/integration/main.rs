//! Integration tests for gobuild
//!
//! These drive the built binary against a throwaway source tree and a
//! shell-script toolchain, so they only run on Unix.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

const APP: &str = r#"package main

import (
	"fmt"
	"./util"
)

func main() { fmt.Println(util.Name()) }
"#;
const UTIL: &str = "package util\n\nfunc Name() string { return \"util\" }\n";

const COMPILER: &str = include_str!("../fixtures/6g.sh");
const LINKER: &str = include_str!("../fixtures/6l.sh");

/// `6g`/`6l` stand-ins that log their calls to `calls.log`.
struct Toolchain {
    dir: TempDir,
}

impl Toolchain {
    fn new(fail_on: Option<&str>) -> Self {
        let dir = TempDir::new().unwrap();
        script(&dir.path().join("6g"), COMPILER);
        script(&dir.path().join("6l"), LINKER);
        if let Some(file) = fail_on {
            fs::write(dir.path().join("fail-compile"), file).unwrap();
        }
        Self { dir }
    }

    fn bin(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("calls.log"))
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn clear(&self) {
        let _ = fs::remove_file(self.dir.path().join("calls.log"));
    }
}

fn script(path: &Path, body: &str) {
    fs::write(path, body).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn tree(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (path, content) in files {
        let full_path = temp_dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, content).unwrap();
    }
    temp_dir
}

fn set_mtime(path: &Path, secs: u64) {
    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
        .unwrap();
}

fn gobuild(cwd: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_gobuild"));
    command
        .current_dir(cwd)
        .env_remove("GOBIN")
        .env_remove("GOARCH")
        .env_remove("GOBUILD_LOG");
    command
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_cli_help() {
    let output = gobuild(Path::new(".")).arg("--help").output().unwrap();

    assert!(output.status.success());
    let help = stdout(&output);
    assert!(help.contains("gobuild"));
    assert!(help.contains("--dry-run"));
    assert!(help.contains("GOBIN"));
}

#[test]
fn test_build_and_run_forwards_arguments() {
    let src = tree(&[("app.go", APP), ("util.go", UTIL)]);
    let toolchain = Toolchain::new(None);

    let output = gobuild(src.path())
        .arg("-b")
        .arg(toolchain.bin())
        .args(["app.go", "hello", "-x"])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "ran hello -x");
    assert_eq!(
        toolchain.calls(),
        vec!["compile util.go", "compile app.go", "link -o app app.6 util.6"]
    );
}

#[test]
fn test_second_build_reuses_artifacts() {
    let src = tree(&[("app.go", APP), ("util.go", UTIL)]);
    let toolchain = Toolchain::new(None);

    let first = gobuild(src.path())
        .arg("-b")
        .arg(toolchain.bin())
        .arg("app")
        .output()
        .unwrap();
    assert!(first.status.success(), "stderr: {}", stderr(&first));

    for source in ["app.go", "util.go"] {
        set_mtime(&src.path().join(source), 100);
    }
    for object in ["app.6", "util.6"] {
        set_mtime(&src.path().join(object), 200);
    }
    set_mtime(&src.path().join("app"), 300);
    toolchain.clear();

    let second = gobuild(src.path())
        .env("GOBIN", toolchain.bin())
        .arg("app")
        .output()
        .unwrap();

    assert!(second.status.success(), "stderr: {}", stderr(&second));
    assert_eq!(stdout(&second).trim(), "ran");
    assert!(toolchain.calls().is_empty());
}

#[test]
fn test_missing_import_fails_before_compiling() {
    let src = tree(&[("app.go", "package main\n\nimport \"./nowhere\"\n")]);
    let toolchain = Toolchain::new(None);

    let output = gobuild(src.path())
        .arg("-b")
        .arg(toolchain.bin())
        .arg("app")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("nowhere.go"));
    assert!(toolchain.calls().is_empty());
}

#[test]
fn test_malformed_import_fails() {
    let src = tree(&[("app.go", "package main\n\nimport 42\n")]);
    let toolchain = Toolchain::new(None);

    let output = gobuild(src.path())
        .arg("-b")
        .arg(toolchain.bin())
        .arg("app")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("app.go"));
    assert!(toolchain.calls().is_empty());
}

#[test]
fn test_compile_failure_skips_link_and_run() {
    let src = tree(&[("app.go", APP), ("util.go", UTIL)]);
    let toolchain = Toolchain::new(Some("util.go"));

    let output = gobuild(src.path())
        .arg("-b")
        .arg(toolchain.bin())
        .arg("app")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("compiling util failed"));
    assert!(stdout(&output).is_empty());
    assert_eq!(toolchain.calls(), vec!["compile util.go"]);
}

#[test]
fn test_dry_run_prints_plan() {
    let src = tree(&[
        ("cmd/tool.go", "package main\n\nimport \"../lib/log\"\n"),
        ("lib/log.go", "package log\n"),
    ]);
    let toolchain = Toolchain::new(None);

    // Run from elsewhere and point at the tree with -C.
    let output = gobuild(toolchain.dir.path())
        .arg("-b")
        .arg(toolchain.bin())
        .arg("-C")
        .arg(src.path())
        .args(["-n", "cmd/tool"])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["order"], serde_json::json!(["lib/log", "cmd/tool"]));
    assert_eq!(report["compiled"], serde_json::json!(["lib/log", "cmd/tool"]));
    assert_eq!(report["target"], "cmd/tool");
    assert_eq!(report["linked"], true);
    assert!(toolchain.calls().is_empty());
    assert!(!src.path().join("lib/log.6").exists());
}

#[test]
fn test_unknown_arch_is_rejected() {
    let src = tree(&[("app.go", "package main\n")]);

    let output = gobuild(src.path())
        .env("GOARCH", "sparc")
        .args(["-n", "app"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("unknown architecture"));
}
