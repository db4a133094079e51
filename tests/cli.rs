use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::tempdir;

fn write_file(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn contextr() -> Command {
    Command::new(env!("CARGO_BIN_EXE_contextr"))
}

#[test]
fn cli_package_skips_excluded_dirs_and_binary_files() {
    let dir = tempdir().unwrap();

    write_file(&dir.path().join("main.py"), "print('hi')\n");
    write_file(&dir.path().join("node_modules/pkg/index.js"), "module.exports = 1;\n");
    write_file(&dir.path().join("__pycache__/main.cpython.pyc"), "cached\n");
    fs::write(dir.path().join("logo.png"), [0u8; 128]).unwrap();

    let output = contextr()
        .current_dir(dir.path())
        .args(["package", dir.path().to_str().unwrap()])
        .output()
        .unwrap();

    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("# Repository Context"));
    assert!(stdout.contains("### File: main.py"));
    assert!(stdout.contains("```python\nprint('hi')\n"));
    assert!(!stdout.contains("index.js"));
    assert!(!stdout.contains("main.cpython.pyc"));
    assert!(!stdout.contains("### File: logo.png"));
    assert!(stdout.contains("- File types: .py (1)"));
}

#[test]
fn cli_package_writes_output_file() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("src/lib.rs"), "pub fn f() {}\n");
    let out = dir.path().join("context.md");

    let output = contextr()
        .current_dir(dir.path())
        .args([
            "package",
            dir.path().join("src").to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let written = fs::read_to_string(&out).unwrap();
    assert!(written.contains("### File: lib.rs"));
}

#[test]
fn cli_package_falls_back_to_stdout_when_output_fails() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a.txt"), "alpha\n");
    let out = dir.path().join("missing-dir/context.md");

    let output = contextr()
        .current_dir(dir.path())
        .args([
            "package",
            dir.path().join("a.txt").to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("### File: a.txt"));
}

#[test]
fn cli_package_reads_config_file() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("code/app.py"), "x = 1\n");
    write_file(&dir.path().join("code/notes.md"), "# notes\n");
    write_file(
        &dir.path().join(".contextr.toml"),
        "[Flags]\npaths = \"code\"\ninclude = \"*.py\"\ntokens = true\n",
    );

    let output = contextr()
        .current_dir(dir.path())
        .arg("package")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("### File: app.py"));
    assert!(!stdout.contains("notes.md"));
    assert!(stdout.contains("**Total Tokens:**"));
}

#[test]
fn cli_package_rejects_malformed_config() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join(".contextr.toml"), "[Flags\n");

    let output = contextr()
        .current_dir(dir.path())
        .arg("package")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn cli_missing_paths_fail() {
    let dir = tempdir().unwrap();

    let output = contextr()
        .current_dir(dir.path())
        .args(["tree", dir.path().join("nope").to_str().unwrap()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("error: no valid paths provided"));
}

#[test]
fn cli_tokens_json() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("src/big.rs"), &"a".repeat(400));
    write_file(&dir.path().join("small.rs"), "abcdefgh");

    let output = contextr()
        .args(["tokens", dir.path().to_str().unwrap(), "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let v: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(v["total_tokens"], 102);
    assert_eq!(v["file_count"], 2);
    assert_eq!(v["tree"]["src"]["tokens"], 100);
    assert_eq!(v["tree"]["small.rs"]["type"], "file");
}

#[test]
fn cli_tokens_tree_and_summary() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("src/big.rs"), &"a".repeat(400));
    write_file(&dir.path().join("small.rs"), "abcdefgh");

    let output = contextr()
        .args(["tokens", dir.path().to_str().unwrap(), "--threshold", "10"])
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("**Threshold:** 10 tokens"));
    assert!(stdout.contains("└── src/ (100 tokens)"));
    assert!(!stdout.contains("small.rs"));

    let output = contextr()
        .args(["tokens", dir.path().to_str().unwrap(), "--summary"])
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.trim(), "Estimated tokens: 102 (across 2 files)");
}

#[test]
fn cli_tree_and_include() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("b.py"), "b\n");
    write_file(&dir.path().join("a.txt"), "a\n");
    write_file(&dir.path().join("pkg/c.py"), "c\n");

    let output = contextr()
        .args(["tree", dir.path().to_str().unwrap(), "--include", "*.py"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout, "├── b.py\n└── pkg/\n    └── c.py\n");
}

#[test]
fn cli_invalid_include_pattern_matches_literally() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("["), "one\ntwo\n");
    write_file(&dir.path().join("other.txt"), "x\n");

    let output = contextr()
        .args(["stats", dir.path().to_str().unwrap(), "--include", "[", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["total_files"], 1);
    assert_eq!(v["total_lines"], 2);

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("matching it literally"));
}

#[test]
fn cli_stats_json() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("one.md"), "1\n2\n3\n");
    write_file(&dir.path().join("two.md"), "1\n");
    fs::write(dir.path().join("blob.bin"), [0u8; 64]).unwrap();

    let output = contextr()
        .args(["stats", dir.path().to_str().unwrap(), "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["total_files"], 2);
    assert_eq!(v["total_lines"], 4);
    assert_eq!(v["average_lines"], 2);
    assert_eq!(v["file_type_counts"]["md"], 2);
    assert!(v["file_type_counts"].get("bin").is_none());
    assert_eq!(v["largest_file"]["lines"], 3);
}

#[test]
fn cli_completions() {
    let output = contextr().args(["completions", "bash"]).output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout).unwrap().contains("contextr"));
}
