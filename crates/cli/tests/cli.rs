// ABOUTME: Integration tests for the htmlsan CLI binary.
// ABOUTME: Covers stdin and file input, presets, policy files, text mode and error exits.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn htmlsan_cmd() -> Command {
    Command::cargo_bin("htmlsan").unwrap()
}

#[test]
fn sanitizes_stdin_with_default_policy() {
    htmlsan_cmd()
        .write_stdin("<b>Hello</b> <script>alert('xss')</script>")
        .assert()
        .success()
        .stdout("<b>Hello</b> ");
}

#[test]
fn sanitizes_file_to_output_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("in.html");
    let output = temp_dir.path().join("out.html");
    fs::write(&input, r#"<a href="javascript:alert(1)" onclick="x()">hi</a>"#).unwrap();

    htmlsan_cmd()
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout("");

    assert_eq!(fs::read_to_string(&output).unwrap(), "<a>hi</a>");
}

#[test]
fn strict_preset_strips_div() {
    htmlsan_cmd()
        .arg("--strict")
        .write_stdin("<b>ok</b><div>gone</div>")
        .assert()
        .success()
        .stdout("<b>ok</b>");
}

#[test]
fn strip_flag_removes_disallowed_content() {
    htmlsan_cmd()
        .arg("--strip")
        .write_stdin("<p>kept</p><marquee>gone</marquee>")
        .assert()
        .success()
        .stdout("<p>kept</p>");
}

#[test]
fn linkify_flag_wraps_urls() {
    htmlsan_cmd()
        .arg("--linkify")
        .write_stdin("Visit https://example.com today")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"<a href="https://example.com" rel="noopener noreferrer">"#,
        ));
}

#[test]
fn max_depth_flag_limits_nesting() {
    htmlsan_cmd()
        .arg("--max-depth")
        .arg("2")
        .write_stdin("<div><div><div><b>deep</b></div></div></div>")
        .assert()
        .success()
        .stdout(predicate::str::contains("<b>").not());
}

#[test]
fn text_mode_strips_all_tags() {
    htmlsan_cmd()
        .arg("--text")
        .write_stdin("<p>Hello <b>world</b></p>")
        .assert()
        .success()
        .stdout("Hello world");
}

#[test]
fn policy_file_is_applied() {
    let temp_dir = TempDir::new().unwrap();
    let policy = temp_dir.path().join("policy.json");
    fs::write(
        &policy,
        r#"{
            "base": "strict",
            "allowed_tags": ["a"],
            "allowed_attributes": {"a": ["href"]},
            "transforms": [{"type": "set_attr", "tag": "a", "name": "rel", "value": "nofollow"}]
        }"#,
    )
    .unwrap();

    htmlsan_cmd()
        .arg("--policy")
        .arg(&policy)
        .write_stdin(r#"<a href="https://example.com">x</a><b>gone</b>"#)
        .assert()
        .success()
        .stdout(r#"<a href="https://example.com" rel="nofollow">x</a>"#);
}

#[test]
fn invalid_policy_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let policy = temp_dir.path().join("policy.json");
    fs::write(&policy, r#"{"allowed_tagz": ["b"]}"#).unwrap();

    htmlsan_cmd()
        .arg("--policy")
        .arg(&policy)
        .write_stdin("<b>x</b>")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("configuration error"));
}

#[test]
fn missing_input_file_fails() {
    htmlsan_cmd()
        .arg("/definitely/not/here.html")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("here.html"));
}

#[test]
fn timing_flag_reports_elapsed() {
    htmlsan_cmd()
        .arg("--timing")
        .write_stdin("<i>x</i>")
        .assert()
        .success()
        .stderr(predicate::str::contains("elapsed:"));
}
