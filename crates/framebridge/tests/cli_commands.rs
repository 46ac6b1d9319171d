#![cfg(feature = "cli")]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "fbcli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn framebridge(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_framebridge"))
        .arg("--log-level")
        .arg("error")
        .args(args)
        .output()
        .expect("framebridge should run")
}

fn write_events(dir: &Path, lines: &[&str]) -> PathBuf {
    let path = dir.join("events.jsonl");
    std::fs::write(&path, lines.join("\n")).expect("events file should be writable");
    path
}

fn json_lines(output: &Output) -> Vec<Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("stdout line should be json"))
        .collect()
}

fn receipts(rows: &[Value]) -> Vec<&str> {
    rows.iter()
        .map(|row| row["receipt"].as_str().expect("receipt should be a string"))
        .collect()
}

#[test]
fn version_reports_package_version() {
    let output = framebridge(&["version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        format!("framebridge {}", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn render_json_describes_fullscreen_overlay() {
    let output = framebridge(&["--format", "json", "render", "https://A.test/embed?x=1"]);
    assert!(output.status.success());

    let rows = json_lines(&output);
    assert_eq!(rows.len(), 1);
    let overlay = &rows[0];
    assert_eq!(overlay["origin"], "https://a.test");
    assert_eq!(overlay["url"], "https://a.test/embed?x=1");
    assert_eq!(overlay["fullscreen"], true);
    assert_eq!(overlay["frame"]["tag"], "iframe");
    assert!(overlay["html"]
        .as_str()
        .unwrap()
        .contains("src=\"https://a.test/embed?x=1\""));
}

#[test]
fn render_pretty_prints_modal_html() {
    let output = framebridge(&[
        "--format",
        "pretty",
        "render",
        "https://a.test",
        "--width",
        "300px",
        "--height",
        "400px",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("border-radius: 8px;"));
    assert!(stdout.contains("background-color: rgba(0, 0, 0, 0.5);"));
    assert!(stdout.contains("width: 300px;"));
}

#[test]
fn render_rejects_invalid_url() {
    let output = framebridge(&["render", "not a url"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn replay_routes_and_discards() {
    let dir = unique_temp_dir("routes");
    let events = write_events(
        &dir,
        &[
            r#"{"origin":"https://a.test","data":{"kind":"ready"}}"#,
            r#"{"origin":"https://a.test","data":{"kind":"resize","height":300}}"#,
            "",
            r#"{"origin":"https://a.test","data":"ready"}"#,
        ],
    );

    let output = framebridge(&[
        "--format",
        "json",
        "replay",
        "https://a.test/embed",
        events.to_str().unwrap(),
        "--kind",
        "ready",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let rows = json_lines(&output);
    assert_eq!(receipts(&rows), vec!["delivered", "unrouted", "malformed"]);
    assert_eq!(rows[2]["line"], 4);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn replay_foreign_origin_exits_with_channel_fault() {
    let dir = unique_temp_dir("foreign");
    let events = write_events(
        &dir,
        &[
            r#"{"origin":"https://evil.test","data":{"kind":"ready"}}"#,
            r#"{"origin":"https://a.test","data":{"kind":"ready"}}"#,
        ],
    );

    let output = framebridge(&[
        "--format",
        "json",
        "replay",
        "https://a.test",
        events.to_str().unwrap(),
        "--kind",
        "ready",
    ]);

    assert_eq!(output.status.code(), Some(3));
    let rows = json_lines(&output);
    assert_eq!(receipts(&rows), vec!["rejected", "no-session"]);
    assert_eq!(
        rows[0]["detail"],
        "expected origin https://a.test, got https://evil.test"
    );
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn replay_ignores_host_origin() {
    let dir = unique_temp_dir("host");
    let events = write_events(
        &dir,
        &[r#"{"origin":"https://host.test","data":{"kind":"ready"}}"#],
    );

    let output = framebridge(&[
        "--format",
        "json",
        "replay",
        "https://a.test",
        events.to_str().unwrap(),
        "--host-origin",
        "https://host.test",
    ]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(receipts(&json_lines(&output)), vec!["self-origin"]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn replay_validates_against_schema_directory() {
    let dir = unique_temp_dir("schemas");
    let schemas = dir.join("schemas");
    std::fs::create_dir_all(&schemas).unwrap();
    std::fs::write(
        schemas.join("resize.schema.json"),
        r#"{"type":"object","required":["height"],"properties":{"height":{"type":"integer"}}}"#,
    )
    .unwrap();
    let events = write_events(
        &dir,
        &[
            r#"{"origin":"https://a.test","data":{"kind":"resize","height":"tall"}}"#,
            r#"{"origin":"https://a.test","data":{"kind":"resize","height":320}}"#,
        ],
    );

    let output = framebridge(&[
        "--format",
        "json",
        "replay",
        "https://a.test",
        events.to_str().unwrap(),
        "--kind",
        "resize",
        "--schemas",
        schemas.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        receipts(&json_lines(&output)),
        vec!["malformed", "delivered"]
    );
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn replay_refuses_schema_bound_to_another_kind() {
    let dir = unique_temp_dir("schema-kind");
    let schemas = dir.join("schemas");
    std::fs::create_dir_all(&schemas).unwrap();
    std::fs::write(
        schemas.join("scroll.schema.json"),
        r#"{"type":"object","properties":{"kind":{"const":"resize"}}}"#,
    )
    .unwrap();
    let events = write_events(&dir, &[r#"{"origin":"https://a.test","data":{"kind":"scroll"}}"#]);

    let output = framebridge(&[
        "replay",
        "https://a.test",
        events.to_str().unwrap(),
        "--schemas",
        schemas.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("scroll"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn replay_rejects_unparseable_line() {
    let dir = unique_temp_dir("badline");
    let events = write_events(
        &dir,
        &[r#"{"origin":"https://a.test","data":{}}"#, "{not json"],
    );

    let output = framebridge(&["replay", "https://a.test", events.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 2"));
    let _ = std::fs::remove_dir_all(&dir);
}
