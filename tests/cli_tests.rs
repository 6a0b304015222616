use serde_json::Value;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

const SCHEMA: &str = r#"{
    "id": { "required": true, "type": "number" },
    "name": { "type": "string", "minStringLength": 2 }
}"#;

fn json_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_request-schema"))
        .args(args)
        .output()
        .unwrap()
}

fn check_args<'a>(schema: &'a Path, data: &'a Path, extra: &[&'a str]) -> Vec<&'a str> {
    let mut args = vec![
        "check",
        "--schema",
        schema.to_str().unwrap(),
        "--data",
        data.to_str().unwrap(),
    ];
    args.extend_from_slice(extra);
    args
}

#[test]
fn test_check_valid_data_exits_zero() {
    let schema = json_file(SCHEMA);
    let data = json_file(r#"{ "id": "7", "name": "Ada" }"#);

    let output = run_cli(&check_args(schema.path(), data.path(), &["--place", "params"]));
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "valid");
}

#[test]
fn test_check_invalid_data_exits_one() {
    let schema = json_file(SCHEMA);
    let data = json_file(r#"{ "id": "seven", "name": "A" }"#);

    let output = run_cli(&check_args(schema.path(), data.path(), &[]));
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "body.id: value in not number\nbody.name: min string length is 2"
    );
}

#[test]
fn test_check_json_format() {
    let schema = json_file(SCHEMA);
    let data = json_file(r#"{ "name": "Ada" }"#);

    let output = run_cli(&check_args(schema.path(), data.path(), &["--format", "json"]));
    assert_eq!(output.status.code(), Some(1));

    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["error"], Value::Bool(true));
    assert_eq!(
        body["data"]["validationErrors"][0]["msg"],
        Value::from("value is undefined")
    );
}

#[test]
fn test_load_failures_exit_two() {
    let broken = json_file("{ not json");
    let data = json_file(r#"{ "id": 1 }"#);

    let output = run_cli(&check_args(broken.path(), data.path(), &[]));
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Serialization error"));

    let schema = json_file(SCHEMA);
    let missing = schema.path().with_extension("missing");
    let output = run_cli(&check_args(schema.path(), &missing, &[]));
    assert_eq!(output.status.code(), Some(2));

    let output = run_cli(&check_args(schema.path(), data.path(), &["--place", "headers"]));
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid place: headers"));
}

#[test]
fn test_inspect_prints_rules() {
    let schema = json_file(SCHEMA);

    let output = run_cli(&["inspect", "--schema", schema.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "id: required, type=number\nname: type=string, minStringLength=2\n"
    );

    let broken = json_file(r#"{ "id": { "type": "integer" } }"#);
    let output = run_cli(&["inspect", "--schema", broken.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
}
