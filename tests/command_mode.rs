//! Integration tests for command mode (-c/--command flag)

use std::path::PathBuf;
use std::process::Command;

fn run_command(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_sheetgrid"))
        // Tests must be deterministic and not depend on a user's grid.toml.
        .arg("--no-user-config")
        .args(args)
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn temp_file(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("sheetgrid-cli-{}-{}", std::process::id(), name));
    std::fs::write(&path, content).unwrap();
    path
}

const PEOPLE: &str = "name,age\nCarol,41\nann,30\nBob,25\n";

#[test]
fn test_table_output() {
    let csv = temp_file("table.csv", PEOPLE);
    let (stdout, _, code) = run_command(&[csv.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "#\tname\tage\n1\tCarol\t41\n2\tann\t30\n3\tBob\t25\n");
}

#[test]
fn test_sort_is_case_insensitive() {
    let csv = temp_file("sort.csv", PEOPLE);
    let (stdout, _, code) = run_command(&[csv.to_str().unwrap(), "-c", "sort name"]);
    assert_eq!(code, 0);
    let names: Vec<&str> = stdout
        .lines()
        .skip(1)
        .filter_map(|l| l.split('\t').nth(1))
        .collect();
    assert_eq!(names, vec!["ann", "Bob", "Carol"]);
}

#[test]
fn test_edit_then_export_changes() {
    let csv = temp_file("changes.csv", PEOPLE);
    let (stdout, _, code) = run_command(&[
        csv.to_str().unwrap(),
        "-c",
        "goto 2 age; edit; input 31; add; delete 3",
        "-o",
        "changes",
    ]);
    assert_eq!(code, 0);
    let export: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(export["attr"], serde_json::json!(["_status", "name", "age"]));
    let statuses: Vec<&str> = export["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row[0].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["~", "-", "+"]);
}

#[test]
fn test_copy_to_clipboard_output() {
    let csv = temp_file("copy.csv", PEOPLE);
    let (stdout, _, code) = run_command(&[
        csv.to_str().unwrap(),
        "-c",
        "drag 1 1 2 2; copy",
        "-o",
        "clipboard",
    ]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim_end(), "Carol\t41\nann\t30");
}

#[test]
fn test_write_csv_round_trip() {
    let csv = temp_file("write-in.csv", PEOPLE);
    let out = std::env::temp_dir().join(format!("sheetgrid-cli-{}-write-out.csv", std::process::id()));
    let (_, stderr, code) = run_command(&[
        csv.to_str().unwrap(),
        "-c",
        "set 1 name =Dora",
        "-w",
        out.to_str().unwrap(),
    ]);
    assert_eq!(code, 0, "stderr: {stderr}");
    let written = std::fs::read_to_string(&out).unwrap();
    assert_eq!(written.lines().next(), Some("name,age"));
    assert_eq!(written.lines().nth(1), Some("'=Dora,41"));
}

#[test]
fn test_unknown_command_fails() {
    let csv = temp_file("bad.csv", PEOPLE);
    let (_, stderr, code) = run_command(&[csv.to_str().unwrap(), "-c", "frobnicate"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("frobnicate"));
}

#[test]
fn test_config_paging() {
    let csv = temp_file("paged.csv", PEOPLE);
    let config = temp_file(
        "paged.toml",
        "[paging]\nmode = \"server\"\npage_size = 2\n",
    );
    let (stdout, _, code) = run_command(&[
        csv.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "-c",
        "page next",
    ]);
    assert_eq!(code, 0);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[1], "1\tBob\t25");
    assert_eq!(lines.last(), Some(&"-- page 2/2 --"));
}

#[test]
fn test_bad_config_is_fatal() {
    let config = temp_file("bad.toml", "editable = \"maybe\"\n");
    let (_, stderr, code) = run_command(&["--config", config.to_str().unwrap()]);
    assert_eq!(code, 1);
    assert!(stderr.contains("grid configuration"));
}
