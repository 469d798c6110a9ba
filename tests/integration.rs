use std::path::Path;
use std::process::Command;

fn schemaview_cmd(fixture: &str) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_schemaview"));
    cmd.current_dir(Path::new("tests/fixtures").join(fixture));
    cmd
}

#[test]
fn check_passes_on_resolvable_schema() {
    let output = schemaview_cmd("basic")
        .args(["check", "person.schema.json"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "check failed: {}",
        String::from_utf8_lossy(&output.stdout)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("All"), "expected summary line, got: {stdout}");
}

#[test]
fn check_terminates_on_file_cycle() {
    let output = schemaview_cmd("cycle")
        .args(["check", "a.schema.json"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "cycle check failed: {}",
        String::from_utf8_lossy(&output.stdout)
    );
}

#[test]
fn check_reports_missing_file_with_exit_2() {
    let output = schemaview_cmd("missing")
        .args(["check", "root.schema.json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("MISSING"));
    assert!(stdout.contains("address.schema.json"));
}

#[test]
fn check_reports_unresolved_pointer_with_exit_1() {
    let output = schemaview_cmd("unresolved")
        .args(["check", "root.schema.json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("UNRESOLVED"));
    assert!(stdout.contains("#/$defs/Gone"));
}

#[test]
fn check_sweeps_a_directory() {
    let output = schemaview_cmd("cycle").args(["check", "."]).output().unwrap();
    assert!(
        output.status.success(),
        "directory sweep failed: {}",
        String::from_utf8_lossy(&output.stdout)
    );
}

#[test]
fn example_synthesizes_from_constraints() {
    let output = schemaview_cmd("basic")
        .args(["example", "person.schema.json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("example output is valid JSON");
    assert_eq!(value["name"], serde_json::json!("xxx"));
    assert_eq!(value["age"], serde_json::json!(0));
    assert_eq!(value["status"], serde_json::json!("active"));
    assert_eq!(value["addr"]["street"], serde_json::json!("string"));
    assert_eq!(value["tags"], serde_json::json!(["string"]));
}

#[test]
fn example_resolves_a_pointer_argument() {
    let output = schemaview_cmd("basic")
        .args(["example", "person.schema.json", "#/$defs/Employment"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["employer"], serde_json::json!("string"));
}

#[test]
fn example_rejects_an_unknown_pointer() {
    let output = schemaview_cmd("basic")
        .args(["example", "person.schema.json", "#/$defs/Nope"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Pointer Not Found"), "stderr: {stderr}");
}

#[test]
fn view_renders_properties_and_imports() {
    let output = schemaview_cmd("basic")
        .args(["view", "person.schema.json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Person"));
    assert!(stdout.contains("name"));
    assert!(stdout.contains("[required]"));
    assert!(stdout.contains("Imported files"));
    assert!(stdout.contains("address.schema.json"));
}

#[test]
fn view_marks_missing_reference_terminal() {
    let output = schemaview_cmd("missing")
        .args(["view", "root.schema.json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("file not found"));
    assert!(stdout.contains("address.schema.json"));
}

#[test]
fn refs_lists_forms_and_statuses() {
    let output = schemaview_cmd("basic")
        .args(["refs", "person.schema.json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("address.schema.json"));
    assert!(stdout.contains("[file]"));
    assert!(stdout.contains("ok (imported)"));
    assert!(stdout.contains("[local]"));
}

#[test]
fn render_writes_standalone_html() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("person.html");
    let output = schemaview_cmd("basic")
        .args(["render", "person.schema.json", "-o"])
        .arg(&out_path)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "render failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let page = std::fs::read_to_string(&out_path).unwrap();
    assert!(page.contains("<!DOCTYPE html>"));
    assert!(page.contains("<title>Schema: Person</title>"));
    assert!(page.contains("json-key"));
}

#[test]
fn missing_root_fails_with_diagnostic() {
    let output = schemaview_cmd("basic")
        .args(["view", "absent.schema.json"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("File Not Found"), "stderr: {stderr}");
}
