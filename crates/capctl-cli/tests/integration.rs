use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Build a `capctl` command pointed at a mock API server, with the user
/// profile neutralized via a throwaway HOME.
fn capctl(home: &TempDir, server_url: &str) -> Command {
    let mut cmd = Command::cargo_bin("capctl").unwrap();
    cmd.env("HOME", home.path())
        .env("CAPCTL_API_URL", server_url)
        .env("CAPCTL_TOKEN", "test-token");
    cmd
}

const LEVEL_DEFINITION: &str = r#"name: Switch Level
attributes:
  level:
    schema:
      type: object
      properties:
        value:
          type: integer
          minimum: 0
          maximum: 100
      additionalProperties: false
      required: [value]
    setter: setLevel
commands:
  setLevel:
    name: setLevel
    arguments:
      - name: value
        optional: false
        schema:
          type: integer
          minimum: 0
          maximum: 100
"#;

const CREATED_CAPABILITY: &str = r#"{
    "id": "cathappy12345.switchLevel",
    "version": 1,
    "name": "Switch Level"
}"#;

// ---------------------------------------------------------------------------
// capctl capability create
// ---------------------------------------------------------------------------

#[test]
fn create_from_input_file_posts_definition() {
    let home = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/capabilities")
        .match_header("authorization", "Bearer test-token")
        .match_body(mockito::Matcher::PartialJsonString(
            r#"{"name": "Switch Level"}"#.to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(CREATED_CAPABILITY)
        .create();

    let input = home.path().join("level.yaml");
    std::fs::write(&input, LEVEL_DEFINITION).unwrap();

    capctl(&home, &server.url())
        .args(["capability", "create", "-i"])
        .arg(&input)
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": \"cathappy12345.switchLevel\""));

    mock.assert();
}

#[test]
fn create_json_flag_overrides_input_format() {
    let home = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/capabilities")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(CREATED_CAPABILITY)
        .create();

    let input = home.path().join("level.yaml");
    std::fs::write(&input, LEVEL_DEFINITION).unwrap();

    // Without --json the YAML input file would select YAML output.
    let output = capctl(&home, &server.url())
        .args(["capability", "create", "-i"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("id: cathappy12345.switchLevel"));

    let output = capctl(&home, &server.url())
        .args(["capability", "create", "-i"])
        .arg(&input)
        .arg("--json")
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["version"], 1);
}

#[test]
fn create_writes_output_file_by_extension() {
    let home = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/capabilities")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(CREATED_CAPABILITY)
        .create();

    let input = home.path().join("level.yaml");
    std::fs::write(&input, LEVEL_DEFINITION).unwrap();
    let out = home.path().join("created.json");

    capctl(&home, &server.url())
        .args(["capability", "create", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    let written = std::fs::read_to_string(&out).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(parsed["id"], "cathappy12345.switchLevel");
}

#[test]
fn create_rejects_empty_definition_before_submitting() {
    let home = TempDir::new().unwrap();

    let input = home.path().join("empty.yaml");
    std::fs::write(&input, "name: Empty Cap\n").unwrap();

    // No server: validation must fail before any request is attempted.
    capctl(&home, "http://127.0.0.1:1")
        .args(["capability", "create", "-i"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "At least one attribute or capability is required",
        ));
}

#[test]
fn create_reports_api_failure() {
    let home = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/capabilities")
        .with_status(403)
        .with_body("forbidden")
        .create();

    let input = home.path().join("level.yaml");
    std::fs::write(&input, LEVEL_DEFINITION).unwrap();

    capctl(&home, &server.url())
        .args(["capability", "create", "-i"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("403"));
}

// ---------------------------------------------------------------------------
// capctl capability namespaces
// ---------------------------------------------------------------------------

#[test]
fn namespaces_renders_sorted_indexed_table() {
    let home = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/capabilities/namespaces")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"name": "zeta", "ownerType": "user", "ownerId": "u-2"},
                {"name": "Alpha", "ownerType": "user", "ownerId": "u-1"}
            ]"#,
        )
        .create();

    let output = capctl(&home, &server.url())
        .args(["capability", "namespaces"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    // Case-insensitive sort puts Alpha first; index column is 1-based.
    assert!(stdout.contains('#'));
    assert!(stdout.contains("1  Alpha"));
    assert!(stdout.contains("2  zeta"));
}

#[test]
fn namespaces_empty_list_message() {
    let home = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/capabilities/namespaces")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create();

    capctl(&home, &server.url())
        .args(["capability", "namespaces"])
        .assert()
        .success()
        .stdout(predicate::str::diff("no namespaces found\n"));
}

#[test]
fn namespaces_yaml_flag_bypasses_table() {
    let home = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/capabilities/namespaces")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"name": "cathappy12345", "ownerType": "user", "ownerId": "u-1"}]"#)
        .create();

    capctl(&home, &server.url())
        .args(["capability", "namespaces", "--yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("name: cathappy12345"))
        .stdout(predicate::str::contains("ownerType: user"));
}

#[test]
fn missing_token_is_a_clear_error() {
    let home = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("capctl").unwrap();
    cmd.env("HOME", home.path())
        .env("CAPCTL_API_URL", "http://127.0.0.1:1")
        .env_remove("CAPCTL_TOKEN");

    cmd.args(["capability", "namespaces"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no API token"));
}
