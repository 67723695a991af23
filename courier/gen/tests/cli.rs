use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const API: &str = r#"
#[api(base_url = "https://api.example.com")]
pub trait UserApi {
    #[get("/users/{id}")]
    async fn get_user(&self, #[path] id: u64) -> Result<User, Error>;
}
"#;

const BROKEN: &str = r#"
#[api]
pub trait UserApi {
    #[get("/users")]
    async fn list(&self) -> Vec<User>;
}
"#;

/// Helper to get the courier-gen binary command
fn gen_cmd() -> Command {
    Command::cargo_bin("courier-gen").unwrap()
}

fn write_input(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn writes_client_file() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "api.rs", API);
    let out = dir.path().join("generated");

    gen_cmd()
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Generated UserApi"));

    let code = fs::read_to_string(out.join("user_api.rs")).unwrap();
    assert!(code.contains("pub struct UserApiClient"));
}

#[test]
fn dry_run_prints_without_writing() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "api.rs", API);
    let out = dir.path().join("generated");

    gen_cmd()
        .args(["--dry-run", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("=== user_api.rs ==="))
        .stdout(predicate::str::contains("impl super::UserApi for UserApiClient"));

    assert!(!out.join("user_api.rs").exists());
}

#[test]
fn runtime_override_is_used() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "api.rs", API);

    gen_cmd()
        .args(["--dry-run", "--runtime", "my_http", "-i"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("my_http::Client"));
}

#[test]
fn faults_fail_without_writing() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "api.rs", BROKEN);
    let out = dir.path().join("generated");

    gen_cmd()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("definition fault(s)"))
        .stderr(predicate::str::contains("`list`"));

    assert!(!out.join("user_api.rs").exists());
}

#[test]
fn allow_faults_writes_compile_errors() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "api.rs", BROKEN);
    let out = dir.path().join("generated");

    gen_cmd()
        .arg("--allow-faults")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    let code = fs::read_to_string(out.join("user_api.rs")).unwrap();
    assert!(code.contains("compile_error!"));
}

#[test]
fn json_definitions_are_accepted() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "api.json",
        r#"{
            "version": 1,
            "interface": [{
                "name": "PingApi",
                "methods": [{
                    "name": "ping",
                    "verb": "GET",
                    "path": "/ping",
                    "returns": "Result<(), Error>"
                }]
            }]
        }"#,
    );

    gen_cmd()
        .args(["--dry-run", "-i"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("async fn ping(&self)"));
}

#[test]
fn unsupported_extension_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "api.yaml", "interfaces: []");

    gen_cmd()
        .arg("-i")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected a .rs, .json or .toml file"));
}

#[test]
fn missing_input_fails() {
    gen_cmd()
        .args(["-i", "/nonexistent/api.rs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn help_lists_flags() {
    gen_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--allow-faults"));
}
