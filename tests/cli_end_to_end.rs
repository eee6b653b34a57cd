use assert_cmd::Command;
use httpmock::MockServer;
use predicates::str::contains;
use std::io::Write;
use tempfile::NamedTempFile;

const ENV_VARS: &[&str] = &[
    "POSTDESK_CONFIG_FILE",
    "POSTDESK_EMAIL",
    "POSTDESK_PASSWORD",
    "POSTDESK_PASSWORD_FILE",
    "POSTDESK_ANON_KEY",
    "POSTDESK__API__BASE_URL",
    "POSTDESK__IDENTITY__URL",
    "POSTDESK__IDENTITY__ANON_KEY",
    "RUST_LOG",
];

fn password_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("tmp file");
    file.write_all(contents.as_bytes()).expect("write password");
    file
}

fn postdesk() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("postdesk"));
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn configured(server: &MockServer) -> Command {
    let mut cmd = postdesk();
    cmd.env("POSTDESK__API__BASE_URL", server.base_url())
        .env("POSTDESK__IDENTITY__URL", server.base_url())
        .env("POSTDESK_ANON_KEY", "anon-test-key");
    cmd
}

fn mock_backend(server: &MockServer) {
    server.mock(|when, then| {
        when.method("POST")
            .path("/auth/v1/token")
            .query_param("grant_type", "password")
            .header("apikey", "anon-test-key");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"access_token":"tok","expires_in":3600,"refresh_token":"ref","user":{"email":"admin@example.com"}}"#);
    });
    server.mock(|when, then| {
        when.method("GET")
            .path("/api/posts")
            .header("authorization", "Bearer tok");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"[{"id":1,"post_id":"P1","platform":"eBay","country":"PK","status":"Available","image_url":null,"created_at":"2024-01-15T08:00:00"}]"#);
    });
}

#[test]
fn health_works_end_to_end() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET").path("/api/health");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"status":"healthy","timestamp":"2024-01-15T08:00:00"}"#);
    });

    let assert = configured(&server).arg("health").assert().success();

    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains("\"status\": \"healthy\""));
    mock.assert();
}

#[test]
fn posts_list_prints_json() {
    let server = MockServer::start();
    mock_backend(&server);
    let password = password_file("hunter2\n");

    configured(&server)
        .env("POSTDESK_EMAIL", "admin@example.com")
        .env("POSTDESK_PASSWORD_FILE", password.path())
        .args(["posts", "list", "--json"])
        .assert()
        .success()
        .stdout(contains("\"post_id\": \"P1\""));
}

#[test]
fn posts_stats_counts_by_status() {
    let server = MockServer::start();
    mock_backend(&server);

    configured(&server)
        .env("POSTDESK_EMAIL", "admin@example.com")
        .env("POSTDESK_PASSWORD", "hunter2")
        .args(["posts", "stats"])
        .assert()
        .success()
        .stdout(contains("Total posts: 1"))
        .stdout(contains("Available: 1"))
        .stdout(contains("Sold: 0"));
}

#[test]
fn shell_signs_in_and_renders_dashboard() {
    let server = MockServer::start();
    mock_backend(&server);

    configured(&server)
        .arg("shell")
        .write_stdin("login admin@example.com\nhunter2\nquit\n")
        .assert()
        .success()
        .stdout(contains("Sign in"))
        .stdout(contains("Total posts: 1"))
        .stdout(contains("\u{1F1F5}\u{1F1F0} PK"));
}

#[test]
fn shell_relogin_after_logout_stays_on_dashboard() {
    let server = MockServer::start();
    mock_backend(&server);
    server.mock(|when, then| {
        when.method("POST")
            .path("/auth/v1/logout")
            .header("authorization", "Bearer tok");
        then.status(204);
    });
    let password = password_file("hunter2\n");

    // The signed-out notice from `logout` races the next input line.
    for _ in 0..10 {
        let assert = configured(&server)
            .env("POSTDESK_EMAIL", "admin@example.com")
            .env("POSTDESK_PASSWORD_FILE", password.path())
            .arg("shell")
            .write_stdin("logout\nlogin admin@example.com\nhunter2\nquit\n")
            .assert()
            .success();

        let output = String::from_utf8_lossy(&assert.get_output().stdout);
        let last_login = output.rfind(":: Sign in ===").expect("login screen shown");
        let last_dashboard = output.rfind("Total posts: 1").expect("dashboard shown");
        assert!(
            last_dashboard > last_login,
            "shell ended on the login screen:\n{output}"
        );
    }
}

#[test]
fn delete_without_yes_fails_fast() {
    postdesk()
        .args(["posts", "delete", "3"])
        .assert()
        .failure()
        .stderr(contains("without --yes"));
}

#[test]
fn missing_identity_config_fails_fast() {
    postdesk()
        .arg("health")
        .env("POSTDESK__API__BASE_URL", "http://127.0.0.1:9")
        .assert()
        .failure()
        .stderr(contains("identity.url"));
}

#[test]
fn posts_require_email() {
    let server = MockServer::start();
    configured(&server)
        .args(["posts", "list"])
        .assert()
        .failure()
        .stderr(contains("MissingEmail"));
}
