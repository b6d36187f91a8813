//! CLI integration tests.
//!
//! Each test runs the built binary with an isolated HOME so the saved
//! profile never touches the real one. Tests that talk to the service use
//! a wiremock server on the test runtime.

mod common;

use common::{expect_success, run_cli, run_cli_async, stderr};
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DB_ID: &str = "65a1f0c2e4b0a1b2c3d4e5f6";

#[test]
fn test_version() {
    let home = tempfile::tempdir().unwrap();
    let stdout = expect_success(&run_cli(home.path(), &["--version"]));
    assert!(stdout.starts_with("datacube "));
}

#[test]
fn test_invalid_database_id_rejected() {
    let home = tempfile::tempdir().unwrap();
    let output = run_cli(
        home.path(),
        &[
            "--base-url",
            "http://127.0.0.1:9",
            "--api-key",
            "secret",
            "database",
            "drop",
            "not-an-id",
        ],
    );

    assert!(!output.status.success());
    let stderr = stderr(&output);
    assert!(stderr.contains("Invalid database id"), "stderr: {}", stderr);
    assert!(stderr.contains("must be 24 characters"), "stderr: {}", stderr);
}

#[test]
fn test_missing_connection_reported() {
    let home = tempfile::tempdir().unwrap();
    let output = run_cli(home.path(), &["collection", "list", DB_ID]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("No base URL configured"));
}

#[test]
fn test_config_set_show_clear() {
    let home = tempfile::tempdir().unwrap();

    expect_success(&run_cli(
        home.path(),
        &[
            "config",
            "set",
            "--base-url",
            "https://datacube.example.com",
            "--api-key",
            "dc_live_4f9a2b7c",
        ],
    ));

    let profile = home.path().join("data").join("datacube").join("config.json");
    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&profile).unwrap()).unwrap();
    assert_eq!(saved["base_url"], "https://datacube.example.com");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&profile).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    let output = run_cli(home.path(), &["config", "show"]);
    let shown = stderr(&output);
    assert!(output.status.success());
    assert!(shown.contains("https://datacube.example.com"));
    assert!(shown.contains("2b7c"));
    assert!(!shown.contains("dc_live_4f9a2b7c"));

    expect_success(&run_cli(home.path(), &["config", "clear"]));
    assert!(!profile.exists());

    let output = run_cli(home.path(), &["config", "show"]);
    assert!(stderr(&output).contains("No profile saved"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_saved_profile_used_for_requests() {
    let server = MockServer::start().await;
    let home = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v1/collections"))
        .and(query_param("databaseId", DB_ID))
        .and(header("authorization", "Bearer saved-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "collections": [
                {"name": "users", "fields": [{"name": "email", "type": "string"}]},
                {"name": "orders", "fields": []}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    expect_success(
        &run_cli_async(
            home.path(),
            &["config", "set", "--base-url", &uri, "--api-key", "saved-key"],
        )
        .await,
    );

    let stdout = expect_success(&run_cli_async(home.path(), &["collection", "list", DB_ID]).await);

    let names: Vec<String> = stdout
        .lines()
        .map(|line| {
            serde_json::from_str::<Value>(line).unwrap()["name"]
                .as_str()
                .unwrap()
                .to_string()
        })
        .collect();
    assert_eq!(names, ["users", "orders"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_document_read_all_pages() {
    let server = MockServer::start().await;
    let home = tempfile::tempdir().unwrap();

    let pages = [
        (1, ["000000000000000000000001", "000000000000000000000002"]),
        (2, ["000000000000000000000003", "000000000000000000000004"]),
    ];
    for (page, ids) in pages {
        let data: Vec<Value> = ids
            .iter()
            .map(|id| json!({"_id": id, "is_deleted": false}))
            .collect();
        Mock::given(method("GET"))
            .and(path("/api/v1/documents"))
            .and(query_param("page", page.to_string()))
            .and(query_param("pageSize", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": data,
                "pagination": {"total_records": 4, "current_page": page, "page_size": 2}
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let uri = server.uri();
    let output = run_cli_async(
        home.path(),
        &[
            "--base-url",
            &uri,
            "--api-key",
            "secret",
            "document",
            "read",
            DB_ID,
            "users",
            "--all",
            "--page-size",
            "2",
        ],
    )
    .await;
    let stdout = expect_success(&output);

    let ids: Vec<String> = stdout
        .lines()
        .map(|line| {
            serde_json::from_str::<Value>(line).unwrap()["_id"]
                .as_str()
                .unwrap()
                .to_string()
        })
        .collect();
    assert_eq!(
        ids,
        [
            "000000000000000000000001",
            "000000000000000000000002",
            "000000000000000000000003",
            "000000000000000000000004"
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_document_create_from_file() {
    let server = MockServer::start().await;
    let home = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/v1/documents"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "inserted_ids": ["65a1f0c2e4b0a1b2c3d4e5f7", "65a1f0c2e4b0a1b2c3d4e5f8"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let file = home.path().join("docs.json");
    std::fs::write(&file, r#"[{"name": "Ada"}, {"name": "Grace"}]"#).unwrap();

    let uri = server.uri();
    let output = run_cli_async(
        home.path(),
        &[
            "--base-url",
            &uri,
            "--api-key",
            "secret",
            "document",
            "create",
            DB_ID,
            "users",
            "--json",
            file.to_str().unwrap(),
        ],
    )
    .await;
    let stdout = expect_success(&output);

    assert_eq!(
        stdout.lines().collect::<Vec<_>>(),
        ["65a1f0c2e4b0a1b2c3d4e5f7", "65a1f0c2e4b0a1b2c3d4e5f8"]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_api_error_exits_nonzero() {
    let server = MockServer::start().await;
    let home = tempfile::tempdir().unwrap();

    Mock::given(method("DELETE"))
        .and(path(format!("/api/v1/databases/{}", DB_ID)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "error": "NotFound",
            "message": "Database not found"
        })))
        .mount(&server)
        .await;

    let uri = server.uri();
    let output = run_cli_async(
        home.path(),
        &["--base-url", &uri, "--api-key", "secret", "database", "drop", DB_ID],
    )
    .await;

    assert!(!output.status.success());
    let stderr = stderr(&output);
    assert!(stderr.contains("Failed to drop database"), "stderr: {}", stderr);
    assert!(stderr.contains("404"), "stderr: {}", stderr);
}
