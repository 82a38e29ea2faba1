//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for the catalog API and the token
//! service, and run full harvests into temporary directories.

use icd_harvest::catalog::{build_http_client, FetchCause};
use icd_harvest::config::{CredentialSource, Settings};
use icd_harvest::{harvest, Catalog, CatalogClient, Code, HarvestError};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RELEASE: &str = "/icd/release/10/2010";

/// Creates settings pointing both endpoints at the mock server
fn create_test_settings(server: &MockServer, output_dir: &Path, credential: CredentialSource) -> Settings {
    Settings {
        output_dir: output_dir.to_path_buf(),
        delay: Duration::ZERO,
        log_file: output_dir.join("unused.log"),
        api_base: server.uri(),
        auth_base: server.uri(),
        dedupe: false,
        credential,
    }
}

fn token(value: &str) -> CredentialSource {
    CredentialSource::Token(value.to_string())
}

/// Mounts a catalog node that only answers correctly authorized requests
async fn mount_node(server: &MockServer, code: &str, body: serde_json::Value, bearer: &str) {
    Mock::given(method("GET"))
        .and(path(format!("{}/{}", RELEASE, code)))
        .and(header("accept", "application/json"))
        .and(header("API-Version", "v2"))
        .and(header("Accept-Language", "en"))
        .and(header("Authorization", format!("Bearer {}", bearer).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mounts the scenario tree: root -> {A, B}, A -> {A.1}
async fn mount_small_tree(server: &MockServer, bearer: &str) {
    mount_node(
        server,
        "",
        json!({"child": ["https://host/path/A", "https://host/path/B"]}),
        bearer,
    )
    .await;
    mount_node(server, "A", json!({"child": ["https://host/path/A.1"]}), bearer).await;
    mount_node(server, "A.1", json!({}), bearer).await;
    mount_node(server, "B", json!({}), bearer).await;
}

/// Reads every file in `dir` into name -> bytes
fn snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    std::fs::read_dir(dir)
        .expect("Failed to read output dir")
        .map(|entry| {
            let entry = entry.unwrap();
            let name = entry.file_name().to_string_lossy().into_owned();
            (name, std::fs::read(entry.path()).unwrap())
        })
        .collect()
}

async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .expect("Request recording is enabled")
        .iter()
        .map(|request| request.url.path().to_string())
        .collect()
}

#[tokio::test]
async fn test_full_harvest_writes_one_file_per_child_code() {
    let mock_server = MockServer::start().await;
    mount_small_tree(&mock_server, "test-token").await;

    let dir = TempDir::new().unwrap();
    let output_dir = dir.path().join("icd_data");
    let settings = create_test_settings(&mock_server, &output_dir, token("test-token"));

    let report = harvest(&settings).await.expect("Harvest should start");

    let files = snapshot(&output_dir);
    let names: Vec<&str> = files.keys().map(String::as_str).collect();
    assert_eq!(names, ["icd10_A.json", "icd10_A_1.json", "icd10_B.json"]);

    let a: serde_json::Value = serde_json::from_slice(&files["icd10_A.json"]).unwrap();
    assert_eq!(a, json!({"child": ["https://host/path/A.1"]}));

    assert_eq!(report.roots, vec![Code::new("A"), Code::new("B")]);
    assert_eq!(report.stats.records_saved, 3);
    assert_eq!(report.stats.fetch_failures, 0);

    // Root listing first, then depth first in listing order
    let paths = requested_paths(&mock_server).await;
    assert_eq!(
        paths,
        [
            format!("{}/", RELEASE),
            format!("{}/A", RELEASE),
            format!("{}/A.1", RELEASE),
            format!("{}/B", RELEASE),
        ]
    );
}

#[tokio::test]
async fn test_second_harvest_produces_identical_files() {
    let mock_server = MockServer::start().await;
    mount_small_tree(&mock_server, "test-token").await;

    let dir = TempDir::new().unwrap();
    let settings = create_test_settings(&mock_server, dir.path(), token("test-token"));

    harvest(&settings).await.unwrap();
    let first = snapshot(dir.path());

    harvest(&settings).await.unwrap();
    let second = snapshot(dir.path());

    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_root_listing_failure_uses_fallback_chapters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/", RELEASE)))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_node(&mock_server, "I", json!({"title": "Certain infectious diseases"}), "tok").await;
    mount_node(&mock_server, "XXII", json!({"title": "Codes for special purposes"}), "tok").await;

    let dir = TempDir::new().unwrap();
    let settings = create_test_settings(&mock_server, dir.path(), token("tok"));

    let report = harvest(&settings).await.unwrap();

    assert_eq!(report.roots.len(), 22);
    assert_eq!(report.roots[0].as_str(), "I");
    assert_eq!(report.roots[21].as_str(), "XXII");
    assert_eq!(report.stats.nodes_visited, 22);
    assert_eq!(report.stats.fetch_failures, 20);

    let files = snapshot(dir.path());
    let names: Vec<&str> = files.keys().map(String::as_str).collect();
    assert_eq!(names, ["icd10_I.json", "icd10_XXII.json"]);

    // One listing request plus one per chapter
    assert_eq!(requested_paths(&mock_server).await.len(), 23);
}

#[tokio::test]
async fn test_failed_sibling_does_not_stop_traversal() {
    let mock_server = MockServer::start().await;

    mount_node(
        &mock_server,
        "",
        json!({"child": ["https://h/p/A", "https://h/p/B", "https://h/p/C"]}),
        "tok",
    )
    .await;
    mount_node(&mock_server, "A", json!({"child": ["https://h/p/A1"]}), "tok").await;
    mount_node(&mock_server, "A1", json!({}), "tok").await;
    // B answers with a body that is not JSON
    Mock::given(method("GET"))
        .and(path(format!("{}/B", RELEASE)))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;
    mount_node(&mock_server, "C", json!({}), "tok").await;

    let dir = TempDir::new().unwrap();
    let settings = create_test_settings(&mock_server, dir.path(), token("tok"));

    let report = harvest(&settings).await.unwrap();

    let files = snapshot(dir.path());
    let names: Vec<&str> = files.keys().map(String::as_str).collect();
    assert_eq!(names, ["icd10_A.json", "icd10_A1.json", "icd10_C.json"]);
    assert_eq!(report.stats.fetch_failures, 1);
}

#[tokio::test]
async fn test_unwritable_output_still_walks_children() {
    let mock_server = MockServer::start().await;
    mount_small_tree(&mock_server, "tok").await;

    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("occupied");
    std::fs::write(&blocker, "a file, not a directory").unwrap();
    let settings = create_test_settings(&mock_server, &blocker, token("tok"));

    let report = harvest(&settings).await.unwrap();

    assert_eq!(report.stats.records_saved, 0);
    assert_eq!(report.stats.save_failures, 3);
    assert!(requested_paths(&mock_server)
        .await
        .contains(&format!("{}/A.1", RELEASE)));
}

#[tokio::test]
async fn test_expired_token_skips_everything_but_completes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "token expired"})))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output_dir = dir.path().join("icd_data");
    let settings = create_test_settings(&mock_server, &output_dir, token("expired"));

    let report = harvest(&settings).await.expect("Per-node failures never abort");

    // Known limitation: the token is never refreshed, so every node is skipped
    assert_eq!(report.roots.len(), 22);
    assert_eq!(report.stats.fetch_failures, 22);
    assert_eq!(report.stats.records_saved, 0);
    assert!(!output_dir.exists());
}

#[tokio::test]
async fn test_client_credentials_are_exchanged_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/connect/token"))
        .and(body_string_contains("client_id=my-id"))
        .and(body_string_contains("client_secret=my-secret"))
        .and(body_string_contains("scope=icdapi_access"))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "exchanged", "token_type": "Bearer"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_small_tree(&mock_server, "exchanged").await;

    let dir = TempDir::new().unwrap();
    let credential = CredentialSource::ClientCredentials {
        client_id: "my-id".to_string(),
        client_secret: "my-secret".to_string(),
    };
    let settings = create_test_settings(&mock_server, dir.path(), credential);

    let report = harvest(&settings).await.unwrap();

    assert_eq!(report.stats.records_saved, 3);
    assert_eq!(snapshot(dir.path()).len(), 3);
}

#[tokio::test]
async fn test_failed_token_exchange_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/connect/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_client"})))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let credential = CredentialSource::ClientCredentials {
        client_id: "bad".to_string(),
        client_secret: "worse".to_string(),
    };
    let settings = create_test_settings(&mock_server, dir.path(), credential);

    let result = harvest(&settings).await;

    assert!(matches!(result, Err(HarvestError::Auth(_))));
    // No catalog request was made
    assert_eq!(requested_paths(&mock_server).await, ["/connect/token"]);
}

#[tokio::test]
async fn test_client_classifies_failures() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/MISSING", RELEASE)))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/GARBLED", RELEASE)))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"child\": ["))
        .mount(&mock_server)
        .await;

    let http = build_http_client().unwrap();
    let client = CatalogClient::new(http.clone(), &mock_server.uri(), "tok");

    let err = client.fetch(&Code::new("MISSING")).await.unwrap_err();
    assert_eq!(err.code.as_str(), "MISSING");
    assert!(matches!(err.cause, FetchCause::Status(404)));

    let err = client.fetch(&Code::new("GARBLED")).await.unwrap_err();
    assert!(matches!(err.cause, FetchCause::Decode(_)));

    // Nothing listens on port 1
    let unreachable = CatalogClient::new(http, "http://127.0.0.1:1", "tok");
    let err = unreachable.fetch(&Code::new("A00")).await.unwrap_err();
    assert!(matches!(err.cause, FetchCause::Transport(_)));
}
