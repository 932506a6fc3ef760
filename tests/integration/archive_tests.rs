//! Integration tests for the archive packager
//!
//! Files are served by wiremock and the produced archives are read back
//! with `zip::ZipArchive`.

use autohunter::archive::{normalize_refs, ArchiveEntry, ArchivePackager, FileRef};
use autohunter::config::ArchiveConfig;
use autohunter::HunterError;
use serde_json::json;
use std::io::{Cursor, Read};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_packager() -> ArchivePackager {
    let settings = ArchiveConfig {
        request_timeout_secs: 5,
        ..ArchiveConfig::default()
    };
    ArchivePackager::new(settings).expect("Failed to build packager")
}

fn file_response(bytes: &[u8]) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(bytes.to_vec(), "application/octet-stream")
}

/// Reads every entry of an archive as (name, contents)
fn read_archive(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("Archive should be readable");
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).expect("Entry should exist");
            let mut contents = Vec::new();
            file.read_to_end(&mut contents).expect("Entry should decompress");
            (file.name().to_string(), contents)
        })
        .collect()
}

#[tokio::test]
async fn test_partial_failure_still_produces_archive() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/a.zip"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b.zip"))
        .respond_with(file_response(b"bee contents"))
        .mount(&mock_server)
        .await;

    let payload = json!([
        format!("{}/a.zip", base_url),
        {"url": format!("{}/b.zip", base_url), "filename": "custom.zip"}
    ]);

    let result = create_packager()
        .package_payload(&payload)
        .await
        .expect("One success should produce an archive");

    assert_eq!(result.downloaded_count, 1);
    assert_eq!(result.failed_count, 1);
    assert_eq!(result.skipped_count, 0);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("a.zip:"));

    let entries = read_archive(&result.archive_bytes);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, "custom.zip");
    assert_eq!(entries[0].1, b"bee contents");
}

#[tokio::test]
async fn test_all_failures_is_an_error() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let payload = json!({"files": [
        format!("{}/one.zip", base_url),
        format!("{}/two.zip", base_url)
    ]});

    let error = create_packager()
        .package_payload(&payload)
        .await
        .expect_err("No successes should fail the batch");

    match error {
        HunterError::NothingDownloaded { errors } => {
            assert_eq!(errors.len(), 2);
            assert!(errors[0].starts_with("one.zip:"));
            assert!(errors[1].starts_with("two.zip:"));
        }
        other => panic!("Unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_view_urls_are_rewritten() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/docs/report.pdf/@@download/file"))
        .respond_with(file_response(b"%PDF-1.4"))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/report.pdf/view"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let payload = json!([format!("{}/docs/report.pdf/view", base_url)]);
    let result = create_packager()
        .package_payload(&payload)
        .await
        .expect("Rewritten URL should download");

    let entries = read_archive(&result.archive_bytes);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, "report.pdf");
    assert_eq!(entries[0].1, b"%PDF-1.4");
}

#[tokio::test]
async fn test_duplicate_names_get_suffixes() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/x/data.zip"))
        .respond_with(file_response(b"first"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/y/data.zip"))
        .respond_with(file_response(b"second"))
        .mount(&mock_server)
        .await;

    let entries = vec![
        ArchiveEntry {
            url: format!("{}/x/data.zip", base_url),
            filename: None,
        },
        ArchiveEntry {
            url: format!("{}/y/data.zip", base_url),
            filename: None,
        },
    ];

    let result = create_packager()
        .package(&entries)
        .await
        .expect("Both files should download");

    assert_eq!(result.entry_names, vec!["data.zip", "data (1).zip"]);

    let contents = read_archive(&result.archive_bytes);
    assert_eq!(contents[0].1, b"first");
    assert_eq!(contents[1].1, b"second");
}

#[tokio::test]
async fn test_mixed_entry_shapes_and_skips() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .respond_with(file_response(b"payload"))
        .mount(&mock_server)
        .await;

    let encoded = json!({"url": format!("{}/enc.zip", base_url), "size": 12}).to_string();
    let payload = json!({"selected_files": [
        format!("{}/bare.zip", base_url),
        encoded,
        {"url": format!("{}/obj.zip", base_url), "filename": "nested/dir/renamed.zip"},
        "not a url",
        42,
        {"filename": "orphan.zip"}
    ]});

    let result = create_packager()
        .package_payload(&payload)
        .await
        .expect("Usable entries should download");

    assert_eq!(result.downloaded_count, 3);
    assert_eq!(result.failed_count, 0);
    assert_eq!(result.skipped_count, 3);
    assert_eq!(result.entry_names, vec!["bare.zip", "enc.zip", "renamed.zip"]);
}

#[tokio::test]
async fn test_synthesized_names_use_batch_position() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .respond_with(file_response(b"root"))
        .mount(&mock_server)
        .await;

    let batch = normalize_refs(vec![
        Some(FileRef::from_text(&format!("{}/named.zip", base_url))),
        Some(FileRef::from_text(&format!("{}/", base_url))),
    ]);
    assert_eq!(batch.skipped, 0);

    let result = create_packager()
        .package(&batch.entries)
        .await
        .expect("Both files should download");

    assert_eq!(result.entry_names, vec!["named.zip", "file_2"]);
}

#[tokio::test]
async fn test_downloads_send_browser_user_agent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let settings = ArchiveConfig {
        user_agent: "Mozilla/5.0 (TestBrowser)".to_string(),
        ..ArchiveConfig::default()
    };

    Mock::given(method("GET"))
        .and(path("/agent.zip"))
        .and(header("user-agent", "Mozilla/5.0 (TestBrowser)"))
        .respond_with(file_response(b"ok"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let packager = ArchivePackager::new(settings).expect("Failed to build packager");
    let result = packager
        .package_payload(&json!([format!("{}/agent.zip", base_url)]))
        .await
        .expect("Matching user agent should download");

    assert_eq!(result.downloaded_count, 1);
}

#[tokio::test]
async fn test_payload_without_usable_entries() {
    let error = create_packager()
        .package_payload(&json!(["nope", 7]))
        .await
        .expect_err("Nothing usable should be rejected");
    assert!(matches!(error, HunterError::InvalidPayload(_)));

    let error = create_packager()
        .package_payload(&json!({"other": []}))
        .await
        .expect_err("Missing list should be rejected");
    assert!(matches!(error, HunterError::InvalidPayload(_)));
}
