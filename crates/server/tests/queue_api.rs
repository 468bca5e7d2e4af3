//! Staging queue API tests against the in-process router.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use dropqueue_core::{QueueConfig, QueueEvent, RegistrarError, TransportError};

use common::TestFixture;

#[tokio::test]
async fn test_health_and_config() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/v1/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");

    let response = fixture.get("/api/v1/config").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["queue"]["item_timeout_secs"], 60);
    assert_eq!(response.body["registrar"]["backend"], "log");
}

#[tokio::test]
async fn test_stage_and_list_files() {
    let fixture = TestFixture::new();

    let response = fixture
        .upload(&[
            ("a.txt", "text/plain", b"alpha".as_slice()),
            ("b.png", "image/png", b"\x89PNG".as_slice()),
        ])
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let staged = response.body["items"].as_array().unwrap();
    assert_eq!(staged.len(), 2);
    assert_eq!(staged[0]["name"], "a.txt");
    assert_eq!(staged[0]["state"], "pending");
    assert_eq!(staged[0]["preview"], "none");
    assert_eq!(staged[0]["size"], 5);
    assert_eq!(staged[1]["preview"], "image");

    let response = fixture.get("/api/v1/queue").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["items"].as_array().unwrap().len(), 2);
    assert_eq!(response.body["status"]["pending"], 2);
    assert_eq!(response.body["status"]["in_flight"], false);
}

#[tokio::test]
async fn test_stage_without_file_field_is_rejected() {
    let fixture = TestFixture::new();

    let body = b"--dropqueue-test-boundary\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n--dropqueue-test-boundary--\r\n".to_vec();
    let response = fixture.multipart("/api/v1/queue", body).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "No file provided");
}

#[tokio::test]
async fn test_stage_file_over_limit_is_rejected() {
    let fixture = TestFixture::with_queue_config(QueueConfig {
        max_file_size_bytes: 8,
        ..Default::default()
    });

    let response = fixture
        .upload(&[(
            "big.bin",
            "application/octet-stream",
            b"0123456789abcdef".as_slice(),
        )])
        .await;
    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);

    let response = fixture.get("/api/v1/queue").await;
    assert!(response.body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_get_and_remove_item() {
    let fixture = TestFixture::new();
    let id = fixture.stage("a.txt", "text/plain", b"alpha").await;

    let response = fixture.get(&format!("/api/v1/queue/{}", id)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["name"], "a.txt");

    let response = fixture.delete(&format!("/api/v1/queue/{}", id)).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = fixture.get(&format!("/api/v1/queue/{}", id)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = fixture.delete(&format!("/api/v1/queue/{}", id)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_item_id() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/v1/queue/not-a-uuid").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .contains("Invalid item id"));
}

#[tokio::test]
async fn test_clear_queue() {
    let fixture = TestFixture::new();
    fixture.stage("a.txt", "text/plain", b"alpha").await;
    fixture.stage("b.txt", "text/plain", b"beta").await;

    let response = fixture.delete("/api/v1/queue").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["removed"], 2);

    let response = fixture.get("/api/v1/queue").await;
    assert!(response.body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_preview_image_and_pdf() {
    let fixture = TestFixture::new();
    let image = fixture.stage("cat.png", "image/png", b"\x89PNG").await;
    let pdf = fixture
        .stage("scan.pdf", "application/pdf", b"%PDF-1.4")
        .await;

    let response = fixture
        .get_raw(&format!("/api/v1/queue/{}/preview", image))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type.as_deref(), Some("image/png"));
    assert_eq!(response.body, b"\x89PNG".to_vec());

    let response = fixture
        .get_raw(&format!("/api/v1/queue/{}/preview", pdf))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type.as_deref(), Some("application/pdf"));
}

#[tokio::test]
async fn test_preview_unsupported_type() {
    let fixture = TestFixture::new();
    let id = fixture.stage("notes.txt", "text/plain", b"hello").await;

    let response = fixture
        .get_raw(&format!("/api/v1/queue/{}/preview", id))
        .await;
    assert_eq!(response.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_submit_empty_queue_is_skipped() {
    let fixture = TestFixture::new();

    let response = fixture.post_empty("/api/v1/queue/submit").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["skipped"], "empty_queue");
    assert_eq!(response.body["attempted"], 0);
    assert_eq!(fixture.storage.upload_count().await, 0);
}

#[tokio::test]
async fn test_submit_uploads_and_prunes() {
    let fixture = TestFixture::new();
    fixture.stage("a.txt", "text/plain", b"alpha").await;
    fixture.stage("b.pdf", "application/pdf", b"%PDF").await;

    let response = fixture.post_empty("/api/v1/queue/submit").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["attempted"], 2);
    assert_eq!(response.body["succeeded"], 2);
    assert_eq!(response.body["failed"], 0);
    assert_eq!(response.body["message"], "Successfully processed 2 / 2 file(s)!");

    let response = fixture.get("/api/v1/queue").await;
    assert!(response.body["items"].as_array().unwrap().is_empty());

    let records = fixture.registrar.recorded().await;
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.created_by == "currentUser"));
}

#[tokio::test]
async fn test_submit_keeps_failed_items_with_error() {
    let fixture = TestFixture::new();
    fixture.stage("a.txt", "text/plain", b"alpha").await;
    let b = fixture.stage("b.txt", "text/plain", b"beta").await;
    let c = fixture.stage("c.txt", "text/plain", b"gamma").await;
    fixture
        .storage
        .fail_for("b.txt", TransportError::Upload("bucket offline".to_string()))
        .await;
    fixture
        .registrar
        .fail_for("c.txt", RegistrarError::Other("row rejected".to_string()))
        .await;

    let response = fixture.post_empty("/api/v1/queue/submit").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["attempted"], 3);
    assert_eq!(response.body["succeeded"], 1);
    assert_eq!(response.body["failed"], 2);

    let response = fixture.get(&format!("/api/v1/queue/{}", b)).await;
    assert_eq!(response.body["state"], "failed");
    assert_eq!(response.body["error"], "bucket offline");

    let response = fixture.get(&format!("/api/v1/queue/{}", c)).await;
    assert_eq!(response.body["state"], "failed");
    assert_eq!(response.body["error"], "row rejected");

    // Retry succeeds once the collaborators recover
    let response = fixture.post_empty("/api/v1/queue/submit").await;
    assert_eq!(response.body["attempted"], 2);
    assert_eq!(response.body["succeeded"], 2);
}

#[tokio::test]
async fn test_submit_while_in_flight_conflicts() {
    let fixture = TestFixture::new();
    fixture
        .storage
        .set_upload_duration(Duration::from_millis(300))
        .await;
    fixture.stage("a.txt", "text/plain", b"alpha").await;

    let router = fixture.router.clone();
    let first = tokio::spawn(async move {
        use tower::ServiceExt;
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/api/v1/queue/submit")
            .body(axum::body::Body::empty())
            .unwrap();
        router.oneshot(request).await.unwrap().status()
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    let response = fixture.post_empty("/api/v1/queue/submit").await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = fixture.get("/api/v1/queue").await;
    assert_eq!(response.body["status"]["in_flight"], true);
    assert_eq!(response.body["items"][0]["state"], "uploading");

    assert_eq!(first.await.unwrap(), StatusCode::OK);
    assert_eq!(fixture.storage.upload_count().await, 1);
}

#[tokio::test]
async fn test_events_are_broadcast() {
    let fixture = TestFixture::new();
    let mut events = fixture.ws_broadcaster.subscribe();

    let id = fixture.stage("a.txt", "text/plain", b"alpha").await;
    fixture.post_empty("/api/v1/queue/submit").await;

    let mut kinds = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let QueueEvent::ItemStaged { item_id, .. } = &event {
            assert_eq!(item_id.to_string(), id);
        }
        kinds.push(event.kind());
    }
    assert_eq!(
        kinds,
        vec![
            "item_staged",
            "batch_started",
            "item_updated",
            "item_updated",
            "item_removed",
            "batch_completed"
        ]
    );
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new();
    fixture.stage("a.txt", "text/plain", b"alpha").await;
    fixture.post_empty("/api/v1/queue/submit").await;

    let response = fixture.get_raw("/api/v1/metrics").await;
    assert_eq!(response.status, StatusCode::OK);
    let text = String::from_utf8(response.body).unwrap();
    assert!(text.contains("dropqueue_items_staged_total"));
    assert!(text.contains("dropqueue_uploads_total"));
    assert!(text.contains("dropqueue_queue_items"));
}
