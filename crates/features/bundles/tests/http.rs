use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use bhub_bundles::BundleService;
use http_body_util::BodyExt;
use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, UNIX_EPOCH};
use tempfile::TempDir;
use tower::ServiceExt;

const JAN_1_10_00: u64 = 1_704_103_200; // 2024-01-01T10:00:00Z

fn set_mtime(path: &Path, secs: u64) {
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(UNIX_EPOCH + Duration::from_secs(secs))
        .unwrap();
}

fn app() -> (TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("scripts")).unwrap();

    let script = dir.path().join("scripts/app.js");
    fs::write(&script, "alert('app');").unwrap();
    set_mtime(&script, JAN_1_10_00);

    let mapping = dir.path().join("bundles.toml");
    fs::write(
        &mapping,
        format!("[[bundle]]\nkey = \"en\"\nlocation = \"{}\"\n", script.display()),
    )
    .unwrap();
    set_mtime(&mapping, JAN_1_10_00 - 3600);

    let service = BundleService::builder()
        .mapping(&mapping)
        .static_dir(dir.path())
        .cache_capacity(8)
        .build();
    (dir, bhub_bundles::router(service))
}

#[tokio::test]
async fn get_bundle_sets_caching_headers() {
    let (_dir, app) = app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/bundles/scripts/app.js?s=en")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::CONTENT_TYPE], "application/javascript");
    assert_eq!(headers[header::LAST_MODIFIED], "Mon, 01 Jan 2024 10:00:00 GMT");
    assert_eq!(headers[header::CACHE_CONTROL], "public, max-age=31536000");
    assert!(headers.contains_key(header::EXPIRES));

    let file_version = headers["fileversion"].to_str().unwrap().to_owned();
    assert!(file_version.contains("v_20240101100000/"));

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body.as_ref(), b"alert('app');\n");
}

#[tokio::test]
async fn if_modified_since_echo_yields_304_with_empty_body() {
    let (_dir, app) = app();

    let first = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/bundles/scripts/app.js?s=en")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let last_modified = first.headers()[header::LAST_MODIFIED].clone();

    let second = app
        .oneshot(
            Request::builder()
                .uri("/bundles/scripts/app.js?s=en")
                .header(header::IF_MODIFIED_SINCE, last_modified)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
    // Headers are still present on the 304 branch.
    assert!(second.headers().contains_key("fileversion"));
    let body = second.into_body().collect().await.unwrap().to_bytes();
    assert!(body.is_empty());
}

#[tokio::test]
async fn version_rewritten_path_round_trips() {
    let (_dir, app) = app();

    let first = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/bundles/scripts/app.js?s=en")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let original = first.into_body().collect().await.unwrap().to_bytes();

    let second = app
        .oneshot(
            Request::builder()
                .uri("/bundles/scripts/v_20240101100000/app.js?s=en")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(second.status(), StatusCode::OK);
    let rewritten = second.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(original, rewritten);
}

#[tokio::test]
async fn unknown_key_gets_host_default_empty_response() {
    let (_dir, app) = app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/bundles/scripts/app.js?s=nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(body.is_empty());
}

#[tokio::test]
async fn garbage_conditional_header_still_serves() {
    let (_dir, app) = app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/bundles/scripts/app.js?s=en")
                .header(header::IF_MODIFIED_SINCE, "definitely not a date")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
