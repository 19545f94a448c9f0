#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;

use admin_security::SecurityContext;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::{Extension, Router};
use serde_json::{Value, json};
use system_settings::{SettingsConfig, api::rest::register_routes};
use tempfile::TempDir;
use tower::ServiceExt as _;

const LIVE: &str = r#"{
  "app_name": "Old",
  "client_name": "Acme",
  "theme": {"default": "light", "available": ["light", "dark"]},
  "mail_server": {"smtp_host": "smtp.acme.test", "smtp_port": 587, "smtp_user": "", "smtp_password": "", "use_tls": true},
  "security": {"session_lifetime": 86400, "password_min_length": 8, "csrf_enabled": true},
  "admin_email": "ops@acme.test",
  "database": {"uri":"sqlite:///app.db",   "echo": false}
}"#;

fn admin() -> SecurityContext {
    SecurityContext::builder()
        .subject_id(1)
        .username("admin")
        .admin(true)
        .build()
}

fn setup(config: SettingsConfig) -> Router {
    register_routes(Router::new(), system_settings::build(&config)).layer(Extension(admin()))
}

fn live_dir() -> (TempDir, SettingsConfig) {
    let dir = tempfile::tempdir().unwrap();
    let document_path = dir.path().join("config.json");
    fs::write(&document_path, LIVE).unwrap();
    let config = SettingsConfig {
        document_path,
        ..SettingsConfig::default()
    };
    (dir, config)
}

fn backup_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with("config_backup_"))
        .collect();
    names.sort();
    names
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, header::HeaderMap, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, body.to_vec())
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn get_returns_live_document() {
    let (_dir, config) = live_dir();
    let (status, _, body) = send(
        setup(config),
        Request::get("/admin/v1/settings").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["app_name"], "Old");
    assert_eq!(json["security"]["csrf_enabled"], true);
}

#[tokio::test]
async fn patch_updates_and_leaves_one_backup() {
    let (dir, config) = live_dir();
    let app = setup(config.clone());

    let (status, _, _) = send(
        app.clone(),
        json_request("PATCH", "/admin/v1/settings", &json!({"app_name": "New"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let live = fs::read_to_string(&config.document_path).unwrap();
    let reloaded: Value = serde_json::from_str(&live).unwrap();
    assert_eq!(reloaded["app_name"], "New");
    assert_eq!(reloaded["client_name"], "Acme");
    assert!(live.contains(r#"{"uri":"sqlite:///app.db",   "echo": false}"#));

    let backups = backup_names(dir.path());
    assert_eq!(backups.len(), 1);
    assert_eq!(fs::read_to_string(dir.path().join(&backups[0])).unwrap(), LIVE);
}

#[tokio::test]
async fn failed_backup_is_500_and_live_is_unchanged() {
    let (dir, mut config) = live_dir();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, b"x").unwrap();
    config.backup_dir = Some(blocker);

    let (status, _, body) = send(
        setup(config.clone()),
        json_request("PATCH", "/admin/v1/settings", &json!({"app_name": "New"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let problem: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(problem["code"], "SETTINGS_PERSISTENCE_FAILURE");
    assert_eq!(fs::read_to_string(&config.document_path).unwrap(), LIVE);
}

#[tokio::test]
async fn invalid_patch_is_422() {
    let (dir, config) = live_dir();
    let (status, _, _) = send(
        setup(config),
        json_request(
            "PATCH",
            "/admin/v1/settings",
            &json!({"theme": {"default": "neon"}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(backup_names(dir.path()).is_empty());
}

#[tokio::test]
async fn restore_replaces_verbatim_with_pre_restore_backup() {
    let (dir, config) = live_dir();
    let uploaded = r#"{"app_name":"Restored","client_name":"Acme","theme":{},"mail_server":{},"security":{}}"#;
    let request = Request::post("/admin/v1/settings/restore")
        .header("x-filename", "snapshot.json")
        .body(Body::from(uploaded))
        .unwrap();

    let (status, _, body) = send(setup(config.clone()), request).await;
    assert_eq!(status, StatusCode::OK);
    let outcome: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(outcome["restored_from"], "snapshot.json");
    assert_eq!(fs::read_to_string(&config.document_path).unwrap(), uploaded);

    let backups = backup_names(dir.path());
    assert_eq!(backups.len(), 1);
    assert!(backups[0].starts_with("config_backup_before_restore_"));
    assert_eq!(outcome["backup_file"], backups[0].as_str());
}

#[tokio::test]
async fn restore_does_not_validate_section_contents() {
    let (_dir, config) = live_dir();
    let uploaded = r#"{"app_name":"A","client_name":"C","theme":"dark","mail_server":{"smtp_port":"587"},"security":{}}"#;
    let request = Request::post("/admin/v1/settings/restore")
        .body(Body::from(uploaded))
        .unwrap();

    let (status, _, _) = send(setup(config.clone()), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fs::read_to_string(&config.document_path).unwrap(), uploaded);
}

#[tokio::test]
async fn restore_missing_security_is_400() {
    let (dir, config) = live_dir();
    let request = Request::post("/admin/v1/settings/restore")
        .body(Body::from(
            r#"{"app_name":"A","client_name":"C","theme":{},"mail_server":{}}"#,
        ))
        .unwrap();

    let (status, _, body) = send(setup(config.clone()), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let problem: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(problem["code"], "SETTINGS_INVALID_RESTORE_DOCUMENT");
    assert_eq!(fs::read_to_string(&config.document_path).unwrap(), LIVE);
    assert!(backup_names(dir.path()).is_empty());
}

#[tokio::test]
async fn export_downloads_live_bytes() {
    let (dir, config) = live_dir();
    let (status, headers, body) = send(
        setup(config),
        Request::get("/admin/v1/settings/export")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, LIVE.as_bytes());
    let disposition = headers
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.starts_with("attachment; filename=\"config_backup_"));
    assert!(backup_names(dir.path()).is_empty());
}

#[tokio::test]
async fn backups_are_listed_newest_first() {
    let (dir, config) = live_dir();
    let app = setup(config);
    for name in ["One", "Two"] {
        send(
            app.clone(),
            json_request("PATCH", "/admin/v1/settings", &json!({"app_name": name})),
        )
        .await;
    }

    let (status, _, body) = send(
        app,
        Request::get("/admin/v1/settings/backups")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let listed: Vec<Value> = serde_json::from_slice(&body).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["kind"], "routine");
    let mut on_disk = backup_names(dir.path());
    on_disk.reverse();
    assert_eq!(listed[0]["file_name"], on_disk[0].as_str());
}

#[tokio::test]
async fn missing_document_is_503() {
    let dir = tempfile::tempdir().unwrap();
    let config = SettingsConfig {
        document_path: dir.path().join("absent.json"),
        ..SettingsConfig::default()
    };
    let (status, _, _) = send(
        setup(config),
        Request::get("/admin/v1/settings").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn non_admin_is_403() {
    let (_dir, config) = live_dir();
    let app = register_routes(Router::new(), system_settings::build(&config))
        .layer(Extension(SecurityContext::anonymous()));
    let (status, _, _) = send(
        app,
        Request::get("/admin/v1/settings").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
