use std::path::{Path, PathBuf};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use rusqlite::Connection;
use serde_json::Value;
use server::{config::Config, router, state::State};
use tempfile::TempDir;
use tower::ServiceExt;

const SCHEMA: &str = include_str!("../../../db/schema.sql");
const SEED: &str = include_str!("../../../db/seed.sql");

fn app(seed: bool) -> (TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("app.db");

    let conn = Connection::open(&db_path).unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    if seed {
        conn.execute_batch(SEED).unwrap();
    }
    drop(conn);

    (dir, router(state_for(&db_path)))
}

fn state_for(db_path: &Path) -> std::sync::Arc<State> {
    State::new(Config {
        bind_addr: "127.0.0.1".to_string(),
        port: 0,
        db_path: db_path.to_path_buf(),
        static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static"),
    })
    .unwrap()
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .map(|value| value.to_str().unwrap().to_string());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_health() {
    let (_dir, app) = app(false);

    let (status, _, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_api_unknown_tab() {
    let (_dir, app) = app(true);

    let (status, _, _) = get(&app, "/api/highschool").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_rows() {
    let (_dir, app) = app(true);

    let (status, content_type, body) = get(&app, "/api/DOCS").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json; charset=utf-8"));
    assert!(body.contains("ציור בגן"));

    let rows: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["course_name"], "תנועה");
    assert_eq!(rows[0]["allow_volunteers"], false);
    assert_eq!(rows[1]["allow_volunteers"], true);
}

#[tokio::test]
async fn test_api_serves_cached_rows() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("app.db");
    Connection::open(&db_path)
        .unwrap()
        .execute_batch(&format!("{SCHEMA}\n{SEED}"))
        .unwrap();
    let app = router(state_for(&db_path));

    let (_, _, first) = get(&app, "/api/hs").await;

    std::fs::remove_file(&db_path).unwrap();

    let (status, _, second) = get(&app, "/api/hs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, second);

    let (status, _, _) = get(&app, "/api/links").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_index_defaults_to_home() {
    let (_dir, app) = app(true);

    for uri in ["/", "/?tab=", "/?tab=bogus"] {
        let (status, content_type, body) = get(&app, uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("text/html; charset=utf-8"));
        assert!(body.contains(r#"data-active-tab="home""#));
        assert!(body.contains("חוגים ופעילויות"));
    }
}

#[tokio::test]
async fn test_index_repeated_tab_param() {
    let (_dir, app) = app(true);

    for (uri, active) in [
        ("/?tab=docs&tab=", "docs"),
        ("/?tab=&tab=docs", "home"),
        ("/?tab=bogus&tab=docs", "home"),
        ("/?lang=he&tab=notes&tab=tasks", "notes"),
    ] {
        let (status, _, body) = get(&app, uri).await;

        assert_eq!(status, StatusCode::OK, "{uri}");
        assert!(body.contains(&format!(r#"data-active-tab="{active}""#)), "{uri}");
    }
}

#[tokio::test]
async fn test_index_selected_tab() {
    let (_dir, app) = app(true);

    let (status, _, body) = get(&app, "/?tab=Hs").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"data-active-tab="hs""#));
    assert!(body.contains(r#"data-source="/api/hs""#));
}

#[tokio::test]
async fn test_index_settings_fallback() {
    let (_dir, app) = app(false);

    let (status, _, body) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("ברוכים הבאים"));
}

#[tokio::test]
async fn test_static_assets() {
    let (_dir, app) = app(false);

    let (status, _, body) = get(&app, "/static/app.js").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("/api") || body.contains("dataset.source"));
}
