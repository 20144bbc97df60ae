//! Integration tests for the JSON endpoint server.
//!
//! Each test writes a throwaway data directory, loads it and drives the
//! resulting router in-process.
//!
//! Run with: cargo test --test integration

use std::fs;
use std::path::Path;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use json_endpoints::api::create_router;
use json_endpoints::loader::load_endpoints;
use json_endpoints::source::FilterParams;
use json_endpoints::{create_error_handler, create_handler, HandlerKind};

fn write(dir: &Path, relative: &str, contents: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn fixture() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().unwrap();
    write(
        tmp.path(),
        "users.json",
        r#"[
            {"id": 1, "name": "ada", "role": "admin", "active": true, "score": 9.5},
            {"id": 2, "name": "bob", "role": "dev", "active": false, "score": 7.0},
            {"id": 3, "name": "cy", "role": "dev", "active": true}
        ]"#,
    );
    write(tmp.path(), "config/site.json", r#"{"title": "demo"}"#);
    write(tmp.path(), "tags.json", r#"["a", "b"]"#);
    write(tmp.path(), "empty.json", "[]");
    write(tmp.path(), "broken.json", r#"{"title": "#);
    tmp
}

fn app(dir: &Path) -> Router {
    let endpoints = load_endpoints(dir).unwrap();
    create_router(endpoints, "", None)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn serves_every_file_with_the_right_variant() {
    let tmp = fixture();
    let app = app(tmp.path());

    let (_, index) = get(&app, "/endpoints").await;
    let kinds: Vec<(String, String)> = index
        .as_array()
        .unwrap()
        .iter()
        .map(|e| {
            (
                e["route"].as_str().unwrap().to_string(),
                e["kind"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("/broken".to_string(), "decode_failure".to_string()),
            ("/config/site".to_string(), "opaque".to_string()),
            ("/empty".to_string(), "opaque".to_string()),
            ("/tags".to_string(), "opaque".to_string()),
            ("/users".to_string(), "queryable".to_string()),
        ]
    );
}

#[tokio::test]
async fn filters_records_by_typed_query_values() {
    let tmp = fixture();
    let app = app(tmp.path());

    let (status, body) = get(&app, "/users?role=dev&active=true").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": 3, "name": "cy", "role": "dev", "active": true}]));

    let (_, body) = get(&app, "/users?score=7").await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["name"], json!("bob"));

    let (_, body) = get(&app, "/users").await;
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|u| u["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let (_, body) = get(&app, "/users?role=nobody").await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn opaque_sources_ignore_queries() {
    let tmp = fixture();
    let app = app(tmp.path());

    assert_eq!(get(&app, "/config/site?title=x").await.1, json!({"title": "demo"}));
    assert_eq!(get(&app, "/tags?0=a").await.1, json!(["a", "b"]));
    assert_eq!(get(&app, "/empty").await.1, json!([]));
}

#[tokio::test]
async fn broken_file_degrades_to_payload() {
    let tmp = fixture();
    let app = app(tmp.path());

    let (status, body) = get(&app, "/broken").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], json!("The file broken.json is not valid json."));
    let error = body["error"].as_str().unwrap_or_default();
    assert!(error.starts_with("Json decode error: "));
    assert!(error.ends_with('.'));
}

#[tokio::test]
async fn rejects_values_of_the_wrong_type() {
    let tmp = fixture();
    let app = app(tmp.path());

    let (status, body) = get(&app, "/users?id=abc").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["loc"], json!(["query", "id"]));
}

#[tokio::test]
async fn undecodable_bytes_do_not_block_other_files() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "good.json", r#"[{"id": 1}]"#);
    fs::write(tmp.path().join("latin1.json"), b"{\"name\": \"caf\xe9\"}").unwrap();
    let app = app(tmp.path());

    let (status, body) = get(&app, "/good?id=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": 1}]));

    let (status, body) = get(&app, "/latin1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], json!("The file latin1.json is not valid json."));
}

#[tokio::test]
async fn capture_like_names_never_match_other_paths() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), ":a.json", r#"{"secret": 1}"#);
    write(tmp.path(), ":b.json", r#"{"secret": 2}"#);
    write(tmp.path(), "public.json", r#"{"open": true}"#);
    let app = app(tmp.path());

    let (status, _) = get(&app, "/anything").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/public").await.1, json!({"open": true}));
}

#[tokio::test]
async fn names_with_spaces_and_accents_are_reachable() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "my file.json", r#"[{"id": 1}, {"id": 2}]"#);
    write(tmp.path(), "caf\u{e9}.json", r#"{"menu": []}"#);
    let app = app(tmp.path());

    let (status, body) = get(&app, "/my%20file?id=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"id": 2}]));

    let (status, body) = get(&app, "/caf%C3%A9").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"menu": []}));
}

#[test]
fn documented_examples_hold() {
    let records = json!([{"a": 1, "b": "x"}, {"a": 2, "b": "y"}]);

    let handler = create_handler(records.clone(), None);
    let mut params = handler.empty_params();
    params.set("a", json!(1));
    assert_eq!(handler.call(&params), json!([{"a": 1, "b": "x"}]));
    assert_eq!(handler.call(&handler.empty_params()), records);

    let object = create_handler(json!({"a": 1}), None);
    assert_eq!(object.call(&FilterParams::default()), json!({"a": 1}));

    let empty = create_handler(json!([]), None);
    assert_eq!(empty.kind(), HandlerKind::Opaque);
    assert_eq!(empty.call(&FilterParams::default()), json!([]));

    let failure = create_error_handler(&"Unexpected token", "users.json", None);
    assert_eq!(
        failure.call(&FilterParams::default()),
        json!({
            "detail": "The file users.json is not valid json.",
            "error": "Json decode error: Unexpected token.",
        })
    );
}
