use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use shelfscan_server::{build_app, ServerConfig};
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use tower::ServiceExt;

fn write_tiny_export(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("books.jsonl");
    let lines = [
        json!({"id": "1", "title": "Dune", "authorName": "Frank Herbert", "userShelves": "read"}),
        json!({"id": "2", "title": "Children of Dune", "authorName": "Frank Herbert", "userShelves": "read"}),
        json!({"id": "3", "title": "Foundation", "authorName": "Isaac Asimov", "userShelves": "to-read"}),
    ];
    let body: Vec<String> = lines.iter().map(Value::to_string).collect();
    fs::write(&path, body.join("\n")).unwrap();
    path
}

fn app_with(dir: &Path, admin_token: Option<&str>) -> Router {
    let weights = dir.join("weights.json");
    fs::write(&weights, r#"{"title": 1}"#).unwrap();
    build_app(ServerConfig {
        input: Some(write_tiny_export(dir)),
        weights: Some(weights),
        admin_token: admin_token.map(str::to_string),
        ..Default::default()
    })
    .unwrap()
}

async fn call(app: Router, req: Request<Body>) -> (StatusCode, Bytes) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

async fn get_json(app: Router, uri: &str) -> Value {
    let (status, body) = call(app, Request::get(uri).body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).unwrap()
}

fn titles(json: &Value) -> Vec<String> {
    json["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|hit| hit["book"]["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let dir = tempdir().unwrap();
    let app = app_with(dir.path(), None);

    let json = get_json(app, "/search?q=dune&limit=3").await;
    assert_eq!(json["total"], 3);
    assert_eq!(titles(&json), ["Dune", "Children of Dune", "Foundation"]);
    assert!((json["results"][0]["score"].as_f64().unwrap() - 1.0).abs() < 1e-9);
    assert_eq!(json["results"][2]["score"], 0.0);
}

#[tokio::test]
async fn blank_query_pages_through_original_order() {
    let dir = tempdir().unwrap();
    let app = app_with(dir.path(), None);

    let json = get_json(app.clone(), "/search?q=%20%20").await;
    assert_eq!(titles(&json), ["Dune", "Children of Dune", "Foundation"]);

    let json = get_json(app, "/search?limit=1&offset=1").await;
    assert_eq!(titles(&json), ["Children of Dune"]);
    assert_eq!(json["results"][0]["position"], 1);
}

#[tokio::test]
async fn stats_reports_the_corpus() {
    let dir = tempdir().unwrap();
    let app = app_with(dir.path(), None);
    let json = get_json(app, "/stats").await;
    assert_eq!(json["records"], 3);
    assert_eq!(json["stemmer"], "porter");
    // dune, children, of, foundat
    assert_eq!(json["vocabulary"], 4);
}

#[tokio::test]
async fn replacing_records_requires_the_admin_token() {
    let dir = tempdir().unwrap();
    let new_books = json!([{"title": "Emma"}]).to_string();

    let app = app_with(dir.path(), None);
    let req = Request::put("/records")
        .header("content-type", "application/json")
        .body(Body::from(new_books.clone()))
        .unwrap();
    let (status, _) = call(app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let app = app_with(dir.path(), Some("secret"));
    let req = Request::put("/records")
        .header("content-type", "application/json")
        .header("X-ADMIN-TOKEN", "wrong")
        .body(Body::from(new_books))
        .unwrap();
    let (status, _) = call(app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn replacing_records_rebuilds_the_index() {
    let dir = tempdir().unwrap();
    let app = app_with(dir.path(), Some("secret"));

    let req = Request::put("/records")
        .header("content-type", "application/json")
        .header("X-ADMIN-TOKEN", "secret")
        .body(Body::from(json!([{"title": "Emma"}, {"title": "Persuasion"}]).to_string()))
        .unwrap();
    let (status, body) = call(app.clone(), req).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["records"], 2);

    let json = get_json(app, "/search?q=persuasion").await;
    assert_eq!(json["total"], 2);
    assert_eq!(titles(&json), ["Persuasion", "Emma"]);
}
