use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use course_planner::core::catalog_client::CatalogClient;
use course_planner::http::build_client;
use course_planner::model::course::{CourseId, Weekday};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn rows() -> Value {
    json!([
        {"id": 11, "code": "CPTS360", "title": "Systems Programming", "instructor": "Dr. Fan",
         "start_time": "10:00", "end_time": "10:50", "days": "MWF"},
        {"code": "CPTS355", "title": "Programming Languages", "instructor": null,
         "start_time": "13:30", "end_time": "14:45", "days": "TR"}
    ])
}

fn catalog(base: &str) -> CatalogClient {
    CatalogClient::new(build_client(None).unwrap(), base)
}

#[tokio::test]
async fn live_catalog_is_normalized() {
    let base = serve(Router::new().route("/api/courses", get(|| async { Json(rows()) }))).await;

    let load = catalog(&base).load(&CancellationToken::new()).await.unwrap();
    assert!(!load.using_fallback);
    assert_eq!(load.courses.len(), 2);
    assert_eq!(load.courses[0].id, CourseId::Number(11));
    assert_eq!(load.courses[1].id, CourseId::Text("CPTS355-13:30-TR".to_string()));
    assert_eq!(load.courses[1].days, vec![Weekday::Tue, Weekday::Thu]);
    assert_eq!(load.courses[1].instructor_label(), "TBA");
}

#[tokio::test]
async fn empty_array_shows_fallback() {
    let base = serve(Router::new().route("/api/courses", get(|| async { Json(json!([])) }))).await;

    let load = catalog(&base).load(&CancellationToken::new()).await.unwrap();
    assert!(load.using_fallback);
    let codes: Vec<&str> = load.courses.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, vec!["CPTS101", "CPTS322", "MATH201"]);
}

#[tokio::test]
async fn error_status_shows_fallback() {
    let base = serve(Router::new().route(
        "/api/courses",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    ))
    .await;

    let client = catalog(&base);
    assert!(client.fetch_courses().await.is_err());
    let load = client.load(&CancellationToken::new()).await.unwrap();
    assert!(load.using_fallback);
}

#[tokio::test]
async fn non_list_body_shows_fallback() {
    let base = serve(Router::new().route(
        "/api/courses",
        get(|| async { Json(json!({"courses": []})) }),
    ))
    .await;

    let load = catalog(&base).load(&CancellationToken::new()).await.unwrap();
    assert!(load.using_fallback);
}

#[tokio::test]
async fn signed_in_requests_carry_bearer_token() {
    let app = Router::new().route(
        "/api/courses",
        get(|headers: HeaderMap| async move {
            match headers.get("authorization").and_then(|v| v.to_str().ok()) {
                Some("Bearer id-token") => (StatusCode::OK, Json(rows())),
                _ => (StatusCode::UNAUTHORIZED, Json(json!({}))),
            }
        }),
    );
    let base = serve(app).await;

    let anonymous = catalog(&base).load(&CancellationToken::new()).await.unwrap();
    assert!(anonymous.using_fallback);

    let client = build_client(Some(Arc::new(|| Some("id-token".to_string())))).unwrap();
    let signed_in = CatalogClient::new(client, base.as_str())
        .load(&CancellationToken::new())
        .await
        .unwrap();
    assert!(!signed_in.using_fallback);
}

#[tokio::test]
async fn teardown_during_fetch_discards_result() {
    let app = Router::new().route(
        "/api/courses",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(rows())
        }),
    );
    let base = serve(app).await;

    let cancel = CancellationToken::new();
    let teardown = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        teardown.cancel();
    });

    let started = std::time::Instant::now();
    assert!(catalog(&base).load(&cancel).await.is_none());
    assert!(started.elapsed() < Duration::from_secs(5));
}
