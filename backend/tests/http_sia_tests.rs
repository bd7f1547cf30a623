//! End-to-end tests of the SIA endpoint against an in-memory repository.

mod support;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use sia_rust::db::LocalRepository;
use sia_rust::http::{create_router, AppState};
use support::record_at;

fn app() -> Router {
    let records = (0..5)
        .map(|i| record_at(&format!("obs-{i}"), 10.68 + i as f64 * 0.01, 41.27))
        .chain(std::iter::once(record_at("elsewhere", 180.0, 0.0)))
        .collect();
    create_router(AppState::new(Arc::new(LocalRepository::with_records(
        records,
    ))))
}

async fn get(uri: &str) -> (StatusCode, String, String) {
    let response = app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_circle_query_returns_votable() {
    let (status, content_type, body) = get("/sia?POS=CIRCLE%2010.684%2041.269%200.1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "text/xml");
    assert!(body.contains(r#"<INFO name="QUERY_STATUS" value="OK"/>"#));
    assert_eq!(body.matches("<TR>").count(), 5);
    assert!(!body.contains("elsewhere"));
}

#[tokio::test]
async fn test_parameter_names_are_case_insensitive() {
    let (status, _, body) = get("/sia?pos=CIRCLE+180+0+0.5&MaxRec=10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.matches("<TR>").count(), 1);
    assert!(body.contains("<TD>elsewhere</TD>"));
}

#[tokio::test]
async fn test_maxrec_overflow() {
    let (status, _, body) = get("/sia?MAXREC=2").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"value="OVERFLOW""#));
    assert_eq!(body.matches("<TR>").count(), 2);
}

#[tokio::test]
async fn test_maxrec_zero_is_metadata_only() {
    let (status, _, body) = get("/sia?MAXREC=0").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<FIELD name=\"obs_id\""));
    assert_eq!(body.matches("<TR>").count(), 0);
}

#[tokio::test]
async fn test_repeated_id_is_ored() {
    let (_, _, body) = get("/sia?ID=obs-1&id=elsewhere").await;
    assert_eq!(body.matches("<TR>").count(), 2);
}

#[tokio::test]
async fn test_bad_pos_is_votable_400() {
    let (status, content_type, body) = get("/sia?POS=BOX+1+2+3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type, "text/xml");
    assert!(body.contains(
        r#"<INFO ID="Error" name="Error" value="Error in query POS: Unknown POS shape: BOX"/>"#
    ));
}

#[tokio::test]
async fn test_bad_band_and_maxrec() {
    let (status, _, body) = get("/sia?BAND=1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Expected two values, got: 1"));

    let (status, _, body) = get("/sia?MAXREC=-1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Error in query MAXREC"));
}

#[tokio::test]
async fn test_dptype_outside_sia_is_rejected() {
    let (status, _, body) = get("/sia?DPTYPE=spectrum").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Error in query DPTYPE"));
}

#[tokio::test]
async fn test_json_response_format() {
    let (status, content_type, body) = get("/sia?RESPONSEFORMAT=json&MAXREC=3").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("application/json"));
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["overflow"], serde_json::json!(true));
    assert_eq!(value["records"].as_array().map(Vec::len), Some(3));
    assert_eq!(value["records"][0]["dataproduct_type"], "image");
}

#[tokio::test]
async fn test_health() {
    let (status, _, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["status"], "ok");
    assert_eq!(value["database"], "connected");
}
