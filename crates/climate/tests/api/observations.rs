use crate::helpers::{get_json, mock_with_dates, spawn_app, FixtureStore};
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use climate::StoreError;
use hyper::{header, Method};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

#[tokio::test]
async fn stations_lists_only_observed_stations_with_metadata() {
    let test_app = spawn_app(Arc::new(FixtureStore::new())).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/stations").await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    // PEARL CITY has no observations, USC00519523 has no metadata
    assert_eq!(ids, vec!["USC00513117", "USC00516128", "USC00519397"]);

    let waikiki = &body[2];
    assert_eq!(waikiki["name"], "WAIKIKI 717.2, HI US");
    assert_eq!(waikiki["elevation"], 3.0);
    assert_eq!(waikiki["lat"], 21.2716);
    assert_eq!(waikiki["lng"], -157.8168);
}

#[tokio::test]
async fn precipitation_groups_the_trailing_year_by_date_and_station() {
    let test_app = spawn_app(Arc::new(FixtureStore::new())).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/precipitation").await;

    assert_eq!(status, StatusCode::OK);
    let dates: Vec<&String> = body.as_object().unwrap().keys().collect();
    assert_eq!(
        dates,
        vec!["2016-08-24", "2016-12-31", "2017-01-01", "2017-08-23"]
    );
    assert_eq!(
        body["2017-08-23"],
        json!({
            "USC00519397": 0.0,
            "USC00516128": 0.45,
            "USC00519523": null
        })
    );
    assert_eq!(body["2016-12-31"], json!({ "USC00519397": null }));
}

#[tokio::test]
async fn precipitation_window_excludes_the_cutoff_day() {
    let test_app = spawn_app(Arc::new(FixtureStore::new())).await;
    assert_eq!(test_app.state.engine.cutoff(), "2016-08-23");

    let (_, body) = get_json(&test_app.app, "/api/v1.0/precipitation").await;

    assert!(body.get("2016-08-23").is_none());
    assert!(body.get("2016-08-24").is_some());
}

#[tokio::test]
async fn tobs_groups_the_trailing_year_by_date_and_station() {
    let test_app = spawn_app(Arc::new(FixtureStore::new())).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/tobs").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("2010-01-01").is_none());
    assert!(body.get("2016-08-23").is_none());
    assert_eq!(
        body["2016-08-24"],
        json!({ "USC00519397": 79.0, "USC00513117": 76.0 })
    );
    assert_eq!(body["2017-08-23"]["USC00519523"], 82.0);

    let readings: usize = body
        .as_object()
        .unwrap()
        .values()
        .map(|stations| stations.as_object().unwrap().len())
        .sum();
    assert_eq!(readings, 8);
}

#[tokio::test]
async fn all_precipitation_lists_every_reading_in_date_order() {
    let test_app = spawn_app(Arc::new(FixtureStore::new())).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/precipitation/all").await;

    assert_eq!(status, StatusCode::OK);
    let readings = body.as_array().unwrap();
    assert_eq!(readings.len(), 11);
    assert_eq!(
        readings[0],
        json!({ "date": "2010-01-01", "precipitation": 0.08 })
    );
    assert!(readings
        .iter()
        .any(|r| r["date"] == "2016-12-31" && r["precipitation"] == Value::Null));

    let dates: Vec<&str> = readings.iter().map(|r| r["date"].as_str().unwrap()).collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);
}

#[tokio::test]
async fn store_failure_returns_server_error() {
    let mut store = mock_with_dates(&["2017-08-23"]);
    store
        .expect_stations()
        .returning(|| Err(StoreError::NotFound(String::from("station table"))));
    store.expect_observed_stations().returning(|| Ok(vec![]));

    let test_app = spawn_app(Arc::new(store)).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/stations").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to query observations");
}

#[tokio::test]
async fn welcome_page_lists_routes_and_date_bounds() {
    let test_app = spawn_app(Arc::new(FixtureStore::new())).await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/")
        .header(header::ACCEPT, "text/html")
        .body(Body::empty())
        .unwrap();

    let response = test_app
        .app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();

    assert!(html.contains("/api/v1.0/stations"));
    assert!(html.contains("/api/v1.0/tobs"));
    assert!(html.contains("2010-01-01"));
    assert!(html.contains("2017-08-23"));
}
