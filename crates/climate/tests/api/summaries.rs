use crate::helpers::{
    get_json, mock_with_dates, spawn_app, spawn_app_with_rounding, FixtureStore,
};
use axum::http::StatusCode;
use climate::{Field, Rounding};
use serde_json::Value;
use std::{ops::Bound, sync::Arc};

#[tokio::test]
async fn closed_range_summary_rounds_to_two_decimals() {
    let test_app = spawn_app(Arc::new(FixtureStore::new())).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/2016-08-23/2017-01-01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date_01"], "2016-08-23");
    assert_eq!(body["date_02"], "2017-01-01");
    assert_eq!(body["tempF_min"], 62.0);
    assert_eq!(body["tempF_avg"], 72.86);
    assert_eq!(body["tempF_max"], 81.0);
    // the null readings on 2016-12-31 and 2017-01-01 are skipped
    assert_eq!(body["precipitation_min"], 0.0);
    assert_eq!(body["precipitation_avg"], 0.48);
    assert_eq!(body["precipitation_max"], 2.17);
}

#[tokio::test]
async fn truncating_rounding_drops_the_fraction() {
    let test_app =
        spawn_app_with_rounding(Arc::new(FixtureStore::new()), Rounding::Truncate).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/2016-08-23/2017-01-01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tempF_avg"], 72.0);
    assert_eq!(body["precipitation_avg"], 0.0);
    assert_eq!(body["precipitation_max"], 2.0);
}

#[tokio::test]
async fn open_ended_summary_runs_to_the_last_day_on_record() {
    let test_app = spawn_app(Arc::new(FixtureStore::new())).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/2017-01-01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date_01"], "2017-01-01");
    assert_eq!(body["date_02"], "2017-08-23");
    assert_eq!(body["tempF_min"], 62.0);
    assert_eq!(body["tempF_avg"], 73.4);
    assert_eq!(body["tempF_max"], 82.0);
    assert_eq!(body["precipitation_avg"], 0.15);
    assert_eq!(body["precipitation_max"], 0.45);
}

#[tokio::test]
async fn open_ended_summary_queries_without_an_upper_bound() {
    let mut store = mock_with_dates(&["2017-01-01", "2017-08-23"]);
    store
        .expect_aggregate()
        .withf(|_, _, filter| {
            filter.lower == Bound::Included(String::from("2017-01-01"))
                && filter.upper == Bound::Unbounded
        })
        .times(6)
        .returning(|field, _, _| match field {
            Field::Temperature => Ok(Some(71.5)),
            Field::Precipitation => Ok(Some(0.1)),
        });

    let test_app = spawn_app(Arc::new(store)).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/2017-01-01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tempF_avg"], 71.5);
    assert_eq!(body["precipitation_min"], 0.1);
}

#[tokio::test]
async fn closed_range_summary_bounds_both_ends() {
    let mut store = mock_with_dates(&["2016-08-24", "2017-01-01", "2017-08-23"]);
    store
        .expect_aggregate()
        .withf(|_, _, filter| {
            filter.lower == Bound::Included(String::from("2016-08-24"))
                && filter.upper == Bound::Included(String::from("2017-01-01"))
        })
        .times(6)
        .returning(|_, _, _| Ok(Some(70.0)));

    let test_app = spawn_app(Arc::new(store)).await;

    let (status, _) = get_json(&test_app.app, "/api/v1.0/2016-08-24/2017-01-01").await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn single_day_range_is_accepted() {
    let test_app = spawn_app(Arc::new(FixtureStore::new())).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/2016-08-24/2016-08-24").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tempF_min"], 76.0);
    assert_eq!(body["tempF_avg"], 77.5);
    assert_eq!(body["tempF_max"], 79.0);
}

#[tokio::test]
async fn summary_keeps_null_precipitation_when_every_reading_is_missing() {
    let test_app = spawn_app(Arc::new(FixtureStore::new())).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/2016-12-31/2016-12-31").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tempF_avg"], 70.0);
    assert_eq!(body["precipitation_min"], Value::Null);
    assert_eq!(body["precipitation_avg"], Value::Null);
    assert_eq!(body["precipitation_max"], Value::Null);
}

#[tokio::test]
async fn summary_statistics_are_ordered() {
    let test_app = spawn_app(Arc::new(FixtureStore::new())).await;

    for uri in [
        "/api/v1.0/2010-01-01",
        "/api/v1.0/2016-08-23/2016-08-24",
        "/api/v1.0/2016-08-24/2017-08-23",
        "/api/v1.0/summary?start=2010-01-01&end=2016-12-31",
    ] {
        let (status, body) = get_json(&test_app.app, uri).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);

        let temp = ["tempF_min", "tempF_avg", "tempF_max"].map(|k| body[k].as_f64().unwrap());
        assert!(temp[0] <= temp[1] && temp[1] <= temp[2], "{}", uri);

        let precip =
            ["precipitation_min", "precipitation_avg", "precipitation_max"].map(|k| body[k].as_f64());
        if let [Some(min), Some(avg), Some(max)] = precip {
            assert!(min <= avg && avg <= max, "{}", uri);
        }
    }
}

#[tokio::test]
async fn start_past_the_last_day_is_rejected() {
    let test_app = spawn_app(Arc::new(FixtureStore::new())).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/2018-01-01").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("2018-01-01"));
    assert!(message.contains("on or before 2017-08-23"));
}

#[tokio::test]
async fn date_without_observations_is_rejected() {
    let test_app = spawn_app(Arc::new(FixtureStore::new())).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/2016-08-25").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("2016-08-25"));
}

#[tokio::test]
async fn malformed_date_is_rejected() {
    let test_app = spawn_app(Arc::new(FixtureStore::new())).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/last-tuesday").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("on or after 2010-01-01"));
}

#[tokio::test]
async fn invalid_end_date_names_the_upper_bound() {
    let test_app = spawn_app(Arc::new(FixtureStore::new())).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/2016-08-23/2016-08-25").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("on or before 2017-08-23"));
}

#[tokio::test]
async fn end_before_start_is_rejected() {
    let test_app = spawn_app(Arc::new(FixtureStore::new())).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/2017-01-01/2016-08-23").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Your vacation cannot end before it starts. Pick another end date."
    );
}

#[tokio::test]
async fn summary_query_requires_a_start() {
    let test_app = spawn_app(Arc::new(FixtureStore::new())).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/summary").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("start date is required"));
    assert!(message.contains("2010-01-01"));
}

#[tokio::test]
async fn summary_query_end_defaults_to_the_last_day() {
    let test_app = spawn_app(Arc::new(FixtureStore::new())).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/summary?start=2017-01-01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date_01"], "2017-01-01");
    assert_eq!(body["date_02"], "2017-08-23");
    assert_eq!(body["tempF_avg"], 73.4);
}

#[tokio::test]
async fn no_observations_in_range_returns_not_found() {
    let mut store = mock_with_dates(&["2017-01-01", "2017-08-23"]);
    store
        .expect_aggregate()
        .times(6)
        .returning(|_, _, _| Ok(None));

    let test_app = spawn_app(Arc::new(store)).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/2017-01-01/2017-08-23").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["date_01"], "2017-01-01");
    assert_eq!(body["date_02"], "2017-08-23");
    assert_eq!(body["tempF_min"], Value::Null);
    assert_eq!(body["precipitation_max"], Value::Null);
}

#[tokio::test]
async fn two_decimal_summary_rounds_half_cent_ties_to_even() {
    let mut store = mock_with_dates(&["2017-01-01", "2017-08-23"]);
    store
        .expect_aggregate()
        .times(6)
        .returning(|field, _, _| match field {
            Field::Temperature => Ok(Some(74.125)),
            Field::Precipitation => Ok(Some(2.675)),
        });

    let test_app = spawn_app(Arc::new(store)).await;

    let (status, body) = get_json(&test_app.app, "/api/v1.0/2017-01-01/2017-08-23").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tempF_avg"], 74.12);
    assert_eq!(body["precipitation_avg"], 2.67);
}
