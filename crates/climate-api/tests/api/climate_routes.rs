use crate::helpers::{mock_stations, observation, spawn_app, MockObservationDb};
use axum::http::StatusCode;
use climate_api::{db, DEFAULT_MOST_ACTIVE_STATION};
use serde_json::json;
use std::sync::Arc;
use time::macros::date;

#[tokio::test]
async fn precipitation_returns_last_year_keyed_by_date() {
    let mut weather_data = MockObservationDb::new();
    weather_data
        .expect_latest_date()
        .times(1)
        .returning(|| Ok(date!(2017 - 08 - 23)));
    weather_data
        .expect_observations_in_range()
        .withf(|filter| {
            filter.start == Some(date!(2016 - 08 - 24))
                && filter.end.is_none()
                && filter.station_id.is_none()
        })
        .times(1)
        .returning(|_| {
            Ok(vec![
                observation("USC00519397", "2017-08-22", Some(0.0), 82.0),
                observation("USC00519281", "2017-08-22", Some(0.5), 76.0),
                observation("USC00519397", "2017-08-23", None, 81.0),
            ])
        });

    let test_app = spawn_app(Arc::new(weather_data)).await;
    let (status, body) = test_app.get_json("/api/v1.0/precipitation").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"2017-08-22": 0.5, "2017-08-23": null}));
}

#[tokio::test]
async fn precipitation_on_empty_dataset_is_server_error() {
    let mut weather_data = MockObservationDb::new();
    weather_data
        .expect_latest_date()
        .times(1)
        .returning(|| Err(db::Error::EmptyDataset));
    weather_data.expect_observations_in_range().never();

    let test_app = spawn_app(Arc::new(weather_data)).await;
    let (status, body) = test_app.get("/api/v1.0/precipitation").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(String::from_utf8(body).unwrap(), "No observations in dataset");
}

#[tokio::test]
async fn stations_lists_all_fields_in_store_order() {
    let mut weather_data = MockObservationDb::new();
    weather_data
        .expect_list_stations()
        .times(1)
        .returning(|| Ok(mock_stations()));

    let test_app = spawn_app(Arc::new(weather_data)).await;
    let (status, body) = test_app.get_json("/api/v1.0/stations").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {
                "station": "USC00519397",
                "name": "WAIKIKI 717.2, HI US",
                "latitude": 21.2716,
                "longitude": -157.8168,
                "elevation": 3.0
            },
            {
                "station": "USC00519281",
                "name": "WAIHEE 837.5, HI US",
                "latitude": 21.45167,
                "longitude": -157.84889,
                "elevation": 32.9
            }
        ])
    );
}

#[tokio::test]
async fn tobs_queries_most_active_station_for_last_year() {
    let mut weather_data = MockObservationDb::new();
    weather_data
        .expect_latest_date()
        .times(1)
        .returning(|| Ok(date!(2016 - 08 - 23)));
    weather_data
        .expect_observations_in_range()
        .withf(|filter| {
            filter.station_id.as_deref() == Some(DEFAULT_MOST_ACTIVE_STATION)
                && filter.start == Some(date!(2015 - 08 - 25))
                && filter.end.is_none()
        })
        .times(1)
        .returning(|_| {
            Ok(vec![
                observation(DEFAULT_MOST_ACTIVE_STATION, "2016-08-22", Some(0.4), 77.0),
                observation(DEFAULT_MOST_ACTIVE_STATION, "2016-08-22", Some(0.4), 78.0),
                observation(DEFAULT_MOST_ACTIVE_STATION, "2016-08-23", None, 79.0),
            ])
        });

    let test_app = spawn_app(Arc::new(weather_data)).await;
    let (status, body) = test_app.get_json("/api/v1.0/tobs").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"date": "2016-08-22", "tobs": 77.0},
            {"date": "2016-08-22", "tobs": 78.0},
            {"date": "2016-08-23", "tobs": 79.0}
        ])
    );
}

#[tokio::test]
async fn start_route_summarizes_from_start_date() {
    let mut weather_data = MockObservationDb::new();
    weather_data.expect_latest_date().never();
    weather_data
        .expect_observations_in_range()
        .withf(|filter| {
            filter.start == Some(date!(2017 - 01 - 02))
                && filter.end.is_none()
                && filter.station_id.is_none()
        })
        .times(1)
        .returning(|_| {
            Ok(vec![
                observation("A", "2017-06-01", None, 80.0),
                observation("B", "2017-06-02", None, 70.0),
            ])
        });

    let test_app = spawn_app(Arc::new(weather_data)).await;
    let (status, body) = test_app.get_json("/api/v1.0/2017-01-02").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"Min Temp": 70.0, "Max Temp": 80.0, "Avg Temp": 75.0}])
    );
}

#[tokio::test]
async fn start_end_route_passes_both_bounds() {
    let mut weather_data = MockObservationDb::new();
    weather_data
        .expect_observations_in_range()
        .withf(|filter| {
            filter.start == Some(date!(2016 - 01 - 01))
                && filter.end == Some(date!(2017 - 01 - 01))
                && filter.station_id.is_none()
        })
        .times(1)
        .returning(|_| Ok(vec![observation("A", "2017-01-01", None, 60.0)]));

    let test_app = spawn_app(Arc::new(weather_data)).await;
    let (status, body) = test_app.get_json("/api/v1.0/2016-01-01/2017-01-01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"Min Temp": 60.0, "Max Temp": 60.0, "Avg Temp": 60.0}])
    );
}

#[tokio::test]
async fn range_with_no_rows_returns_nulls() {
    let mut weather_data = MockObservationDb::new();
    weather_data
        .expect_observations_in_range()
        .times(1)
        .returning(|_| Ok(vec![]));

    let test_app = spawn_app(Arc::new(weather_data)).await;
    let (status, body) = test_app.get_json("/api/v1.0/2030-01-01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"Min Temp": null, "Max Temp": null, "Avg Temp": null}])
    );
}

#[tokio::test]
async fn malformed_dates_are_client_errors() {
    for uri in [
        "/api/v1.0/2017-13-01",
        "/api/v1.0/yesterday",
        "/api/v1.0/2017-01-01/01-02-2017",
        "/api/v1.0/20170101/2017-02-01",
    ] {
        let mut weather_data = MockObservationDb::new();
        weather_data.expect_observations_in_range().never();

        let test_app = spawn_app(Arc::new(weather_data)).await;
        let (status, body) = test_app.get(uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(
            String::from_utf8(body).unwrap().contains("expected YYYY-MM-DD"),
            "{uri}"
        );
    }
}

#[tokio::test]
async fn store_failures_are_server_errors() {
    let mut weather_data = MockObservationDb::new();
    weather_data
        .expect_list_stations()
        .times(1)
        .returning(|| Err(db::Error::Query(sqlx::Error::PoolTimedOut)));

    let test_app = spawn_app(Arc::new(weather_data)).await;
    let (status, body) = test_app.get("/api/v1.0/stations").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        String::from_utf8(body).unwrap(),
        "Failed to query observation data"
    );
}
