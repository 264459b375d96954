use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use climate_api::{
    app, app_state_from_store, db::Error, Observation, ObservationFilter, ObservationStore,
    Station, DEFAULT_MOST_ACTIVE_STATION,
};
use hyper::Method;
use mockall::mock;
use std::sync::Arc;
use time::Date;
use tower::ServiceExt;

mock! {
    pub ObservationDb {}
    #[async_trait]
    impl ObservationStore for ObservationDb {
        async fn latest_date(&self) -> Result<Date, Error>;
        async fn observations_in_range(
            &self,
            filter: &ObservationFilter,
        ) -> Result<Vec<Observation>, Error>;
        async fn list_stations(&self) -> Result<Vec<Station>, Error>;
    }
}

pub struct TestApp {
    pub app: Router,
}

pub async fn spawn_app(store: Arc<dyn ObservationStore>) -> TestApp {
    let app_state = app_state_from_store(store, DEFAULT_MOST_ACTIVE_STATION.to_string());
    TestApp {
        app: app(app_state),
    }
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request.");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, body) = self.get(uri).await;
        let json = serde_json::from_slice(&body)
            .unwrap_or_else(|e| panic!("{uri} did not return json ({e}): {body:?}"));
        (status, json)
    }
}

pub fn observation(
    station_id: &str,
    date: &str,
    precipitation: Option<f64>,
    tobs: f64,
) -> Observation {
    Observation {
        station_id: station_id.to_owned(),
        date: date.to_owned(),
        precipitation,
        temperature: tobs,
    }
}

pub fn mock_stations() -> Vec<Station> {
    vec![
        Station {
            station: String::from("USC00519397"),
            name: String::from("WAIKIKI 717.2, HI US"),
            latitude: 21.2716,
            longitude: -157.8168,
            elevation: 3.0,
        },
        Station {
            station: String::from("USC00519281"),
            name: String::from("WAIHEE 837.5, HI US"),
            latitude: 21.45167,
            longitude: -157.84889,
            elevation: 32.9,
        },
    ]
}
