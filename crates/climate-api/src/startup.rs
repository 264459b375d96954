use crate::{routes, ClimateQueries, ObservationStore, SqliteStore};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{header::ACCEPT, Method};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    pub queries: ClimateQueries,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::climate::climate_routes::precipitation,
        routes::climate::climate_routes::stations,
        routes::climate::climate_routes::tobs,
        routes::climate::climate_routes::temperature_from,
        routes::climate::climate_routes::temperature_between,
    ),
    components(
        schemas(
                crate::Station,
                crate::PrecipitationByDate,
                crate::TemperatureObservation,
                crate::TemperatureSummary,
        )
    ),
    tags(
        (name = "station climate api", description = "a read-only api over daily station precipitation and temperature observations")
    )
)]
struct ApiDoc;

pub async fn build_app_state(
    database_path: String,
    most_active_station: String,
) -> Result<AppState, anyhow::Error> {
    let store: Arc<dyn ObservationStore> = Arc::new(
        SqliteStore::connect(&database_path)
            .await
            .map_err(|e| anyhow!("error opening observation dataset {}: {}", database_path, e))?,
    );
    Ok(app_state_from_store(store, most_active_station))
}

pub fn app_state_from_store(
    store: Arc<dyn ObservationStore>,
    most_active_station: String,
) -> AppState {
    AppState {
        queries: ClimateQueries::new(store, most_active_station),
    }
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT])
        .allow_origin(Any);

    Router::new()
        .route("/", get(routes::index_handler))
        .route("/api/v1.0/precipitation", get(routes::precipitation))
        .route("/api/v1.0/stations", get(routes::stations))
        .route("/api/v1.0/tobs", get(routes::tobs))
        .route("/api/v1.0/{start}", get(routes::temperature_from))
        .route("/api/v1.0/{start}/{end}", get(routes::temperature_between))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default()
        .to_owned();
    info!(target: "http_request", "new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(
        target: "http_response",
        "response, {} code: {}, time: {}",
        path,
        response.status().as_str(),
        response_time
    );

    response
}
