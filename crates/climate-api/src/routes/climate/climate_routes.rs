use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use log::{error, info, warn};
use std::sync::Arc;

use crate::{
    db, parse_request_date, query, AppState, PrecipitationByDate, Station, TemperatureObservation,
    TemperatureSummary,
};

fn error_response(context: &str, err: query::Error) -> (StatusCode, String) {
    match err {
        query::Error::InvalidDateFormat(_) => {
            warn!("rejected request, {}: {}", context, err);
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        query::Error::Store(db::Error::EmptyDataset) => {
            error!("error {}: {}", context, err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                String::from("No observations in dataset"),
            )
        }
        query::Error::Store(_) => {
            error!("error {}: {}", context, err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                String::from("Failed to query observation data"),
            )
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Precipitation per date over the last year of data", content_type = "application/json", body = PrecipitationByDate),
        (status = INTERNAL_SERVER_ERROR, description = "Dataset is empty or could not be queried")
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PrecipitationByDate>, (StatusCode, String)> {
    state
        .queries
        .precipitation_last_year()
        .await
        .map(Json)
        .map_err(|e| error_response("getting precipitation", e))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "All stations in the dataset", content_type = "application/json", body = Vec<Station>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to list stations")
    ))]
pub async fn stations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Station>>, (StatusCode, String)> {
    state
        .queries
        .stations()
        .await
        .map(Json)
        .map_err(|e| error_response("listing stations", e))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Temperature observations for the most active station over the last year of data", content_type = "application/json", body = Vec<TemperatureObservation>),
        (status = INTERNAL_SERVER_ERROR, description = "Dataset is empty or could not be queried")
    ))]
pub async fn tobs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TemperatureObservation>>, (StatusCode, String)> {
    let station = state.queries.most_active_station();
    let observations = state
        .queries
        .most_active_temperatures()
        .await
        .map_err(|e| error_response("getting temperature observations", e))?;
    info!(
        "found {} temperature observations for {}",
        observations.len(),
        station
    );
    Ok(Json(observations))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
        ("start" = String, Path, description = "First date to include, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Min, max and average temperature from the start date to the end of the dataset", content_type = "application/json", body = Vec<TemperatureSummary>),
        (status = BAD_REQUEST, description = "Start date is not YYYY-MM-DD"),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query observations")
    ))]
pub async fn temperature_from(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Result<Json<Vec<TemperatureSummary>>, (StatusCode, String)> {
    let start = parse_request_date(&start).map_err(|e| error_response("parsing start", e))?;
    let summary = state
        .queries
        .temperature_summary(start, None)
        .await
        .map_err(|e| error_response("summarizing temperatures", e))?;
    Ok(Json(vec![summary]))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
        ("start" = String, Path, description = "First date to include, YYYY-MM-DD"),
        ("end" = String, Path, description = "Last date to include, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Min, max and average temperature between the two dates, inclusive", content_type = "application/json", body = Vec<TemperatureSummary>),
        (status = BAD_REQUEST, description = "Start or end date is not YYYY-MM-DD"),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query observations")
    ))]
pub async fn temperature_between(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<Vec<TemperatureSummary>>, (StatusCode, String)> {
    let start = parse_request_date(&start).map_err(|e| error_response("parsing start", e))?;
    let end = parse_request_date(&end).map_err(|e| error_response("parsing end", e))?;
    let summary = state
        .queries
        .temperature_summary(start, Some(end))
        .await
        .map_err(|e| error_response("summarizing temperatures", e))?;
    Ok(Json(vec![summary]))
}
