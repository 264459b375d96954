use axum::extract::State;
use log::warn;
use std::sync::Arc;

use crate::{db, query, AppState};

pub const ROUTE_LISTING: &str = "Available Routes:
/api/v1.0/precipitation
/api/v1.0/stations
/api/v1.0/tobs
/api/v1.0/{start} (min, max and average temperature from a start date, format YYYY-MM-DD)
/api/v1.0/{start}/{end} (min, max and average temperature between two dates, inclusive)
/docs (API documentation)
";

/// Plain text listing of the available routes plus the most recent date in
/// the dataset (GET /)
pub async fn index_handler(State(state): State<Arc<AppState>>) -> String {
    let latest = match state.queries.latest_date().await {
        Ok(latest) => format!("Most recent date in dataset: {}", latest),
        Err(query::Error::Store(db::Error::EmptyDataset)) => {
            String::from("Most recent date in dataset: none, no observations loaded")
        }
        Err(e) => {
            warn!("error getting latest date for index: {}", e);
            String::from("Most recent date in dataset: unavailable")
        }
    };

    format!("{}\n{}\n", ROUTE_LISTING, latest)
}
