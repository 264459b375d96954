mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date, Duration};
use utoipa::ToSchema;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query sqlite: {0}")]
    Query(#[from] sqlx::Error),
    #[error("No observations in dataset")]
    EmptyDataset,
    #[error("Stored date '{0}' is not in YYYY-MM-DD form")]
    MalformedDate(String),
    #[error("Failed to format date: {0}")]
    TimeFormat(#[from] time::error::Format),
}

/// Read access to the station/observation dataset. Implementations are
/// immutable snapshots, safe to share across request handlers.
#[async_trait]
pub trait ObservationStore: Sync + Send {
    /// Maximum observation date, or [`Error::EmptyDataset`] when there are none.
    async fn latest_date(&self) -> Result<Date, Error>;
    /// Observations matching `filter`, in store order. Both bounds are inclusive.
    async fn observations_in_range(
        &self,
        filter: &ObservationFilter,
    ) -> Result<Vec<Observation>, Error>;
    async fn list_stations(&self) -> Result<Vec<Station>, Error>;
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObservationFilter {
    pub station_id: Option<String>,
    pub start: Option<Date>,
    pub end: Option<Date>,
}

impl ObservationFilter {
    pub fn since(start: Date) -> Self {
        Self {
            start: Some(start),
            ..Default::default()
        }
    }

    /// Everything strictly after `bound`
    pub fn after(bound: Date) -> Self {
        Self::since(bound.saturating_add(Duration::days(1)))
    }

    pub fn between(start: Date, end: Date) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Default::default()
        }
    }

    pub fn for_station(mut self, station_id: impl Into<String>) -> Self {
        self.station_id = Some(station_id.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct Observation {
    pub station_id: String,
    /// `YYYY-MM-DD`, compared as text
    pub date: String,
    pub precipitation: Option<f64>,
    pub temperature: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Station {
    pub station: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

pub fn parse_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
}

pub fn format_date(date: Date) -> Result<String, time::error::Format> {
    date.format(format_description!("[year]-[month]-[day]"))
}
