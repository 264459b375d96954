use log::debug;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};
use time::{Date, Duration};
use utoipa::ToSchema;

use crate::db::{self, parse_date, Observation, ObservationFilter, ObservationStore, Station};

/// Length of the trailing window, counted back from the latest recorded date
pub const TRAILING_WINDOW_DAYS: i64 = 365;

/// Station reported by the tobs query. Fixed rather than derived from
/// observation counts.
pub const DEFAULT_MOST_ACTIVE_STATION: &str = "USC00519281";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] db::Error),
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDateFormat(String),
}

/// Precipitation keyed by `YYYY-MM-DD`, sorted by date
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, ToSchema)]
pub struct PrecipitationByDate(pub BTreeMap<String, Option<f64>>);

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct TemperatureObservation {
    pub date: String,
    pub tobs: f64,
}

/// Min/max/average temperature over a set of observations. All three are
/// `None` when the set is empty.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, ToSchema)]
pub struct TemperatureSummary {
    #[serde(rename = "Min Temp")]
    pub min_temp: Option<f64>,
    #[serde(rename = "Max Temp")]
    pub max_temp: Option<f64>,
    #[serde(rename = "Avg Temp")]
    pub avg_temp: Option<f64>,
}

impl TemperatureSummary {
    pub fn from_observations(observations: &[Observation]) -> Self {
        if observations.is_empty() {
            return Self::default();
        }

        let (min, max, sum) = observations.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), o| {
                (
                    min.min(o.temperature),
                    max.max(o.temperature),
                    sum + o.temperature,
                )
            },
        );

        Self {
            min_temp: Some(min),
            max_temp: Some(max),
            avg_temp: Some(sum / observations.len() as f64),
        }
    }
}

/// The supported aggregate queries, evaluated against a shared read-only store.
#[derive(Clone)]
pub struct ClimateQueries {
    store: Arc<dyn ObservationStore>,
    most_active_station: String,
}

impl ClimateQueries {
    pub fn new(store: Arc<dyn ObservationStore>, most_active_station: impl Into<String>) -> Self {
        Self {
            store,
            most_active_station: most_active_station.into(),
        }
    }

    pub fn most_active_station(&self) -> &str {
        &self.most_active_station
    }

    pub async fn latest_date(&self) -> Result<Date, Error> {
        Ok(self.store.latest_date().await?)
    }

    /// Lower bound of the trailing window: latest date minus 365 calendar
    /// days. The bound itself is excluded, so the window opens the day after.
    pub async fn window_start(&self) -> Result<Date, Error> {
        let latest = self.store.latest_date().await?;
        let start = trailing_window_start(latest);
        debug!("trailing window: after {} up to {}", start, latest);
        Ok(start)
    }

    /// Precipitation for every date in the trailing window, across all
    /// stations. When stations share a date the last row in store order wins.
    pub async fn precipitation_last_year(&self) -> Result<PrecipitationByDate, Error> {
        let start = self.window_start().await?;
        let observations = self
            .store
            .observations_in_range(&ObservationFilter::after(start))
            .await?;

        let mut by_date = BTreeMap::new();
        for observation in observations {
            by_date.insert(observation.date, observation.precipitation);
        }
        Ok(PrecipitationByDate(by_date))
    }

    pub async fn stations(&self) -> Result<Vec<Station>, Error> {
        Ok(self.store.list_stations().await?)
    }

    /// Temperature readings in the trailing window for the configured most
    /// active station. An unknown station id gives an empty list.
    pub async fn most_active_temperatures(&self) -> Result<Vec<TemperatureObservation>, Error> {
        let start = self.window_start().await?;
        let filter =
            ObservationFilter::after(start).for_station(self.most_active_station.as_str());
        let observations = self.store.observations_in_range(&filter).await?;

        Ok(observations
            .into_iter()
            .map(|o| TemperatureObservation {
                date: o.date,
                tobs: o.temperature,
            })
            .collect())
    }

    /// Temperature summary over all stations from `start` onwards, or up to
    /// and including `end` when given.
    pub async fn temperature_summary(
        &self,
        start: Date,
        end: Option<Date>,
    ) -> Result<TemperatureSummary, Error> {
        let filter = match end {
            Some(end) => ObservationFilter::between(start, end),
            None => ObservationFilter::since(start),
        };
        let observations = self.store.observations_in_range(&filter).await?;
        Ok(TemperatureSummary::from_observations(&observations))
    }
}

pub fn trailing_window_start(latest: Date) -> Date {
    latest.saturating_sub(Duration::days(TRAILING_WINDOW_DAYS))
}

/// Parse a `YYYY-MM-DD` request value.
pub fn parse_request_date(value: &str) -> Result<Date, Error> {
    parse_date(value).map_err(|_| Error::InvalidDateFormat(value.to_owned()))
}
