use async_trait::async_trait;
use time::Date;

use super::{
    format_date, parse_date, Error, Observation, ObservationFilter, ObservationStore, Station,
};

/// Observation store held entirely in memory. Vector order is store order.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    stations: Vec<Station>,
    observations: Vec<Observation>,
}

impl MemoryStore {
    pub fn new(stations: Vec<Station>, observations: Vec<Observation>) -> Self {
        Self {
            stations,
            observations,
        }
    }
}

#[async_trait]
impl ObservationStore for MemoryStore {
    async fn latest_date(&self) -> Result<Date, Error> {
        let latest = self
            .observations
            .iter()
            .map(|o| o.date.as_str())
            .max()
            .ok_or(Error::EmptyDataset)?;
        parse_date(latest).map_err(|_| Error::MalformedDate(latest.to_owned()))
    }

    async fn observations_in_range(
        &self,
        filter: &ObservationFilter,
    ) -> Result<Vec<Observation>, Error> {
        let start = filter.start.map(format_date).transpose()?;
        let end = filter.end.map(format_date).transpose()?;

        Ok(self
            .observations
            .iter()
            .filter(|o| {
                filter
                    .station_id
                    .as_ref()
                    .map_or(true, |id| &o.station_id == id)
            })
            .filter(|o| start.as_ref().map_or(true, |s| o.date >= *s))
            .filter(|o| end.as_ref().map_or(true, |e| o.date <= *e))
            .cloned()
            .collect())
    }

    async fn list_stations(&self) -> Result<Vec<Station>, Error> {
        Ok(self.stations.clone())
    }
}
