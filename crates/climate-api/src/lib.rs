pub mod db;
pub mod query;
pub mod routes;
mod startup;
mod utils;

pub use db::{MemoryStore, Observation, ObservationFilter, ObservationStore, SqliteStore, Station};
pub use query::{
    parse_request_date, trailing_window_start, ClimateQueries, PrecipitationByDate,
    TemperatureObservation, TemperatureSummary, DEFAULT_MOST_ACTIVE_STATION, TRAILING_WINDOW_DAYS,
};
pub use routes::*;
pub use startup::*;
pub use utils::*;
