use async_trait::async_trait;
use log::{debug, info, trace};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::time::Duration;
use time::Date;

use super::{
    format_date, parse_date, Error, Observation, ObservationFilter, ObservationStore, Station,
};

/// Observation store over a pre-populated sqlite file with `measurement` and
/// `station` tables. Opened read-only; the file is never created or migrated.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(path: &str) -> Result<Self, Error> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false)
            .pragma("busy_timeout", "5000");

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        info!("Opened observation dataset at: {}", path);
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ObservationStore for SqliteStore {
    async fn latest_date(&self) -> Result<Date, Error> {
        // Connection goes back to the pool when `conn` drops, on every path
        let mut conn = self.pool.acquire().await?;
        let latest =
            sqlx::query_scalar::<_, Option<String>>("SELECT MAX(date) FROM measurement")
                .fetch_one(&mut *conn)
                .await?;

        let latest = latest.ok_or(Error::EmptyDataset)?;
        trace!("latest observation date: {}", latest);
        parse_date(&latest).map_err(|_| Error::MalformedDate(latest))
    }

    async fn observations_in_range(
        &self,
        filter: &ObservationFilter,
    ) -> Result<Vec<Observation>, Error> {
        let mut clauses: Vec<&str> = Vec::new();
        let mut values: Vec<String> = Vec::new();

        if let Some(station_id) = &filter.station_id {
            clauses.push("station = ?");
            values.push(station_id.clone());
        }
        if let Some(start) = filter.start {
            clauses.push("date >= ?");
            values.push(format_date(start)?);
        }
        if let Some(end) = filter.end {
            clauses.push("date <= ?");
            values.push(format_date(end)?);
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        let query_sql = format!(
            r#"
            SELECT
                station AS station_id,
                date,
                prcp AS precipitation,
                tobs AS temperature
            FROM measurement
            {}
            ORDER BY id
            "#,
            where_clause
        );
        debug!("observation query filters: {:?}", values);

        let mut query = sqlx::query_as::<_, Observation>(&query_sql);
        for value in values {
            query = query.bind(value);
        }

        let mut conn = self.pool.acquire().await?;
        let observations = query.fetch_all(&mut *conn).await?;
        trace!("observation query returned {} rows", observations.len());
        Ok(observations)
    }

    async fn list_stations(&self) -> Result<Vec<Station>, Error> {
        let mut conn = self.pool.acquire().await?;
        let stations = sqlx::query_as::<_, Station>(
            r#"
            SELECT station, name, latitude, longitude, elevation
            FROM station
            ORDER BY id
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(stations)
    }
}
