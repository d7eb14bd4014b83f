use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};
use std::sync::Arc;
use time::Date;

use super::{
    Database, DateBounds, DateRange, Error, PrecipitationReading, Station, StationActivity,
    TemperatureReading, TemperatureStats,
};

/// Read operations the HTTP handlers need from the dataset.
///
/// Dates are compared as ISO-8601 text, which sorts the same way the
/// calendar does.
#[async_trait]
pub trait ClimateData: Sync + Send {
    /// Earliest and latest measurement date, `None` on an empty table
    async fn date_bounds(&self) -> Result<Option<DateBounds>, Error>;
    /// Precipitation readings dated strictly after `after`, ordered by date then station
    async fn precipitation_after(&self, after: Date) -> Result<Vec<PrecipitationReading>, Error>;
    async fn stations(&self) -> Result<Vec<Station>, Error>;
    /// Temperature observation counts per station dated strictly after `after`
    async fn station_activity(&self, after: Date) -> Result<Vec<StationActivity>, Error>;
    /// One station's temperature observations dated strictly after `after`
    async fn temperature_readings(
        &self,
        station: String,
        after: Date,
    ) -> Result<Vec<TemperatureReading>, Error>;
    /// Min, max and mean temperature over an inclusive range, `None` when no rows match
    async fn temperature_stats(&self, range: DateRange) -> Result<Option<TemperatureStats>, Error>;
}

pub struct ClimateAccess {
    db: Arc<Database>,
}

impl ClimateAccess {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ClimateData for ClimateAccess {
    async fn date_bounds(&self) -> Result<Option<DateBounds>, Error> {
        let (earliest, latest): (Option<String>, Option<String>) =
            sqlx::query_as("SELECT MIN(date), MAX(date) FROM measurement")
                .fetch_one(self.db.pool())
                .await?;

        Ok(earliest
            .zip(latest)
            .map(|(earliest, latest)| DateBounds { earliest, latest }))
    }

    async fn precipitation_after(&self, after: Date) -> Result<Vec<PrecipitationReading>, Error> {
        let readings = sqlx::query_as::<_, PrecipitationReading>(
            "SELECT date, CAST(prcp AS REAL) AS prcp
             FROM measurement
             WHERE date > ?
             ORDER BY date, station",
        )
        .bind(after.to_string())
        .fetch_all(self.db.pool())
        .await?;
        Ok(readings)
    }

    async fn stations(&self) -> Result<Vec<Station>, Error> {
        // station ids are unique, grouping keeps that true even for a dirty table
        let stations = sqlx::query_as::<_, Station>(
            "SELECT station, MIN(name) AS name
             FROM station
             GROUP BY station
             ORDER BY station",
        )
        .fetch_all(self.db.pool())
        .await?;
        Ok(stations)
    }

    async fn station_activity(&self, after: Date) -> Result<Vec<StationActivity>, Error> {
        let activity = sqlx::query_as::<_, StationActivity>(
            "SELECT station, COUNT(tobs) AS observations
             FROM measurement
             WHERE date > ?
             GROUP BY station
             ORDER BY station",
        )
        .bind(after.to_string())
        .fetch_all(self.db.pool())
        .await?;
        Ok(activity)
    }

    async fn temperature_readings(
        &self,
        station: String,
        after: Date,
    ) -> Result<Vec<TemperatureReading>, Error> {
        let readings = sqlx::query_as::<_, TemperatureReading>(
            "SELECT date, CAST(tobs AS REAL) AS tobs
             FROM measurement
             WHERE date > ? AND station = ? AND tobs IS NOT NULL
             ORDER BY date",
        )
        .bind(after.to_string())
        .bind(station)
        .fetch_all(self.db.pool())
        .await?;
        Ok(readings)
    }

    async fn temperature_stats(&self, range: DateRange) -> Result<Option<TemperatureStats>, Error> {
        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT CAST(MIN(tobs) AS REAL), CAST(MAX(tobs) AS REAL), AVG(tobs), COUNT(tobs)
             FROM measurement
             WHERE date >= ",
        );
        query.push_bind(range.start.to_string());
        if let Some(end) = range.end {
            query.push(" AND date <= ").push_bind(end.to_string());
        }

        let (min, max, avg, count) = query
            .build_query_as::<(Option<f64>, Option<f64>, Option<f64>, i64)>()
            .fetch_one(self.db.pool())
            .await?;

        if count == 0 {
            return Ok(None);
        }

        Ok(match (min, max, avg) {
            (Some(min), Some(max), Some(avg)) => Some(TemperatureStats { min, max, avg }),
            _ => None,
        })
    }
}
