mod climate_data;
mod sqlite;

pub use climate_data::{ClimateAccess, ClimateData};
pub use sqlite::Database;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Date;
use utoipa::ToSchema;

use crate::analysis::DateError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query sqlite: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Database file not found: {0}")]
    MissingDatabase(String),
    #[error("Table `{table}` is missing required columns: {}", missing.join(", "))]
    Schema {
        table: &'static str,
        missing: Vec<String>,
    },
    #[error("Stored date is not usable: {0}")]
    InvalidDate(#[from] DateError),
}

/// A statically declared table the service reads from.
///
/// The live database is checked against these columns once at startup.
pub trait TableSchema {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];
}

/// One dated observation from the `measurement` table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, FromRow)]
pub struct Measurement {
    pub station: String,
    /// ISO-8601 calendar date, `YYYY-MM-DD`
    pub date: String,
    /// Precipitation; `None` is a missing reading, not zero
    pub prcp: Option<f64>,
    /// Temperature observation
    pub tobs: f64,
}

impl TableSchema for Measurement {
    const TABLE: &'static str = "measurement";
    const COLUMNS: &'static [&'static str] = &["station", "date", "prcp", "tobs"];
}

/// A weather station from the `station` table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, FromRow, ToSchema)]
pub struct Station {
    pub station: String,
    pub name: String,
}

impl TableSchema for Station {
    const TABLE: &'static str = "station";
    const COLUMNS: &'static [&'static str] = &["station", "name"];
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct PrecipitationReading {
    pub date: String,
    pub prcp: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct TemperatureReading {
    pub date: String,
    pub tobs: f64,
}

/// Number of temperature observations a station reported in a window
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct StationActivity {
    pub station: String,
    pub observations: i64,
}

/// Earliest and latest measurement dates in the dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateBounds {
    pub earliest: String,
    pub latest: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/// Inclusive date range; an open end reaches the last measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Option<Date>,
}

impl DateRange {
    pub fn since(start: Date) -> Self {
        Self { start, end: None }
    }

    pub fn between(start: Date, end: Date) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }
}
