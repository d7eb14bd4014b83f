use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    date_from_parts, db::DateRange, parse_iso_date, AppState, Error, TemperatureStats,
};

/// Temperature summary for every measurement on or after a date
#[derive(Serialize, Deserialize, Debug, PartialEq, ToSchema)]
pub struct TemperatureSince {
    #[serde(rename = "Max Temperature")]
    pub max_temperature: f64,
    #[serde(rename = "Min Temperature")]
    pub min_temperature: f64,
    #[serde(rename = "Average Temperature")]
    pub average_temperature: f64,
}

impl From<TemperatureStats> for TemperatureSince {
    fn from(stats: TemperatureStats) -> Self {
        Self {
            max_temperature: stats.max,
            min_temperature: stats.min,
            average_temperature: stats.avg,
        }
    }
}

/// Temperature summary for an inclusive date range
#[derive(Serialize, Deserialize, Debug, PartialEq, ToSchema)]
pub struct TemperatureBetween {
    #[serde(rename = "Min temp")]
    pub min_temp: f64,
    #[serde(rename = "Max temp")]
    pub max_temp: f64,
    #[serde(rename = "Average")]
    pub average: f64,
}

impl From<TemperatureStats> for TemperatureBetween {
    fn from(stats: TemperatureStats) -> Self {
        Self {
            min_temp: stats.min,
            max_temp: stats.max,
            average: stats.avg,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{year}/{month}/{day}",
    params(
        ("year" = String, Path, description = "Four digit year"),
        ("month" = String, Path, description = "Month number, 1-12"),
        ("day" = String, Path, description = "Day of the month"),
    ),
    responses(
        (status = OK, description = "Min, max and average tobs on or after the date", body = TemperatureSince),
        (status = BAD_REQUEST, description = "Date segments are not a valid calendar date", body = crate::ErrorBody),
        (status = NOT_FOUND, description = "No measurements on or after the date", body = crate::ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read the dataset", body = crate::ErrorBody)
    ))]
pub async fn temperature_since(
    State(state): State<Arc<AppState>>,
    path: Result<Path<(String, String, String)>, PathRejection>,
) -> Result<Json<TemperatureSince>, Error> {
    let Path((year, month, day)) = path?;
    let start = date_from_parts(&year, &month, &day)?;

    let stats = state
        .climate_db
        .temperature_stats(DateRange::since(start))
        .await?
        .ok_or_else(|| Error::NotFound(format!("No temperature observations on or after {}", start)))?;

    Ok(Json(stats.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start_date}/{end_date}",
    params(
        ("start_date" = String, Path, description = "First date included, YYYY-MM-DD"),
        ("end_date" = String, Path, description = "Last date included, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Min, max and average tobs between the dates inclusive", body = TemperatureBetween),
        (status = BAD_REQUEST, description = "A date is malformed or the range is reversed", body = crate::ErrorBody),
        (status = NOT_FOUND, description = "No measurements in the range", body = crate::ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read the dataset", body = crate::ErrorBody)
    ))]
pub async fn temperature_between(
    State(state): State<Arc<AppState>>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<TemperatureBetween>, Error> {
    let Path((start_date, end_date)) = path?;
    let start = parse_iso_date(&start_date)?;
    let end = parse_iso_date(&end_date)?;
    if start > end {
        return Err(Error::BadRequest(format!(
            "Start date {} is after end date {}",
            start, end
        )));
    }

    let stats = state
        .climate_db
        .temperature_stats(DateRange::between(start, end))
        .await?
        .ok_or_else(|| {
            Error::NotFound(format!(
                "No temperature observations between {} and {}",
                start, end
            ))
        })?;

    Ok(Json(stats.into()))
}
