use axum::{extract::State, Json};
use log::debug;
use std::sync::Arc;

use crate::{most_active_station, AppState, Error};

/// Serialized as a two element array: `[date, tobs]`
pub type TemperaturePair = (String, f64);

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "`[date, tobs]` pairs from the most active station over the trailing year"),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read the dataset", body = crate::ErrorBody)
    ))]
pub async fn tobs(State(state): State<Arc<AppState>>) -> Result<Json<Vec<TemperaturePair>>, Error> {
    let Some(window) = state.window.resolve(state.climate_db.as_ref()).await? else {
        return Ok(Json(vec![]));
    };

    let activity = state.climate_db.station_activity(window.start).await?;
    let Some(station) = most_active_station(&activity) else {
        return Ok(Json(vec![]));
    };
    debug!("most active station after {}: {}", window.start, station);

    let readings = state
        .climate_db
        .temperature_readings(station.to_owned(), window.start)
        .await?;

    Ok(Json(
        readings
            .into_iter()
            .map(|reading| (reading.date, reading.tobs))
            .collect(),
    ))
}
