use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{AppState, Error};

/// Serialized as a two element array: `[station, name]`
pub type StationPair = (String, String);

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Every station as a `[station, name]` pair"),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read the dataset", body = crate::ErrorBody)
    ))]
pub async fn stations(State(state): State<Arc<AppState>>) -> Result<Json<Vec<StationPair>>, Error> {
    let stations = state.climate_db.stations().await?;
    Ok(Json(
        stations
            .into_iter()
            .map(|station| (station.station, station.name))
            .collect(),
    ))
}
