use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};
use utoipa::ToSchema;

use crate::{precipitation_by_date, AppState, Error};

#[derive(Serialize, Deserialize, Debug, Default, PartialEq, ToSchema)]
pub struct PrecipitationByDate {
    /// Precipitation keyed by ISO-8601 date, ascending
    pub prcp: BTreeMap<String, f64>,
}

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Precipitation for every date in the trailing year", body = PrecipitationByDate),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read the dataset", body = crate::ErrorBody)
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PrecipitationByDate>, Error> {
    let Some(window) = state.window.resolve(state.climate_db.as_ref()).await? else {
        return Ok(Json(PrecipitationByDate::default()));
    };

    let readings = state.climate_db.precipitation_after(window.start).await?;
    Ok(Json(PrecipitationByDate {
        prcp: precipitation_by_date(readings),
    }))
}
