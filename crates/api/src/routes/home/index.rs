use std::sync::Arc;

use axum::extract::State;

use crate::{AppState, Error};

const AVAILABLE_ROUTES: &[&str] = &[
    "/api/v1.0/precipitation",
    "/api/v1.0/stations",
    "/api/v1.0/tobs",
    "/api/v1.0/<year>/<month>/<day>",
    "/api/v1.0/<start_date>/<end_date>",
];

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = OK, description = "Plain text list of routes and the dates with measurements", content_type = "text/plain", body = String),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read the dataset", body = crate::ErrorBody)
    ))]
pub async fn welcome(State(state): State<Arc<AppState>>) -> Result<String, Error> {
    let bounds = state.climate_db.date_bounds().await?;

    let mut body = String::from("Available Routes:\n");
    for route in AVAILABLE_ROUTES {
        body.push_str(route);
        body.push('\n');
    }
    body.push_str("\nAvailable Dates:\n");
    match bounds {
        Some(bounds) => body.push_str(&format!(
            "choose dates between {} and {}\n",
            bounds.earliest, bounds.latest
        )),
        None => body.push_str("no measurements available\n"),
    }

    Ok(body)
}
