use crate::{
    db::{self, ClimateAccess, ClimateData, Database},
    precipitation, routes, stations, temperature_between, temperature_since, tobs, welcome,
    Error, WindowAnchor,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    http::Uri,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{header::ACCEPT, Method};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    pub climate_db: Arc<dyn ClimateData>,
    pub window: WindowAnchor,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::home::index::welcome,
        routes::api::precipitation::precipitation,
        routes::api::stations::stations,
        routes::api::tobs::tobs,
        routes::api::temperature::temperature_since,
        routes::api::temperature::temperature_between,
    ),
    components(
        schemas(
                crate::ErrorBody,
                db::Station,
                routes::api::precipitation::PrecipitationByDate,
                routes::api::temperature::TemperatureSince,
                routes::api::temperature::TemperatureBetween,
            )
    ),
    tags(
        (name = "hawaii climate api", description = "a read-only RESTful api over Hawaii precipitation and temperature observations")
    )
)]
struct ApiDoc;

pub async fn build_app_state(
    database_path: String,
    max_connections: u32,
    window: WindowAnchor,
) -> Result<AppState, anyhow::Error> {
    let db = Arc::new(
        Database::new(&database_path, max_connections)
            .await
            .map_err(|e| anyhow!("error opening climate dataset: {}", e))?,
    );
    let climate_db = Arc::new(ClimateAccess::new(db));

    Ok(AppState { climate_db, window })
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT])
        .allow_origin(Any);

    Router::new()
        .route("/", get(welcome))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{year}/{month}/{day}", get(temperature_since))
        .route("/api/v1.0/{start_date}/{end_date}", get(temperature_between))
        .fallback(route_not_found)
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn route_not_found(uri: Uri) -> Error {
    Error::NotFound(format!("No route for {}", uri.path()))
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default()
        .to_owned();
    info!(target: "http_request", "new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, {} code: {}, time: {}", path, response.status().as_str(), response_time);

    response
}
