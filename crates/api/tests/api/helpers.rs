use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use climate_api::{
    app, db, AppState, ClimateData, DateBounds, DateRange, PrecipitationReading, Station,
    StationActivity, TemperatureReading, TemperatureStats, WindowAnchor,
};
use hyper::{header, Method};
use mockall::mock;
use std::sync::Arc;
use time::Date;
use tower::ServiceExt;

mock! {
    pub ClimateAccess {}

    #[async_trait]
    impl ClimateData for ClimateAccess {
        async fn date_bounds(&self) -> Result<Option<DateBounds>, db::Error>;
        async fn precipitation_after(&self, after: Date) -> Result<Vec<PrecipitationReading>, db::Error>;
        async fn stations(&self) -> Result<Vec<Station>, db::Error>;
        async fn station_activity(&self, after: Date) -> Result<Vec<StationActivity>, db::Error>;
        async fn temperature_readings(
            &self,
            station: String,
            after: Date,
        ) -> Result<Vec<TemperatureReading>, db::Error>;
        async fn temperature_stats(&self, range: DateRange) -> Result<Option<TemperatureStats>, db::Error>;
    }
}

pub struct TestApp {
    pub app: Router,
}

pub async fn spawn_app(climate_db: Arc<dyn ClimateData>) -> TestApp {
    spawn_app_with_window(climate_db, WindowAnchor::default()).await
}

pub async fn spawn_app_with_window(
    climate_db: Arc<dyn ClimateData>,
    window: WindowAnchor,
) -> TestApp {
    let app_state = AppState { climate_db, window };
    TestApp {
        app: app(app_state),
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("Response body is not JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Response body is not UTF-8")
    }
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request.");

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();

        TestResponse {
            status,
            content_type,
            body,
        }
    }
}
