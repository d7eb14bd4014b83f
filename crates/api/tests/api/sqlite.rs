use crate::helpers::TestApp;
use axum::http::StatusCode;
use climate_api::{
    app, db, AppState, ClimateAccess, ClimateData, Database, DateRange, Measurement, Station,
    WindowAnchor,
};
use serde_json::json;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::{str::FromStr, sync::Arc};
use time::macros::date;
use uuid::Uuid;

const MEASUREMENT_TABLE: &str = "CREATE TABLE measurement (
    id INTEGER PRIMARY KEY,
    station TEXT,
    date TEXT,
    prcp FLOAT,
    tobs FLOAT
)";

const STATION_TABLE: &str = "CREATE TABLE station (
    id INTEGER PRIMARY KEY,
    station TEXT,
    name TEXT,
    latitude FLOAT,
    longitude FLOAT,
    elevation FLOAT
)";

/// Temp database file, removed on drop
struct TestDatabase {
    path: String,
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

async fn create_database(
    schema: &[&str],
    measurements: &[Measurement],
    stations: &[Station],
) -> TestDatabase {
    let path = std::env::temp_dir()
        .join(format!("climate-api-{}.sqlite", Uuid::now_v7()))
        .to_string_lossy()
        .to_string();

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))
        .unwrap()
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();

    for statement in schema {
        sqlx::query(statement).execute(&pool).await.unwrap();
    }
    for m in measurements {
        sqlx::query("INSERT INTO measurement (station, date, prcp, tobs) VALUES (?, ?, ?, ?)")
            .bind(&m.station)
            .bind(&m.date)
            .bind(m.prcp)
            .bind(m.tobs)
            .execute(&pool)
            .await
            .unwrap();
    }
    for s in stations {
        sqlx::query("INSERT INTO station (station, name) VALUES (?, ?)")
            .bind(&s.station)
            .bind(&s.name)
            .execute(&pool)
            .await
            .unwrap();
    }
    pool.close().await;

    TestDatabase { path }
}

fn measurement(station: &str, date: &str, prcp: Option<f64>, tobs: f64) -> Measurement {
    Measurement {
        station: station.to_string(),
        date: date.to_string(),
        prcp,
        tobs,
    }
}

fn station(station: &str, name: &str) -> Station {
    Station {
        station: station.to_string(),
        name: name.to_string(),
    }
}

fn sample_measurements() -> Vec<Measurement> {
    vec![
        measurement("USC1", "2016-08-22", Some(2.0), 60.0),
        measurement("USC1", "2016-08-23", Some(1.0), 61.0),
        measurement("USC1", "2016-08-24", Some(0.5), 70.0),
        measurement("USC1", "2017-08-20", Some(0.1), 70.0),
        measurement("USC1", "2017-08-22", None, 72.0),
        measurement("USC2", "2017-08-21", Some(0.0), 80.0),
        measurement("USC2", "2017-08-22", Some(0.3), 81.0),
        measurement("USC2", "2017-08-23", Some(0.2), 82.0),
        measurement("USC3", "2017-08-23", None, 65.0),
    ]
}

fn sample_stations() -> Vec<Station> {
    vec![
        station("USC2", "Station B"),
        station("USC1", "Station A"),
        station("USC3", "Station C"),
    ]
}

async fn open(test_db: &TestDatabase) -> ClimateAccess {
    let db = Database::new(&test_db.path, 2)
        .await
        .expect("Failed to open test database");
    ClimateAccess::new(Arc::new(db))
}

#[tokio::test]
async fn reads_date_bounds() {
    let test_db = create_database(
        &[MEASUREMENT_TABLE, STATION_TABLE],
        &sample_measurements(),
        &sample_stations(),
    )
    .await;
    let climate_db = open(&test_db).await;

    let bounds = climate_db.date_bounds().await.unwrap().unwrap();
    assert_eq!(bounds.earliest, "2016-08-22");
    assert_eq!(bounds.latest, "2017-08-23");
}

#[tokio::test]
async fn empty_tables_have_no_bounds() {
    let test_db = create_database(&[MEASUREMENT_TABLE, STATION_TABLE], &[], &[]).await;
    let climate_db = open(&test_db).await;

    assert!(climate_db.date_bounds().await.unwrap().is_none());
    assert!(climate_db
        .precipitation_after(date!(2016 - 08 - 23))
        .await
        .unwrap()
        .is_empty());
    assert!(climate_db.stations().await.unwrap().is_empty());
}

#[tokio::test]
async fn precipitation_is_strictly_after_the_window_start() {
    let test_db = create_database(
        &[MEASUREMENT_TABLE, STATION_TABLE],
        &sample_measurements(),
        &sample_stations(),
    )
    .await;
    let climate_db = open(&test_db).await;

    let readings = climate_db
        .precipitation_after(date!(2016 - 08 - 23))
        .await
        .unwrap();
    let dates: Vec<&str> = readings.iter().map(|r| r.date.as_str()).collect();

    assert_eq!(
        dates,
        vec![
            "2016-08-24",
            "2017-08-20",
            "2017-08-21",
            "2017-08-22",
            "2017-08-22",
            "2017-08-23",
            "2017-08-23"
        ]
    );
    // missing readings come back as None, not zero
    assert_eq!(readings[3].prcp, None);
    assert_eq!(readings[2].prcp, Some(0.0));
}

#[tokio::test]
async fn stations_are_distinct_and_ordered() {
    let mut stations = sample_stations();
    stations.push(station("USC1", "Station A"));
    let test_db = create_database(
        &[MEASUREMENT_TABLE, STATION_TABLE],
        &sample_measurements(),
        &stations,
    )
    .await;
    let climate_db = open(&test_db).await;

    let stations = climate_db.stations().await.unwrap();
    assert_eq!(
        stations,
        vec![
            station("USC1", "Station A"),
            station("USC2", "Station B"),
            station("USC3", "Station C"),
        ]
    );
}

#[tokio::test]
async fn station_activity_counts_window_rows() {
    let test_db = create_database(
        &[MEASUREMENT_TABLE, STATION_TABLE],
        &sample_measurements(),
        &sample_stations(),
    )
    .await;
    let climate_db = open(&test_db).await;

    let activity = climate_db
        .station_activity(date!(2016 - 08 - 23))
        .await
        .unwrap();
    let counts: Vec<(&str, i64)> = activity
        .iter()
        .map(|a| (a.station.as_str(), a.observations))
        .collect();

    assert_eq!(counts, vec![("USC1", 3), ("USC2", 3), ("USC3", 1)]);
}

#[tokio::test]
async fn temperature_readings_are_limited_to_one_station() {
    let test_db = create_database(
        &[MEASUREMENT_TABLE, STATION_TABLE],
        &sample_measurements(),
        &sample_stations(),
    )
    .await;
    let climate_db = open(&test_db).await;

    let readings = climate_db
        .temperature_readings(String::from("USC2"), date!(2016 - 08 - 23))
        .await
        .unwrap();
    let pairs: Vec<(&str, f64)> = readings.iter().map(|r| (r.date.as_str(), r.tobs)).collect();

    assert_eq!(
        pairs,
        vec![("2017-08-21", 80.0), ("2017-08-22", 81.0), ("2017-08-23", 82.0)]
    );
}

#[tokio::test]
async fn temperature_stats_filter_on_measurement_date() {
    let test_db = create_database(
        &[MEASUREMENT_TABLE, STATION_TABLE],
        &sample_measurements(),
        &sample_stations(),
    )
    .await;
    let climate_db = open(&test_db).await;

    let since = climate_db
        .temperature_stats(DateRange::since(date!(2017 - 08 - 22)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(since.min, 65.0);
    assert_eq!(since.max, 82.0);
    assert_eq!(since.avg, 75.0);

    let between = climate_db
        .temperature_stats(DateRange::between(
            date!(2016 - 08 - 23),
            date!(2016 - 08 - 24),
        ))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(between.min, 61.0);
    assert_eq!(between.max, 70.0);
    assert_eq!(between.avg, 65.5);

    let empty = climate_db
        .temperature_stats(DateRange::between(
            date!(2000 - 01 - 01),
            date!(2000 - 12 - 31),
        ))
        .await
        .unwrap();
    assert!(empty.is_none());
}

#[tokio::test]
async fn rejects_schema_missing_columns() {
    let test_db = create_database(
        &[
            "CREATE TABLE measurement (id INTEGER PRIMARY KEY, station TEXT, date TEXT, prcp FLOAT)",
            STATION_TABLE,
        ],
        &[],
        &[],
    )
    .await;

    let result = Database::new(&test_db.path, 1).await;
    match result {
        Err(db::Error::Schema { table, missing }) => {
            assert_eq!(table, "measurement");
            assert_eq!(missing, vec![String::from("tobs")]);
        }
        Err(other) => panic!("expected schema error, got {}", other),
        Ok(_) => panic!("expected schema error, got a database"),
    }
}

#[tokio::test]
async fn rejects_missing_station_table() {
    let test_db = create_database(&[MEASUREMENT_TABLE], &[], &[]).await;

    let result = Database::new(&test_db.path, 1).await;
    assert!(matches!(
        result,
        Err(db::Error::Schema {
            table: "station",
            ..
        })
    ));
}

#[tokio::test]
async fn rejects_missing_database_file() {
    let result = Database::new("/nonexistent/climate/hawaii.sqlite", 1).await;
    assert!(matches!(result, Err(db::Error::MissingDatabase(_))));
}

#[tokio::test]
async fn serves_routes_from_sqlite() {
    let test_db = create_database(
        &[MEASUREMENT_TABLE, STATION_TABLE],
        &[
            measurement("USC1", "2017-08-20", Some(0.1), 70.0),
            measurement("USC1", "2017-08-22", None, 72.0),
            measurement("USC2", "2017-08-21", Some(0.4), 90.0),
            // outside the window, so USC2 stays the less active station
            measurement("USC2", "2016-08-20", None, 50.0),
            measurement("USC2", "2016-08-21", None, 51.0),
        ],
        &[station("USC1", "Station A"), station("USC2", "Station B")],
    )
    .await;
    let climate_db = open(&test_db).await;
    let test_app = TestApp {
        app: app(AppState {
            climate_db: Arc::new(climate_db),
            window: WindowAnchor::default(),
        }),
    };

    let response = test_app.get("/api/v1.0/precipitation").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({"prcp": {"2017-08-20": 0.1, "2017-08-21": 0.4}})
    );

    let response = test_app.get("/api/v1.0/stations").await;
    assert_eq!(
        response.text(),
        r#"[["USC1","Station A"],["USC2","Station B"]]"#
    );

    let response = test_app.get("/api/v1.0/tobs").await;
    assert_eq!(
        response.json(),
        json!([["2017-08-20", 70.0], ["2017-08-22", 72.0]])
    );

    let response = test_app.get("/api/v1.0/2017/8/21").await;
    assert_eq!(
        response.json(),
        json!({
            "Max Temperature": 90.0,
            "Min Temperature": 72.0,
            "Average Temperature": 81.0
        })
    );

    let response = test_app.get("/api/v1.0/2017-08-01/2017-08-20").await;
    assert_eq!(
        response.json(),
        json!({"Min temp": 70.0, "Max temp": 70.0, "Average": 70.0})
    );
}
