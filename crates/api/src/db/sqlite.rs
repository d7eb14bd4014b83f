use climate_api_core::is_readable_file;
use log::{debug, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::{str::FromStr, time::Duration};

use super::{Error, Measurement, Station, TableSchema};

/// Read-only handle on the climate dataset.
///
/// Every query checks a connection out of the pool and hands it back when the
/// query finishes, so no connection outlives a single read.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(path: &str, max_connections: u32) -> Result<Self, Error> {
        if !is_readable_file(path) {
            return Err(Error::MissingDatabase(path.to_owned()));
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .read_only(true)
            .create_if_missing(false)
            .pragma("busy_timeout", "5000")
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "MEMORY");

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.health_check().await?;
        db.validate_schema().await?;
        info!("SQLite dataset opened read-only at: {}", path);

        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check database connectivity.
    pub async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    /// Fail fast when the live schema lacks a column the queries rely on.
    pub async fn validate_schema(&self) -> Result<(), Error> {
        self.check_table::<Measurement>().await?;
        self.check_table::<Station>().await?;
        Ok(())
    }

    async fn check_table<T: TableSchema>(&self) -> Result<(), Error> {
        let columns = self.table_columns(T::TABLE).await?;
        debug!("table `{}` has columns: {:?}", T::TABLE, columns);

        let missing: Vec<String> = T::COLUMNS
            .iter()
            .filter(|required| !columns.iter().any(|c| c.eq_ignore_ascii_case(required)))
            .map(|required| required.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Schema {
                table: T::TABLE,
                missing,
            })
        }
    }

    async fn table_columns(&self, table: &str) -> Result<Vec<String>, Error> {
        let columns: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info(?)")
            .bind(table)
            .fetch_all(&self.pool)
            .await?;
        Ok(columns)
    }
}
