pub mod analysis;
pub mod db;
mod error;
pub mod routes;
mod startup;
mod utils;

pub use analysis::*;
pub use db::{
    ClimateAccess, ClimateData, Database, DateBounds, DateRange, Measurement,
    PrecipitationReading, Station, StationActivity, TemperatureReading, TemperatureStats,
};
pub use error::{Error, ErrorBody};
pub use routes::*;
pub use startup::*;
pub use utils::*;
