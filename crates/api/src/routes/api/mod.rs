pub mod precipitation;
pub mod stations;
pub mod temperature;
pub mod tobs;

pub use precipitation::*;
pub use stations::*;
pub use temperature::*;
pub use tobs::*;
