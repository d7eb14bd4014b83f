//! Date handling and in-process aggregation shared by the API routes

mod dates;
mod summary;
mod window;

pub use dates::{date_from_parts, months_before, parse_iso_date, DateError};
pub use summary::{most_active_station, precipitation_by_date};
pub use window::{TrailingWindow, WindowAnchor, REFERENCE_DATE, WINDOW_MONTHS};
