use std::{fmt, str::FromStr};
use time::{macros::date, Date};

use super::{months_before, parse_iso_date, DateError};
use crate::db::{self, ClimateData};

/// Last day of the Hawaii dataset, anchoring the "previous year" queries
pub const REFERENCE_DATE: Date = date!(2017 - 08 - 23);

/// Length of the trailing window in calendar months
pub const WINDOW_MONTHS: u8 = 12;

/// The period used by the precipitation and tobs routes.
///
/// Only the lower bound filters rows: a measurement belongs to the window
/// when its date is strictly after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailingWindow {
    pub start: Date,
}

impl TrailingWindow {
    pub fn ending(reference: Date) -> Result<Self, DateError> {
        Ok(Self {
            start: months_before(reference, WINDOW_MONTHS)?,
        })
    }
}

/// Where the trailing window ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAnchor {
    /// A pinned reference date
    Fixed(Date),
    /// The newest measurement date, looked up on every request
    Latest,
}

impl Default for WindowAnchor {
    fn default() -> Self {
        WindowAnchor::Fixed(REFERENCE_DATE)
    }
}

impl FromStr for WindowAnchor {
    type Err = DateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("latest") {
            Ok(WindowAnchor::Latest)
        } else {
            Ok(WindowAnchor::Fixed(parse_iso_date(value.trim())?))
        }
    }
}

impl fmt::Display for WindowAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowAnchor::Fixed(date) => write!(f, "{}", date),
            WindowAnchor::Latest => write!(f, "latest"),
        }
    }
}

impl WindowAnchor {
    /// Resolve the window for one request. `None` means the anchor follows
    /// the data and there is no data.
    pub async fn resolve(
        &self,
        climate_db: &dyn ClimateData,
    ) -> Result<Option<TrailingWindow>, db::Error> {
        let reference = match self {
            WindowAnchor::Fixed(date) => *date,
            WindowAnchor::Latest => match climate_db.date_bounds().await? {
                Some(bounds) => parse_iso_date(&bounds.latest)?,
                None => return Ok(None),
            },
        };
        Ok(Some(TrailingWindow::ending(reference)?))
    }
}
