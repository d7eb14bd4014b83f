use itertools::Itertools;
use std::collections::BTreeMap;

use crate::db::{PrecipitationReading, StationActivity};

/// Map each date to its precipitation, skipping missing readings.
///
/// Readings arrive ordered by date then station; when several stations
/// report on the same date the last one wins.
pub fn precipitation_by_date(
    readings: impl IntoIterator<Item = PrecipitationReading>,
) -> BTreeMap<String, f64> {
    readings
        .into_iter()
        .filter_map(|reading| reading.prcp.map(|prcp| (reading.date, prcp)))
        .collect()
}

/// The station with the most observations.
///
/// Stations tied on the highest count resolve to the lexicographically
/// smallest id. Stations without observations never qualify.
pub fn most_active_station(activity: &[StationActivity]) -> Option<&str> {
    activity
        .iter()
        .filter(|a| a.observations > 0)
        .max_set_by_key(|a| a.observations)
        .into_iter()
        .map(|a| a.station.as_str())
        .min()
}
