use time::{macros::format_description, Date, Month};

#[derive(thiserror::Error, Debug)]
pub enum DateError {
    #[error("`{0}` is not a whole number")]
    NotANumber(String),
    #[error("`{0}` is not an ISO-8601 date, expected YYYY-MM-DD")]
    Format(String),
    #[error("Invalid calendar date: {0}")]
    OutOfRange(#[from] time::error::ComponentRange),
}

/// Parse a `YYYY-MM-DD` date string
pub fn parse_iso_date(value: &str) -> Result<Date, DateError> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|_| DateError::Format(value.to_owned()))
}

/// Build a date from separate year, month and day path segments
pub fn date_from_parts(year: &str, month: &str, day: &str) -> Result<Date, DateError> {
    let year: i32 = parse_number(year)?;
    let month: u8 = parse_number(month)?;
    let day: u8 = parse_number(day)?;

    Ok(Date::from_calendar_date(year, Month::try_from(month)?, day)?)
}

fn parse_number<T: std::str::FromStr>(value: &str) -> Result<T, DateError> {
    value
        .trim()
        .parse()
        .map_err(|_| DateError::NotANumber(value.to_owned()))
}

/// Shift a date back by whole calendar months.
///
/// When the target month is shorter the day clamps to its last day, so
/// 2016-03-31 minus one month is 2016-02-29.
pub fn months_before(date: Date, months: u8) -> Result<Date, DateError> {
    let index = date.year() * 12 + (i32::from(u8::from(date.month())) - 1) - i32::from(months);
    let year = index.div_euclid(12);
    let month = Month::try_from((index.rem_euclid(12) + 1) as u8)?;
    let day = date.day().min(month.length(year));

    Ok(Date::from_calendar_date(year, month, day)?)
}
