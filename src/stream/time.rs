use crate::error::BgpStreamError;
use chrono::{NaiveTime, Utc};

/// Converts a free-form date string into whole seconds since the Unix
/// epoch. An absent string converts to 0, which the backend treats as an
/// unbounded interval side.
///
/// Parsing uses [dateparser] with UTC as the default zone and midnight as
/// the default time of day, so `"1970-01-01 00:00:00"` converts to 0 and
/// `"2017-07-07"` to the epoch of that day's midnight.
pub fn datestr_to_epoch(datestr: Option<&str>) -> Result<i64, BgpStreamError> {
    let Some(s) = datestr else {
        return Ok(0);
    };
    let dt = dateparser::parse_with(s, &Utc, NaiveTime::from_hms_opt(0, 0, 0).unwrap()).map_err(
        |e| BgpStreamError::InvalidTimeString {
            input: s.to_string(),
            reason: e.to_string(),
        },
    )?;
    Ok(dt.timestamp())
}
