//! Parsing of event timestamp and duration metadata fields.

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDateTime, TimeZone};

use crate::error::{EventCalError, EventCalResult};

/// Accepted layout for `event-start` / `event-end` values.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Seconds per duration unit, keyed by the unit suffix.
const TIME_MULTIPLIERS: [(char, f64); 5] = [
    ('w', 7.0 * 86_400.0),
    ('d', 86_400.0),
    ('h', 3_600.0),
    ('m', 60.0),
    ('s', 1.0),
];

/// Parse a timestamp string in format "YYYY-MM-DD HH:MM".
///
/// The host system's local timezone is attached to the result, so naive
/// datetimes never leave this function. `field` and `title` only feed the
/// error message.
pub fn parse_timestamp(raw: &str, field: &str, title: &str) -> EventCalResult<DateTime<Local>> {
    let err = || EventCalError::Timestamp {
        field: field.to_string(),
        event: title.to_string(),
    };

    let naive = NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).map_err(|_| err())?;

    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        // DST fold: two valid instants, keep the earlier one
        LocalResult::Ambiguous(dt, _) => Ok(dt),
        // DST gap: the wall-clock time does not exist locally
        LocalResult::None => Err(err()),
    }
}

/// Parse a duration string of whitespace-separated `<number><unit>`
/// tokens, e.g. "2h 30m". Units: w(eeks), d(ays), h(ours), m(inutes),
/// s(econds). Fractional magnitudes like "1.5h" are accepted.
///
/// A repeated unit silently overwrites the earlier value, so "1h 2h" is
/// two hours. Existing site content relies on this, so it stays.
pub fn parse_duration(raw: &str, title: &str) -> EventCalResult<Duration> {
    let mut seconds_per_unit: std::collections::BTreeMap<char, f64> = Default::default();

    for token in raw.split_whitespace() {
        let Some(unit) = token.chars().next_back() else {
            continue;
        };

        let Some((_, multiplier)) = TIME_MULTIPLIERS.iter().find(|(u, _)| *u == unit) else {
            return Err(EventCalError::UnknownUnit {
                token: token.to_string(),
                event: title.to_string(),
            });
        };

        let magnitude: f64 = token[..token.len() - unit.len_utf8()]
            .parse()
            .map_err(|_| EventCalError::MalformedDuration {
                token: token.to_string(),
                event: title.to_string(),
            })?;

        // insert() replaces any earlier value for the same unit
        seconds_per_unit.insert(unit, magnitude * multiplier);
    }

    let total_seconds: f64 = seconds_per_unit.values().sum();
    Ok(Duration::milliseconds((total_seconds * 1000.0).round() as i64))
}
