//! Civil time handling: IANA zones, local/UTC conversion and the time
//! scales needed by the astronomical transforms.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{ObservabilityError, Result};

pub const NOT_AVAILABLE: &str = "N/A";

pub const J2000_JD: f64 = 2451545.0;
pub const UNIX_EPOCH_JD: f64 = 2440587.5;
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36525.0;
pub const SECONDS_PER_DAY: f64 = 86400.0;

pub fn resolve_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ObservabilityError::UnknownTimezone(name.to_string()))
}

/// Converts a local wall-clock time to UTC. Ambiguous times (DST fall-back)
/// take the earlier instant; times inside a DST gap are moved forward one
/// hour, which is where the wall clock resumes.
pub fn local_to_utc(tz: Tz, local: NaiveDateTime) -> Result<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => Ok(t.with_timezone(&Utc)),
        LocalResult::None => tz
            .from_local_datetime(&(local + Duration::hours(1)))
            .earliest()
            .map(|t| t.with_timezone(&Utc))
            .ok_or_else(|| ObservabilityError::NonexistentLocalTime {
                local,
                timezone: tz.name().to_string(),
            }),
    }
}

fn on_the_hour(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default()
}

pub fn local_midnight_utc(date: NaiveDate, tz: Tz) -> Result<DateTime<Utc>> {
    local_to_utc(tz, date.and_time(on_the_hour(0)))
}

pub fn local_noon_utc(date: NaiveDate, tz: Tz) -> Result<DateTime<Utc>> {
    local_to_utc(tz, date.and_time(on_the_hour(12)))
}

/// Local wall-clock "HH:MM", truncated to the minute.
pub fn format_local_hhmm(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%H:%M").to_string()
}

pub fn julian_date(instant: DateTime<Utc>) -> f64 {
    instant.timestamp_millis() as f64 / (SECONDS_PER_DAY * 1000.0) + UNIX_EPOCH_JD
}

// TT - UT1 on 1 January, from IERS Bulletin B.
const OBSERVED_DELTA_T: [(i32, f64); 21] = [
    (2005, 64.69),
    (2006, 64.85),
    (2007, 65.15),
    (2008, 65.46),
    (2009, 65.78),
    (2010, 66.07),
    (2011, 66.32),
    (2012, 66.60),
    (2013, 66.91),
    (2014, 67.28),
    (2015, 67.64),
    (2016, 68.10),
    (2017, 68.59),
    (2018, 68.97),
    (2019, 69.22),
    (2020, 69.36),
    (2021, 69.36),
    (2022, 69.29),
    (2023, 69.20),
    (2024, 69.18),
    (2025, 69.14),
];

/// Mean drift of ΔT over the last decade of the table, seconds per year.
const DELTA_T_DRIFT_PER_YEAR: f64 = 0.15;

/// ΔT = TT - UT in seconds: observed values from 2005, Espenak & Meeus
/// polynomial fits elsewhere.
pub fn delta_t_seconds(instant: DateTime<Utc>) -> f64 {
    let y = instant.year() as f64 + (instant.ordinal0() as f64 + 0.5) / 365.25;
    let t = y - 2000.0;
    let (first_year, _) = OBSERVED_DELTA_T[0];
    let (last_year, last_value) = OBSERVED_DELTA_T[OBSERVED_DELTA_T.len() - 1];
    if (1986.0..first_year as f64).contains(&y) {
        63.86 + 0.3345 * t - 0.060374 * t.powi(2)
            + 0.0017275 * t.powi(3)
            + 0.000651814 * t.powi(4)
            + 0.00002373599 * t.powi(5)
    } else if (first_year as f64..last_year as f64).contains(&y) {
        observed_delta_t(y)
    } else if (last_year as f64..2050.0).contains(&y) {
        last_value + DELTA_T_DRIFT_PER_YEAR * (y - last_year as f64)
    } else if (2050.0..2150.0).contains(&y) {
        let u = (y - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u - 0.5628 * (2150.0 - y)
    } else {
        let u = (y - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u
    }
}

fn observed_delta_t(y: f64) -> f64 {
    OBSERVED_DELTA_T
        .windows(2)
        .find(|pair| y < pair[1].0 as f64)
        .map(|pair| {
            let ((y0, v0), (y1, v1)) = (pair[0], pair[1]);
            v0 + (y - y0 as f64) * (v1 - v0) / (y1 - y0) as f64
        })
        .unwrap_or(OBSERVED_DELTA_T[OBSERVED_DELTA_T.len() - 1].1)
}

/// Julian centuries of TT since J2000.0.
pub fn julian_centuries_tt(instant: DateTime<Utc>) -> f64 {
    let jd_tt = julian_date(instant) + delta_t_seconds(instant) / SECONDS_PER_DAY;
    (jd_tt - J2000_JD) / DAYS_PER_JULIAN_CENTURY
}
