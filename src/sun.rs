//! Sunrise, sunset, solar transit and twilight for one local calendar date.
//!
//! Morning events are searched forward from local midnight and evening
//! events forward from local noon, so the evening search finds that
//! evening's event rather than the previous one. Each search spans one day;
//! a sun that never crosses the threshold yields `AlwaysUp` or
//! `NeverOccurs`, never an error.

use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::angles::{rad_to_deg, wrap_pm180};
use crate::astro;
use crate::config::{search_step, ObservabilityConfig};
use crate::error::Result;
use crate::search::{find_crossing, Crossing};
use crate::time;
use crate::types::{EventTime, GeoLocation, SunEvents};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SunHorizon {
    SunriseSunset,
    CivilTwilight,
    NauticalTwilight,
    AstronomicalTwilight,
    /// Solar altitude in degrees.
    Custom(f64),
}

impl SunHorizon {
    pub fn altitude_deg(self) -> f64 {
        match self {
            SunHorizon::SunriseSunset => -(50.0 / 60.0),
            SunHorizon::CivilTwilight => -6.0,
            SunHorizon::NauticalTwilight => -12.0,
            SunHorizon::AstronomicalTwilight => -18.0,
            SunHorizon::Custom(alt) => alt,
        }
    }
}

/// The sun crossing `horizon` on `date`: rising in the morning (searched
/// from local midnight) or setting in the evening (from local noon).
pub fn sun_crossing(
    date: NaiveDate,
    location: &GeoLocation,
    horizon: SunHorizon,
    direction: Crossing,
    step_minutes: i64,
) -> Result<EventTime> {
    let step = search_step(step_minutes)?;
    let start = match direction {
        Crossing::Rising => time::local_midnight_utc(date, location.timezone)?,
        Crossing::Setting => time::local_noon_utc(date, location.timezone)?,
    };
    let threshold = horizon.altitude_deg();
    let (lat, lon) = (location.latitude_deg, location.longitude_deg);
    find_crossing(
        start,
        Duration::hours(24),
        step,
        direction,
        |t| astro::sun_altaz(t, lat, lon).altitude_deg - threshold,
    )
}

/// First upper meridian passage of the sun at or after local midnight.
pub fn solar_transit(date: NaiveDate, location: &GeoLocation, step_minutes: i64) -> Result<EventTime> {
    let step = search_step(step_minutes)?;
    let start = time::local_midnight_utc(date, location.timezone)?;
    let lon = location.longitude_deg;
    find_crossing(
        start,
        Duration::hours(24),
        step,
        Crossing::Rising,
        |t| {
            let (ra, _) = astro::sun_apparent_place(t);
            wrap_pm180(rad_to_deg(astro::local_apparent_sidereal_time(t, lon) - ra))
        },
    )
}

pub fn calculate_sun_events(
    date: NaiveDate,
    location: &GeoLocation,
    config: &ObservabilityConfig,
) -> Result<SunEvents> {
    config.validate()?;
    let step = config.event_search_step_minutes;
    let twilight = SunHorizon::Custom(config.twilight_angle_deg);
    let rise_set = SunHorizon::Custom(config.sunrise_angle_deg);

    let events = SunEvents {
        astronomical_dawn: sun_crossing(date, location, twilight, Crossing::Rising, step)?,
        sunrise: sun_crossing(date, location, rise_set, Crossing::Rising, step)?,
        transit: solar_transit(date, location, step)?,
        sunset: sun_crossing(date, location, rise_set, Crossing::Setting, step)?,
        astronomical_dusk: sun_crossing(date, location, twilight, Crossing::Setting, step)?,
    };
    debug!(
        %date,
        tz = location.timezone_name(),
        lat = location.latitude_deg,
        lon = location.longitude_deg,
        ?events,
        "computed sun events"
    );
    Ok(events)
}

/// `calculate_sun_events` from raw boundary inputs with the default config.
pub fn sun_events(date: NaiveDate, timezone: &str, lat: f64, lon: f64) -> Result<SunEvents> {
    let location = GeoLocation::new(lat, lon, timezone)?;
    calculate_sun_events(date, &location, &ObservabilityConfig::default())
}
