//! Meridian transit of a fixed target.

use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::angles::{rad_to_deg, wrap_pm180};
use crate::astro;
use crate::config::{search_step, ObservabilityConfig};
use crate::error::{ObservabilityError, Result};
use crate::search::{find_crossing, Crossing};
use crate::time;
use crate::types::{EquatorialCoordinate, EventTime, GeoLocation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Culmination {
    /// Upper culmination below the horizon.
    NeverRises,
    RisesAndSets,
    /// Lower culmination at or above the horizon.
    Circumpolar,
}

/// Classifies a target by the altitude of its upper and lower culmination
/// at the site. `dec` is the apparent declination in radians.
fn culmination_at(dec: f64, latitude_deg: f64) -> Culmination {
    let upper = astro::horizontal(0.0, dec, latitude_deg).altitude_deg;
    let lower = astro::horizontal(std::f64::consts::PI, dec, latitude_deg).altitude_deg;
    if upper < 0.0 {
        Culmination::NeverRises
    } else if lower >= 0.0 {
        Culmination::Circumpolar
    } else {
        Culmination::RisesAndSets
    }
}

/// Culmination class of `coord` on the night starting at `local_date`.
pub fn culmination(
    coord: &EquatorialCoordinate,
    location: &GeoLocation,
    local_date: NaiveDate,
) -> Result<Culmination> {
    let midnight = time::local_noon_utc(local_date, location.timezone)? + Duration::hours(12);
    let (_, dec) = astro::apparent_place(coord, midnight);
    Ok(culmination_at(dec, location.latitude_deg))
}

/// Next upper culmination after local noon of `local_date`, i.e. the transit
/// during the night that starts that evening.
///
/// Targets that culminate below the horizon give `NeverOccurs`. Circumpolar
/// targets give their transit time, or `AlwaysUp` when
/// `report_circumpolar_transit` is off.
pub fn next_transit(
    coord: &EquatorialCoordinate,
    location: &GeoLocation,
    local_date: NaiveDate,
    config: &ObservabilityConfig,
) -> Result<EventTime> {
    let step = search_step(config.event_search_step_minutes)?;
    let start = time::local_noon_utc(local_date, location.timezone)?;
    let (ra, dec) = astro::apparent_place(coord, start + Duration::hours(12));

    match culmination_at(dec, location.latitude_deg) {
        Culmination::NeverRises => {
            debug!("target never rises");
            return Ok(EventTime::NeverOccurs);
        }
        Culmination::Circumpolar if !config.report_circumpolar_transit => {
            debug!("target is circumpolar");
            return Ok(EventTime::AlwaysUp);
        }
        _ => {}
    }

    let lon = location.longitude_deg;
    match find_crossing(start, Duration::hours(24), step, Crossing::Rising, |t| {
        wrap_pm180(rad_to_deg(astro::local_apparent_sidereal_time(t, lon) - ra))
    })? {
        EventTime::Occurs(t) => Ok(EventTime::Occurs(t)),
        _ => Err(ObservabilityError::Numerical(format!(
            "no meridian crossing within a day of {}",
            start
        ))),
    }
}

/// Transit as local `"HH:MM"` from raw boundary inputs, or `"N/A"`.
pub fn next_transit_hhmm(
    ra_hours: f64,
    dec_degrees: f64,
    latitude_deg: f64,
    longitude_deg: f64,
    timezone: &str,
    local_date: NaiveDate,
) -> Result<String> {
    let coord = EquatorialCoordinate::new(ra_hours, dec_degrees)?;
    let location = GeoLocation::new(latitude_deg, longitude_deg, timezone)?;
    let transit = next_transit(&coord, &location, local_date, &ObservabilityConfig::default())?;
    Ok(transit.display(location.timezone))
}
