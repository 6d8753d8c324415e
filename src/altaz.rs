use chrono::{DateTime, Duration, Utc};
use tracing::trace;

use crate::astro;
use crate::error::{ObservabilityError, Result};
use crate::types::{AltAz, EquatorialCoordinate, GeoLocation};

/// Altitude and azimuth of a fixed J2000 target at each instant, in input
/// order. Without refraction.
pub fn sample_altaz(
    coord: &EquatorialCoordinate,
    location: &GeoLocation,
    times: &[DateTime<Utc>],
) -> Result<Vec<AltAz>> {
    sample_altaz_with(coord, location, times, false)
}

/// The apparent place is evaluated once per day of the batch, at the middle
/// of that day; within a day precession and nutation move it by well under an
/// arcsecond, so batches spanning months or years stay accurate.
pub fn sample_altaz_with(
    coord: &EquatorialCoordinate,
    location: &GeoLocation,
    times: &[DateTime<Utc>],
    apply_refraction: bool,
) -> Result<Vec<AltAz>> {
    let Some(&earliest) = times.iter().min() else {
        return Ok(Vec::new());
    };
    trace!(samples = times.len(), %earliest, "sampling alt/az");

    let mut place: Option<(i64, f64, f64)> = None;
    times
        .iter()
        .map(|&t| {
            let day = (t - earliest).num_days();
            let (ra, dec) = match place {
                Some((cached_day, ra, dec)) if cached_day == day => (ra, dec),
                _ => {
                    let midday = earliest + Duration::days(day) + Duration::hours(12);
                    let (ra, dec) = astro::apparent_place(coord, midday);
                    place = Some((day, ra, dec));
                    (ra, dec)
                }
            };
            let hour_angle = astro::local_apparent_sidereal_time(t, location.longitude_deg) - ra;
            let mut sample = astro::horizontal(hour_angle, dec, location.latitude_deg);
            if apply_refraction {
                sample.altitude_deg += astro::refraction_deg(sample.altitude_deg);
            }
            if sample.altitude_deg.is_finite() && sample.azimuth_deg.is_finite() {
                Ok(sample)
            } else {
                Err(ObservabilityError::Numerical(format!(
                    "non-finite alt/az at {} for RA {}h Dec {}°",
                    t, coord.ra_hours, coord.dec_degrees
                )))
            }
        })
        .collect()
}
