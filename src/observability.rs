//! How long a target stays above the local horizon floor during the
//! astronomically dark part of a night.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::debug;

use crate::altaz::sample_altaz_with;
use crate::cache::SunEventsCache;
use crate::config::{sampling_interval, ObservabilityConfig};
use crate::error::{ObservabilityError, Result};
use crate::horizon::HorizonMask;
use crate::types::{EquatorialCoordinate, GeoLocation, ObservabilityResult, ObservationNight};

/// Dark window from the astronomical dusk of `date` to the astronomical dawn
/// that follows it. `None` when either event does not occur (midnight sun,
/// polar twilight).
pub fn observation_night(
    location: &GeoLocation,
    date: NaiveDate,
    cache: &SunEventsCache,
    config: &ObservabilityConfig,
) -> Result<Option<ObservationNight>> {
    let next_date = date
        .succ_opt()
        .ok_or_else(|| ObservabilityError::Numerical(format!("no date after {}", date)))?;
    let tonight = cache.get_sun_events(date, location, config)?;
    let tomorrow = cache.get_sun_events(next_date, location, config)?;

    let (Some(dusk), Some(mut dawn)) = (
        tonight.astronomical_dusk.instant(),
        tomorrow.astronomical_dawn.instant(),
    ) else {
        return Ok(None);
    };
    if dawn <= dusk {
        dawn += Duration::days(1);
    }
    Ok(Some(ObservationNight {
        local_date: date,
        dusk_utc: dusk,
        dawn_utc: dawn,
    }))
}

/// Observable time for `coord` on the night starting on `local_date`, using
/// the threshold and sampling interval from `config`.
pub fn observable_duration_for(
    coord: &EquatorialCoordinate,
    location: &GeoLocation,
    local_date: NaiveDate,
    horizon_mask: &HorizonMask,
    cache: &SunEventsCache,
    config: &ObservabilityConfig,
) -> Result<ObservabilityResult> {
    config.validate()?;
    let Some(night) = observation_night(location, local_date, cache, config)? else {
        debug!(%local_date, tz = location.timezone_name(), "no astronomical night");
        return Ok(ObservabilityResult::not_observable());
    };

    let step = sampling_interval(config.sampling_interval_minutes)?;
    let times = sample_grid(night.dusk_utc, night.dawn_utc, step);
    let samples = sample_altaz_with(coord, location, &times, config.apply_refraction)?;
    let horizon = horizon_mask.resolve(config.altitude_threshold_deg);

    let mut count = 0i32;
    let mut max_altitude: Option<f64> = None;
    let mut window_start = None;
    let mut window_end = None;
    for (&t, sample) in times.iter().zip(&samples) {
        if sample.altitude_deg >= horizon.min_altitude_at(sample.azimuth_deg) {
            count += 1;
            max_altitude = Some(max_altitude.map_or(sample.altitude_deg, |m| m.max(sample.altitude_deg)));
            if window_start.is_none() {
                window_start = Some(t);
            }
            window_end = Some(t);
        }
    }

    let result = ObservabilityResult {
        observable_duration: step * count,
        max_altitude_deg: max_altitude.unwrap_or(0.0),
        window_start,
        window_end,
    };
    debug!(
        %local_date,
        samples = times.len(),
        observable = count,
        max_altitude = result.max_altitude_deg,
        "observable duration"
    );
    Ok(result)
}

/// Observable time with an explicit threshold and sampling interval; the
/// remaining settings take their defaults.
#[allow(clippy::too_many_arguments)]
pub fn observable_duration(
    coord: &EquatorialCoordinate,
    location: &GeoLocation,
    local_date: NaiveDate,
    altitude_threshold_deg: f64,
    sampling_interval_minutes: i64,
    horizon_mask: &HorizonMask,
    cache: &SunEventsCache,
) -> Result<ObservabilityResult> {
    let config = ObservabilityConfig {
        altitude_threshold_deg,
        sampling_interval_minutes,
        ..ObservabilityConfig::default()
    };
    observable_duration_for(coord, location, local_date, horizon_mask, cache, &config)
}

/// Instants from `start` to `end` inclusive, `step` apart.
fn sample_grid(start: DateTime<Utc>, end: DateTime<Utc>, step: Duration) -> Vec<DateTime<Utc>> {
    let mut times = Vec::new();
    let mut t = start;
    while t <= end {
        times.push(t);
        t += step;
    }
    times
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn grid_includes_both_ends() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 18, 0, 0).unwrap();
        let grid = sample_grid(start, start + Duration::hours(1), Duration::minutes(15));
        assert_eq!(grid.len(), 5);
        assert_eq!(grid.last(), Some(&(start + Duration::hours(1))));
    }

    #[test]
    fn grid_stops_before_overshooting() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 18, 0, 0).unwrap();
        let grid = sample_grid(start, start + Duration::minutes(50), Duration::minutes(15));
        assert_eq!(grid.len(), 4);
    }
}
