use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::angles;
use crate::error::{ObservabilityError, Result};
use crate::time;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EquatorialCoordinate {
    pub ra_hours: f64,
    pub dec_degrees: f64,
}

// Deserialized coordinates get the same wrap and range check as `new`.
impl<'de> Deserialize<'de> for EquatorialCoordinate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            ra_hours: f64,
            dec_degrees: f64,
        }
        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.ra_hours, raw.dec_degrees).map_err(serde::de::Error::custom)
    }
}

impl EquatorialCoordinate {
    /// RA is wrapped into [0, 24); declination outside [-90, 90] is rejected.
    pub fn new(ra_hours: f64, dec_degrees: f64) -> Result<Self> {
        if !ra_hours.is_finite() {
            return Err(ObservabilityError::Numerical(format!(
                "non-finite right ascension {}",
                ra_hours
            )));
        }
        if !(-90.0..=90.0).contains(&dec_degrees) {
            return Err(ObservabilityError::DeclinationOutOfRange(dec_degrees));
        }
        Ok(Self {
            ra_hours: ra_hours.rem_euclid(24.0),
            dec_degrees,
        })
    }

    /// Builds a coordinate from raw catalog fields. RA follows `hms_to_hours`
    /// (bare decimals are degrees), Dec follows `parse_angle`.
    ///
    /// Returns `None` when either field is missing or unparsable, so callers
    /// can drop the row instead of plotting a bogus (0h, 0°) target.
    pub fn from_catalog(ra_raw: Option<&str>, dec_raw: Option<&str>) -> Option<Self> {
        let ra = angles::hms_to_hours(ra_raw).value()?;
        let dec = angles::parse_angle(dec_raw).value()?;
        Self::new(ra, dec).ok()
    }

    /// Legacy behaviour: missing fields become 0.0.
    pub fn from_catalog_lenient(ra_raw: Option<&str>, dec_raw: Option<&str>) -> Self {
        let ra = angles::hms_to_hours(ra_raw).value_or_zero();
        let dec = angles::parse_angle(dec_raw).value_or_zero();
        Self::new(ra, dec).unwrap_or(Self {
            ra_hours: 0.0,
            dec_degrees: 0.0,
        })
    }

    pub fn ra_degrees(&self) -> f64 {
        self.ra_hours * angles::DEGREES_PER_HOUR
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoLocation {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub timezone: Tz,
}

impl GeoLocation {
    pub fn new(latitude_deg: f64, longitude_deg: f64, timezone_name: &str) -> Result<Self> {
        let timezone = time::resolve_timezone(timezone_name)?;
        Self::with_timezone(latitude_deg, longitude_deg, timezone)
    }

    /// Background batch path: an unknown zone degrades to UTC with a warning
    /// instead of failing. Coordinates are still validated.
    pub fn new_or_utc(latitude_deg: f64, longitude_deg: f64, timezone_name: &str) -> Result<Self> {
        let timezone = match time::resolve_timezone(timezone_name) {
            Ok(tz) => tz,
            Err(err) => {
                warn!(%err, "falling back to UTC for batch computation");
                Tz::UTC
            }
        };
        Self::with_timezone(latitude_deg, longitude_deg, timezone)
    }

    pub fn with_timezone(latitude_deg: f64, longitude_deg: f64, timezone: Tz) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(ObservabilityError::LatitudeOutOfRange(latitude_deg));
        }
        if !(-180.0..=180.0).contains(&longitude_deg) {
            return Err(ObservabilityError::LongitudeOutOfRange(longitude_deg));
        }
        Ok(Self {
            latitude_deg,
            longitude_deg,
            timezone,
        })
    }

    pub fn timezone_name(&self) -> &'static str {
        self.timezone.name()
    }
}

/// The astronomically dark period that starts on the evening of `local_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservationNight {
    pub local_date: NaiveDate,
    pub dusk_utc: DateTime<Utc>,
    pub dawn_utc: DateTime<Utc>,
}

impl ObservationNight {
    pub fn duration(&self) -> Duration {
        self.dawn_utc - self.dusk_utc
    }
}

/// Outcome of an event search: the sun or a target either crosses the
/// requested altitude, or stays on one side of it for the whole day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTime {
    Occurs(DateTime<Utc>),
    /// Always below the threshold (polar night, never-rising target).
    NeverOccurs,
    /// Always above the threshold (midnight sun, circumpolar target).
    AlwaysUp,
}

impl EventTime {
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            EventTime::Occurs(t) => Some(*t),
            _ => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, EventTime::Occurs(_))
    }

    /// Local `"HH:MM"` or the literal `"N/A"`.
    pub fn display(&self, tz: Tz) -> String {
        match self {
            EventTime::Occurs(t) => time::format_local_hhmm(*t, tz),
            EventTime::NeverOccurs | EventTime::AlwaysUp => time::NOT_AVAILABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunEvents {
    pub astronomical_dawn: EventTime,
    pub sunrise: EventTime,
    pub transit: EventTime,
    pub sunset: EventTime,
    pub astronomical_dusk: EventTime,
}

impl SunEvents {
    pub fn display(&self, tz: Tz) -> SunEventsDisplay {
        SunEventsDisplay {
            astronomical_dawn: self.astronomical_dawn.display(tz),
            sunrise: self.sunrise.display(tz),
            transit: self.transit.display(tz),
            sunset: self.sunset.display(tz),
            astronomical_dusk: self.astronomical_dusk.display(tz),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SunEventsDisplay {
    pub astronomical_dawn: String,
    pub sunrise: String,
    pub transit: String,
    pub sunset: String,
    pub astronomical_dusk: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AltAz {
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
}

/// Horizon-constrained visibility of one target over one night.
///
/// `max_altitude_deg` only considers samples above the local horizon floor;
/// it is 0 when the target never clears the floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservabilityResult {
    pub observable_duration: Duration,
    pub max_altitude_deg: f64,
    pub window_start: Option<DateTime<Utc>>,
    pub window_end: Option<DateTime<Utc>>,
}

impl ObservabilityResult {
    pub fn not_observable() -> Self {
        Self {
            observable_duration: Duration::zero(),
            max_altitude_deg: 0.0,
            window_start: None,
            window_end: None,
        }
    }

    pub fn observable_minutes(&self) -> i64 {
        self.observable_duration.num_minutes()
    }

    pub fn is_observable(&self) -> bool {
        self.window_start.is_some()
    }
}
