pub mod altaz;
pub mod angles;
pub mod astro;
pub mod cache;
pub mod config;
pub mod error;
pub mod heatmap;
pub mod horizon;
pub mod observability;
pub mod search;
pub mod sun;
pub mod time;
pub mod transit;
pub mod types;

pub use altaz::{sample_altaz, sample_altaz_with};

pub use angles::{
    deg_to_rad, dms_to_degrees, format_dms, format_hms, hms_to_hours, normalize_angle,
    parse_angle, rad_to_deg, wrap_pm180, ParsedAngle, RawAngle, DEGREES_PER_HOUR,
};

pub use cache::{CachePolicy, SunEventsCache};
pub use config::ObservabilityConfig;
pub use error::{ObservabilityError, Result};

pub use heatmap::{
    heatmap_to_compact, nightly_visibility, weekly_summary, yearly_heatmap, HeatmapMetadata,
    NightVisibility, VisibilityHeatmap, WeekSummary,
};

pub use horizon::{HorizonMask, HorizonPoint, ResolvedHorizon};

pub use observability::{observable_duration, observable_duration_for, observation_night};
pub use search::Crossing;
pub use sun::{calculate_sun_events, solar_transit, sun_crossing, sun_events, SunHorizon};
pub use time::{format_local_hhmm, local_to_utc, resolve_timezone, NOT_AVAILABLE};
pub use transit::{culmination, next_transit, next_transit_hhmm, Culmination};

pub use types::{
    AltAz, EquatorialCoordinate, EventTime, GeoLocation, ObservabilityResult, ObservationNight,
    SunEvents, SunEventsDisplay,
};
