use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{ObservabilityError, Result};

/// Tunables for the observability engine. Every field has a default so a
/// partial JSON/YAML document from the host application deserializes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub altitude_threshold_deg: f64,
    pub sampling_interval_minutes: i64,
    /// Solar altitude bounding the astronomically dark night.
    pub twilight_angle_deg: f64,
    /// Solar altitude at sunrise/sunset: -0°50' for the solar radius plus
    /// standard refraction.
    pub sunrise_angle_deg: f64,
    pub event_search_step_minutes: i64,
    pub apply_refraction: bool,
    /// Whether a target that never sets still reports a transit time.
    /// When false its transit reads as `AlwaysUp` ("N/A").
    pub report_circumpolar_transit: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            altitude_threshold_deg: 30.0,
            sampling_interval_minutes: 15,
            twilight_angle_deg: -18.0,
            sunrise_angle_deg: -(50.0 / 60.0),
            event_search_step_minutes: 10,
            apply_refraction: false,
            report_circumpolar_transit: true,
        }
    }
}

/// Longest accepted sampling interval or search step: one day.
pub const MAX_STEP_MINUTES: i64 = 1440;

fn bounded_minutes(minutes: i64) -> Option<Duration> {
    if (1..=MAX_STEP_MINUTES).contains(&minutes) {
        Some(Duration::minutes(minutes))
    } else {
        None
    }
}

pub(crate) fn sampling_interval(minutes: i64) -> Result<Duration> {
    bounded_minutes(minutes).ok_or(ObservabilityError::InvalidSamplingInterval(minutes))
}

pub(crate) fn search_step(minutes: i64) -> Result<Duration> {
    bounded_minutes(minutes).ok_or(ObservabilityError::InvalidSearchStep(minutes))
}

impl ObservabilityConfig {
    pub fn validate(&self) -> Result<()> {
        sampling_interval(self.sampling_interval_minutes)?;
        search_step(self.event_search_step_minutes)?;
        Ok(())
    }
}
