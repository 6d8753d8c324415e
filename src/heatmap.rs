use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cache::SunEventsCache;
use crate::config::ObservabilityConfig;
use crate::error::{ObservabilityError, Result};
use crate::horizon::HorizonMask;
use crate::observability::{observable_duration_for, observation_night};
use crate::types::{EquatorialCoordinate, GeoLocation};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NightVisibility {
    pub date: NaiveDate,
    pub dark_minutes: i64,
    pub observable_minutes: i64,
    pub max_altitude_deg: f64,
    pub window_start: Option<DateTime<Utc>>,
    pub window_end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekSummary {
    pub iso_year: i32,
    pub iso_week: u32,
    pub nights: usize,
    pub observable_nights: usize,
    pub total_observable_minutes: i64,
    pub best_max_altitude_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapMetadata {
    pub generated_at: String,
    pub total_nights: usize,
    pub dark_nights: usize,
    pub observable_nights: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityHeatmap {
    pub year: i32,
    pub target: EquatorialCoordinate,
    pub config: ObservabilityConfig,
    pub nights: Vec<NightVisibility>,
    pub metadata: HeatmapMetadata,
}

/// One row per night for `days` consecutive nights starting at `start`.
pub fn nightly_visibility(
    coord: &EquatorialCoordinate,
    location: &GeoLocation,
    start: NaiveDate,
    days: u32,
    horizon_mask: &HorizonMask,
    cache: &SunEventsCache,
    config: &ObservabilityConfig,
) -> Result<Vec<NightVisibility>> {
    config.validate()?;
    let mut nights = Vec::with_capacity(days as usize);
    for date in start.iter_days().take(days as usize) {
        let dark_minutes = match observation_night(location, date, cache, config)? {
            Some(night) => night.duration().num_minutes(),
            None => {
                debug!(%date, "no astronomical night");
                0
            }
        };
        let result = observable_duration_for(coord, location, date, horizon_mask, cache, config)?;
        nights.push(NightVisibility {
            date,
            dark_minutes,
            observable_minutes: result.observable_minutes(),
            max_altitude_deg: result.max_altitude_deg,
            window_start: result.window_start,
            window_end: result.window_end,
        });
    }
    Ok(nights)
}

/// Groups nights by ISO week, in input order.
pub fn weekly_summary(nights: &[NightVisibility]) -> Vec<WeekSummary> {
    let mut weeks: Vec<WeekSummary> = Vec::new();
    for night in nights {
        let week = night.date.iso_week();
        let needs_new = weeks
            .last()
            .map_or(true, |w| (w.iso_year, w.iso_week) != (week.year(), week.week()));
        if needs_new {
            weeks.push(WeekSummary {
                iso_year: week.year(),
                iso_week: week.week(),
                nights: 0,
                observable_nights: 0,
                total_observable_minutes: 0,
                best_max_altitude_deg: 0.0,
            });
        }
        if let Some(summary) = weeks.last_mut() {
            summary.nights += 1;
            if night.observable_minutes > 0 {
                summary.observable_nights += 1;
                summary.best_max_altitude_deg = summary.best_max_altitude_deg.max(night.max_altitude_deg);
            }
            summary.total_observable_minutes += night.observable_minutes;
        }
    }
    weeks
}

pub fn yearly_heatmap(
    coord: &EquatorialCoordinate,
    location: &GeoLocation,
    year: i32,
    horizon_mask: &HorizonMask,
    cache: &SunEventsCache,
    config: &ObservabilityConfig,
) -> Result<VisibilityHeatmap> {
    let (Some(first), Some(next_year)) = (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year + 1, 1, 1),
    ) else {
        return Err(ObservabilityError::Numerical(format!("year {} out of range", year)));
    };
    let days = (next_year - first).num_days() as u32;
    let nights = nightly_visibility(coord, location, first, days, horizon_mask, cache, config)?;

    let metadata = HeatmapMetadata {
        generated_at: Utc::now().to_rfc3339(),
        total_nights: nights.len(),
        dark_nights: nights.iter().filter(|n| n.dark_minutes > 0).count(),
        observable_nights: nights.iter().filter(|n| n.observable_minutes > 0).count(),
    };
    info!(
        year,
        dark_nights = metadata.dark_nights,
        observable_nights = metadata.observable_nights,
        "generated visibility heatmap"
    );

    Ok(VisibilityHeatmap {
        year,
        target: *coord,
        config: *config,
        nights,
        metadata,
    })
}

/// Observable minutes per night, in date order.
pub fn heatmap_to_compact(heatmap: &VisibilityHeatmap) -> Vec<i64> {
    heatmap.nights.iter().map(|n| n.observable_minutes).collect()
}
