use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::NaiveDate;
use tracing::debug;

use crate::config::ObservabilityConfig;
use crate::error::Result;
use crate::sun::calculate_sun_events;
use crate::types::{GeoLocation, SunEvents};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    #[default]
    Unbounded,
    /// Keep at most this many entries; inserting past the limit drops every
    /// entry for the oldest cached date.
    MaxEntries(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SunEventsKey {
    date: NaiveDate,
    timezone: &'static str,
    latitude_bits: u64,
    longitude_bits: u64,
    // event thresholds also shape the result
    twilight_bits: u64,
    sunrise_bits: u64,
    step_minutes: i64,
}

impl SunEventsKey {
    fn new(date: NaiveDate, location: &GeoLocation, config: &ObservabilityConfig) -> Self {
        Self {
            date,
            timezone: location.timezone_name(),
            latitude_bits: location.latitude_deg.to_bits(),
            longitude_bits: location.longitude_deg.to_bits(),
            twilight_bits: config.twilight_angle_deg.to_bits(),
            sunrise_bits: config.sunrise_angle_deg.to_bits(),
            step_minutes: config.event_search_step_minutes,
        }
    }
}

/// Memoizes `calculate_sun_events` per (date, zone, latitude, longitude).
///
/// Safe to share between threads. Two callers missing on the same key may
/// both compute; the first insert wins and both see identical values.
#[derive(Debug, Default)]
pub struct SunEventsCache {
    entries: RwLock<HashMap<SunEventsKey, SunEvents>>,
    policy: CachePolicy,
}

impl SunEventsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: CachePolicy) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            policy,
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    pub fn get_sun_events(
        &self,
        date: NaiveDate,
        location: &GeoLocation,
        config: &ObservabilityConfig,
    ) -> Result<SunEvents> {
        let key = SunEventsKey::new(date, location, config);
        if let Some(events) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            debug!(%date, tz = key.timezone, "sun events cache hit");
            return Ok(*events);
        }

        debug!(%date, tz = key.timezone, "sun events cache miss");
        let events = calculate_sun_events(date, location, config)?;

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let CachePolicy::MaxEntries(limit) = self.policy {
            if limit == 0 {
                return Ok(events);
            }
            if entries.len() >= limit && !entries.contains_key(&key) {
                evict_oldest_date(&mut entries);
            }
        }
        Ok(*entries.entry(key).or_insert(events))
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// Drops all entries for dates strictly before `date`.
    pub fn evict_before(&self, date: NaiveDate) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|key, _| key.date >= date);
        before - entries.len()
    }
}

fn evict_oldest_date(entries: &mut HashMap<SunEventsKey, SunEvents>) {
    if let Some(oldest) = entries.keys().map(|k| k.date).min() {
        entries.retain(|key, _| key.date != oldest);
        debug!(%oldest, remaining = entries.len(), "evicted oldest cached date");
    }
}
