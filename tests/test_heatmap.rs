use chrono::NaiveDate;

use deepsky_tracker::{
    heatmap_to_compact, nightly_visibility, weekly_summary, yearly_heatmap, CachePolicy,
    EquatorialCoordinate, GeoLocation, HorizonMask, NightVisibility, ObservabilityConfig,
    SunEventsCache,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn night(d: NaiveDate, observable_minutes: i64, max_altitude_deg: f64) -> NightVisibility {
    NightVisibility {
        date: d,
        dark_minutes: 600,
        observable_minutes,
        max_altitude_deg,
        window_start: None,
        window_end: None,
    }
}

fn berlin() -> GeoLocation {
    GeoLocation::new(52.5, 13.4, "Europe/Berlin").unwrap()
}

fn orion_nebula() -> EquatorialCoordinate {
    EquatorialCoordinate::new(5.58, -5.4).unwrap()
}

// ── Weekly summary ──

#[test]
fn test_weekly_summary_groups_by_iso_week() {
    // 2024-12-30 (Mon) .. 2025-01-05 (Sun) is ISO week 2025-W01
    let nights: Vec<_> = (0..9)
        .map(|i| night(date(2024, 12, 30) + chrono::Duration::days(i), 60 * i, 10.0 + i as f64))
        .collect();
    let weeks = weekly_summary(&nights);
    assert_eq!(weeks.len(), 2);
    assert_eq!((weeks[0].iso_year, weeks[0].iso_week), (2025, 1));
    assert_eq!(weeks[0].nights, 7);
    assert_eq!(weeks[0].observable_nights, 6);
    assert_eq!(weeks[0].total_observable_minutes, 60 * 21);
    assert_eq!(weeks[0].best_max_altitude_deg, 16.0);
    assert_eq!((weeks[1].iso_year, weeks[1].iso_week), (2025, 2));
    assert_eq!(weeks[1].nights, 2);
}

#[test]
fn test_weekly_summary_ignores_altitude_of_blank_nights() {
    let weeks = weekly_summary(&[night(date(2025, 1, 6), 0, 80.0), night(date(2025, 1, 7), 30, 35.0)]);
    assert_eq!(weeks[0].best_max_altitude_deg, 35.0);
}

#[test]
fn test_weekly_summary_empty() {
    assert!(weekly_summary(&[]).is_empty());
}

// ── Nightly visibility ──

#[test]
fn test_one_week_of_nights() {
    let cache = SunEventsCache::new();
    let config = ObservabilityConfig::default();
    let nights = nightly_visibility(
        &orion_nebula(),
        &berlin(),
        date(2025, 1, 1),
        7,
        &HorizonMask::empty(),
        &cache,
        &config,
    )
    .unwrap();
    assert_eq!(nights.len(), 7);
    assert_eq!(nights[0].date, date(2025, 1, 1));
    assert_eq!(nights[0].observable_minutes, 135);
    for n in &nights {
        assert!(n.dark_minutes > 11 * 60);
        assert!(n.observable_minutes > 0);
        assert!(n.observable_minutes <= n.dark_minutes + config.sampling_interval_minutes);
    }
}

#[test]
fn test_rows_serialize_to_json() {
    let cache = SunEventsCache::new();
    let nights = nightly_visibility(
        &orion_nebula(),
        &berlin(),
        date(2025, 1, 1),
        1,
        &HorizonMask::empty(),
        &cache,
        &ObservabilityConfig::default(),
    )
    .unwrap();
    let json = serde_json::to_value(&nights[0]).unwrap();
    assert_eq!(json["date"], "2025-01-01");
    assert_eq!(json["observable_minutes"], 135);
}

// ── Yearly heatmap ──

#[test]
fn test_yearly_heatmap_for_high_latitude_site() {
    let cache = SunEventsCache::with_policy(CachePolicy::MaxEntries(16));
    let config = ObservabilityConfig {
        altitude_threshold_deg: 20.0,
        sampling_interval_minutes: 30,
        event_search_step_minutes: 20,
        ..ObservabilityConfig::default()
    };
    let site = GeoLocation::new(60.0, 10.0, "Europe/Oslo").unwrap();
    let heatmap = yearly_heatmap(&orion_nebula(), &site, 2025, &HorizonMask::empty(), &cache, &config)
        .unwrap();

    assert_eq!(heatmap.nights.len(), 365);
    assert_eq!(heatmap.metadata.total_nights, 365);
    // no astronomical night around midsummer at 60°N
    assert!(heatmap.metadata.dark_nights < 365);
    assert!(heatmap.metadata.observable_nights > 0);
    assert!(heatmap.metadata.observable_nights < heatmap.metadata.dark_nights);
    assert!(!heatmap.metadata.generated_at.is_empty());
    assert!(cache.len() <= 16);

    let compact = heatmap_to_compact(&heatmap);
    assert_eq!(compact.len(), 365);
    assert_eq!(compact[172], 0);
}
