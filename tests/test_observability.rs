use chrono::{Duration, NaiveDate};

use deepsky_tracker::{
    observable_duration, observable_duration_for, observation_night, sample_altaz,
    EquatorialCoordinate, GeoLocation, HorizonMask, ObservabilityConfig, ObservabilityError,
    SunEventsCache,
};

macro_rules! assert_approx {
    ($left:expr, $right:expr, $tol:expr) => {
        let (l, r) = ($left as f64, $right as f64);
        assert!(
            (l - r).abs() <= $tol,
            "assert_approx failed: left={}, right={}, diff={}, tol={}",
            l, r, (l - r).abs(), $tol
        );
    };
}

fn new_year() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

fn berlin() -> GeoLocation {
    GeoLocation::new(52.5, 13.4, "Europe/Berlin").unwrap()
}

fn orion_nebula() -> EquatorialCoordinate {
    EquatorialCoordinate::new(5.58, -5.4).unwrap()
}

fn andromeda() -> EquatorialCoordinate {
    EquatorialCoordinate::new(0.712, 41.27).unwrap()
}

// ── Observation night ──

#[test]
fn test_winter_night_spans_dusk_to_dawn() {
    let cache = SunEventsCache::new();
    let night = observation_night(&berlin(), new_year(), &cache, &ObservabilityConfig::default())
        .unwrap()
        .unwrap();
    assert!(night.dawn_utc > night.dusk_utc);
    let hours = night.duration().num_minutes() as f64 / 60.0;
    assert_approx!(hours, 12.0, 0.1);
}

#[test]
fn test_no_night_without_astronomical_darkness() {
    let cache = SunEventsCache::new();
    let midsummer = NaiveDate::from_ymd_opt(2025, 6, 21).unwrap();
    let night = observation_night(&berlin(), midsummer, &cache, &ObservabilityConfig::default()).unwrap();
    assert!(night.is_none());
}

// ── Observable duration ──

#[test]
fn test_orion_nebula_above_thirty_degrees() {
    let cache = SunEventsCache::new();
    let result = observable_duration(
        &orion_nebula(),
        &berlin(),
        new_year(),
        30.0,
        15,
        &HorizonMask::empty(),
        &cache,
    )
    .unwrap();
    assert!(result.is_observable());
    // 9 samples between ~21:50 and ~23:50 local
    assert_eq!(result.observable_minutes(), 135);
    // culmination altitude = 90 - 52.5 - 5.4
    assert_approx!(result.max_altitude_deg, 32.1, 0.05);
    let (start, end) = (result.window_start.unwrap(), result.window_end.unwrap());
    assert_eq!(end - start, Duration::minutes(120));
}

#[test]
fn test_duration_is_monotone_in_threshold() {
    let cache = SunEventsCache::new();
    let mut previous = -1;
    for threshold in [60.0, 50.0, 40.0, 32.0, 30.0, 20.0, 10.0, 0.0, -10.0] {
        let minutes = observable_duration(
            &orion_nebula(),
            &berlin(),
            new_year(),
            threshold,
            15,
            &HorizonMask::empty(),
            &cache,
        )
        .unwrap()
        .observable_minutes();
        assert!(minutes >= previous, "threshold {} gave {} < {}", threshold, minutes, previous);
        previous = minutes;
    }
}

#[test]
fn test_sentinel_mask_matches_empty_mask() {
    let cache = SunEventsCache::new();
    let run = |mask: &HorizonMask| {
        observable_duration(&andromeda(), &berlin(), new_year(), 30.0, 15, mask, &cache).unwrap()
    };
    let empty = run(&HorizonMask::empty());
    for az in [0.0, 45.0, 180.0, 300.0] {
        assert_eq!(run(&HorizonMask::from_pairs(&[(az, 0.0)])), empty);
    }
}

#[test]
fn test_full_obstruction_blocks_everything() {
    let cache = SunEventsCache::new();
    let wall = HorizonMask::from_pairs(&[(0.0, 89.0), (120.0, 89.0), (240.0, 89.0), (359.9, 89.0)]);
    let result =
        observable_duration(&andromeda(), &berlin(), new_year(), 30.0, 15, &wall, &cache).unwrap();
    assert!(!result.is_observable());
    assert_eq!(result.observable_minutes(), 0);
    assert_eq!(result.max_altitude_deg, 0.0);
}

#[test]
fn test_mask_only_ever_removes_time() {
    let cache = SunEventsCache::new();
    let trees = HorizonMask::from_pairs(&[(250.0, 45.0), (330.0, 40.0)]);
    let open = observable_duration(&andromeda(), &berlin(), new_year(), 30.0, 15, &HorizonMask::empty(), &cache)
        .unwrap();
    let masked = observable_duration(&andromeda(), &berlin(), new_year(), 30.0, 15, &trees, &cache).unwrap();
    assert!(masked.observable_duration <= open.observable_duration);
    assert!(masked.observable_duration < open.observable_duration);
}

#[test]
fn test_max_altitude_matches_samples() {
    let cache = SunEventsCache::new();
    let result = observable_duration(
        &andromeda(),
        &berlin(),
        new_year(),
        30.0,
        15,
        &HorizonMask::empty(),
        &cache,
    )
    .unwrap();
    // M31 culminates near the zenith of Berlin early in the evening
    assert_approx!(result.max_altitude_deg, 78.86, 0.2);
    let samples = sample_altaz(&andromeda(), &berlin(), &[result.window_start.unwrap()]).unwrap();
    assert!(samples[0].altitude_deg >= 30.0);
}

#[test]
fn test_midsummer_is_zero_not_error() {
    let cache = SunEventsCache::new();
    let oslo_north = GeoLocation::new(67.0, 18.0, "Europe/Oslo").unwrap();
    let midsummer = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
    let result = observable_duration(
        &andromeda(),
        &oslo_north,
        midsummer,
        30.0,
        15,
        &HorizonMask::empty(),
        &cache,
    )
    .unwrap();
    assert_eq!(result.observable_minutes(), 0);
    assert!(result.window_start.is_none());
}

#[test]
fn test_never_rising_target_is_zero() {
    let cache = SunEventsCache::new();
    let southern = EquatorialCoordinate::new(5.0, -70.0).unwrap();
    let result = observable_duration(
        &southern,
        &berlin(),
        new_year(),
        0.0,
        15,
        &HorizonMask::empty(),
        &cache,
    )
    .unwrap();
    assert!(!result.is_observable());
}

#[test]
fn test_config_driven_entry_point_agrees() {
    let cache = SunEventsCache::new();
    let config = ObservabilityConfig {
        altitude_threshold_deg: 25.0,
        sampling_interval_minutes: 10,
        ..ObservabilityConfig::default()
    };
    let via_config = observable_duration_for(
        &orion_nebula(),
        &berlin(),
        new_year(),
        &HorizonMask::empty(),
        &cache,
        &config,
    )
    .unwrap();
    let via_args = observable_duration(
        &orion_nebula(),
        &berlin(),
        new_year(),
        25.0,
        10,
        &HorizonMask::empty(),
        &cache,
    )
    .unwrap();
    assert_eq!(via_config, via_args);
}

#[test]
fn test_refraction_never_shortens_the_window() {
    let cache = SunEventsCache::new();
    let plain = ObservabilityConfig::default();
    let refracted = ObservabilityConfig {
        apply_refraction: true,
        ..plain
    };
    let run = |config: &ObservabilityConfig| {
        observable_duration_for(&orion_nebula(), &berlin(), new_year(), &HorizonMask::empty(), &cache, config)
            .unwrap()
    };
    let (a, b) = (run(&plain), run(&refracted));
    assert!(b.observable_duration >= a.observable_duration);
    assert!(b.max_altitude_deg > a.max_altitude_deg);
}

// ── Errors ──

#[test]
fn test_non_positive_interval_is_rejected() {
    let cache = SunEventsCache::new();
    for interval in [0, -15] {
        let err = observable_duration(
            &orion_nebula(),
            &berlin(),
            new_year(),
            30.0,
            interval,
            &HorizonMask::empty(),
            &cache,
        )
        .unwrap_err();
        assert_eq!(err, ObservabilityError::InvalidSamplingInterval(interval));
    }
}

#[test]
fn test_oversized_interval_is_an_error_not_a_panic() {
    let cache = SunEventsCache::new();
    for interval in [1_000_000_000_000, i64::MAX] {
        let err = observable_duration(
            &orion_nebula(),
            &berlin(),
            new_year(),
            30.0,
            interval,
            &HorizonMask::empty(),
            &cache,
        )
        .unwrap_err();
        assert_eq!(err, ObservabilityError::InvalidSamplingInterval(interval));
    }
}

#[test]
fn test_oversized_search_step_is_an_error() {
    let cache = SunEventsCache::new();
    let config = ObservabilityConfig {
        event_search_step_minutes: i64::MAX,
        ..ObservabilityConfig::default()
    };
    let err = observable_duration_for(
        &orion_nebula(),
        &berlin(),
        new_year(),
        &HorizonMask::empty(),
        &cache,
        &config,
    )
    .unwrap_err();
    assert_eq!(err, ObservabilityError::InvalidSearchStep(i64::MAX));
}

// ── Alt/Az sampling ──

#[test]
fn test_sample_altaz_preserves_order_and_length() {
    let loc = berlin();
    let t0 = deepsky_tracker::time::local_noon_utc(new_year(), loc.timezone).unwrap();
    let times: Vec<_> = (0..24).map(|h| t0 + Duration::hours(h)).collect();
    let samples = sample_altaz(&orion_nebula(), &loc, &times).unwrap();
    assert_eq!(samples.len(), times.len());
    for s in &samples {
        assert!((-90.0..=90.0).contains(&s.altitude_deg));
        assert!((0.0..360.0).contains(&s.azimuth_deg));
    }
    assert!(sample_altaz(&orion_nebula(), &loc, &[]).unwrap().is_empty());
}

#[test]
fn test_target_is_due_south_at_transit() {
    let loc = berlin();
    let config = ObservabilityConfig::default();
    let t = deepsky_tracker::next_transit(&orion_nebula(), &loc, new_year(), &config)
        .unwrap()
        .instant()
        .unwrap();
    let s = sample_altaz(&orion_nebula(), &loc, &[t]).unwrap()[0];
    assert_approx!(s.azimuth_deg, 180.0, 0.05);
    assert_approx!(s.altitude_deg, 32.12, 0.02);
}

#[test]
fn test_multi_year_batch_matches_single_samples() {
    let loc = berlin();
    let t0 = deepsky_tracker::time::local_noon_utc(new_year(), loc.timezone).unwrap();
    let times: Vec<_> = (0..10).map(|y| t0 + Duration::days(365 * y) + Duration::hours(9)).collect();
    let batch = sample_altaz(&orion_nebula(), &loc, &times).unwrap();
    for (t, sample) in times.iter().zip(&batch) {
        let single = sample_altaz(&orion_nebula(), &loc, &[*t]).unwrap()[0];
        // one arcsecond
        assert_approx!(sample.altitude_deg, single.altitude_deg, 1.0 / 3600.0);
        assert_approx!(sample.azimuth_deg, single.azimuth_deg, 1.0 / 3600.0);
    }
}
