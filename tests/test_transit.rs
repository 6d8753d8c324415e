use chrono::{Duration, NaiveDate};

use deepsky_tracker::time::local_noon_utc;
use deepsky_tracker::{
    culmination, next_transit, next_transit_hhmm, Culmination, EquatorialCoordinate, EventTime,
    GeoLocation, ObservabilityConfig, ObservabilityError, NOT_AVAILABLE,
};

fn new_year() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

// ── Transit time ──

#[test]
fn test_orion_nebula_transit_over_berlin() {
    let shown = next_transit_hhmm(5.58, -5.4, 52.5, 13.4, "Europe/Berlin", new_year()).unwrap();
    assert_eq!(shown, "22:55");
}

#[test]
fn test_transit_falls_in_the_following_day() {
    let loc = GeoLocation::new(52.5, 13.4, "Europe/Berlin").unwrap();
    let noon = local_noon_utc(new_year(), loc.timezone).unwrap();
    for ra in [0.0, 3.0, 6.0, 9.0, 12.0, 15.0, 18.0, 21.0, 23.9] {
        let coord = EquatorialCoordinate::new(ra, 20.0).unwrap();
        let t = next_transit(&coord, &loc, new_year(), &ObservabilityConfig::default())
            .unwrap()
            .instant()
            .unwrap();
        assert!(t >= noon && t < noon + Duration::hours(24), "ra={} t={}", ra, t);
    }
}

#[test]
fn test_transit_advances_with_right_ascension() {
    let loc = GeoLocation::new(52.5, 13.4, "Europe/Berlin").unwrap();
    let config = ObservabilityConfig::default();
    let at = |ra: f64| {
        let coord = EquatorialCoordinate::new(ra, 0.0).unwrap();
        next_transit(&coord, &loc, new_year(), &config).unwrap().instant().unwrap()
    };
    // one hour of RA is just under one hour of clock time
    let gap = (at(6.0) - at(5.0)).num_seconds();
    assert!((3580..=3600).contains(&gap), "gap={}s", gap);
}

// ── Degenerate targets ──

#[test]
fn test_never_rising_target_is_not_available() {
    let shown = next_transit_hhmm(5.0, -60.0, 52.5, 13.4, "Europe/Berlin", new_year()).unwrap();
    assert_eq!(shown, NOT_AVAILABLE);
}

#[test]
fn test_circumpolar_target_still_transits() {
    let loc = GeoLocation::new(52.5, 13.4, "Europe/Berlin").unwrap();
    let polaris = EquatorialCoordinate::new(2.53, 89.26).unwrap();
    let t = next_transit(&polaris, &loc, new_year(), &ObservabilityConfig::default()).unwrap();
    assert!(matches!(t, EventTime::Occurs(_)));
}

#[test]
fn test_circumpolar_transit_can_read_not_available() {
    let loc = GeoLocation::new(52.5, 13.4, "Europe/Berlin").unwrap();
    let polaris = EquatorialCoordinate::new(2.53, 89.26).unwrap();
    let config = ObservabilityConfig {
        report_circumpolar_transit: false,
        ..ObservabilityConfig::default()
    };
    let t = next_transit(&polaris, &loc, new_year(), &config).unwrap();
    assert_eq!(t, EventTime::AlwaysUp);
    assert_eq!(t.display(loc.timezone), NOT_AVAILABLE);

    // targets that rise and set are unaffected
    let m42 = EquatorialCoordinate::new(5.58, -5.4).unwrap();
    assert!(next_transit(&m42, &loc, new_year(), &config).unwrap().is_defined());
}

#[test]
fn test_culmination_classes() {
    let loc = GeoLocation::new(52.5, 13.4, "Europe/Berlin").unwrap();
    let class = |ra: f64, dec: f64| {
        culmination(&EquatorialCoordinate::new(ra, dec).unwrap(), &loc, new_year()).unwrap()
    };
    assert_eq!(class(2.53, 89.26), Culmination::Circumpolar);
    assert_eq!(class(5.58, -5.4), Culmination::RisesAndSets);
    assert_eq!(class(5.0, -60.0), Culmination::NeverRises);
}

#[test]
fn test_southern_target_from_southern_site() {
    let shown = next_transit_hhmm(5.0, -60.0, -33.9, 18.4, "Africa/Johannesburg", new_year()).unwrap();
    assert_ne!(shown, NOT_AVAILABLE);
}

// ── Errors ──

#[test]
fn test_invalid_inputs_fail_instead_of_na() {
    assert!(matches!(
        next_transit_hhmm(5.58, -95.0, 52.5, 13.4, "Europe/Berlin", new_year()),
        Err(ObservabilityError::DeclinationOutOfRange(_))
    ));
    assert!(matches!(
        next_transit_hhmm(5.58, -5.4, 52.5, 13.4, "Berlin", new_year()),
        Err(ObservabilityError::UnknownTimezone(_))
    ));
}
