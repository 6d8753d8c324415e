use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

use deepsky_tracker::{
    format_dms, format_hms, next_transit, observable_duration_for, sun_events,
    EquatorialCoordinate, GeoLocation, HorizonMask, ObservabilityConfig, SunEventsCache,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let location = GeoLocation::new(52.5, 13.4, "Europe/Berlin")?;
    let date = NaiveDate::from_ymd_opt(2025, 1, 1).ok_or("bad date")?;
    let config = ObservabilityConfig::default();
    let cache = SunEventsCache::new();
    // trees to the west-northwest
    let mask = HorizonMask::from_pairs(&[(250.0, 45.0), (330.0, 40.0)]);

    let sun = sun_events(date, location.timezone_name(), location.latitude_deg, location.longitude_deg)?
        .display(location.timezone);
    println!("=== Night of {} at {} ===", date, location.timezone_name());
    println!(
        "Location: {} {}",
        format_dms(location.latitude_deg),
        format_dms(location.longitude_deg)
    );
    println!("Astronomical dawn: {}", sun.astronomical_dawn);
    println!("Sunrise:           {}", sun.sunrise);
    println!("Solar transit:     {}", sun.transit);
    println!("Sunset:            {}", sun.sunset);
    println!("Astronomical dusk: {}", sun.astronomical_dusk);
    println!();

    let catalog = [
        ("M42", Some("05:35:17"), Some("-05:23:28")),
        ("M31", Some("00:42:44"), Some("+41:16:09")),
        ("M13", Some("16:41:41"), Some("36:27:35")),
        ("bad row", Some("??"), None),
    ];

    println!("{:<8} {:>12} {:>12} {:>8} {:>10} {:>8}", "Target", "RA", "Dec", "Transit", "Minutes", "Max alt");
    for (name, ra, dec) in catalog {
        let Some(coord) = EquatorialCoordinate::from_catalog(ra, dec) else {
            println!("{:<8} {:>12} {:>12} {:>8} {:>10} {:>8}", name, "N/A", "N/A", "N/A", "N/A", "N/A");
            continue;
        };
        let transit = next_transit(&coord, &location, date, &config)?.display(location.timezone);
        let result = observable_duration_for(&coord, &location, date, &mask, &cache, &config)?;
        println!(
            "{:<8} {:>12} {:>12} {:>8} {:>10} {:>7.1}°",
            name,
            format_hms(coord.ra_hours),
            format_dms(coord.dec_degrees),
            transit,
            result.observable_minutes(),
            result.max_altitude_deg
        );
    }

    Ok(())
}
