//! Reduction of catalogue places to topocentric horizon coordinates.
//!
//! The chain is: ICRS (J2000) unit vector -> IAU 2006 bias-precession
//! (Fukushima-Williams angles) combined with nutation -> annual aberration
//! -> hour angle from Greenwich apparent sidereal time -> altitude/azimuth.
//! UT1 is taken equal to UTC; the sub-second difference moves a target by
//! well under an arcminute.

use std::f64::consts::{PI, TAU};

use chrono::{DateTime, Utc};

use crate::angles::{deg_to_rad, normalize_angle, rad_to_deg};
use crate::time;
use crate::types::{AltAz, EquatorialCoordinate};

const ARCSEC_TO_RAD: f64 = PI / 648_000.0;
/// Nutation table coefficients are in units of 0.0001".
const NUTATION_UNIT_TO_RAD: f64 = ARCSEC_TO_RAD * 1.0e-4;
const ABERRATION_CONSTANT_ARCSEC: f64 = 20.49552;

type Vec3 = [f64; 3];
type Mat3 = [[f64; 3]; 3];

fn rot_x(phi: f64) -> Mat3 {
    let (s, c) = phi.sin_cos();
    [[1.0, 0.0, 0.0], [0.0, c, s], [0.0, -s, c]]
}

fn rot_z(psi: f64) -> Mat3 {
    let (s, c) = psi.sin_cos();
    [[c, s, 0.0], [-s, c, 0.0], [0.0, 0.0, 1.0]]
}

fn mat_mul(a: &Mat3, b: &Mat3) -> Mat3 {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

fn mat_vec(m: &Mat3, v: &Vec3) -> Vec3 {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

fn to_cartesian(ra: f64, dec: f64) -> Vec3 {
    let (sr, cr) = ra.sin_cos();
    let (sd, cd) = dec.sin_cos();
    [cd * cr, cd * sr, sd]
}

fn to_spherical(v: &Vec3) -> (f64, f64) {
    let r_xy = (v[0] * v[0] + v[1] * v[1]).sqrt();
    let ra = if r_xy == 0.0 { 0.0 } else { v[1].atan2(v[0]).rem_euclid(TAU) };
    (ra, v[2].atan2(r_xy))
}

/// IAU 2006 Fukushima-Williams angles (gamma_bar, phi_bar, psi_bar, eps_A)
/// in radians, for `t` Julian centuries of TT.
fn fukushima_williams(t: f64) -> (f64, f64, f64, f64) {
    let gamb = (-0.052928
        + (10.556378
            + (0.4932044 + (-0.00031238 + (-0.000002788 + 0.0000000260 * t) * t) * t) * t)
            * t)
        * ARCSEC_TO_RAD;
    let phib = (84381.412819
        + (-46.811016
            + (0.0511268 + (0.00053289 + (-0.000000440 + (-0.0000000176) * t) * t) * t) * t)
            * t)
        * ARCSEC_TO_RAD;
    let psib = (-0.041775
        + (5038.481484
            + (1.5584175 + (-0.00018522 + (-0.000026452 + (-0.0000000148) * t) * t) * t) * t)
            * t)
        * ARCSEC_TO_RAD;
    (gamb, phib, psib, mean_obliquity(t))
}

/// IAU 2006 mean obliquity of the ecliptic, radians.
pub fn mean_obliquity(t: f64) -> f64 {
    (84381.406
        + (-46.836769
            + (-0.0001831 + (0.00200340 + (-0.000000576 + (-0.0000000434) * t) * t) * t) * t)
            * t)
        * ARCSEC_TO_RAD
}

fn fw_matrix(gamb: f64, phib: f64, psi: f64, eps: f64) -> Mat3 {
    let m = mat_mul(&rot_x(phib), &rot_z(gamb));
    let m = mat_mul(&rot_z(-psi), &m);
    mat_mul(&rot_x(-eps), &m)
}

// D, M, M', F, Omega multipliers; dpsi sin coefficient (+T rate);
// deps cos coefficient (+T rate). Largest terms of the IAU 1980 series.
const NUTATION_TERMS: [([i8; 5], f64, f64, f64, f64); 18] = [
    ([0, 0, 0, 0, 1], -171996.0, -174.2, 92025.0, 8.9),
    ([-2, 0, 0, 2, 2], -13187.0, -1.6, 5736.0, -3.1),
    ([0, 0, 0, 2, 2], -2274.0, -0.2, 977.0, -0.5),
    ([0, 0, 0, 0, 2], 2062.0, 0.2, -895.0, 0.5),
    ([0, 1, 0, 0, 0], 1426.0, -3.4, 54.0, -0.1),
    ([0, 0, 1, 0, 0], 712.0, 0.1, -7.0, 0.0),
    ([-2, 1, 0, 2, 2], -517.0, 1.2, 224.0, -0.6),
    ([0, 0, 0, 2, 1], -386.0, -0.4, 200.0, 0.0),
    ([0, 0, 1, 2, 2], -301.0, 0.0, 129.0, -0.1),
    ([-2, -1, 0, 2, 2], 217.0, -0.5, -95.0, 0.3),
    ([-2, 0, 1, 0, 0], -158.0, 0.0, 0.0, 0.0),
    ([-2, 0, 0, 2, 1], 129.0, 0.1, -70.0, 0.0),
    ([0, 0, -1, 2, 2], 123.0, 0.0, -53.0, 0.0),
    ([2, 0, 0, 0, 0], 63.0, 0.0, 0.0, 0.0),
    ([0, 0, 1, 0, 1], 63.0, 0.1, -33.0, 0.0),
    ([2, 0, -1, 2, 2], -59.0, 0.0, 26.0, 0.0),
    ([0, 0, -1, 0, 1], -58.0, -0.1, 32.0, 0.0),
    ([0, 0, 1, 2, 1], -51.0, 0.0, 27.0, 0.0),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nutation {
    pub dpsi: f64,
    pub deps: f64,
}

/// Nutation in longitude and obliquity (radians), good to about 0.1".
pub fn nutation(t: f64) -> Nutation {
    let t2 = t * t;
    let t3 = t2 * t;
    let args = [
        297.85036 + 445267.111480 * t - 0.0019142 * t2 + t3 / 189474.0,
        357.52772 + 35999.050340 * t - 0.0001603 * t2 - t3 / 300000.0,
        134.96298 + 477198.867398 * t + 0.0086972 * t2 + t3 / 56250.0,
        93.27191 + 483202.017538 * t - 0.0036825 * t2 + t3 / 327270.0,
        125.04452 - 1934.136261 * t + 0.0020708 * t2 + t3 / 450000.0,
    ];

    let (mut dpsi, mut deps) = (0.0, 0.0);
    for (mult, ps, pst, ec, ect) in NUTATION_TERMS.iter() {
        let arg: f64 = mult
            .iter()
            .zip(args.iter())
            .map(|(&m, &a)| m as f64 * a)
            .sum();
        let (s, c) = deg_to_rad(normalize_angle(arg)).sin_cos();
        dpsi += (ps + pst * t) * s;
        deps += (ec + ect * t) * c;
    }

    Nutation {
        dpsi: dpsi * NUTATION_UNIT_TO_RAD,
        deps: deps * NUTATION_UNIT_TO_RAD,
    }
}

/// Earth rotation angle (radians) for a UT1 Julian date.
fn earth_rotation_angle(jd_ut1: f64) -> f64 {
    let du = jd_ut1 - time::J2000_JD;
    (TAU * (jd_ut1.fract() + 0.7790572732640 + 0.00273781191135448 * du)).rem_euclid(TAU)
}

/// IAU 2006 Greenwich mean sidereal time, radians.
pub fn gmst(instant: DateTime<Utc>) -> f64 {
    let t = time::julian_centuries_tt(instant);
    let poly = 0.014506
        + t * (4612.156534
            + t * (1.3915817 + t * (-0.00000044 + t * (-0.000029956 + t * (-0.0000000368)))));
    (earth_rotation_angle(time::julian_date(instant)) + poly * ARCSEC_TO_RAD).rem_euclid(TAU)
}

/// Local apparent sidereal time, radians.
pub fn local_apparent_sidereal_time(instant: DateTime<Utc>, longitude_deg: f64) -> f64 {
    let t = time::julian_centuries_tt(instant);
    let nut = nutation(t);
    let equation_of_equinoxes = nut.dpsi * (mean_obliquity(t) + nut.deps).cos();
    (gmst(instant) + equation_of_equinoxes + deg_to_rad(longitude_deg)).rem_euclid(TAU)
}

/// Direction of the Earth's orbital velocity in the frame of date,
/// from the Sun's geometric longitude.
fn earth_velocity_direction(sun_longitude: f64, obliquity: f64) -> Vec3 {
    let (sl, cl) = sun_longitude.sin_cos();
    let (se, ce) = obliquity.sin_cos();
    [sl, -cl * ce, -cl * se]
}

/// Geocentric apparent right ascension and declination (radians, true
/// equator and equinox of date) of a catalogue position.
pub fn apparent_place(coord: &EquatorialCoordinate, instant: DateTime<Utc>) -> (f64, f64) {
    let t = time::julian_centuries_tt(instant);
    let (gamb, phib, psib, epsa) = fukushima_williams(t);
    let nut = nutation(t);
    let npb = fw_matrix(gamb, phib, psib + nut.dpsi, epsa + nut.deps);

    let catalog = to_cartesian(deg_to_rad(coord.ra_degrees()), deg_to_rad(coord.dec_degrees));
    let mut v = mat_vec(&npb, &catalog);

    let sun = sun_geometric(t);
    let kappa = ABERRATION_CONSTANT_ARCSEC * ARCSEC_TO_RAD;
    let vel = earth_velocity_direction(sun.true_longitude, epsa + nut.deps);
    for (component, dv) in v.iter_mut().zip(vel.iter()) {
        *component += kappa * dv;
    }

    to_spherical(&v)
}

/// Altitude/azimuth for an hour angle and declination at a latitude.
/// Azimuth runs from north through east.
pub fn horizontal(hour_angle: f64, dec: f64, latitude_deg: f64) -> AltAz {
    let lat = deg_to_rad(latitude_deg);
    let sin_alt = lat.sin() * dec.sin() + lat.cos() * dec.cos() * hour_angle.cos();
    let sin_az = -dec.cos() * hour_angle.sin();
    let cos_az = dec.sin() * lat.cos() - dec.cos() * lat.sin() * hour_angle.cos();
    AltAz {
        altitude_deg: rad_to_deg(sin_alt.clamp(-1.0, 1.0).asin()),
        azimuth_deg: normalize_angle(rad_to_deg(sin_az.atan2(cos_az))),
    }
}

/// Mean atmospheric refraction (degrees) at sea level for a true altitude,
/// Saemundsson's inversion of Bennett's formula.
pub fn refraction_deg(true_altitude_deg: f64) -> f64 {
    if true_altitude_deg < -1.0 {
        return 0.0;
    }
    let h = true_altitude_deg;
    1.02 / deg_to_rad(h + 10.3 / (h + 5.11)).tan() / 60.0
}

struct SunGeometric {
    true_longitude: f64,
    apparent_longitude: f64,
    omega: f64,
}

fn sun_geometric(t: f64) -> SunGeometric {
    let l0 = 280.46646 + 36000.76983 * t + 0.0003032 * t * t;
    let m = deg_to_rad(357.52911 + 35999.05029 * t - 0.0001537 * t * t);
    let c = (1.914602 - 0.004817 * t - 0.000014 * t * t) * m.sin()
        + (0.019993 - 0.000101 * t) * (2.0 * m).sin()
        + 0.000289 * (3.0 * m).sin();
    let true_longitude = normalize_angle(l0 + c);
    let omega = deg_to_rad(125.04 - 1934.136 * t);
    SunGeometric {
        true_longitude: deg_to_rad(true_longitude),
        apparent_longitude: deg_to_rad(true_longitude - 0.00569 - 0.00478 * omega.sin()),
        omega,
    }
}

/// Apparent right ascension and declination of the Sun (radians), accurate
/// to about 0.01 degree.
pub fn sun_apparent_place(instant: DateTime<Utc>) -> (f64, f64) {
    let t = time::julian_centuries_tt(instant);
    let sun = sun_geometric(t);
    let eps = mean_obliquity(t) + deg_to_rad(0.00256) * sun.omega.cos();
    let lambda = sun.apparent_longitude;
    let ra = (eps.cos() * lambda.sin()).atan2(lambda.cos()).rem_euclid(TAU);
    let dec = (eps.sin() * lambda.sin()).asin();
    (ra, dec)
}

/// Geometric (unrefracted) altitude and azimuth of the Sun.
pub fn sun_altaz(instant: DateTime<Utc>, latitude_deg: f64, longitude_deg: f64) -> AltAz {
    let (ra, dec) = sun_apparent_place(instant);
    let last = local_apparent_sidereal_time(instant, longitude_deg);
    horizontal(last - ra, dec, latitude_deg)
}
