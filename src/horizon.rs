//! Per-azimuth minimum altitude from a sparse horizon profile.
//!
//! A mask lists (azimuth, minimum altitude) points. Between consecutive
//! points the floor is interpolated linearly. Outside the listed span the
//! floor returns to the baseline altitude threshold, with a 0.001° ramp on
//! each side so an isolated obstruction does not bleed into neighbouring
//! azimuths. An altitude of exactly 0 means "use the baseline".

use serde::{Deserialize, Serialize};

use crate::angles::normalize_angle;

const EDGE_RAMP_DEG: f64 = 0.001;
const COINCIDENT_AZIMUTH_DEG: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizonPoint {
    pub azimuth_deg: f64,
    pub min_altitude_deg: f64,
}

impl HorizonPoint {
    pub fn new(azimuth_deg: f64, min_altitude_deg: f64) -> Self {
        Self {
            azimuth_deg,
            min_altitude_deg,
        }
    }
}

/// Horizon profile, kept sorted by azimuth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<HorizonPoint>", into = "Vec<HorizonPoint>")]
pub struct HorizonMask {
    points: Vec<HorizonPoint>,
}

impl From<Vec<HorizonPoint>> for HorizonMask {
    fn from(points: Vec<HorizonPoint>) -> Self {
        Self::new(points)
    }
}

impl From<HorizonMask> for Vec<HorizonPoint> {
    fn from(mask: HorizonMask) -> Self {
        mask.points
    }
}

impl HorizonMask {
    pub fn new(points: Vec<HorizonPoint>) -> Self {
        let mut points: Vec<HorizonPoint> = points
            .into_iter()
            .filter(|p| p.azimuth_deg.is_finite() && p.min_altitude_deg.is_finite())
            .map(|p| HorizonPoint::new(normalize_angle(p.azimuth_deg), p.min_altitude_deg))
            .collect();
        points.sort_by(|a, b| a.azimuth_deg.total_cmp(&b.azimuth_deg));
        Self { points }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self::new(pairs.iter().map(|&(az, alt)| HorizonPoint::new(az, alt)).collect())
    }

    pub fn points(&self) -> &[HorizonPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Binds the mask to a baseline threshold, producing the full profile
    /// that covers 0..360.
    pub fn resolve(&self, baseline_deg: f64) -> ResolvedHorizon {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (first.azimuth_deg, last.azimuth_deg),
            _ => {
                return ResolvedHorizon {
                    baseline_deg,
                    profile: Vec::new(),
                }
            }
        };

        let mut profile = Vec::with_capacity(self.points.len() + 4);
        profile.push((0.0, baseline_deg));
        profile.push((first - EDGE_RAMP_DEG, baseline_deg));
        profile.extend(self.points.iter().map(|p| {
            let alt = if p.min_altitude_deg == 0.0 {
                baseline_deg
            } else {
                p.min_altitude_deg
            };
            (p.azimuth_deg, alt)
        }));
        profile.push((last + EDGE_RAMP_DEG, baseline_deg));
        profile.push((360.0, baseline_deg));

        ResolvedHorizon {
            baseline_deg,
            profile,
        }
    }

    pub fn min_altitude_at(&self, azimuth_deg: f64, baseline_deg: f64) -> f64 {
        self.resolve(baseline_deg).min_altitude_at(azimuth_deg)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedHorizon {
    baseline_deg: f64,
    profile: Vec<(f64, f64)>,
}

impl ResolvedHorizon {
    pub fn baseline_deg(&self) -> f64 {
        self.baseline_deg
    }

    pub fn min_altitude_at(&self, azimuth_deg: f64) -> f64 {
        let az = normalize_angle(azimuth_deg);
        for pair in self.profile.windows(2) {
            let ((az0, alt0), (az1, alt1)) = (pair[0], pair[1]);
            if az0 <= az && az <= az1 {
                if (az1 - az0).abs() < COINCIDENT_AZIMUTH_DEG {
                    return alt0;
                }
                return alt0 + (az - az0) * (alt1 - alt0) / (az1 - az0);
            }
        }
        self.baseline_deg
    }
}
