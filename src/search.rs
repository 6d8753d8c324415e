use chrono::{DateTime, Duration, Utc};
use tracing::trace;

use crate::error::{ObservabilityError, Result};
use crate::types::EventTime;

const BISECTION_RESOLUTION_SECONDS: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Crossing {
    /// The function goes from negative to non-negative.
    Rising,
    /// The function goes from non-negative to negative.
    Setting,
}

impl Crossing {
    fn matches(self, before: f64, after: f64) -> bool {
        match self {
            Crossing::Rising => before < 0.0 && after >= 0.0,
            Crossing::Setting => before >= 0.0 && after < 0.0,
        }
    }
}

fn evaluate<F>(f: &F, t: DateTime<Utc>) -> Result<f64>
where
    F: Fn(DateTime<Utc>) -> f64,
{
    let v = f(t);
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ObservabilityError::Numerical(format!(
            "non-finite value while searching at {}",
            t
        )))
    }
}

/// Scans `f` forward from `start` over `span` at `step`, and refines the
/// first crossing in `direction` by bisection to one second.
///
/// With no crossing in the window the event is `AlwaysUp` when `f` stays
/// non-negative and `NeverOccurs` when it stays negative. If `f` only crosses
/// the other way, the sign at `start` decides.
pub(crate) fn find_crossing<F>(
    start: DateTime<Utc>,
    span: Duration,
    step: Duration,
    direction: Crossing,
    f: F,
) -> Result<EventTime>
where
    F: Fn(DateTime<Utc>) -> f64,
{
    let end = start + span;
    let v_start = evaluate(&f, start)?;
    let (mut any_above, mut any_below) = (v_start >= 0.0, v_start < 0.0);

    let (mut t0, mut v0) = (start, v_start);
    while t0 < end {
        let t1 = (t0 + step).min(end);
        let v1 = evaluate(&f, t1)?;
        any_above |= v1 >= 0.0;
        any_below |= v1 < 0.0;
        if direction.matches(v0, v1) {
            let t = bisect(&f, t0, v0, t1)?;
            trace!(?direction, %t, "crossing found");
            return Ok(EventTime::Occurs(t));
        }
        t0 = t1;
        v0 = v1;
    }

    Ok(match (any_above, any_below) {
        (true, false) => EventTime::AlwaysUp,
        (false, true) => EventTime::NeverOccurs,
        _ if v_start >= 0.0 => EventTime::AlwaysUp,
        _ => EventTime::NeverOccurs,
    })
}

fn bisect<F>(f: &F, mut lo: DateTime<Utc>, v_lo: f64, mut hi: DateTime<Utc>) -> Result<DateTime<Utc>>
where
    F: Fn(DateTime<Utc>) -> f64,
{
    let lo_sign = v_lo >= 0.0;
    while hi - lo > Duration::seconds(BISECTION_RESOLUTION_SECONDS) {
        let mid = lo + (hi - lo) / 2;
        if (evaluate(f, mid)? >= 0.0) == lo_sign {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok(lo + (hi - lo) / 2)
}
