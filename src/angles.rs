pub const DEGREES_PER_HOUR: f64 = 15.0;
pub const ARCSEC_PER_DEGREE: f64 = 3600.0;

pub fn deg_to_rad(deg: f64) -> f64 {
    deg * (std::f64::consts::PI / 180.0)
}

pub fn rad_to_deg(rad: f64) -> f64 {
    rad * (180.0 / std::f64::consts::PI)
}

pub fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

/// Wraps into [-180, 180).
pub fn wrap_pm180(angle: f64) -> f64 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

/// A raw angle as it arrives from a catalog or a location profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawAngle<'a> {
    Number(f64),
    Text(&'a str),
    Missing,
}

impl From<f64> for RawAngle<'_> {
    fn from(value: f64) -> Self {
        RawAngle::Number(value)
    }
}

impl<'a> From<&'a str> for RawAngle<'a> {
    fn from(value: &'a str) -> Self {
        RawAngle::Text(value)
    }
}

impl<'a> From<&'a String> for RawAngle<'a> {
    fn from(value: &'a String) -> Self {
        RawAngle::Text(value.as_str())
    }
}

impl<'a> From<Option<&'a str>> for RawAngle<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(RawAngle::Missing, RawAngle::Text)
    }
}

impl From<Option<f64>> for RawAngle<'_> {
    fn from(value: Option<f64>) -> Self {
        value.map_or(RawAngle::Missing, RawAngle::Number)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedAngle {
    Parsed(f64),
    Missing,
}

impl ParsedAngle {
    pub fn value(self) -> Option<f64> {
        match self {
            ParsedAngle::Parsed(v) => Some(v),
            ParsedAngle::Missing => None,
        }
    }

    /// The legacy catalog convention: anything unparsable reads as 0.0.
    pub fn value_or_zero(self) -> f64 {
        self.value().unwrap_or(0.0)
    }

    pub fn is_missing(self) -> bool {
        self == ParsedAngle::Missing
    }
}

fn finite(value: f64) -> ParsedAngle {
    if value.is_finite() {
        ParsedAngle::Parsed(value)
    } else {
        ParsedAngle::Missing
    }
}

/// Parses a decimal or sexagesimal angle ("D:M:S", "D:M", "D M S").
///
/// A decimal parse is attempted first; only on failure is the string split.
/// The sign belongs to the first token and applies to the whole magnitude,
/// so "-0:30:00" is -0.5.
pub fn parse_angle<'a>(raw: impl Into<RawAngle<'a>>) -> ParsedAngle {
    match raw.into() {
        RawAngle::Number(v) => finite(v),
        RawAngle::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return ParsedAngle::Missing;
            }
            match s.parse::<f64>() {
                Ok(v) => finite(v),
                Err(_) => parse_sexagesimal(s),
            }
        }
        RawAngle::Missing => ParsedAngle::Missing,
    }
}

fn parse_sexagesimal(s: &str) -> ParsedAngle {
    let tokens: Vec<&str> = if s.contains(':') {
        s.split(':').map(str::trim).collect()
    } else {
        s.split_whitespace().collect()
    };
    if !(2..=3).contains(&tokens.len()) {
        return ParsedAngle::Missing;
    }

    let (negative, head) = match tokens[0].strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, tokens[0].strip_prefix('+').unwrap_or(tokens[0])),
    };

    let mut magnitude = 0.0;
    let mut scale = 1.0;
    for token in std::iter::once(head).chain(tokens[1..].iter().copied()) {
        match token.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => magnitude += v / scale,
            _ => return ParsedAngle::Missing,
        }
        scale *= 60.0;
    }

    ParsedAngle::Parsed(if negative { -magnitude } else { magnitude })
}

/// `parse_angle` with the 0.0 fallback for missing values.
pub fn dms_to_degrees<'a>(raw: impl Into<RawAngle<'a>>) -> f64 {
    parse_angle(raw).value_or_zero()
}

/// Right ascension in hours. Colon or space delimited input is read as
/// H:M:S; a bare decimal is read as degrees and divided by 15.
pub fn hms_to_hours<'a>(raw: impl Into<RawAngle<'a>>) -> ParsedAngle {
    match raw.into() {
        RawAngle::Number(v) => finite(v / DEGREES_PER_HOUR),
        RawAngle::Text(s) => {
            let s = s.trim();
            match s.parse::<f64>() {
                Ok(v) => finite(v / DEGREES_PER_HOUR),
                Err(_) => parse_sexagesimal(s),
            }
        }
        RawAngle::Missing => ParsedAngle::Missing,
    }
}

fn format_sexagesimal(value: f64, lead_width: usize) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let centi = (value.abs() * ARCSEC_PER_DEGREE * 100.0).round() as i64;
    let lead = centi / 360_000;
    let minutes = (centi % 360_000) / 6_000;
    let seconds = (centi % 6_000) as f64 / 100.0;
    format!(
        "{}{:0lw$}:{:02}:{:05.2}",
        sign,
        lead,
        minutes,
        seconds,
        lw = lead_width
    )
}

/// Degrees as "D:MM:SS.ss".
pub fn format_dms(degrees: f64) -> String {
    format_sexagesimal(degrees, 1)
}

/// Hours as "HH:MM:SS.ss".
pub fn format_hms(hours: f64) -> String {
    format_sexagesimal(hours, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sexagesimal_rejects_signed_inner_tokens() {
        assert_eq!(parse_sexagesimal("10:-5:00"), ParsedAngle::Missing);
        assert_eq!(parse_sexagesimal("1:2:3:4"), ParsedAngle::Missing);
        assert_eq!(parse_sexagesimal("12"), ParsedAngle::Missing);
    }

    #[test]
    fn sexagesimal_accepts_explicit_plus() {
        assert_eq!(parse_sexagesimal("+45:30"), ParsedAngle::Parsed(45.5));
    }

    #[test]
    fn format_carries_rounded_seconds() {
        assert_eq!(format_dms(10.999_999_9), "11:00:00.00");
    }
}
