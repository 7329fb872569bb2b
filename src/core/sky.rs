use serde::{Deserialize, Serialize};

use crate::error::{FinderError, FinderResult};

/// Text rendered in place of a masked coordinate or angle.
pub const UNDEFINED: &str = "undefined";

/// Right ascension and declination in degrees.
///
/// Each coordinate is optional: catalog rows may carry masked values, and
/// anything derived from a masked coordinate stays masked instead of turning
/// into a plausible-looking number.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SkyPosition {
    pub ra_deg: Option<f64>,
    pub dec_deg: Option<f64>,
}

impl SkyPosition {
    /// Builds a position; non-finite inputs are stored as masked.
    #[must_use]
    pub fn new(ra_deg: f64, dec_deg: f64) -> Self {
        Self::from_parts(Some(ra_deg), Some(dec_deg))
    }

    #[must_use]
    pub fn from_parts(ra_deg: Option<f64>, dec_deg: Option<f64>) -> Self {
        Self {
            ra_deg: ra_deg.filter(|value| value.is_finite()),
            dec_deg: dec_deg.filter(|value| value.is_finite()),
        }
    }

    #[must_use]
    pub const fn masked() -> Self {
        Self {
            ra_deg: None,
            dec_deg: None,
        }
    }

    #[must_use]
    pub fn is_defined(self) -> bool {
        self.ra_deg.is_some() && self.dec_deg.is_some()
    }

    /// Both coordinates, or `None` when either one is masked.
    #[must_use]
    pub fn coordinates(self) -> Option<(f64, f64)> {
        Some((self.ra_deg?, self.dec_deg?))
    }

    /// Formats as `hh:mm:ss.s ±dd:mm:ss.s` with `precision` fractional second digits.
    #[must_use]
    pub fn to_hmsdms(self, precision: usize) -> String {
        format!(
            "{} {}",
            format_ra_hms(self.ra_deg, precision),
            format_dec_dms(self.dec_deg, precision)
        )
    }

    /// Parses sexagesimal `hh:mm:ss` right ascension and `±dd:mm:ss` declination.
    pub fn parse_hmsdms(ra: &str, dec: &str) -> FinderResult<Self> {
        Ok(Self::new(parse_ra_hms(ra)?, parse_dec_dms(dec)?))
    }
}

/// Maps any angle in degrees onto `[0, 360)`.
#[must_use]
pub fn normalize_degrees(angle_deg: f64) -> f64 {
    let wrapped = angle_deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Maps any angle in degrees onto `[-180, 180)`.
#[must_use]
pub fn wrap_degrees_signed(angle_deg: f64) -> f64 {
    normalize_degrees(angle_deg + 180.0) - 180.0
}

#[must_use]
pub fn format_ra_hms(ra_deg: Option<f64>, precision: usize) -> String {
    let Some(ra_deg) = ra_deg.filter(|value| value.is_finite()) else {
        return UNDEFINED.to_owned();
    };
    let hours = normalize_degrees(ra_deg) / 15.0;
    let (whole, minutes, seconds) = split_sexagesimal(hours, precision);
    format!(
        "{:02}:{:02}:{}",
        whole % 24,
        minutes,
        format_seconds(seconds, precision)
    )
}

#[must_use]
pub fn format_dec_dms(dec_deg: Option<f64>, precision: usize) -> String {
    let Some(dec_deg) = dec_deg.filter(|value| value.is_finite()) else {
        return UNDEFINED.to_owned();
    };
    let (whole, minutes, seconds) = split_sexagesimal(dec_deg.abs(), precision);
    let is_zero = whole == 0 && minutes == 0 && seconds == 0.0;
    let sign = if dec_deg < 0.0 && !is_zero { '-' } else { '+' };
    format!(
        "{sign}{:02}:{:02}:{}",
        whole,
        minutes,
        format_seconds(seconds, precision)
    )
}

/// Splits a non-negative value into whole units, minutes and seconds after
/// rounding to the requested number of fractional second digits, so carries
/// never produce a `60` field.
fn split_sexagesimal(value: f64, precision: usize) -> (u64, u64, f64) {
    let scale = 10f64.powi(precision as i32);
    let ticks_per_minute = 60.0 * scale;
    let ticks_per_unit = 60.0 * ticks_per_minute;

    let total = (value * 3600.0 * scale).round();
    let whole = (total / ticks_per_unit).floor();
    let remainder = total - whole * ticks_per_unit;
    let minutes = (remainder / ticks_per_minute).floor();
    let seconds = (remainder - minutes * ticks_per_minute) / scale;

    (whole as u64, minutes as u64, seconds)
}

fn format_seconds(seconds: f64, precision: usize) -> String {
    if precision == 0 {
        format!("{seconds:02.0}")
    } else {
        let width = precision + 3;
        format!("{seconds:0width$.precision$}")
    }
}

/// Parses `hh:mm:ss.s` (or decimal hours) into degrees.
pub fn parse_ra_hms(text: &str) -> FinderResult<f64> {
    let hours = parse_sexagesimal(text)?;
    if !(0.0..24.0).contains(&hours) {
        return Err(FinderError::InvalidData(format!(
            "right ascension `{text}` must be within [0h, 24h)"
        )));
    }
    Ok(hours * 15.0)
}

/// Parses `±dd:mm:ss.s` (or decimal degrees) into degrees.
pub fn parse_dec_dms(text: &str) -> FinderResult<f64> {
    let degrees = parse_sexagesimal(text)?;
    if !(-90.0..=90.0).contains(&degrees) {
        return Err(FinderError::InvalidData(format!(
            "declination `{text}` must be within [-90, 90] degrees"
        )));
    }
    Ok(degrees)
}

fn parse_sexagesimal(text: &str) -> FinderResult<f64> {
    let trimmed = text.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let fields: Vec<&str> = unsigned.split(':').collect();
    if fields.is_empty() || fields.len() > 3 || fields.iter().any(|field| field.is_empty()) {
        return Err(FinderError::InvalidData(format!(
            "`{text}` is not a sexagesimal value"
        )));
    }

    let mut value = 0.0;
    let mut divisor = 1.0;
    for (position, field) in fields.iter().enumerate() {
        let parsed: f64 = field.parse().map_err(|_| {
            FinderError::InvalidData(format!("`{text}` is not a sexagesimal value"))
        })?;
        if !parsed.is_finite() || parsed < 0.0 || (position > 0 && parsed >= 60.0) {
            return Err(FinderError::InvalidData(format!(
                "`{text}` has an out-of-range sexagesimal field"
            )));
        }
        value += parsed / divisor;
        divisor *= 60.0;
    }

    Ok(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::{
        SkyPosition, format_dec_dms, format_ra_hms, normalize_degrees, parse_dec_dms,
        parse_ra_hms, wrap_degrees_signed,
    };

    #[test]
    fn hmsdms_matches_control_command_layout() {
        let position = SkyPosition::new(150.0, 0.5);
        assert_eq!(position.to_hmsdms(1), "10:00:00.0 +00:30:00.0");
    }

    #[test]
    fn rounding_carries_into_minutes_and_hours() {
        // 59.96 seconds of time rounds up to the next minute at one digit
        let ra_deg = (59.96 / 3600.0) * 15.0;
        assert_eq!(format_ra_hms(Some(ra_deg), 1), "00:01:00.0");
        assert_eq!(format_ra_hms(Some(359.999_999_9), 1), "00:00:00.0");
    }

    #[test]
    fn negative_declination_keeps_sign_and_zero_is_positive() {
        assert_eq!(format_dec_dms(Some(-1.0), 1), "-01:00:00.0");
        assert_eq!(format_dec_dms(Some(-0.000_001), 1), "+00:00:00.0");
    }

    #[test]
    fn masked_coordinates_render_as_undefined() {
        let position = SkyPosition::from_parts(Some(10.0), None);
        assert_eq!(position.to_hmsdms(1), "00:40:00.0 undefined");
        assert!(!position.is_defined());
        assert!(SkyPosition::new(f64::NAN, 1.0).ra_deg.is_none());
    }

    #[test]
    fn parses_signed_sexagesimal_fields() {
        let ra = parse_ra_hms("01:30:00.0").expect("ra");
        let dec = parse_dec_dms("-00:30:00").expect("dec");
        assert!((ra - 22.5).abs() <= 1e-9);
        assert!((dec + 0.5).abs() <= 1e-9);
    }

    #[test]
    fn rejects_out_of_range_fields() {
        let err = parse_ra_hms("01:75:00").expect_err("minutes must fail");
        assert!(format!("{err}").contains("out-of-range"));
        assert!(parse_dec_dms("+91:00:00").is_err());
        assert!(parse_ra_hms("ten").is_err());
    }

    #[test]
    fn degree_wrapping_helpers() {
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(wrap_degrees_signed(350.0), -10.0);
        assert_eq!(wrap_degrees_signed(-190.0), 170.0);
    }
}
