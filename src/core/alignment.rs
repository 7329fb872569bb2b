use serde::{Deserialize, Serialize};

use crate::core::sky::{SkyPosition, UNDEFINED, normalize_degrees, wrap_degrees_signed};

/// Slit-alignment geometry for an ordered pair of stars `(A, B)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentResult {
    pub midpoint: SkyPosition,
    /// Direction from A to B, measured from north through east, in degrees.
    pub position_angle_deg: Option<f64>,
    /// Instrument rotation that puts both stars in the slit: `position_angle - 90`.
    pub rotation_angle_deg: Option<f64>,
}

impl AlignmentResult {
    /// Position angle mapped onto `[0, 360)`.
    #[must_use]
    pub fn position_angle_normalized_deg(&self) -> Option<f64> {
        self.position_angle_deg.map(normalize_degrees)
    }

    /// Rotation angle mapped onto `[0, 360)`.
    #[must_use]
    pub fn rotation_angle_normalized_deg(&self) -> Option<f64> {
        self.rotation_angle_deg.map(normalize_degrees)
    }

    /// Rotator keywords ready to paste into a control command.
    #[must_use]
    pub fn rotation_keywords(&self) -> String {
        match self.rotation_angle_deg {
            Some(rotation) => format!("RotType=Object; RotAng={rotation:.2}"),
            None => format!("RotType=Object; RotAng={UNDEFINED}"),
        }
    }
}

/// Computes position angle, slit rotation and midpoint for stars `a` then `b`.
///
/// The RA difference is scaled by the cosine of the mean declination (flat-sky
/// approximation across the finder field) and taken the short way round, so a
/// pair straddling RA 0h stays adjacent. Pair order matters: swapping the
/// stars turns the position angle by 180 degrees.
#[must_use]
pub fn compute_alignment(a: SkyPosition, b: SkyPosition) -> AlignmentResult {
    let midpoint = SkyPosition::from_parts(
        mean_ra(a.ra_deg, b.ra_deg),
        mean(a.dec_deg, b.dec_deg),
    );

    let position_angle_deg = match (a.coordinates(), b.coordinates()) {
        (Some((ra_a, dec_a)), Some((ra_b, dec_b))) => {
            let mean_dec = (0.5 * (dec_a + dec_b)).to_radians();
            let delta_ra = wrap_degrees_signed(ra_b - ra_a) * mean_dec.cos();
            let delta_dec = dec_b - dec_a;
            let angle = delta_dec.atan2(delta_ra).to_degrees();
            Some(90.0 - angle)
        }
        _ => None,
    };

    AlignmentResult {
        midpoint,
        position_angle_deg,
        rotation_angle_deg: position_angle_deg.map(|pa| pa - 90.0),
    }
}

fn mean(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some(0.5 * (a? + b?))
}

// symmetric in its arguments, so swapping the pair keeps the exact midpoint
fn mean_ra(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    let (a, b) = (normalize_degrees(a?), normalize_degrees(b?));
    let mean = 0.5 * (a + b);
    Some(normalize_degrees(if (b - a).abs() > 180.0 {
        mean + 180.0
    } else {
        mean
    }))
}

#[cfg(test)]
mod tests {
    use super::compute_alignment;
    use crate::core::sky::SkyPosition;

    #[test]
    fn masked_coordinate_only_masks_what_depends_on_it() {
        let a = SkyPosition::from_parts(Some(10.0), None);
        let b = SkyPosition::new(12.0, 1.0);
        let result = compute_alignment(a, b);
        assert_eq!(result.midpoint.ra_deg, Some(11.0));
        assert_eq!(result.midpoint.dec_deg, None);
        assert_eq!(result.position_angle_deg, None);
        assert_eq!(result.rotation_keywords(), "RotType=Object; RotAng=undefined");
    }

    #[test]
    fn midpoint_right_ascension_takes_the_short_arc() {
        let result = compute_alignment(SkyPosition::new(350.0, 0.0), SkyPosition::new(20.0, 0.0));
        assert_eq!(result.midpoint.ra_deg, Some(5.0));
        let result = compute_alignment(SkyPosition::new(-10.0, 0.0), SkyPosition::new(10.0, 0.0));
        assert_eq!(result.midpoint.ra_deg, Some(0.0));
    }

    #[test]
    fn rotation_keywords_use_two_decimals() {
        let result = compute_alignment(SkyPosition::new(10.0, 0.0), SkyPosition::new(10.0, 1.0));
        assert_eq!(result.rotation_keywords(), "RotType=Object; RotAng=-90.00");
    }
}
