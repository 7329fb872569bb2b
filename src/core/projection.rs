#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::sky::{SkyPosition, wrap_degrees_signed};
use crate::core::star_table::StarRow;
use crate::core::types::DataPoint;
use crate::error::{FinderError, FinderResult};

/// Angular unit of the chart's offset axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetUnit {
    Arcsec,
    Arcmin,
    Degree,
}

impl OffsetUnit {
    #[must_use]
    pub const fn per_degree(self) -> f64 {
        match self {
            OffsetUnit::Arcsec => 3600.0,
            OffsetUnit::Arcmin => 60.0,
            OffsetUnit::Degree => 1.0,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            OffsetUnit::Arcsec => "arcsec",
            OffsetUnit::Arcmin => "arcmin",
            OffsetUnit::Degree => "deg",
        }
    }

    #[must_use]
    pub fn from_degrees(self, degrees: f64) -> f64 {
        degrees * self.per_degree()
    }
}

/// Projects every row onto tangent-plane offsets from `center`, in `unit`.
///
/// East is `+x` (the chart flips the x axis so east appears on the left).
/// Rows with a masked coordinate yield `None` but keep their slot, so output
/// indices stay aligned with catalog indices.
pub fn project_offsets(
    rows: &[StarRow],
    center: SkyPosition,
    unit: OffsetUnit,
) -> FinderResult<Vec<Option<DataPoint>>> {
    let Some(center) = center.coordinates() else {
        return Err(FinderError::InvalidData(
            "projection center must have both coordinates".to_owned(),
        ));
    };

    #[cfg(feature = "parallel-projection")]
    {
        Ok(rows
            .par_iter()
            .map(|row| project_single_offset(row.position, center, unit))
            .collect())
    }

    #[cfg(not(feature = "parallel-projection"))]
    {
        Ok(rows
            .iter()
            .map(|row| project_single_offset(row.position, center, unit))
            .collect())
    }
}

fn project_single_offset(
    position: SkyPosition,
    (center_ra, center_dec): (f64, f64),
    unit: OffsetUnit,
) -> Option<DataPoint> {
    let (ra, dec) = position.coordinates()?;
    let delta_ra = wrap_degrees_signed(ra - center_ra) * dec.to_radians().cos();
    let delta_dec = dec - center_dec;
    Some(DataPoint::new(
        unit.from_degrees(delta_ra),
        unit.from_degrees(delta_dec),
    ))
}

/// Scatter marker area for a star: quadratic in how much brighter it is than
/// the faintest magnitude shown, reaching `size_of_zero_magnitude` at mag 0.
#[must_use]
pub fn marker_size(
    magnitude: Option<f64>,
    faintest_magnitude_to_show: f64,
    size_of_zero_magnitude: f64,
) -> f64 {
    let Some(magnitude) = magnitude.filter(|value| value.is_finite()) else {
        return 0.0;
    };
    let normalization = size_of_zero_magnitude / faintest_magnitude_to_show.powi(2);
    (faintest_magnitude_to_show - magnitude).max(0.0).powi(2) * normalization
}
