use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::sky::SkyPosition;
use crate::error::{FinderError, FinderResult};

/// Photometric band of a catalog magnitude column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    #[serde(rename = "G_gaia")]
    GGaia,
    #[serde(rename = "BP_gaia")]
    BpGaia,
    #[serde(rename = "RP_gaia")]
    RpGaia,
    #[serde(rename = "g_sloan")]
    GSloan,
    #[serde(rename = "r_sloan")]
    RSloan,
    #[serde(rename = "i_sloan")]
    ISloan,
    #[serde(rename = "V_johnsoncousins")]
    VJohnsonCousins,
    #[serde(rename = "R_johnsoncousins")]
    RJohnsonCousins,
    #[serde(rename = "I_johnsoncousins")]
    IJohnsonCousins,
}

impl Band {
    pub const ALL: [Band; 9] = [
        Band::GGaia,
        Band::BpGaia,
        Band::RpGaia,
        Band::GSloan,
        Band::RSloan,
        Band::ISloan,
        Band::VJohnsonCousins,
        Band::RJohnsonCousins,
        Band::IJohnsonCousins,
    ];

    /// Column-style name, e.g. `G_gaia`.
    #[must_use]
    pub const fn column_name(self) -> &'static str {
        match self {
            Band::GGaia => "G_gaia",
            Band::BpGaia => "BP_gaia",
            Band::RpGaia => "RP_gaia",
            Band::GSloan => "g_sloan",
            Band::RSloan => "r_sloan",
            Band::ISloan => "i_sloan",
            Band::VJohnsonCousins => "V_johnsoncousins",
            Band::RJohnsonCousins => "R_johnsoncousins",
            Band::IJohnsonCousins => "I_johnsoncousins",
        }
    }

    /// Short label used on the chart, e.g. `G`.
    #[must_use]
    pub fn label(self) -> &'static str {
        let name = self.column_name();
        name.split('_').next().unwrap_or(name)
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for Band {
    type Err = FinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().trim_end_matches("_mag");
        Band::ALL
            .into_iter()
            .find(|band| band.column_name() == wanted)
            .ok_or_else(|| FinderError::InvalidData(format!("unknown photometric band `{s}`")))
    }
}

/// One star of the finder field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarRow {
    pub id: String,
    pub position: SkyPosition,
    #[serde(default)]
    pub magnitudes: IndexMap<Band, f64>,
}

impl StarRow {
    #[must_use]
    pub fn new(id: impl Into<String>, position: SkyPosition) -> Self {
        Self {
            id: id.into(),
            position,
            magnitudes: IndexMap::new(),
        }
    }

    /// Adds a magnitude; non-finite values are treated as masked and dropped.
    #[must_use]
    pub fn with_magnitude(mut self, band: Band, magnitude: f64) -> Self {
        if magnitude.is_finite() {
            self.magnitudes.insert(band, magnitude);
        }
        self
    }

    #[must_use]
    pub fn magnitude(&self, band: Band) -> Option<f64> {
        self.magnitudes.get(&band).copied()
    }

    /// Gaia `BP - RP` color index.
    #[must_use]
    pub fn bp_minus_rp(&self) -> Option<f64> {
        Some(self.magnitude(Band::BpGaia)? - self.magnitude(Band::RpGaia)?)
    }
}

/// Stars around a field center, in catalog order.
///
/// Row order defines each star's `PointIndex` on the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarTable {
    rows: Vec<StarRow>,
    center: SkyPosition,
    radius_deg: f64,
}

impl StarTable {
    pub fn new(rows: Vec<StarRow>, center: SkyPosition, radius_deg: f64) -> FinderResult<Self> {
        if !center.is_defined() {
            return Err(FinderError::InvalidData(
                "field center must have both coordinates".to_owned(),
            ));
        }
        if !radius_deg.is_finite() || radius_deg <= 0.0 {
            return Err(FinderError::InvalidData(
                "field radius must be finite and > 0".to_owned(),
            ));
        }
        Ok(Self {
            rows,
            center,
            radius_deg,
        })
    }

    #[must_use]
    pub fn rows(&self) -> &[StarRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> FinderResult<&StarRow> {
        self.rows.get(index).ok_or(FinderError::UnknownPointIndex {
            index,
            len: self.rows.len(),
        })
    }

    #[must_use]
    pub fn center(&self) -> SkyPosition {
        self.center
    }

    #[must_use]
    pub fn radius_deg(&self) -> f64 {
        self.radius_deg
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Band, SkyPosition, StarRow, StarTable};

    #[test]
    fn band_parses_column_names_with_or_without_suffix() {
        assert_eq!("G_gaia".parse::<Band>().expect("band"), Band::GGaia);
        assert_eq!("r_sloan_mag".parse::<Band>().expect("band"), Band::RSloan);
        assert!("Z_nowhere".parse::<Band>().is_err());
        assert_eq!(Band::VJohnsonCousins.label(), "V");
    }

    #[test]
    fn color_index_requires_both_gaia_bands() {
        let row = StarRow::new("a", SkyPosition::new(1.0, 2.0))
            .with_magnitude(Band::BpGaia, 12.5)
            .with_magnitude(Band::RpGaia, 11.25);
        assert_eq!(row.bp_minus_rp(), Some(1.25));

        let partial = StarRow::new("b", SkyPosition::new(1.0, 2.0))
            .with_magnitude(Band::BpGaia, 12.5)
            .with_magnitude(Band::RpGaia, f64::NAN);
        assert_eq!(partial.bp_minus_rp(), None);
    }

    #[test]
    fn table_rejects_degenerate_field() {
        let err = StarTable::new(Vec::new(), SkyPosition::new(1.0, 1.0), 0.0)
            .expect_err("zero radius must fail");
        assert!(format!("{err}").contains("field radius"));
        assert!(StarTable::new(Vec::new(), SkyPosition::masked(), 0.1).is_err());
    }
}
