use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{AlignmentResult, Band, PointIndex, StarRow};

/// Alignment of the first two picked stars, in pick order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentReport {
    pub first: PointIndex,
    pub second: PointIndex,
    pub result: AlignmentResult,
}

impl AlignmentReport {
    /// Slew command that centers the pair and rotates the slit through both.
    #[must_use]
    pub fn command(&self) -> String {
        format!(
            "center-of-two-stars {} {}",
            self.result.midpoint.to_hmsdms(1),
            self.result.rotation_keywords()
        )
    }
}

impl fmt::Display for AlignmentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "To align stars [{}] and [{}] on a KOSMOS slit, try:",
            self.first, self.second
        )?;
        write!(f, "{}", self.command())
    }
}

/// One summary line for a selected star: index, G magnitude, `BP - RP` color.
#[must_use]
pub fn selection_summary_line(index: PointIndex, row: &StarRow) -> String {
    format!(
        "{:>8}, G={}, Bp-Rp={}",
        format!("[{index}]"),
        format_magnitude(row.magnitude(Band::GGaia)),
        format_magnitude(row.bp_minus_rp())
    )
}

fn format_magnitude(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.2}"),
        None => "--".to_owned(),
    }
}
