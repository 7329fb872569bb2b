use std::collections::HashSet;
use std::fs;
use std::ops::Add;
use std::path::{Path, PathBuf};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::SkyPosition;
use crate::error::{FinderError, FinderResult};

const PARALLACTIC_PREAMBLE: &str = "CSys=ICRS; RotType=Horizon; RotAng=90";
const OBJECT_PREAMBLE: &str = "CSys=ICRS; RotType=Object; RotAng=0";

/// One target of a telescope user catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub position: SkyPosition,
    /// Observing program the target belongs to.
    pub category: String,
    pub distance_pc: Option<f64>,
    pub g_mag: Option<f64>,
}

impl CatalogEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, position: SkyPosition, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position,
            category: category.into(),
            distance_pc: None,
            g_mag: None,
        }
    }

    #[must_use]
    pub fn with_distance_pc(mut self, distance_pc: f64) -> Self {
        self.distance_pc = Some(distance_pc).filter(|value| value.is_finite());
        self
    }

    #[must_use]
    pub fn with_g_mag(mut self, g_mag: f64) -> Self {
        self.g_mag = Some(g_mag).filter(|value| value.is_finite());
        self
    }

    fn three_columns(&self) -> String {
        format!(
            "{:<20} {}",
            self.name.replace(' ', ""),
            self.position.to_hmsdms(1)
        )
    }

    fn human_columns(&self) -> String {
        format!(
            "{}, d={}pc, G={}",
            self.category,
            format_optional(self.distance_pc, 1),
            format_optional(self.g_mag, 2)
        )
    }
}

/// Named target list that reads and writes the TUI user-catalog text format.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TuiCatalog {
    name: String,
    entries: Vec<CatalogEntry>,
}

impl TuiCatalog {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Builds a catalog, optionally dropping repeated names (first one wins)
    /// and sorting by right ascension.
    #[must_use]
    pub fn from_entries(
        name: impl Into<String>,
        entries: Vec<CatalogEntry>,
        remove_duplicates: bool,
        sort: bool,
    ) -> Self {
        let mut catalog = Self {
            name: name.into(),
            entries,
        };
        if remove_duplicates {
            catalog.remove_duplicates();
        }
        if sort {
            catalog.sort_by_ra();
        }
        catalog
    }

    /// Parses TUI catalog text; every target is tagged with the catalog name.
    ///
    /// Blank lines, `#` comments and keyword-only lines (such as the
    /// `CSys=...` preamble) are skipped. Words after the declination are
    /// treated as per-target keywords and ignored.
    pub fn parse_tui(name: impl Into<String>, text: &str) -> FinderResult<Self> {
        let name = name.into();
        let mut entries = Vec::new();

        for (offset, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split_whitespace();
            let Some(target) = fields.next() else {
                continue;
            };
            if target.contains('=') {
                continue;
            }
            let parse_error = |message: String| FinderError::Parse {
                line: offset + 1,
                message,
            };
            let (Some(ra), Some(dec)) = (fields.next(), fields.next()) else {
                return Err(parse_error(format!(
                    "expected `name ra dec`, found `{line}`"
                )));
            };
            let position =
                SkyPosition::parse_hmsdms(ra, dec).map_err(|err| parse_error(err.to_string()))?;
            entries.push(CatalogEntry::new(target, position, name.clone()));
        }

        debug!(catalog = %name, targets = entries.len(), "parsed TUI catalog");
        Ok(Self::from_entries(name, entries, true, true))
    }

    pub fn read_tui(name: impl Into<String>, path: impl AsRef<Path>) -> FinderResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse_tui(name, &text)
    }

    pub fn remove_duplicates(&mut self) {
        let mut seen = HashSet::with_capacity(self.entries.len());
        let before = self.entries.len();
        self.entries.retain(|entry| seen.insert(entry.name.clone()));
        if self.entries.len() != before {
            debug!(
                catalog = %self.name,
                removed = before - self.entries.len(),
                "dropped duplicate targets"
            );
        }
    }

    /// Stable sort by right ascension; targets with masked RA go last.
    pub fn sort_by_ra(&mut self) {
        self.entries.sort_by_key(|entry| match entry.position.ra_deg {
            Some(ra) => (false, OrderedFloat(ra)),
            None => (true, OrderedFloat(0.0)),
        });
    }

    /// Concatenates both catalogs into `"{self}+{other}"`, re-sorted by RA.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let mut entries = self.entries.clone();
        entries.extend(other.entries.iter().cloned());
        Self::from_entries(format!("{}+{}", self.name, other.name), entries, false, true)
    }

    /// Renders the TUI text: rotation preamble, then one target per line.
    ///
    /// With `parallactic` the slit follows the parallactic angle, which keeps
    /// differential refraction along the slit.
    #[must_use]
    pub fn to_tui_string(&self, parallactic: bool) -> String {
        let preamble = if parallactic {
            PARALLACTIC_PREAMBLE
        } else {
            OBJECT_PREAMBLE
        };
        let mut text = format!("{preamble}\n\n\n");
        for entry in &self.entries {
            text.push_str(&entry.three_columns());
            text.push_str("   \n");
        }
        text
    }

    /// Renders the TUI columns plus category, distance and G magnitude.
    #[must_use]
    pub fn to_human_string(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("{}   {}\n", entry.three_columns(), entry.human_columns()))
            .collect()
    }

    /// Writes `{name}.tui` into `dir` and returns its path.
    pub fn write_tui(&self, dir: impl AsRef<Path>, parallactic: bool) -> FinderResult<PathBuf> {
        let path = dir.as_ref().join(format!("{}.tui", self.name));
        fs::write(&path, self.to_tui_string(parallactic))?;
        info!(
            targets = self.entries.len(),
            path = %path.display(),
            "TUI catalog saved"
        );
        Ok(path)
    }

    /// Writes `{name}.txt` into `dir` and returns its path.
    pub fn write_human_friendly(&self, dir: impl AsRef<Path>) -> FinderResult<PathBuf> {
        let path = dir.as_ref().join(format!("{}.txt", self.name));
        fs::write(&path, self.to_human_string())?;
        info!(
            targets = self.entries.len(),
            path = %path.display(),
            "human-friendly catalog saved"
        );
        Ok(path)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Add for &TuiCatalog {
    type Output = TuiCatalog;

    fn add(self, other: Self) -> TuiCatalog {
        self.merge(other)
    }
}

impl Add for TuiCatalog {
    type Output = TuiCatalog;

    fn add(self, other: Self) -> TuiCatalog {
        self.merge(&other)
    }
}

fn format_optional(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(value) => format!("{value:.precision$}"),
        None => "--".to_owned(),
    }
}
