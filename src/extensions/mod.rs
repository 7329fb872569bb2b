//! Observation-planning tools that sit beside the finder chart.
//!
//! Nothing here is needed by the interactive core.

pub mod catalog;
pub mod scripts;

pub use catalog::{CatalogEntry, TuiCatalog};
pub use scripts::{
    Disperser, Lamp, REFERENCE_SLIT_WIDTH_ARCSEC, ScriptWriter, ScriptWriterConfig,
    guess_slit_width,
};
