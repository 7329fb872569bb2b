//! finder-rs: observation planning helpers for slit spectroscopy.
//!
//! The crate centers on an interactive finder chart: a star field rendered on
//! a pluggable plot surface, a toggled pick selection, and slit-alignment
//! guidance computed whenever two stars are selected. Catalog and calibration
//! script writers live under `extensions`.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{FinderChart, FinderChartConfig};
pub use error::{FinderError, FinderResult};
