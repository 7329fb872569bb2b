mod finder_chart;
mod finder_config;
mod guidance;

pub use finder_chart::{FinderChart, InteractionEnd};
pub use finder_config::FinderChartConfig;
pub use guidance::{AlignmentReport, selection_summary_line};
