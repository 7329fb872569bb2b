pub mod alignment;
pub mod projection;
pub mod sky;
pub mod star_table;
pub mod types;

pub use alignment::{AlignmentResult, compute_alignment};
pub use projection::{OffsetUnit, marker_size, project_offsets};
pub use sky::{
    SkyPosition, UNDEFINED, format_dec_dms, format_ra_hms, normalize_degrees, parse_dec_dms,
    parse_ra_hms, wrap_degrees_signed,
};
pub use star_table::{Band, StarRow, StarTable};
pub use types::{DataPoint, PointIndex};
