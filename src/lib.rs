pub mod cli;
pub mod detection;
pub mod geometry;
pub mod pipeline;
pub mod rectify;

pub use cli::Cli;
pub use detection::{find_candidates, MIN_AREA_FRACTION};
pub use geometry::{box_center, rotate_point, RotatedBox};
pub use pipeline::{process_scan, PipelineConfig, RunTotals, ScanOutcome};
pub use rectify::{rectify, RectifyError};
