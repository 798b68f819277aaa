pub mod batch;
pub mod config;
pub mod detection;
pub mod error;
pub mod models;
pub mod pipeline;

pub use batch::{BatchConfig, BatchReport, OutputLayout, run_batch};
pub use config::{AcceptancePolicy, EdgeDilation, FallbackPolicy, FormatSet, ScanConfig, WorkingSize};
pub use detection::{Detection, DocumentScanner, OrderedQuad, ScanOutput, order_points};
pub use error::ScanError;
pub use models::{Contour, Point, Quadrilateral, ScaleFactor};
pub use pipeline::{DebugConfig, PipelineContext, Stage};
