// Each test binary uses a different subset of these helpers.
#![allow(dead_code, unused_imports)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from docscan for tests
pub use docscan::{
    BatchConfig, BatchReport, Detection, DocumentScanner, FallbackPolicy, FormatSet,
    OutputLayout, Point, Quadrilateral, ScanConfig, ScanError, order_points, run_batch,
};
