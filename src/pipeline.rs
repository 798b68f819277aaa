use std::path::PathBuf;

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

use crate::detection::Detection;
use crate::error::{Result, ScanError};
use crate::models::{Contour, Point};

/// Intermediate images that can be dumped in debug mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Input,
    EdgeMap,
    Contours,
    Rectified,
    Binarized,
}

impl Stage {
    /// Human-readable name for this stage
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Input => "Input",
            Stage::EdgeMap => "Edge Map",
            Stage::Contours => "Contours",
            Stage::Rectified => "Rectified",
            Stage::Binarized => "Binarized",
        }
    }

    fn index(&self) -> usize {
        match self {
            Stage::Input => 0,
            Stage::EdgeMap => 1,
            Stage::Contours => 2,
            Stage::Rectified => 3,
            Stage::Binarized => 4,
        }
    }

    /// Directory name, e.g. "01_edge_map"
    pub fn dir_name(&self) -> String {
        format!(
            "{:02}_{}",
            self.index(),
            self.name().to_lowercase().replace(' ', "_")
        )
    }
}

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
    /// Whether debug mode is enabled
    pub enabled: bool,
}

/// Context shared by every stage of a scan
#[derive(Clone, Debug, Default)]
pub struct PipelineContext {
    pub debug: Option<DebugConfig>,
}

impl PipelineContext {
    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let mut entries =
                std::fs::read_dir(&output_dir).map_err(|e| ScanError::io(&output_dir, e))?;
            if entries.next().is_some() {
                return Err(ScanError::Config(format!(
                    "debug directory is not empty: {}",
                    output_dir.display()
                )));
            }
        } else {
            std::fs::create_dir_all(&output_dir).map_err(|e| ScanError::io(&output_dir, e))?;
        }

        self.debug = Some(DebugConfig {
            output_dir,
            enabled: true,
        });
        Ok(self)
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug.as_ref().is_some_and(|d| d.enabled)
    }

    /// Save `image` as `<stage dir>/<label>.png` if debug mode is enabled
    pub fn save_stage(&self, stage: Stage, label: &str, image: &DynamicImage) -> Result<()> {
        let Some(debug_config) = self.debug.as_ref().filter(|d| d.enabled) else {
            return Ok(());
        };

        let step_dir = debug_config.output_dir.join(stage.dir_name());
        std::fs::create_dir_all(&step_dir).map_err(|e| ScanError::io(&step_dir, e))?;

        let output_path = step_dir.join(format!("{label}.png"));
        image.save(&output_path).map_err(|source| ScanError::Write {
            path: output_path.clone(),
            source,
        })?;

        tracing::debug!(path = %output_path.display(), stage = stage.name(), "Saved debug image");
        Ok(())
    }
}

/// Candidate contours in green, the chosen quadrilateral in red.
pub fn draw_detection(working: &DynamicImage, contours: &[Contour], detection: &Detection) -> RgbImage {
    let mut canvas = working.to_rgb8();
    for contour in contours {
        draw_closed(&mut canvas, contour.points(), Rgb([0, 200, 0]));
    }
    if let Some(quad) = detection.quadrilateral() {
        draw_closed(&mut canvas, &quad.points, Rgb([255, 0, 0]));
    }
    canvas
}

fn draw_closed(canvas: &mut RgbImage, points: &[Point], color: Rgb<u8>) {
    for (i, start) in points.iter().enumerate() {
        let end = points[(i + 1) % points.len()];
        draw_line_segment_mut(canvas, (start.x, start.y), (end.x, end.y), color);
    }
}
