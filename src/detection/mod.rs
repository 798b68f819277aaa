pub mod contours;
pub mod edges;
pub mod enhance;
pub mod order;
pub mod quad;
pub mod rectify;

use std::path::PathBuf;

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, RgbImage};
use tracing::{debug, info, instrument};

use crate::config::{ScanConfig, WorkingSize};
use crate::error::{Result, ScanError};
use crate::models::ScaleFactor;
use crate::pipeline::{PipelineContext, Stage, draw_detection};

pub use order::{OrderedQuad, order_points};
pub use quad::{Detection, QuadSelector};

/// Result of scanning one photo
#[derive(Debug, Clone)]
pub struct ScanOutput {
    pub detection: Detection,
    /// Working image to full resolution ratio
    pub scale: ScaleFactor,
    /// Rectified page, or the untouched photo when nothing was detected
    pub color: RgbImage,
    /// Sharpened, adaptively thresholded page
    pub binary: GrayImage,
}

impl ScanOutput {
    pub fn was_rectified(&self) -> bool {
        self.detection.quadrilateral().is_some()
    }
}

/// Runs edge detection, contour selection, rectification and binarization
/// on one photo at a time.
#[derive(Debug, Clone, Default)]
pub struct DocumentScanner {
    config: ScanConfig,
    context: PipelineContext,
}

impl DocumentScanner {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            context: PipelineContext::default(),
        }
    }

    /// Dump intermediate images under `output_dir`, which must be empty or
    /// missing.
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        self.context = self.context.with_debug(output_dir)?;
        Ok(self)
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Downscale to the configured working size.
    pub fn working_image(&self, image: &DynamicImage) -> (DynamicImage, ScaleFactor) {
        let (width, height) = (image.width(), image.height());
        let (new_w, new_h, scale) = match self.config.working_size {
            WorkingSize::Width(target) => {
                let new_h = (height as f64 * target as f64 / width as f64) as u32;
                (target, new_h.max(1), ScaleFactor::between(width, target))
            }
            WorkingSize::Height(target) => {
                let new_w = (width as f64 * target as f64 / height as f64) as u32;
                (new_w.max(1), target, ScaleFactor::between(height, target))
            }
        };

        if (new_w, new_h) == (width, height) {
            return (image.clone(), scale);
        }
        (image.resize_exact(new_w, new_h, FilterType::Triangle), scale)
    }

    /// Find the document boundary in an already downscaled image.
    pub fn detect(&self, working: &DynamicImage) -> Result<Detection> {
        self.config.validate()?;
        self.detect_labeled(working, "image")
    }

    fn detect_labeled(&self, working: &DynamicImage, label: &str) -> Result<Detection> {
        let edges = edges::build_edge_map(working, &self.config);
        self.context
            .save_stage(Stage::EdgeMap, label, &DynamicImage::ImageLuma8(edges.clone()))?;

        let candidates = contours::find_document_contours(&edges, self.config.max_candidates);
        debug!(candidates = candidates.len(), "Contours ranked");

        let detection = QuadSelector::from_config(&self.config).select(
            &candidates,
            working.width(),
            working.height(),
        );

        if self.context.debug_enabled() {
            let overlay = draw_detection(working, &candidates, &detection);
            self.context
                .save_stage(Stage::Contours, label, &DynamicImage::ImageRgb8(overlay))?;
        }
        Ok(detection)
    }

    /// Scan one photo.
    pub fn scan(&self, image: &DynamicImage) -> Result<ScanOutput> {
        self.scan_labeled(image, "image")
    }

    /// Scan one photo, naming debug dumps after `label`.
    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn scan_labeled(&self, image: &DynamicImage, label: &str) -> Result<ScanOutput> {
        self.config.validate()?;
        if image.width() == 0 || image.height() == 0 {
            return Err(ScanError::EmptyImage {
                width: image.width(),
                height: image.height(),
            });
        }
        self.context.save_stage(Stage::Input, label, image)?;

        let (working, scale) = self.working_image(image);
        let detection = self.detect_labeled(&working, label)?;

        let color = match detection {
            Detection::Detected(quad) => {
                let ordered = order_points(&quad.scaled(scale));
                info!(
                    top_left = ?ordered.top_left,
                    bottom_right = ?ordered.bottom_right,
                    "Rectifying document"
                );
                rectify::rectify(&image.to_rgb8(), &ordered)?
            }
            Detection::FullFrame(quad) => {
                let ordered = order_points(&quad.scaled(scale));
                let (width, height) = rectify::output_size(&ordered);
                if width < 2 || height < 2 {
                    info!(width, height, "Frame too small to warp; passing the photo through");
                    image.to_rgb8()
                } else {
                    info!("No document contour detected; rectifying the full frame");
                    rectify::rectify(&image.to_rgb8(), &ordered)?
                }
            }
            Detection::NotDetected => {
                info!("No document contour detected; passing the photo through");
                image.to_rgb8()
            }
        };

        let page = DynamicImage::ImageRgb8(color);
        self.context.save_stage(Stage::Rectified, label, &page)?;

        let binary = enhance::binarize(&page, &self.config);
        self.context
            .save_stage(Stage::Binarized, label, &DynamicImage::ImageLuma8(binary.clone()))?;

        Ok(ScanOutput {
            detection,
            scale,
            color: page.into_rgb8(),
            binary,
        })
    }
}
