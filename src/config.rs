use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

/// Size the photo is downscaled to before boundary detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkingSize {
    /// Scale so the working image is this many pixels wide.
    Width(u32),
    /// Scale so the working image is this many pixels tall.
    Height(u32),
}

/// How broken edge segments are thickened after Canny.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeDilation {
    /// Square kernel of side `2 * radius + 1`.
    Square { radius: u8 },
    /// 1 px wide kernel, one hundredth of the image height tall.
    Vertical,
}

/// Which approximated polygons may count as a document boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AcceptancePolicy {
    /// Only polygons that simplify to exactly four vertices.
    #[default]
    FourVertices,
    /// Any polygon with at least four vertices; its corners are the
    /// coordinate sum/difference extremes.
    AnyPolygon,
}

/// What to do when no contour passes the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackPolicy {
    /// Skip rectification and binarize the original photo.
    #[default]
    PassThrough,
    /// Treat the whole frame as the document.
    FullImage,
}

/// Input file extensions accepted by the batch runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FormatSet {
    /// jpg, jpeg, png, bmp, tif, tiff
    #[default]
    Extended,
    /// jpg, jpeg, png
    Common,
}

impl FormatSet {
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            FormatSet::Extended => &["jpg", "jpeg", "png", "bmp", "tif", "tiff"],
            FormatSet::Common => &["jpg", "jpeg", "png"],
        }
    }

    /// Case-insensitive extension check.
    pub fn matches(self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions().contains(&ext.as_str())
            })
            .unwrap_or(false)
    }
}

/// Thresholds and kernel sizes for the whole scan pipeline.
///
/// `Default` holds the stock tuning. A JSON file may override any subset of
/// fields, see [`ScanConfig::from_json_file`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    pub working_size: WorkingSize,

    /// Side of the Gaussian kernel used before edge detection (odd).
    pub blur_kernel: u32,
    /// Side of the square structuring element for the closing (odd).
    pub close_kernel: u32,
    pub canny_low: f32,
    pub canny_high: f32,
    pub dilation: EdgeDilation,

    /// Number of largest contours considered.
    pub max_candidates: usize,
    /// Douglas-Peucker tolerance as a fraction of the contour perimeter.
    pub approx_epsilon_ratio: f64,
    /// Minimum polygon area as a fraction of the working image area.
    /// The comparison is exclusive.
    pub min_area_ratio: f64,
    pub acceptance: AcceptancePolicy,
    pub fallback: FallbackPolicy,

    pub sharpen_sigma: f32,
    /// Weight of the blurred image subtracted by the unsharp mask.
    pub sharpen_amount: f32,
    /// Adaptive threshold window side (odd).
    pub threshold_window: u32,
    /// Constant subtracted from the local Gaussian mean.
    pub threshold_offset: i32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            working_size: WorkingSize::Width(500),
            blur_kernel: 5,
            close_kernel: 9,
            canny_low: 35.0,
            canny_high: 150.0,
            dilation: EdgeDilation::Square { radius: 1 },
            max_candidates: 5,
            approx_epsilon_ratio: 0.1,
            min_area_ratio: 0.15,
            acceptance: AcceptancePolicy::FourVertices,
            fallback: FallbackPolicy::PassThrough,
            sharpen_sigma: 3.0,
            sharpen_amount: 0.5,
            threshold_window: 51,
            threshold_offset: 15,
        }
    }
}

impl ScanConfig {
    /// Load a config from JSON. Missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| ScanError::io(path, e))?;
        let config: Self = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| ScanError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let working = match self.working_size {
            WorkingSize::Width(px) | WorkingSize::Height(px) => px,
        };
        if working == 0 {
            return Err(ScanError::Config("working size must be positive".into()));
        }
        for (name, value) in [
            ("blur_kernel", self.blur_kernel),
            ("close_kernel", self.close_kernel),
            ("threshold_window", self.threshold_window),
        ] {
            if value % 2 == 0 {
                return Err(ScanError::Config(format!("{name} must be odd, got {value}")));
            }
        }
        if self.close_kernel > 511 {
            return Err(ScanError::Config(format!(
                "close_kernel must be at most 511, got {}",
                self.close_kernel
            )));
        }
        if self.threshold_window < 3 {
            return Err(ScanError::Config("threshold_window must be at least 3".into()));
        }
        if !(self.canny_low >= 0.0 && self.canny_low <= self.canny_high) {
            return Err(ScanError::Config(format!(
                "canny thresholds must satisfy 0 <= low <= high, got {} / {}",
                self.canny_low, self.canny_high
            )));
        }
        if self.max_candidates == 0 {
            return Err(ScanError::Config("max_candidates must be positive".into()));
        }
        if !(self.approx_epsilon_ratio > 0.0) {
            return Err(ScanError::Config("approx_epsilon_ratio must be positive".into()));
        }
        if !(0.0..1.0).contains(&self.min_area_ratio) {
            return Err(ScanError::Config(format!(
                "min_area_ratio must be in [0, 1), got {}",
                self.min_area_ratio
            )));
        }
        if !(self.sharpen_sigma > 0.0) || self.sharpen_amount < 0.0 {
            return Err(ScanError::Config("sharpening needs sigma > 0 and amount >= 0".into()));
        }
        Ok(())
    }
}

/// Gaussian sigma for a square kernel of side `ksize`, using the usual
/// `0.3 * ((ksize - 1) / 2 - 1) + 0.8` rule.
pub fn kernel_sigma(ksize: u32) -> f32 {
    0.3 * ((ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8
}
