use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader};
use tracing::{info, instrument, warn};

use crate::config::FormatSet;
use crate::detection::{DocumentScanner, ScanOutput};
use crate::error::{Result, ScanError};

/// Where scanned pages are written. File names are reused from the input,
/// so the container format follows the input extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLayout {
    /// Only the binarized page.
    Binary { dir: PathBuf },
    /// The rectified color page and the binarized page, side by side.
    Split {
        color_dir: PathBuf,
        binary_dir: PathBuf,
    },
}

impl OutputLayout {
    fn dirs(&self) -> Vec<&Path> {
        match self {
            OutputLayout::Binary { dir } => vec![dir.as_path()],
            OutputLayout::Split {
                color_dir,
                binary_dir,
            } => vec![color_dir.as_path(), binary_dir.as_path()],
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub output: OutputLayout,
    pub formats: FormatSet,
}

/// What happened to each input file.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Pages where a document contour was found and rectified.
    pub rectified: Vec<PathBuf>,
    /// Pages written without a detected contour (pass-through or full frame).
    pub fallback: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, ScanError)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.rectified.len() + self.fallback.len() + self.failed.len()
    }
}

/// Image files in `dir` whose extension is in `formats`, sorted by path.
pub fn list_images(dir: &Path, formats: FormatSet) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| ScanError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ScanError::io(dir, e))?.path();
        if path.is_file() && formats.matches(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Decode one image file.
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let decode = |source| ScanError::Decode {
        path: path.to_path_buf(),
        source,
    };
    ImageReader::open(path)
        .map_err(|e| decode(image::ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| decode(image::ImageError::IoError(e)))?
        .decode()
        .map_err(decode)
}

/// Write a scan result under `file_name` according to `layout`.
pub fn write_outputs(output: &ScanOutput, layout: &OutputLayout, file_name: &Path) -> Result<()> {
    let save = |dir: &Path, image: DynamicImage| -> Result<()> {
        let path = dir.join(file_name);
        image
            .save(&path)
            .map_err(|source| ScanError::Write { path, source })
    };

    match layout {
        OutputLayout::Binary { dir } => {
            save(dir, DynamicImage::ImageLuma8(output.binary.clone()))?;
        }
        OutputLayout::Split {
            color_dir,
            binary_dir,
        } => {
            save(color_dir, DynamicImage::ImageRgb8(output.color.clone()))?;
            save(binary_dir, DynamicImage::ImageLuma8(output.binary.clone()))?;
        }
    }
    Ok(())
}

/// Scan every matching image in the input directory.
///
/// A file that fails to decode, rectify or write is recorded in the report
/// and the batch moves on to the next file.
#[instrument(skip_all, fields(input = %config.input_dir.display()))]
pub fn run_batch(scanner: &DocumentScanner, config: &BatchConfig) -> Result<BatchReport> {
    scanner.config().validate()?;
    let files = list_images(&config.input_dir, config.formats)?;
    info!(count = files.len(), "Image files found in input directory");

    for dir in config.output.dirs() {
        std::fs::create_dir_all(dir).map_err(|e| ScanError::io(dir, e))?;
    }

    let mut report = BatchReport::default();
    for path in files {
        match scan_file(scanner, &path, &config.output) {
            Ok(true) => {
                info!(file = %path.display(), "Contour detected");
                report.rectified.push(path);
            }
            Ok(false) => {
                info!(file = %path.display(), "No contour detected");
                report.fallback.push(path);
            }
            Err(err) => {
                warn!(file = %path.display(), error = %err, "Skipping image");
                report.failed.push((path, err));
            }
        }
    }
    Ok(report)
}

fn scan_file(scanner: &DocumentScanner, path: &Path, layout: &OutputLayout) -> Result<bool> {
    let file_name = path
        .file_name()
        .ok_or_else(|| ScanError::Config(format!("not a file: {}", path.display())))?;
    // Full name, so page.jpg and page.png get separate debug dumps.
    let label = file_name.to_string_lossy();

    let image = load_image(path)?;
    let output = scanner.scan_labeled(&image, &label)?;
    write_outputs(&output, layout, Path::new(file_name))?;
    Ok(output.detection.is_detected())
}
