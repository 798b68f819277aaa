//! Directory batch tests.
//!
//! Tests cover:
//! - Extension filtering for both format sets
//! - Rectified vs. fallback vs. failed bookkeeping
//! - Output layout on disk

mod common;

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use common::*;

/// Populate `dir` with one document, one blank photo, one non-image file,
/// one corrupt png and one bmp.
fn populate_input(dir: &Path) -> anyhow::Result<()> {
    synthetic_page().save(dir.join("doc.png"))?;
    blank_photo(320, 240).save(dir.join("blank.jpg"))?;
    blank_photo(64, 48).save(dir.join("scan.BMP"))?;
    fs::write(dir.join("notes.txt"), "not an image")?;
    fs::write(dir.join("broken.png"), b"\x00\x01garbage bytes")?;
    Ok(())
}

#[test]
fn test_batch_split_layout() -> anyhow::Result<()> {
    // 1. Setup input and output directories
    let input = TempDir::new()?;
    let output = TempDir::new()?;
    populate_input(input.path())?;
    let color_dir = output.path().join("color");
    let binary_dir = output.path().join("bw");

    // 2. Run the batch with the extended format set
    let config = BatchConfig {
        input_dir: input.path().to_path_buf(),
        output: OutputLayout::Split {
            color_dir: color_dir.clone(),
            binary_dir: binary_dir.clone(),
        },
        formats: FormatSet::Extended,
    };
    let report = run_batch(&DocumentScanner::default(), &config)?;

    // 3. Check bookkeeping
    assert_eq!(report.total(), 4, "notes.txt must be ignored");
    assert_eq!(report.rectified, vec![input.path().join("doc.png")]);
    assert_eq!(
        report.fallback,
        vec![input.path().join("blank.jpg"), input.path().join("scan.BMP")]
    );
    assert_eq!(report.failed.len(), 1);
    let (failed_path, err) = &report.failed[0];
    assert_eq!(failed_path, &input.path().join("broken.png"));
    assert!(matches!(err, ScanError::Decode { .. }), "got {err:?}");

    // 4. Check files on disk
    for name in ["doc.png", "blank.jpg", "scan.BMP"] {
        assert!(color_dir.join(name).exists(), "missing color {name}");
        assert!(binary_dir.join(name).exists(), "missing binary {name}");
    }
    assert!(!color_dir.join("broken.png").exists());
    assert!(!binary_dir.join("notes.txt").exists());

    // 5. Binary output is single channel, color output is not
    let binary = image::open(binary_dir.join("doc.png"))?;
    assert!(matches!(binary, image::DynamicImage::ImageLuma8(_)));
    let color = image::open(color_dir.join("doc.png"))?;
    assert!(matches!(color, image::DynamicImage::ImageRgb8(_)));
    assert_eq!(binary.width(), color.width());
    assert_eq!(binary.height(), color.height());

    Ok(())
}

#[test]
fn test_batch_binary_layout_with_common_formats() -> anyhow::Result<()> {
    let input = TempDir::new()?;
    let output = TempDir::new()?;
    populate_input(input.path())?;
    let out_dir = output.path().join("nested").join("out");

    let config = BatchConfig {
        input_dir: input.path().to_path_buf(),
        output: OutputLayout::Binary {
            dir: out_dir.clone(),
        },
        formats: FormatSet::Common,
    };
    let report: BatchReport = run_batch(&DocumentScanner::default(), &config)?;

    // bmp is outside the common set
    assert_eq!(report.total(), 3);
    assert_eq!(report.rectified.len(), 1);
    assert_eq!(report.fallback.len(), 1);
    assert_eq!(report.failed.len(), 1);

    assert!(out_dir.join("doc.png").exists());
    assert!(out_dir.join("blank.jpg").exists());
    assert!(!out_dir.join("scan.BMP").exists());

    Ok(())
}

#[test]
fn test_batch_full_image_fallback_counts_as_fallback() -> anyhow::Result<()> {
    let input = TempDir::new()?;
    let output = TempDir::new()?;
    blank_photo(200, 100).save(input.path().join("blank.png"))?;

    let scanner = DocumentScanner::new(ScanConfig {
        fallback: FallbackPolicy::FullImage,
        ..ScanConfig::default()
    });
    let config = BatchConfig {
        input_dir: input.path().to_path_buf(),
        output: OutputLayout::Binary {
            dir: output.path().to_path_buf(),
        },
        formats: FormatSet::Extended,
    };
    let report = run_batch(&scanner, &config)?;

    assert!(report.rectified.is_empty());
    assert_eq!(report.fallback.len(), 1);
    assert!(output.path().join("blank.png").exists());

    Ok(())
}

#[test]
fn test_missing_input_dir_is_an_error() {
    let output = TempDir::new().unwrap();
    let config = BatchConfig {
        input_dir: output.path().join("does-not-exist"),
        output: OutputLayout::Binary {
            dir: output.path().join("out"),
        },
        formats: FormatSet::Extended,
    };

    let result = run_batch(&DocumentScanner::default(), &config);

    assert!(matches!(result, Err(ScanError::Io { .. })));
}

#[test]
fn test_debug_dumps_keep_files_with_same_stem_apart() -> anyhow::Result<()> {
    // 1. Two inputs that differ only by extension
    let input = TempDir::new()?;
    let output = TempDir::new()?;
    synthetic_page().save(input.path().join("page.png"))?;
    blank_photo(120, 90).save(input.path().join("page.jpg"))?;
    let debug_dir = output.path().join("debug");

    // 2. Run with debug dumps enabled
    let scanner = DocumentScanner::default().with_debug(debug_dir.clone())?;
    let config = BatchConfig {
        input_dir: input.path().to_path_buf(),
        output: OutputLayout::Binary {
            dir: output.path().join("out"),
        },
        formats: FormatSet::Extended,
    };
    let report = run_batch(&scanner, &config)?;
    assert_eq!(report.total(), 2);

    // 3. Each input has its own dump per stage
    for stage in ["00_input", "04_binarized"] {
        assert!(debug_dir.join(stage).join("page.png.png").exists());
        assert!(debug_dir.join(stage).join("page.jpg.png").exists());
    }

    Ok(())
}

#[test]
fn test_invalid_config_fails_the_batch_up_front() -> anyhow::Result<()> {
    let input = TempDir::new()?;
    let output = TempDir::new()?;
    synthetic_page().save(input.path().join("doc.png"))?;

    let scanner = DocumentScanner::new(ScanConfig {
        sharpen_sigma: 0.0,
        ..ScanConfig::default()
    });
    let config = BatchConfig {
        input_dir: input.path().to_path_buf(),
        output: OutputLayout::Binary {
            dir: output.path().join("out"),
        },
        formats: FormatSet::Extended,
    };

    let result = run_batch(&scanner, &config);

    assert!(matches!(result, Err(ScanError::Config(_))));
    assert!(!output.path().join("out").exists());
    Ok(())
}
