use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use docscan::{
    AcceptancePolicy, BatchConfig, DocumentScanner, FallbackPolicy, FormatSet, OutputLayout,
    ScanConfig, run_batch,
};

#[derive(Parser)]
#[command(name = "docscan")]
#[command(about = "Find, straighten and binarize photographed documents")]
struct Cli {
    /// Directory of photos to scan
    #[arg(value_name = "INPUT_DIR", default_value = "input")]
    input_dir: PathBuf,

    /// Write only the binarized pages to this directory
    #[arg(long, value_name = "DIR", conflicts_with_all = ["color_out", "bw_out"])]
    out: Option<PathBuf>,

    /// Write rectified color pages to this directory (needs --bw-out)
    #[arg(long, value_name = "DIR", requires = "bw_out")]
    color_out: Option<PathBuf>,

    /// Write binarized pages to this directory (needs --color-out)
    #[arg(long, value_name = "DIR", requires = "color_out")]
    bw_out: Option<PathBuf>,

    /// JSON file overriding scan thresholds
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// What to do when no document boundary is found
    #[arg(long, value_enum)]
    fallback: Option<FallbackPolicy>,

    /// Which simplified polygons count as a document
    #[arg(long, value_enum)]
    acceptance: Option<AcceptancePolicy>,

    /// Accepted input extensions
    #[arg(long, value_enum, default_value_t = FormatSet::Extended)]
    formats: FormatSet,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "docscan=debug" } else { "docscan=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load config, then let flags override it
    let mut config = match &args.config {
        Some(path) => ScanConfig::from_json_file(path)?,
        None => ScanConfig::default(),
    };
    if let Some(fallback) = args.fallback {
        config.fallback = fallback;
    }
    if let Some(acceptance) = args.acceptance {
        config.acceptance = acceptance;
    }
    config.validate()?;

    let output = match (args.color_out, args.bw_out) {
        (Some(color_dir), Some(binary_dir)) => OutputLayout::Split {
            color_dir,
            binary_dir,
        },
        _ => OutputLayout::Binary {
            dir: args.out.unwrap_or_else(|| PathBuf::from("output")),
        },
    };

    let mut scanner = DocumentScanner::new(config);
    if let Some(debug_dir) = args.debug_out {
        scanner = scanner.with_debug(debug_dir)?;
    }

    let batch = BatchConfig {
        input_dir: args.input_dir,
        output,
        formats: args.formats,
    };
    let report = run_batch(&scanner, &batch)?;

    // Print results
    println!("\n=== Scan Results ===");
    println!("Images found: {}", report.total());
    println!("Rectified:    {}", report.rectified.len());
    println!("Fallback:     {}", report.fallback.len());
    println!("Failed:       {}", report.failed.len());

    if !report.failed.is_empty() {
        println!("\nFailed images:");
        for (path, err) in &report.failed {
            println!("  {}: {}", path.display(), err);
        }
    }

    Ok(())
}
