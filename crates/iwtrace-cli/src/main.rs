//! iwtrace - Trace dot-matrix printer streams
//!
//! Reads a raw printer stream and prints every byte and escape command in a
//! readable form, with graphics shown inline as SIXEL.

use clap::Parser;
use iwtrace::{TraceOptions, Tracer};
use log::{info, LevelFilter};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "iwtrace")]
#[command(version)]
#[command(about = "Trace dot-matrix printer streams with SIXEL previews", long_about = None)]
struct Cli {
    /// Printer stream to trace (default: stdin, also with -)
    input: Option<PathBuf>,

    /// Output trace file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Don't show graphic lines and custom characters inline
    #[arg(long)]
    no_preview: bool,

    /// Don't write the composite image at the end of the trace
    #[arg(long)]
    no_image: bool,

    /// Also save all graphic lines as a PNG image
    #[arg(long, value_name = "PATH")]
    png: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let opts = TraceOptions {
        inline_previews: !cli.no_preview,
        final_image: !cli.no_image,
    };

    let input: Box<dyn io::BufRead> = match &cli.input {
        Some(path) if path.as_os_str() != "-" => Box::new(BufReader::new(
            File::open(path).map_err(|e| format!("Failed to open '{}': {}", path.display(), e))?,
        )),
        _ => Box::new(io::stdin().lock()),
    };

    let output: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(File::create(path).map_err(|e| {
            format!("Failed to create '{}': {}", path.display(), e)
        })?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let summary = Tracer::new(input, output, opts).run()?;

    if let Some(path) = cli.png {
        let raster = &summary.raster;
        if raster.is_empty() || raster.width() == 0 {
            info!("No graphics in stream, '{}' not written", path.display());
        } else {
            let img = image::GrayImage::from_raw(
                raster.width() as u32,
                raster.height() as u32,
                raster.to_luma(),
            )
            .ok_or("Failed to create image from raster data")?;
            img.save(&path)?;
            info!(
                "Saved {}x{} raster to '{}'",
                raster.width(),
                raster.height(),
                path.display()
            );
        }
    }

    Ok(())
}
