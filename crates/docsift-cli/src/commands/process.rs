//! Process command - OCR and analyze a single file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use docsift_core::DocumentReader;

use super::load_config;
use super::output::{format_result, OutputFormat};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// OCR language (overrides ocr.language)
    #[arg(short, long)]
    lang: Option<String>,

    /// Print the raw OCR text instead of the analysis
    #[arg(long)]
    raw: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let reader = DocumentReader::from_config(&config)?;
    let lang = args.lang.clone().unwrap_or_else(|| reader.language().to_string());
    info!(
        "Processing {} with {} ({})",
        args.input.display(),
        reader.backend_name(),
        lang
    );

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message("Running OCR...");

    let input = args.input.clone();
    let (reader, raw) = tokio::task::spawn_blocking(move || {
        let raw = reader.read_with_lang(&input, &lang);
        (reader, raw)
    })
    .await?;

    let raw = match raw {
        Ok(raw) => raw,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e.into());
        }
    };

    let output = if args.raw {
        raw
    } else {
        pb.set_message("Analyzing text...");
        let result = reader.analyzer().analyze_raw(&raw);
        format_result(&result, args.format)?
    };
    pb.finish_and_clear();

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
