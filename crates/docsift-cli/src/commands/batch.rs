//! Batch processing command for multiple files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use docsift_core::{AnalysisResult, DocumentReader, FieldKey};

use super::load_config;
use super::output::{format_result, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input glob pattern (e.g. "scans/*.pdf")
    #[arg(required = true)]
    input: String,

    /// Output directory (default: print to stdout)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of files processed concurrently
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileOutcome {
    path: PathBuf,
    result: Result<AnalysisResult, String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| DocumentReader::supports(p))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let reader = Arc::new(DocumentReader::from_config(&config)?);

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut pending = stream::iter(files)
        .map(|path| {
            let reader = Arc::clone(&reader);
            async move {
                let file_start = Instant::now();
                let job_path = path.clone();
                let result = tokio::task::spawn_blocking(move || reader.analyze_file(&job_path))
                    .await
                    .map_err(|e| e.to_string())
                    .and_then(|r| r.map_err(|e| e.to_string()));

                FileOutcome {
                    path,
                    result,
                    processing_time_ms: file_start.elapsed().as_millis() as u64,
                }
            }
        })
        .buffer_unordered(args.jobs.max(1));

    let mut outcomes = Vec::new();
    while let Some(outcome) = pending.next().await {
        overall_pb.inc(1);

        if let Err(message) = &outcome.result {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", outcome.path.display(), message);
            } else {
                overall_pb.abandon();
                error!("Failed to process {}: {}", outcome.path.display(), message);
                anyhow::bail!("Processing {} failed: {}", outcome.path.display(), message);
            }
        }
        outcomes.push(outcome);
    }

    overall_pb.finish_and_clear();
    outcomes.sort_by(|a, b| a.path.cmp(&b.path));

    for outcome in &outcomes {
        let Ok(result) = &outcome.result else {
            continue;
        };
        let content = format_result(result, args.format)?;

        match &args.output_dir {
            Some(output_dir) => {
                let output_path = output_dir.join(output_file_name(&outcome.path, args.format));
                fs::write(&output_path, content)?;
                debug!("Wrote output to {}", output_path.display());
            }
            None => {
                println!("==> {} <==", outcome.path.display());
                println!("{}", content);
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &outcomes)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = outcomes.iter().filter(|o| o.result.is_err()).collect();
    let succeeded = outcomes.len() - failed.len();

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        outcomes.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(succeeded).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for outcome in &failed {
            if let Err(message) = &outcome.result {
                eprintln!("  - {}: {}", outcome.path.display(), message);
            }
        }
    }

    Ok(())
}

/// Output name keeps the whole input file name, so `scan.png` and
/// `scan.pdf` land in `scan.png.json` and `scan.pdf.json`.
fn output_file_name(path: &Path, format: OutputFormat) -> String {
    let input_name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_else(|| "document".into());
    format!("{}.{}", input_name, format.extension())
}

fn write_summary(path: &Path, outcomes: &[FileOutcome]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["file", "status", "processing_time_ms"];
    header.extend(FieldKey::ALL.iter().map(|k| k.as_str()));
    header.extend(["pairs", "sections", "error"]);
    wtr.write_record(&header)?;

    for outcome in outcomes {
        let mut record = vec![
            outcome.path.display().to_string(),
            String::new(),
            outcome.processing_time_ms.to_string(),
        ];

        match &outcome.result {
            Ok(result) => {
                record[1] = "ok".to_string();
                record.extend(FieldKey::ALL.iter().map(|&k| {
                    result.extracted_fields.get(k).unwrap_or_default().to_string()
                }));
                record.push(result.key_value_pairs.len().to_string());
                record.push(result.sections.len().to_string());
                record.push(String::new());
            }
            Err(message) => {
                record[1] = "failed".to_string();
                record.extend(FieldKey::ALL.iter().map(|_| String::new()));
                record.push(String::new());
                record.push(String::new());
                record.push(message.clone());
            }
        }

        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
