//! Analyze command - audit a markdown file or directory

use super::MAX_KEYWORDS;
use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use md_audit::analyzer::{collect_markdown_files, Analyzer, BatchOptions};
use md_audit::config::load_config;
use md_audit::reporters::{self, OutputFormat};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// Batches larger than this get a progress bar
const PROGRESS_THRESHOLD: usize = 10;

/// Parsed `analyze` arguments
#[derive(Debug)]
pub struct AnalyzeArgs {
    pub path: PathBuf,
    pub keywords: Vec<String>,
    pub format: String,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub no_ai: bool,
    pub workers: usize,
    pub no_progress: bool,
    pub summary_only: bool,
    pub fail_under: Option<f64>,
}

/// Run the analyze command
pub fn run(args: AnalyzeArgs) -> Result<()> {
    if args.keywords.len() > MAX_KEYWORDS {
        anyhow::bail!(
            "At most {} keywords are allowed (got {})",
            MAX_KEYWORDS,
            args.keywords.len()
        );
    }
    let format = OutputFormat::from_str(&args.format)?;

    let mut config = load_config(args.config.as_deref())?;
    if args.no_ai {
        config.ai.enabled = false;
    }
    let analyzer = Analyzer::new(config);
    debug!("AI scoring enabled: {}", analyzer.ai_enabled());

    let (output, scores) = if args.path.is_file() {
        let report = analyzer
            .analyze_file(&args.path, &args.keywords)
            .with_context(|| format!("Failed to analyze {}", args.path.display()))?;
        (reporters::report(&report, format)?, vec![report.total_score])
    } else if args.path.is_dir() {
        let files = collect_markdown_files(&args.path);
        if files.is_empty() {
            warn!("No markdown files found in {}", args.path.display());
        }
        let options = BatchOptions::default().workers(args.workers);
        let bar = progress_bar(files.len(), args.no_progress)?;
        let options = match &bar {
            Some(bar) => {
                let bar = bar.clone();
                options.on_progress(Box::new(move |_: &Path, done: usize, _: usize| {
                    bar.set_position(done as u64)
                }))
            }
            None => options,
        };

        let outcome = analyzer.analyze_files(&files, &args.keywords, &options)?;
        if let Some(bar) = bar {
            bar.finish_and_clear();
        }

        eprintln!(
            "{} Analyzed {}/{} markdown files",
            style("✓").green(),
            outcome.succeeded(),
            outcome.total_files
        );
        for failure in &outcome.failures {
            eprintln!(
                "{} {}: {}",
                style("✗").red(),
                style(failure.path.display()).cyan(),
                failure.error
            );
        }

        let scores = outcome.reports.iter().map(|r| r.total_score).collect();
        let rendered = if args.summary_only {
            reporters::render_batch_summary(&outcome, format)?
        } else {
            reporters::batch(&outcome, format)?
        };
        (rendered, scores)
    } else {
        anyhow::bail!("Path does not exist: {}", args.path.display());
    };

    write_output(&output, args.output.as_deref(), format)?;
    check_fail_under(args.fail_under, &scores);
    Ok(())
}

/// Progress bar for directory runs, when there are enough files to warrant one
fn progress_bar(total: usize, no_progress: bool) -> Result<Option<ProgressBar>> {
    if no_progress || total <= PROGRESS_THRESHOLD {
        return Ok(None);
    }

    let bar = ProgressBar::new(total as u64);
    bar.set_style(create_bar_style()?);
    bar.set_message("Auditing markdown files...");
    Ok(Some(bar))
}

fn create_bar_style() -> Result<ProgressStyle> {
    Ok(ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
        .progress_chars("█▓▒░  "))
}

/// Name used when `--output` points at a directory
const DEFAULT_REPORT_STEM: &str = "md-audit-report";

fn output_file(path: &Path, format: OutputFormat) -> PathBuf {
    if path.is_dir() {
        path.join(format!("{}.{}", DEFAULT_REPORT_STEM, reporters::file_extension(format)))
    } else {
        path.to_path_buf()
    }
}

fn write_output(output: &str, path: Option<&Path>, format: OutputFormat) -> Result<()> {
    match path {
        Some(path) => {
            let path = output_file(path, format);
            let path = path.as_path();
            std::fs::write(path, output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            eprintln!(
                "{} Report written to {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
        None => println!("{}", output),
    }
    Ok(())
}

/// Exit with code 1 when any score is below the threshold
fn check_fail_under(threshold: Option<f64>, scores: &[f64]) {
    if let Some(threshold) = threshold {
        if let Some(lowest) = lowest_below(threshold, scores) {
            eprintln!(
                "Failing due to --fail-under={} (lowest score {:.1})",
                threshold, lowest
            );
            std::process::exit(1);
        }
    }
}

fn lowest_below(threshold: f64, scores: &[f64]) -> Option<f64> {
    scores
        .iter()
        .copied()
        .filter(|s| *s < threshold)
        .min_by(|a, b| a.total_cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowest_below() {
        assert_eq!(lowest_below(70.0, &[80.0, 65.5, 69.9]), Some(65.5));
        assert_eq!(lowest_below(70.0, &[70.0, 95.0]), None);
        assert_eq!(lowest_below(70.0, &[]), None);
    }

    #[test]
    fn test_progress_bar_only_for_large_batches() {
        assert!(progress_bar(1, false).unwrap().is_none());
        assert!(progress_bar(PROGRESS_THRESHOLD, false).unwrap().is_none());
        assert!(progress_bar(PROGRESS_THRESHOLD + 1, true).unwrap().is_none());

        let bar = progress_bar(PROGRESS_THRESHOLD + 1, false).unwrap().unwrap();
        assert_eq!(bar.length(), Some(PROGRESS_THRESHOLD as u64 + 1));
    }

    #[test]
    fn test_output_into_directory_is_auto_named() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            output_file(dir.path(), OutputFormat::Json),
            dir.path().join("md-audit-report.json")
        );
        let file = dir.path().join("custom.txt");
        assert_eq!(output_file(&file, OutputFormat::Markdown), file);
    }

    #[test]
    fn test_bar_style_template_is_valid() {
        assert!(create_bar_style().is_ok());
    }
}
