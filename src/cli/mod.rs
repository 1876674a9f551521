//! CLI command definitions and handlers

mod analyze;
mod init;

use anyhow::Result;
use clap::{Parser, Subcommand};
use md_audit::analyzer::{DEFAULT_WORKERS, MAX_WORKERS};
use std::path::PathBuf;

/// Maximum number of `--keyword` values accepted per run
pub const MAX_KEYWORDS: usize = 10;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > MAX_WORKERS {
        Err(format!("workers cannot exceed {}", MAX_WORKERS))
    } else {
        Ok(n)
    }
}

/// Parse a `--fail-under` threshold (0-100)
fn parse_threshold(s: &str) -> Result<f64, String> {
    let n: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid score", s))?;
    if !(0.0..=100.0).contains(&n) {
        Err("score threshold must be between 0 and 100".to_string())
    } else {
        Ok(n)
    }
}

/// md-audit - Markdown SEO audit
#[derive(Parser, Debug)]
#[command(name = "md-audit")]
#[command(
    version,
    about = "Score markdown documents for SEO quality: metadata, structure, keywords and optional AI semantics",
    long_about = "md-audit scores markdown documents out of 100. Rule-based checks cover \
metadata (title, description), structure (H1, image alt text, links) and keyword \
usage (density, placement). An optional OpenAI-compatible model adds a semantic \
quality score.\n\n\
AI scoring is enabled when MD_AUDIT_LLM_API_KEY (or llm_api_key in the config file) provides an API key.",
    after_help = "\
Examples:
  md-audit analyze post.md                      Audit one file
  md-audit analyze post.md -k rust -k async     Score against target keywords
  md-audit analyze docs/ --format markdown      Audit every markdown file in a directory
  md-audit analyze docs/ --fail-under 70        Exit code 1 if any file scores below 70
  md-audit init                                 Write a default md-audit.json"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default md-audit.json config file
    Init {
        /// Directory to write the config into
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Audit a markdown file or every markdown file under a directory
    #[command(after_help = "\
Examples:
  md-audit analyze README.md                         Text report on the terminal
  md-audit analyze post.md --format json             JSON output for scripting
  md-audit analyze post.md -f md -o report.md        Markdown report written to a file
  md-audit analyze docs/ --workers 8                 Batch run on 8 threads
  md-audit analyze docs/ --summary-only              One line per file
  md-audit analyze post.md --no-ai                   Rule-based checks only
  md-audit analyze docs/ --fail-under 60             CI mode")]
    Analyze {
        /// Markdown file or directory to audit
        path: PathBuf,

        /// Target keyword (repeatable, at most 10). Extracted from the content when omitted
        #[arg(long = "keyword", short = 'k', value_name = "KEYWORD")]
        keywords: Vec<String>,

        /// Output format: text, json, markdown (or md)
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json", "markdown", "md"])]
        format: String,

        /// Output file path (default: stdout). A directory gets md-audit-report.<ext>
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Config file (default: ./md-audit.json when present)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Skip AI semantic scoring
        #[arg(long)]
        no_ai: bool,

        /// Number of parallel workers for directories (1-64)
        #[arg(long, default_value_t = DEFAULT_WORKERS, value_parser = parse_workers)]
        workers: usize,

        /// Hide the progress bar in directory mode
        #[arg(long)]
        no_progress: bool,

        /// Directory mode: print only the summary table, not every report
        #[arg(long)]
        summary_only: bool,

        /// Exit with code 1 if any report scores below this value
        #[arg(long, value_parser = parse_threshold)]
        fail_under: Option<f64>,
    },
}

/// Run the CLI
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { path } => init::run(&path),

        Commands::Analyze {
            path,
            keywords,
            format,
            output,
            config,
            no_ai,
            workers,
            no_progress,
            summary_only,
            fail_under,
        } => analyze::run(analyze::AnalyzeArgs {
            path,
            keywords,
            format,
            output,
            config,
            no_ai,
            workers,
            no_progress,
            summary_only,
            fail_under,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_workers_bounds() {
        assert_eq!(parse_workers("4"), Ok(4));
        assert_eq!(parse_workers("64"), Ok(64));
        assert!(parse_workers("0").unwrap_err().contains("at least 1"));
        assert!(parse_workers("65").unwrap_err().contains("cannot exceed"));
        assert!(parse_workers("many").is_err());
    }

    #[test]
    fn test_parse_threshold_bounds() {
        assert_eq!(parse_threshold("70"), Ok(70.0));
        assert_eq!(parse_threshold("0"), Ok(0.0));
        assert!(parse_threshold("100.5").is_err());
        assert!(parse_threshold("-1").is_err());
    }

    #[test]
    fn test_analyze_args_parse() {
        let cli = Cli::try_parse_from([
            "md-audit", "analyze", "post.md", "-k", "rust", "--keyword", "async", "-f", "md",
            "--no-ai", "--fail-under", "50",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze {
                keywords,
                format,
                no_ai,
                fail_under,
                workers,
                ..
            } => {
                assert_eq!(keywords, vec!["rust", "async"]);
                assert_eq!(format, "md");
                assert!(no_ai);
                assert_eq!(fail_under, Some(50.0));
                assert_eq!(workers, DEFAULT_WORKERS);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["md-audit", "analyze", "x.md", "-f", "sarif"]).is_err());
    }

    #[test]
    fn test_init_defaults_to_current_dir() {
        let cli = Cli::try_parse_from(["md-audit", "init"]).unwrap();
        assert!(matches!(cli.command, Commands::Init { ref path } if *path == PathBuf::from(".")));
    }
}
