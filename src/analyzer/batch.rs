//! Directory batch analysis on a bounded rayon pool

use super::{AnalyzeError, Analyzer};
use crate::models::SeoReport;
use crate::parser::is_markdown_path;
use ignore::WalkBuilder;
use rayon::prelude::*;
use serde::Serialize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{info, warn};

pub const DEFAULT_WORKERS: usize = 4;
pub const MAX_WORKERS: usize = 64;

/// Failed paths listed in the batch summary log
const FAILURE_PREVIEW: usize = 5;

/// Called after each file with (path, completed, total)
pub type ProgressCallback = Box<dyn Fn(&Path, usize, usize) + Send + Sync>;

/// Options for [`Analyzer::analyze_directory`]
pub struct BatchOptions {
    pub workers: usize,
    pub progress: Option<ProgressCallback>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            progress: None,
        }
    }
}

impl BatchOptions {
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn on_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }
}

/// A file that could not be analyzed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Result of a directory run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOutcome {
    /// Successful reports, sorted by path
    pub reports: Vec<SeoReport>,
    pub failures: Vec<BatchFailure>,
    /// Markdown files discovered
    pub total_files: usize,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> usize {
        self.reports.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn average_score(&self) -> Option<f64> {
        if self.reports.is_empty() {
            return None;
        }
        let sum: f64 = self.reports.iter().map(|r| r.total_score).sum();
        Some(sum / self.reports.len() as f64)
    }
}

/// Recursively collect markdown files under `dir`, sorted.
///
/// Hidden files and ignore-listed paths are included.
pub fn collect_markdown_files(dir: &Path) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(dir).standard_filters(false).build();

    let mut files: Vec<PathBuf> = walker
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable path under {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|e| e.file_type().is_some_and(|t| t.is_file()))
        .map(|e| e.into_path())
        .filter(|p| is_markdown_path(p))
        .collect();
    files.sort();
    files
}

impl Analyzer {
    /// Analyze every markdown file under `dir`.
    ///
    /// Per-file failures are collected in [`BatchOutcome::failures`] and never
    /// abort the run.
    pub fn analyze_directory(
        &self,
        dir: &Path,
        user_keywords: &[String],
        options: &BatchOptions,
    ) -> Result<BatchOutcome, AnalyzeError> {
        if !dir.exists() {
            return Err(AnalyzeError::DirectoryNotFound {
                path: dir.to_path_buf(),
            });
        }
        if !dir.is_dir() {
            return Err(AnalyzeError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }

        let files = collect_markdown_files(dir);
        if files.is_empty() {
            warn!("No markdown files found in {}", dir.display());
            return Ok(BatchOutcome::default());
        }
        self.analyze_files(&files, user_keywords, options)
    }

    /// Analyze an already collected list of files
    pub fn analyze_files(
        &self,
        files: &[PathBuf],
        user_keywords: &[String],
        options: &BatchOptions,
    ) -> Result<BatchOutcome, AnalyzeError> {
        if files.is_empty() {
            return Ok(BatchOutcome::default());
        }

        let workers = options.workers.clamp(1, MAX_WORKERS);
        info!(
            "Analyzing {} markdown files with {} workers",
            files.len(),
            workers
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()?;

        let completed = AtomicUsize::new(0);
        let total = files.len();
        let results: Vec<(PathBuf, Result<SeoReport, String>)> = pool.install(|| {
            files
                .par_iter()
                .map(|path| {
                    let result = catch_unwind(AssertUnwindSafe(|| {
                        self.analyze_file(path, user_keywords)
                    }));
                    let result = match result {
                        Ok(Ok(report)) => Ok(report),
                        Ok(Err(e)) => Err(e.to_string()),
                        Err(_) => Err("analysis panicked".to_string()),
                    };

                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some(ref callback) = options.progress {
                        callback(path, done, total);
                    }
                    (path.clone(), result)
                })
                .collect()
        });

        let mut outcome = BatchOutcome {
            total_files: total,
            ..Default::default()
        };
        for (path, result) in results {
            match result {
                Ok(report) => outcome.reports.push(report),
                Err(error) => outcome.failures.push(BatchFailure { path, error }),
            }
        }
        outcome.reports.sort_by(|a, b| a.file_path.cmp(&b.file_path));

        log_summary(&outcome);
        Ok(outcome)
    }
}

fn log_summary(outcome: &BatchOutcome) {
    info!(
        "Batch analysis complete: {}/{} succeeded",
        outcome.succeeded(),
        outcome.total_files
    );
    if outcome.failures.is_empty() {
        return;
    }

    warn!("{} files failed:", outcome.failed());
    for failure in outcome.failures.iter().take(FAILURE_PREVIEW) {
        warn!("  - {}: {}", failure.path.display(), failure.error);
    }
    if outcome.failed() > FAILURE_PREVIEW {
        warn!("  ... and {} more", outcome.failed() - FAILURE_PREVIEW);
    }
}
