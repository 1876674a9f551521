//! Analysis orchestration
//!
//! Parses a document, resolves the keyword set, runs the rules engine and
//! the optional AI engine, and assembles the [`SeoReport`]. Directory
//! batches live in [`batch`].

mod batch;

pub use batch::{
    collect_markdown_files, BatchFailure, BatchOptions, BatchOutcome, ProgressCallback,
    DEFAULT_WORKERS, MAX_WORKERS,
};

use crate::ai::{self, AiEngine};
use crate::config::AuditConfig;
use crate::models::{round1, Category, SeoReport};
use crate::parser::{self, extract_keywords, ParseError, ParsedDocument};
use crate::rules::{RulesEngine, RulesOutcome};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors surfaced by the analyzer
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("Not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("Failed to start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Keywords a run scores against, and where they came from
struct ResolvedKeywords {
    used: Vec<String>,
    user: Vec<String>,
    extracted: Vec<String>,
}

/// Scores markdown documents
#[derive(Debug)]
pub struct Analyzer {
    config: AuditConfig,
    rules: RulesEngine,
    ai: Option<AiEngine>,
}

impl Analyzer {
    /// Build an analyzer; AI scoring is enabled when the config allows it
    pub fn new(config: AuditConfig) -> Self {
        let ai = ai::engine_for(&config);
        Self {
            rules: RulesEngine::new(&config),
            config,
            ai,
        }
    }

    /// Replace the AI engine (`None` disables AI scoring)
    pub fn with_ai_engine(mut self, engine: Option<AiEngine>) -> Self {
        self.ai = engine;
        self
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    pub fn ai_enabled(&self) -> bool {
        self.ai.is_some()
    }

    /// Analyze one markdown file
    pub fn analyze_file(
        &self,
        path: &Path,
        user_keywords: &[String],
    ) -> Result<SeoReport, AnalyzeError> {
        debug!("Analyzing {}", path.display());
        let doc = parser::parse_file(path)?;
        Ok(self.analyze_document(&path.display().to_string(), &doc, user_keywords))
    }

    /// Analyze an already parsed document, labelled `file_path` in the report
    pub fn analyze_document(
        &self,
        file_path: &str,
        doc: &ParsedDocument,
        user_keywords: &[String],
    ) -> SeoReport {
        let keywords = self.resolve_keywords(doc, user_keywords);
        let outcome = self.rules.check_all(doc, &keywords.used);

        let ai_analysis = self
            .ai
            .as_ref()
            .and_then(|engine| engine.analyze(doc, &keywords.used));
        let ai_score = round1(ai::ai_score(ai_analysis.as_ref()));

        let metadata_score = round1(display_score(&outcome, Category::Metadata));
        let structure_score = round1(display_score(&outcome, Category::Structure));
        let keyword_score = round1(display_score(&outcome, Category::Keywords));
        let total_score = round1(metadata_score + structure_score + keyword_score + ai_score);

        SeoReport {
            file_path: file_path.to_string(),
            total_score,
            metadata_score,
            structure_score,
            keyword_score,
            ai_score,
            findings: outcome.findings,
            ai_analysis,
            extracted_keywords: keywords.extracted,
            user_keywords: keywords.user,
        }
    }

    fn resolve_keywords(&self, doc: &ParsedDocument, user_keywords: &[String]) -> ResolvedKeywords {
        if !user_keywords.is_empty() {
            return ResolvedKeywords {
                used: user_keywords.to_vec(),
                user: user_keywords.to_vec(),
                extracted: Vec::new(),
            };
        }

        let extracted = extract_keywords(&doc.raw_content, self.config.keywords.max_auto_keywords);
        debug!("Auto-extracted keywords: {:?}", extracted);
        ResolvedKeywords {
            used: extracted.clone(),
            user: Vec::new(),
            extracted,
        }
    }
}

/// Category score as the sum of its findings, capped
fn display_score(outcome: &RulesOutcome, category: Category) -> f64 {
    let from_findings: f64 = outcome
        .findings
        .iter()
        .filter(|f| f.category == category)
        .map(|f| f.score)
        .sum();
    let displayed = from_findings.clamp(0.0, category.cap());

    let engine = match category {
        Category::Metadata => outcome.metadata_score,
        Category::Structure => outcome.structure_score,
        Category::Keywords => outcome.keyword_score,
    };
    if (displayed - engine).abs() > 1e-6 {
        warn!(
            "{} score mismatch: findings sum to {:.2}, rules engine reported {:.2}",
            category.label(),
            displayed,
            engine
        );
    }
    displayed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::test_support::{fast_settings, ScriptedBackend, GOOD_REPLY};
    use crate::ai::AiError;
    use crate::models::KeywordSource;
    use crate::parser::parse_str;

    const DOC: &str = "---\ntitle: A Complete Guide to Rust Web Scraping in 2024\ndescription: Learn how to build fast and reliable web scrapers in Rust with reqwest, scraper and async tasks, from first request to production.\n---\n\n# Rust Web Scraping Guide\n\nRust web scraping is fast. This guide covers rust web scraping basics.\n\n## Setup\n\nSee [setup](/setup), [crates](/crates) and [async](/async).\n";

    fn no_ai() -> Analyzer {
        Analyzer::new(AuditConfig::default()).with_ai_engine(None)
    }

    fn check_sum_invariant(report: &SeoReport) {
        let sum = report.metadata_score + report.structure_score + report.keyword_score + report.ai_score;
        assert!((report.total_score - sum).abs() < 1e-9, "{} vs {}", report.total_score, sum);
        assert!(report.metadata_score <= 30.0);
        assert!(report.structure_score <= 25.0);
        assert!(report.keyword_score <= 20.0);
        assert!(report.ai_score <= 25.0);
    }

    #[test]
    fn test_user_keywords_used_verbatim() {
        let doc = parse_str(DOC);
        let keywords = vec![" Rust".to_string(), "web Scraping ".to_string()];
        let report = no_ai().analyze_document("doc.md", &doc, &keywords);
        assert_eq!(report.user_keywords, keywords);
        assert_eq!(report.keywords_used(), keywords.as_slice());
        assert!(report.extracted_keywords.is_empty());
        assert_eq!(report.keyword_source(), KeywordSource::User);
        check_sum_invariant(&report);
    }

    #[test]
    fn test_keywords_extracted_when_absent() {
        let doc = parse_str(DOC);
        let report = no_ai().analyze_document("doc.md", &doc, &[]);
        assert!(!report.extracted_keywords.is_empty());
        assert!(report.extracted_keywords.len() <= 5);
        assert_eq!(report.keywords_used(), report.extracted_keywords.as_slice());
        assert_eq!(report.keyword_source(), KeywordSource::Extracted);
    }

    #[test]
    fn test_without_ai_total_is_rules_only() {
        let doc = parse_str(DOC);
        let report = no_ai().analyze_document("doc.md", &doc, &[]);
        assert_eq!(report.ai_score, 0.0);
        assert!(report.ai_analysis.is_none());
        assert!(report.total_score <= 75.0);
        check_sum_invariant(&report);
    }

    #[test]
    fn test_ai_contributes_score() {
        let engine = AiEngine::with_backend(
            ScriptedBackend::new(vec![Ok(GOOD_REPLY.into())]),
            &fast_settings(1),
        );
        let analyzer = no_ai().with_ai_engine(Some(engine));
        assert!(analyzer.ai_enabled());

        let report = analyzer.analyze_document("doc.md", &parse_str(DOC), &[]);
        assert_eq!(report.ai_score, 20.0);
        assert!(report.ai_analysis.is_some());
        check_sum_invariant(&report);
    }

    #[test]
    fn test_ai_failure_degrades_to_zero() {
        let engine = AiEngine::with_backend(
            ScriptedBackend::new(vec![Err(AiError::RateLimited("429".into()))]),
            &fast_settings(1),
        );
        let analyzer = no_ai().with_ai_engine(Some(engine));
        let report = analyzer.analyze_document("doc.md", &parse_str(DOC), &[]);
        assert_eq!(report.ai_score, 0.0);
        assert!(report.ai_analysis.is_none());
    }

    #[test]
    fn test_display_scores_match_findings() {
        let report = no_ai().analyze_document("doc.md", &parse_str(DOC), &[]);
        for category in Category::ALL {
            let sum: f64 = report.findings_in(category).map(|f| f.score).sum();
            assert!((round1(sum) - report.category_score(category)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_analyze_file_errors() {
        let err = no_ai()
            .analyze_file(Path::new("/nonexistent/doc.md"), &[])
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::Parse(ParseError::NotFound { .. })));
    }

    #[test]
    fn test_analyze_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("post.md");
        std::fs::write(&path, DOC).unwrap();
        let report = no_ai().analyze_file(&path, &[]).unwrap();
        assert_eq!(report.file_path, path.display().to_string());
    }
}
