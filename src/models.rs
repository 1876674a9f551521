//! Core data models for md-audit
//!
//! These models are shared by the rules engine, the AI engine, the
//! analyzer and the reporters. Everything here is plain data: built once
//! per analysis run and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// Maximum points the metadata checks can contribute
pub const METADATA_CAP: f64 = 30.0;
/// Maximum points the structure checks can contribute
pub const STRUCTURE_CAP: f64 = 25.0;
/// Maximum points the keyword checks can contribute
pub const KEYWORD_CAP: f64 = 20.0;
/// Maximum points the AI semantic analysis can contribute
pub const AI_CAP: f64 = 25.0;

/// Round a score to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// How strongly a finding should be acted upon
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
    Success,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
            Severity::Success => write!(f, "success"),
        }
    }
}

/// Rubric category a finding belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Metadata,
    Structure,
    Keywords,
}

impl Category {
    /// Fixed display order used by every reporter
    pub const ALL: [Category; 3] = [Category::Metadata, Category::Structure, Category::Keywords];

    /// Maximum points for this category
    pub fn cap(&self) -> f64 {
        match self {
            Category::Metadata => METADATA_CAP,
            Category::Structure => STRUCTURE_CAP,
            Category::Keywords => KEYWORD_CAP,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Metadata => "Metadata",
            Category::Structure => "Structure",
            Category::Keywords => "Keywords",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Metadata => write!(f, "metadata"),
            Category::Structure => write!(f, "structure"),
            Category::Keywords => write!(f, "keywords"),
        }
    }
}

/// A single diagnostic produced by the rules engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub category: Category,
    /// Check identifier, e.g. `title_length`
    pub check: String,
    pub severity: Severity,
    /// Points this check contributed to its category
    pub score: f64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_value: Option<String>,
}

impl Finding {
    pub fn new(
        category: Category,
        check: impl Into<String>,
        severity: Severity,
        score: f64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            check: check.into(),
            severity,
            score,
            message: message.into(),
            suggestion: None,
            current_value: None,
            expected_value: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_current(mut self, value: impl Into<String>) -> Self {
        self.current_value = Some(value.into());
        self
    }

    pub fn with_expected(mut self, value: impl Into<String>) -> Self {
        self.expected_value = Some(value.into());
        self
    }
}

/// Summary of findings by severity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingsSummary {
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
    pub success: usize,
    pub total: usize,
}

impl FindingsSummary {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut summary = Self::default();
        for f in findings {
            match f.severity {
                Severity::Critical => summary.critical += 1,
                Severity::Warning => summary.warning += 1,
                Severity::Info => summary.info += 1,
                Severity::Success => summary.success += 1,
            }
            summary.total += 1;
        }
        summary
    }
}

/// Semantic assessment returned by the language model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiAnalysis {
    pub relevance_score: f64,
    pub depth_score: f64,
    pub readability_score: f64,
    #[serde(default)]
    pub overall_feedback: String,
    #[serde(default)]
    pub improvement_suggestions: Vec<String>,
}

/// Where the keywords used for a run came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordSource {
    User,
    Extracted,
    None,
}

/// Complete SEO report for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoReport {
    pub file_path: String,
    pub total_score: f64,
    pub metadata_score: f64,
    pub structure_score: f64,
    pub keyword_score: f64,
    pub ai_score: f64,
    pub findings: Vec<Finding>,
    #[serde(default)]
    pub ai_analysis: Option<AiAnalysis>,
    /// Keywords extracted from the body (empty when the user supplied some)
    #[serde(default)]
    pub extracted_keywords: Vec<String>,
    #[serde(default)]
    pub user_keywords: Vec<String>,
}

impl SeoReport {
    /// Badge for the total score
    pub fn badge(&self) -> &'static str {
        score_badge(self.total_score)
    }

    /// Keywords the rules engine actually ran with
    pub fn keywords_used(&self) -> &[String] {
        if self.user_keywords.is_empty() {
            &self.extracted_keywords
        } else {
            &self.user_keywords
        }
    }

    pub fn keyword_source(&self) -> KeywordSource {
        if !self.user_keywords.is_empty() {
            KeywordSource::User
        } else if !self.extracted_keywords.is_empty() {
            KeywordSource::Extracted
        } else {
            KeywordSource::None
        }
    }

    pub fn findings_summary(&self) -> FindingsSummary {
        FindingsSummary::from_findings(&self.findings)
    }

    /// Findings in one category, in engine order
    pub fn findings_in(&self, category: Category) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.category == category)
    }

    pub fn category_score(&self, category: Category) -> f64 {
        match category {
            Category::Metadata => self.metadata_score,
            Category::Structure => self.structure_score,
            Category::Keywords => self.keyword_score,
        }
    }
}

/// Four-tier badge: red below 40, orange below 60, yellow below 80, green otherwise
pub fn score_badge(score: f64) -> &'static str {
    if score < 40.0 {
        "🔴"
    } else if score < 60.0 {
        "🟠"
    } else if score < 80.0 {
        "🟡"
    } else {
        "🟢"
    }
}
