//! Deterministic SEO rule checks
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 RulesEngine                  │
//! │  - Holds the scoring configuration           │
//! │  - Runs every check in a fixed order         │
//! │  - Clamps each category to its cap           │
//! └──────────────────────────────────────────────┘
//!                        │
//!        ┌───────────────┼────────────────┐
//!        ▼               ▼                ▼
//! ┌─────────────┐ ┌──────────────┐ ┌─────────────┐
//! │ metadata    │ │ structure    │ │ keywords    │
//! │ title, desc │ │ h1, alt,     │ │ density,    │
//! │   (≤30)     │ │ links (≤25)  │ │ position    │
//! │             │ │              │ │   (≤20)     │
//! └─────────────┘ └──────────────┘ └─────────────┘
//! ```
//!
//! Every check emits exactly one finding, including "not applicable"
//! outcomes such as a document without images.

mod keywords;
mod metadata;
mod structure;

use crate::config::AuditConfig;
use crate::models::{Category, Finding};
use crate::parser::ParsedDocument;

/// Result of running all rule checks on one document
#[derive(Debug, Clone, PartialEq)]
pub struct RulesOutcome {
    /// Findings ordered metadata, structure, keywords
    pub findings: Vec<Finding>,
    pub metadata_score: f64,
    pub structure_score: f64,
    pub keyword_score: f64,
}

impl RulesOutcome {
    /// Combined rules score (at most 75)
    pub fn total(&self) -> f64 {
        self.metadata_score + self.structure_score + self.keyword_score
    }
}

/// Applies the configured rule set to parsed documents
#[derive(Debug, Clone, Default)]
pub struct RulesEngine {
    config: AuditConfig,
}

impl RulesEngine {
    pub fn new(config: &AuditConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Run every check against `doc` using `keywords` as the target set
    pub fn check_all(&self, doc: &ParsedDocument, keywords: &[String]) -> RulesOutcome {
        let mut findings = Vec::new();

        let metadata = metadata::check(doc, &self.config.title, &self.config.description, &mut findings);
        let structure = structure::check(doc, &self.config.content, &mut findings);
        let keyword = keywords::check(doc, keywords, &self.config.keywords, &mut findings);

        RulesOutcome {
            findings,
            metadata_score: metadata.clamp(0.0, Category::Metadata.cap()),
            structure_score: structure.clamp(0.0, Category::Structure.cap()),
            keyword_score: keyword.clamp(0.0, Category::Keywords.cap()),
        }
    }
}
