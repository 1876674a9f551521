//! md-audit - Markdown SEO audit
//!
//! Scores markdown documents out of 100 across four categories: metadata,
//! structure and keyword usage from deterministic rules, plus an optional
//! semantic score from an OpenAI-compatible model.
//!
//! ```no_run
//! use md_audit::analyzer::Analyzer;
//! use md_audit::config::load_config;
//! use md_audit::reporters::{self, OutputFormat};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let analyzer = Analyzer::new(load_config(None)?);
//! let report = analyzer.analyze_file(Path::new("README.md"), &[])?;
//! println!("{}", reporters::report(&report, OutputFormat::Markdown)?);
//! # Ok(())
//! # }
//! ```

pub mod ai;
pub mod analyzer;
pub mod config;
pub mod models;
pub mod parser;
pub mod reporters;
pub mod rules;
