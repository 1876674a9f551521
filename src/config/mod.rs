//! Configuration module for md-audit
//!
//! This module handles:
//! - Scoring thresholds and per-check point values
//! - LLM backend settings
//! - Loading from `md-audit.json` / `md-audit.toml` with env overrides

mod audit_config;

pub use audit_config::{
    load_config,
    load_config_from,
    AiSettings,
    AuditConfig,
    ContentRules,
    DescriptionRules,
    EnvOverrides,
    KeywordRules,
    TitleRules,
    DEFAULT_CONFIG_FILE,
};
