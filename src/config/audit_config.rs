//! Audit configuration support
//!
//! Loads scoring rules and LLM settings from `md-audit.json`,
//! `md-audit.toml`, or the user config directory.
//!
//! # Configuration Format
//!
//! ```json
//! {
//!   "title_rules": { "min_length": 30, "max_length": 60 },
//!   "description_rules": { "min_length": 120, "max_length": 160 },
//!   "keyword_rules": { "min_density": 0.01, "max_density": 0.025, "max_auto_keywords": 5 },
//!   "content_rules": { "min_h1_count": 1, "max_h1_count": 1, "min_image_alt_ratio": 0.8 },
//!   "llm_base_url": "https://api.openai.com/v1",
//!   "llm_model": "gpt-4o",
//!   "llm_timeout": 30,
//!   "llm_max_retries": 3,
//!   "enable_ai_analysis": true
//! }
//! ```
//!
//! Precedence is defaults < file < environment. The environment is only
//! read by [`EnvOverrides::from_env`]; everything else is pure.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name written by `md-audit init` and searched in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "md-audit.json";

const TOML_CONFIG_FILE: &str = "md-audit.toml";

/// Title length rules (metadata category)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleRules {
    pub min_length: usize,
    pub max_length: usize,
    /// Points for a title within range
    #[serde(alias = "weight")]
    pub points: f64,
    /// Points for a title shorter than `min_length`
    pub short_points: f64,
    /// Points for a title longer than `max_length`
    pub long_points: f64,
}

impl Default for TitleRules {
    fn default() -> Self {
        Self {
            min_length: 30,
            max_length: 60,
            points: 15.0,
            short_points: 7.5,
            long_points: 10.0,
        }
    }
}

/// Description length rules (metadata category)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptionRules {
    pub min_length: usize,
    pub max_length: usize,
    #[serde(alias = "weight")]
    pub points: f64,
    pub short_points: f64,
    pub long_points: f64,
}

impl Default for DescriptionRules {
    fn default() -> Self {
        Self {
            min_length: 120,
            max_length: 160,
            points: 15.0,
            short_points: 7.5,
            long_points: 10.0,
        }
    }
}

/// Keyword density and placement rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordRules {
    pub min_density: f64,
    pub max_density: f64,
    /// How many keywords to auto-extract when the user supplies none
    pub max_auto_keywords: usize,
    /// Flat score when no keywords are available at all
    pub baseline_points: f64,
    pub density_points: f64,
    pub low_density_points: f64,
    pub high_density_points: f64,
    pub title_points: f64,
    pub description_points: f64,
    pub h1_points: f64,
    /// Position score at or above which the check is a success
    pub position_success_at: f64,
    /// Position score at or above which the check is only a warning
    pub position_warning_at: f64,
}

impl Default for KeywordRules {
    fn default() -> Self {
        Self {
            min_density: 0.01,
            max_density: 0.025,
            max_auto_keywords: 5,
            baseline_points: 10.0,
            density_points: 10.0,
            low_density_points: 5.0,
            high_density_points: 7.0,
            title_points: 4.0,
            description_points: 3.0,
            h1_points: 3.0,
            position_success_at: 7.0,
            position_warning_at: 4.0,
        }
    }
}

/// Content structure rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentRules {
    /// Advisory minimum word count
    pub min_length: usize,
    pub min_h1_count: usize,
    pub max_h1_count: usize,
    pub min_image_alt_ratio: f64,
    pub h1_points: f64,
    /// Points when there are more H1 headings than allowed
    pub extra_h1_points: f64,
    pub image_alt_points: f64,
    /// Link count at which the link check awards full points
    pub min_links: usize,
    pub link_points: f64,
    pub few_links_points: f64,
}

impl Default for ContentRules {
    fn default() -> Self {
        Self {
            min_length: 300,
            min_h1_count: 1,
            max_h1_count: 1,
            min_image_alt_ratio: 0.8,
            h1_points: 5.0,
            extra_h1_points: 2.5,
            image_alt_points: 10.0,
            min_links: 3,
            link_points: 10.0,
            few_links_points: 5.0,
        }
    }
}

/// LLM backend settings
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    #[serde(rename = "enable_ai_analysis")]
    pub enabled: bool,
    #[serde(rename = "llm_api_key")]
    pub api_key: String,
    /// OpenAI-compatible base URL (without `/chat/completions`)
    #[serde(rename = "llm_base_url")]
    pub base_url: String,
    #[serde(rename = "llm_model")]
    pub model: String,
    #[serde(rename = "llm_timeout")]
    pub timeout_secs: u64,
    #[serde(rename = "llm_max_retries")]
    pub max_retries: u32,
    #[serde(rename = "llm_temperature")]
    pub temperature: f32,
    /// Base backoff between attempts, doubled each retry
    #[serde(rename = "llm_backoff_ms")]
    pub backoff_ms: u64,
    /// Base backoff after a rate-limit response
    #[serde(rename = "llm_rate_limit_backoff_ms")]
    pub rate_limit_backoff_ms: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            timeout_secs: 30,
            max_retries: 3,
            temperature: 0.3,
            backoff_ms: 1000,
            rate_limit_backoff_ms: 5000,
        }
    }
}

impl std::fmt::Debug for AiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = if self.api_key.is_empty() { "<unset>" } else { "<redacted>" };
        f.debug_struct("AiSettings")
            .field("enabled", &self.enabled)
            .field("api_key", &key)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("temperature", &self.temperature)
            .field("backoff_ms", &self.backoff_ms)
            .field("rate_limit_backoff_ms", &self.rate_limit_backoff_ms)
            .finish()
    }
}

impl AiSettings {
    /// AI scoring is requested and a credential is present
    pub fn is_usable(&self) -> bool {
        self.enabled && !self.api_key.is_empty()
    }
}

/// Full audit configuration, immutable once resolved
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    #[serde(rename = "title_rules")]
    pub title: TitleRules,
    #[serde(rename = "description_rules")]
    pub description: DescriptionRules,
    #[serde(rename = "keyword_rules")]
    pub keywords: KeywordRules,
    #[serde(rename = "content_rules")]
    pub content: ContentRules,
    #[serde(flatten)]
    pub ai: AiSettings,
}

/// Environment-provided overrides for credential and AI fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvOverrides {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub enable_ai: Option<bool>,
}

impl EnvOverrides {
    /// Read `MD_AUDIT_*` variables from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build overrides from any variable lookup. Empty values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());
        Self {
            api_key: get("MD_AUDIT_LLM_API_KEY"),
            base_url: get("MD_AUDIT_LLM_BASE_URL"),
            model: get("MD_AUDIT_LLM_MODEL"),
            enable_ai: get("MD_AUDIT_ENABLE_AI").map(|v| parse_flag(&v)),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

impl AuditConfig {
    /// Apply defaults, then file values, then environment overrides
    pub fn resolve(file: Option<AuditConfig>, env: &EnvOverrides) -> AuditConfig {
        let mut config = file.unwrap_or_default();

        if let Some(key) = &env.api_key {
            config.ai.api_key = key.clone();
        }
        if let Some(url) = &env.base_url {
            config.ai.base_url = url.clone();
        }
        if let Some(model) = &env.model {
            config.ai.model = model.clone();
        }
        if let Some(enabled) = env.enable_ai {
            config.ai.enabled = enabled;
        }

        config
    }

    /// Render the config as JSON with the credential blanked
    pub fn to_json_template(&self) -> anyhow::Result<String> {
        let mut copy = self.clone();
        copy.ai.api_key.clear();
        Ok(serde_json::to_string_pretty(&copy)?)
    }

    /// Human-readable problems with the configured thresholds
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.title.min_length > self.title.max_length {
            problems.push(format!(
                "title_rules: min_length ({}) exceeds max_length ({})",
                self.title.min_length, self.title.max_length
            ));
        }
        if self.description.min_length > self.description.max_length {
            problems.push(format!(
                "description_rules: min_length ({}) exceeds max_length ({})",
                self.description.min_length, self.description.max_length
            ));
        }
        if self.keywords.min_density > self.keywords.max_density {
            problems.push(format!(
                "keyword_rules: min_density ({}) exceeds max_density ({})",
                self.keywords.min_density, self.keywords.max_density
            ));
        }
        if self.content.min_h1_count > self.content.max_h1_count {
            problems.push(format!(
                "content_rules: min_h1_count ({}) exceeds max_h1_count ({})",
                self.content.min_h1_count, self.content.max_h1_count
            ));
        }
        if !(0.0..=1.0).contains(&self.content.min_image_alt_ratio) {
            problems.push(format!(
                "content_rules: min_image_alt_ratio ({}) must be between 0 and 1",
                self.content.min_image_alt_ratio
            ));
        }
        if self.ai.max_retries == 0 {
            problems.push("llm_max_retries must be at least 1".to_string());
        }

        problems
    }
}

/// Candidate config files, in search order
fn config_search_paths(dir: &Path) -> Vec<PathBuf> {
    let mut paths = vec![dir.join(DEFAULT_CONFIG_FILE), dir.join(TOML_CONFIG_FILE)];
    if let Some(user_dir) = dirs::config_dir() {
        paths.push(user_dir.join("md-audit").join("config.json"));
    }
    paths
}

/// Load configuration, searching the current working directory.
///
/// Searches in this order:
/// 1. `explicit` (errors if it cannot be read or parsed)
/// 2. `./md-audit.json`
/// 3. `./md-audit.toml`
/// 4. `<config dir>/md-audit/config.json`
///
/// Falls back to built-in defaults. Environment overrides are applied last.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<AuditConfig> {
    let cwd = std::env::current_dir().context("Could not determine working directory")?;
    load_config_from(explicit, &cwd, &EnvOverrides::from_env())
}

/// Same as [`load_config`] with an explicit search directory and environment
pub fn load_config_from(
    explicit: Option<&Path>,
    search_dir: &Path,
    env: &EnvOverrides,
) -> anyhow::Result<AuditConfig> {
    let file_config = match explicit {
        Some(path) => Some(
            load_config_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
        ),
        None => find_config_file(search_dir),
    };

    let config = AuditConfig::resolve(file_config, env);
    for problem in config.validate() {
        warn!("Config: {}", problem);
    }
    Ok(config)
}

fn find_config_file(search_dir: &Path) -> Option<AuditConfig> {
    for path in config_search_paths(search_dir) {
        if !path.exists() {
            continue;
        }
        match load_config_file(&path) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                return Some(config);
            }
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
            }
        }
    }

    debug!("No config file found, using defaults");
    None
}

/// Load a config file, choosing the format by extension (JSON unless `.toml`)
fn load_config_file(path: &Path) -> anyhow::Result<AuditConfig> {
    let content = std::fs::read_to_string(path)?;
    let is_toml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

    let config = if is_toml {
        toml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };
    Ok(config)
}
