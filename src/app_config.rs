use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;
use crate::file_utils::FileManager;
use crate::translation::context::SourceUsageAnalyzer;
use crate::translation::glossary::GlossaryTermRecord;
use crate::translation::memory::MemoryOptions;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// App description used to build prompt context
    #[serde(default)]
    pub app: AppContextConfig,

    /// Translation memory settings
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Glossary settings
    #[serde(default)]
    pub glossary: GlossaryConfig,

    /// Source usage analysis settings
    #[serde(default)]
    pub usage: UsageConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Register the translations should use
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Formality {
    // @formality: Polite forms (vous, Sie, usted)
    Formal,
    // @formality: Familiar forms (tu, du, tú)
    Informal,
    // @formality: Whatever is usual for UI text in the target language
    #[default]
    Neutral,
}

impl Formality {
    // @returns: Guidance sentence for prompts
    pub fn description(&self) -> &'static str {
        match self {
            Self::Formal => "formal (polite forms of address)",
            Self::Informal => "informal (familiar forms of address)",
            Self::Neutral => "neutral (the usual register for app UI text)",
        }
    }
}

impl std::fmt::Display for Formality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Formal => "formal",
            Self::Informal => "informal",
            Self::Neutral => "neutral",
        };
        write!(f, "{}", name)
    }
}

/// Context assembly configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppContextConfig {
    /// App name shown to translators
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// One or two sentences about what the app does
    #[serde(default)]
    pub app_description: String,

    /// Domain, e.g. "fitness", "finance"
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Tone, e.g. "friendly", "professional"
    #[serde(default = "default_tone")]
    pub tone: String,

    /// Register to translate in
    #[serde(default)]
    pub formality: Formality,

    /// Project root scanned for key usage
    #[serde(default)]
    pub project_path: Option<PathBuf>,

    /// Resolve source-code usage context for keys
    #[serde(default = "default_true")]
    pub enable_usage_analysis: bool,

    /// Look up translation memory matches
    #[serde(default = "default_true")]
    pub enable_translation_memory: bool,

    /// Look up glossary terms
    #[serde(default = "default_true")]
    pub enable_glossary: bool,
}

impl Default for AppContextConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            app_description: String::new(),
            domain: default_domain(),
            tone: default_tone(),
            formality: Formality::default(),
            project_path: None,
            enable_usage_analysis: true,
            enable_translation_memory: true,
            enable_glossary: true,
        }
    }
}

/// Translation memory configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MemoryConfig {
    /// Memory file; the shared per-user memory when unset
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Minimum similarity (0.0-1.0) for fuzzy matches
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f64,

    /// Maximum fuzzy matches per lookup
    #[serde(default = "default_max_matches")]
    pub max_matches: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            path: None,
            min_similarity: default_min_similarity(),
            max_matches: default_max_matches(),
        }
    }
}

impl MemoryConfig {
    /// Query options for the memory store
    pub fn options(&self) -> MemoryOptions {
        MemoryOptions {
            min_similarity: self.min_similarity,
            max_matches: self.max_matches,
        }
    }

    /// Memory file location.
    ///
    /// An explicit path wins; otherwise the per-user data directory is used
    /// so translations are shared between projects.
    pub fn resolved_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }
        match dirs::data_dir() {
            Some(dir) => dir.join("locmem").join("translation-memory.json"),
            None => PathBuf::from(".locmem").join("translation-memory.json"),
        }
    }
}

/// Glossary configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GlossaryConfig {
    /// Glossary file
    #[serde(default = "default_glossary_path")]
    pub path: PathBuf,

    /// Terms written by `glossary init`
    #[serde(default)]
    pub terms: Vec<GlossaryTermRecord>,
}

impl Default for GlossaryConfig {
    fn default() -> Self {
        Self {
            path: default_glossary_path(),
            terms: Vec::new(),
        }
    }
}

/// Source usage analysis configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UsageConfig {
    /// Source file extensions to scan
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory names never scanned
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            exclude_dirs: default_exclude_dirs(),
        }
    }
}

impl UsageConfig {
    /// Analyzer scanning the configured files
    pub fn analyzer(&self) -> SourceUsageAnalyzer {
        SourceUsageAnalyzer::new(self.extensions.clone(), self.exclude_dirs.clone())
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_app_name() -> String {
    "App".to_string()
}

fn default_domain() -> String {
    "general".to_string()
}

fn default_tone() -> String {
    "friendly".to_string()
}

fn default_true() -> bool {
    true
}

fn default_min_similarity() -> f64 {
    0.7
}

fn default_max_matches() -> usize {
    5
}

fn default_glossary_path() -> PathBuf {
    PathBuf::from(".locmem").join("glossary.json")
}

fn default_extensions() -> Vec<String> {
    vec!["swift".to_string(), "m".to_string(), "mm".to_string()]
}

fn default_exclude_dirs() -> Vec<String> {
    vec![
        "build".to_string(),
        "DerivedData".to_string(),
        "Pods".to_string(),
        "Carthage".to_string(),
        "node_modules".to_string(),
    ]
}

impl Config {
    /// Load the configuration file, falling back to defaults when it is absent
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let Some(content) = FileManager::read_optional(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?
        else {
            warn!("Config file not found at {:?}, using defaults.", path);
            return Ok(Self::default());
        };

        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        FileManager::write_to_file(path, &json)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.memory.min_similarity) {
            return Err(ConfigError::InvalidSimilarity(self.memory.min_similarity));
        }
        if self.memory.max_matches == 0 {
            return Err(ConfigError::InvalidMaxMatches);
        }
        if self.app.app_name.trim().is_empty() {
            return Err(ConfigError::MissingValue("app.app_name"));
        }
        for record in &self.glossary.terms {
            for language in record.translations.keys() {
                crate::language_utils::validate_locale(language)?;
            }
        }
        Ok(())
    }
}
