/*!
 * Context assembly for translation batches.
 *
 * Combines translation memory matches, glossary terms and source usage into
 * one `PromptContext`. Assembly only reads from the stores, so any number of
 * batches can be assembled concurrently. Output ordering depends only on the
 * input and the store contents:
 * - string contexts follow the input order
 * - glossary terms appear in first-seen order
 * - memory matches are ranked by similarity, then source, then translation
 */

use log::debug;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::app_config::AppContextConfig;
use crate::translation::context::model::{PromptContext, StringContext, StringEntry};
use crate::translation::context::usage::{StringUsageContext, UsageAnalyzer};
use crate::translation::glossary::{GlossaryMatch, GlossaryStore};
use crate::translation::memory::{TmMatch, TranslationMemoryStore};

/// Memory matches fetched for each string
pub const MATCHES_PER_ENTRY: usize = 3;

/// Memory matches kept for the whole batch
pub const MAX_BATCH_MATCHES: usize = 5;

/// Builds prompt context for batches of strings
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    config: AppContextConfig,
    memory: Option<TranslationMemoryStore>,
    glossary: Option<GlossaryStore>,
    usage_analyzer: Option<Arc<dyn UsageAnalyzer>>,
}

impl ContextAssembler {
    /// Create an assembler with no stores attached
    pub fn new(config: AppContextConfig) -> Self {
        Self {
            config,
            memory: None,
            glossary: None,
            usage_analyzer: None,
        }
    }

    /// Attach a translation memory.
    pub fn with_memory(mut self, memory: TranslationMemoryStore) -> Self {
        self.memory = Some(memory);
        self
    }

    /// Attach a glossary.
    pub fn with_glossary(mut self, glossary: GlossaryStore) -> Self {
        self.glossary = Some(glossary);
        self
    }

    /// Attach a usage analyzer.
    pub fn with_usage_analyzer(mut self, analyzer: Arc<dyn UsageAnalyzer>) -> Self {
        self.usage_analyzer = Some(analyzer);
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &AppContextConfig {
        &self.config
    }

    /// App summary placed at the top of every prompt
    pub fn app_context(&self) -> String {
        let config = &self.config;
        let mut lines = vec![format!("App: {}", config.app_name)];
        if !config.app_description.trim().is_empty() {
            lines.push(format!("Description: {}", config.app_description.trim()));
        }
        lines.push(format!("Domain: {}", config.domain));
        lines.push(format!("Tone: {}", config.tone));
        lines.push(format!("Formality: {}", config.formality.description()));
        lines.join("\n")
    }

    /// Build the full context for a batch.
    ///
    /// Usage is resolved for all keys with a single analyzer call.
    pub async fn build_context(&self, entries: &[StringEntry], target_language: &str) -> PromptContext {
        let usage = self.resolve_usage(entries).await;
        self.assemble(entries, target_language, &usage, self.config.enable_translation_memory)
    }

    /// Build a terminology-only context: no usage analysis, no memory lookups
    pub fn build_simple_context(&self, entries: &[StringEntry], target_language: &str) -> PromptContext {
        self.assemble(entries, target_language, &HashMap::new(), false)
    }

    async fn resolve_usage(&self, entries: &[StringEntry]) -> HashMap<String, StringUsageContext> {
        if !self.config.enable_usage_analysis {
            return HashMap::new();
        }
        let (Some(project_path), Some(analyzer)) = (&self.config.project_path, &self.usage_analyzer) else {
            debug!("Usage analysis enabled but no project path or analyzer configured");
            return HashMap::new();
        };

        let mut seen = HashSet::new();
        let keys: Vec<String> = entries
            .iter()
            .filter(|e| seen.insert(e.key.as_str()))
            .map(|e| e.key.clone())
            .collect();

        let usage = analyzer.analyze_usage(&keys, project_path).await;
        debug!("Resolved usage for {}/{} keys", usage.len(), keys.len());
        usage
    }

    fn assemble(
        &self,
        entries: &[StringEntry],
        target_language: &str,
        usage: &HashMap<String, StringUsageContext>,
        use_memory: bool,
    ) -> PromptContext {
        let glossary = self.glossary.as_ref().filter(|_| self.config.enable_glossary);
        let memory = self.memory.as_ref().filter(|_| use_memory);

        let mut string_contexts = Vec::with_capacity(entries.len());
        let mut glossary_terms: Vec<GlossaryMatch> = Vec::new();
        let mut seen_terms: HashSet<String> = HashSet::new();
        let mut candidates: Vec<TmMatch> = Vec::new();

        for entry in entries {
            let terms = glossary.map(|g| g.find_terms(&entry.value)).unwrap_or_default();
            for term in &terms {
                if seen_terms.insert(term.dedup_key().to_string()) {
                    glossary_terms.push(term.clone());
                }
            }

            if let Some(memory) = memory {
                candidates.extend(memory.find_similar(&entry.value, target_language, Some(MATCHES_PER_ENTRY)));
            }

            string_contexts.push(StringContext {
                key: entry.key.clone(),
                value: entry.value.clone(),
                comment: entry.comment.clone(),
                usage_context: usage.get(&entry.key).cloned(),
                glossary_terms: terms,
            });
        }

        let translation_memory_matches = rank_matches(candidates);
        debug!(
            "Assembled context for {} strings: {} glossary terms, {} memory matches",
            string_contexts.len(),
            glossary_terms.len(),
            translation_memory_matches.len()
        );

        PromptContext {
            app_context: self.app_context(),
            string_contexts,
            glossary_terms,
            translation_memory_matches,
            target_language: target_language.to_string(),
        }
    }
}

/// Deduplicate by full match identity, rank best first, keep the top matches
fn rank_matches(candidates: Vec<TmMatch>) -> Vec<TmMatch> {
    let mut unique: Vec<TmMatch> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !unique.iter().any(|m| m.dedup_key() == candidate.dedup_key()) {
            unique.push(candidate);
        }
    }

    unique.sort_by(|a, b| {
        b.similarity
            .total_cmp(&a.similarity)
            .then_with(|| a.source_text.cmp(&b.source_text))
            .then_with(|| a.translation.cmp(&b.translation))
    });
    unique.truncate(MAX_BATCH_MATCHES);
    unique
}
