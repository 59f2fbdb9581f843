/*!
 * Translation memory.
 *
 * Persists source -> translation history across runs and answers exact and
 * fuzzy similarity queries. The store is a cheap-to-clone handle: clones
 * share the same entries, mutations are serialized behind a write lock and
 * queries only take the read lock.
 */

use chrono::{DateTime, Utc};
use log::{debug, info};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::StoreError;
use crate::file_utils::FileManager;
use crate::translation::fuzzy;

/// Version written to and accepted from translation memory documents
pub const MEMORY_DOCUMENT_VERSION: &str = "1.0";

/// Confidence recorded for translations nobody has reviewed yet
const UNREVIEWED_CONFIDENCE: f64 = 0.9;

/// How much a stored translation can be trusted.
///
/// Variants are ordered; an entry's quality never moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TranslationQuality {
    /// Produced by a translation backend
    #[default]
    MachineTranslated,
    /// Produced by a backend, then approved by a person
    HumanReviewed,
    /// Written by a person
    HumanTranslated,
}

/// A single translation of an entry into one language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedText {
    /// Translated text
    pub value: String,

    /// Backend that produced the translation
    #[serde(default)]
    pub provider: Option<String>,

    /// Whether a person approved this translation
    #[serde(default)]
    pub reviewed_by_human: bool,

    /// Confidence score (0.0-1.0), 1.0 whenever reviewed
    pub confidence: f64,
}

/// A source string and all its known translations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TmEntry {
    /// Exact source text, also the entry key
    pub source_text: String,

    /// Translations keyed by language code, at most one per language
    #[serde(default)]
    pub translations: BTreeMap<String, TranslatedText>,

    /// Developer comment or other context recorded with the entry
    #[serde(default)]
    pub context: Option<String>,

    /// Last time the entry was written
    pub last_used: DateTime<Utc>,

    /// Entry quality
    #[serde(default)]
    pub quality: TranslationQuality,
}

impl TmEntry {
    fn new(source_text: &str, now: DateTime<Utc>) -> Self {
        Self {
            source_text: source_text.to_string(),
            translations: BTreeMap::new(),
            context: None,
            last_used: now,
            quality: TranslationQuality::MachineTranslated,
        }
    }
}

/// A translation memory hit for a query string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TmMatch {
    /// Stored source text that matched
    pub source_text: String,

    /// Stored translation for the queried language
    pub translation: String,

    /// Normalized similarity to the query (1.0 = exact)
    pub similarity: f64,

    /// Backend that produced the stored translation
    pub provider: Option<String>,

    /// Whether the stored translation was reviewed by a person
    pub human_reviewed: bool,
}

/// Identity of a [`TmMatch`] for deduplication: every field, with the
/// similarity compared by its exact bit pattern.
pub type TmMatchKey<'a> = (&'a str, &'a str, u64, Option<&'a str>, bool);

impl TmMatch {
    /// Key under which two matches count as the same match.
    ///
    /// Matches are only merged when every field is identical, so the same
    /// stored entry reached with two different similarity scores is kept twice.
    pub fn dedup_key(&self) -> TmMatchKey<'_> {
        (
            &self.source_text,
            &self.translation,
            self.similarity.to_bits(),
            self.provider.as_deref(),
            self.human_reviewed,
        )
    }

    fn from_entry(entry: &TmEntry, text: &TranslatedText, similarity: f64) -> Self {
        Self {
            source_text: entry.source_text.clone(),
            translation: text.value.clone(),
            similarity,
            provider: text.provider.clone(),
            human_reviewed: text.reviewed_by_human,
        }
    }
}

/// Aggregate figures about the memory contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStatistics {
    /// Number of distinct source strings
    pub total_entries: usize,

    /// Number of translations per language
    pub translations_by_language: BTreeMap<String, usize>,

    /// Number of translations reviewed by a person
    pub human_reviewed: usize,

    /// Number of translations per provider
    pub by_provider: BTreeMap<String, usize>,
}

/// Query tuning for the memory
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryOptions {
    /// Minimum similarity (0.0-1.0) for a fuzzy match to be returned
    pub min_similarity: f64,

    /// Default number of matches returned by `find_similar`
    pub max_matches: usize,
}

impl Default for MemoryOptions {
    fn default() -> Self {
        Self {
            min_similarity: 0.7,
            max_matches: 5,
        }
    }
}

/// On-disk representation
#[derive(Debug, Serialize, Deserialize)]
struct MemoryDocument {
    version: String,
    #[serde(default)]
    entries: BTreeMap<String, TmEntry>,
}

#[derive(Debug, Default)]
struct MemoryState {
    entries: BTreeMap<String, TmEntry>,
    dirty: bool,
}

/// Persistent translation memory
#[derive(Debug, Clone)]
pub struct TranslationMemoryStore {
    /// Backing file, `None` for a purely in-memory store
    path: Option<PathBuf>,

    /// Query tuning
    options: MemoryOptions,

    /// Shared entries
    state: Arc<RwLock<MemoryState>>,
}

impl TranslationMemoryStore {
    /// Create an empty store backed by `path` without touching the disk
    pub fn new<P: AsRef<Path>>(path: P, options: MemoryOptions) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
            options,
            state: Arc::new(RwLock::new(MemoryState::default())),
        }
    }

    /// Create a store backed by `path` and load it
    pub fn open<P: AsRef<Path>>(path: P, options: MemoryOptions) -> Result<Self, StoreError> {
        let store = Self::new(path, options);
        store.load()?;
        Ok(store)
    }

    /// Create a store with no backing file (for testing and dry runs)
    pub fn in_memory(options: MemoryOptions) -> Self {
        Self {
            path: None,
            options,
            state: Arc::new(RwLock::new(MemoryState::default())),
        }
    }

    /// Backing file path, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Query tuning in effect
    pub fn options(&self) -> &MemoryOptions {
        &self.options
    }

    /// Replace the in-memory entries with the backing file's contents.
    ///
    /// A missing file leaves an empty store; a file that exists but cannot be
    /// read or decoded is an error and leaves the store untouched.
    pub fn load(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let content = FileManager::read_optional(path).map_err(|source| StoreError::Read {
            path: path.clone(),
            source,
        })?;

        let entries = match content {
            Some(content) => {
                let document: MemoryDocument =
                    serde_json::from_str(&content).map_err(|source| StoreError::Decode {
                        path: path.clone(),
                        source,
                    })?;
                check_version(&document.version)?;
                document.entries
            }
            None => {
                debug!("No translation memory at {:?}, starting empty", path);
                BTreeMap::new()
            }
        };

        let mut state = self.state.write();
        state.entries = entries;
        state.dirty = false;
        info!("Loaded {} translation memory entries", state.entries.len());
        Ok(())
    }

    /// Write the store if it changed since the last save.
    ///
    /// Returns whether a write happened.
    pub fn save(&self) -> Result<bool, StoreError> {
        let mut state = self.state.write();
        if !state.dirty {
            debug!("Translation memory unchanged, skipping save");
            return Ok(false);
        }

        if let Some(path) = &self.path {
            let document = MemoryDocument {
                version: MEMORY_DOCUMENT_VERSION.to_string(),
                entries: state.entries.clone(),
            };
            let json = encode_sorted(&document)?;
            FileManager::write_atomic(path, &json).map_err(|source| StoreError::Write {
                path: path.clone(),
                source,
            })?;
            info!("Saved {} translation memory entries to {:?}", state.entries.len(), path);
        }

        state.dirty = false;
        Ok(true)
    }

    /// Write the store unconditionally
    pub fn force_save(&self) -> Result<(), StoreError> {
        self.state.write().dirty = true;
        self.save().map(|_| ())
    }

    /// Whether there are unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.state.read().dirty
    }

    /// Exact lookup of a translation
    pub fn find_exact(&self, text: &str, language: &str) -> Option<String> {
        let state = self.state.read();
        state
            .entries
            .get(text)
            .and_then(|entry| entry.translations.get(language))
            .map(|t| t.value.clone())
    }

    /// Find stored translations whose source is similar to `text`.
    ///
    /// An exact hit is returned alone with similarity 1.0. Otherwise every
    /// entry translated into `language` is scored and those at or above the
    /// minimum similarity are returned, best first, ties in ascending source
    /// order, at most `limit` (default `max_matches`) of them.
    pub fn find_similar(&self, text: &str, language: &str, limit: Option<usize>) -> Vec<TmMatch> {
        let limit = limit.unwrap_or(self.options.max_matches);
        let state = self.state.read();

        if let Some(entry) = state.entries.get(text) {
            if let Some(translated) = entry.translations.get(language) {
                let mut exact = vec![TmMatch::from_entry(entry, translated, 1.0)];
                exact.truncate(limit);
                return exact;
            }
        }

        let text_len = text.chars().count();
        let mut matches: Vec<TmMatch> = state
            .entries
            .values()
            .filter_map(|entry| {
                let translated = entry.translations.get(language)?;

                // The length difference is a lower bound on the edit distance
                let source_len = entry.source_text.chars().count();
                let max_len = text_len.max(source_len);
                if max_len > 0 {
                    let bound = 1.0 - (text_len.abs_diff(source_len) as f64 / max_len as f64);
                    if bound < self.options.min_similarity {
                        return None;
                    }
                }

                let score = fuzzy::similarity(text, &entry.source_text);
                (score >= self.options.min_similarity)
                    .then(|| TmMatch::from_entry(entry, translated, score))
            })
            .collect();

        // Entries iterate in source order, so a stable sort keeps ties lexical
        matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        matches.truncate(limit);

        debug!(
            "Translation memory: {} fuzzy match(es) for '{}' ({})",
            matches.len(),
            truncate_text(text, 30),
            language
        );
        matches
    }

    /// Record a translation.
    ///
    /// New entries start as machine translated. A reviewed write sets
    /// confidence 1.0 and upgrades a machine translated entry to reviewed.
    pub fn store(
        &self,
        source: &str,
        translation: &str,
        language: &str,
        provider: &str,
        context: Option<&str>,
        human_reviewed: bool,
    ) {
        let now = Utc::now();
        let mut guard = self.state.write();
        let state = &mut *guard;
        apply_store(&mut state.entries, source, translation, language, provider, context, human_reviewed, now);
        state.dirty = true;

        debug!(
            "Stored translation for '{}' ({}) from {}",
            truncate_text(source, 30),
            language,
            provider
        );
    }

    /// Record many `(source, translation, language)` triples from one provider
    pub fn store_batch(&self, items: &[(String, String, String)], provider: &str) {
        if items.is_empty() {
            return;
        }

        let now = Utc::now();
        let mut guard = self.state.write();
        let state = &mut *guard;
        for (source, translation, language) in items {
            apply_store(&mut state.entries, source, translation, language, provider, None, false, now);
        }
        state.dirty = true;

        debug!("Stored {} translations from {}", items.len(), provider);
    }

    /// Mark a translation as reviewed by a person.
    ///
    /// Returns false, changing nothing, if there is no such translation.
    pub fn mark_reviewed(&self, source: &str, language: &str) -> bool {
        let mut guard = self.state.write();
        let state = &mut *guard;

        let Some(entry) = state.entries.get_mut(source) else {
            return false;
        };
        let Some(translated) = entry.translations.get_mut(language) else {
            return false;
        };

        translated.reviewed_by_human = true;
        translated.confidence = 1.0;
        entry.quality = entry.quality.max(TranslationQuality::HumanReviewed);
        state.dirty = true;
        true
    }

    /// Remove an entry and all its translations
    pub fn remove(&self, source: &str) -> bool {
        let mut state = self.state.write();
        let removed = state.entries.remove(source).is_some();
        if removed {
            state.dirty = true;
        }
        removed
    }

    /// Remove every entry
    pub fn clear(&self) {
        let mut state = self.state.write();
        if !state.entries.is_empty() {
            state.entries.clear();
            state.dirty = true;
        }
        debug!("Translation memory cleared");
    }

    /// Snapshot of one entry
    pub fn entry(&self, source: &str) -> Option<TmEntry> {
        self.state.read().entries.get(source).cloned()
    }

    /// Number of distinct source strings
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    /// Check if the memory is empty
    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }

    /// Aggregate figures computed from the current contents
    pub fn statistics(&self) -> MemoryStatistics {
        let state = self.state.read();
        let mut stats = MemoryStatistics {
            total_entries: state.entries.len(),
            ..Default::default()
        };

        for entry in state.entries.values() {
            for (language, translated) in &entry.translations {
                *stats.translations_by_language.entry(language.clone()).or_insert(0) += 1;
                if translated.reviewed_by_human {
                    stats.human_reviewed += 1;
                }
                if let Some(provider) = &translated.provider {
                    *stats.by_provider.entry(provider.clone()).or_insert(0) += 1;
                }
            }
        }

        stats
    }
}

#[allow(clippy::too_many_arguments)]
fn apply_store(
    entries: &mut BTreeMap<String, TmEntry>,
    source: &str,
    translation: &str,
    language: &str,
    provider: &str,
    context: Option<&str>,
    human_reviewed: bool,
    now: DateTime<Utc>,
) {
    let entry = entries
        .entry(source.to_string())
        .or_insert_with(|| TmEntry::new(source, now));

    entry.translations.insert(
        language.to_string(),
        TranslatedText {
            value: translation.to_string(),
            provider: Some(provider.to_string()),
            reviewed_by_human: human_reviewed,
            confidence: if human_reviewed { 1.0 } else { UNREVIEWED_CONFIDENCE },
        },
    );
    if let Some(context) = context {
        entry.context = Some(context.to_string());
    }
    entry.last_used = now;
    if human_reviewed && entry.quality == TranslationQuality::MachineTranslated {
        entry.quality = TranslationQuality::HumanReviewed;
    }
}

/// Accept any 1.x document
pub(crate) fn check_version(version: &str) -> Result<(), StoreError> {
    if version.split('.').next() == Some("1") {
        Ok(())
    } else {
        Err(StoreError::UnsupportedVersion {
            found: version.to_string(),
        })
    }
}

/// Pretty JSON with every object's keys in sorted order
pub(crate) fn encode_sorted<T: Serialize>(document: &T) -> Result<String, StoreError> {
    // serde_json::Value keeps object keys in a BTreeMap
    let value = serde_json::to_value(document)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Truncate text to a maximum number of characters with ellipsis
pub(crate) fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}
