/*!
 * Glossary for terminology consistency.
 *
 * Stores domain terms with their fixed per-language translations or a
 * do-not-translate marker, persists them as a sorted JSON document and finds
 * the terms a source string contains.
 *
 * Terms are keyed by their lowercase form whatever their `case_sensitive`
 * flag, so "API" and "api" are the same glossary entry. Matching is plain
 * substring containment without word boundaries: a short term such as "art"
 * also matches inside "start".
 */

use log::{debug, info};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::StoreError;
use crate::file_utils::FileManager;
use crate::translation::memory::{check_version, encode_sorted};

/// Version written to and accepted from glossary documents
pub const GLOSSARY_DOCUMENT_VERSION: &str = "1.0";

/// A domain term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryEntry {
    /// The term as written in source strings
    pub term: String,

    /// What the term means, offered to translators when no fixed translation exists
    #[serde(default)]
    pub definition: Option<String>,

    /// Fixed translations keyed by language code
    #[serde(default)]
    pub translations: BTreeMap<String, String>,

    /// Whether matching respects case
    #[serde(default)]
    pub case_sensitive: bool,

    /// Whether the term must be kept verbatim in every language
    #[serde(default)]
    pub do_not_translate: bool,

    /// Part of speech, e.g. "noun"
    #[serde(default)]
    pub part_of_speech: Option<String>,
}

impl GlossaryEntry {
    /// Create a case-insensitive term with no translations
    pub fn new(term: &str) -> Self {
        Self {
            term: term.to_string(),
            definition: None,
            translations: BTreeMap::new(),
            case_sensitive: false,
            do_not_translate: false,
            part_of_speech: None,
        }
    }

    /// Add a fixed translation.
    pub fn with_translation(mut self, language: &str, translation: &str) -> Self {
        self.translations.insert(language.to_string(), translation.to_string());
        self
    }

    /// Set the definition.
    pub fn with_definition(mut self, definition: &str) -> Self {
        self.definition = Some(definition.to_string());
        self
    }

    /// Set the part of speech.
    pub fn with_part_of_speech(mut self, part_of_speech: &str) -> Self {
        self.part_of_speech = Some(part_of_speech.to_string());
        self
    }

    /// Make matching case-sensitive or not.
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Mark the term as never translated.
    pub fn do_not_translate(mut self, do_not_translate: bool) -> Self {
        self.do_not_translate = do_not_translate;
        self
    }

    /// Storage key: the lowercase term
    pub fn key(&self) -> String {
        fold(&self.term)
    }

    /// Substring test against `text`, with `folded_text` its lowercase form
    fn occurs_in(&self, text: &str, folded_text: &str) -> bool {
        if self.case_sensitive {
            text.contains(&self.term)
        } else {
            folded_text.contains(&fold(&self.term))
        }
    }
}

/// A glossary term found in a source string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryMatch {
    /// The glossary term
    pub term: String,

    /// Definition, if any
    pub definition: Option<String>,

    /// Fixed translations keyed by language code
    pub translations: BTreeMap<String, String>,

    /// Whether the term must be kept verbatim
    pub do_not_translate: bool,

    /// Part of speech, if any
    pub part_of_speech: Option<String>,
}

impl GlossaryMatch {
    /// Key under which two matches count as the same term.
    ///
    /// Only the term is compared; definition and translations are ignored.
    pub fn dedup_key(&self) -> &str {
        &self.term
    }

    /// Fixed translation for `language`, if any
    pub fn translation_for(&self, language: &str) -> Option<&str> {
        self.translations.get(language).map(|s| s.as_str())
    }
}

impl From<&GlossaryEntry> for GlossaryMatch {
    fn from(entry: &GlossaryEntry) -> Self {
        Self {
            term: entry.term.clone(),
            definition: entry.definition.clone(),
            translations: entry.translations.clone(),
            do_not_translate: entry.do_not_translate,
            part_of_speech: entry.part_of_speech.clone(),
        }
    }
}

/// Interchange record for glossary terms in configuration files and exports.
///
/// Every field but `term` is optional; unknown fields are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GlossaryTermRecord {
    /// The term
    pub term: String,

    /// Definition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,

    /// Fixed translations keyed by language code
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub translations: BTreeMap<String, String>,

    /// Case-sensitive matching
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,

    /// Never translate the term
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub do_not_translate: Option<bool>,

    /// Part of speech
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
}

impl TryFrom<GlossaryTermRecord> for GlossaryEntry {
    type Error = StoreError;

    fn try_from(record: GlossaryTermRecord) -> Result<Self, Self::Error> {
        let term = record.term.trim();
        if term.is_empty() {
            return Err(StoreError::InvalidTerm("term must not be empty".to_string()));
        }
        if let Some((language, _)) = record.translations.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(StoreError::InvalidTerm(format!(
                "'{}' has an empty {} translation",
                term, language
            )));
        }

        Ok(GlossaryEntry {
            term: term.to_string(),
            definition: record.definition.filter(|d| !d.trim().is_empty()),
            translations: record.translations,
            case_sensitive: record.case_sensitive.unwrap_or(false),
            do_not_translate: record.do_not_translate.unwrap_or(false),
            part_of_speech: record.part_of_speech,
        })
    }
}

impl From<&GlossaryEntry> for GlossaryTermRecord {
    fn from(entry: &GlossaryEntry) -> Self {
        Self {
            term: entry.term.clone(),
            definition: entry.definition.clone(),
            translations: entry.translations.clone(),
            case_sensitive: Some(entry.case_sensitive),
            do_not_translate: Some(entry.do_not_translate),
            part_of_speech: entry.part_of_speech.clone(),
        }
    }
}

/// Versioned interchange document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlossaryDocument {
    /// Document version
    pub version: String,

    /// Terms
    #[serde(default)]
    pub terms: Vec<GlossaryTermRecord>,
}

/// On-disk representation
#[derive(Debug, Serialize, Deserialize)]
struct GlossaryFile {
    version: String,
    #[serde(default)]
    terms: Vec<GlossaryEntry>,
}

#[derive(Debug, Default)]
struct GlossaryState {
    entries: BTreeMap<String, GlossaryEntry>,
    dirty: bool,
}

/// Persistent glossary
#[derive(Debug, Clone)]
pub struct GlossaryStore {
    /// Backing file, `None` for a purely in-memory store
    path: Option<PathBuf>,

    /// Shared entries keyed by lowercase term
    state: Arc<RwLock<GlossaryState>>,
}

impl GlossaryStore {
    /// Create an empty glossary backed by `path` without touching the disk
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
            state: Arc::new(RwLock::new(GlossaryState::default())),
        }
    }

    /// Create a glossary backed by `path` and load it
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let store = Self::new(path);
        store.load()?;
        Ok(store)
    }

    /// Create a glossary with no backing file
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: Arc::new(RwLock::new(GlossaryState::default())),
        }
    }

    /// Backing file path, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Replace the in-memory terms with the backing file's contents.
    ///
    /// A missing file leaves an empty glossary; any other failure is returned.
    pub fn load(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let content = FileManager::read_optional(path).map_err(|source| StoreError::Read {
            path: path.clone(),
            source,
        })?;

        let mut entries = BTreeMap::new();
        match content {
            Some(content) => {
                let file: GlossaryFile =
                    serde_json::from_str(&content).map_err(|source| StoreError::Decode {
                        path: path.clone(),
                        source,
                    })?;
                check_version(&file.version)?;
                for entry in file.terms {
                    entries.insert(entry.key(), entry);
                }
            }
            None => debug!("No glossary at {:?}, starting empty", path),
        }

        let mut state = self.state.write();
        state.entries = entries;
        state.dirty = false;
        info!("Loaded {} glossary terms", state.entries.len());
        Ok(())
    }

    /// Write the glossary if it changed since the last save.
    ///
    /// Terms are written in lowercase-term order. Returns whether a write happened.
    pub fn save(&self) -> Result<bool, StoreError> {
        let mut state = self.state.write();
        if !state.dirty {
            debug!("Glossary unchanged, skipping save");
            return Ok(false);
        }

        if let Some(path) = &self.path {
            let file = GlossaryFile {
                version: GLOSSARY_DOCUMENT_VERSION.to_string(),
                terms: state.entries.values().cloned().collect(),
            };
            let json = encode_sorted(&file)?;
            FileManager::write_atomic(path, &json).map_err(|source| StoreError::Write {
                path: path.clone(),
                source,
            })?;
            info!("Saved {} glossary terms to {:?}", state.entries.len(), path);
        }

        state.dirty = false;
        Ok(true)
    }

    /// Write the glossary unconditionally
    pub fn force_save(&self) -> Result<(), StoreError> {
        self.state.write().dirty = true;
        self.save().map(|_| ())
    }

    /// Whether there are unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.state.read().dirty
    }

    /// Add or replace a term
    pub fn add_term(&self, entry: GlossaryEntry) {
        let mut state = self.state.write();
        debug!("Glossary term '{}' added", entry.term);
        state.entries.insert(entry.key(), entry);
        state.dirty = true;
    }

    /// Add or replace several terms
    pub fn add_terms<I: IntoIterator<Item = GlossaryEntry>>(&self, entries: I) {
        let mut state = self.state.write();
        let mut added = 0;
        for entry in entries {
            state.entries.insert(entry.key(), entry);
            added += 1;
        }
        if added > 0 {
            state.dirty = true;
        }
        debug!("{} glossary terms added", added);
    }

    /// Remove a term (any casing). Returns whether it existed.
    pub fn remove_term(&self, term: &str) -> bool {
        let mut state = self.state.write();
        let removed = state.entries.remove(&fold(term)).is_some();
        if removed {
            state.dirty = true;
        }
        removed
    }

    /// Look up a term (any casing)
    pub fn get_term(&self, term: &str) -> Option<GlossaryEntry> {
        self.state.read().entries.get(&fold(term)).cloned()
    }

    /// Remove every term
    pub fn clear(&self) {
        let mut state = self.state.write();
        if !state.entries.is_empty() {
            state.entries.clear();
            state.dirty = true;
        }
    }

    /// All terms in lowercase-term order
    pub fn all_terms(&self) -> Vec<GlossaryEntry> {
        self.state.read().entries.values().cloned().collect()
    }

    /// Number of terms
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    /// Check if the glossary is empty
    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }

    /// Terms contained in `text`, in lowercase-term order
    pub fn find_terms(&self, text: &str) -> Vec<GlossaryMatch> {
        let folded = fold(text);
        let state = self.state.read();
        state
            .entries
            .values()
            .filter(|entry| entry.occurs_in(text, &folded))
            .map(GlossaryMatch::from)
            .collect()
    }

    /// Translatable terms that have no fixed translation for `language` yet
    pub fn terms_needing_translation(&self, language: &str) -> Vec<GlossaryEntry> {
        self.state
            .read()
            .entries
            .values()
            .filter(|entry| !entry.do_not_translate && !entry.translations.contains_key(language))
            .cloned()
            .collect()
    }

    /// Render matches as translator instructions, one line per usable match.
    ///
    /// Do-not-translate terms become "keep as" lines; otherwise the fixed
    /// translation for `language`, else the definition. Matches with none of
    /// these are skipped.
    pub fn to_prompt_instructions(matches: &[GlossaryMatch], language: &str) -> Vec<String> {
        matches
            .iter()
            .filter_map(|m| {
                if m.do_not_translate {
                    Some(format!("- \"{}\": keep as `{}` (do not translate)", m.term, m.term))
                } else if let Some(translation) = m.translation_for(language) {
                    Some(format!("- \"{}\" → \"{}\"", m.term, translation))
                } else {
                    m.definition
                        .as_ref()
                        .map(|definition| format!("- \"{}\": {}", m.term, definition))
                }
            })
            .collect()
    }

    /// Import an interchange document.
    ///
    /// The whole document is validated before anything is added. Returns the
    /// number of imported terms.
    pub fn import(&self, document: GlossaryDocument) -> Result<usize, StoreError> {
        check_version(&document.version)?;
        let entries = document
            .terms
            .into_iter()
            .map(GlossaryEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let count = entries.len();
        self.add_terms(entries);
        Ok(count)
    }

    /// Import an interchange document from JSON text
    pub fn import_json(&self, json: &str) -> Result<usize, StoreError> {
        let document: GlossaryDocument =
            serde_json::from_str(json).map_err(StoreError::InvalidDocument)?;
        self.import(document)
    }

    /// Export every term as an interchange document
    pub fn export(&self) -> GlossaryDocument {
        GlossaryDocument {
            version: GLOSSARY_DOCUMENT_VERSION.to_string(),
            terms: self
                .state
                .read()
                .entries
                .values()
                .map(GlossaryTermRecord::from)
                .collect(),
        }
    }

    /// Export every term as pretty interchange JSON
    pub fn export_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(&self.export())?)
    }
}

/// Case folding used for keys and case-insensitive matching
fn fold(text: &str) -> String {
    text.to_lowercase()
}
