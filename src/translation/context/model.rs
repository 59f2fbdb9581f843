/*!
 * Prompt context model.
 *
 * A `PromptContext` is everything a translation backend needs to know about
 * one batch of strings. It is built fresh for each batch and never persisted.
 */

use serde::{Deserialize, Serialize};

use crate::translation::context::usage::StringUsageContext;
use crate::translation::glossary::GlossaryMatch;
use crate::translation::memory::TmMatch;

/// A string waiting to be translated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringEntry {
    /// Localization key
    pub key: String,

    /// Source text
    pub value: String,

    /// Developer comment from the catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl StringEntry {
    /// Create an entry without a comment
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
            comment: None,
        }
    }

    /// Attach a developer comment.
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }
}

/// Per-string context, in batch order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringContext {
    /// Localization key
    pub key: String,

    /// Source text
    pub value: String,

    /// Developer comment
    pub comment: Option<String>,

    /// How the key is used in source code
    pub usage_context: Option<StringUsageContext>,

    /// Glossary terms found in this string
    pub glossary_terms: Vec<GlossaryMatch>,
}

/// Assembled context for one batch and one target language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptContext {
    /// Rendered app summary
    pub app_context: String,

    /// One context per input entry, in input order
    pub string_contexts: Vec<StringContext>,

    /// Glossary terms of the whole batch, deduplicated by term
    pub glossary_terms: Vec<GlossaryMatch>,

    /// Best translation memory matches of the whole batch
    pub translation_memory_matches: Vec<TmMatch>,

    /// Target language code
    pub target_language: String,
}
