/*!
 * Prompt rendering for app string translation.
 *
 * A `PromptRenderer` turns an assembled `PromptContext` into the material a
 * translation backend consumes: a full system prompt, a compact system prompt
 * for small context windows, the user prompt listing the strings, and a
 * structured JSON request. Rendering is pure, so the same context always
 * yields byte-identical output.
 */

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::errors::ResponseError;
use crate::language_utils;
use crate::translation::context::model::{PromptContext, StringContext};
use crate::translation::glossary::GlossaryMatch;

/// Previous translations shown in a prompt
pub const MAX_PROMPT_MATCHES: usize = 5;

/// Guidelines appended to every full system prompt
const GUIDELINES: &str = r#"## Guidelines
- Preserve format specifiers exactly as written (%@, %d, %lld, %1$@, %.2f)
- Preserve markdown syntax (**bold**, *italic*, [links](url))
- Keep placeholders such as {name} or ${count} untouched
- Use the formality level described above consistently across all strings
- Follow the punctuation conventions of the target language consistently
- Keep translations about as long as the source text; UI space is limited"#;

/// Renders one prompt context in the forms backends expect
#[derive(Debug, Clone, Copy)]
pub struct PromptRenderer<'a> {
    context: &'a PromptContext,
}

impl<'a> PromptRenderer<'a> {
    /// Create a renderer for `context`
    pub fn new(context: &'a PromptContext) -> Self {
        Self { context }
    }

    /// The context being rendered
    pub fn context(&self) -> &'a PromptContext {
        self.context
    }

    fn language_label(&self) -> String {
        let code = &self.context.target_language;
        let name = language_utils::display_name(code);
        if &name == code {
            name
        } else {
            format!("{} ({})", name, code)
        }
    }

    /// Full system prompt.
    pub fn to_system_prompt(&self) -> String {
        let context = self.context;
        let mut sections = vec![format!(
            "You are a professional software localizer translating app UI strings into {}.",
            self.language_label()
        )];

        sections.push(format!("## App\n{}", context.app_context));

        let terminology = terminology_lines(&context.glossary_terms, &context.target_language);
        if !terminology.is_empty() {
            sections.push(format!(
                "## Terminology\nUse these terms exactly as specified:\n{}",
                terminology.join("\n")
            ));
        }

        if !context.translation_memory_matches.is_empty() {
            let lines: Vec<String> = context
                .translation_memory_matches
                .iter()
                .take(MAX_PROMPT_MATCHES)
                .map(|m| {
                    let reviewed = if m.human_reviewed { " (reviewed)" } else { "" };
                    format!("- \"{}\" → \"{}\"{}", m.source_text, m.translation, reviewed)
                })
                .collect();
            sections.push(format!(
                "## Previous Translations\nStay consistent with these earlier translations:\n{}",
                lines.join("\n")
            ));
        }

        sections.push(GUIDELINES.to_string());
        sections.join("\n\n")
    }

    /// Single-paragraph system prompt for backends with small context windows
    pub fn to_compact_system_prompt(&self) -> String {
        let context = self.context;
        let app = context
            .app_context
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("; ");

        let mut prompt = format!(
            "Translate app UI strings into {}. {}.",
            self.language_label(),
            app
        );

        let terms: Vec<String> = context
            .glossary_terms
            .iter()
            .filter_map(|t| {
                if t.do_not_translate {
                    Some(format!("{}=keep", t.term))
                } else {
                    t.translation_for(&context.target_language)
                        .map(|tr| format!("{}={}", t.term, tr))
                }
            })
            .collect();
        if !terms.is_empty() {
            prompt.push_str(&format!(" Terms: {}.", terms.join(", ")));
        }

        let memory: Vec<String> = context
            .translation_memory_matches
            .iter()
            .take(MAX_PROMPT_MATCHES)
            .map(|m| format!("\"{}\"=>\"{}\"", m.source_text, m.translation))
            .collect();
        if !memory.is_empty() {
            prompt.push_str(&format!(" Previously: {}.", memory.join(", ")));
        }

        prompt.push_str(
            " Keep format specifiers, markdown and placeholders unchanged. \
             Reply with one JSON object mapping each original text to its translation.",
        );
        prompt
    }

    /// User prompt listing every string of the batch
    pub fn to_user_prompt(&self) -> String {
        let context = self.context;
        let mut prompt = format!(
            "Translate the following {} string(s) into {}.\n",
            context.string_contexts.len(),
            self.language_label()
        );

        for (index, string) in context.string_contexts.iter().enumerate() {
            prompt.push('\n');
            prompt.push_str(&render_string_block(index + 1, string));
        }

        prompt.push_str(
            "\nRespond with a single JSON object that maps each original text to its translation, \
             for example {\"Original text\": \"Translated text\"}. \
             Return only the JSON object, with no commentary and no code fences.",
        );
        prompt
    }

    /// Structured request for backends that take JSON input
    pub fn to_json_request(&self) -> TranslationRequest {
        let context = self.context;
        TranslationRequest {
            task: "translate_app_strings".to_string(),
            target_language: context.target_language.clone(),
            app_context: context.app_context.clone(),
            strings: context
                .string_contexts
                .iter()
                .map(|s| RequestString {
                    key: s.key.clone(),
                    text: s.value.clone(),
                    comment: s.comment.clone(),
                    ui_context: s.usage_context.as_ref().and_then(|u| u.describe()),
                    terms: s.glossary_terms.iter().map(|t| t.term.clone()).collect(),
                })
                .collect(),
            glossary: context
                .glossary_terms
                .iter()
                .map(|t| RequestTerm {
                    term: t.term.clone(),
                    translation: t.translation_for(&context.target_language).map(str::to_string),
                    do_not_translate: t.do_not_translate,
                    definition: t.definition.clone(),
                })
                .collect(),
            translation_memory: context
                .translation_memory_matches
                .iter()
                .take(MAX_PROMPT_MATCHES)
                .map(|m| RequestMemoryMatch {
                    source: m.source_text.clone(),
                    translation: m.translation.clone(),
                    similarity: m.similarity,
                    reviewed: m.human_reviewed,
                })
                .collect(),
            instructions: TranslationInstructions::default(),
        }
    }

    /// JSON request as pretty-printed text
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.to_json_request())
    }

    /// SHA-256 of the JSON request, usable as a cache key
    pub fn fingerprint(&self) -> serde_json::Result<String> {
        let bytes = serde_json::to_vec(&self.to_json_request())?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(format!("{:x}", hasher.finalize()))
    }
}

/// Decode a backend reply into `original → translation` pairs.
///
/// Text around the outermost JSON object, such as a code fence, is ignored.
pub fn parse_response(text: &str) -> Result<BTreeMap<String, String>, ResponseError> {
    let start = text.find('{').ok_or(ResponseError::MissingObject)?;
    let end = text.rfind('}').ok_or(ResponseError::MissingObject)?;
    if end < start {
        return Err(ResponseError::MissingObject);
    }

    let translations: BTreeMap<String, String> = serde_json::from_str(&text[start..=end])?;
    Ok(translations)
}

fn terminology_lines(terms: &[GlossaryMatch], language: &str) -> Vec<String> {
    terms
        .iter()
        .filter_map(|t| {
            if t.do_not_translate {
                Some(format!("- \"{}\": keep unchanged (do not translate)", t.term))
            } else {
                t.translation_for(language)
                    .map(|tr| format!("- \"{}\" → \"{}\"", t.term, tr))
            }
        })
        .collect()
}

fn render_string_block(number: usize, string: &StringContext) -> String {
    let mut lines = vec![
        format!("{}. Key: {}", number, string.key),
        format!("   Text: \"{}\"", string.value),
    ];
    if let Some(comment) = string.comment.as_deref().filter(|c| !c.trim().is_empty()) {
        lines.push(format!("   Comment: {}", comment));
    }
    if let Some(ui) = string.usage_context.as_ref().and_then(|u| u.describe()) {
        lines.push(format!("   UI context: {}", ui));
    }
    if !string.glossary_terms.is_empty() {
        let terms: Vec<&str> = string.glossary_terms.iter().map(|t| t.term.as_str()).collect();
        lines.push(format!("   Contains terms: {}", terms.join(", ")));
    }
    let mut block = lines.join("\n");
    block.push('\n');
    block
}

/// Translation request structure for JSON communication with a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    /// Task identifier
    pub task: String,

    /// Target language code
    pub target_language: String,

    /// Rendered app summary
    pub app_context: String,

    /// Strings to translate, in batch order
    pub strings: Vec<RequestString>,

    /// Terminology for the batch
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub glossary: Vec<RequestTerm>,

    /// Earlier translations of similar strings
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub translation_memory: Vec<RequestMemoryMatch>,

    /// Translation instructions
    pub instructions: TranslationInstructions,
}

/// A string to translate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestString {
    /// Localization key
    pub key: String,

    /// Source text
    pub text: String,

    /// Developer comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// UI element description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_context: Option<String>,

    /// Glossary terms found in the text
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub terms: Vec<String>,
}

/// A glossary term in a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestTerm {
    /// The term
    pub term: String,

    /// Fixed translation for the target language
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,

    /// Whether the term must be kept verbatim
    pub do_not_translate: bool,

    /// Definition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

/// A translation memory match in a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestMemoryMatch {
    /// Stored source text
    pub source: String,

    /// Stored translation
    pub translation: String,

    /// Similarity to a string of the batch
    pub similarity: f64,

    /// Whether a person reviewed the translation
    pub reviewed: bool,
}

/// Translation instructions for the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationInstructions {
    /// Keep printf-style specifiers
    pub preserve_format_specifiers: bool,

    /// Keep markdown syntax
    pub preserve_markdown: bool,

    /// Keep named placeholders
    pub preserve_placeholders: bool,

    /// Expected reply shape
    pub response_format: String,
}

impl Default for TranslationInstructions {
    fn default() -> Self {
        Self {
            preserve_format_specifiers: true,
            preserve_markdown: true,
            preserve_placeholders: true,
            response_format: "json object mapping original text to translation".to_string(),
        }
    }
}
