/*!
 * Prompt rendering for translation backends.
 *
 * This module provides:
 * - Full and compact system prompts built from an assembled context
 * - The user prompt listing the strings of a batch
 * - A structured JSON request and its fingerprint
 * - Parsing of the backend's JSON reply
 */

pub mod templates;

// Re-export main types
pub use templates::{parse_response, PromptRenderer, TranslationRequest, MAX_PROMPT_MATCHES};
