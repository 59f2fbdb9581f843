/*!
 * # locmem - Translation memory and glossary for app localization
 *
 * A Rust library that keeps machine translation of app string catalogs
 * consistent across batches and across runs.
 *
 * ## Features
 *
 * - Persistent translation memory with exact and fuzzy (Levenshtein) lookup
 * - Persistent glossary with fixed translations and do-not-translate terms
 * - Source usage analysis to tell translators which UI element shows a string
 * - Deterministic per-batch context assembly
 * - Prompt rendering in full, compact and JSON forms
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `translation`: Consistency engine:
 *   - `translation::memory`: Translation memory store
 *   - `translation::glossary`: Glossary store
 *   - `translation::context`: Context assembly and usage analysis
 *   - `translation::prompts`: Prompt rendering
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, ConfigError, ResponseError, StoreError};
pub use translation::{
    ContextAssembler, GlossaryEntry, GlossaryStore, PromptContext, PromptRenderer, StringEntry,
    TranslationMemoryStore,
};
