/*!
 * Translation consistency for app string catalogs.
 *
 * This module keeps translations consistent across batches and runs. It is
 * split into several submodules:
 *
 * - `fuzzy`: Edit distance and normalized similarity
 * - `memory`: Persistent translation memory with fuzzy lookup
 * - `glossary`: Persistent terminology store
 * - `context`: Per-batch context assembly
 * - `prompts`: Rendering of assembled context for translation backends
 */

// Re-export main types for easier usage
pub use self::context::{ContextAssembler, PromptContext, StringEntry};
pub use self::glossary::{GlossaryEntry, GlossaryMatch, GlossaryStore};
pub use self::memory::{MemoryOptions, TmMatch, TranslationMemoryStore};
pub use self::prompts::PromptRenderer;

// Submodules
pub mod context;
pub mod fuzzy;
pub mod glossary;
pub mod memory;
pub mod prompts;
