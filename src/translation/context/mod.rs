/*!
 * Context assembly for translation batches.
 *
 * This module gathers everything a translator should know about a batch:
 * - Source usage analysis for UI element hints
 * - Glossary terms found in the batch
 * - Translation memory matches for similar strings
 */

pub mod assembler;
pub mod model;
pub mod usage;

// Re-export main types
pub use assembler::{ContextAssembler, MATCHES_PER_ENTRY, MAX_BATCH_MATCHES};
pub use model::{PromptContext, StringContext, StringEntry};
pub use usage::{SourceUsageAnalyzer, StringUsageContext, UiElementType, UsageAnalyzer};
