//! Compile-run counters.
//!
//! These are the user-visible numbers printed in the end-of-run summary.
//! Parsing problems never abort a run, so the counters are the only trace a
//! malformed block or a dropped phrase leaves behind (besides the warning
//! logged at the point of discovery).

/// Counters accumulated over one compiler invocation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CompileMetrics {
    /// Non-blank blocks found in the document.
    pub blocks: usize,
    /// Blocks skipped for lacking the mandatory `#intent:` tag.
    pub blocks_ignored: usize,
    /// Intent definitions emitted.
    pub intents: usize,
    /// Examples dropped as duplicates (within-block or cross-block).
    pub examples_deduplicated: usize,
    /// Examples dropped by limit truncation.
    pub examples_truncated: usize,
    /// Fallback phrases synthesized for otherwise-empty intents.
    pub examples_synthesized: usize,
    /// Phrases removed from both languages of a block for colliding.
    pub cross_language_collisions: usize,
    /// Intents that received the translation-stub response pair.
    pub placeholder_variants: usize,
}
