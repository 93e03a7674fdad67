extern crate self as intentc;

#[macro_use]
mod macros;
mod api;
mod artifacts;
mod compiler;
mod error;
mod registry;

pub use api::{CompileOutcome, Limits, RunOptions, RunSummary, compile_document, run};
pub use compiler::CompileMetrics;
pub use error::{IntentcError, Result};
pub use registry::{
    Domain, ReconcileStats, RuleEntry, RuleSet, SessionConfig, Step, StoryEntry, StorySet, WiringPolicy,
};

// --- Data model --------------------------------------------------------------

/// Languages recognized by the example-list tags of the input markup.
///
/// Each language owns an independent training corpus for an intent; the
/// uniqueness guarantees of the corpus builder are scoped per language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Pt,
    En,
}

/// All supported languages, in corpus emission order (PT examples are written
/// before EN ones in the generated artifacts).
pub const LANGUAGES: [Language; 2] = [Language::Pt, Language::En];

impl Language {
    /// The markup tag (and short code) of this language, e.g. `"pt"`.
    pub fn tag(self) -> &'static str {
        match self {
            Language::Pt => "pt",
            Language::En => "en",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// One localized response alternative: a PT text paired with its EN text.
///
/// Order of discovery in the source block is preserved all the way into the
/// generated responses document (`resp_1`, `resp_2`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseVariant {
    pub text_pt: String,
    pub text_en: String,
}

/// Per-language training phrases for one intent.
///
/// Lists keep first-seen order; deduplication and truncation happen in the
/// corpus builder before an [`IntentDefinition`] is emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExampleCorpus {
    pub pt: Vec<String>,
    pub en: Vec<String>,
}

impl ExampleCorpus {
    pub fn get(&self, lang: Language) -> &[String] {
        match lang {
            Language::Pt => &self.pt,
            Language::En => &self.en,
        }
    }

    pub(crate) fn get_mut(&mut self, lang: Language) -> &mut Vec<String> {
        match lang {
            Language::Pt => &mut self.pt,
            Language::En => &mut self.en,
        }
    }

    /// Total number of examples across all languages.
    pub fn len(&self) -> usize {
        LANGUAGES.iter().map(|l| self.get(*l).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The immutable structured unit produced by the compiler pipeline for one
/// valid input block, consumed by the artifact writer and the reconciler.
///
/// `path` is the slash-segmented intent path from the `#intent:` tag; `name`
/// is its canonical form (final path segment). The example corpus is already
/// deduplicated, truncated, and (if the block had no usable examples at all)
/// synthesized; the variant list is never empty (a translation stub is
/// substituted when the block had no valid pairs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentDefinition {
    /// Slash-segmented path, e.g. `"interview/feelingToday"`.
    pub path: String,
    /// Canonical name: the final path segment, e.g. `"feelingToday"`.
    pub name: String,
    /// Deduplicated per-language training phrases.
    pub examples: ExampleCorpus,
    /// Localized response pairs, in discovery order. Never empty.
    pub response_variants: Vec<ResponseVariant>,
}

/// Normalize an intent path: backslashes become slashes, surrounding
/// whitespace is trimmed.
pub(crate) fn normalize_intent_path(path: &str) -> String {
    path.trim().replace('\\', "/")
}

/// Canonical intent name: the final segment of the normalized path.
pub(crate) fn canonical_intent_name(path: &str) -> String {
    let normalized = normalize_intent_path(path);
    normalized.rsplit('/').next().unwrap_or(&normalized).to_string()
}
