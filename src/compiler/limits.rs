//! Per-language example cap resolution.
//!
//! Limits are layered; highest precedence first:
//!
//! 1. block-local per-language tag (`#max_pt: n` / `#max_en: n`)
//! 2. block-local combined tag (`#max: n`), applied to both languages
//! 3. global per-language limit from the invocation
//! 4. global combined limit from the invocation
//! 5. unlimited
//!
//! Resolution is a pure function of the block's fields and the global
//! configuration. `None` means "no truncation".

use super::splitter::TaggedBlock;
use crate::Language;

/// Global limits supplied at invocation time (CLI flags).
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct GlobalLimits {
    pub max_both: Option<usize>,
    pub max_pt: Option<usize>,
    pub max_en: Option<usize>,
}

impl GlobalLimits {
    fn per_language(&self, lang: Language) -> Option<usize> {
        match lang {
            Language::Pt => self.max_pt,
            Language::En => self.max_en,
        }
    }
}

/// Effective caps for one block, one per language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct LimitPair {
    pub pt: Option<usize>,
    pub en: Option<usize>,
}

impl LimitPair {
    pub fn get(&self, lang: Language) -> Option<usize> {
        match lang {
            Language::Pt => self.pt,
            Language::En => self.en,
        }
    }
}

/// Resolve the effective caps for `block` under `globals`.
pub(crate) fn resolve(block: &TaggedBlock, globals: &GlobalLimits) -> LimitPair {
    let block_both = numeric_field(block, "max");

    let resolve_one = |lang: Language| {
        numeric_field(block, &format!("max_{}", lang.tag()))
            .or(block_both)
            .or(globals.per_language(lang))
            .or(globals.max_both)
    };

    LimitPair { pt: resolve_one(Language::Pt), en: resolve_one(Language::En) }
}

/// Read a numeric limit tag. The value must be the bare integer on the tag
/// line itself; anything else is ignored as if the tag were absent.
fn numeric_field(block: &TaggedBlock, tag: &str) -> Option<usize> {
    let field = block.first_field(tag)?;
    if regex!(r"^\d+$").is_match(&field.inline) { field.inline.parse().ok() } else { None }
}
