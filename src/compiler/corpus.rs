//! Example corpus building.
//!
//! Deduplication happens along three independent axes, in this order, for
//! each block:
//!
//! 1. **Within-block**: repeated strings inside one list collapse to the
//!    first occurrence.
//! 2. **Cross-block**: a string already emitted for the same language by an
//!    earlier block in this run is dropped (first-writer-wins). The
//!    [`SeenExamples`] accumulator that backs this is scoped to one compiler
//!    invocation and passed explicitly; it is never persisted.
//! 3. **Cross-language**: a string surviving in both language lists of the
//!    same block may not serve as an example twice, and is removed from both.
//!
//! Truncation to the resolved limit happens between axes 2 and 3, keeping the
//! earliest N survivors. An intent that ends with zero examples across all
//! languages gets exactly two synthesized phrases derived from its canonical
//! name, so downstream consumers never see an empty corpus.

use super::limits::LimitPair;
use super::metrics::CompileMetrics;
use crate::{ExampleCorpus, LANGUAGES, Language};
use std::collections::HashSet;
use tracing::warn;

/// Run-scoped "seen example" sets, one per language.
///
/// Once a block claims a phrase for a language, every later block loses that
/// phrase silently. A phrase stays claimed even if the cross-language pass
/// later removes it, so it cannot re-enter through a later block either.
#[derive(Debug, Default)]
pub(crate) struct SeenExamples {
    pt: HashSet<String>,
    en: HashSet<String>,
}

impl SeenExamples {
    /// Claim `example` for `lang`. Returns `true` when this call is the first
    /// claim (the caller keeps the example), `false` when an earlier block
    /// already owns it.
    pub fn claim(&mut self, lang: Language, example: &str) -> bool {
        let set = match lang {
            Language::Pt => &mut self.pt,
            Language::En => &mut self.en,
        };
        set.insert(example.to_string())
    }
}

/// Build the final per-language corpus for one intent.
pub(crate) fn build_corpus(
    name: &str,
    raw: ExampleCorpus,
    limits: &LimitPair,
    seen: &mut SeenExamples,
    metrics: &mut CompileMetrics,
) -> ExampleCorpus {
    let mut corpus = ExampleCorpus::default();

    for lang in LANGUAGES {
        let mut local: HashSet<&str> = HashSet::new();
        let mut kept: Vec<String> = Vec::new();

        for example in raw.get(lang) {
            if !local.insert(example.as_str()) {
                metrics.examples_deduplicated += 1;
                continue;
            }
            if !seen.claim(lang, example) {
                metrics.examples_deduplicated += 1;
                continue;
            }
            kept.push(example.clone());
        }

        if let Some(cap) = limits.get(lang) {
            if kept.len() > cap {
                metrics.examples_truncated += kept.len() - cap;
                kept.truncate(cap);
            }
        }

        *corpus.get_mut(lang) = kept;
    }

    remove_cross_language_collisions(name, &mut corpus, metrics);

    if corpus.is_empty() {
        let phrases = synthesize_examples(name);
        metrics.examples_synthesized += phrases.len();
        corpus.pt = phrases;
    }

    corpus
}

/// Drop any literal string kept by both language lists of the same block,
/// from both sides. A phrase may not serve as an example in two languages of
/// one intent.
fn remove_cross_language_collisions(name: &str, corpus: &mut ExampleCorpus, metrics: &mut CompileMetrics) {
    let collisions: HashSet<String> = corpus
        .pt
        .iter()
        .filter(|example| corpus.en.iter().any(|other| other == *example))
        .cloned()
        .collect();

    if collisions.is_empty() {
        return;
    }

    for example in &collisions {
        warn!(intent = name, example = %example, "phrase appears in both languages; removed from both");
    }
    metrics.cross_language_collisions += collisions.len();

    corpus.pt.retain(|example| !collisions.contains(example));
    corpus.en.retain(|example| !collisions.contains(example));
}

/// Derive two fallback phrases from a canonical intent name: separator
/// characters become spaces, whitespace collapses, and one variant gets a
/// terminal question mark.
fn synthesize_examples(name: &str) -> Vec<String> {
    let phrase = slug_to_phrase(name);
    vec![format!("{phrase}?"), phrase]
}

fn slug_to_phrase(slug: &str) -> String {
    let spaced = regex!(r"[._\-/]+").replace_all(slug, " ");
    let collapsed = regex!(r"\s+").replace_all(spaced.trim(), " ").to_string();
    if collapsed.is_empty() { slug.to_string() } else { collapsed }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(pt: &[&str], en: &[&str]) -> ExampleCorpus {
        ExampleCorpus {
            pt: pt.iter().map(|s| s.to_string()).collect(),
            en: en.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn within_block_duplicates_collapse_to_first() {
        let mut seen = SeenExamples::default();
        let mut metrics = CompileMetrics::default();
        let out =
            build_corpus("x", corpus(&["oi", "olá", "oi"], &[]), &LimitPair::default(), &mut seen, &mut metrics);

        assert_eq!(out.pt, vec!["oi", "olá"]);
        assert_eq!(metrics.examples_deduplicated, 1);
    }

    #[test]
    fn cross_block_dedup_is_first_writer_wins() {
        let mut seen = SeenExamples::default();
        let mut metrics = CompileMetrics::default();

        let first = build_corpus("a", corpus(&["oi"], &[]), &LimitPair::default(), &mut seen, &mut metrics);
        let second =
            build_corpus("b", corpus(&["oi", "olá"], &[]), &LimitPair::default(), &mut seen, &mut metrics);

        assert_eq!(first.pt, vec!["oi"]);
        assert_eq!(second.pt, vec!["olá"]);
    }

    #[test]
    fn same_string_may_be_claimed_by_both_languages_across_blocks() {
        // The per-language seen sets are independent; cross-language removal
        // only applies inside one block.
        let mut seen = SeenExamples::default();
        let mut metrics = CompileMetrics::default();

        let a = build_corpus("a", corpus(&["ok"], &[]), &LimitPair::default(), &mut seen, &mut metrics);
        let b = build_corpus("b", corpus(&[], &["ok"]), &LimitPair::default(), &mut seen, &mut metrics);

        assert_eq!(a.pt, vec!["ok"]);
        assert_eq!(b.en, vec!["ok"]);
        assert_eq!(metrics.cross_language_collisions, 0);
    }

    #[test]
    fn truncation_keeps_earliest_after_dedup() {
        let mut seen = SeenExamples::default();
        let mut metrics = CompileMetrics::default();
        let limits = LimitPair { pt: Some(2), en: None };

        let out = build_corpus("x", corpus(&["a", "a", "b", "c"], &[]), &limits, &mut seen, &mut metrics);

        assert_eq!(out.pt, vec!["a", "b"]);
        assert_eq!(metrics.examples_truncated, 1);
    }

    #[test]
    fn cross_language_collision_removed_from_both() {
        let mut seen = SeenExamples::default();
        let mut metrics = CompileMetrics::default();

        let out = build_corpus(
            "x",
            corpus(&["ok", "oi"], &["ok", "hi"]),
            &LimitPair::default(),
            &mut seen,
            &mut metrics,
        );

        assert_eq!(out.pt, vec!["oi"]);
        assert_eq!(out.en, vec!["hi"]);
        assert_eq!(metrics.cross_language_collisions, 1);

        // The collided phrase stays claimed: a later block cannot re-add it.
        let later = build_corpus("y", corpus(&["ok"], &[]), &LimitPair::default(), &mut seen, &mut metrics);
        assert!(!later.pt.contains(&"ok".to_string()));
        assert_eq!(metrics.examples_deduplicated, 1);
    }

    #[test]
    fn empty_intent_gets_two_synthesized_phrases() {
        let mut seen = SeenExamples::default();
        let mut metrics = CompileMetrics::default();

        let out = build_corpus(
            "feeling_today",
            ExampleCorpus::default(),
            &LimitPair::default(),
            &mut seen,
            &mut metrics,
        );

        assert_eq!(out.pt, vec!["feeling today?", "feeling today"]);
        assert!(out.en.is_empty());
        assert_eq!(metrics.examples_synthesized, 2);
    }

    #[test]
    fn one_nonempty_language_suppresses_synthesis() {
        let mut seen = SeenExamples::default();
        let mut metrics = CompileMetrics::default();

        let out = build_corpus("x", corpus(&[], &["hello"]), &LimitPair::default(), &mut seen, &mut metrics);

        assert!(out.pt.is_empty());
        assert_eq!(out.en, vec!["hello"]);
        assert_eq!(metrics.examples_synthesized, 0);
    }

    #[test]
    fn slug_to_phrase_collapses_separators() {
        assert_eq!(slug_to_phrase("interview/feeling.great-now"), "interview feeling great now");
        assert_eq!(slug_to_phrase("___"), "___");
    }
}
