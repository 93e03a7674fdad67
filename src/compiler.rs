//! The intent compiler.
//!
//! This module is the front half of the system: it turns a raw input document
//! into a sequence of [`IntentDefinition`]s ready for artifact writing and
//! registry reconciliation.
//!
//! At a high level, compiling a document is a pipeline:
//!
//! ```text
//! raw text ── split_blocks ──┐                        (splitter.rs)
//!                            │ one RawBlock per `---`-delimited segment
//!                            v
//!                    parse_block (splitter.rs)
//!                      - line-scanning state machine
//!                      - mandatory #intent tag, else block skipped + counted
//!                      - ordered tagged fields with explicit boundaries
//!                            │
//!                            ├─ resolve_limits (limits.rs)
//!                            ├─ build_corpus   (corpus.rs)
//!                            │    dedup within block / across blocks /
//!                            │    across languages, truncate, synthesize
//!                            └─ assemble_variants (variants.rs)
//!                            │
//!                            v
//!                    Vec<IntentDefinition> + CompileMetrics
//! ```
//!
//! Parsing is tolerant by design: a block without the mandatory identifier tag
//! is skipped with a warning and a counter bump, never an error. The only
//! mutable state threaded through the pipeline is the run-scoped
//! [`corpus::SeenExamples`] accumulator that enforces cross-block uniqueness;
//! it is passed explicitly so every stage stays a pure function of its inputs.
//!
//! ## Responsibilities by module
//!
//! - `splitter.rs`: block splitting, line classification, and boundary-aware
//!   tagged-field extraction.
//! - `limits.rs`: layered resolution of per-language example caps.
//! - `corpus.rs`: multi-axis example deduplication, truncation, and fallback
//!   phrase synthesis.
//! - `variants.rs`: paired response-variant assembly and placeholder
//!   substitution.
//! - `metrics.rs`: per-run counters surfaced in the end-of-run summary.

#[path = "compiler/corpus.rs"]
mod corpus;
#[path = "compiler/limits.rs"]
mod limits;
#[path = "compiler/metrics.rs"]
mod metrics;
#[path = "compiler/splitter.rs"]
mod splitter;
#[path = "compiler/variants.rs"]
mod variants;

pub use metrics::CompileMetrics;

pub(crate) use limits::GlobalLimits;

use crate::{ExampleCorpus, IntentDefinition, canonical_intent_name, normalize_intent_path};
use corpus::SeenExamples;
use tracing::warn;

/// Output of one compiler invocation over a whole document.
#[derive(Debug, Clone)]
pub(crate) struct CompileRun {
    pub intents: Vec<IntentDefinition>,
    pub metrics: CompileMetrics,
}

/// Compile a raw document into intent definitions.
///
/// Blocks are processed in document order; the cross-block "seen example"
/// accumulator makes earlier blocks win repeated phrases.
pub(crate) fn compile(text: &str, globals: &GlobalLimits) -> CompileRun {
    let mut metrics = CompileMetrics::default();
    let mut seen = SeenExamples::default();
    let mut intents = Vec::new();

    for raw in splitter::split_blocks(text) {
        metrics.blocks += 1;

        let block = match splitter::parse_block(&raw) {
            Some(block) => block,
            None => {
                warn!(block = raw.index, preview = %raw.preview(), "block ignored: missing #intent tag");
                metrics.blocks_ignored += 1;
                continue;
            }
        };

        let limits = limits::resolve(&block, globals);

        let mut raw_examples = ExampleCorpus::default();
        for lang in crate::LANGUAGES {
            *raw_examples.get_mut(lang) = splitter::list_field(&block, lang.tag());
        }

        let name = canonical_intent_name(&block.intent_path);
        let examples = corpus::build_corpus(&name, raw_examples, &limits, &mut seen, &mut metrics);
        let response_variants = variants::assemble(&block, &mut metrics);

        metrics.intents += 1;
        intents.push(IntentDefinition {
            path: normalize_intent_path(&block.intent_path),
            name,
            examples,
            response_variants,
        });
    }

    CompileRun { intents, metrics }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "\
#intent: interview/feelingToday
#pt:
- como você está?
- tudo bem?
#en:
- how are you?
#vr_pt:
Estou bem, obrigado.
#vr_en:
I'm fine, thanks.
---
this block has no identifier and is skipped
---
#intent: goodbye
";

    #[test]
    fn compiles_blocks_and_counts_ignored_ones() {
        let run = compile(DOC, &GlobalLimits::default());

        assert_eq!(run.metrics.blocks, 3);
        assert_eq!(run.metrics.blocks_ignored, 1);
        assert_eq!(run.metrics.intents, 2);
        assert_eq!(run.intents.len(), 2);

        let first = &run.intents[0];
        assert_eq!(first.path, "interview/feelingToday");
        assert_eq!(first.name, "feelingToday");
        assert_eq!(first.examples.pt, vec!["como você está?", "tudo bem?"]);
        assert_eq!(first.examples.en, vec!["how are you?"]);
        assert_eq!(first.response_variants.len(), 1);

        // The identifier-only block still carries synthesized examples and a
        // placeholder variant.
        let second = &run.intents[1];
        assert_eq!(second.name, "goodbye");
        assert_eq!(second.examples.len(), 2);
        assert_eq!(second.response_variants.len(), 1);
    }

    #[test]
    fn later_blocks_lose_repeated_phrases() {
        let doc = "\
#intent: a
#pt:
- oi
---
#intent: b
#pt:
- oi
- olá
";
        let run = compile(doc, &GlobalLimits::default());
        assert_eq!(run.intents[0].examples.pt, vec!["oi"]);
        assert_eq!(run.intents[1].examples.pt, vec!["olá"]);
        assert_eq!(run.metrics.examples_deduplicated, 1);
    }
}
