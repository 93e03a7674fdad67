//! Response variant assembly.
//!
//! A response variant is a `#vr_pt:` field immediately followed by a
//! `#vr_en:` field. The field scanner already bounds each side at the next
//! tag line, so a pair's extent naturally ends at the next pair, the next
//! generic tag, the block delimiter, or end of document. An `#rp` control
//! marker inside the `#vr_pt` side is stripped (content after it is kept);
//! inside the `#vr_en` side it terminates the captured text.
//!
//! A pair contributes only if both sides are non-empty after cleaning. An
//! intent with zero valid pairs gets one placeholder pair explicitly marked
//! as a translation stub, so downstream consumers never receive an intent
//! without response content.

use super::metrics::CompileMetrics;
use super::splitter::TaggedBlock;
use crate::ResponseVariant;
use tracing::warn;

const VARIANT_A_TAG: &str = "vr_pt";
const VARIANT_B_TAG: &str = "vr_en";

pub(crate) const PLACEHOLDER_PT: &str = "TODO: adicionar resposta em PT";
pub(crate) const PLACEHOLDER_EN: &str = "TODO: add response in EN";

/// Collect the block's response pairs, in discovery order.
pub(crate) fn assemble(block: &TaggedBlock, metrics: &mut CompileMetrics) -> Vec<ResponseVariant> {
    let mut variants = Vec::new();

    let mut fields = block.fields.iter().peekable();
    while let Some(field) = fields.next() {
        if field.tag != VARIANT_A_TAG {
            continue;
        }
        let Some(&partner) = fields.peek().filter(|f| f.tag == VARIANT_B_TAG) else {
            warn!(block = block.index, "#vr_pt without an adjacent #vr_en; pair dropped");
            continue;
        };

        let text_pt = clean_side(field.text_stripping_markers());
        let text_en = clean_side(partner.text_until_marker());
        fields.next();

        if text_pt.is_empty() || text_en.is_empty() {
            warn!(block = block.index, "response pair with an empty side; pair dropped");
            continue;
        }
        variants.push(ResponseVariant { text_pt, text_en });
    }

    if variants.is_empty() {
        metrics.placeholder_variants += 1;
        variants.push(ResponseVariant {
            text_pt: PLACEHOLDER_PT.to_string(),
            text_en: PLACEHOLDER_EN.to_string(),
        });
    }

    variants
}

/// Remove a leading literal-block `|` marker if the author wrote one.
fn clean_side(text: String) -> String {
    text.strip_prefix('|').map(|rest| rest.trim().to_string()).unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::splitter::{RawBlock, parse_block};

    fn assemble_text(text: &str) -> (Vec<ResponseVariant>, CompileMetrics) {
        let block = parse_block(&RawBlock { index: 1, text: text.to_string() }).unwrap();
        let mut metrics = CompileMetrics::default();
        let variants = assemble(&block, &mut metrics);
        (variants, metrics)
    }

    #[test]
    fn collects_multiple_pairs_in_order() {
        let (variants, metrics) = assemble_text(
            "#intent: x\n#vr_pt: Olá!\n#vr_en: Hello!\n#vr_pt:\nTudo bem?\n#vr_en:\nAll good?\n",
        );
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].text_pt, "Olá!");
        assert_eq!(variants[0].text_en, "Hello!");
        assert_eq!(variants[1].text_pt, "Tudo bem?");
        assert_eq!(variants[1].text_en, "All good?");
        assert_eq!(metrics.placeholder_variants, 0);
    }

    #[test]
    fn multiline_sides_preserve_inner_lines() {
        let (variants, _) = assemble_text("#intent: x\n#vr_pt:\nlinha um\nlinha dois\n#vr_en:\nline one\n");
        assert_eq!(variants[0].text_pt, "linha um\nlinha dois");
    }

    #[test]
    fn marker_inside_pt_side_is_stripped_not_truncating() {
        let (variants, _) =
            assemble_text("#intent: x\n#vr_pt:\nA\n#rp\nB\n#vr_en:\nC\n");
        assert_eq!(variants[0].text_pt, "A\nB");
        assert_eq!(variants[0].text_en, "C");
    }

    #[test]
    fn marker_inside_en_side_terminates_it() {
        let (variants, _) =
            assemble_text("#intent: x\n#vr_pt:\nOlá\n#vr_en:\nvisible\n#rp_2\nhidden\n");
        assert_eq!(variants[0].text_en, "visible");
    }

    #[test]
    fn leading_literal_marker_is_stripped() {
        let (variants, _) = assemble_text("#intent: x\n#vr_pt: |\n  Olá\n#vr_en: Hi\n");
        assert_eq!(variants[0].text_pt, "Olá");
    }

    #[test]
    fn pair_with_empty_side_is_dropped() {
        let (variants, metrics) = assemble_text("#intent: x\n#vr_pt: Olá\n#vr_en:\n");
        // The only candidate pair is invalid, so the placeholder stands in.
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].text_pt, PLACEHOLDER_PT);
        assert_eq!(variants[0].text_en, PLACEHOLDER_EN);
        assert_eq!(metrics.placeholder_variants, 1);
    }

    #[test]
    fn vr_en_before_vr_pt_does_not_pair() {
        let (variants, metrics) = assemble_text("#intent: x\n#vr_en: Hi\n#vr_pt: Olá\n");
        assert_eq!(variants[0].text_pt, PLACEHOLDER_PT);
        assert_eq!(metrics.placeholder_variants, 1);
    }

    #[test]
    fn intent_without_pairs_gets_placeholder_stub() {
        let (variants, metrics) = assemble_text("#intent: x\n#pt:\n- oi\n");
        assert_eq!(variants.len(), 1);
        assert!(variants[0].text_pt.starts_with("TODO:"));
        assert!(variants[0].text_en.starts_with("TODO:"));
        assert_eq!(metrics.placeholder_variants, 1);
    }
}
