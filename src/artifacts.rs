//! Per-intent output artifacts.
//!
//! Each compiled intent gets a directory derived from its slash-segmented
//! path under the base output directory, holding an examples document
//! (`questions.yml`) and a responses document (`responses.yml`). The
//! directory tree doubles as the durable record of every intent ever
//! generated: reconciliation discovers intents by walking the tree for
//! examples documents, so intents from earlier runs stay registered even
//! when absent from today's input.

use crate::error::{IntentcError, Result};
use crate::{IntentDefinition, LANGUAGES, canonical_intent_name};
use indexmap::IndexMap;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub(crate) const QUESTIONS_FILE: &str = "questions.yml";
pub(crate) const RESPONSES_FILE: &str = "responses.yml";

// --- Document shapes ---------------------------------------------------------

#[derive(Debug, Serialize)]
struct QuestionsDoc {
    version: String,
    nlu: Vec<NluEntry>,
}

#[derive(Debug, Serialize)]
struct NluEntry {
    intent: String,
    /// Newline-delimited `- phrase` lines, PT first, then EN.
    examples: String,
}

#[derive(Debug, Serialize)]
struct ResponsesDoc {
    version: String,
    responses: IndexMap<String, Vec<ResponseBody>>,
}

#[derive(Debug, Serialize)]
struct ResponseBody {
    custom: IndexMap<String, VariantTexts>,
}

#[derive(Debug, Serialize)]
struct VariantTexts {
    vr_pt: String,
    vr_en: String,
}

// --- Writing -----------------------------------------------------------------

/// Write the examples and responses documents for one intent.
pub(crate) fn write_intent(base_dir: &Path, def: &IntentDefinition) -> Result<()> {
    let folder = intent_folder(base_dir, &def.path);
    std::fs::create_dir_all(&folder).map_err(|e| IntentcError::io("create directory", &folder, e))?;

    let mut lines = String::new();
    for lang in LANGUAGES {
        for example in def.examples.get(lang) {
            lines.push_str("- ");
            lines.push_str(example);
            lines.push('\n');
        }
    }

    let questions = QuestionsDoc {
        version: crate::registry::DOCUMENT_VERSION.to_string(),
        nlu: vec![NluEntry { intent: def.name.clone(), examples: lines }],
    };
    crate::registry::save(&questions, &folder.join(QUESTIONS_FILE))?;

    let mut custom = IndexMap::new();
    for (idx, variant) in def.response_variants.iter().enumerate() {
        custom.insert(
            format!("resp_{}", idx + 1),
            VariantTexts { vr_pt: literal_text(&variant.text_pt), vr_en: literal_text(&variant.text_en) },
        );
    }
    let responses = ResponsesDoc {
        version: crate::registry::DOCUMENT_VERSION.to_string(),
        responses: IndexMap::from([(format!("utter_{}", def.name), vec![ResponseBody { custom }])]),
    };
    crate::registry::save(&responses, &folder.join(RESPONSES_FILE))?;

    debug!(intent = %def.name, folder = %folder.display(), "intent artifacts written");
    Ok(())
}

fn intent_folder(base_dir: &Path, intent_path: &str) -> PathBuf {
    let mut folder = base_dir.to_path_buf();
    for segment in intent_path.split('/').filter(|s| !s.trim().is_empty()) {
        folder.push(segment.trim());
    }
    folder
}

/// Response texts are stored with exactly one trailing newline so the YAML
/// emitter keeps them as literal blocks.
fn literal_text(text: &str) -> String {
    format!("{}\n", text.trim_end())
}

// --- Discovery ---------------------------------------------------------------

/// Walk `base_dir` for examples documents and return the canonical names of
/// every intent found, sorted and deduplicated.
///
/// This is the input of the reconciler: the registry sync covers all intents
/// ever generated, not only the ones compiled in this run.
pub(crate) fn discover_intents(base_dir: &Path) -> Result<Vec<String>> {
    let mut paths = Vec::new();
    if base_dir.is_dir() {
        walk(base_dir, base_dir, &mut paths)?;
    }

    let mut names: Vec<String> = paths.iter().map(|p| canonical_intent_name(p)).collect();
    names.sort();
    names.dedup();
    Ok(names)
}

fn walk(base_dir: &Path, dir: &Path, out: &mut Vec<String>) -> Result<()> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| IntentcError::io("read directory", dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    entries.sort();

    for path in entries {
        if path.is_dir() {
            walk(base_dir, &path, out)?;
        } else if path.file_name().is_some_and(|name| name == QUESTIONS_FILE) {
            if let Some(rel) = path.parent().and_then(|p| p.strip_prefix(base_dir).ok()) {
                let rel = rel.to_string_lossy().replace('\\', "/");
                // A questions document at the base directory itself has no
                // intent folder and therefore no name.
                if !rel.is_empty() {
                    out.push(rel);
                }
            }
        }
    }
    Ok(())
}
