use crate::compiler::{self, GlobalLimits};
use crate::error::{IntentcError, Result};
use crate::registry::{self, Domain, ReconcileStats, RuleSet, StorySet, WiringPolicy};
use crate::{CompileMetrics, IntentDefinition, artifacts};
use std::path::PathBuf;
use tracing::info;

/// Global example limits supplied at invocation time.
///
/// These are the lowest-precedence layer: block-local `#max_pt` / `#max_en` /
/// `#max` tags override them. `None` means unlimited.
#[derive(Debug, Clone, Copy, Default)]
pub struct Limits {
    /// Combined limit applied to both languages.
    pub max_both: Option<usize>,
    pub max_pt: Option<usize>,
    pub max_en: Option<usize>,
}

impl Limits {
    fn to_globals(self) -> GlobalLimits {
        GlobalLimits { max_both: self.max_both, max_pt: self.max_pt, max_en: self.max_en }
    }
}

/// Result of compiling one document, before any filesystem output.
#[derive(Debug, Clone)]
pub struct CompileOutcome {
    /// Intent definitions in block order.
    pub intents: Vec<IntentDefinition>,
    pub metrics: CompileMetrics,
}

/// Compile a raw input document into intent definitions.
///
/// This is the pure front half of a run: no filesystem access, deterministic
/// for a given input. Malformed blocks are skipped and counted, never fatal.
///
/// # Example
/// ```
/// use intentc::{Limits, compile_document};
///
/// let out = compile_document("#intent: greet\n#pt:\n- oi\n", &Limits::default());
/// assert_eq!(out.intents[0].name, "greet");
/// ```
pub fn compile_document(text: &str, limits: &Limits) -> CompileOutcome {
    let run = compiler::compile(text, &limits.to_globals());
    CompileOutcome { intents: run.intents, metrics: run.metrics }
}

/// Configuration for a full run: compile, write artifacts, reconcile.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Input document path.
    pub input_file: PathBuf,
    /// Base directory for per-intent artifacts (and the rule/story documents).
    pub base_dir: PathBuf,
    /// Path of the intent-roster (domain) document.
    pub domain_path: PathBuf,
    pub limits: Limits,
    /// "Already wired" detection policy for rule/story entries.
    pub wiring: WiringPolicy,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            input_file: PathBuf::from("input.txt"),
            base_dir: PathBuf::from("data"),
            domain_path: PathBuf::from("domain.yml"),
            limits: Limits::default(),
            wiring: WiringPolicy::default(),
        }
    }
}

impl RunOptions {
    pub fn rules_path(&self) -> PathBuf {
        self.base_dir.join("rules.yml")
    }

    pub fn stories_path(&self) -> PathBuf {
        self.base_dir.join("stories.yml")
    }
}

/// Counters from a completed run, for the end-of-run summary.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub compile: CompileMetrics,
    pub reconcile: ReconcileStats,
}

/// Execute a full run.
///
/// Order matters: per-intent artifacts are written first, then the registry
/// documents are loaded (or bootstrapped), merged against *every* intent
/// discovered under the base directory, and written back atomically. Because
/// the merge is idempotent, an interrupted run can simply be re-run.
pub fn run(options: &RunOptions) -> Result<RunSummary> {
    if !options.input_file.is_file() {
        return Err(IntentcError::InputFileNotFound(options.input_file.clone()));
    }
    let text = std::fs::read_to_string(&options.input_file)
        .map_err(|e| IntentcError::io("read", &options.input_file, e))?;

    let outcome = compile_document(&text, &options.limits);
    for def in &outcome.intents {
        info!(
            intent = %def.name,
            pt = def.examples.pt.len(),
            en = def.examples.en.len(),
            variants = def.response_variants.len(),
            "writing intent artifacts"
        );
        artifacts::write_intent(&options.base_dir, def)?;
    }

    let discovered = artifacts::discover_intents(&options.base_dir)?;
    let reconcile_stats = reconcile_registries(options, &discovered)?;

    Ok(RunSummary { compile: outcome.metrics, reconcile: reconcile_stats })
}

fn reconcile_registries(options: &RunOptions, intents: &[String]) -> Result<ReconcileStats> {
    let rules_path = options.rules_path();
    let stories_path = options.stories_path();

    // Load everything before writing anything: a corrupt document must abort
    // the run with all three registries untouched.
    let mut domain: Domain = registry::load_or_bootstrap(&options.domain_path, "domain")?;
    let mut rules: RuleSet = registry::load_or_bootstrap(&rules_path, "rules")?;
    let mut stories: StorySet = registry::load_or_bootstrap(&stories_path, "stories")?;

    let stats = registry::reconcile(&mut domain, &mut rules, &mut stories, intents, options.wiring);

    registry::save(&domain, &options.domain_path)?;
    registry::save(&rules, &rules_path)?;
    registry::save(&stories, &stories_path)?;

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const TWO_BLOCKS: &str = "\
#intent: intentA
#pt:
- bom dia
- boa tarde
- boa noite
#en:
- good morning
- good afternoon
- good evening
#vr_pt:
Olá!
#vr_en:
Hello!
---
#intent: intentB
";

    fn options_in(dir: &Path) -> RunOptions {
        RunOptions {
            input_file: dir.join("input.txt"),
            base_dir: dir.join("data"),
            domain_path: dir.join("domain.yml"),
            ..Default::default()
        }
    }

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn missing_input_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&options_in(dir.path())).unwrap_err();
        assert!(matches!(err, IntentcError::InputFileNotFound(_)));
    }

    #[test]
    fn end_to_end_two_blocks_and_rerun() {
        let dir = tempfile::tempdir().unwrap();
        let options = options_in(dir.path());
        std::fs::write(&options.input_file, TWO_BLOCKS).unwrap();

        let summary = run(&options).unwrap();
        assert_eq!(summary.compile.intents, 2);
        assert_eq!(summary.compile.examples_synthesized, 2);
        assert_eq!(summary.reconcile.intents_added, 2);

        let domain: Domain = serde_yaml::from_str(&read(&options.domain_path)).unwrap();
        assert!(domain.intents.contains(&"intentA".to_string()));
        assert!(domain.intents.contains(&"intentB".to_string()));
        assert!(domain.actions.contains(&"action_fallback".to_string()));

        let rules: RuleSet = serde_yaml::from_str(&read(&options.rules_path())).unwrap();
        for intent in ["intentA", "intentB"] {
            let wired: Vec<_> = rules
                .rules
                .iter()
                .filter(|r| r.steps.iter().any(|s| s.intent.as_deref() == Some(intent)))
                .collect();
            assert_eq!(wired.len(), 1, "exactly one rule for {intent}");
        }

        // intentB had no examples: its artifact carries the two synthesized
        // phrases, one of them a question.
        let questions = read(&dir.path().join("data").join("intentB").join("questions.yml"));
        assert!(questions.contains("- intentB?"));
        assert!(questions.contains("- intentB"));

        // Second run over the same input: registries byte-identical.
        let before =
            (read(&options.domain_path), read(&options.rules_path()), read(&options.stories_path()));
        let summary = run(&options).unwrap();
        let after =
            (read(&options.domain_path), read(&options.rules_path()), read(&options.stories_path()));
        assert_eq!(before, after);
        assert!(summary.reconcile.is_noop());
    }

    #[test]
    fn hand_edits_survive_a_run() {
        let dir = tempfile::tempdir().unwrap();
        let options = options_in(dir.path());
        std::fs::write(&options.input_file, "#intent: greet\n#pt:\n- oi\n").unwrap();
        std::fs::write(
            &options.domain_path,
            "version: '3.1'\nintents:\n- handmade\nslots:\n  mood:\n    type: text\n",
        )
        .unwrap();

        run(&options).unwrap();

        let domain = read(&options.domain_path);
        assert!(domain.contains("handmade"));
        assert!(domain.contains("mood"), "unknown top-level fields are preserved");
        let parsed: Domain = serde_yaml::from_str(&domain).unwrap();
        assert_eq!(parsed.intents.first().map(String::as_str), Some("handmade"));
    }

    #[test]
    fn corrupt_registry_aborts_before_any_write() {
        let dir = tempfile::tempdir().unwrap();
        let options = options_in(dir.path());
        std::fs::write(&options.input_file, "#intent: greet\n").unwrap();
        std::fs::create_dir_all(options.base_dir.clone()).unwrap();
        std::fs::write(options.rules_path(), "rules: 12\n").unwrap();

        let err = run(&options).unwrap_err();
        assert!(matches!(err, IntentcError::CorruptRegistry { .. }));
        assert!(!options.domain_path.exists(), "no registry may be written on a fatal load error");
    }

    #[test]
    fn intents_from_earlier_runs_stay_registered() {
        let dir = tempfile::tempdir().unwrap();
        let options = options_in(dir.path());

        std::fs::write(&options.input_file, "#intent: first\n").unwrap();
        run(&options).unwrap();

        // A new input that no longer mentions `first`.
        std::fs::write(&options.input_file, "#intent: second\n").unwrap();
        run(&options).unwrap();

        let domain: Domain = serde_yaml::from_str(&read(&options.domain_path)).unwrap();
        assert!(domain.intents.contains(&"first".to_string()));
        assert!(domain.intents.contains(&"second".to_string()));
    }

    #[test]
    fn global_limit_applies_when_no_block_override() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = options_in(dir.path());
        options.limits.max_both = Some(1);
        std::fs::write(&options.input_file, "#intent: x\n#pt:\n- um\n- dois\n").unwrap();

        let summary = run(&options).unwrap();
        assert_eq!(summary.compile.examples_truncated, 1);

        let questions = read(&dir.path().join("data").join("x").join("questions.yml"));
        assert!(questions.contains("- um"));
        assert!(!questions.contains("- dois"));
    }
}
