//! The merge-only reconciliation pass.
//!
//! Runs once per invocation, after all intent definitions are written,
//! against the three registry documents. Per document the pass is, in order:
//!
//! 1. collapse duplicates of the reserved fallback entry name (keep the
//!    first occurrence);
//! 2. canonicalize the legacy fallback alias: any step pairing the fallback
//!    intent with the legacy action is rewritten in place;
//! 3. append each discovered intent to the roster if absent;
//! 4. wire each discovered intent: append a `(IntentRef, ActionRef)` entry
//!    unless some existing entry already pairs that intent with an accepted
//!    action;
//! 5. ensure the reserved fallback entry and the canonical fallback action
//!    exist.
//!
//! Canonicalizing before wiring means an entry wired under the legacy alias
//! counts as wired, and new entries are always appended with the canonical
//! action, so a second pass over the output changes nothing.

use super::document::{
    Domain, FALLBACK_ACTION, FALLBACK_INTENT, LEGACY_FALLBACK_ACTION, NamedEntry, RuleSet, Step, StorySet,
};
use tracing::{debug, info};

/// What counts as "already wired" when deciding whether an intent needs a new
/// rule/story entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WiringPolicy {
    /// An entry must reference both the intent and an accepted action. The
    /// default: most permissive toward externally hand-edited entries, which
    /// keep their own wiring while still getting the standard one.
    #[default]
    IntentAndAction,
    /// An intent reference alone counts, regardless of action.
    IntentOnly,
}

/// Counters for one reconciliation pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Canonical names appended to the intent roster.
    pub intents_added: usize,
    /// Rule entries appended.
    pub rules_added: usize,
    /// Story entries appended.
    pub stories_added: usize,
    /// Steps rewritten from the legacy fallback alias to the canonical action.
    pub aliases_canonicalized: usize,
    /// Entries discarded as duplicates of the reserved fallback entry name.
    pub duplicates_collapsed: usize,
    /// Whether the canonical fallback action was appended to the domain.
    pub fallback_action_added: bool,
}

impl ReconcileStats {
    /// True when the pass changed nothing (the documents were already
    /// reconciled).
    pub fn is_noop(&self) -> bool {
        *self == ReconcileStats::default()
    }
}

/// Merge `intents` (sorted canonical names) into the three documents.
pub(crate) fn reconcile(
    domain: &mut Domain,
    rules: &mut RuleSet,
    stories: &mut StorySet,
    intents: &[String],
    policy: WiringPolicy,
) -> ReconcileStats {
    let mut stats = ReconcileStats::default();

    stats.duplicates_collapsed += collapse_reserved_duplicates(&mut rules.rules);
    stats.duplicates_collapsed += collapse_reserved_duplicates(&mut stories.stories);

    stats.aliases_canonicalized += canonicalize_fallback_alias(&mut rules.rules);
    stats.aliases_canonicalized += canonicalize_fallback_alias(&mut stories.stories);

    for intent in intents {
        if !domain.intents.contains(intent) {
            domain.intents.push(intent.clone());
            stats.intents_added += 1;
        }
    }

    stats.rules_added = wire_intents(&mut rules.rules, intents, policy);
    stats.stories_added = wire_intents(&mut stories.stories, intents, policy);

    if ensure_fallback_entry(&mut rules.rules) {
        stats.rules_added += 1;
    }
    if ensure_fallback_entry(&mut stories.stories) {
        stats.stories_added += 1;
    }

    if !domain.actions.iter().any(|a| a == FALLBACK_ACTION) {
        domain.actions.push(FALLBACK_ACTION.to_string());
        stats.fallback_action_added = true;
        info!(action = FALLBACK_ACTION, "fallback action added to domain");
    }

    stats
}

/// The action a generated entry pairs with `intent`. The fallback intent is
/// wired straight to the canonical fallback action.
fn expected_action(intent: &str) -> String {
    if intent == FALLBACK_INTENT { FALLBACK_ACTION.to_string() } else { format!("utter_{intent}") }
}

/// Whether `action` fulfills the wiring for `intent`. The fallback intent
/// accepts either the canonical action or its legacy alias, so a rule that
/// already fulfills the role under the old name is not re-added.
fn action_accepted(intent: &str, action: &str) -> bool {
    if action == expected_action(intent) {
        return true;
    }
    intent == FALLBACK_INTENT && action == LEGACY_FALLBACK_ACTION
}

fn is_wired<E: NamedEntry>(entries: &[E], intent: &str, policy: WiringPolicy) -> bool {
    entries.iter().any(|entry| {
        let has_intent = entry.steps().iter().any(|s| s.intent.as_deref() == Some(intent));
        if !has_intent {
            return false;
        }
        match policy {
            WiringPolicy::IntentOnly => true,
            WiringPolicy::IntentAndAction => entry
                .steps()
                .iter()
                .any(|s| s.action.as_deref().is_some_and(|a| action_accepted(intent, a))),
        }
    })
}

fn wire_intents<E: NamedEntry>(entries: &mut Vec<E>, intents: &[String], policy: WiringPolicy) -> usize {
    let mut added = 0;
    for intent in intents {
        if is_wired(entries, intent, policy) {
            continue;
        }
        debug!(intent = %intent, "intent not wired; appending entry");
        entries.push(E::new(
            format!("{}{}", E::name_prefix(), intent),
            vec![Step::intent_ref(intent.clone()), Step::action_ref(expected_action(intent))],
        ));
        added += 1;
    }
    added
}

/// Rewrite legacy-alias actions in place for entries referencing the fallback
/// intent. Returns the number of steps rewritten.
fn canonicalize_fallback_alias<E: NamedEntry>(entries: &mut [E]) -> usize {
    let mut rewritten = 0;
    for entry in entries.iter_mut() {
        let has_fallback_intent = entry.steps().iter().any(|s| s.intent.as_deref() == Some(FALLBACK_INTENT));
        if !has_fallback_intent {
            continue;
        }
        for step in entry.steps_mut() {
            if step.action.as_deref() == Some(LEGACY_FALLBACK_ACTION) {
                step.action = Some(FALLBACK_ACTION.to_string());
                rewritten += 1;
            }
        }
    }
    rewritten
}

/// Keep only the first entry bearing the reserved fallback name. Returns the
/// number of discarded duplicates.
fn collapse_reserved_duplicates<E: NamedEntry>(entries: &mut Vec<E>) -> usize {
    let before = entries.len();
    let mut seen = false;
    entries.retain(|entry| {
        if entry.name() == E::fallback_name() {
            if seen {
                return false;
            }
            seen = true;
        }
        true
    });
    before - entries.len()
}

/// Append the reserved fallback entry when no entry bears its name. Returns
/// whether an entry was appended.
fn ensure_fallback_entry<E: NamedEntry>(entries: &mut Vec<E>) -> bool {
    if entries.iter().any(|entry| entry.name() == E::fallback_name()) {
        return false;
    }
    entries.push(E::new(
        E::fallback_name().to_string(),
        vec![Step::intent_ref(FALLBACK_INTENT), Step::action_ref(FALLBACK_ACTION)],
    ));
    true
}
