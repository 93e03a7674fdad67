//! Typed schemas for the three registry documents.
//!
//! The documents are hand-edited YAML in the wild, so the schemas are
//! deliberately lossless: every struct carries a flattened `extra` map that
//! round-trips fields this tool does not know about, and collections default
//! to empty so a half-written document still validates. Structural problems
//! (a string where a list belongs, a step that is not a mapping) fail
//! deserialization and are treated as fatal by the store.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Version stamp written into every generated document.
pub(crate) const DOCUMENT_VERSION: &str = "3.1";

/// The distinguished intent matched when nothing else is confidently
/// recognized.
pub(crate) const FALLBACK_INTENT: &str = "nlu_fallback";
/// Canonical action answering the fallback intent.
pub(crate) const FALLBACK_ACTION: &str = "action_fallback";
/// Older action name with the same role; normalized to [`FALLBACK_ACTION`].
pub(crate) const LEGACY_FALLBACK_ACTION: &str = "utter_nlu_fallback";
/// Reserved entry names for the fallback wiring.
pub(crate) const FALLBACK_RULE_NAME: &str = "rule_nlu_fallback";
pub(crate) const FALLBACK_STORY_NAME: &str = "story_nlu_fallback";

fn default_version() -> String {
    DOCUMENT_VERSION.to_string()
}

fn default_session_expiration() -> u64 {
    60
}

fn default_carry_over() -> bool {
    true
}

type Extra = IndexMap<String, serde_yaml::Value>;

// --- Steps -------------------------------------------------------------------

/// One step of a rule or story: an intent reference, an action reference, or
/// a richer hand-authored mapping.
///
/// The representation is a single struct rather than an enum so that a
/// hand-edited step like `{intent: greet, entities: [...]}` survives the
/// round-trip untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(flatten, skip_serializing_if = "IndexMap::is_empty")]
    pub extra: Extra,
}

impl Step {
    pub fn intent_ref(name: impl Into<String>) -> Self {
        Step { intent: Some(name.into()), ..Default::default() }
    }

    pub fn action_ref(name: impl Into<String>) -> Self {
        Step { action: Some(name.into()), ..Default::default() }
    }
}

// --- Rule / story entries ----------------------------------------------------

/// A named entry in the rule set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleEntry {
    #[serde(rename = "rule")]
    pub name: String,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(flatten, skip_serializing_if = "IndexMap::is_empty")]
    pub extra: Extra,
}

/// A named entry in the story set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryEntry {
    #[serde(rename = "story")]
    pub name: String,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(flatten, skip_serializing_if = "IndexMap::is_empty")]
    pub extra: Extra,
}

/// Shared view over rule and story entries, so the reconciler can run the
/// same wiring pass against both sets.
pub(crate) trait NamedEntry: Clone {
    fn new(name: String, steps: Vec<Step>) -> Self;
    fn name(&self) -> &str;
    fn steps(&self) -> &[Step];
    fn steps_mut(&mut self) -> &mut Vec<Step>;
    /// Prefix for deterministically derived entry names (`rule_` / `story_`).
    fn name_prefix() -> &'static str;
    /// The reserved fallback entry name for this entry kind.
    fn fallback_name() -> &'static str;
}

impl NamedEntry for RuleEntry {
    fn new(name: String, steps: Vec<Step>) -> Self {
        RuleEntry { name, steps, extra: Extra::default() }
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn steps(&self) -> &[Step] {
        &self.steps
    }
    fn steps_mut(&mut self) -> &mut Vec<Step> {
        &mut self.steps
    }
    fn name_prefix() -> &'static str {
        "rule_"
    }
    fn fallback_name() -> &'static str {
        FALLBACK_RULE_NAME
    }
}

impl NamedEntry for StoryEntry {
    fn new(name: String, steps: Vec<Step>) -> Self {
        StoryEntry { name, steps, extra: Extra::default() }
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn steps(&self) -> &[Step] {
        &self.steps
    }
    fn steps_mut(&mut self) -> &mut Vec<Step> {
        &mut self.steps
    }
    fn name_prefix() -> &'static str {
        "story_"
    }
    fn fallback_name() -> &'static str {
        FALLBACK_STORY_NAME
    }
}

// --- Documents ---------------------------------------------------------------

/// Session bootstrap settings carried in the domain document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_expiration")]
    pub session_expiration_time: u64,
    #[serde(default = "default_carry_over")]
    pub carry_over_slots_to_new_session: bool,
    #[serde(flatten, skip_serializing_if = "IndexMap::is_empty")]
    pub extra: Extra,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            session_expiration_time: default_session_expiration(),
            carry_over_slots_to_new_session: default_carry_over(),
            extra: Extra::default(),
        }
    }
}

/// The intent-roster document: intents, actions, and session settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub intents: Vec<String>,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub session_config: SessionConfig,
    #[serde(flatten, skip_serializing_if = "IndexMap::is_empty")]
    pub extra: Extra,
}

impl Default for Domain {
    /// The minimal valid skeleton used to bootstrap a missing document.
    fn default() -> Self {
        Domain {
            version: default_version(),
            intents: Vec::new(),
            actions: Vec::new(),
            session_config: SessionConfig::default(),
            extra: Extra::default(),
        }
    }
}

/// The rule-set document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
    #[serde(flatten, skip_serializing_if = "IndexMap::is_empty")]
    pub extra: Extra,
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet { version: default_version(), rules: Vec::new(), extra: Extra::default() }
    }
}

/// The story-set document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorySet {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub stories: Vec<StoryEntry>,
    #[serde(flatten, skip_serializing_if = "IndexMap::is_empty")]
    pub extra: Extra,
}

impl Default for StorySet {
    fn default() -> Self {
        StorySet { version: default_version(), stories: Vec::new(), extra: Extra::default() }
    }
}
