//! Registry documents and their reconciliation.
//!
//! The back half of the system: three accumulating YAML documents — the
//! domain (intent roster + action roster), the rule set, and the story set —
//! are loaded (or bootstrapped), merged with this run's discovered intents,
//! and written back atomically.
//!
//! ```text
//! domain.yml ──┐
//! rules.yml  ──┼── store::load_or_bootstrap ──┐  (typed, validated on load)
//! stories.yml ─┘                              │
//!                                             v
//! discovered intents ────────────► reconcile::reconcile
//!                                    - append-only intent roster
//!                                    - wire rule/story per intent
//!                                    - canonicalize legacy fallback alias
//!                                    - collapse reserved-name duplicates
//!                                             │
//!                                             v
//!                                  store::save (temp file + rename)
//! ```
//!
//! Every mutation is merge-only: existing entries are never removed (the one
//! exception is collapsing duplicates of the reserved fallback entry name),
//! never reordered, and unknown fields survive the round-trip. Reconciling a
//! second time against the first run's output is a no-op, which is what makes
//! a partially-completed run safe to re-run from scratch.
//!
//! ## Responsibilities by module
//!
//! - `document.rs`: strongly-typed schemas, defaults, and the fallback
//!   naming constants.
//! - `store.rs`: load-with-validation, bootstrap of missing documents, and
//!   atomic write-back.
//! - `reconcile.rs`: the merge algorithm itself.

#[path = "registry/document.rs"]
mod document;
#[path = "registry/reconcile.rs"]
mod reconcile;
#[path = "registry/store.rs"]
mod store;

pub use document::{Domain, RuleEntry, RuleSet, SessionConfig, Step, StoryEntry, StorySet};
pub use reconcile::{ReconcileStats, WiringPolicy};

pub(crate) use document::DOCUMENT_VERSION;
pub(crate) use reconcile::reconcile;
pub(crate) use store::{load_or_bootstrap, save};
