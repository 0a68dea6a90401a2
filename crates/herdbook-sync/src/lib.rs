//! Herdbook reconciliation engine.
//!
//! The incremental heart of herdbook: merges freshly-extracted game facts
//! into a possibly pre-existing, hand-edited record store without destroying
//! manual edits. One run is a single synchronous pass — entity by entity,
//! with one deferred cross-entity pass for friend groups — over a document
//! the caller loads and persists through `herdbook-store`.
//!
//! ```text
//!   extracted objects ──┐
//!   locale tables ──────┤                       ┌── translations (lockable)
//!   campaign/prizes ────┼──► Reconciler ────────┼── derived facts (recomputed)
//!   textures ───────────┤     per entity        ├── trimmed sprites
//!   page probe ─────────┘         │             └── wiki link cache
//!                                 ▼
//!                          group resolution
//!                          (join barrier)
//! ```

pub mod config;
pub mod groups;
pub mod reconcile;
pub mod translate;
pub mod wiki;

pub use config::ReconcilerConfig;
pub use groups::GroupTable;
pub use reconcile::{Reconciler, RunOptions, Sources};
pub use translate::{merge_translations, TranslationKind};
pub use wiki::{
    refresh_pages, wiki_slug, HttpProbe, PageProbe, ProbeOutcome, WikiConfig, WikiSite,
    RECHECK_WINDOW_SECS,
};
