//! Herdbook persistent store.
//!
//! The store is a single pretty-printed JSON document, loaded whole, mutated
//! in memory, and written back whole through an atomic replace. It is edited
//! by hand between runs, so loading detects the text encoding instead of
//! assuming one and serialization keeps non-ASCII characters verbatim.
//!
//! Crash safety comes from [`StoreSession`]: the reconciler mutates the
//! document inside a session, and the session flushes on *both* exit paths —
//! explicitly on `commit`, best-effort on drop — so a fatal mid-run error
//! still leaves the last partially-reconciled state on disk for the next
//! attempt to resume from.

pub mod document;
pub mod migrate;
pub mod text;

#[cfg(test)]
mod tests;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

pub use document::{
    Category, Changeling, Cost, CurrencyAmount, EntityRecord, GameDocument, Minigame, PageStatus,
    PrizeInfo, Reward, TokenCost, Translations, WikiStatus, UNKNOWN_LOCATION,
};
pub use migrate::CURRENT_FILE_VERSION;

pub struct Store {
    path: PathBuf,
    pub document: GameDocument,
}

impl Store {
    /// Load the document at `path`, applying schema migrations. A missing
    /// file is an empty document at the current version.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let document = if path.exists() {
            let raw = text::read_to_string(&path)?;
            let mut value: Value = serde_json::from_str(&raw)
                .with_context(|| format!("parsing {}", path.display()))?;
            migrate::apply_migrations(&mut value)
                .with_context(|| format!("migrating {}", path.display()))?;
            serde_json::from_value(value)
                .with_context(|| format!("decoding {}", path.display()))?
        } else {
            GameDocument::default()
        };
        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the full document back: pretty-printed, insertion-ordered keys,
    /// non-ASCII verbatim, replaced atomically via a sibling temp file.
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.document)
            .context("serializing store document")?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
                parent
            }
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("creating temp file in {}", dir.display()))?;
        tmp.write_all(json.as_bytes())
            .with_context(|| format!("writing {}", tmp.path().display()))?;
        tmp.persist(&self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }

    pub fn session(&mut self) -> StoreSession<'_> {
        StoreSession {
            store: self,
            committed: false,
        }
    }
}

/// Scoped write session over a [`Store`].
///
/// `commit` saves and surfaces any error; dropping an uncommitted session
/// saves best-effort and only logs, which is the behavior wanted while an
/// error is already unwinding through the caller.
pub struct StoreSession<'a> {
    store: &'a mut Store,
    committed: bool,
}

impl StoreSession<'_> {
    pub fn document(&mut self) -> &mut GameDocument {
        &mut self.store.document
    }

    pub fn commit(mut self) -> Result<()> {
        self.committed = true;
        self.store.save()
    }
}

impl Drop for StoreSession<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if let Err(error) = self.store.save() {
            tracing::error!(
                path = %self.store.path.display(),
                error = %error,
                "failed to flush store while unwinding"
            );
        }
    }
}
