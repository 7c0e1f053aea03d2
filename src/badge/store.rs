//! The badge catalog store.
//!
//! The catalog is one JSON document stored under [`CATALOG_KEY`]:
//!
//! ```json
//! {
//!   "badges": [ { "id": "…", "name": "Sale", "type": "text", … } ],
//!   "version": "1.0"
//! }
//! ```
//!
//! Every mutation loads the whole document, changes it in memory, and writes
//! the whole document back. There is no locking or revision check: two
//! writers racing on the same storage lose one update (last write wins).
//!
//! Reads fail open (an unreadable or mismatched document is treated as an
//! empty catalog). Writes fail closed (a rejected write is returned to the
//! caller).

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::model::{CustomBadge, CustomBadgeInput};
use super::storage::{StorageBackend, StorageError};
use super::validate::{self, ValidationError};

/// Storage key for the catalog document.
pub const CATALOG_KEY: &str = "custom-badges";

/// Schema version. Documents with any other version are discarded on load.
pub const CATALOG_VERSION: &str = "1.0";

/// Maximum number of badges in the catalog.
pub const MAX_BADGES: usize = 5;

/// Errors returned by catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Badge catalog is full (maximum {max} badges)")]
    CapacityExceeded { max: usize },

    #[error("A badge named '{0}' already exists")]
    DuplicateName(String),

    #[error("Badge not found: {0}")]
    NotFound(String),

    #[error("Failed to persist badge catalog: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Why a catalog write failed.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The persisted unit: all badges plus the schema version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub badges: Vec<CustomBadge>,
    pub version: String,
}

impl CatalogDocument {
    /// An empty document at the current version.
    pub fn empty() -> Self {
        Self {
            badges: Vec::new(),
            version: CATALOG_VERSION.to_string(),
        }
    }
}

impl Default for CatalogDocument {
    fn default() -> Self {
        Self::empty()
    }
}

/// Sole reader and writer of the catalog document in a storage backend.
#[derive(Debug)]
pub struct BadgeStore<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> BadgeStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Read the catalog document.
    ///
    /// Returns an empty current-version document when the entry is absent,
    /// unreadable, not valid JSON, or carries a different version.
    pub fn load(&self) -> CatalogDocument {
        let raw = match self.backend.get(CATALOG_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return CatalogDocument::empty(),
            Err(e) => {
                tracing::warn!(
                    backend = self.backend.name(),
                    error = %e,
                    "failed to read badge catalog"
                );
                return CatalogDocument::empty();
            }
        };

        let doc: CatalogDocument = match serde_json::from_str(&raw) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(error = %e, "badge catalog is corrupt, starting empty");
                return CatalogDocument::empty();
            }
        };

        if doc.version != CATALOG_VERSION {
            tracing::info!(
                stored = %doc.version,
                expected = CATALOG_VERSION,
                "badge catalog version mismatch, resetting"
            );
            return CatalogDocument::empty();
        }

        doc
    }

    /// Write the whole document in a single `set`.
    pub fn save(&self, doc: &CatalogDocument) -> Result<(), CatalogError> {
        let json = serde_json::to_string(doc).map_err(PersistenceError::from)?;
        self.backend
            .set(CATALOG_KEY, &json)
            .map_err(PersistenceError::from)?;
        tracing::debug!(badges = doc.badges.len(), "saved badge catalog");
        Ok(())
    }

    /// All badges in creation order.
    pub fn get_all(&self) -> Vec<CustomBadge> {
        self.load().badges
    }

    pub fn get_by_id(&self, id: &str) -> Option<CustomBadge> {
        self.load().badges.into_iter().find(|b| b.id == id)
    }

    /// Add a new badge.
    ///
    /// Fails with `Validation`, `CapacityExceeded` or `DuplicateName` without
    /// touching storage.
    pub fn create(&self, input: CustomBadgeInput) -> Result<CustomBadge, CatalogError> {
        let mut doc = self.load();

        let now = Utc::now();
        let badge = input.into_badge(Uuid::new_v4().to_string(), now, now);
        validate::validate_badge(&badge)?;

        if doc.badges.len() >= MAX_BADGES {
            return Err(CatalogError::CapacityExceeded { max: MAX_BADGES });
        }
        if doc.badges.iter().any(|b| b.name == badge.name) {
            return Err(CatalogError::DuplicateName(badge.name));
        }

        doc.badges.push(badge.clone());
        self.save(&doc)?;

        tracing::debug!(id = %badge.id, name = %badge.name, "created badge");
        Ok(badge)
    }

    /// Replace every mutable field of an existing badge.
    ///
    /// Keeping the badge's own name is allowed; taking another badge's name
    /// fails with `DuplicateName`.
    pub fn update(&self, id: &str, input: CustomBadgeInput) -> Result<CustomBadge, CatalogError> {
        let mut doc = self.load();

        let index = doc
            .badges
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;

        if doc
            .badges
            .iter()
            .any(|b| b.id != id && b.name == input.name)
        {
            return Err(CatalogError::DuplicateName(input.name));
        }

        let mut updated = doc.badges[index].clone();
        updated.overwrite(input, Utc::now());
        validate::validate_badge(&updated)?;

        doc.badges[index] = updated.clone();
        self.save(&doc)?;

        tracing::debug!(id = %updated.id, name = %updated.name, "updated badge");
        Ok(updated)
    }

    pub fn delete(&self, id: &str) -> Result<(), CatalogError> {
        let mut doc = self.load();

        let before = doc.badges.len();
        doc.badges.retain(|b| b.id != id);
        if doc.badges.len() == before {
            return Err(CatalogError::NotFound(id.to_string()));
        }

        self.save(&doc)?;
        tracing::debug!(id = %id, "deleted badge");
        Ok(())
    }

    /// Reset to an empty current-version document.
    pub fn clear_all(&self) -> Result<(), CatalogError> {
        self.save(&CatalogDocument::empty())?;
        tracing::info!("cleared badge catalog");
        Ok(())
    }
}
