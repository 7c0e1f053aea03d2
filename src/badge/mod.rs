//! # Custom Badge Catalog
//!
//! A small, user-defined catalog of reusable badges (text or image overlays)
//! that pops can reference by id.
//!
//! ## Modules
//!
//! - [`model`]: `CustomBadge`, `CustomBadgeInput` and the defaulting table
//! - [`validate`]: pure field validators
//! - [`storage`]: key/value backends (memory, file)
//! - [`store`]: `BadgeStore`, the catalog's CRUD surface
//!
//! ## Example
//!
//! ```
//! use popsheet::badge::{BadgeStore, CustomBadgeInput, MemoryStorage};
//!
//! let store = BadgeStore::new(MemoryStorage::new());
//! let sale = store.create(CustomBadgeInput::text("Sale", "SALE")).unwrap();
//! assert_eq!(store.get_all(), vec![sale]);
//! ```

pub mod model;
pub mod storage;
pub mod store;
pub mod validate;

pub use model::{
    BadgeAlign, BadgeContent, BadgeKind, BadgeShape, BadgeVerticalAlign, Crop, CustomBadge,
    CustomBadgeInput, ImageSettings,
};
pub use storage::{FileStorage, MemoryStorage, StorageBackend, StorageError};
pub use store::{
    BadgeStore, CATALOG_KEY, CATALOG_VERSION, CatalogDocument, CatalogError, MAX_BADGES,
    PersistenceError,
};
pub use validate::{ValidationError, validate_name, validate_text};
