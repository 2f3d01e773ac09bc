//! # meddash-store
//!
//! Doctor store and filter engine for the MedDash roster.
//!
//! This crate owns the in-memory doctor collection, keeps it in sync with a
//! remote document store, and derives the subset of doctors matching the
//! current search/specialty/status criteria.
//!
//! ## Key Features
//!
//! - **Confirm-then-apply** - local state changes only after the remote write succeeds
//! - **Pluggable backends** - any [`DocumentStore`] and [`ImageUploader`] can be used
//! - **Observable** - every change publishes a [`RosterSnapshot`] on a watch channel
//! - **Optional caching** - LRU cache of filter derivations, cleared on every collection change
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use meddash_store::{seed_roster, DoctorFilter, DoctorStore, InMemoryDocumentStore};
//!
//! let remote = Arc::new(InMemoryDocumentStore::with_doctors("doctors", &seed_roster())?);
//! let store = DoctorStore::new(remote);
//!
//! let loaded = store.load().await?;
//! println!("Loaded {loaded} doctors");
//!
//! store.set_filter(DoctorFilter::new().with_search("chen"));
//! for doctor in store.visible() {
//!     println!("{} ({})", doctor.name, doctor.specialty);
//! }
//! ```
//!
//! ## With Configuration
//!
//! ```ignore
//! use meddash_store::{DoctorStore, FilterCacheConfig, StoreConfig};
//!
//! let config = StoreConfig::builder()
//!     .with_collection("doctors")
//!     .with_image_prefix("doctors")
//!     .with_filter_cache(FilterCacheConfig { max_entries: 128 })
//!     .build();
//!
//! let store = DoctorStore::with_config(remote, config)
//!     .with_image_uploader(images)
//!     .with_notifier(notifier);
//! ```
//!
//! ## Operations
//!
//! | Operation | Remote call | Local effect on success | Notice |
//! |-----------|-------------|-------------------------|--------|
//! | `load` | `fetch_all` | collection replaced | `Loaded N doctors` |
//! | `create` | `insert` | record appended | `Doctor added successfully` |
//! | `update` | `update` | fields merged | `Doctor updated successfully` |
//! | `delete` | `delete` | record removed | `Doctor deleted successfully` |
//! | `set_filter` | none | visible subset re-derived | none |
//!
//! A failed remote call leaves the collection untouched (except `load`,
//! which clears it unless configured otherwise) and sends an error notice.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      meddash-store                           │
//! │                                                              │
//! │  DoctorStore                                                 │
//! │  ├── validate input (meddash-model)                          │
//! │  ├── write remotely (via DocumentStore / ImageUploader)      │
//! │  ├── apply locally, bump revision                            │
//! │  ├── re-derive visible subset (FilterEngine + FilterCache)   │
//! │  └── publish RosterSnapshot, send Notice                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod cache;
mod codec;
mod config;
mod error;
pub mod filter;
mod memory;
mod snapshot;
mod store;
mod traits;

// Public re-exports
pub use cache::{CacheStats, FilterCache, FilterKey};
pub use config::{FilterCacheConfig, StoreConfig, StoreConfigBuilder};
pub use error::{RemoteError, RemoteResult, StoreError, StoreResult, WriteOp};
pub use filter::{FilterEngine, FilterStats};
pub use memory::{InMemoryDocumentStore, InMemoryImageStore, RemoteOp};
pub use snapshot::{RosterSnapshot, RosterSummary};
pub use store::DoctorStore;
pub use traits::{Document, DocumentStore, Fields, ImageAttachment, ImageUploader};

// Re-export commonly used types from dependencies for convenience
pub use meddash_model::{
    seed_roster, Doctor, DoctorFilter, DoctorFormData, DoctorPatch, DoctorStatus, Notice,
    Notifier, ValidationError,
};
