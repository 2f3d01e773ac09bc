//! Remote collaborator traits.
//!
//! The store never talks to a database or a file host directly. It goes
//! through [`DocumentStore`] for records and [`ImageUploader`] for profile
//! images, so any backend (a hosted document database, a REST service, the
//! bundled [`InMemoryDocumentStore`](crate::InMemoryDocumentStore)) can be
//! plugged in.
//!
//! # Example: Implementing DocumentStore
//!
//! ```ignore
//! use async_trait::async_trait;
//! use meddash_store::{Document, DocumentStore, Fields, RemoteResult};
//!
//! struct RestBackend { client: MyHttpClient }
//!
//! #[async_trait]
//! impl DocumentStore for RestBackend {
//!     fn backend_name(&self) -> &'static str {
//!         "rest"
//!     }
//!
//!     async fn fetch_all(&self, collection: &str) -> RemoteResult<Vec<Document>> {
//!         self.client.list(collection).await
//!     }
//!
//!     async fn insert(&self, collection: &str, fields: Fields) -> RemoteResult<String> {
//!         self.client.post(collection, fields).await
//!     }
//!
//!     async fn update(&self, collection: &str, id: &str, fields: Fields) -> RemoteResult<()> {
//!         self.client.patch(collection, id, fields).await
//!     }
//!
//!     async fn delete(&self, collection: &str, id: &str) -> RemoteResult<()> {
//!         self.client.delete(collection, id).await
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::RemoteResult;

/// Field map of a stored document.
pub type Fields = Map<String, Value>;

/// A stored document: the collaborator-assigned id plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Collaborator-assigned id.
    pub id: String,
    /// Field values, camelCase keys.
    pub fields: Fields,
}

impl Document {
    /// Creates a document.
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// Minimal CRUD contract of the remote document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns a human-readable name for this backend.
    fn backend_name(&self) -> &'static str;

    /// Returns every document in `collection`.
    async fn fetch_all(&self, collection: &str) -> RemoteResult<Vec<Document>>;

    /// Inserts a document and returns the id assigned to it.
    async fn insert(&self, collection: &str, fields: Fields) -> RemoteResult<String>;

    /// Overwrites the given fields of an existing document.
    ///
    /// Fails with [`RemoteError::NotFound`](crate::RemoteError::NotFound)
    /// when no document has this id.
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> RemoteResult<()>;

    /// Deletes a document. Deleting a missing id succeeds.
    async fn delete(&self, collection: &str, id: &str) -> RemoteResult<()>;
}

/// An image file attached to a create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    /// Original file name.
    pub file_name: String,
    /// MIME type, e.g. `image/png`.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl ImageAttachment {
    /// Creates an attachment.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// Uploads profile images and returns their public URL.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    /// Stores `image` at `path`.
    async fn upload(&self, image: &ImageAttachment, path: &str) -> RemoteResult<String>;
}
