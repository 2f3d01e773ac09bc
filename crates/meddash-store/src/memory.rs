//! Process-local remote collaborators.
//!
//! [`InMemoryDocumentStore`] and [`InMemoryImageStore`] implement the remote
//! traits without any network, for demos and tests. Both support fault
//! injection so failure paths can be exercised deterministically.

use std::collections::HashMap;

use async_trait::async_trait;
use meddash_model::Doctor;
use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use crate::codec;
use crate::error::{RemoteError, RemoteResult, StoreResult};
use crate::traits::{Document, DocumentStore, Fields, ImageAttachment, ImageUploader};

/// Operations of the document store contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOp {
    /// `fetch_all`
    FetchAll,
    /// `insert`
    Insert,
    /// `update`
    Update,
    /// `delete`
    Delete,
}

/// Queued failures and per-operation call counts.
#[derive(Debug, Default)]
struct Faults {
    pending: Vec<(RemoteOp, RemoteError)>,
    calls: HashMap<RemoteOp, usize>,
}

impl Faults {
    /// Records a call and returns the first queued failure for `op`, if any.
    fn check(&mut self, op: RemoteOp) -> RemoteResult<()> {
        *self.calls.entry(op).or_default() += 1;
        match self.pending.iter().position(|(queued, _)| *queued == op) {
            Some(index) => Err(self.pending.remove(index).1),
            None => Ok(()),
        }
    }
}

/// Document store holding every collection in memory.
///
/// Ids are random UUIDs, so they are never reused after a delete. Documents
/// keep insertion order.
///
/// # Example
///
/// ```rust
/// use meddash_model::seed_roster;
/// use meddash_store::{InMemoryDocumentStore, RemoteError, RemoteOp};
///
/// let remote = InMemoryDocumentStore::with_doctors("doctors", &seed_roster()).unwrap();
/// assert_eq!(remote.len("doctors"), 8);
///
/// // The next update fails, later ones succeed again.
/// remote.fail_next(RemoteOp::Update, RemoteError::Transport("offline".into()));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    faults: Mutex<Faults>,
}

impl InMemoryDocumentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose `collection` holds `doctors`, keeping their ids.
    pub fn with_doctors(collection: &str, doctors: &[Doctor]) -> StoreResult<Self> {
        let documents = doctors
            .iter()
            .map(|doctor| Ok(Document::new(doctor.id.clone(), codec::encode_doctor(doctor)?)))
            .collect::<StoreResult<Vec<_>>>()?;
        let store = Self::new();
        store
            .collections
            .write()
            .insert(collection.to_string(), documents);
        Ok(store)
    }

    /// Makes the next call of `op` fail with `error`.
    ///
    /// Multiple failures for the same operation are consumed in queue order.
    pub fn fail_next(&self, op: RemoteOp, error: RemoteError) {
        self.faults.lock().pending.push((op, error));
    }

    /// Returns how many times `op` has been called.
    pub fn call_count(&self, op: RemoteOp) -> usize {
        self.faults.lock().calls.get(&op).copied().unwrap_or(0)
    }

    /// Returns the number of documents in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Returns true if `collection` holds no documents.
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    /// Returns a copy of one document.
    pub fn document(&self, collection: &str, id: &str) -> Option<Document> {
        self.collections
            .read()
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id).cloned())
    }

    /// Inserts or replaces a document directly, bypassing fault injection.
    pub fn put(&self, collection: &str, document: Document) {
        let mut collections = self.collections.write();
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|d| d.id == document.id) {
            Some(existing) => *existing = document,
            None => docs.push(document),
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn fetch_all(&self, collection: &str) -> RemoteResult<Vec<Document>> {
        self.faults.lock().check(RemoteOp::FetchAll)?;
        Ok(self
            .collections
            .read()
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn insert(&self, collection: &str, fields: Fields) -> RemoteResult<String> {
        self.faults.lock().check(RemoteOp::Insert)?;
        let id = Uuid::new_v4().to_string();
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .push(Document::new(id.clone(), fields));
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> RemoteResult<()> {
        self.faults.lock().check(RemoteOp::Update)?;
        let mut collections = self.collections.write();
        let document = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| RemoteError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        document.fields.extend(fields);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> RemoteResult<()> {
        self.faults.lock().check(RemoteOp::Delete)?;
        if let Some(docs) = self.collections.write().get_mut(collection) {
            docs.retain(|d| d.id != id);
        }
        Ok(())
    }
}

/// Image host keeping uploads in memory and returning `memory://` URLs.
#[derive(Debug, Default)]
pub struct InMemoryImageStore {
    images: RwLock<HashMap<String, ImageAttachment>>,
    failures: Mutex<Vec<RemoteError>>,
}

impl InMemoryImageStore {
    /// Creates an empty image host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next upload fail with `error`.
    pub fn fail_next(&self, error: RemoteError) {
        self.failures.lock().push(error);
    }

    /// Returns the image stored at `path`.
    pub fn image(&self, path: &str) -> Option<ImageAttachment> {
        self.images.read().get(path).cloned()
    }

    /// Returns every stored path.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.images.read().keys().cloned().collect();
        paths.sort();
        paths
    }
}

#[async_trait]
impl ImageUploader for InMemoryImageStore {
    async fn upload(&self, image: &ImageAttachment, path: &str) -> RemoteResult<String> {
        {
            let mut failures = self.failures.lock();
            if !failures.is_empty() {
                return Err(failures.remove(0));
            }
        }
        self.images.write().insert(path.to_string(), image.clone());
        Ok(format!("memory://{path}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meddash_model::seed_roster;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> Fields {
        match value {
            serde_json::Value::Object(map) => map,
            _ => Fields::new(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_unique_ids() {
        let store = InMemoryDocumentStore::new();
        let a = store.insert("doctors", fields(json!({"name": "A"}))).await.unwrap();
        let b = store.insert("doctors", fields(json!({"name": "B"}))).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(store.len("doctors"), 2);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = InMemoryDocumentStore::new();
        let id = store
            .insert("doctors", fields(json!({"name": "A", "rating": 1.0})))
            .await
            .unwrap();
        store
            .update("doctors", &id, fields(json!({"rating": 2.0})))
            .await
            .unwrap();

        let doc = store.document("doctors", &id).unwrap();
        assert_eq!(doc.fields["name"], json!("A"));
        assert_eq!(doc.fields["rating"], json!(2.0));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = InMemoryDocumentStore::new();
        let err = store
            .update("doctors", "nope", Fields::new())
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = InMemoryDocumentStore::with_doctors("doctors", &seed_roster()).unwrap();
        store.delete("doctors", "1").await.unwrap();
        store.delete("doctors", "1").await.unwrap();
        store.delete("elsewhere", "1").await.unwrap();
        assert_eq!(store.len("doctors"), 7);
    }

    #[tokio::test]
    async fn test_fault_injection_is_one_shot() {
        let store = InMemoryDocumentStore::with_doctors("doctors", &seed_roster()).unwrap();
        store.fail_next(RemoteOp::FetchAll, RemoteError::Transport("down".to_string()));

        assert!(store.fetch_all("doctors").await.is_err());
        assert_eq!(store.fetch_all("doctors").await.unwrap().len(), 8);
        assert_eq!(store.call_count(RemoteOp::FetchAll), 2);
        assert_eq!(store.call_count(RemoteOp::Insert), 0);
    }

    #[tokio::test]
    async fn test_fault_targets_only_its_operation() {
        let store = InMemoryDocumentStore::with_doctors("doctors", &seed_roster()).unwrap();
        store.fail_next(RemoteOp::Delete, RemoteError::Transport("down".to_string()));

        assert!(store.fetch_all("doctors").await.is_ok());
        assert!(store.delete("doctors", "2").await.is_err());
        assert_eq!(store.len("doctors"), 8);
    }

    #[tokio::test]
    async fn test_image_store_upload() {
        let images = InMemoryImageStore::new();
        let image = ImageAttachment::new("a.png", "image/png", vec![1, 2, 3]);
        let url = images.upload(&image, "doctors/a.png").await.unwrap();

        assert_eq!(url, "memory://doctors/a.png");
        assert_eq!(images.image("doctors/a.png"), Some(image));
        assert_eq!(images.paths(), vec!["doctors/a.png".to_string()]);
    }

    #[tokio::test]
    async fn test_image_store_failure() {
        let images = InMemoryImageStore::new();
        images.fail_next(RemoteError::Transport("quota".to_string()));
        let image = ImageAttachment::new("a.png", "image/png", vec![]);

        assert!(images.upload(&image, "p").await.is_err());
        assert!(images.paths().is_empty());
    }
}
