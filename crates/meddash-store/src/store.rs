//! The doctor store.

use std::sync::Arc;

use chrono::Utc;
use meddash_model::{Doctor, DoctorFilter, DoctorFormData, DoctorPatch, Notice, Notifier, TracingNotifier};
use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::codec;
use crate::config::StoreConfig;
use crate::error::{RemoteError, StoreError, StoreResult, WriteOp};
use crate::filter::{FilterEngine, FilterStats};
use crate::snapshot::{RosterSnapshot, RosterSummary};
use crate::traits::{DocumentStore, ImageAttachment, ImageUploader};

/// Collection, derived view and load counter, guarded together.
#[derive(Debug)]
struct RosterState {
    doctors: Vec<Doctor>,
    visible: Vec<Doctor>,
    engine: FilterEngine,
    loads_in_flight: usize,
    revision: u64,
}

impl RosterState {
    fn new(engine: FilterEngine) -> Self {
        Self {
            doctors: Vec::new(),
            visible: Vec::new(),
            engine,
            loads_in_flight: 0,
            revision: 0,
        }
    }

    /// Marks the collection as changed so cached derivations are dropped.
    fn collection_changed(&mut self) {
        self.revision += 1;
        self.engine.invalidate();
    }

    fn refresh(&mut self) {
        self.visible = self.engine.derive(&self.doctors);
    }

    fn loading(&self) -> bool {
        self.loads_in_flight > 0
    }

    fn load_finished(&mut self) {
        self.loads_in_flight = self.loads_in_flight.saturating_sub(1);
    }

    fn snapshot(&self) -> RosterSnapshot {
        RosterSnapshot {
            doctors: self.doctors.clone(),
            visible: self.visible.clone(),
            criteria: self.engine.criteria().clone(),
            loading: self.loading(),
            revision: self.revision,
        }
    }
}

/// Single source of truth for the doctor roster.
///
/// Every write goes to the remote [`DocumentStore`] first; the in-memory
/// collection changes only after the remote call succeeds. After each change
/// the visible subset is re-derived and a fresh [`RosterSnapshot`] is
/// published to subscribers.
///
/// Mutations for the same id are not serialized: when two are in flight,
/// whichever remote call completes last decides the final local state.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use meddash_model::{seed_roster, DoctorFilter};
/// use meddash_store::{DoctorStore, InMemoryDocumentStore};
///
/// let remote = Arc::new(InMemoryDocumentStore::with_doctors("doctors", &seed_roster())?);
/// let store = DoctorStore::new(remote);
///
/// store.load().await?;
/// store.set_filter(DoctorFilter::new().with_status("on-leave"));
/// assert_eq!(store.visible().len(), 1);
/// ```
pub struct DoctorStore {
    remote: Arc<dyn DocumentStore>,
    uploader: Option<Arc<dyn ImageUploader>>,
    notifier: Arc<dyn Notifier>,
    config: StoreConfig,
    state: RwLock<RosterState>,
    publisher: watch::Sender<Arc<RosterSnapshot>>,
}

impl DoctorStore {
    /// Creates a store with default configuration.
    ///
    /// Notices are logged through `tracing` until a notifier is set.
    pub fn new(remote: Arc<dyn DocumentStore>) -> Self {
        Self::with_config(remote, StoreConfig::default())
    }

    /// Creates a store with custom configuration.
    pub fn with_config(remote: Arc<dyn DocumentStore>, config: StoreConfig) -> Self {
        let engine = match &config.filter_cache {
            Some(cache) => FilterEngine::with_cache(cache),
            None => FilterEngine::new(),
        };
        let (publisher, _) = watch::channel(Arc::new(RosterSnapshot::default()));
        Self {
            remote,
            uploader: None,
            notifier: Arc::new(TracingNotifier),
            config,
            state: RwLock::new(RosterState::new(engine)),
            publisher,
        }
    }

    /// Sets the receiver of success/failure notices.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Sets the uploader used when an image is attached to a save.
    pub fn with_image_uploader(mut self, uploader: Arc<dyn ImageUploader>) -> Self {
        self.uploader = Some(uploader);
        self
    }

    /// Returns the store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // =========================================================================
    // Observers
    // =========================================================================

    /// Subscribes to snapshot updates.
    ///
    /// The receiver starts with the current snapshot marked as seen.
    pub fn subscribe(&self) -> watch::Receiver<Arc<RosterSnapshot>> {
        self.publisher.subscribe()
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> Arc<RosterSnapshot> {
        Arc::clone(&self.publisher.borrow())
    }

    /// Returns a copy of the full collection.
    pub fn doctors(&self) -> Vec<Doctor> {
        self.state.read().doctors.clone()
    }

    /// Returns a copy of the visible subset.
    pub fn visible(&self) -> Vec<Doctor> {
        self.state.read().visible.clone()
    }

    /// Returns the last-applied criteria.
    pub fn criteria(&self) -> DoctorFilter {
        self.state.read().engine.criteria().clone()
    }

    /// Returns true while at least one load is in flight.
    pub fn is_loading(&self) -> bool {
        self.state.read().loading()
    }

    /// Returns the number of doctors in the collection.
    pub fn len(&self) -> usize {
        self.state.read().doctors.len()
    }

    /// Returns true if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up a doctor by id. A miss is `None`, never an error.
    pub fn get(&self, id: &str) -> Option<Doctor> {
        self.state.read().doctors.iter().find(|d| d.id == id).cloned()
    }

    /// Returns the dashboard counters for the full collection.
    pub fn summary(&self) -> RosterSummary {
        RosterSummary::of(&self.state.read().doctors)
    }

    /// Returns the filter engine counters.
    pub fn filter_stats(&self) -> FilterStats {
        self.state.read().engine.stats()
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    /// Replaces the criteria and re-derives the visible subset.
    pub fn set_filter(&self, criteria: DoctorFilter) {
        debug!(?criteria, "applying doctor filter");
        self.mutate(|state| state.engine.set_criteria(criteria));
    }

    // =========================================================================
    // Remote operations
    // =========================================================================

    /// Fetches every doctor and replaces the collection.
    ///
    /// Documents that cannot be decoded are skipped. On failure the
    /// collection is cleared, or kept when
    /// [`StoreConfig::keep_stale_on_fetch_error`] is set. Returns the number
    /// of doctors loaded.
    pub async fn load(&self) -> StoreResult<usize> {
        let collection = self.config.collection.as_str();
        self.mutate(|state| state.loads_in_flight += 1);
        debug!(collection, backend = self.remote.backend_name(), "fetching doctors");

        match self.remote.fetch_all(collection).await {
            Ok(documents) => {
                let doctors: Vec<Doctor> = documents
                    .iter()
                    .filter_map(|document| match codec::decode(document) {
                        Ok(doctor) => Some(doctor),
                        Err(reason) => {
                            warn!(collection, id = %document.id, %reason, "skipping malformed doctor document");
                            None
                        }
                    })
                    .collect();
                let count = doctors.len();
                self.mutate(|state| {
                    state.doctors = doctors;
                    state.load_finished();
                    state.collection_changed();
                });
                info!(collection, count, "doctors loaded");
                self.notifier.notify(Notice::success(format!("Loaded {count} doctors")));
                Ok(count)
            }
            Err(source) => {
                let keep = self.config.keep_stale_on_fetch_error;
                self.mutate(|state| {
                    if !keep && !state.doctors.is_empty() {
                        state.doctors.clear();
                        state.collection_changed();
                    }
                    state.load_finished();
                });
                let err = StoreError::Fetch(source);
                warn!(collection, error = %err, kept_stale = keep, "doctor load failed");
                self.notifier.notify(Notice::error(err.to_string()));
                Err(err)
            }
        }
    }

    /// Creates a doctor and returns it with its assigned id.
    pub async fn create(&self, data: DoctorFormData) -> StoreResult<Doctor> {
        let result = self.insert(data).await;
        self.report(&result, "Doctor added successfully");
        result
    }

    /// Uploads `image`, then creates a doctor pointing at it.
    ///
    /// If the upload fails nothing is inserted.
    pub async fn create_with_image(
        &self,
        mut data: DoctorFormData,
        image: ImageAttachment,
    ) -> StoreResult<Doctor> {
        let result = async move {
            data.validate()?;
            data.image_url = Some(self.upload(&image).await?);
            self.insert(data).await
        }
        .await;
        self.report(&result, "Doctor added successfully");
        result
    }

    /// Writes `patch` remotely, then merges it into the local record.
    ///
    /// Accepts a full [`DoctorFormData`] or a partial [`DoctorPatch`].
    /// Returns the merged record, or `None` if the remote write succeeded but
    /// the record is not in the local collection.
    pub async fn update(
        &self,
        id: &str,
        patch: impl Into<DoctorPatch>,
    ) -> StoreResult<Option<Doctor>> {
        let result = self.write_patch(id, patch.into()).await;
        self.report(&result, "Doctor updated successfully");
        result
    }

    /// Uploads `image`, then updates the doctor to point at it.
    pub async fn update_with_image(
        &self,
        id: &str,
        patch: impl Into<DoctorPatch>,
        image: ImageAttachment,
    ) -> StoreResult<Option<Doctor>> {
        let mut patch: DoctorPatch = patch.into();
        let result = async move {
            patch.validate()?;
            patch.image_url = Some(Some(self.upload(&image).await?));
            self.write_patch(id, patch).await
        }
        .await;
        self.report(&result, "Doctor updated successfully");
        result
    }

    /// Deletes a doctor. Deleting an unknown id succeeds.
    ///
    /// Returns true if a local record was removed.
    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        let result = self.remove(id).await;
        self.report(&result, "Doctor deleted successfully");
        result
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn insert(&self, data: DoctorFormData) -> StoreResult<Doctor> {
        data.validate()?;
        let collection = self.config.collection.as_str();
        let created_at = Utc::now();
        let fields = codec::encode_new(&data, created_at)?;

        let id = self
            .remote
            .insert(collection, fields)
            .await
            .map_err(StoreError::write(WriteOp::Create))?;

        let doctor = Doctor::from_form(id, created_at, data);
        self.mutate(|state| {
            match state.doctors.iter_mut().find(|d| d.id == doctor.id) {
                Some(existing) => {
                    warn!(id = %doctor.id, "remote assigned an id already in the collection");
                    *existing = doctor.clone();
                }
                None => state.doctors.push(doctor.clone()),
            }
            state.collection_changed();
        });
        info!(collection, id = %doctor.id, "doctor created");
        Ok(doctor)
    }

    async fn write_patch(&self, id: &str, patch: DoctorPatch) -> StoreResult<Option<Doctor>> {
        patch.validate()?;
        let collection = self.config.collection.as_str();
        let fields = codec::encode_patch(&patch)?;

        self.remote
            .update(collection, id, fields)
            .await
            .map_err(|source| match source {
                RemoteError::NotFound { .. } => StoreError::NotFound(id.to_string()),
                source => StoreError::Write {
                    op: WriteOp::Update,
                    source,
                },
            })?;

        let merged = self.mutate(|state| {
            let merged = state.doctors.iter_mut().find(|d| d.id == id).map(|doctor| {
                doctor.apply(&patch);
                doctor.clone()
            });
            if merged.is_some() {
                state.collection_changed();
            }
            merged
        });
        match &merged {
            Some(_) => info!(collection, id, "doctor updated"),
            None => warn!(collection, id, "updated doctor is not in the local collection"),
        }
        Ok(merged)
    }

    async fn remove(&self, id: &str) -> StoreResult<bool> {
        let collection = self.config.collection.as_str();
        match self.remote.delete(collection, id).await {
            Ok(()) => {}
            Err(RemoteError::NotFound { .. }) => {
                debug!(collection, id, "doctor already absent remotely");
            }
            Err(source) => {
                return Err(StoreError::Write {
                    op: WriteOp::Delete,
                    source,
                })
            }
        }

        let removed = self.mutate(|state| {
            let before = state.doctors.len();
            state.doctors.retain(|d| d.id != id);
            let removed = state.doctors.len() != before;
            if removed {
                state.collection_changed();
            }
            removed
        });
        info!(collection, id, removed, "doctor deleted");
        Ok(removed)
    }

    async fn upload(&self, image: &ImageAttachment) -> StoreResult<String> {
        let uploader = self.uploader.as_ref().ok_or(StoreError::UploaderMissing)?;
        let path = format!(
            "{}/{}-{}",
            self.config.image_prefix,
            Uuid::new_v4(),
            image.file_name
        );
        let url = uploader
            .upload(image, &path)
            .await
            .map_err(StoreError::write(WriteOp::Upload))?;
        debug!(%path, %url, bytes = image.bytes.len(), "image uploaded");
        Ok(url)
    }

    /// Applies `f` to the state, re-derives the visible subset and publishes.
    ///
    /// Publishing happens under the write lock so snapshots go out in
    /// mutation order. The lock is never held across an `.await`.
    fn mutate<R>(&self, f: impl FnOnce(&mut RosterState) -> R) -> R {
        let mut state = self.state.write();
        let result = f(&mut state);
        state.refresh();
        self.publisher.send_replace(Arc::new(state.snapshot()));
        result
    }

    fn report<T>(&self, result: &StoreResult<T>, success: &str) {
        match result {
            Ok(_) => self.notifier.notify(Notice::success(success)),
            Err(err) => {
                warn!(error = %err, "doctor store operation failed");
                self.notifier.notify(Notice::error(err.to_string()));
            }
        }
    }
}

impl std::fmt::Debug for DoctorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DoctorStore")
            .field("backend", &self.remote.backend_name())
            .field("config", &self.config)
            .field("doctors", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{InMemoryDocumentStore, RemoteOp};
    use meddash_model::{seed_roster, RecordingNotifier};

    fn seeded() -> (Arc<InMemoryDocumentStore>, DoctorStore) {
        let remote = Arc::new(InMemoryDocumentStore::with_doctors("doctors", &seed_roster()).unwrap());
        let store = DoctorStore::new(remote.clone());
        (remote, store)
    }

    #[tokio::test]
    async fn test_load_replaces_collection() {
        let (_, store) = seeded();
        assert!(store.is_empty());

        assert_eq!(store.load().await.unwrap(), 8);
        assert_eq!(store.doctors(), seed_roster());
        assert_eq!(store.visible(), seed_roster());
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_load_skips_malformed_documents() {
        let (remote, store) = seeded();
        let mut fields = codec::encode_doctor(&seed_roster()[0]).unwrap();
        fields.insert("rating".to_string(), serde_json::json!(11.0));
        remote.put("doctors", crate::traits::Document::new("bad", fields));

        assert_eq!(store.load().await.unwrap(), 8);
        assert!(store.get("bad").is_none());
    }

    #[tokio::test]
    async fn test_set_filter_recomputes_visible() {
        let (_, store) = seeded();
        store.load().await.unwrap();

        store.set_filter(DoctorFilter::new().with_status("retired"));
        let visible = store.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Dr. Amanda Martinez");
        assert_eq!(store.criteria(), DoctorFilter::new().with_status("retired"));
    }

    #[tokio::test]
    async fn test_mutation_keeps_filter_applied() {
        let (_, store) = seeded();
        store.load().await.unwrap();
        store.set_filter(DoctorFilter::new().with_status("on-leave"));

        store
            .update("1", DoctorPatch::new().with_status(meddash_model::DoctorStatus::OnLeave))
            .await
            .unwrap();

        let names: Vec<String> = store.visible().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Dr. John Smith", "Dr. Emily Parker"]);
    }

    #[tokio::test]
    async fn test_validation_error_skips_remote() {
        let (remote, store) = seeded();
        let err = store
            .create(DoctorFormData {
                rating: 6.0,
                ..seed_roster()[0].form_data()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(remote.call_count(RemoteOp::Insert), 0);
    }

    #[tokio::test]
    async fn test_operations_report_notices() {
        let (remote, store) = seeded();
        let notices = Arc::new(RecordingNotifier::new());
        let store = store.with_notifier(notices.clone());
        store.load().await.unwrap();
        notices.take();

        store.delete("2").await.unwrap();
        remote.fail_next(RemoteOp::Delete, RemoteError::Transport("down".to_string()));
        store.delete("3").await.unwrap_err();

        let received = notices.notices();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0], Notice::success("Doctor deleted successfully"));
        assert!(!received[1].is_success());
        assert!(received[1].message.contains("failed to delete doctor"));
    }

    #[tokio::test]
    async fn test_missing_uploader() {
        let (remote, store) = seeded();
        let image = ImageAttachment::new("x.png", "image/png", vec![0]);
        let err = store
            .create_with_image(seed_roster()[0].form_data(), image)
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::UploaderMissing));
        assert_eq!(remote.call_count(RemoteOp::Insert), 0);
    }

    #[tokio::test]
    async fn test_filter_cache_is_used() {
        let remote = Arc::new(InMemoryDocumentStore::with_doctors("doctors", &seed_roster()).unwrap());
        let config = StoreConfig::builder()
            .with_filter_cache(crate::config::FilterCacheConfig::default())
            .build();
        let store = DoctorStore::with_config(remote, config);
        store.load().await.unwrap();

        store.set_filter(DoctorFilter::new().with_status("active"));
        store.set_filter(DoctorFilter::new().with_status("active"));

        let stats = store.filter_stats();
        assert_eq!(stats.cache.misses, 1);
        assert_eq!(stats.cache.hits, 1);
        assert_eq!(store.visible().len(), 6);
    }

    #[test]
    fn test_debug_output() {
        let (_, store) = seeded();
        let text = format!("{store:?}");
        assert!(text.contains("memory"));
        assert!(text.contains("doctors: 0"));
    }
}
