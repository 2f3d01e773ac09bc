//! Configuration types for the doctor store.

/// Configuration for the doctor store.
///
/// # Example
///
/// ```rust
/// use meddash_store::{FilterCacheConfig, StoreConfig};
///
/// let config = StoreConfig::builder()
///     .with_collection("clinic-a-doctors")
///     .with_image_prefix("avatars")
///     .with_filter_cache(FilterCacheConfig::default())
///     .keep_stale_on_fetch_error(true)
///     .build();
///
/// assert_eq!(config.collection, "clinic-a-doctors");
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Remote collection holding the doctor documents.
    pub collection: String,
    /// Path prefix for uploaded profile images.
    pub image_prefix: String,
    /// Filter result cache (None = caching disabled).
    pub filter_cache: Option<FilterCacheConfig>,
    /// Keep the previous collection when a reload fails instead of clearing it.
    pub keep_stale_on_fetch_error: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            collection: "doctors".to_string(),
            image_prefix: "doctors".to_string(),
            filter_cache: None,
            keep_stale_on_fetch_error: false,
        }
    }
}

impl StoreConfig {
    /// Creates a new builder for StoreConfig.
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }
}

/// Builder for StoreConfig.
#[derive(Debug, Clone, Default)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    /// Sets the remote collection name.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.config.collection = collection.into();
        self
    }

    /// Sets the image upload path prefix.
    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.image_prefix = prefix.into();
        self
    }

    /// Enables the filter result cache.
    pub fn with_filter_cache(mut self, cache: FilterCacheConfig) -> Self {
        self.config.filter_cache = Some(cache);
        self
    }

    /// Chooses whether a failed reload keeps the previous collection.
    pub fn keep_stale_on_fetch_error(mut self, keep: bool) -> Self {
        self.config.keep_stale_on_fetch_error = keep;
        self
    }

    /// Builds the StoreConfig.
    pub fn build(self) -> StoreConfig {
        self.config
    }
}

/// Configuration for the filter result cache.
#[derive(Debug, Clone)]
pub struct FilterCacheConfig {
    /// Maximum number of cached derivations.
    pub max_entries: usize,
}

impl Default for FilterCacheConfig {
    fn default() -> Self {
        Self { max_entries: 64 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_config_default() {
        let config = StoreConfig::default();
        assert_eq!(config.collection, "doctors");
        assert_eq!(config.image_prefix, "doctors");
        assert!(config.filter_cache.is_none());
        assert!(!config.keep_stale_on_fetch_error);
    }

    #[test]
    fn test_store_config_builder() {
        let config = StoreConfig::builder()
            .with_collection("staff")
            .with_image_prefix("avatars")
            .with_filter_cache(FilterCacheConfig { max_entries: 8 })
            .keep_stale_on_fetch_error(true)
            .build();

        assert_eq!(config.collection, "staff");
        assert_eq!(config.image_prefix, "avatars");
        assert_eq!(config.filter_cache.map(|c| c.max_entries), Some(8));
        assert!(config.keep_stale_on_fetch_error);
    }

    #[test]
    fn test_builder_starts_from_defaults() {
        let config = StoreConfig::builder().with_collection("staff").build();
        assert_eq!(config.image_prefix, "doctors");
        assert!(config.filter_cache.is_none());
    }

    #[test]
    fn test_filter_cache_config_default() {
        assert_eq!(FilterCacheConfig::default().max_entries, 64);
    }
}
