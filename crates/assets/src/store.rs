use std::collections::BTreeMap;
use std::sync::Arc;

use stackworld_raster::Image;

use crate::{AssetError, ViewCache};

/// Named registry of view caches.
///
/// Populated by an explicit load step before the frame loop starts; sprites
/// resolve their asset name against it when they are created.
#[derive(Debug, Clone, Default)]
pub struct ViewCacheStore {
    caches: BTreeMap<String, Arc<ViewCache>>,
}

impl ViewCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cache from a layer sheet and register it under `name`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        sheet: &Image,
        layer_count: u32,
    ) -> Result<Arc<ViewCache>, AssetError> {
        let name = name.into();
        let cache = Arc::new(ViewCache::build(sheet, layer_count)?);
        self.insert(name, Arc::clone(&cache));
        Ok(cache)
    }

    /// Register an already built cache. Replaces any cache with the same name.
    pub fn insert(&mut self, name: impl Into<String>, cache: Arc<ViewCache>) {
        let name = name.into();
        tracing::debug!(%name, layers = cache.layer_count(), "registering view cache");
        if self.caches.insert(name.clone(), cache).is_some() {
            tracing::warn!(%name, "replaced existing view cache");
        }
    }

    /// Look up the cache registered under `name`.
    pub fn get(&self, name: &str) -> Result<Arc<ViewCache>, AssetError> {
        self.caches
            .get(name)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.caches.contains_key(name)
    }

    /// Registered names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.caches.keys().map(String::as_str)
    }

    /// Number of registered caches.
    pub fn len(&self) -> usize {
        self.caches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use stackworld_common::Rgba;

    use super::*;

    fn sheet() -> Image {
        Image::filled(2, 4, Rgba::WHITE)
    }

    #[test]
    fn register_and_get() {
        let mut store = ViewCacheStore::new();
        store.register("crate", &sheet(), 2).unwrap();
        assert!(store.contains("crate"));
        assert_eq!(store.get("crate").unwrap().layer_count(), 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unknown_name_is_not_found() {
        let store = ViewCacheStore::new();
        match store.get("ghost") {
            Err(AssetError::NotFound(name)) => assert_eq!(name, "ghost"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn lookups_share_one_cache() {
        let mut store = ViewCacheStore::new();
        let built = store.register("car", &sheet(), 1).unwrap();
        let a = store.get("car").unwrap();
        let b = store.get("car").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&a, &built));
    }

    #[test]
    fn failed_build_leaves_store_untouched() {
        let mut store = ViewCacheStore::new();
        store.register("car", &sheet(), 1).unwrap();
        assert!(store.register("car", &sheet(), 0).is_err());
        assert_eq!(store.get("car").unwrap().layer_count(), 1);
    }

    #[test]
    fn names_are_sorted() {
        let mut store = ViewCacheStore::new();
        store.register("zebra", &sheet(), 1).unwrap();
        store.register("apple", &sheet(), 1).unwrap();
        let names: Vec<&str> = store.names().collect();
        assert_eq!(names, ["apple", "zebra"]);
    }
}
