/*!
 * Application Registry
 * Manifests and constructible application types, keyed by application id
 */

use super::manifest::AppManifest;
use super::traits::AppFactory;
use crate::core::errors::{RegistryError, RegistryResult};
use crate::core::types::AppId;
use ahash::RandomState;
use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct AppRegistry {
    manifests: DashMap<AppId, Arc<AppManifest>, RandomState>,
    types: DashMap<AppId, AppFactory, RandomState>,
}

impl AppRegistry {
    pub fn new() -> Self {
        Self {
            manifests: DashMap::with_hasher(RandomState::new()),
            types: DashMap::with_hasher(RandomState::new()),
        }
    }

    /// Register a manifest together with its constructor
    ///
    /// Re-registering overwrites the manifest but keeps an already cached
    /// constructor.
    pub fn register(&self, manifest: AppManifest, factory: AppFactory) -> Arc<AppManifest> {
        let id = manifest.id.clone();
        let manifest = self.store_manifest(manifest);

        if self.types.contains_key(&id) {
            debug!(app_id = %id, "Application type already loaded, keeping cached type");
        } else {
            self.types.insert(id.clone(), factory);
            info!(app_id = %id, name = %manifest.name, "Application registered");
        }

        manifest
    }

    /// Register a manifest whose constructor is produced asynchronously
    ///
    /// The loader only runs when no constructor is cached yet. If it fails
    /// the manifest stays registered but the type cache is left untouched,
    /// so later resolution reports `TypeNotLoaded`.
    pub async fn register_with_loader<F, Fut>(
        &self,
        manifest: AppManifest,
        loader: F,
    ) -> RegistryResult<Arc<AppManifest>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<AppFactory>>,
    {
        let id = manifest.id.clone();
        let manifest = self.store_manifest(manifest);

        if self.types.contains_key(&id) {
            debug!(app_id = %id, "Application type already loaded, skipping loader");
            return Ok(manifest);
        }

        match loader().await {
            Ok(factory) => {
                self.types.entry(id.clone()).or_insert(factory);
                info!(app_id = %id, name = %manifest.name, "Application loaded and registered");
                Ok(manifest)
            }
            Err(e) => {
                warn!(app_id = %id, error = %e, "Application loader failed");
                Err(RegistryError::ClassNotFound {
                    id,
                    reason: format!("{e:#}"),
                })
            }
        }
    }

    fn store_manifest(&self, manifest: AppManifest) -> Arc<AppManifest> {
        let manifest = Arc::new(manifest);
        self.manifests
            .insert(manifest.id.clone(), Arc::clone(&manifest));
        manifest
    }

    /// Cached constructor for `id`
    pub fn resolve_type(&self, id: &str) -> RegistryResult<AppFactory> {
        if !self.manifests.contains_key(id) {
            return Err(RegistryError::AppNotRegistered(id.to_string()));
        }
        self.types
            .get(id)
            .map(|r| Arc::clone(r.value()))
            .ok_or_else(|| RegistryError::TypeNotLoaded(id.to_string()))
    }

    pub fn manifest(&self, id: &str) -> Option<Arc<AppManifest>> {
        self.manifests.get(id).map(|r| Arc::clone(r.value()))
    }

    /// All manifests, ordered by id
    pub fn manifests(&self) -> Vec<Arc<AppManifest>> {
        let mut manifests: Vec<_> = self
            .manifests
            .iter()
            .map(|r| Arc::clone(r.value()))
            .collect();
        manifests.sort_by(|a, b| a.id.cmp(&b.id));
        manifests
    }

    pub fn contains(&self, id: &str) -> bool {
        self.manifests.contains_key(id)
    }

    pub fn is_loaded(&self, id: &str) -> bool {
        self.types.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }
}

impl Default for AppRegistry {
    fn default() -> Self {
        Self::new()
    }
}
