//! Configuration loading with a per-loader cache
//!
//! The `ConfigurationLoader` turns a path into a shared [`Configuration`],
//! parsing each canonical path at most once until the cache is cleared.

use super::model::Configuration;
use super::options::LoaderOptions;
use crate::document::DocumentLoader;
use crate::{Error, Result};
use runcfg_fs::{NormalizedPath, io};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Loads configurations and caches them by canonical path.
///
/// # Example
///
/// ```ignore
/// use runcfg_core::{ConfigurationLoader, LoaderOptions};
///
/// let loader = ConfigurationLoader::new(LoaderOptions::default());
/// let first = loader.load("phpunit.xml")?;
/// let second = loader.load("./phpunit.xml")?;
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
/// ```
#[derive(Debug, Default)]
pub struct ConfigurationLoader {
    options: LoaderOptions,
    cache: Mutex<HashMap<NormalizedPath, Arc<Configuration>>>,
}

impl ConfigurationLoader {
    pub fn new(options: LoaderOptions) -> Self {
        Self {
            options,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Load the configuration at `path`, reusing a cached model when the same
    /// canonical path was loaded before.
    ///
    /// The cache lock is held while a missing entry is parsed, so concurrent
    /// callers asking for the same path get the same `Arc`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigurationNotFound`], [`Error::MalformedDocument`]
    /// or [`Error::ConfigurationCycle`] when the document cannot be loaded.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Arc<Configuration>> {
        let requested = NormalizedPath::new(path.as_ref());
        let canonical = io::canonicalize(&requested)
            .ok()
            .filter(NormalizedPath::is_file)
            .ok_or_else(|| Error::ConfigurationNotFound {
                path: requested.to_native(),
            })?;

        let mut cache = self.lock();
        if let Some(configuration) = cache.get(&canonical) {
            tracing::debug!(path = %canonical, "Configuration cache hit");
            return Ok(Arc::clone(configuration));
        }

        let document = DocumentLoader::new().load(&canonical)?;
        let configuration = Arc::new(Configuration::from_document(&document, &self.options));
        cache.insert(canonical.clone(), Arc::clone(&configuration));
        tracing::debug!(path = %canonical, "Loaded configuration");

        Ok(configuration)
    }

    /// Drop every cached configuration. Models already handed out stay valid.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of cached configurations.
    pub fn cached(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<NormalizedPath, Arc<Configuration>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
