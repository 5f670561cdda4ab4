// Application context
//
// Explicit dependency-injection root constructed once at process startup and
// passed to request handlers. Holds the single shared client for each
// external store; no module-level singletons.

use std::sync::Arc;

use crate::cache::{CacheFacade, RedisStore, VolatileStore};
use crate::catalog::DocumentStore;
use crate::config::Config;
use crate::search::{IndexSync, SearchIndex, SearchRouter};

/// Wired subsystem handles for one process
pub struct AppContext {
    pub config: Config,
    pub cache: Arc<CacheFacade>,
    pub search: Arc<SearchRouter>,
    pub sync: Arc<IndexSync>,
    pub store: Arc<dyn DocumentStore>,
    pub index: Option<Arc<dyn SearchIndex>>,
}

impl AppContext {
    /// Wire the cache facade, search router, and index-sync helper.
    ///
    /// The Redis connection is attempted here, once, with the configured
    /// bounded retries. Failure disables caching for the process lifetime and
    /// is logged exactly once; it never fails the bootstrap.
    pub async fn bootstrap(
        config: Config,
        store: Arc<dyn DocumentStore>,
        index: Option<Arc<dyn SearchIndex>>,
    ) -> Arc<Self> {
        let volatile: Option<Arc<dyn VolatileStore>> = if config.cache.enabled {
            match RedisStore::connect(&config.cache).await {
                Ok(redis) => {
                    tracing::info!("Connected to Redis, response caching enabled");
                    Some(Arc::new(redis))
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Cache store unreachable, running without response caching"
                    );
                    None
                }
            }
        } else {
            tracing::info!("Response caching disabled by configuration");
            None
        };

        Arc::new(Self::assemble(config, volatile, store, index))
    }

    /// Wire the context around an already-constructed volatile store.
    ///
    /// Used by tests and single-node deployments that substitute in-memory
    /// backends for the external stores.
    pub fn assemble(
        config: Config,
        volatile: Option<Arc<dyn VolatileStore>>,
        store: Arc<dyn DocumentStore>,
        index: Option<Arc<dyn SearchIndex>>,
    ) -> Self {
        let cache = Arc::new(CacheFacade::new(volatile, config.cache.default_ttl()));
        let search = Arc::new(SearchRouter::with_max_page_size(
            store.clone(),
            index.clone(),
            config.search.max_page_size,
        ));
        let sync = Arc::new(IndexSync::with_batch_size(
            store.clone(),
            index.clone(),
            config.search.reindex_batch_size,
        ));

        Self {
            config,
            cache,
            search,
            sync,
            store,
            index,
        }
    }
}
