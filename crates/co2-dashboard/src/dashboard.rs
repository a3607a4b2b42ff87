use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use co2_client::{ClientError, CollectionClient};

use crate::cache::{Clock, SystemClock, TtlCache};
use crate::catalog::RelationQuery;
use crate::relation::resolve_relation;
use crate::selection::{SelectionMap, build_selection_map};
use crate::state::Resolution;
use crate::viewer;

pub const SELECTION_TTL: Duration = Duration::from_secs(300);

/// The shared database handle plus the selection-map cache.
///
/// Built once at startup and handed to every request handler. Fetch failures
/// never escape: selection maps degrade to empty, resolutions to `Failed`.
pub struct Dashboard<C, K = SystemClock> {
    client: C,
    selections: Mutex<TtlCache<String, SelectionMap, K>>,
}

impl<C: CollectionClient> Dashboard<C> {
    pub fn new(client: C, ttl: Duration) -> Self {
        Self::with_clock(client, ttl, SystemClock)
    }
}

impl<C: CollectionClient, K: Clock> Dashboard<C, K> {
    pub fn with_clock(client: C, ttl: Duration, clock: K) -> Self {
        Self {
            client,
            selections: Mutex::new(TtlCache::new(ttl, clock)),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Startup connectivity check: lists the keyspace's collections.
    pub fn probe(&self) -> Result<Vec<String>, ClientError> {
        self.client.list_collections()
    }

    /// Label -> id choices for `collection`, memoized for the cache TTL.
    /// An empty map means the data could not be loaded. Failed builds are
    /// not cached, so the next call retries.
    pub fn selection_map(&self, collection: &str) -> SelectionMap {
        let key = collection.to_string();
        if let Some(hit) = self.cache().get(&key) {
            tracing::debug!(collection, "selection map cache hit");
            return hit;
        }

        match build_selection_map(&self.client, collection) {
            Ok(map) => {
                self.cache().insert(key, map.clone());
                map
            }
            Err(e) => {
                tracing::warn!(collection, error = %e, "selection map unavailable");
                SelectionMap::empty(collection)
            }
        }
    }

    pub fn invalidate_selections(&self) {
        self.cache().clear();
    }

    /// Rows of `query.target` related to the source document labelled
    /// `label`. A label missing from the current selection map resolves to
    /// `Empty`.
    pub fn resolve(&self, query: &RelationQuery, label: &str) -> Resolution {
        let map = self.selection_map(query.source);
        match map.id_for(label) {
            Some(id) => resolve_relation(&self.client, query, id),
            None => {
                tracing::debug!(query = query.key, label, "stale selection");
                Resolution::Empty
            }
        }
    }

    pub fn view_all(&self, collection: &str) -> Resolution {
        viewer::view_all(&self.client, collection)
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, TtlCache<String, SelectionMap, K>> {
        self.selections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
