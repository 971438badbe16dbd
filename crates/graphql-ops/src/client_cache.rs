use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use graphql_ops_client::Client;
use parking_lot::RwLock;

/// Clients seen by a registry, keyed by their URL.
///
/// Every dispatch that finds a bound client records it here. Nothing in the
/// registry reads it back; it exists for inspection. Clones share the same
/// entries, so one cache can be handed to several registries.
#[derive(Clone, Default)]
pub struct ClientCache {
    clients: Arc<RwLock<HashMap<String, Arc<dyn Client>>>>,
}

impl ClientCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&self, client: &Arc<dyn Client>) {
        self.clients
            .write()
            .insert(client.url().to_string(), Arc::clone(client));
    }

    /// The last client recorded for this URL
    pub fn get(&self, url: &str) -> Option<Arc<dyn Client>> {
        self.clients.read().get(url).cloned()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.clients.read().contains_key(url)
    }

    pub fn urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.clients.read().keys().cloned().collect();
        urls.sort();
        urls
    }

    pub fn len(&self) -> usize {
        self.clients.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.read().is_empty()
    }

    pub fn clear(&self) {
        self.clients.write().clear();
    }
}

impl Debug for ClientCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCache")
            .field("urls", &self.urls())
            .finish()
    }
}
