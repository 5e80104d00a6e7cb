//! Application state management

use std::sync::Arc;

use store::Collection;
use tokio::sync::OnceCell;

use crate::auth::IdentityProvider;

/// Whether the record collection can be used yet.
#[derive(Clone)]
pub enum Readiness {
    Pending,
    Ready(Arc<dyn Collection>),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    identity: Arc<dyn IdentityProvider>,
    collection: OnceCell<Arc<dyn Collection>>,
}

impl AppState {
    /// State with no collection yet; every gated route answers 503 until
    /// [`mark_ready`](Self::mark_ready) is called.
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                identity,
                collection: OnceCell::new(),
            }),
        }
    }

    /// Get the identity provider
    pub fn identity(&self) -> &dyn IdentityProvider {
        self.inner.identity.as_ref()
    }

    /// Install the connected collection. Only the first call has any effect.
    pub fn mark_ready(&self, collection: Arc<dyn Collection>) -> bool {
        self.inner.collection.set(collection).is_ok()
    }

    pub fn readiness(&self) -> Readiness {
        match self.inner.collection.get() {
            Some(collection) => Readiness::Ready(Arc::clone(collection)),
            None => Readiness::Pending,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.inner.collection.initialized()
    }
}
