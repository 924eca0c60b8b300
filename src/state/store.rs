// src/state/store.rs - Shared handle over one open form

use std::sync::Arc;

use parking_lot::RwLock;

use crate::state::ProductFormState;

/// Cheaply clonable handle to a form state shared between UI panels. Reads
/// take a shared lock; all mutation goes through [`FormStore::update`].
#[derive(Debug, Clone)]
pub struct FormStore {
    inner: Arc<RwLock<ProductFormState>>,
}

impl FormStore {
    pub fn new(state: ProductFormState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    /// Runs a closure against the current state under a shared lock.
    pub fn read<T>(&self, f: impl FnOnce(&ProductFormState) -> T) -> T {
        f(&self.inner.read())
    }

    /// Runs a mutation under the exclusive lock and returns its result.
    pub fn update<T>(&self, f: impl FnOnce(&mut ProductFormState) -> T) -> T {
        f(&mut self.inner.write())
    }

    /// Snapshot of the current state.
    pub fn snapshot(&self) -> ProductFormState {
        self.inner.read().clone()
    }
}
