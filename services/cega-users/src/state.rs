//! Shared request-handler state.

use std::sync::Arc;

use cega_core::{DirectoryIndex, InstanceRegistry};

/// Read-only state shared by every request.
///
/// Both members are built once during startup and never mutated, so
/// clones are cheap and concurrent reads need no locking.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<DirectoryIndex>,
    pub instances: Arc<InstanceRegistry>,
}

impl AppState {
    #[must_use]
    pub fn new(directory: DirectoryIndex, instances: InstanceRegistry) -> Self {
        Self {
            directory: Arc::new(directory),
            instances: Arc::new(instances),
        }
    }
}
