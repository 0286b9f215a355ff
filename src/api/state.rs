use std::sync::Arc;

use crate::{ingest::Dataset, services::EngineDefaults};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Loaded once at startup and never mutated
    pub dataset: Arc<Dataset>,
    pub defaults: EngineDefaults,
}

impl AppState {
    pub fn new(dataset: Dataset, defaults: EngineDefaults) -> Self {
        Self {
            dataset: Arc::new(dataset),
            defaults,
        }
    }
}
