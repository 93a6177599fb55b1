use std::sync::{Arc, OnceLock};

use super::InferenceEngine;

/// Write-once readiness slot for the loaded model.
///
/// Empty until the artifact has been loaded and verified; shared by every
/// request handler. Reads never lock.
#[derive(Clone, Default)]
pub struct ModelSlot {
    engine: Arc<OnceLock<InferenceEngine>>,
}

impl ModelSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot that is ready from the start.
    pub fn ready(engine: InferenceEngine) -> Self {
        Self {
            engine: Arc::new(OnceLock::from(engine)),
        }
    }

    /// Installs the engine. Fails, handing the engine back, if one is already installed.
    pub fn install(&self, engine: InferenceEngine) -> Result<(), InferenceEngine> {
        self.engine.set(engine)
    }

    pub fn get(&self) -> Option<&InferenceEngine> {
        self.engine.get()
    }

    pub fn is_ready(&self) -> bool {
        self.engine.get().is_some()
    }
}
