//! Process-lifetime owner of the loaded model pipeline.
//!
//! Lifecycle:
//!
//! ```text
//! Unloaded --load--> Loaded | LoadFailed --clear--> Cleared
//! ```
//!
//! Loading happens once, before the server accepts connections. After that
//! the holder sits behind an `Arc` in the router state and is only read, so
//! request handlers never lock. A failed load is logged and remembered; it
//! never aborts startup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info};

use crate::models::Pipeline;

#[derive(Debug, Clone)]
pub enum ModelState {
    Unloaded,
    Loaded(Arc<Pipeline>),
    LoadFailed(String),
    Cleared,
}

impl ModelState {
    pub fn name(&self) -> &'static str {
        match self {
            ModelState::Unloaded => "unloaded",
            ModelState::Loaded(_) => "loaded",
            ModelState::LoadFailed(_) => "load_failed",
            ModelState::Cleared => "cleared",
        }
    }
}

#[derive(Debug)]
pub struct ModelHolder {
    state: ModelState,
    source: Option<PathBuf>,
}

impl Default for ModelHolder {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelHolder {
    pub fn new() -> Self {
        Self {
            state: ModelState::Unloaded,
            source: None,
        }
    }

    /// Holder that is already `Loaded` with the given pipeline.
    pub fn with_pipeline(pipeline: Pipeline) -> Self {
        Self {
            state: ModelState::Loaded(Arc::new(pipeline)),
            source: None,
        }
    }

    /// Attempt the one-time load from `path`.
    ///
    /// Only an `Unloaded` holder loads; any other state is left untouched and
    /// `false` is returned.
    pub fn load(&mut self, path: &Path) -> bool {
        if !matches!(self.state, ModelState::Unloaded) {
            return false;
        }
        info!(path = %path.display(), "loading model pipeline");
        self.source = Some(path.to_path_buf());
        self.state = match crate::io::load_pipeline(path) {
            Ok(pipeline) => {
                info!(
                    name = %pipeline.metadata().name,
                    features = pipeline.n_features(),
                    estimator = %pipeline.estimator_description(),
                    "model pipeline loaded"
                );
                ModelState::Loaded(Arc::new(pipeline))
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "model pipeline unavailable; /predict will answer 503");
                ModelState::LoadFailed(e.to_string())
            }
        };
        true
    }

    /// Drop the pipeline at shutdown.
    pub fn clear(&mut self) {
        if matches!(self.state, ModelState::Loaded(_) | ModelState::LoadFailed(_)) {
            self.state = ModelState::Cleared;
            match &self.source {
                Some(path) => info!(path = %path.display(), "model resources released"),
                None => info!("model resources released"),
            }
        }
    }

    pub fn state(&self) -> &ModelState {
        &self.state
    }

    /// The pipeline, only when `Loaded`.
    pub fn pipeline(&self) -> Option<&Arc<Pipeline>> {
        match &self.state {
            ModelState::Loaded(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.pipeline().is_some()
    }
}
