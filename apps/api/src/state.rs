use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::llm_client::ModelClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable model client. Default: GeminiClient; tests use a canned fake.
    pub llm: Arc<dyn ModelClient>,
    pub config: Config,
}

impl AppState {
    pub fn model_timeout(&self) -> Duration {
        Duration::from_secs(self.config.model_timeout_secs)
    }
}
