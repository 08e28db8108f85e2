use std::sync::Arc;

use crate::config::Config;
use crate::screening::ResumeAnalyzer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Loaded once at startup and never mutated.
    pub analyzer: Arc<ResumeAnalyzer>,
    pub config: Config,
}
