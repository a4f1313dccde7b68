use crate::review::ReviewExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Review pipeline. Holds the LLM client behind `Arc<dyn TextGenerator>`.
    pub reviewer: ReviewExtractor,
}
