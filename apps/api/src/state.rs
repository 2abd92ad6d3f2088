use std::sync::Arc;

use crate::fetch::JobFetcher;
use crate::llm_client::ChatProvider;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request data; both members are safe to share across requests.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable LLM backend. Default: `LlmClient` (OpenAI-compatible HTTP).
    pub llm: Arc<dyn ChatProvider>,
    pub fetcher: JobFetcher,
}
