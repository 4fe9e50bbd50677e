//! Application state shared by all handlers

use std::sync::Arc;

use crate::domain::{PatternRouter, Store};

/// Application state.
///
/// The router owns the request path; `store` is the same store the router's
/// cache writes to, exposed for readiness checks and key introspection.
#[derive(Debug, Clone)]
pub struct AppState {
    pub router: Arc<PatternRouter>,
    pub store: Arc<dyn Store>,
    pub debug_enabled: bool,
}

impl AppState {
    pub fn new(router: Arc<PatternRouter>, store: Arc<dyn Store>) -> Self {
        Self {
            router,
            store,
            debug_enabled: false,
        }
    }

    /// Enables the read-only `/debug/keys` endpoints
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug_enabled = enabled;
        self
    }
}
