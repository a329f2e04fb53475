use std::sync::Arc;

use cr_agent::AgentClient;
use cr_domain::config::Config;
use cr_store::ChatStore;

/// Shared application state passed to all API handlers.
///
/// Holds only handles built once at startup; nothing in here changes
/// per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub agent: Arc<dyn AgentClient>,
    pub store: Arc<dyn ChatStore>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        agent: Arc<dyn AgentClient>,
        store: Arc<dyn ChatStore>,
    ) -> Self {
        Self {
            config,
            agent,
            store,
        }
    }
}
