//! AppState construction extracted from `main.rs`.

use std::sync::Arc;

use anyhow::Context;

use cr_agent::HttpAgentClient;
use cr_domain::config::{Config, ConfigSeverity};
use cr_store::create_store;

use crate::state::AppState;

/// Validate config, build the agent client and chat store, and return a
/// fully-wired [`AppState`].
pub fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    // ── Config validation ────────────────────────────────────────────
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    let errors = issues
        .iter()
        .filter(|i| i.severity == ConfigSeverity::Error)
        .count();
    if errors > 0 {
        anyhow::bail!("config validation failed with {errors} error(s)");
    }

    // ── Agent client ─────────────────────────────────────────────────
    let agent = HttpAgentClient::new(&config.agent).context("initializing agent client")?;
    tracing::info!(
        base_url = %config.agent.base_url,
        agent_id = %config.agent.agent_id,
        agent_alias_id = %config.agent.agent_alias_id,
        "agent client ready"
    );

    // ── Chat store ───────────────────────────────────────────────────
    let store = create_store(&config.store).context("initializing chat store")?;
    tracing::info!(backend = store.backend(), table = %config.store.table, "chat store ready");

    Ok(AppState::new(config, Arc::new(agent), store))
}
