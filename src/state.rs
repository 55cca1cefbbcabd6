/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 *   - config: read-only settings loaded once at startup
 *   - provider: Discord client (owns the pooled reqwest::Client)
 * - Cloned per request, so everything inside is Arc/Clone cheap
 */
use std::sync::Arc;

use crate::config::Config;
use crate::services::provider::{ProviderClient, ProviderError};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub provider: ProviderClient,
}

impl AppState {
    pub fn new(config: Arc<Config>) -> Result<Self, ProviderError> {
        let provider = ProviderClient::new(config.clone())?;
        Ok(Self { config, provider })
    }
}
