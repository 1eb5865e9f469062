use crate::api::TaskApi;
use crate::client::TaskListClient;
use crate::config::Config;
use std::sync::Arc;

/// Application context built once at startup and shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn TaskApi>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(api: Arc<dyn TaskApi>, config: Config) -> Self {
        Self {
            api,
            config: Arc::new(config),
        }
    }

    /// Fresh view-model for one browser request.
    pub fn session(&self) -> TaskListClient {
        TaskListClient::new(Arc::clone(&self.api), self.config.analytics_shape)
    }
}
