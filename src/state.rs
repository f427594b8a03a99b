use std::sync::Arc;

use axum::extract::FromRef;
use tokio::sync::RwLock;

use crate::analytics::PerformanceAnalytics;
use crate::config::Config;
use crate::generator::QuestionGenerator;
use crate::store::FileStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<FileStore>,
    pub analytics: Arc<RwLock<PerformanceAnalytics>>,
    pub generator: Arc<dyn QuestionGenerator>,
    pub config: Config,
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
