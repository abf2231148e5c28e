use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::RatingStore;

/// Shared application state
///
/// The store sits behind a single-writer lock: rating updates take the write
/// half, recommendation requests hold the read half for the whole computation.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<RatingStore>>,
    pub config: Arc<Config>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(RatingStore::new(), Config::default())
    }
}

impl AppState {
    pub fn new(store: RatingStore, config: Config) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            config: Arc::new(config),
        }
    }
}
