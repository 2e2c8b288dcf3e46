use std::sync::Arc;

use batepapo_core::{Clock, MessageLog, Registry, SharedStore};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub registry: Registry,
    pub messages: MessageLog,
}

impl AppStateInner {
    pub fn new(store: SharedStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            registry: Registry::new(store.clone(), clock.clone()),
            messages: MessageLog::new(store, clock),
        }
    }
}
