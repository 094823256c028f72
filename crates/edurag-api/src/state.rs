use edurag_core::config::LayeredConfig;
use edurag_store::ports::BundleStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub bundle_store: Arc<dyn BundleStore>,
    pub config: LayeredConfig,
}

impl AppState {
    pub fn new(bundle_store: Arc<dyn BundleStore>, config: LayeredConfig) -> Self {
        Self {
            bundle_store,
            config,
        }
    }
}
