//! 应用状态定义

use std::sync::Arc;

use crate::lifecycle::Lifecycle;
use crate::publisher::ResultPublisher;
use crate::store::ResultStore;

/// Axum 应用共享状态
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ResultStore>,
    pub publisher: Arc<dyn ResultPublisher>,
    pub lifecycle: Arc<Lifecycle>,
}

impl AppState {
    pub fn new(
        store: Arc<ResultStore>,
        publisher: Arc<dyn ResultPublisher>,
        lifecycle: Arc<Lifecycle>,
    ) -> Self {
        Self {
            store,
            publisher,
            lifecycle,
        }
    }
}
