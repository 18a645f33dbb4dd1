//! 应用状态定义

use std::sync::Arc;

use crate::service::CreditService;

/// Axum 应用共享状态
#[derive(Clone)]
pub struct AppState {
    pub credit_service: Arc<CreditService>,
}

impl AppState {
    pub fn new(credit_service: Arc<CreditService>) -> Self {
        Self { credit_service }
    }
}
