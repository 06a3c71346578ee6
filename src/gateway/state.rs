//! Gateway 应用状态

use std::sync::Arc;

use crate::service::OperationService;

/// Gateway 应用状态
///
/// 只持有一个 Operation Service 的共享引用，跨请求无可变状态
#[derive(Clone)]
pub struct AppState {
    service: Arc<OperationService>,
}

impl AppState {
    pub fn new(service: Arc<OperationService>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &OperationService {
        &self.service
    }
}
