use std::sync::Arc;

use crate::middleware::bearer_auth::BearerAuth;

#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<BearerAuth>,
}

impl AppState {
    pub fn new(gate: Arc<BearerAuth>) -> Self {
        Self { gate }
    }
}
