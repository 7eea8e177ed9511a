//! State shared by the REST handlers

use std::sync::Arc;

use crate::application::BillingService;

#[derive(Clone)]
pub struct AppState {
    pub billing: Arc<BillingService>,
}

impl AppState {
    pub fn new(billing: Arc<BillingService>) -> Self {
        Self { billing }
    }
}
