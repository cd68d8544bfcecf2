//! Shared application state for all routes.

use crate::store::CollegeStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CollegeStore>,
    /// 500 responses carry the underlying message instead of the redacted one.
    pub expose_internal_errors: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn CollegeStore>) -> Self {
        AppState {
            store,
            expose_internal_errors: false,
        }
    }

    /// Set from `APP_ENV=development` at startup.
    pub fn with_internal_errors(mut self, expose: bool) -> Self {
        self.expose_internal_errors = expose;
        self
    }

    pub fn store(&self) -> &dyn CollegeStore {
        self.store.as_ref()
    }
}
