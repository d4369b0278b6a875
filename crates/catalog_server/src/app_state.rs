use std::sync::Arc;

use shared::domain::CatalogItem;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) catalog: Arc<Vec<CatalogItem>>,
}

impl AppState {
    pub(crate) fn new(catalog: Vec<CatalogItem>) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }
}
