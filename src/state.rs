use std::sync::Arc;

use tokio::sync::watch;

use crate::db::Catalog;
use crate::db::pool::Readiness;
use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    catalog: Arc<dyn Catalog>,
    readiness: watch::Receiver<Readiness>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn Catalog>, readiness: watch::Receiver<Readiness>) -> Self {
        Self { catalog, readiness }
    }

    /// State that is ready from the start, for catalogs that need no startup.
    pub fn ready(catalog: Arc<dyn Catalog>) -> Self {
        let (_, readiness) = watch::channel(Readiness::Ready);
        Self::new(catalog, readiness)
    }

    pub fn readiness(&self) -> Readiness {
        self.readiness.borrow().clone()
    }

    /// The catalog, once the database has answered at least once.
    pub fn catalog(&self) -> Result<&dyn Catalog, AppError> {
        if self.readiness.borrow().is_ready() {
            Ok(self.catalog.as_ref())
        } else {
            Err(AppError::NotReady)
        }
    }
}
