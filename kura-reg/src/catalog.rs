//! Lazily loaded, memoised location catalog
//!
//! The first request that needs the catalog reads it from disk. A successful
//! load is kept for the life of the process; a failed load is not, so the next
//! request tries again once an operator has fixed the file.

use kura_common::location::{load_catalog, LocationCatalog};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;

#[derive(Debug, Clone)]
pub struct CatalogCache {
    path: PathBuf,
    cell: Arc<OnceCell<Arc<LocationCatalog>>>,
}

impl CatalogCache {
    /// Cache that loads from `path` on first use
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: Arc::new(OnceCell::new()),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// The catalog, loading it if this is the first successful call
    pub async fn get(&self) -> kura_common::Result<Arc<LocationCatalog>> {
        let catalog = self
            .cell
            .get_or_try_init(|| async { load_catalog(&self.path).await.map(Arc::new) })
            .await?;
        Ok(Arc::clone(catalog))
    }
}
