use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::domain::variant::{entities::Variant, ports::VariantRepository};

/// Process-wide memo of the available variant catalog.
///
/// Loaded on first use and kept for the process lifetime. A failed load serves an
/// empty catalog to the caller and is retried on the next call.
#[derive(Debug, Default)]
pub struct VariantCatalog {
    variants: RwLock<Option<Arc<Vec<Variant>>>>,
}

impl VariantCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all<R: VariantRepository>(&self, repository: &R) -> Arc<Vec<Variant>> {
        if let Some(variants) = self.variants.read().await.as_ref() {
            return Arc::clone(variants);
        }

        match repository.list_available().await {
            Ok(variants) => {
                info!(count = variants.len(), "variant catalog loaded");
                let variants = Arc::new(variants);
                *self.variants.write().await = Some(Arc::clone(&variants));
                variants
            }
            Err(e) => {
                warn!(error = %e, "variant catalog fetch failed, offering no substitutions");
                Arc::new(Vec::new())
            }
        }
    }

    pub async fn is_loaded(&self) -> bool {
        self.variants.read().await.is_some()
    }
}
