use crate::domain::{common::entities::app_errors::CoreError, variant::entities::Variant};

#[cfg_attr(test, mockall::automock)]
pub trait VariantRepository: Send + Sync {
    /// Every variant flagged available in the store.
    fn list_available(&self) -> impl Future<Output = Result<Vec<Variant>, CoreError>> + Send;
}
