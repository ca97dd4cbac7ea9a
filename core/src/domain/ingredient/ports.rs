use crate::domain::{common::entities::app_errors::CoreError, ingredient::entities::Ingredient};

/// Read access to ingredient reference data.
#[cfg_attr(test, mockall::automock)]
pub trait IngredientRepository: Send + Sync {
    /// Batched lookup. Ids unknown to the store are simply absent from the result.
    fn find_by_ids(
        &self,
        ids: Vec<String>,
    ) -> impl Future<Output = Result<Vec<Ingredient>, CoreError>> + Send;

    /// Case-insensitive substring search on the ingredient name.
    fn search_by_name(
        &self,
        name: String,
    ) -> impl Future<Output = Result<Vec<Ingredient>, CoreError>> + Send;
}
