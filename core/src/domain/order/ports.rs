use crate::domain::{
    common::entities::app_errors::CoreError,
    order::entities::{IngredientUpdate, LineGroupKey, NewOrderLine, OrderLine},
};

#[cfg_attr(test, mockall::automock)]
pub trait OrderLineRepository: Send + Sync {
    /// Every line of the customer, stale ones included.
    fn list_by_customer(
        &self,
        customer_token: String,
    ) -> impl Future<Output = Result<Vec<OrderLine>, CoreError>> + Send;

    fn get_by_id(
        &self,
        line_id: String,
    ) -> impl Future<Output = Result<Option<OrderLine>, CoreError>> + Send;

    /// Every line of one plan item, stale ones included.
    fn list_group(
        &self,
        key: LineGroupKey,
    ) -> impl Future<Output = Result<Vec<OrderLine>, CoreError>> + Send;

    /// Creates lines, skipping any whose line key already exists.
    fn create_lines(
        &self,
        lines: Vec<NewOrderLine>,
    ) -> impl Future<Output = Result<Vec<OrderLine>, CoreError>> + Send;

    /// Compare-and-set write of the ingredient override; fails with `StaleRevision`.
    fn update_ingredients(
        &self,
        update: IngredientUpdate,
    ) -> impl Future<Output = Result<OrderLine, CoreError>> + Send;

    fn delete_lines(
        &self,
        line_ids: Vec<String>,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}
