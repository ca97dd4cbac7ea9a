use crate::domain::{common::entities::app_errors::CoreError, menu::entities::AvailableDish};

#[cfg_attr(test, mockall::automock)]
pub trait MenuRepository: Send + Sync {
    /// Dishes on the current weekly menu.
    fn list_available(&self) -> impl Future<Output = Result<Vec<AvailableDish>, CoreError>> + Send;

    fn find_dish(
        &self,
        dish_id: String,
        meal_type: String,
    ) -> impl Future<Output = Result<Option<AvailableDish>, CoreError>> + Send;
}
