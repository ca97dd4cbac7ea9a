use crate::domain::{
    common::entities::app_errors::CoreError,
    meal_plan::{
        entities::{PlanDish, PlanView},
        value_objects::{AddDishInput, EditIngredientsInput, MutationOutcome, UpdateQuantityInput},
    },
};

#[cfg_attr(test, mockall::automock)]
pub trait MealPlanService: Send + Sync {
    /// Ordered dishes merged with what is still available, per delivery date.
    fn get_plan(
        &self,
        customer_token: String,
    ) -> impl Future<Output = Result<PlanView, CoreError>> + Send;

    /// The plan entry of one line with its customization options.
    fn get_line_options(
        &self,
        customer_token: String,
        line_id: String,
    ) -> impl Future<Output = Result<PlanDish, CoreError>> + Send;

    fn update_quantity(
        &self,
        customer_token: String,
        input: UpdateQuantityInput,
    ) -> impl Future<Output = Result<MutationOutcome, CoreError>> + Send;

    fn edit_ingredients(
        &self,
        customer_token: String,
        input: EditIngredientsInput,
    ) -> impl Future<Output = Result<MutationOutcome, CoreError>> + Send;

    fn add_dish(
        &self,
        customer_token: String,
        input: AddDishInput,
    ) -> impl Future<Output = Result<MutationOutcome, CoreError>> + Send;
}
