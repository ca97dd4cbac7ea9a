use crate::application::auth::CustomerToken;
use crate::application::http::meal_plan::validators::AddDishValidator;
use crate::application::http::server::api_entities::api_error::{ApiError, ValidateJson};
use crate::application::http::server::api_entities::response::Response;
use crate::application::http::server::app_state::AppState;
use axum::extract::State;
use plateful_core::domain::meal_plan::{
    ports::MealPlanService,
    value_objects::{AddDishInput, MutationOutcome},
};

#[utoipa::path(
    post,
    path = "/dishes",
    tag = "plan",
    summary = "Add dish",
    description = "Orders one portion of a menu dish for a meal type and delivery date.",
    request_body = AddDishValidator,
    responses(
        (status = 201, body = MutationOutcome),
        (status = 404, description = "Unknown customer or dish"),
        (status = 409, description = "Dish already ordered for this meal"),
    ),
)]
pub async fn add_dish(
    State(state): State<AppState>,
    CustomerToken(token): CustomerToken,
    ValidateJson(payload): ValidateJson<AddDishValidator>,
) -> Result<Response<MutationOutcome>, ApiError> {
    let outcome = state
        .service
        .add_dish(
            token,
            AddDishInput {
                dish_id: payload.dish_id,
                meal_type: payload.meal_type,
                delivery_date: payload.delivery_date,
            },
        )
        .await
        .map_err(ApiError::from)?;

    Ok(Response::Created(outcome))
}
