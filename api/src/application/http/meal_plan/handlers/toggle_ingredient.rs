use crate::application::auth::CustomerToken;
use crate::application::http::meal_plan::validators::ToggleIngredientValidator;
use crate::application::http::server::api_entities::api_error::{ApiError, ValidateJson};
use crate::application::http::server::api_entities::response::Response;
use crate::application::http::server::app_state::AppState;
use axum::extract::{Path, State};
use plateful_core::domain::meal_plan::{
    ports::MealPlanService,
    value_objects::{EditIngredientsInput, EditIntent, MutationOutcome},
};

#[utoipa::path(
    put,
    path = "/lines/{line_id}/ingredients",
    tag = "plan",
    summary = "Toggle ingredient",
    description = "Adds or removes an ingredient named by id or by free-text name.",
    request_body = ToggleIngredientValidator,
    responses(
        (status = 200, body = MutationOutcome),
        (status = 400, description = "Name matches several ingredients"),
        (status = 404, description = "Unknown customer, line or ingredient"),
        (status = 409, description = "Line changed since it was read"),
    ),
    params(
        ("line_id" = String, Path, description = "Order line ID"),
    ),
)]
pub async fn toggle_ingredient(
    Path(line_id): Path<String>,
    State(state): State<AppState>,
    CustomerToken(token): CustomerToken,
    ValidateJson(payload): ValidateJson<ToggleIngredientValidator>,
) -> Result<Response<MutationOutcome>, ApiError> {
    let target = payload.target().ok_or_else(|| {
        ApiError::ValidationError("provide exactly one of ingredientId or ingredientName".into())
    })?;

    let outcome = state
        .service
        .edit_ingredients(
            token,
            EditIngredientsInput {
                line_id,
                intent: EditIntent::ToggleIngredient {
                    target,
                    active: payload.active,
                },
                expected_revision: payload.expected_revision,
            },
        )
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(outcome))
}
