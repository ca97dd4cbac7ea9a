use crate::application::auth::CustomerToken;
use crate::application::http::meal_plan::validators::ReplaceProteinValidator;
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
    path = "/lines/{line_id}/protein",
    tag = "plan",
    summary = "Replace protein",
    description = "Swaps the line's protein for another member of its variant group.",
    request_body = ReplaceProteinValidator,
    responses(
        (status = 200, body = MutationOutcome),
        (status = 400, description = "Ingredient is not a protein option for the dish"),
        (status = 404, description = "Unknown customer or line"),
        (status = 409, description = "Line changed since it was read"),
    ),
    params(
        ("line_id" = String, Path, description = "Order line ID"),
    ),
)]
pub async fn replace_protein(
    Path(line_id): Path<String>,
    State(state): State<AppState>,
    CustomerToken(token): CustomerToken,
    ValidateJson(payload): ValidateJson<ReplaceProteinValidator>,
) -> Result<Response<MutationOutcome>, ApiError> {
    let outcome = state
        .service
        .edit_ingredients(
            token,
            EditIngredientsInput {
                line_id,
                intent: EditIntent::ReplaceProtein {
                    old_id: payload.old_ingredient_id,
                    new_id: payload.new_ingredient_id,
                },
                expected_revision: payload.expected_revision,
            },
        )
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(outcome))
}
