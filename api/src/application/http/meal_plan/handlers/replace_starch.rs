use crate::application::auth::CustomerToken;
use crate::application::http::meal_plan::validators::ReplaceStarchValidator;
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
    path = "/lines/{line_id}/starch",
    tag = "plan",
    summary = "Replace starch",
    request_body = ReplaceStarchValidator,
    responses(
        (status = 200, body = MutationOutcome),
        (status = 404, description = "Unknown customer or line"),
        (status = 409, description = "Line changed since it was read"),
    ),
    params(
        ("line_id" = String, Path, description = "Order line ID"),
    ),
)]
pub async fn replace_starch(
    Path(line_id): Path<String>,
    State(state): State<AppState>,
    CustomerToken(token): CustomerToken,
    ValidateJson(payload): ValidateJson<ReplaceStarchValidator>,
) -> Result<Response<MutationOutcome>, ApiError> {
    let outcome = state
        .service
        .edit_ingredients(
            token,
            EditIngredientsInput {
                line_id,
                intent: EditIntent::ReplaceStarch {
                    ingredient_id: payload.ingredient_id,
                },
                expected_revision: payload.expected_revision,
            },
        )
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(outcome))
}
