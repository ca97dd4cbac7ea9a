use crate::application::auth::CustomerToken;
use crate::application::http::meal_plan::validators::DeleteIngredientValidator;
use crate::application::http::server::api_entities::api_error::{ApiError, ValidateJson};
use crate::application::http::server::api_entities::response::Response;
use crate::application::http::server::app_state::AppState;
use axum::extract::{Path, State};
use plateful_core::domain::meal_plan::{
    ports::MealPlanService,
    value_objects::{EditIngredientsInput, EditIntent, MutationOutcome},
};

#[utoipa::path(
    delete,
    path = "/lines/{line_id}/ingredients",
    tag = "plan",
    summary = "Delete ingredient",
    description = "Removes an ingredient currently on the line, named by id or by free-text name.",
    request_body = DeleteIngredientValidator,
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
pub async fn delete_ingredient(
    Path(line_id): Path<String>,
    State(state): State<AppState>,
    CustomerToken(token): CustomerToken,
    ValidateJson(payload): ValidateJson<DeleteIngredientValidator>,
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
                intent: EditIntent::DeleteIngredient { target },
                expected_revision: payload.expected_revision,
            },
        )
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(outcome))
}
