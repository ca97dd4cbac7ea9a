use crate::application::auth::CustomerToken;
use crate::application::http::meal_plan::validators::UpdateQuantityValidator;
use crate::application::http::server::api_entities::api_error::{ApiError, ValidateJson};
use crate::application::http::server::api_entities::response::Response;
use crate::application::http::server::app_state::AppState;
use axum::extract::{Path, State};
use plateful_core::domain::meal_plan::{
    ports::MealPlanService,
    value_objects::{MutationOutcome, UpdateQuantityInput},
};

#[utoipa::path(
    put,
    path = "/lines/{line_id}/quantity",
    tag = "plan",
    summary = "Update dish quantity",
    description = "Grows or shrinks the group of lines ordered for the dish. Zero removes the dish.",
    request_body = UpdateQuantityValidator,
    responses(
        (status = 200, body = MutationOutcome),
        (status = 400, description = "Quantity out of range"),
        (status = 404, description = "Unknown customer or line"),
        (status = 409, description = "Some servings could not be created, retry the update"),
    ),
    params(
        ("line_id" = String, Path, description = "Reference order line ID"),
    ),
)]
pub async fn update_quantity(
    Path(line_id): Path<String>,
    State(state): State<AppState>,
    CustomerToken(token): CustomerToken,
    ValidateJson(payload): ValidateJson<UpdateQuantityValidator>,
) -> Result<Response<MutationOutcome>, ApiError> {
    let outcome = state
        .service
        .update_quantity(
            token,
            UpdateQuantityInput {
                line_id,
                quantity: payload.quantity,
            },
        )
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(outcome))
}
