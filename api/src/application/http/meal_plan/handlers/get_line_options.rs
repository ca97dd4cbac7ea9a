use crate::application::auth::CustomerToken;
use crate::application::http::server::api_entities::api_error::ApiError;
use crate::application::http::server::api_entities::response::Response;
use crate::application::http::server::app_state::AppState;
use axum::extract::{Path, State};
use plateful_core::domain::meal_plan::{entities::PlanDish, ports::MealPlanService};

#[utoipa::path(
    get,
    path = "/lines/{line_id}/options",
    tag = "plan",
    summary = "Get line options",
    description = "Returns one ordered line with its sauce, garnish, veggie, starch and protein options.",
    responses(
        (status = 200, body = PlanDish),
        (status = 404, description = "Unknown customer or line"),
    ),
    params(
        ("line_id" = String, Path, description = "Order line ID"),
    ),
)]
pub async fn get_line_options(
    Path(line_id): Path<String>,
    State(state): State<AppState>,
    CustomerToken(token): CustomerToken,
) -> Result<Response<PlanDish>, ApiError> {
    let dish = state
        .service
        .get_line_options(token, line_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(dish))
}
