use crate::application::auth::CustomerToken;
use crate::application::http::server::api_entities::api_error::ApiError;
use crate::application::http::server::api_entities::response::Response;
use crate::application::http::server::app_state::AppState;
use axum::extract::State;
use plateful_core::domain::meal_plan::{entities::PlanView, ports::MealPlanService};

#[utoipa::path(
    get,
    path = "",
    tag = "plan",
    summary = "Get meal plan",
    description = "Returns the customer's ordered dishes merged with the dishes still available, grouped by delivery date.",
    responses(
        (status = 200, body = PlanView),
        (status = 401, description = "Missing bearer token"),
        (status = 404, description = "Unknown customer"),
    ),
)]
pub async fn get_plan(
    State(state): State<AppState>,
    CustomerToken(token): CustomerToken,
) -> Result<Response<PlanView>, ApiError> {
    let plan = state
        .service
        .get_plan(token)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(plan))
}
