use crate::application::http::health::__path_health;
use crate::application::http::meal_plan::router::MealPlanApiDoc;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Plateful API"
    ),
    paths(health),
    nest(
        (path = "/plan", api = MealPlanApiDoc),
    )
)]
pub struct ApiDoc;
