use super::handlers::add_dish::{__path_add_dish, add_dish};
use super::handlers::delete_ingredient::{__path_delete_ingredient, delete_ingredient};
use super::handlers::get_line_options::{__path_get_line_options, get_line_options};
use super::handlers::get_plan::{__path_get_plan, get_plan};
use super::handlers::replace_protein::{__path_replace_protein, replace_protein};
use super::handlers::replace_sauce::{__path_replace_sauce, replace_sauce};
use super::handlers::replace_starch::{__path_replace_starch, replace_starch};
use super::handlers::toggle_garnish::{__path_toggle_garnish, toggle_garnish};
use super::handlers::toggle_ingredient::{__path_toggle_ingredient, toggle_ingredient};
use super::handlers::toggle_veggie::{__path_toggle_veggie, toggle_veggie};
use super::handlers::update_quantity::{__path_update_quantity, update_quantity};
use crate::application::http::server::app_state::AppState;

use axum::{
    Router,
    routing::{get, post, put},
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(
    get_plan,
    get_line_options,
    update_quantity,
    toggle_veggie,
    toggle_garnish,
    replace_sauce,
    replace_starch,
    replace_protein,
    toggle_ingredient,
    delete_ingredient,
    add_dish
))]
pub struct MealPlanApiDoc;

pub fn meal_plan_routes(state: AppState) -> Router<AppState> {
    let root_path = &state.args.server.root_path;

    Router::new()
        .route(&format!("{}/plan", root_path), get(get_plan))
        .route(
            &format!("{}/plan/lines/{{line_id}}/options", root_path),
            get(get_line_options),
        )
        .route(
            &format!("{}/plan/lines/{{line_id}}/quantity", root_path),
            put(update_quantity),
        )
        .route(
            &format!("{}/plan/lines/{{line_id}}/veggies", root_path),
            put(toggle_veggie),
        )
        .route(
            &format!("{}/plan/lines/{{line_id}}/garnishes", root_path),
            put(toggle_garnish),
        )
        .route(
            &format!("{}/plan/lines/{{line_id}}/sauce", root_path),
            put(replace_sauce),
        )
        .route(
            &format!("{}/plan/lines/{{line_id}}/starch", root_path),
            put(replace_starch),
        )
        .route(
            &format!("{}/plan/lines/{{line_id}}/protein", root_path),
            put(replace_protein),
        )
        .route(
            &format!("{}/plan/lines/{{line_id}}/ingredients", root_path),
            put(toggle_ingredient).delete(delete_ingredient),
        )
        .route(&format!("{}/plan/dishes", root_path), post(add_dish))
}
