pub mod add_dish;
pub mod delete_ingredient;
pub mod get_line_options;
pub mod get_plan;
pub mod replace_protein;
pub mod replace_sauce;
pub mod replace_starch;
pub mod toggle_garnish;
pub mod toggle_ingredient;
pub mod toggle_veggie;
pub mod update_quantity;
