pub mod common;
pub mod customer;
pub mod customization;
pub mod ingredient;
pub mod meal_plan;
pub mod menu;
pub mod order;
pub mod variant;
