use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    customization::entities::{DishOptions, ProteinOptions},
    menu::entities::Nutrition,
};

/// A customer's plan, one entry per delivery date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanView {
    pub customer_token: String,
    pub has_orders: bool,
    pub days: Vec<PlanDay>,
}

impl PlanView {
    pub fn day(&self, delivery_date: Option<NaiveDate>) -> Option<&PlanDay> {
        self.days.iter().find(|day| day.delivery_date == delivery_date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanDay {
    /// `None` is the placeholder day used before the customer has ordered anything.
    pub delivery_date: Option<NaiveDate>,
    pub dishes: Vec<PlanDish>,
    pub nutrition: Nutrition,
}

impl PlanDay {
    pub fn ordered(&self) -> impl Iterator<Item = &PlanDish> {
        self.dishes.iter().filter(|dish| dish.is_ordered)
    }

    pub fn available(&self) -> impl Iterator<Item = &PlanDish> {
        self.dishes.iter().filter(|dish| !dish.is_ordered)
    }
}

/// A dish in the plan, either ordered (one or more lines) or offered from the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanDish {
    /// Line used as the reference for quantity and ingredient edits.
    pub line_id: Option<String>,
    pub line_ids: Vec<String>,
    pub item_id: Option<String>,
    pub dish_id: String,
    pub meal_type: String,
    pub name: String,
    pub image_url: Option<String>,
    pub quantity: u32,
    pub is_ordered: bool,
    pub is_available: bool,
    pub ingredient_ids: Vec<String>,
    pub revision: Option<u64>,
    pub nutrition: Nutrition,
    pub options: DishOptions,
    pub protein: ProteinOptions,
}
