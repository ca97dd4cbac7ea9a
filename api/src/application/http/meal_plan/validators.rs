use chrono::NaiveDate;
use plateful_core::domain::meal_plan::value_objects::IngredientTarget;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityValidator {
    #[validate(range(min = 0, message = "quantity must not be negative"))]
    pub quantity: i64,
}

/// Body shared by the veggie and garnish toggles.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToggleValidator {
    #[validate(length(min = 1, message = "ingredientId is required"))]
    pub ingredient_id: String,

    pub active: bool,

    #[serde(default)]
    pub expected_revision: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceSauceValidator {
    /// Omit or send null to select "No Sauce".
    #[serde(default)]
    pub ingredient_id: Option<String>,

    #[serde(default)]
    pub expected_revision: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceStarchValidator {
    #[validate(length(min = 1, message = "ingredientId is required"))]
    pub ingredient_id: String,

    #[serde(default)]
    pub expected_revision: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceProteinValidator {
    #[serde(default)]
    pub old_ingredient_id: Option<String>,

    #[validate(length(min = 1, message = "newIngredientId is required"))]
    pub new_ingredient_id: String,

    #[serde(default)]
    pub expected_revision: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_toggle_target"))]
pub struct ToggleIngredientValidator {
    #[serde(default)]
    pub ingredient_id: Option<String>,

    #[serde(default)]
    pub ingredient_name: Option<String>,

    pub active: bool,

    #[serde(default)]
    pub expected_revision: Option<u64>,
}

impl ToggleIngredientValidator {
    pub fn target(&self) -> Option<IngredientTarget> {
        target(&self.ingredient_id, &self.ingredient_name)
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_delete_target"))]
pub struct DeleteIngredientValidator {
    #[serde(default)]
    pub ingredient_id: Option<String>,

    #[serde(default)]
    pub ingredient_name: Option<String>,

    #[serde(default)]
    pub expected_revision: Option<u64>,
}

impl DeleteIngredientValidator {
    pub fn target(&self) -> Option<IngredientTarget> {
        target(&self.ingredient_id, &self.ingredient_name)
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddDishValidator {
    #[validate(length(min = 1, message = "dishId is required"))]
    pub dish_id: String,

    #[validate(length(min = 1, message = "mealType is required"))]
    pub meal_type: String,

    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn target(id: &Option<String>, name: &Option<String>) -> Option<IngredientTarget> {
    match (present(id), present(name)) {
        (Some(id), None) => Some(IngredientTarget::Id(id.to_string())),
        (None, Some(name)) => Some(IngredientTarget::Name(name.to_string())),
        _ => None,
    }
}

fn exactly_one(id: &Option<String>, name: &Option<String>) -> Result<(), ValidationError> {
    if target(id, name).is_some() {
        return Ok(());
    }

    let mut error = ValidationError::new("ingredient_target");
    error.message = Some("provide exactly one of ingredientId or ingredientName".into());
    Err(error)
}

fn validate_toggle_target(value: &ToggleIngredientValidator) -> Result<(), ValidationError> {
    exactly_one(&value.ingredient_id, &value.ingredient_name)
}

fn validate_delete_target(value: &DeleteIngredientValidator) -> Result<(), ValidationError> {
    exactly_one(&value.ingredient_id, &value.ingredient_name)
}
