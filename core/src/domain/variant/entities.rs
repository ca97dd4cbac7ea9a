use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const STARCH_SUBSTITUTION: &str = "Starch Substitution";
pub const VEGGIE_SUBSTITUTION: &str = "Veggie Substitution";

/// A named group of interchangeable ingredients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: String,
    pub variant_type: String,
    pub applicable_meal_types: Vec<String>,
    pub member_ingredient_ids: Vec<String>,
    pub display_name: String,
    pub price: f64,
}

impl Variant {
    pub fn contains(&self, ingredient_id: &str) -> bool {
        self.member_ingredient_ids.iter().any(|id| id == ingredient_id)
    }

    pub fn applies_to(&self, meal_type: &str) -> bool {
        self.applicable_meal_types.iter().any(|m| m == meal_type)
    }
}

/// First variant whose member list contains `ingredient_id`.
pub fn group_of<'a>(variants: &'a [Variant], ingredient_id: &str) -> Option<&'a Variant> {
    variants.iter().find(|variant| variant.contains(ingredient_id))
}

/// Variants of `variant_type` that apply to `meal_type`, in catalog order.
pub fn applicable<'a>(
    variants: &'a [Variant],
    variant_type: &str,
    meal_type: &str,
) -> Vec<&'a Variant> {
    variants
        .iter()
        .filter(|variant| variant.variant_type == variant_type && variant.applies_to(meal_type))
        .collect()
}
