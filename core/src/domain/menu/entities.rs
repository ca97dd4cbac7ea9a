use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-serving nutrition estimate. Only ever summed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Nutrition {
    pub calories: f64,
    pub protein_grams: f64,
    pub carbs_grams: f64,
    pub fat_grams: f64,
}

impl Add for Nutrition {
    type Output = Nutrition;

    fn add(self, other: Nutrition) -> Nutrition {
        Nutrition {
            calories: self.calories + other.calories,
            protein_grams: self.protein_grams + other.protein_grams,
            carbs_grams: self.carbs_grams + other.carbs_grams,
            fat_grams: self.fat_grams + other.fat_grams,
        }
    }
}

impl Sum for Nutrition {
    fn sum<I: Iterator<Item = Nutrition>>(iter: I) -> Self {
        iter.fold(Nutrition::default(), Add::add)
    }
}

/// A weekly menu dish that can be added to a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailableDish {
    pub dish_id: String,
    pub meal_type: String,
    pub name: String,
    pub ingredient_ids: Vec<String>,
    pub image_url: Option<String>,
    pub nutrition: Nutrition,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nutrition_sums() {
        let a = Nutrition {
            calories: 500.0,
            protein_grams: 30.0,
            carbs_grams: 40.0,
            fat_grams: 20.0,
        };
        let total: Nutrition = vec![a, a, Nutrition::default()].into_iter().sum();
        assert_eq!(total.calories, 1000.0);
        assert_eq!(total.fat_grams, 40.0);
    }
}
