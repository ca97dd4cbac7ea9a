use std::collections::HashMap;

use crate::domain::{
    customization::{
        entities::DishCustomization,
        options::{OptionsInput, resolve_options},
        protein::{current_protein, resolve_protein_options},
    },
    ingredient::cache::IngredientLookup,
    variant::entities::Variant,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SignatureKey {
    meal_type: String,
    current: Vec<String>,
    original: Vec<String>,
}

impl SignatureKey {
    fn new(meal_type: &str, current: &[String], original: &[String]) -> Self {
        let mut current = current.to_vec();
        current.sort();
        let mut original = original.to_vec();
        original.sort();
        Self {
            meal_type: meal_type.to_string(),
            current,
            original,
        }
    }
}

/// Request-scoped option builder over pre-resolved ingredient data.
///
/// Identical dish states (same meal type, current and original ids) are computed once.
pub struct Customizer<'a> {
    lookup: &'a IngredientLookup,
    variants: &'a [Variant],
    standard_sauce_ids: &'a [String],
    memo: HashMap<SignatureKey, DishCustomization>,
}

impl<'a> Customizer<'a> {
    pub fn new(
        lookup: &'a IngredientLookup,
        variants: &'a [Variant],
        standard_sauce_ids: &'a [String],
    ) -> Self {
        Self {
            lookup,
            variants,
            standard_sauce_ids,
            memo: HashMap::new(),
        }
    }

    pub fn customize(
        &mut self,
        meal_type: &str,
        current: &[String],
        original: &[String],
    ) -> DishCustomization {
        let key = SignatureKey::new(meal_type, current, original);
        if let Some(found) = self.memo.get(&key) {
            return found.clone();
        }

        let mut all = original.to_vec();
        for id in current {
            if !all.contains(id) {
                all.push(id.clone());
            }
        }

        let input = OptionsInput {
            all_ingredient_ids: &all,
            current_ingredient_ids: current,
            original_ingredient_ids: original,
            meal_type,
            lookup: self.lookup,
            variants: self.variants,
            standard_sauce_ids: self.standard_sauce_ids,
        };

        let customization = DishCustomization {
            options: resolve_options(&input),
            protein: resolve_protein_options(
                current_protein(current, self.lookup),
                meal_type,
                self.variants,
                self.lookup,
            ),
        };

        self.memo.insert(key, customization.clone());
        customization
    }

    pub fn memoized(&self) -> usize {
        self.memo.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ingredient::entities::{Component, Ingredient};

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_identical_states_are_memoized() {
        let lookup: IngredientLookup = vec![
            Ingredient::new("chicken", "Chicken", Some(Component::Meat)),
            Ingredient::new("cilantro", "Cilantro", Some(Component::Garnish)),
        ]
        .into_iter()
        .collect();
        let standard = ids(&[]);
        let mut customizer = Customizer::new(&lookup, &[], &standard);

        let first = customizer.customize(
            "Lunch",
            &ids(&["chicken", "cilantro"]),
            &ids(&["chicken", "cilantro"]),
        );
        let second = customizer.customize(
            "Lunch",
            &ids(&["cilantro", "chicken"]),
            &ids(&["cilantro", "chicken"]),
        );
        customizer.customize("Dinner", &ids(&["chicken"]), &ids(&["chicken"]));

        assert_eq!(first, second);
        assert_eq!(customizer.memoized(), 2);
        assert_eq!(first.options.garnish.len(), 1);
        assert_eq!(
            first.protein.current.as_ref().map(|c| c.name.as_str()),
            Some("Chicken")
        );
    }
}
