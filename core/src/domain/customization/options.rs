use std::collections::HashSet;

use crate::domain::{
    customization::entities::{DishOptions, OptionEntry},
    ingredient::{cache::IngredientLookup, entities::Component},
    variant::entities::{STARCH_SUBSTITUTION, Variant, applicable},
};

/// Inputs for resolving the sauce/garnish/veggie/starch sections of one dish state.
#[derive(Debug, Clone, Copy)]
pub struct OptionsInput<'a> {
    /// Union of original and current ids, used for display-only sections.
    pub all_ingredient_ids: &'a [String],
    pub current_ingredient_ids: &'a [String],
    pub original_ingredient_ids: &'a [String],
    pub meal_type: &'a str,
    pub lookup: &'a IngredientLookup,
    pub variants: &'a [Variant],
    pub standard_sauce_ids: &'a [String],
}

impl OptionsInput<'_> {
    fn is_current(&self, id: &str) -> bool {
        self.current_ingredient_ids.iter().any(|c| c == id)
    }
}

pub fn resolve_options(input: &OptionsInput<'_>) -> DishOptions {
    DishOptions {
        sauce: sauce_options(input),
        garnish: garnish_options(input),
        veggie: veggie_options(input),
        starch: starch_options(input),
    }
}

/// Single-select. Customer-specific sauces come first, then the standard list, then "No Sauce".
pub fn sauce_options(input: &OptionsInput<'_>) -> Vec<OptionEntry> {
    let lookup = input.lookup;
    let is_standard = |id: &str| input.standard_sauce_ids.iter().any(|s| s == id);
    let is_sauce = |id: &str| lookup.is(id, Component::Sauce) || is_standard(id);

    let mut seen: HashSet<&str> = input
        .standard_sauce_ids
        .iter()
        .map(String::as_str)
        .collect();
    let mut extras = Vec::new();

    let original_sauces = input
        .original_ingredient_ids
        .iter()
        .filter(|id| lookup.is(id, Component::Sauce));
    let current_sauces = input
        .current_ingredient_ids
        .iter()
        .filter(|id| lookup.is(id, Component::Sauce));

    for id in original_sauces.chain(current_sauces) {
        if seen.insert(id.as_str()) {
            extras.push(OptionEntry::new(
                id.clone(),
                lookup.name_or_id(id),
                input.is_current(id),
            ));
        }
    }

    let mut standard_seen = HashSet::new();
    let standard = input
        .standard_sauce_ids
        .iter()
        .filter(|id| standard_seen.insert(id.as_str()))
        .map(|id| OptionEntry::new(id.clone(), lookup.name_or_id(id), input.is_current(id)));

    let has_sauce = input.current_ingredient_ids.iter().any(|id| is_sauce(id));

    extras
        .into_iter()
        .chain(standard)
        .chain(std::iter::once(OptionEntry::no_sauce(!has_sauce)))
        .collect()
}

/// Multi-select. Every garnish on the dish, original or added.
pub fn garnish_options(input: &OptionsInput<'_>) -> Vec<OptionEntry> {
    let mut seen = HashSet::new();
    input
        .all_ingredient_ids
        .iter()
        .filter(|id| input.lookup.is(id, Component::Garnish))
        .filter(|id| seen.insert(id.as_str()))
        .map(|id| {
            OptionEntry::new(
                id.clone(),
                input.lookup.name_or_id(id),
                input.is_current(id),
            )
        })
        .collect()
}

/// Multi-select. Current veggies first and active, removed originals after them.
pub fn veggie_options(input: &OptionsInput<'_>) -> Vec<OptionEntry> {
    let mut options = Vec::new();
    let mut seen = HashSet::new();

    for id in input
        .current_ingredient_ids
        .iter()
        .filter(|id| input.lookup.is(id, Component::Veggies))
    {
        if seen.insert(id.as_str()) {
            options.push(OptionEntry::new(id.clone(), input.lookup.name_or_id(id), true));
        }
    }

    for id in input
        .original_ingredient_ids
        .iter()
        .filter(|id| input.lookup.is(id, Component::Veggies))
    {
        if seen.insert(id.as_str()) {
            options.push(OptionEntry::new(
                id.clone(),
                input.lookup.name_or_id(id),
                false,
            ));
        }
    }

    options
}

/// Single-select. Current starch, then original starch, then the meal's starch substitutions.
pub fn starch_options(input: &OptionsInput<'_>) -> Vec<OptionEntry> {
    let lookup = input.lookup;
    let current = input
        .current_ingredient_ids
        .iter()
        .filter(|id| lookup.is(id, Component::Starch));
    let original = input
        .original_ingredient_ids
        .iter()
        .filter(|id| lookup.is(id, Component::Starch));
    let substitutions = applicable(input.variants, STARCH_SUBSTITUTION, input.meal_type)
        .into_iter()
        .flat_map(|variant| variant.member_ingredient_ids.iter());

    let mut seen = HashSet::new();
    current
        .chain(original)
        .chain(substitutions)
        .filter(|id| seen.insert(id.as_str()))
        .map(|id| OptionEntry::new(id.clone(), lookup.name_or_id(id), input.is_current(id)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ingredient::entities::Ingredient;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn lookup() -> IngredientLookup {
        vec![
            Ingredient::new("teriyaki", "Teriyaki", Some(Component::Sauce)),
            Ingredient::new("bbq", "BBQ", Some(Component::Sauce)),
            Ingredient::new("chimichurri", "Chimichurri", Some(Component::Sauce)),
            Ingredient::new("cilantro", "Cilantro", Some(Component::Garnish)),
            Ingredient::new("scallion", "Scallion", Some(Component::Garnish)),
            Ingredient::new("broccoli", "Broccoli", Some(Component::Veggies)),
            Ingredient::new("carrot", "Carrot", Some(Component::Veggies)),
            Ingredient::new("rice", "Jasmine Rice", Some(Component::Starch)),
            Ingredient::new("quinoa", "Quinoa", Some(Component::Starch)),
            Ingredient::new("chicken", "Chicken", Some(Component::Meat)),
        ]
        .into_iter()
        .collect()
    }

    fn starch_variant() -> Variant {
        Variant {
            id: "var-starch".to_string(),
            variant_type: STARCH_SUBSTITUTION.to_string(),
            applicable_meal_types: ids(&["Lunch"]),
            member_ingredient_ids: ids(&["rice", "quinoa", "sweet-potato"]),
            display_name: "Starch swap".to_string(),
            price: 0.0,
        }
    }

    struct Fixture {
        all: Vec<String>,
        current: Vec<String>,
        original: Vec<String>,
        lookup: IngredientLookup,
        variants: Vec<Variant>,
        standard: Vec<String>,
    }

    impl Fixture {
        fn new(original: &[&str], current: &[&str]) -> Self {
            let original = ids(original);
            let current = ids(current);
            let mut all = original.clone();
            for id in &current {
                if !all.contains(id) {
                    all.push(id.clone());
                }
            }
            Self {
                all,
                current,
                original,
                lookup: lookup(),
                variants: vec![starch_variant()],
                standard: ids(&["teriyaki", "bbq"]),
            }
        }

        fn input(&self) -> OptionsInput<'_> {
            OptionsInput {
                all_ingredient_ids: &self.all,
                current_ingredient_ids: &self.current,
                original_ingredient_ids: &self.original,
                meal_type: "Lunch",
                lookup: &self.lookup,
                variants: &self.variants,
                standard_sauce_ids: &self.standard,
            }
        }
    }

    fn active_count(options: &[OptionEntry]) -> usize {
        options.iter().filter(|o| o.is_active).count()
    }

    #[test]
    fn test_sauce_empty_current_selects_no_sauce() {
        let fixture = Fixture::new(&[], &[]);
        let sauce = sauce_options(&fixture.input());

        assert_eq!(sauce.len(), 3);
        assert_eq!(active_count(&sauce), 1);
        let last = sauce.last().unwrap();
        assert_eq!(last.id, None);
        assert!(last.is_active);
    }

    #[test]
    fn test_sauce_non_standard_current_is_offered_and_active() {
        let fixture = Fixture::new(&["chicken"], &["chicken", "chimichurri"]);
        let sauce = sauce_options(&fixture.input());

        assert_eq!(sauce[0], OptionEntry::new("chimichurri", "Chimichurri", true));
        assert_eq!(sauce[1], OptionEntry::new("teriyaki", "Teriyaki", false));
        assert_eq!(sauce[2], OptionEntry::new("bbq", "BBQ", false));
        assert_eq!(sauce[3], OptionEntry::no_sauce(false));
        assert_eq!(active_count(&sauce), 1);
    }

    #[test]
    fn test_sauce_original_extra_listed_before_current_extra() {
        let fixture = Fixture::new(&["chimichurri"], &["bbq"]);
        let sauce = sauce_options(&fixture.input());
        let order: Vec<Option<&str>> = sauce.iter().map(|o| o.id.as_deref()).collect();

        assert_eq!(
            order,
            vec![Some("chimichurri"), Some("teriyaki"), Some("bbq"), None]
        );
        assert!(!sauce[0].is_active);
        assert!(sauce[2].is_active);
        assert_eq!(active_count(&sauce), 1);
    }

    #[test]
    fn test_sauce_standard_without_name_falls_back_to_id() {
        let mut fixture = Fixture::new(&[], &["house-sauce"]);
        fixture.standard = ids(&["house-sauce"]);
        let sauce = sauce_options(&fixture.input());

        assert_eq!(sauce[0], OptionEntry::new("house-sauce", "house-sauce", true));
        assert_eq!(sauce[1], OptionEntry::no_sauce(false));
    }

    #[test]
    fn test_garnish_marks_removed_garnish_inactive() {
        let fixture = Fixture::new(&["cilantro", "scallion", "rice"], &["cilantro", "rice"]);
        let garnish = garnish_options(&fixture.input());

        assert_eq!(
            garnish,
            vec![
                OptionEntry::new("cilantro", "Cilantro", true),
                OptionEntry::new("scallion", "Scallion", false),
            ]
        );
    }

    #[test]
    fn test_veggie_current_first_then_original() {
        let fixture = Fixture::new(&["broccoli", "carrot"], &["carrot"]);
        let veggie = veggie_options(&fixture.input());

        assert_eq!(
            veggie,
            vec![
                OptionEntry::new("carrot", "Carrot", true),
                OptionEntry::new("broccoli", "Broccoli", false),
            ]
        );
    }

    #[test]
    fn test_starch_dedups_across_sources() {
        let fixture = Fixture::new(&["rice"], &["quinoa"]);
        let starch = starch_options(&fixture.input());

        assert_eq!(
            starch,
            vec![
                OptionEntry::new("quinoa", "Quinoa", true),
                OptionEntry::new("rice", "Jasmine Rice", false),
                OptionEntry::new("sweet-potato", "sweet-potato", false),
            ]
        );
    }

    #[test]
    fn test_starch_substitutions_respect_meal_type() {
        let fixture = Fixture::new(&["rice"], &[]);
        let mut input = fixture.input();
        input.meal_type = "Breakfast";
        let starch = starch_options(&input);

        assert_eq!(starch, vec![OptionEntry::new("rice", "Jasmine Rice", false)]);
    }

    #[test]
    fn test_unclassified_ids_are_excluded() {
        let fixture = Fixture::new(&["mystery"], &["mystery"]);
        let options = resolve_options(&fixture.input());

        assert!(options.garnish.is_empty());
        assert!(options.veggie.is_empty());
        assert!(!options.sauce.iter().any(|o| o.has_id("mystery")));
        assert!(!options.starch.iter().any(|o| o.has_id("mystery")));
    }
}
