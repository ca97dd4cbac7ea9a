use std::collections::HashSet;

use tracing::warn;

use crate::domain::{
    customization::entities::{OptionEntry, ProteinOption, ProteinOptions},
    ingredient::{cache::IngredientLookup, entities::Component},
    variant::entities::{Variant, applicable, group_of},
};

/// Base ingredient name whose label is qualified with the preparation.
const EGG: &str = "Egg";

/// First effective ingredient classified as meat. Dishes carry at most one protein.
pub fn current_protein<'a>(effective: &'a [String], lookup: &IngredientLookup) -> Option<&'a str> {
    effective
        .iter()
        .find(|id| lookup.is(id, Component::Meat))
        .map(String::as_str)
}

/// Ingredient ids whose names are needed to build the protein options of one dish.
pub fn protein_candidate_ids(
    current_protein_id: &str,
    meal_type: &str,
    variants: &[Variant],
) -> Vec<String> {
    let Some(group) = group_of(variants, current_protein_id) else {
        return vec![current_protein_id.to_string()];
    };

    let mut seen = HashSet::new();
    std::iter::once(current_protein_id)
        .chain(
            applicable(variants, &group.variant_type, meal_type)
                .into_iter()
                .flat_map(|variant| variant.member_ingredient_ids.iter().map(String::as_str)),
        )
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

pub fn resolve_protein_options(
    current_protein_id: Option<&str>,
    meal_type: &str,
    variants: &[Variant],
    lookup: &IngredientLookup,
) -> ProteinOptions {
    let Some(current_id) = current_protein_id else {
        return ProteinOptions::default();
    };

    let current = Some(OptionEntry::new(current_id, lookup.name_or_id(current_id), true));

    let Some(group) = group_of(variants, current_id) else {
        return ProteinOptions {
            current,
            variant_type: None,
            options: Vec::new(),
        };
    };

    let mut seen = HashSet::new();
    let mut options = Vec::new();
    for variant in applicable(variants, &group.variant_type, meal_type) {
        for member_id in &variant.member_ingredient_ids {
            if !seen.insert(member_id.as_str()) {
                continue;
            }
            let Some(name) = lookup.name(member_id) else {
                warn!(
                    ingredient_id = %member_id,
                    variant_id = %variant.id,
                    "protein option lookup failed, skipping"
                );
                continue;
            };
            options.push(ProteinOption {
                id: member_id.clone(),
                name: protein_label(name, &variant.display_name),
                is_active: member_id == current_id,
                price: variant.price,
                variant_name: variant.display_name.clone(),
            });
        }
    }

    ProteinOptions {
        current,
        variant_type: Some(group.variant_type.clone()),
        options,
    }
}

fn protein_label(name: &str, variant_display_name: &str) -> String {
    if name == EGG && !variant_display_name.is_empty() {
        format!("{name} {variant_display_name}")
    } else {
        name.to_string()
    }
}
