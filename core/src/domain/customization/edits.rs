use chrono::{DateTime, Utc};

use crate::domain::{
    common::entities::app_errors::CoreError,
    customization::entities::NO_SAUCE_LABEL,
    ingredient::{
        cache::IngredientLookup,
        entities::{Component, Ingredient},
    },
    order::entities::audit_entry,
};

/// Multi-select sections that use toggle semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleSection {
    Garnish,
    Veggie,
    Ingredient,
}

impl ToggleSection {
    fn label(&self) -> &'static str {
        match self {
            ToggleSection::Garnish => "Garnish",
            ToggleSection::Veggie => "Veggie",
            ToggleSection::Ingredient => "Ingredient",
        }
    }
}

/// A fully resolved change to a line's effective ingredient list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngredientEdit {
    /// Without `old_id` every meat ingredient is replaced.
    ReplaceProtein {
        old_id: Option<String>,
        new_id: String,
    },
    /// `None` selects "No Sauce".
    ReplaceSauce { new_id: Option<String> },
    ReplaceStarch { new_id: String },
    Toggle {
        section: ToggleSection,
        ingredient_id: String,
        active: bool,
    },
    Remove { ingredient_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub ingredient_ids: Vec<String>,
    pub changed: bool,
    pub audit_entry: String,
}

pub fn apply_edit(
    effective: &[String],
    lookup: &IngredientLookup,
    edit: &IngredientEdit,
    now: DateTime<Utc>,
) -> EditOutcome {
    let mut ids = effective.to_vec();

    let message = match edit {
        IngredientEdit::ReplaceProtein { old_id, new_id } => {
            let removed = match old_id {
                Some(old_id) => remove_all(&mut ids, |id| id == old_id.as_str()),
                None => remove_all(&mut ids, |id| lookup.is(id, Component::Meat)),
            };
            push_unique(&mut ids, new_id);
            format!(
                "Protein changed from {} to {}",
                describe(&removed, lookup),
                lookup.name_or_id(new_id)
            )
        }
        IngredientEdit::ReplaceSauce { new_id } => {
            let removed = remove_all(&mut ids, |id| lookup.is(id, Component::Sauce));
            let to = match new_id {
                Some(new_id) => {
                    push_unique(&mut ids, new_id);
                    lookup.name_or_id(new_id)
                }
                None => NO_SAUCE_LABEL.to_string(),
            };
            let from = if removed.is_empty() {
                NO_SAUCE_LABEL.to_string()
            } else {
                describe(&removed, lookup)
            };
            format!("Sauce changed from {from} to {to}")
        }
        IngredientEdit::ReplaceStarch { new_id } => {
            let removed = remove_all(&mut ids, |id| lookup.is(id, Component::Starch));
            push_unique(&mut ids, new_id);
            format!(
                "Starch changed from {} to {}",
                describe(&removed, lookup),
                lookup.name_or_id(new_id)
            )
        }
        IngredientEdit::Toggle {
            section,
            ingredient_id,
            active,
        } => {
            if *active {
                push_unique(&mut ids, ingredient_id);
            } else {
                remove_all(&mut ids, |id| id == ingredient_id.as_str());
            }
            format!(
                "{} {} {}",
                section.label(),
                lookup.name_or_id(ingredient_id),
                if *active { "added" } else { "removed" }
            )
        }
        IngredientEdit::Remove { ingredient_id } => {
            remove_all(&mut ids, |id| id == ingredient_id.as_str());
            format!("Ingredient {} deleted", lookup.name_or_id(ingredient_id))
        }
    };

    EditOutcome {
        changed: ids != effective,
        ingredient_ids: ids,
        audit_entry: audit_entry(now, &message),
    }
}

fn remove_all(ids: &mut Vec<String>, matches: impl Fn(&str) -> bool) -> Vec<String> {
    let mut removed = Vec::new();
    ids.retain(|id| {
        if matches(id.as_str()) {
            if !removed.contains(id) {
                removed.push(id.clone());
            }
            false
        } else {
            true
        }
    });
    removed
}

fn push_unique(ids: &mut Vec<String>, id: &str) {
    if !ids.iter().any(|existing| existing == id) {
        ids.push(id.to_string());
    }
}

fn describe(ids: &[String], lookup: &IngredientLookup) -> String {
    if ids.is_empty() {
        return "none".to_string();
    }
    ids.iter()
        .map(|id| lookup.name_or_id(id))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Picks the ingredient a free-text name refers to.
///
/// An exact case-insensitive name match wins. Otherwise the name must be a
/// substring of exactly one candidate; several matches are rejected as ambiguous.
pub fn match_ingredient_by_name<'a>(
    name: &str,
    candidates: &'a [Ingredient],
) -> Result<&'a Ingredient, CoreError> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return Err(CoreError::Invalid("ingredient name is required".to_string()));
    }

    let exact = distinct(
        candidates
            .iter()
            .filter(|c| c.name.trim().to_lowercase() == needle),
    );
    let matches = if exact.is_empty() {
        distinct(
            candidates
                .iter()
                .filter(|c| c.name.to_lowercase().contains(&needle)),
        )
    } else {
        exact
    };

    match matches.as_slice() {
        [] => Err(CoreError::IngredientNotFound(name.to_string())),
        [single] => Ok(*single),
        many => Err(CoreError::AmbiguousIngredient {
            name: name.to_string(),
            candidates: many.iter().map(|c| c.name.clone()).collect(),
        }),
    }
}

fn distinct<'a>(candidates: impl Iterator<Item = &'a Ingredient>) -> Vec<&'a Ingredient> {
    let mut found: Vec<&Ingredient> = Vec::new();
    for candidate in candidates {
        if !found.iter().any(|f| f.id == candidate.id) {
            found.push(candidate);
        }
    }
    found
}
