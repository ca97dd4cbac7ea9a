use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone)]
pub struct UpdateQuantityInput {
    pub line_id: String,
    pub quantity: i64,
}

/// How a caller names an ingredient: by id, or by free-text name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngredientTarget {
    Id(String),
    Name(String),
}

/// A customization request before it is resolved against the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditIntent {
    ToggleVeggie {
        ingredient_id: String,
        active: bool,
    },
    ToggleGarnish {
        ingredient_id: String,
        active: bool,
    },
    /// `None` selects "No Sauce".
    ReplaceSauce { ingredient_id: Option<String> },
    ReplaceStarch { ingredient_id: String },
    ReplaceProtein {
        old_id: Option<String>,
        new_id: String,
    },
    ToggleIngredient {
        target: IngredientTarget,
        active: bool,
    },
    DeleteIngredient { target: IngredientTarget },
}

#[derive(Debug, Clone)]
pub struct EditIngredientsInput {
    pub line_id: String,
    pub intent: EditIntent,
    /// Rejects the edit when the line changed since the caller read it.
    pub expected_revision: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct AddDishInput {
    pub dish_id: String,
    pub meal_type: String,
    pub delivery_date: Option<NaiveDate>,
}

/// Result of every plan mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MutationOutcome {
    pub success: bool,
    pub message: String,
    /// Line ids for quantity changes and new dishes, ingredient ids for edits.
    pub ids: Vec<String>,
    pub revision: Option<u64>,
}

impl MutationOutcome {
    pub fn ok(message: impl Into<String>, ids: Vec<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            ids,
            revision: None,
        }
    }

    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = Some(revision);
        self
    }
}
