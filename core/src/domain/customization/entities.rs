use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const NO_SAUCE_LABEL: &str = "No Sauce";

/// One selectable choice in a customization section. `id` is `None` only for "No Sauce".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptionEntry {
    pub id: Option<String>,
    pub name: String,
    pub is_active: bool,
}

impl OptionEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, is_active: bool) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
            is_active,
        }
    }

    pub fn no_sauce(is_active: bool) -> Self {
        Self {
            id: None,
            name: NO_SAUCE_LABEL.to_string(),
            is_active,
        }
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DishOptions {
    pub sauce: Vec<OptionEntry>,
    pub garnish: Vec<OptionEntry>,
    pub veggie: Vec<OptionEntry>,
    pub starch: Vec<OptionEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProteinOption {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub price: f64,
    pub variant_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProteinOptions {
    /// The protein currently on the dish, reported even when it has no substitution group.
    pub current: Option<OptionEntry>,
    pub variant_type: Option<String>,
    pub options: Vec<ProteinOption>,
}

/// Everything the customization UI needs for one dish state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DishCustomization {
    pub options: DishOptions,
    pub protein: ProteinOptions,
}
