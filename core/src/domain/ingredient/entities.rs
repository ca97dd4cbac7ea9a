use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Category an ingredient belongs to. Drives which customization section lists it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Component {
    Meat,
    Sauce,
    Garnish,
    Veggies,
    Starch,
}

impl Component {
    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Meat => "Meat",
            Component::Sauce => "Sauce",
            Component::Garnish => "Garnish",
            Component::Veggies => "Veggies",
            Component::Starch => "Starch",
        }
    }

    /// Parses the store's component label. Unknown labels are unclassified.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "meat" | "protein" => Some(Component::Meat),
            "sauce" => Some(Component::Sauce),
            "garnish" => Some(Component::Garnish),
            "veggies" | "veggie" | "vegetable" | "vegetables" => Some(Component::Veggies),
            "starch" => Some(Component::Starch),
            _ => None,
        }
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub component: Option<Component>,
}

impl Ingredient {
    pub fn new(id: impl Into<String>, name: impl Into<String>, component: Option<Component>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            component,
        }
    }
}
