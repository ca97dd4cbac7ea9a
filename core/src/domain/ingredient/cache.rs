use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::domain::ingredient::{
    entities::{Component, Ingredient},
    ports::IngredientRepository,
};

/// Names and components resolved for one set of ingredient ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngredientLookup {
    pub names: HashMap<String, String>,
    pub components: HashMap<String, Component>,
}

impl IngredientLookup {
    pub fn insert(&mut self, ingredient: &Ingredient) {
        self.names
            .insert(ingredient.id.clone(), ingredient.name.clone());
        if let Some(component) = ingredient.component {
            self.components.insert(ingredient.id.clone(), component);
        }
    }

    pub fn name(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Display name, falling back to the raw id when the name never resolved.
    pub fn name_or_id(&self, id: &str) -> String {
        self.name(id).unwrap_or(id).to_string()
    }

    pub fn component(&self, id: &str) -> Option<Component> {
        self.components.get(id).copied()
    }

    pub fn is(&self, id: &str, component: Component) -> bool {
        self.component(id) == Some(component)
    }

    /// Gives `component` to the ids the store left unclassified.
    pub fn classify_missing(&mut self, ids: &[String], component: Component) {
        for id in ids {
            self.components.entry(id.clone()).or_insert(component);
        }
    }

    pub fn extend(&mut self, other: IngredientLookup) {
        self.names.extend(other.names);
        self.components.extend(other.components);
    }
}

impl FromIterator<Ingredient> for IngredientLookup {
    fn from_iter<T: IntoIterator<Item = Ingredient>>(iter: T) -> Self {
        let mut lookup = IngredientLookup::default();
        for ingredient in iter {
            lookup.insert(&ingredient);
        }
        lookup
    }
}

/// Process-wide memo of ingredient names and components.
///
/// Entries are append-only and never invalidated. Two requests populating the
/// same ids at once may both hit the store; the writes are idempotent.
#[derive(Debug, Default)]
pub struct IngredientCatalog {
    entries: RwLock<HashMap<String, Ingredient>>,
}

impl IngredientCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves names and components for `ids`, fetching uncached ids in one batched call.
    ///
    /// A failed fetch leaves those ids unresolved for this call and does not poison the cache.
    pub async fn resolve<R: IngredientRepository>(
        &self,
        repository: &R,
        ids: &[String],
    ) -> IngredientLookup {
        let missing: Vec<String> = {
            let entries = self.entries.read().await;
            let mut seen = HashSet::new();
            ids.iter()
                .filter(|id| !entries.contains_key(id.as_str()) && seen.insert(id.as_str()))
                .cloned()
                .collect()
        };

        if !missing.is_empty() {
            match repository.find_by_ids(missing.clone()).await {
                Ok(found) => {
                    if found.len() < missing.len() {
                        debug!(
                            requested = missing.len(),
                            found = found.len(),
                            "some ingredients are unknown to the store"
                        );
                    }
                    self.remember(found).await;
                }
                Err(e) => {
                    warn!(
                        count = missing.len(),
                        error = %e,
                        "ingredient lookup failed, leaving ids unclassified"
                    );
                }
            }
        }

        let entries = self.entries.read().await;
        ids.iter()
            .filter_map(|id| entries.get(id.as_str()).cloned())
            .collect()
    }

    pub async fn classify<R: IngredientRepository>(
        &self,
        repository: &R,
        ids: &[String],
    ) -> HashMap<String, Component> {
        self.resolve(repository, ids).await.components
    }

    pub async fn remember(&self, ingredients: impl IntoIterator<Item = Ingredient>) {
        let mut entries = self.entries.write().await;
        for ingredient in ingredients {
            entries.insert(ingredient.id.clone(), ingredient);
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
