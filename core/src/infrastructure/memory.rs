use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    common::{entities::app_errors::CoreError, generate_uuid_v7},
    customer::{entities::Customer, ports::CustomerRepository},
    ingredient::{entities::Ingredient, ports::IngredientRepository},
    menu::{entities::AvailableDish, ports::MenuRepository},
    order::{
        entities::{IngredientUpdate, LineGroupKey, NewOrderLine, OrderLine, append_audit},
        ports::OrderLineRepository,
    },
    variant::{entities::Variant, ports::VariantRepository},
};

#[derive(Debug, Default)]
struct Tables {
    customers: Vec<Customer>,
    lines: Vec<OrderLine>,
    menu: Vec<AvailableDish>,
    ingredients: HashMap<String, Ingredient>,
    variants: Vec<Variant>,
}

/// Process-local record store backing every port.
///
/// Clones share the same tables. Lines keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_customer(&self, customer: Customer) {
        self.tables.write().await.customers.push(customer);
    }

    pub async fn insert_dish(&self, dish: AvailableDish) {
        self.tables.write().await.menu.push(dish);
    }

    pub async fn insert_ingredients(&self, ingredients: impl IntoIterator<Item = Ingredient>) {
        let mut tables = self.tables.write().await;
        for ingredient in ingredients {
            tables.ingredients.insert(ingredient.id.clone(), ingredient);
        }
    }

    pub async fn insert_variant(&self, variant: Variant) {
        self.tables.write().await.variants.push(variant);
    }

    pub async fn insert_line(&self, line: NewOrderLine) -> OrderLine {
        let line = line.into_order_line(new_record_id());
        self.tables.write().await.lines.push(line.clone());
        line
    }

    pub async fn line(&self, line_id: &str) -> Option<OrderLine> {
        self.tables
            .read()
            .await
            .lines
            .iter()
            .find(|line| line.id == line_id)
            .cloned()
    }

    pub async fn active_lines(&self, customer_token: &str) -> Vec<OrderLine> {
        self.tables
            .read()
            .await
            .lines
            .iter()
            .filter(|line| line.customer_token == customer_token && line.is_active())
            .cloned()
            .collect()
    }
}

fn new_record_id() -> String {
    let id: Uuid = generate_uuid_v7();
    format!("rec{}", id.simple())
}

impl CustomerRepository for InMemoryRecordStore {
    async fn find_by_token(&self, token: String) -> Result<Option<Customer>, CoreError> {
        Ok(self
            .tables
            .read()
            .await
            .customers
            .iter()
            .find(|customer| customer.token == token)
            .cloned())
    }
}

impl OrderLineRepository for InMemoryRecordStore {
    async fn list_by_customer(&self, customer_token: String) -> Result<Vec<OrderLine>, CoreError> {
        Ok(self
            .tables
            .read()
            .await
            .lines
            .iter()
            .filter(|line| line.customer_token == customer_token)
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, line_id: String) -> Result<Option<OrderLine>, CoreError> {
        Ok(self.line(&line_id).await)
    }

    async fn list_group(&self, key: LineGroupKey) -> Result<Vec<OrderLine>, CoreError> {
        Ok(self
            .tables
            .read()
            .await
            .lines
            .iter()
            .filter(|line| line.belongs_to(&key))
            .cloned()
            .collect())
    }

    async fn create_lines(&self, lines: Vec<NewOrderLine>) -> Result<Vec<OrderLine>, CoreError> {
        let mut tables = self.tables.write().await;
        let mut created = Vec::with_capacity(lines.len());

        for line in lines {
            let exists = line.line_key.as_ref().is_some_and(|key| {
                tables
                    .lines
                    .iter()
                    .any(|existing| existing.line_key.as_ref() == Some(key))
            });
            if exists {
                debug!(line_key = ?line.line_key, "line key already exists, skipping");
                continue;
            }

            let line = line.into_order_line(new_record_id());
            tables.lines.push(line.clone());
            created.push(line);
        }

        Ok(created)
    }

    async fn update_ingredients(&self, update: IngredientUpdate) -> Result<OrderLine, CoreError> {
        let mut tables = self.tables.write().await;
        let line = tables
            .lines
            .iter_mut()
            .find(|line| line.id == update.line_id)
            .ok_or(CoreError::OrderLineNotFound)?;

        if line.revision != update.expected_revision {
            return Err(CoreError::StaleRevision {
                expected: update.expected_revision,
                actual: line.revision,
            });
        }

        line.final_ingredient_ids = update.final_ingredient_ids;
        line.protein_id = update.protein_id;
        line.audit_log = append_audit(&line.audit_log, &update.audit_entry);
        line.revision += 1;

        Ok(line.clone())
    }

    async fn delete_lines(&self, line_ids: Vec<String>) -> Result<(), CoreError> {
        self.tables
            .write()
            .await
            .lines
            .retain(|line| !line_ids.contains(&line.id));
        Ok(())
    }
}

impl MenuRepository for InMemoryRecordStore {
    async fn list_available(&self) -> Result<Vec<AvailableDish>, CoreError> {
        Ok(self.tables.read().await.menu.clone())
    }

    async fn find_dish(
        &self,
        dish_id: String,
        meal_type: String,
    ) -> Result<Option<AvailableDish>, CoreError> {
        Ok(self
            .tables
            .read()
            .await
            .menu
            .iter()
            .find(|dish| dish.dish_id == dish_id && dish.meal_type == meal_type)
            .cloned())
    }
}

impl IngredientRepository for InMemoryRecordStore {
    async fn find_by_ids(&self, ids: Vec<String>) -> Result<Vec<Ingredient>, CoreError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.ingredients.get(id))
            .cloned()
            .collect())
    }

    async fn search_by_name(&self, name: String) -> Result<Vec<Ingredient>, CoreError> {
        let needle = name.trim().to_lowercase();
        let tables = self.tables.read().await;
        let mut found: Vec<Ingredient> = tables
            .ingredients
            .values()
            .filter(|ingredient| ingredient.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }
}

impl VariantRepository for InMemoryRecordStore {
    async fn list_available(&self) -> Result<Vec<Variant>, CoreError> {
        Ok(self.tables.read().await.variants.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::menu::entities::Nutrition;

    fn new_line(line_key: Option<&str>) -> NewOrderLine {
        NewOrderLine {
            customer_token: "tok".to_string(),
            subscription_id: None,
            item_id: "LUNCH-01".to_string(),
            item_name: "Bowl".to_string(),
            dish_id: "bowl".to_string(),
            meal_type: "Lunch".to_string(),
            delivery_date: None,
            quantity: Some(1),
            protein_id: None,
            original_ingredient_ids: vec!["chicken".to_string()],
            final_ingredient_ids: Vec::new(),
            audit_log: String::new(),
            nutrition: Nutrition::default(),
            image_url: None,
            line_key: line_key.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_skips_existing_line_keys() {
        let store = InMemoryRecordStore::new();
        let first = store
            .create_lines(vec![new_line(Some("k1")), new_line(None)])
            .await
            .unwrap();
        assert_eq!(first.len(), 2);

        let second = store
            .create_lines(vec![new_line(Some("k1")), new_line(Some("k2"))])
            .await
            .unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].line_key.as_deref(), Some("k2"));
        assert_eq!(store.active_lines("tok").await.len(), 3);
    }

    #[tokio::test]
    async fn test_update_checks_revision() {
        let store = InMemoryRecordStore::new();
        let line = store.insert_line(new_line(None)).await;

        let update = IngredientUpdate {
            line_id: line.id.clone(),
            final_ingredient_ids: vec!["tofu".to_string()],
            protein_id: Some("tofu".to_string()),
            audit_entry: "swapped".to_string(),
            expected_revision: 0,
        };
        let updated = store.update_ingredients(update.clone()).await.unwrap();
        assert_eq!(updated.revision, 1);
        assert_eq!(updated.audit_log, "swapped");

        let stale = store.update_ingredients(update).await.unwrap_err();
        assert_eq!(
            stale,
            CoreError::StaleRevision {
                expected: 0,
                actual: 1
            }
        );
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let store = InMemoryRecordStore::new();
        store
            .insert_ingredients(vec![
                Ingredient::new("a", "Red Pepper", None),
                Ingredient::new("b", "Basil", None),
            ])
            .await;

        let found = store.search_by_name("PEPP".to_string()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "a");
    }
}
