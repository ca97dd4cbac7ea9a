use futures::future::try_join_all;
use tracing::{debug, error, warn};

use crate::{
    domain::{
        common::{RecordStoreConfig, entities::app_errors::CoreError},
        customer::{entities::Customer, ports::CustomerRepository},
        ingredient::{entities::Ingredient, ports::IngredientRepository},
        menu::{entities::AvailableDish, ports::MenuRepository},
        order::{
            entities::{IngredientUpdate, LineGroupKey, NewOrderLine, OrderLine, append_audit},
            ports::OrderLineRepository,
        },
        variant::{entities::Variant, ports::VariantRepository},
    },
    infrastructure::record_store::{
        client::RecordStoreClient,
        formula::Formula,
        mappers::{
            CUSTOMERS, INGREDIENTS, MENU, ORDERS, VARIANTS, customer_from_record,
            dish_from_record, fields, ingredient_from_record, ingredient_override_fields,
            order_line_fields, order_line_from_record, variant_from_record,
        },
    },
};

/// Ids resolved per lookup round trip, bounded by the store's formula length.
pub const LOOKUP_BATCH_SIZE: usize = 50;

/// Record-store adapter for every domain port.
#[derive(Debug, Clone)]
pub struct RecordStore {
    client: RecordStoreClient,
}

impl RecordStore {
    pub fn new(config: &RecordStoreConfig) -> Self {
        Self {
            client: RecordStoreClient::new(config),
        }
    }

    async fn existing_line_keys(&self, lines: &[NewOrderLine]) -> Result<Vec<String>, CoreError> {
        let keys: Vec<String> = lines
            .iter()
            .filter_map(|line| line.line_key.clone())
            .collect();
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let formula = Formula::Or(
            keys.iter()
                .map(|key| Formula::eq(fields::LINE_KEY, key.clone()))
                .collect(),
        );
        let records = self.client.list(ORDERS, Some(&formula)).await?;
        Ok(records
            .iter()
            .filter_map(|record| order_line_from_record(record).line_key)
            .collect())
    }
}

impl CustomerRepository for RecordStore {
    async fn find_by_token(&self, token: String) -> Result<Option<Customer>, CoreError> {
        let formula = Formula::eq(fields::TOKEN, token);
        let records = self.client.list(CUSTOMERS, Some(&formula)).await?;
        Ok(records.first().map(customer_from_record))
    }
}

impl OrderLineRepository for RecordStore {
    async fn list_by_customer(&self, customer_token: String) -> Result<Vec<OrderLine>, CoreError> {
        let formula = Formula::eq(fields::CUSTOMER_TOKEN, customer_token);
        let records = self.client.list(ORDERS, Some(&formula)).await?;
        Ok(records.iter().map(order_line_from_record).collect())
    }

    async fn get_by_id(&self, line_id: String) -> Result<Option<OrderLine>, CoreError> {
        let record = self.client.find(ORDERS, &line_id).await?;
        Ok(record.as_ref().map(order_line_from_record))
    }

    async fn list_group(&self, key: LineGroupKey) -> Result<Vec<OrderLine>, CoreError> {
        let formula = Formula::And(vec![
            Formula::eq(fields::CUSTOMER_TOKEN, key.customer_token.clone()),
            Formula::eq(fields::DISH_ID, key.dish_id.clone()),
            Formula::eq(fields::MEAL_TYPE, key.meal_type.clone()),
            Formula::on_date(fields::DELIVERY_DATE, key.delivery_date),
        ]);
        let records = self.client.list(ORDERS, Some(&formula)).await?;

        Ok(records
            .iter()
            .map(order_line_from_record)
            .filter(|line| line.belongs_to(&key))
            .collect())
    }

    async fn create_lines(&self, lines: Vec<NewOrderLine>) -> Result<Vec<OrderLine>, CoreError> {
        let existing = self.existing_line_keys(&lines).await?;
        let fresh: Vec<_> = lines
            .iter()
            .filter(|line| {
                let duplicate = line
                    .line_key
                    .as_ref()
                    .is_some_and(|key| existing.contains(key));
                if duplicate {
                    debug!(line_key = ?line.line_key, "line key already exists, skipping");
                }
                !duplicate
            })
            .map(order_line_fields)
            .collect();

        if fresh.is_empty() {
            return Ok(Vec::new());
        }

        let records = self.client.create(ORDERS, fresh).await?;
        Ok(records.iter().map(order_line_from_record).collect())
    }

    /// Re-reads the line and writes only if its revision still matches.
    ///
    /// The store has no conditional write, so a writer landing between the read
    /// and the patch is not detected.
    async fn update_ingredients(&self, update: IngredientUpdate) -> Result<OrderLine, CoreError> {
        let current = self
            .client
            .find(ORDERS, &update.line_id)
            .await?
            .map(|record| order_line_from_record(&record))
            .ok_or(CoreError::OrderLineNotFound)?;

        if current.revision != update.expected_revision {
            warn!(
                line_id = %update.line_id,
                expected = update.expected_revision,
                actual = current.revision,
                "ingredient override is stale"
            );
            return Err(CoreError::StaleRevision {
                expected: update.expected_revision,
                actual: current.revision,
            });
        }

        let fields = ingredient_override_fields(
            &update.final_ingredient_ids,
            update.protein_id.as_deref(),
            &append_audit(&current.audit_log, &update.audit_entry),
            current.revision + 1,
        );
        let record = self.client.update(ORDERS, &update.line_id, fields).await?;

        Ok(order_line_from_record(&record))
    }

    async fn delete_lines(&self, line_ids: Vec<String>) -> Result<(), CoreError> {
        if line_ids.is_empty() {
            return Ok(());
        }
        self.client.delete(ORDERS, &line_ids).await
    }
}

impl MenuRepository for RecordStore {
    async fn list_available(&self) -> Result<Vec<AvailableDish>, CoreError> {
        let formula = Formula::Truthy(fields::AVAILABLE.to_string());
        let records = self.client.list(MENU, Some(&formula)).await?;

        let dishes: Vec<AvailableDish> = records.iter().filter_map(dish_from_record).collect();
        if dishes.len() < records.len() {
            warn!(
                skipped = records.len() - dishes.len(),
                "menu rows without dish id or meal type"
            );
        }
        Ok(dishes)
    }

    async fn find_dish(
        &self,
        dish_id: String,
        meal_type: String,
    ) -> Result<Option<AvailableDish>, CoreError> {
        let formula = Formula::And(vec![
            Formula::eq(fields::DISH_ID, dish_id),
            Formula::eq(fields::MEAL_TYPE, meal_type),
        ]);
        let records = self.client.list(MENU, Some(&formula)).await?;
        Ok(records.iter().find_map(dish_from_record))
    }
}

impl IngredientRepository for RecordStore {
    async fn find_by_ids(&self, ids: Vec<String>) -> Result<Vec<Ingredient>, CoreError> {
        let batches = ids.chunks(LOOKUP_BATCH_SIZE).map(|chunk| {
            let formula = Formula::any_record_id(chunk.iter().cloned());
            async move { self.client.list(INGREDIENTS, Some(&formula)).await }
        });

        let pages = try_join_all(batches).await.inspect_err(|e| {
            error!(count = ids.len(), error = %e, "ingredient batch lookup failed");
        })?;

        Ok(pages
            .iter()
            .flatten()
            .map(ingredient_from_record)
            .collect())
    }

    async fn search_by_name(&self, name: String) -> Result<Vec<Ingredient>, CoreError> {
        let formula = Formula::search(fields::NAME, name.trim());
        let records = self.client.list(INGREDIENTS, Some(&formula)).await?;
        Ok(records.iter().map(ingredient_from_record).collect())
    }
}

impl VariantRepository for RecordStore {
    async fn list_available(&self) -> Result<Vec<Variant>, CoreError> {
        let formula = Formula::Truthy(fields::AVAILABLE.to_string());
        let records = self.client.list(VARIANTS, Some(&formula)).await?;
        Ok(records.iter().map(variant_from_record).collect())
    }
}
