use crate::{
    domain::{
        common::entities::app_errors::CoreError,
        customer::{entities::Customer, ports::CustomerRepository},
        ingredient::{entities::Ingredient, ports::IngredientRepository},
        menu::{entities::AvailableDish, ports::MenuRepository},
        order::{
            entities::{IngredientUpdate, LineGroupKey, NewOrderLine, OrderLine},
            ports::OrderLineRepository,
        },
        variant::{entities::Variant, ports::VariantRepository},
    },
    infrastructure::{memory::InMemoryRecordStore, record_store::RecordStore},
};

/// The store the service runs against, chosen at startup.
#[derive(Debug, Clone)]
pub enum RecordBackend {
    Remote(RecordStore),
    Memory(InMemoryRecordStore),
}

impl CustomerRepository for RecordBackend {
    async fn find_by_token(&self, token: String) -> Result<Option<Customer>, CoreError> {
        match self {
            RecordBackend::Remote(store) => store.find_by_token(token).await,
            RecordBackend::Memory(store) => store.find_by_token(token).await,
        }
    }
}

impl OrderLineRepository for RecordBackend {
    async fn list_by_customer(&self, customer_token: String) -> Result<Vec<OrderLine>, CoreError> {
        match self {
            RecordBackend::Remote(store) => store.list_by_customer(customer_token).await,
            RecordBackend::Memory(store) => store.list_by_customer(customer_token).await,
        }
    }

    async fn get_by_id(&self, line_id: String) -> Result<Option<OrderLine>, CoreError> {
        match self {
            RecordBackend::Remote(store) => store.get_by_id(line_id).await,
            RecordBackend::Memory(store) => store.get_by_id(line_id).await,
        }
    }

    async fn list_group(&self, key: LineGroupKey) -> Result<Vec<OrderLine>, CoreError> {
        match self {
            RecordBackend::Remote(store) => store.list_group(key).await,
            RecordBackend::Memory(store) => store.list_group(key).await,
        }
    }

    async fn create_lines(&self, lines: Vec<NewOrderLine>) -> Result<Vec<OrderLine>, CoreError> {
        match self {
            RecordBackend::Remote(store) => store.create_lines(lines).await,
            RecordBackend::Memory(store) => store.create_lines(lines).await,
        }
    }

    async fn update_ingredients(&self, update: IngredientUpdate) -> Result<OrderLine, CoreError> {
        match self {
            RecordBackend::Remote(store) => store.update_ingredients(update).await,
            RecordBackend::Memory(store) => store.update_ingredients(update).await,
        }
    }

    async fn delete_lines(&self, line_ids: Vec<String>) -> Result<(), CoreError> {
        match self {
            RecordBackend::Remote(store) => store.delete_lines(line_ids).await,
            RecordBackend::Memory(store) => store.delete_lines(line_ids).await,
        }
    }
}

impl MenuRepository for RecordBackend {
    async fn list_available(&self) -> Result<Vec<AvailableDish>, CoreError> {
        match self {
            RecordBackend::Remote(store) => MenuRepository::list_available(store).await,
            RecordBackend::Memory(store) => MenuRepository::list_available(store).await,
        }
    }

    async fn find_dish(
        &self,
        dish_id: String,
        meal_type: String,
    ) -> Result<Option<AvailableDish>, CoreError> {
        match self {
            RecordBackend::Remote(store) => store.find_dish(dish_id, meal_type).await,
            RecordBackend::Memory(store) => store.find_dish(dish_id, meal_type).await,
        }
    }
}

impl IngredientRepository for RecordBackend {
    async fn find_by_ids(&self, ids: Vec<String>) -> Result<Vec<Ingredient>, CoreError> {
        match self {
            RecordBackend::Remote(store) => store.find_by_ids(ids).await,
            RecordBackend::Memory(store) => store.find_by_ids(ids).await,
        }
    }

    async fn search_by_name(&self, name: String) -> Result<Vec<Ingredient>, CoreError> {
        match self {
            RecordBackend::Remote(store) => store.search_by_name(name).await,
            RecordBackend::Memory(store) => store.search_by_name(name).await,
        }
    }
}

impl VariantRepository for RecordBackend {
    async fn list_available(&self) -> Result<Vec<Variant>, CoreError> {
        match self {
            RecordBackend::Remote(store) => VariantRepository::list_available(store).await,
            RecordBackend::Memory(store) => VariantRepository::list_available(store).await,
        }
    }
}
