use std::sync::Arc;

use crate::domain::{
    common::PlanSettings,
    customer::ports::CustomerRepository,
    ingredient::{cache::IngredientCatalog, ports::IngredientRepository},
    menu::ports::MenuRepository,
    order::ports::OrderLineRepository,
    variant::{cache::VariantCatalog, ports::VariantRepository},
};

/// Application service wired to one set of store adapters.
///
/// The ingredient and variant caches live as long as the service and are shared by
/// every clone.
pub struct Service<C, O, M, I, V>
where
    C: CustomerRepository,
    O: OrderLineRepository,
    M: MenuRepository,
    I: IngredientRepository,
    V: VariantRepository,
{
    pub(crate) customer_repository: Arc<C>,
    pub(crate) order_line_repository: Arc<O>,
    pub(crate) menu_repository: Arc<M>,
    pub(crate) ingredient_repository: Arc<I>,
    pub(crate) variant_repository: Arc<V>,
    pub(crate) ingredient_catalog: Arc<IngredientCatalog>,
    pub(crate) variant_catalog: Arc<VariantCatalog>,
    pub(crate) settings: PlanSettings,
}

impl<C, O, M, I, V> Clone for Service<C, O, M, I, V>
where
    C: CustomerRepository,
    O: OrderLineRepository,
    M: MenuRepository,
    I: IngredientRepository,
    V: VariantRepository,
{
    fn clone(&self) -> Self {
        Self {
            customer_repository: Arc::clone(&self.customer_repository),
            order_line_repository: Arc::clone(&self.order_line_repository),
            menu_repository: Arc::clone(&self.menu_repository),
            ingredient_repository: Arc::clone(&self.ingredient_repository),
            variant_repository: Arc::clone(&self.variant_repository),
            ingredient_catalog: Arc::clone(&self.ingredient_catalog),
            variant_catalog: Arc::clone(&self.variant_catalog),
            settings: self.settings.clone(),
        }
    }
}

impl<C, O, M, I, V> Service<C, O, M, I, V>
where
    C: CustomerRepository,
    O: OrderLineRepository,
    M: MenuRepository,
    I: IngredientRepository,
    V: VariantRepository,
{
    pub fn new(
        customer_repository: C,
        order_line_repository: O,
        menu_repository: M,
        ingredient_repository: I,
        variant_repository: V,
        settings: PlanSettings,
    ) -> Self {
        Self {
            customer_repository: Arc::new(customer_repository),
            order_line_repository: Arc::new(order_line_repository),
            menu_repository: Arc::new(menu_repository),
            ingredient_repository: Arc::new(ingredient_repository),
            variant_repository: Arc::new(variant_repository),
            ingredient_catalog: Arc::new(IngredientCatalog::new()),
            variant_catalog: Arc::new(VariantCatalog::new()),
            settings,
        }
    }

    pub fn settings(&self) -> &PlanSettings {
        &self.settings
    }
}
