use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::{
    common::{entities::app_errors::CoreError, services::Service},
    customer::{entities::Customer, ports::CustomerRepository},
    customization::{
        customizer::Customizer,
        edits::{IngredientEdit, ToggleSection, apply_edit, match_ingredient_by_name},
        protein::{current_protein, protein_candidate_ids},
    },
    ingredient::{
        cache::IngredientLookup,
        entities::{Component, Ingredient},
        ports::IngredientRepository,
    },
    meal_plan::{
        aggregator::{build_plan, ordered_dish},
        entities::{PlanDish, PlanView},
        ports::MealPlanService,
        value_objects::{
            AddDishInput, EditIngredientsInput, EditIntent, IngredientTarget, MutationOutcome,
            UpdateQuantityInput,
        },
    },
    menu::{entities::AvailableDish, ports::MenuRepository},
    order::{
        entities::{IngredientUpdate, LineGroupKey, NewOrderLine, OrderLine, audit_entry},
        ports::OrderLineRepository,
        quantity::{QuantityPlan, next_item_id, plan_quantity, validate_quantity},
    },
    variant::{
        entities::{STARCH_SUBSTITUTION, VEGGIE_SUBSTITUTION, Variant, group_of},
        ports::VariantRepository,
    },
};

impl<C, O, M, I, V> Service<C, O, M, I, V>
where
    C: CustomerRepository,
    O: OrderLineRepository,
    M: MenuRepository,
    I: IngredientRepository,
    V: VariantRepository,
{
    async fn customer_by_token(&self, customer_token: &str) -> Result<Customer, CoreError> {
        self.customer_repository
            .find_by_token(customer_token.to_string())
            .await?
            .ok_or(CoreError::CustomerNotFound)
    }

    /// Loads a line, hiding lines that belong to another customer.
    async fn owned_line(&self, customer: &Customer, line_id: &str) -> Result<OrderLine, CoreError> {
        if line_id.trim().is_empty() {
            return Err(CoreError::Invalid("line id is required".to_string()));
        }

        self.order_line_repository
            .get_by_id(line_id.to_string())
            .await?
            .filter(|line| line.customer_token == customer.token)
            .ok_or(CoreError::OrderLineNotFound)
    }

    async fn active_line(&self, customer: &Customer, line_id: &str) -> Result<OrderLine, CoreError> {
        let line = self.owned_line(customer, line_id).await?;
        if !line.is_active() {
            return Err(CoreError::OrderLineNotFound);
        }
        Ok(line)
    }

    async fn resolve_ingredients(&self, ids: &[String]) -> IngredientLookup {
        self.ingredient_catalog
            .resolve(self.ingredient_repository.as_ref(), ids)
            .await
    }

    /// Resolves every id the options of `lines` and `menu` can display.
    ///
    /// Protein candidates depend on the classification of the current proteins,
    /// so they are resolved in a second pass.
    async fn plan_lookup(
        &self,
        lines: &[OrderLine],
        menu: &[AvailableDish],
        variants: &[Variant],
    ) -> IngredientLookup {
        let meal_types: HashSet<&str> = lines
            .iter()
            .map(|line| line.meal_type.as_str())
            .chain(menu.iter().map(|dish| dish.meal_type.as_str()))
            .collect();

        let mut ids: Vec<String> = lines
            .iter()
            .flat_map(|line| {
                line.original_ingredient_ids
                    .iter()
                    .chain(&line.final_ingredient_ids)
            })
            .chain(menu.iter().flat_map(|dish| &dish.ingredient_ids))
            .chain(&self.settings.standard_sauce_ids)
            .cloned()
            .collect();
        ids.extend(
            variants
                .iter()
                .filter(|variant| {
                    variant.variant_type == STARCH_SUBSTITUTION
                        || variant.variant_type == VEGGIE_SUBSTITUTION
                })
                .filter(|variant| meal_types.iter().any(|meal| variant.applies_to(meal)))
                .flat_map(|variant| variant.member_ingredient_ids.iter().cloned()),
        );

        let mut lookup = self.resolve_ingredients(&ids).await;

        let states = lines
            .iter()
            .map(|line| (line.effective_ingredient_ids(), line.meal_type.as_str()))
            .chain(
                menu.iter()
                    .map(|dish| (dish.ingredient_ids.as_slice(), dish.meal_type.as_str())),
            );
        let mut seen = HashSet::new();
        let mut protein_ids = Vec::new();
        for (effective, meal_type) in states {
            let Some(protein_id) = current_protein(effective, &lookup) else {
                continue;
            };
            if !seen.insert((protein_id, meal_type)) {
                continue;
            }
            protein_ids.extend(
                protein_candidate_ids(protein_id, meal_type, variants)
                    .into_iter()
                    .filter(|id| lookup.name(id).is_none()),
            );
        }

        if !protein_ids.is_empty() {
            let extra = self.resolve_ingredients(&protein_ids).await;
            lookup.extend(extra);
        }

        lookup
    }

    async fn available_menu(&self) -> Vec<AvailableDish> {
        match self.menu_repository.list_available().await {
            Ok(menu) => menu,
            Err(e) => {
                warn!(error = %e, "menu fetch failed, offering no available dishes");
                Vec::new()
            }
        }
    }

    /// Turns a customization request into a concrete edit of the line's ingredient list.
    async fn resolve_edit(
        &self,
        line: &OrderLine,
        intent: &EditIntent,
        lookup: &mut IngredientLookup,
    ) -> Result<IngredientEdit, CoreError> {
        let edit = match intent {
            EditIntent::ToggleVeggie {
                ingredient_id,
                active,
            } => IngredientEdit::Toggle {
                section: ToggleSection::Veggie,
                ingredient_id: required_id(ingredient_id)?,
                active: *active,
            },
            EditIntent::ToggleGarnish {
                ingredient_id,
                active,
            } => IngredientEdit::Toggle {
                section: ToggleSection::Garnish,
                ingredient_id: required_id(ingredient_id)?,
                active: *active,
            },
            EditIntent::ReplaceSauce { ingredient_id } => IngredientEdit::ReplaceSauce {
                new_id: ingredient_id
                    .as_deref()
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string),
            },
            EditIntent::ReplaceStarch { ingredient_id } => IngredientEdit::ReplaceStarch {
                new_id: required_id(ingredient_id)?,
            },
            EditIntent::ReplaceProtein { old_id, new_id } => {
                let new_id = required_id(new_id)?;
                let old_id = old_id
                    .as_deref()
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string);
                if let Some(old_id) = &old_id {
                    if !line.effective_ingredient_ids().contains(old_id) {
                        return Err(CoreError::IngredientNotFound(old_id.clone()));
                    }
                }
                self.ensure_protein_option(line, old_id.as_deref(), &new_id, lookup)
                    .await?;
                IngredientEdit::ReplaceProtein {
                    old_id,
                    new_id,
                }
            }
            EditIntent::ToggleIngredient { target, active } => IngredientEdit::Toggle {
                section: ToggleSection::Ingredient,
                ingredient_id: self.toggle_target(line, target, *active, lookup).await?,
                active: *active,
            },
            EditIntent::DeleteIngredient { target } => IngredientEdit::Remove {
                ingredient_id: delete_target(line, target, lookup)?,
            },
        };

        Ok(edit)
    }

    async fn ensure_protein_option(
        &self,
        line: &OrderLine,
        old_id: Option<&str>,
        new_id: &str,
        lookup: &IngredientLookup,
    ) -> Result<(), CoreError> {
        let current = old_id
            .filter(|id| !id.trim().is_empty())
            .or_else(|| current_protein(line.effective_ingredient_ids(), lookup));
        let Some(current) = current else {
            return Ok(());
        };

        let variants = self
            .variant_catalog
            .all(self.variant_repository.as_ref())
            .await;
        if group_of(&variants, current).is_none() {
            return Ok(());
        }

        let eligible = protein_candidate_ids(current, &line.meal_type, &variants);
        if eligible.iter().any(|id| id == new_id) {
            Ok(())
        } else {
            Err(CoreError::Invalid(format!(
                "{} is not a protein option for this dish",
                lookup.name_or_id(new_id)
            )))
        }
    }

    async fn toggle_target(
        &self,
        line: &OrderLine,
        target: &IngredientTarget,
        active: bool,
        lookup: &mut IngredientLookup,
    ) -> Result<String, CoreError> {
        let name = match target {
            IngredientTarget::Id(id) => return required_id(id),
            IngredientTarget::Name(name) => name,
        };

        let on_line: Vec<String> = line
            .effective_ingredient_ids()
            .iter()
            .chain(&line.original_ingredient_ids)
            .cloned()
            .collect();
        let candidates = named_candidates(&on_line, lookup);

        match match_ingredient_by_name(name, &candidates) {
            Ok(found) => Ok(found.id.clone()),
            Err(CoreError::IngredientNotFound(_)) if active => {
                let found = self
                    .ingredient_repository
                    .search_by_name(name.clone())
                    .await?;
                let matched = match_ingredient_by_name(name, &found)?.clone();
                debug!(ingredient_id = %matched.id, "ingredient found in store by name");
                lookup.insert(&matched);
                self.ingredient_catalog.remember(found).await;
                Ok(matched.id)
            }
            Err(e) => Err(e),
        }
    }

    async fn customer_and_group(
        &self,
        customer_token: &str,
        line_id: &str,
    ) -> Result<(OrderLine, Vec<OrderLine>), CoreError> {
        let customer = self.customer_by_token(customer_token).await?;
        let line = self.active_line(&customer, line_id).await?;
        let group = self
            .order_line_repository
            .list_group(line.group_key())
            .await?;
        Ok((line, group))
    }
}

fn required_id(id: &str) -> Result<String, CoreError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(CoreError::Invalid("ingredient id is required".to_string()));
    }
    Ok(id.to_string())
}

fn named_candidates(ids: &[String], lookup: &IngredientLookup) -> Vec<Ingredient> {
    let mut seen = HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .filter_map(|id| {
            lookup
                .name(id)
                .map(|name| Ingredient::new(id.clone(), name, lookup.component(id)))
        })
        .collect()
}

/// Deletes only consider what is currently on the line.
fn delete_target(
    line: &OrderLine,
    target: &IngredientTarget,
    lookup: &IngredientLookup,
) -> Result<String, CoreError> {
    let effective = line.effective_ingredient_ids();
    match target {
        IngredientTarget::Id(id) => {
            let id = required_id(id)?;
            if effective.contains(&id) {
                Ok(id)
            } else {
                Err(CoreError::IngredientNotFound(id))
            }
        }
        IngredientTarget::Name(name) => {
            let candidates = named_candidates(effective, lookup);
            Ok(match_ingredient_by_name(name, &candidates)?.id.clone())
        }
    }
}

/// Active lines of the reference's group, reference first.
fn group_members(reference: &OrderLine, group: Vec<OrderLine>) -> Vec<OrderLine> {
    let key = reference.group_key();
    let mut members = vec![reference.clone()];
    members.extend(
        group
            .into_iter()
            .filter(|line| line.id != reference.id && line.is_active() && line.belongs_to(&key)),
    );
    members
}

fn line_ids(lines: &[OrderLine]) -> Vec<String> {
    lines.iter().map(|line| line.id.clone()).collect()
}

impl<C, O, M, I, V> MealPlanService for Service<C, O, M, I, V>
where
    C: CustomerRepository,
    O: OrderLineRepository,
    M: MenuRepository,
    I: IngredientRepository,
    V: VariantRepository,
{
    #[instrument(skip(self))]
    async fn get_plan(&self, customer_token: String) -> Result<PlanView, CoreError> {
        let customer = self.customer_by_token(&customer_token).await?;

        let lines: Vec<OrderLine> = self
            .order_line_repository
            .list_by_customer(customer.token.clone())
            .await?
            .into_iter()
            .filter(OrderLine::is_active)
            .collect();
        let menu = self.available_menu().await;
        let variants = self
            .variant_catalog
            .all(self.variant_repository.as_ref())
            .await;

        let lookup = self.plan_lookup(&lines, &menu, &variants).await;
        let mut customizer =
            Customizer::new(&lookup, &variants, &self.settings.standard_sauce_ids);
        let plan = build_plan(&customer.token, &lines, &menu, &mut customizer);

        debug!(
            lines = lines.len(),
            days = plan.days.len(),
            signatures = customizer.memoized(),
            "plan built"
        );

        Ok(plan)
    }

    #[instrument(skip(self))]
    async fn get_line_options(
        &self,
        customer_token: String,
        line_id: String,
    ) -> Result<PlanDish, CoreError> {
        let (line, group) = self.customer_and_group(&customer_token, &line_id).await?;
        let members = group_members(&line, group);

        let menu: Vec<AvailableDish> = match self
            .menu_repository
            .find_dish(line.dish_id.clone(), line.meal_type.clone())
            .await
        {
            Ok(dish) => dish.into_iter().collect(),
            Err(e) => {
                warn!(error = %e, dish_id = %line.dish_id, "menu lookup failed");
                Vec::new()
            }
        };
        let variants = self
            .variant_catalog
            .all(self.variant_repository.as_ref())
            .await;

        let lookup = self.plan_lookup(&members, &menu, &variants).await;
        let mut customizer =
            Customizer::new(&lookup, &variants, &self.settings.standard_sauce_ids);
        let refs: Vec<&OrderLine> = members.iter().collect();

        Ok(ordered_dish(&refs, &menu, &mut customizer))
    }

    #[instrument(skip(self))]
    async fn update_quantity(
        &self,
        customer_token: String,
        input: UpdateQuantityInput,
    ) -> Result<MutationOutcome, CoreError> {
        let target = validate_quantity(input.quantity, self.settings.max_quantity)?;
        let (line, group) = self
            .customer_and_group(&customer_token, &input.line_id)
            .await?;
        let members = group_members(&line, group);

        match plan_quantity(&line, &members, target, Utc::now()) {
            QuantityPlan::Unchanged { quantity } => {
                debug!(quantity, "quantity already at target");
                Ok(MutationOutcome::ok(
                    format!("Quantity unchanged at {quantity}"),
                    line_ids(&members),
                ))
            }
            QuantityPlan::Create { from, to, lines } => {
                let requested = lines.len();
                let created = self
                    .order_line_repository
                    .create_lines(lines)
                    .await
                    .inspect_err(|e| error!(error = %e, "failed to create serving lines"))?;
                if created.len() < requested {
                    warn!(
                        requested,
                        created = created.len(),
                        "some serving lines already existed"
                    );
                    return Err(CoreError::IncompleteQuantityUpdate {
                        requested,
                        created: created.len(),
                    });
                }
                info!(from, to, "quantity increased");

                let mut ids = line_ids(&members);
                ids.extend(line_ids(&created));
                Ok(MutationOutcome::ok(
                    format!("Quantity updated from {from} to {to}"),
                    ids,
                ))
            }
            QuantityPlan::Delete { from, to, line_ids: deleted } => {
                self.order_line_repository
                    .delete_lines(deleted.clone())
                    .await
                    .inspect_err(|e| error!(error = %e, "failed to delete serving lines"))?;
                info!(from, to, deleted = deleted.len(), "quantity decreased");

                let remaining = members
                    .iter()
                    .filter(|line| !deleted.contains(&line.id))
                    .map(|line| line.id.clone())
                    .collect();
                Ok(MutationOutcome::ok(
                    format!("Quantity updated from {from} to {to}"),
                    remaining,
                ))
            }
        }
    }

    #[instrument(skip(self))]
    async fn edit_ingredients(
        &self,
        customer_token: String,
        input: EditIngredientsInput,
    ) -> Result<MutationOutcome, CoreError> {
        let customer = self.customer_by_token(&customer_token).await?;
        let line = self.active_line(&customer, &input.line_id).await?;

        if let Some(expected) = input.expected_revision {
            if expected != line.revision {
                return Err(CoreError::StaleRevision {
                    expected,
                    actual: line.revision,
                });
            }
        }

        let effective = line.effective_ingredient_ids().to_vec();
        let mut ids: Vec<String> = effective
            .iter()
            .chain(&line.original_ingredient_ids)
            .cloned()
            .collect();
        ids.extend(intent_ids(&input.intent));
        let mut lookup = self.resolve_ingredients(&ids).await;

        lookup.classify_missing(&self.settings.standard_sauce_ids, Component::Sauce);

        let edit = self.resolve_edit(&line, &input.intent, &mut lookup).await?;
        let outcome = apply_edit(&effective, &lookup, &edit, Utc::now());

        if !outcome.changed {
            debug!("edit left the ingredient list unchanged");
            return Ok(
                MutationOutcome::ok("No changes", outcome.ingredient_ids)
                    .with_revision(line.revision),
            );
        }

        let protein_id = match &edit {
            IngredientEdit::ReplaceProtein { new_id, .. } => Some(new_id.clone()),
            _ => line
                .protein_id
                .clone()
                .filter(|id| outcome.ingredient_ids.contains(id)),
        };

        let updated = self
            .order_line_repository
            .update_ingredients(IngredientUpdate {
                line_id: line.id.clone(),
                final_ingredient_ids: outcome.ingredient_ids,
                protein_id,
                audit_entry: outcome.audit_entry,
                expected_revision: line.revision,
            })
            .await
            .inspect_err(|e| error!(error = %e, "failed to write ingredient override"))?;

        info!(revision = updated.revision, "ingredients updated");

        Ok(MutationOutcome::ok(
            "Ingredients updated",
            updated.effective_ingredient_ids().to_vec(),
        )
        .with_revision(updated.revision))
    }

    #[instrument(skip(self))]
    async fn add_dish(
        &self,
        customer_token: String,
        input: AddDishInput,
    ) -> Result<MutationOutcome, CoreError> {
        if input.dish_id.trim().is_empty() || input.meal_type.trim().is_empty() {
            return Err(CoreError::Invalid(
                "dish id and meal type are required".to_string(),
            ));
        }

        let customer = self.customer_by_token(&customer_token).await?;
        let lines = self
            .order_line_repository
            .list_by_customer(customer.token.clone())
            .await?;

        let same_dish =
            |line: &&OrderLine| line.dish_id == input.dish_id && line.meal_type == input.meal_type;

        if lines
            .iter()
            .filter(same_dish)
            .any(|line| line.is_active() && line.delivery_date == input.delivery_date)
        {
            return Err(CoreError::DishAlreadyOrdered);
        }

        let stale: Vec<String> = lines
            .iter()
            .filter(same_dish)
            .filter(|line| !line.is_active())
            .map(|line| line.id.clone())
            .collect();
        if !stale.is_empty() {
            info!(count = stale.len(), "purging stale lines before adding dish");
            self.order_line_repository
                .delete_lines(stale.clone())
                .await?;
        }

        let dish = self
            .menu_repository
            .find_dish(input.dish_id.clone(), input.meal_type.clone())
            .await?
            .ok_or_else(|| CoreError::DishNotFound(input.dish_id.clone()))?;

        let item_id = next_item_id(
            lines
                .iter()
                .filter(|line| line.meal_type == dish.meal_type && !stale.contains(&line.id))
                .map(|line| line.item_id.as_str()),
            &dish.meal_type,
        );

        let lookup = self.resolve_ingredients(&dish.ingredient_ids).await;
        let protein_id = current_protein(&dish.ingredient_ids, &lookup).map(str::to_string);

        let key = LineGroupKey {
            customer_token: customer.token.clone(),
            dish_id: dish.dish_id.clone(),
            meal_type: dish.meal_type.clone(),
            delivery_date: input.delivery_date,
        };

        let new_line = NewOrderLine {
            customer_token: customer.token.clone(),
            subscription_id: customer.subscription_id.clone(),
            item_id,
            item_name: dish.name.clone(),
            dish_id: dish.dish_id.clone(),
            meal_type: dish.meal_type.clone(),
            delivery_date: input.delivery_date,
            quantity: Some(1),
            protein_id,
            original_ingredient_ids: dish.ingredient_ids.clone(),
            final_ingredient_ids: dish.ingredient_ids.clone(),
            audit_log: audit_entry(Utc::now(), &format!("Dish {} added", dish.name)),
            nutrition: dish.nutrition,
            image_url: dish.image_url.clone(),
            line_key: Some(key.line_key(1)),
        };

        let created = self
            .order_line_repository
            .create_lines(vec![new_line])
            .await
            .inspect_err(|e| error!(error = %e, "failed to create order line"))?;

        // the store skips a line key that already exists
        let Some(line) = created.into_iter().next() else {
            return Err(CoreError::DishAlreadyOrdered);
        };

        info!(line_id = %line.id, item_id = %line.item_id, "dish added");

        Ok(
            MutationOutcome::ok(format!("{} added", dish.name), vec![line.id])
                .with_revision(line.revision),
        )
    }
}

fn intent_ids(intent: &EditIntent) -> Vec<String> {
    match intent {
        EditIntent::ToggleVeggie { ingredient_id, .. }
        | EditIntent::ToggleGarnish { ingredient_id, .. }
        | EditIntent::ReplaceStarch { ingredient_id } => vec![ingredient_id.clone()],
        EditIntent::ReplaceSauce { ingredient_id } => ingredient_id.iter().cloned().collect(),
        EditIntent::ReplaceProtein { old_id, new_id } => {
            old_id.iter().cloned().chain([new_id.clone()]).collect()
        }
        EditIntent::ToggleIngredient {
            target: IngredientTarget::Id(id),
            ..
        }
        | EditIntent::DeleteIngredient {
            target: IngredientTarget::Id(id),
        } => vec![id.clone()],
        EditIntent::ToggleIngredient { .. } | EditIntent::DeleteIngredient { .. } => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            common::PlanSettings,
            ingredient::entities::Component,
            menu::{entities::Nutrition, ports::MockMenuRepository},
            order::ports::MockOrderLineRepository,
        },
        infrastructure::memory::InMemoryRecordStore,
    };
    use chrono::NaiveDate;

    type MemoryService = Service<
        InMemoryRecordStore,
        InMemoryRecordStore,
        InMemoryRecordStore,
        InMemoryRecordStore,
        InMemoryRecordStore,
    >;

    const TOKEN: &str = "tok-1";

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn monday() -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2025, 3, 17)
    }

    fn dish(dish_id: &str, name: &str, ingredients: &[&str]) -> AvailableDish {
        AvailableDish {
            dish_id: dish_id.to_string(),
            meal_type: "Lunch".to_string(),
            name: name.to_string(),
            ingredient_ids: ids(ingredients),
            image_url: None,
            nutrition: Nutrition {
                calories: 500.0,
                ..Nutrition::default()
            },
        }
    }

    async fn seeded_store() -> InMemoryRecordStore {
        let store = InMemoryRecordStore::new();
        store
            .insert_customer(Customer {
                id: "cus-1".to_string(),
                token: TOKEN.to_string(),
                name: "Ada".to_string(),
                subscription_id: Some("sub-1".to_string()),
            })
            .await;
        store
            .insert_ingredients(vec![
                Ingredient::new("chicken", "Chicken", Some(Component::Meat)),
                Ingredient::new("turkey", "Turkey", Some(Component::Meat)),
                Ingredient::new("tofu", "Tofu", Some(Component::Meat)),
                Ingredient::new("salmon", "Salmon", Some(Component::Meat)),
                Ingredient::new("teriyaki", "Teriyaki", Some(Component::Sauce)),
                Ingredient::new("rice", "Rice", Some(Component::Starch)),
                Ingredient::new("quinoa", "Quinoa", Some(Component::Starch)),
                Ingredient::new("cilantro", "Cilantro", Some(Component::Garnish)),
                Ingredient::new("broccoli", "Broccoli", Some(Component::Veggies)),
                Ingredient::new("red-pepper", "Red Pepper", Some(Component::Veggies)),
                Ingredient::new("pepper-jack", "Pepper Jack", None),
            ])
            .await;
        store
            .insert_dish(dish(
                "bowl",
                "Teriyaki Bowl",
                &["chicken", "teriyaki", "rice", "cilantro", "broccoli"],
            ))
            .await;
        store
            .insert_dish(dish("wrap", "Tofu Wrap", &["tofu", "pepper-jack", "red-pepper"]))
            .await;
        store
            .insert_variant(Variant {
                id: "var-poultry".to_string(),
                variant_type: "Poultry".to_string(),
                applicable_meal_types: ids(&["Lunch"]),
                member_ingredient_ids: ids(&["chicken", "turkey"]),
                display_name: "Classic".to_string(),
                price: 0.0,
            })
            .await;
        store
    }

    fn service(store: &InMemoryRecordStore) -> MemoryService {
        Service::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            PlanSettings::default(),
        )
    }

    async fn add(service: &MemoryService, dish_id: &str) -> String {
        let outcome = service
            .add_dish(
                TOKEN.to_string(),
                AddDishInput {
                    dish_id: dish_id.to_string(),
                    meal_type: "Lunch".to_string(),
                    delivery_date: monday(),
                },
            )
            .await
            .unwrap();
        outcome.ids[0].clone()
    }

    async fn edit(
        service: &MemoryService,
        line_id: &str,
        intent: EditIntent,
    ) -> Result<MutationOutcome, CoreError> {
        service
            .edit_ingredients(
                TOKEN.to_string(),
                EditIngredientsInput {
                    line_id: line_id.to_string(),
                    intent,
                    expected_revision: None,
                },
            )
            .await
    }

    async fn set_quantity(service: &MemoryService, line_id: &str, quantity: i64) -> MutationOutcome {
        service
            .update_quantity(
                TOKEN.to_string(),
                UpdateQuantityInput {
                    line_id: line_id.to_string(),
                    quantity,
                },
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_added_dish_appears_ordered_in_plan() {
        let store = seeded_store().await;
        let service = service(&store);

        let line_id = add(&service, "bowl").await;
        let plan = service.get_plan(TOKEN.to_string()).await.unwrap();

        assert!(plan.has_orders);
        let day = plan.day(monday()).unwrap();
        let ordered: Vec<&PlanDish> = day.ordered().collect();
        assert_eq!(ordered.len(), 1);
        assert_eq!(ordered[0].line_id.as_deref(), Some(line_id.as_str()));
        assert_eq!(ordered[0].quantity, 1);
        assert_eq!(ordered[0].item_id.as_deref(), Some("LUNCH-01"));
        assert_eq!(
            ordered[0].ingredient_ids,
            ids(&["chicken", "teriyaki", "rice", "cilantro", "broccoli"])
        );
        assert_eq!(ordered[0].protein.options.len(), 2);

        let available: Vec<&str> = day.available().map(|d| d.dish_id.as_str()).collect();
        assert_eq!(available, vec!["wrap"]);
    }

    #[tokio::test]
    async fn test_plan_without_orders_lists_menu() {
        let store = seeded_store().await;
        let plan = service(&store).get_plan(TOKEN.to_string()).await.unwrap();

        assert!(!plan.has_orders);
        assert_eq!(plan.days.len(), 1);
        assert_eq!(plan.days[0].dishes.len(), 2);
        assert_eq!(plan.days[0].nutrition.calories, 1000.0);
    }

    #[tokio::test]
    async fn test_unknown_customer_is_not_found() {
        let store = seeded_store().await;
        let result = service(&store).get_plan("nobody".to_string()).await;
        assert_eq!(result.unwrap_err(), CoreError::CustomerNotFound);
    }

    #[tokio::test]
    async fn test_adding_same_dish_twice_conflicts() {
        let store = seeded_store().await;
        let service = service(&store);
        add(&service, "bowl").await;

        let result = service
            .add_dish(
                TOKEN.to_string(),
                AddDishInput {
                    dish_id: "bowl".to_string(),
                    meal_type: "Lunch".to_string(),
                    delivery_date: monday(),
                },
            )
            .await;
        assert_eq!(result.unwrap_err(), CoreError::DishAlreadyOrdered);
    }

    #[tokio::test]
    async fn test_add_unknown_dish() {
        let store = seeded_store().await;
        let result = service(&store)
            .add_dish(
                TOKEN.to_string(),
                AddDishInput {
                    dish_id: "soup".to_string(),
                    meal_type: "Lunch".to_string(),
                    delivery_date: monday(),
                },
            )
            .await;
        assert_eq!(result.unwrap_err(), CoreError::DishNotFound("soup".to_string()));
    }

    #[tokio::test]
    async fn test_add_dish_continues_item_numbering() {
        let store = seeded_store().await;
        let service = service(&store);
        add(&service, "bowl").await;
        let second = add(&service, "wrap").await;

        let line = store.line(&second).await.unwrap();
        assert_eq!(line.item_id, "LUNCH-02");
        assert_eq!(line.protein_id.as_deref(), Some("tofu"));
    }

    #[tokio::test]
    async fn test_quantity_up_down_and_to_zero() {
        let store = seeded_store().await;
        let service = service(&store);
        let line_id = add(&service, "bowl").await;

        let outcome = set_quantity(&service, &line_id, 3).await;
        assert_eq!(outcome.ids.len(), 3);
        assert_eq!(store.active_lines(TOKEN).await.len(), 3);

        let outcome = set_quantity(&service, &line_id, 1).await;
        assert_eq!(outcome.ids, vec![line_id.clone()]);
        assert_eq!(store.active_lines(TOKEN).await.len(), 1);

        let outcome = set_quantity(&service, &line_id, 1).await;
        assert_eq!(outcome.message, "Quantity unchanged at 1");

        let outcome = set_quantity(&service, &line_id, 0).await;
        assert!(outcome.ids.is_empty());
        assert!(store.active_lines(TOKEN).await.is_empty());

        let plan = service.get_plan(TOKEN.to_string()).await.unwrap();
        assert!(!plan.has_orders);
    }

    #[tokio::test]
    async fn test_quantity_grows_past_stale_line_keys() {
        let store = seeded_store().await;
        let service = service(&store);
        let line_id = add(&service, "bowl").await;
        let line = store.line(&line_id).await.unwrap();
        store
            .insert_line(NewOrderLine {
                quantity: Some(0),
                ..NewOrderLine::copy_of(&line, line.group_key().line_key(2), "Serving removed")
            })
            .await;

        let outcome = set_quantity(&service, &line_id, 3).await;

        assert_eq!(outcome.message, "Quantity updated from 1 to 3");
        assert_eq!(outcome.ids.len(), 3);
        assert_eq!(store.active_lines(TOKEN).await.len(), 3);
    }

    #[tokio::test]
    async fn test_quantity_reports_servings_the_store_did_not_create() {
        let store = seeded_store().await;
        let line_id = add(&service(&store), "bowl").await;
        let line = store.line(&line_id).await.unwrap();

        let mut orders = MockOrderLineRepository::new();
        let found = line.clone();
        orders.expect_get_by_id().returning(move |_| {
            let found = found.clone();
            Box::pin(async move { Ok(Some(found)) })
        });
        let group = vec![line];
        orders.expect_list_group().returning(move |_| {
            let group = group.clone();
            Box::pin(async move { Ok(group) })
        });
        orders
            .expect_create_lines()
            .times(1)
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));
        let service = Service::new(
            store.clone(),
            orders,
            store.clone(),
            store.clone(),
            store.clone(),
            PlanSettings::default(),
        );

        let result = service
            .update_quantity(
                TOKEN.to_string(),
                UpdateQuantityInput {
                    line_id,
                    quantity: 2,
                },
            )
            .await;

        assert_eq!(
            result.unwrap_err(),
            CoreError::IncompleteQuantityUpdate {
                requested: 1,
                created: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_cloned_service_shares_stores() {
        let store = seeded_store().await;
        let service = service(&store);
        let cloned = service.clone();

        add(&cloned, "bowl").await;

        let plan = service.get_plan(TOKEN.to_string()).await.unwrap();
        assert!(plan.has_orders);
    }

    #[tokio::test]
    async fn test_quantity_copies_customized_ingredients() {
        let store = seeded_store().await;
        let service = service(&store);
        let line_id = add(&service, "bowl").await;
        edit(
            &service,
            &line_id,
            EditIntent::ToggleGarnish {
                ingredient_id: "cilantro".to_string(),
                active: false,
            },
        )
        .await
        .unwrap();

        set_quantity(&service, &line_id, 2).await;
        let plan = service.get_plan(TOKEN.to_string()).await.unwrap();
        let bowl = plan.day(monday()).unwrap().ordered().next().unwrap();

        assert_eq!(bowl.quantity, 2);
        for line in store.active_lines(TOKEN).await {
            assert!(!line.effective_ingredient_ids().contains(&"cilantro".to_string()));
        }
    }

    #[tokio::test]
    async fn test_quantity_out_of_range_is_rejected() {
        let store = seeded_store().await;
        let service = service(&store);
        let line_id = add(&service, "bowl").await;

        let result = service
            .update_quantity(
                TOKEN.to_string(),
                UpdateQuantityInput {
                    line_id,
                    quantity: 21,
                },
            )
            .await;
        assert!(matches!(result, Err(CoreError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_replace_protein_within_group() {
        let store = seeded_store().await;
        let service = service(&store);
        let line_id = add(&service, "bowl").await;

        let outcome = edit(
            &service,
            &line_id,
            EditIntent::ReplaceProtein {
                old_id: None,
                new_id: "turkey".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(
            outcome.ids,
            ids(&["teriyaki", "rice", "cilantro", "broccoli", "turkey"])
        );
        assert_eq!(outcome.revision, Some(1));
        let line = store.line(&line_id).await.unwrap();
        assert_eq!(line.protein_id.as_deref(), Some("turkey"));
        assert!(line.audit_log.ends_with("Protein changed from Chicken to Turkey"));
    }

    #[tokio::test]
    async fn test_replace_protein_outside_group_is_rejected() {
        let store = seeded_store().await;
        let service = service(&store);
        let line_id = add(&service, "bowl").await;

        let result = edit(
            &service,
            &line_id,
            EditIntent::ReplaceProtein {
                old_id: None,
                new_id: "salmon".to_string(),
            },
        )
        .await;
        assert!(matches!(result, Err(CoreError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_replace_protein_rejects_old_id_not_on_line() {
        let store = seeded_store().await;
        let service = service(&store);
        let line_id = add(&service, "bowl").await;

        let result = edit(
            &service,
            &line_id,
            EditIntent::ReplaceProtein {
                old_id: Some("turkey".to_string()),
                new_id: "turkey".to_string(),
            },
        )
        .await;

        assert_eq!(
            result.unwrap_err(),
            CoreError::IngredientNotFound("turkey".to_string())
        );
        let line = store.line(&line_id).await.unwrap();
        assert_eq!(
            line.effective_ingredient_ids(),
            ids(&["chicken", "teriyaki", "rice", "cilantro", "broccoli"]).as_slice()
        );
    }

    fn active_sauces(dish: &PlanDish) -> Vec<String> {
        dish.options
            .sauce
            .iter()
            .filter(|o| o.is_active)
            .map(|o| o.name.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_unclassified_standard_sauce_is_replaced() {
        let store = seeded_store().await;
        store
            .insert_ingredients(vec![Ingredient::new("house", "House Sauce", None)])
            .await;
        store
            .insert_dish(dish("plate", "House Plate", &["chicken", "house", "rice"]))
            .await;
        let service = Service::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            PlanSettings {
                standard_sauce_ids: ids(&["house", "teriyaki"]),
                ..PlanSettings::default()
            },
        );
        let line_id = add(&service, "plate").await;

        let outcome = edit(
            &service,
            &line_id,
            EditIntent::ReplaceSauce {
                ingredient_id: Some("teriyaki".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(outcome.ids, ids(&["chicken", "rice", "teriyaki"]));
        let dish = service
            .get_line_options(TOKEN.to_string(), line_id.clone())
            .await
            .unwrap();
        assert_eq!(active_sauces(&dish), vec!["Teriyaki".to_string()]);

        edit(
            &service,
            &line_id,
            EditIntent::ReplaceSauce {
                ingredient_id: Some("house".to_string()),
            },
        )
        .await
        .unwrap();
        let outcome = edit(
            &service,
            &line_id,
            EditIntent::ReplaceSauce {
                ingredient_id: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(outcome.ids, ids(&["chicken", "rice"]));
        let dish = service
            .get_line_options(TOKEN.to_string(), line_id)
            .await
            .unwrap();
        assert_eq!(active_sauces(&dish), vec!["No Sauce".to_string()]);
    }

    #[tokio::test]
    async fn test_no_sauce_then_options_reflect_it() {
        let store = seeded_store().await;
        let service = service(&store);
        let line_id = add(&service, "bowl").await;

        edit(
            &service,
            &line_id,
            EditIntent::ReplaceSauce {
                ingredient_id: None,
            },
        )
        .await
        .unwrap();

        let dish = service
            .get_line_options(TOKEN.to_string(), line_id)
            .await
            .unwrap();
        let active: Vec<&str> = dish
            .options
            .sauce
            .iter()
            .filter(|o| o.is_active)
            .map(|o| o.name.as_str())
            .collect();
        assert_eq!(active, vec!["No Sauce"]);
    }

    #[tokio::test]
    async fn test_toggle_without_change_reports_no_changes() {
        let store = seeded_store().await;
        let service = service(&store);
        let line_id = add(&service, "bowl").await;

        let outcome = edit(
            &service,
            &line_id,
            EditIntent::ToggleVeggie {
                ingredient_id: "broccoli".to_string(),
                active: true,
            },
        )
        .await
        .unwrap();

        assert_eq!(outcome.message, "No changes");
        assert_eq!(outcome.revision, Some(0));
    }

    #[tokio::test]
    async fn test_emptied_override_falls_back_to_catalog() {
        let store = seeded_store().await;
        let service = service(&store);
        let line = store
            .insert_line(NewOrderLine {
                customer_token: TOKEN.to_string(),
                subscription_id: None,
                item_id: "LUNCH-01".to_string(),
                item_name: "Tofu Wrap".to_string(),
                dish_id: "wrap".to_string(),
                meal_type: "Lunch".to_string(),
                delivery_date: monday(),
                quantity: Some(1),
                protein_id: Some("tofu".to_string()),
                original_ingredient_ids: ids(&["tofu", "pepper-jack", "red-pepper"]),
                final_ingredient_ids: ids(&["tofu"]),
                audit_log: String::new(),
                nutrition: Nutrition::default(),
                image_url: None,
                line_key: None,
            })
            .await;

        let outcome = edit(
            &service,
            &line.id,
            EditIntent::DeleteIngredient {
                target: IngredientTarget::Name("tofu".to_string()),
            },
        )
        .await
        .unwrap();

        assert_eq!(outcome.ids, ids(&["tofu", "pepper-jack", "red-pepper"]));
        let stored = store.line(&line.id).await.unwrap();
        assert!(stored.final_ingredient_ids.is_empty());
    }

    #[tokio::test]
    async fn test_stale_revision_is_rejected() {
        let store = seeded_store().await;
        let service = service(&store);
        let line_id = add(&service, "bowl").await;

        let result = service
            .edit_ingredients(
                TOKEN.to_string(),
                EditIngredientsInput {
                    line_id,
                    intent: EditIntent::ToggleGarnish {
                        ingredient_id: "cilantro".to_string(),
                        active: false,
                    },
                    expected_revision: Some(4),
                },
            )
            .await;
        assert_eq!(
            result.unwrap_err(),
            CoreError::StaleRevision {
                expected: 4,
                actual: 0
            }
        );
    }

    #[tokio::test]
    async fn test_ingredient_name_matching() {
        let store = seeded_store().await;
        let service = service(&store);
        let line_id = add(&service, "wrap").await;

        let ambiguous = edit(
            &service,
            &line_id,
            EditIntent::DeleteIngredient {
                target: IngredientTarget::Name("pepper".to_string()),
            },
        )
        .await;
        assert!(matches!(
            ambiguous,
            Err(CoreError::AmbiguousIngredient { .. })
        ));

        let outcome = edit(
            &service,
            &line_id,
            EditIntent::ToggleIngredient {
                target: IngredientTarget::Name("jack".to_string()),
                active: false,
            },
        )
        .await
        .unwrap();
        assert_eq!(outcome.ids, ids(&["tofu", "red-pepper"]));

        // not on the line, found through the ingredient store
        let outcome = edit(
            &service,
            &line_id,
            EditIntent::ToggleIngredient {
                target: IngredientTarget::Name("Quinoa".to_string()),
                active: true,
            },
        )
        .await
        .unwrap();
        assert_eq!(outcome.ids, ids(&["tofu", "red-pepper", "quinoa"]));
    }

    #[tokio::test]
    async fn test_other_customers_line_is_not_found() {
        let store = seeded_store().await;
        store
            .insert_customer(Customer {
                id: "cus-2".to_string(),
                token: "tok-2".to_string(),
                name: "Grace".to_string(),
                subscription_id: None,
            })
            .await;
        let service = service(&store);
        let line_id = add(&service, "bowl").await;

        let result = service.get_line_options("tok-2".to_string(), line_id).await;
        assert_eq!(result.unwrap_err(), CoreError::OrderLineNotFound);
    }

    #[tokio::test]
    async fn test_menu_failure_degrades_to_empty_catalog() {
        let store = seeded_store().await;
        let mut menu = MockMenuRepository::new();
        menu.expect_list_available().returning(|| {
            Box::pin(async { Err(CoreError::ExternalServiceError("menu down".to_string())) })
        });
        let service = Service::new(
            store.clone(),
            store.clone(),
            menu,
            store.clone(),
            store.clone(),
            PlanSettings::default(),
        );

        let plan = service.get_plan(TOKEN.to_string()).await.unwrap();
        assert!(!plan.has_orders);
        assert!(plan.days[0].dishes.is_empty());
    }
}
