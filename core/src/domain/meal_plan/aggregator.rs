use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;

use crate::domain::{
    customization::customizer::Customizer,
    meal_plan::entities::{PlanDay, PlanDish, PlanView},
    menu::entities::AvailableDish,
    order::entities::OrderLine,
};

/// Builds the plan view from active lines and the weekly menu.
///
/// Without any active line the whole menu is offered under a single placeholder day.
pub fn build_plan(
    customer_token: &str,
    active_lines: &[OrderLine],
    menu: &[AvailableDish],
    customizer: &mut Customizer<'_>,
) -> PlanView {
    if active_lines.is_empty() {
        let dishes: Vec<PlanDish> = menu
            .iter()
            .map(|dish| available_dish(dish, customizer))
            .collect();
        return PlanView {
            customer_token: customer_token.to_string(),
            has_orders: false,
            days: vec![PlanDay {
                delivery_date: None,
                nutrition: dishes.iter().map(|dish| dish.nutrition).sum(),
                dishes,
            }],
        };
    }

    // BTreeMap keeps days ordered; a line without a date sorts last.
    let mut days: BTreeMap<(bool, Option<NaiveDate>), Vec<&OrderLine>> = BTreeMap::new();
    for line in active_lines {
        days.entry((line.delivery_date.is_none(), line.delivery_date))
            .or_default()
            .push(line);
    }

    let days = days
        .into_iter()
        .map(|((_, delivery_date), lines)| build_day(delivery_date, &lines, menu, customizer))
        .collect();

    PlanView {
        customer_token: customer_token.to_string(),
        has_orders: true,
        days,
    }
}

fn build_day(
    delivery_date: Option<NaiveDate>,
    lines: &[&OrderLine],
    menu: &[AvailableDish],
    customizer: &mut Customizer<'_>,
) -> PlanDay {
    let mut items: Vec<Vec<&OrderLine>> = Vec::new();
    for line in lines {
        match items
            .iter_mut()
            .find(|group| group[0].dish_id == line.dish_id && group[0].meal_type == line.meal_type)
        {
            Some(group) => group.push(line),
            None => items.push(vec![line]),
        }
    }

    let ordered_keys: HashSet<(&str, &str)> = lines
        .iter()
        .map(|line| (line.meal_type.as_str(), line.dish_id.as_str()))
        .collect();
    let meal_types: HashSet<&str> = lines.iter().map(|line| line.meal_type.as_str()).collect();

    let mut dishes: Vec<PlanDish> = items
        .iter()
        .map(|group| ordered_dish(group, menu, customizer))
        .collect();
    let nutrition = lines.iter().map(|line| line.nutrition).sum();

    dishes.extend(
        menu.iter()
            .filter(|dish| meal_types.contains(dish.meal_type.as_str()))
            .filter(|dish| !ordered_keys.contains(&(dish.meal_type.as_str(), dish.dish_id.as_str())))
            .map(|dish| available_dish(dish, customizer)),
    );

    PlanDay {
        delivery_date,
        dishes,
        nutrition,
    }
}

/// Plan entry for the lines of one ordered dish; the first line is the reference.
pub fn ordered_dish(
    lines: &[&OrderLine],
    menu: &[AvailableDish],
    customizer: &mut Customizer<'_>,
) -> PlanDish {
    let reference = lines[0];
    let effective = reference.effective_ingredient_ids();
    let customization = customizer.customize(
        &reference.meal_type,
        effective,
        &reference.original_ingredient_ids,
    );
    let menu_dish = menu
        .iter()
        .find(|dish| dish.dish_id == reference.dish_id && dish.meal_type == reference.meal_type);

    PlanDish {
        line_id: Some(reference.id.clone()),
        line_ids: lines.iter().map(|line| line.id.clone()).collect(),
        item_id: Some(reference.item_id.clone()),
        dish_id: reference.dish_id.clone(),
        meal_type: reference.meal_type.clone(),
        name: reference.item_name.clone(),
        image_url: reference
            .image_url
            .clone()
            .or_else(|| menu_dish.and_then(|dish| dish.image_url.clone())),
        quantity: lines.len() as u32,
        is_ordered: true,
        is_available: menu_dish.is_some(),
        ingredient_ids: effective.to_vec(),
        revision: Some(reference.revision),
        nutrition: reference.nutrition,
        options: customization.options,
        protein: customization.protein,
    }
}

pub fn available_dish(dish: &AvailableDish, customizer: &mut Customizer<'_>) -> PlanDish {
    let customization =
        customizer.customize(&dish.meal_type, &dish.ingredient_ids, &dish.ingredient_ids);

    PlanDish {
        line_id: None,
        line_ids: Vec::new(),
        item_id: None,
        dish_id: dish.dish_id.clone(),
        meal_type: dish.meal_type.clone(),
        name: dish.name.clone(),
        image_url: dish.image_url.clone(),
        quantity: 0,
        is_ordered: false,
        is_available: true,
        ingredient_ids: dish.ingredient_ids.clone(),
        revision: None,
        nutrition: dish.nutrition,
        options: customization.options,
        protein: customization.protein,
    }
}
