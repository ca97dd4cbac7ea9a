use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::menu::entities::Nutrition;

/// One reserved serving of a dish for a customer, meal type and delivery date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub id: String,
    pub customer_token: String,
    pub subscription_id: Option<String>,
    pub item_id: String,
    pub item_name: String,
    pub dish_id: String,
    pub meal_type: String,
    pub delivery_date: Option<NaiveDate>,
    /// Blank or zero marks a stale line left behind by an earlier plan.
    pub quantity: Option<u32>,
    pub protein_id: Option<String>,
    pub original_ingredient_ids: Vec<String>,
    pub final_ingredient_ids: Vec<String>,
    pub audit_log: String,
    pub nutrition: Nutrition,
    pub image_url: Option<String>,
    pub line_key: Option<String>,
    pub revision: u64,
}

impl OrderLine {
    /// The override when present, otherwise the catalog ingredients.
    pub fn effective_ingredient_ids(&self) -> &[String] {
        if self.final_ingredient_ids.is_empty() {
            &self.original_ingredient_ids
        } else {
            &self.final_ingredient_ids
        }
    }

    pub fn is_active(&self) -> bool {
        self.quantity.unwrap_or(0) > 0
    }

    pub fn group_key(&self) -> LineGroupKey {
        LineGroupKey {
            customer_token: self.customer_token.clone(),
            dish_id: self.dish_id.clone(),
            meal_type: self.meal_type.clone(),
            delivery_date: self.delivery_date,
        }
    }

    pub fn belongs_to(&self, key: &LineGroupKey) -> bool {
        self.customer_token == key.customer_token
            && self.dish_id == key.dish_id
            && self.meal_type == key.meal_type
            && self.delivery_date == key.delivery_date
    }

    /// Serving slot encoded at the end of the line key, if any.
    pub fn slot(&self) -> Option<u32> {
        self.line_key
            .as_deref()
            .and_then(|key| key.rsplit(':').next())
            .and_then(|slot| slot.parse().ok())
    }
}

/// Identity of the logical plan item a set of lines represents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineGroupKey {
    pub customer_token: String,
    pub dish_id: String,
    pub meal_type: String,
    pub delivery_date: Option<NaiveDate>,
}

impl LineGroupKey {
    /// Deterministic key of the `slot`-th serving of this item.
    pub fn line_key(&self, slot: u32) -> String {
        let date = self
            .delivery_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        format!(
            "{}:{}:{}:{}:{}",
            self.customer_token, self.dish_id, self.meal_type, date, slot
        )
    }
}

/// Fields of an order line the store has not assigned an id to yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrderLine {
    pub customer_token: String,
    pub subscription_id: Option<String>,
    pub item_id: String,
    pub item_name: String,
    pub dish_id: String,
    pub meal_type: String,
    pub delivery_date: Option<NaiveDate>,
    pub quantity: Option<u32>,
    pub protein_id: Option<String>,
    pub original_ingredient_ids: Vec<String>,
    pub final_ingredient_ids: Vec<String>,
    pub audit_log: String,
    pub nutrition: Nutrition,
    pub image_url: Option<String>,
    pub line_key: Option<String>,
}

impl NewOrderLine {
    /// A new serving sharing every plan field of `reference`.
    pub fn copy_of(reference: &OrderLine, line_key: String, audit_line: &str) -> Self {
        Self {
            customer_token: reference.customer_token.clone(),
            subscription_id: reference.subscription_id.clone(),
            item_id: reference.item_id.clone(),
            item_name: reference.item_name.clone(),
            dish_id: reference.dish_id.clone(),
            meal_type: reference.meal_type.clone(),
            delivery_date: reference.delivery_date,
            quantity: Some(1),
            protein_id: reference.protein_id.clone(),
            original_ingredient_ids: reference.original_ingredient_ids.clone(),
            final_ingredient_ids: reference.final_ingredient_ids.clone(),
            audit_log: append_audit(&reference.audit_log, audit_line),
            nutrition: reference.nutrition,
            image_url: reference.image_url.clone(),
            line_key: Some(line_key),
        }
    }

    pub fn into_order_line(self, id: String) -> OrderLine {
        OrderLine {
            id,
            customer_token: self.customer_token,
            subscription_id: self.subscription_id,
            item_id: self.item_id,
            item_name: self.item_name,
            dish_id: self.dish_id,
            meal_type: self.meal_type,
            delivery_date: self.delivery_date,
            quantity: self.quantity,
            protein_id: self.protein_id,
            original_ingredient_ids: self.original_ingredient_ids,
            final_ingredient_ids: self.final_ingredient_ids,
            audit_log: self.audit_log,
            nutrition: self.nutrition,
            image_url: self.image_url,
            line_key: self.line_key,
            revision: 0,
        }
    }
}

/// Override write guarded by the revision it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientUpdate {
    pub line_id: String,
    pub final_ingredient_ids: Vec<String>,
    pub protein_id: Option<String>,
    pub audit_entry: String,
    pub expected_revision: u64,
}

pub fn audit_entry(now: DateTime<Utc>, message: &str) -> String {
    format!("[{}] {}", now.format("%Y-%m-%d %H:%M:%S UTC"), message)
}

pub fn append_audit(log: &str, entry: &str) -> String {
    if log.is_empty() {
        entry.to_string()
    } else {
        format!("{log}\n{entry}")
    }
}
