use chrono::NaiveDate;
use serde_json::{Value, json};

use crate::{
    domain::{
        customer::entities::Customer,
        ingredient::entities::{Component, Ingredient},
        menu::entities::{AvailableDish, Nutrition},
        order::entities::{NewOrderLine, OrderLine},
        variant::entities::Variant,
    },
    infrastructure::record_store::client::{Fields, Record},
};

pub const CUSTOMERS: &str = "Customers";
pub const ORDERS: &str = "Orders";
pub const MENU: &str = "Menu";
pub const INGREDIENTS: &str = "Ingredients";
pub const VARIANTS: &str = "Variants";

pub mod fields {
    pub const TOKEN: &str = "Token";
    pub const NAME: &str = "Name";
    pub const SUBSCRIPTION: &str = "Subscription";

    pub const CUSTOMER_TOKEN: &str = "Customer Token";
    pub const ITEM_ID: &str = "Item ID";
    pub const ITEM_NAME: &str = "Item Name";
    pub const DISH_ID: &str = "Dish ID";
    pub const MEAL_TYPE: &str = "Meal Type";
    pub const DELIVERY_DATE: &str = "Delivery Date";
    pub const QUANTITY: &str = "Quantity";
    pub const PROTEIN: &str = "Protein";
    pub const ORIGINAL_INGREDIENTS: &str = "Original Ingredients";
    pub const FINAL_INGREDIENTS: &str = "Final Ingredients";
    pub const AUDIT_LOG: &str = "Audit Log";
    pub const CALORIES: &str = "Calories";
    pub const PROTEIN_GRAMS: &str = "Protein (g)";
    pub const CARBS_GRAMS: &str = "Carbs (g)";
    pub const FAT_GRAMS: &str = "Fat (g)";
    pub const IMAGE_URL: &str = "Image URL";
    pub const LINE_KEY: &str = "Line Key";
    pub const REVISION: &str = "Revision";

    pub const INGREDIENTS: &str = "Ingredients";
    pub const AVAILABLE: &str = "Available";

    pub const COMPONENT: &str = "Component";

    pub const VARIANT_TYPE: &str = "Variant Type";
    pub const MEAL_TYPES: &str = "Meal Types";
    pub const DISPLAY_NAME: &str = "Display Name";
    pub const PRICE: &str = "Price";
}

fn text(record: &Record, field: &str) -> Option<String> {
    match record.fields.get(field)? {
        Value::String(value) if !value.trim().is_empty() => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        Value::Array(values) => values.first().and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// Linked-record and multi-select fields; a single string is read as one id.
fn ids(record: &Record, field: &str) -> Vec<String> {
    match record.fields.get(field) {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(value)) if !value.is_empty() => vec![value.clone()],
        _ => Vec::new(),
    }
}

fn number(record: &Record, field: &str) -> Option<f64> {
    match record.fields.get(field)? {
        Value::Number(value) => value.as_f64(),
        Value::String(value) => value.trim().parse().ok(),
        _ => None,
    }
}

fn date(record: &Record, field: &str) -> Option<NaiveDate> {
    let value = text(record, field)?;
    // date-time fields carry a time part after the date
    NaiveDate::parse_from_str(value.get(..10).unwrap_or(&value), "%Y-%m-%d").ok()
}

fn nutrition(record: &Record) -> Nutrition {
    Nutrition {
        calories: number(record, fields::CALORIES).unwrap_or_default(),
        protein_grams: number(record, fields::PROTEIN_GRAMS).unwrap_or_default(),
        carbs_grams: number(record, fields::CARBS_GRAMS).unwrap_or_default(),
        fat_grams: number(record, fields::FAT_GRAMS).unwrap_or_default(),
    }
}

/// Image attachments arrive as `[{url: ...}]`; plain text URLs are also accepted.
fn image_url(record: &Record) -> Option<String> {
    match record.fields.get(fields::IMAGE_URL)? {
        Value::String(url) if !url.is_empty() => Some(url.clone()),
        Value::Array(attachments) => attachments
            .first()
            .and_then(|attachment| attachment.get("url"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

pub fn customer_from_record(record: &Record) -> Customer {
    Customer {
        id: record.id.clone(),
        token: text(record, fields::TOKEN).unwrap_or_default(),
        name: text(record, fields::NAME).unwrap_or_default(),
        subscription_id: text(record, fields::SUBSCRIPTION),
    }
}

pub fn order_line_from_record(record: &Record) -> OrderLine {
    OrderLine {
        id: record.id.clone(),
        customer_token: text(record, fields::CUSTOMER_TOKEN).unwrap_or_default(),
        subscription_id: text(record, fields::SUBSCRIPTION),
        item_id: text(record, fields::ITEM_ID).unwrap_or_default(),
        item_name: text(record, fields::ITEM_NAME).unwrap_or_default(),
        dish_id: text(record, fields::DISH_ID).unwrap_or_default(),
        meal_type: text(record, fields::MEAL_TYPE).unwrap_or_default(),
        delivery_date: date(record, fields::DELIVERY_DATE),
        quantity: number(record, fields::QUANTITY)
            .filter(|quantity| *quantity >= 0.0)
            .map(|quantity| quantity as u32),
        protein_id: text(record, fields::PROTEIN),
        original_ingredient_ids: ids(record, fields::ORIGINAL_INGREDIENTS),
        final_ingredient_ids: ids(record, fields::FINAL_INGREDIENTS),
        audit_log: text(record, fields::AUDIT_LOG).unwrap_or_default(),
        nutrition: nutrition(record),
        image_url: image_url(record),
        line_key: text(record, fields::LINE_KEY),
        revision: number(record, fields::REVISION)
            .filter(|revision| *revision >= 0.0)
            .map(|revision| revision as u64)
            .unwrap_or(0),
    }
}

pub fn order_line_fields(line: &NewOrderLine) -> Fields {
    let mut fields = Fields::new();
    fields.insert(fields::CUSTOMER_TOKEN.into(), json!(line.customer_token));
    if let Some(subscription_id) = &line.subscription_id {
        fields.insert(fields::SUBSCRIPTION.into(), json!([subscription_id]));
    }
    fields.insert(fields::ITEM_ID.into(), json!(line.item_id));
    fields.insert(fields::ITEM_NAME.into(), json!(line.item_name));
    fields.insert(fields::DISH_ID.into(), json!(line.dish_id));
    fields.insert(fields::MEAL_TYPE.into(), json!(line.meal_type));
    if let Some(date) = line.delivery_date {
        fields.insert(
            fields::DELIVERY_DATE.into(),
            json!(date.format("%Y-%m-%d").to_string()),
        );
    }
    fields.insert(fields::QUANTITY.into(), json!(line.quantity));
    if let Some(protein_id) = &line.protein_id {
        fields.insert(fields::PROTEIN.into(), json!([protein_id]));
    }
    fields.insert(
        fields::ORIGINAL_INGREDIENTS.into(),
        json!(line.original_ingredient_ids),
    );
    fields.insert(
        fields::FINAL_INGREDIENTS.into(),
        json!(line.final_ingredient_ids),
    );
    fields.insert(fields::AUDIT_LOG.into(), json!(line.audit_log));
    fields.insert(fields::CALORIES.into(), json!(line.nutrition.calories));
    fields.insert(fields::PROTEIN_GRAMS.into(), json!(line.nutrition.protein_grams));
    fields.insert(fields::CARBS_GRAMS.into(), json!(line.nutrition.carbs_grams));
    fields.insert(fields::FAT_GRAMS.into(), json!(line.nutrition.fat_grams));
    if let Some(image_url) = &line.image_url {
        fields.insert(fields::IMAGE_URL.into(), json!(image_url));
    }
    if let Some(line_key) = &line.line_key {
        fields.insert(fields::LINE_KEY.into(), json!(line_key));
    }
    fields.insert(fields::REVISION.into(), json!(0));
    fields
}

pub fn ingredient_override_fields(
    final_ingredient_ids: &[String],
    protein_id: Option<&str>,
    audit_log: &str,
    revision: u64,
) -> Fields {
    let mut fields = Fields::new();
    fields.insert(
        fields::FINAL_INGREDIENTS.into(),
        json!(final_ingredient_ids),
    );
    fields.insert(
        fields::PROTEIN.into(),
        protein_id.map_or_else(|| json!([]), |id| json!([id])),
    );
    fields.insert(fields::AUDIT_LOG.into(), json!(audit_log));
    fields.insert(fields::REVISION.into(), json!(revision));
    fields
}

/// Menu rows without a dish id or meal type are unusable and dropped.
pub fn dish_from_record(record: &Record) -> Option<AvailableDish> {
    Some(AvailableDish {
        dish_id: text(record, fields::DISH_ID)?,
        meal_type: text(record, fields::MEAL_TYPE)?,
        name: text(record, fields::NAME).unwrap_or_default(),
        ingredient_ids: ids(record, fields::INGREDIENTS),
        image_url: image_url(record),
        nutrition: nutrition(record),
    })
}

pub fn ingredient_from_record(record: &Record) -> Ingredient {
    Ingredient {
        id: record.id.clone(),
        name: text(record, fields::NAME).unwrap_or_else(|| record.id.clone()),
        component: text(record, fields::COMPONENT).and_then(|label| Component::parse(&label)),
    }
}

pub fn variant_from_record(record: &Record) -> Variant {
    Variant {
        id: record.id.clone(),
        variant_type: text(record, fields::VARIANT_TYPE).unwrap_or_default(),
        applicable_meal_types: ids(record, fields::MEAL_TYPES),
        member_ingredient_ids: ids(record, fields::INGREDIENTS),
        display_name: text(record, fields::DISPLAY_NAME).unwrap_or_default(),
        price: number(record, fields::PRICE)
            .filter(|price| *price >= 0.0)
            .unwrap_or(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, fields: Value) -> Record {
        serde_json::from_value(json!({ "id": id, "fields": fields })).unwrap()
    }

    #[test]
    fn test_order_line_from_record() {
        let line = order_line_from_record(&record(
            "rec1",
            json!({
                "Customer Token": "tok",
                "Subscription": ["recSub"],
                "Item ID": "LUNCH-02",
                "Dish ID": "bowl",
                "Meal Type": "Lunch",
                "Delivery Date": "2025-03-17",
                "Quantity": 1,
                "Original Ingredients": ["chicken", "rice"],
                "Calories": 520.5,
                "Image URL": [{"url": "https://img/bowl.png"}],
                "Revision": 3
            }),
        ));

        assert_eq!(line.subscription_id.as_deref(), Some("recSub"));
        assert_eq!(line.delivery_date, NaiveDate::from_ymd_opt(2025, 3, 17));
        assert_eq!(line.quantity, Some(1));
        assert!(line.final_ingredient_ids.is_empty());
        assert_eq!(line.effective_ingredient_ids(), ["chicken", "rice"]);
        assert_eq!(line.nutrition.calories, 520.5);
        assert_eq!(line.image_url.as_deref(), Some("https://img/bowl.png"));
        assert_eq!(line.revision, 3);
    }

    #[test]
    fn test_blank_quantity_marks_stale_line() {
        let line = order_line_from_record(&record("rec2", json!({ "Quantity": null })));
        assert_eq!(line.quantity, None);
        assert!(!line.is_active());
    }

    #[test]
    fn test_new_line_fields_round_trip() {
        let line = order_line_from_record(&record(
            "rec1",
            json!({
                "Customer Token": "tok",
                "Dish ID": "bowl",
                "Meal Type": "Lunch",
                "Delivery Date": "2025-03-17T00:00:00.000Z",
                "Quantity": 1,
                "Protein": ["chicken"],
                "Original Ingredients": ["chicken"],
                "Final Ingredients": ["tofu"],
                "Line Key": "tok:bowl:Lunch:2025-03-17:1"
            }),
        ));
        let copy = NewOrderLine::copy_of(&line, "tok:bowl:Lunch:2025-03-17:2".to_string(), "x");
        let fields = order_line_fields(&copy);

        assert_eq!(fields[fields::DELIVERY_DATE], json!("2025-03-17"));
        assert_eq!(fields[fields::PROTEIN], json!(["chicken"]));
        assert_eq!(fields[fields::FINAL_INGREDIENTS], json!(["tofu"]));
        assert_eq!(fields[fields::LINE_KEY], json!("tok:bowl:Lunch:2025-03-17:2"));
        assert_eq!(fields[fields::REVISION], json!(0));
    }

    #[test]
    fn test_override_fields_clear_protein() {
        let fields = ingredient_override_fields(&[], None, "log", 4);
        assert_eq!(fields[fields::FINAL_INGREDIENTS], json!([]));
        assert_eq!(fields[fields::PROTEIN], json!([]));
        assert_eq!(fields[fields::REVISION], json!(4));
    }

    #[test]
    fn test_ingredient_and_variant_from_record() {
        let ingredient = ingredient_from_record(&record(
            "recRice",
            json!({ "Name": "Rice", "Component": "Starch" }),
        ));
        assert_eq!(ingredient.component, Some(Component::Starch));

        let unclassified = ingredient_from_record(&record("recX", json!({ "Component": "Other" })));
        assert_eq!(unclassified.name, "recX");
        assert_eq!(unclassified.component, None);

        let variant = variant_from_record(&record(
            "recVar",
            json!({
                "Variant Type": "Poultry",
                "Meal Types": ["Lunch", "Dinner"],
                "Ingredients": ["recChicken"],
                "Price": -1
            }),
        ));
        assert!(variant.applies_to("Dinner"));
        assert_eq!(variant.price, 0.0);
    }

    #[test]
    fn test_dish_requires_identity() {
        assert!(dish_from_record(&record("r", json!({ "Name": "Soup" }))).is_none());
        let dish = dish_from_record(&record(
            "r",
            json!({ "Dish ID": "soup", "Meal Type": "Dinner", "Ingredients": ["a"] }),
        ))
        .unwrap();
        assert_eq!(dish.ingredient_ids, vec!["a".to_string()]);
    }
}
