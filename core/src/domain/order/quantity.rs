use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::domain::{
    common::entities::app_errors::CoreError,
    order::entities::{NewOrderLine, OrderLine, audit_entry},
};

static ITEM_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*$").expect("static regex"));

/// Store operations needed to move a plan item to a requested serving count.
#[derive(Debug, Clone, PartialEq)]
pub enum QuantityPlan {
    Unchanged { quantity: u32 },
    Create { from: u32, to: u32, lines: Vec<NewOrderLine> },
    Delete { from: u32, to: u32, line_ids: Vec<String> },
}

impl QuantityPlan {
    pub fn target(&self) -> u32 {
        match self {
            QuantityPlan::Unchanged { quantity } => *quantity,
            QuantityPlan::Create { to, .. } | QuantityPlan::Delete { to, .. } => *to,
        }
    }
}

pub fn validate_quantity(requested: i64, max_quantity: u32) -> Result<u32, CoreError> {
    u32::try_from(requested)
        .ok()
        .filter(|quantity| *quantity <= max_quantity)
        .ok_or_else(|| {
            CoreError::Invalid(format!(
                "quantity must be between 0 and {max_quantity}, got {requested}"
            ))
        })
}

/// Plans the transition of `reference`'s plan item to `target` servings.
///
/// `group` holds every line of the item. Only active lines count as servings, and the
/// reference is counted even when the caller's listing missed it. Growing copies the
/// reference into the lowest slots no line holds, stale lines included, since their
/// keys still exist in the store. Shrinking keeps the reference and removes the
/// highest slots first.
pub fn plan_quantity(
    reference: &OrderLine,
    group: &[OrderLine],
    target: u32,
    now: DateTime<Utc>,
) -> QuantityPlan {
    let key = reference.group_key();
    let mut lines: Vec<&OrderLine> = group
        .iter()
        .filter(|line| line.is_active() && line.belongs_to(&key))
        .collect();
    if !lines.iter().any(|line| line.id == reference.id) {
        lines.push(reference);
    }

    let current = lines.len() as u32;

    if target == current {
        return QuantityPlan::Unchanged { quantity: current };
    }

    if target == 0 {
        return QuantityPlan::Delete {
            from: current,
            to: 0,
            line_ids: lines.iter().map(|line| line.id.clone()).collect(),
        };
    }

    if target > current {
        let used: HashSet<u32> = group
            .iter()
            .filter(|line| line.belongs_to(&key))
            .chain(std::iter::once(reference))
            .filter_map(|line| line.slot())
            .collect();
        // lines without a key still occupy a serving
        let unkeyed = lines.iter().filter(|line| line.slot().is_none()).count() as u32;
        let entry = audit_entry(now, &format!("Quantity increased from {current} to {target}"));

        let new_lines = (1u32..)
            .skip(unkeyed as usize)
            .filter(|slot| !used.contains(slot))
            .take((target - current) as usize)
            .map(|slot| NewOrderLine::copy_of(reference, key.line_key(slot), &entry))
            .collect();

        return QuantityPlan::Create {
            from: current,
            to: target,
            lines: new_lines,
        };
    }

    let mut removable: Vec<&OrderLine> = lines
        .into_iter()
        .filter(|line| line.id != reference.id)
        .collect();
    removable.sort_by(|a, b| {
        b.slot()
            .unwrap_or(0)
            .cmp(&a.slot().unwrap_or(0))
            .then_with(|| b.id.cmp(&a.id))
    });

    QuantityPlan::Delete {
        from: current,
        to: target,
        line_ids: removable
            .into_iter()
            .take((current - target) as usize)
            .map(|line| line.id.clone())
            .collect(),
    }
}

/// Next sequential item id for a customer and meal type, e.g. `LUNCH-04`.
pub fn next_item_id<'a>(
    existing_item_ids: impl IntoIterator<Item = &'a str>,
    meal_type: &str,
) -> String {
    let next = existing_item_ids
        .into_iter()
        .filter_map(|item_id| ITEM_SUFFIX.captures(item_id))
        .filter_map(|captures| captures[1].parse::<u32>().ok())
        .max()
        .unwrap_or(0)
        + 1;

    let prefix: String = meal_type
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_uppercase();

    format!("{prefix}-{next:02}")
}
