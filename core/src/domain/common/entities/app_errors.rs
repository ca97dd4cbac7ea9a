use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Not found")]
    NotFound,

    #[error("Customer not found")]
    CustomerNotFound,

    #[error("Order line not found")]
    OrderLineNotFound,

    #[error("Ingredient not found: {0}")]
    IngredientNotFound(String),

    #[error("Dish not found in menu: {0}")]
    DishNotFound(String),

    #[error("Invalid request: {0}")]
    Invalid(String),

    #[error("Ingredient name '{name}' is ambiguous, matches: {}", .candidates.join(", "))]
    AmbiguousIngredient {
        name: String,
        candidates: Vec<String>,
    },

    #[error("Dish is already ordered for this meal and date, update its quantity instead")]
    DishAlreadyOrdered,

    #[error("Only {created} of {requested} new servings could be created, retry the update")]
    IncompleteQuantityUpdate { requested: usize, created: usize },

    #[error("Order line was modified concurrently (expected revision {expected}, found {actual})")]
    StaleRevision { expected: u64, actual: u64 },

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Record store write failed: {0}")]
    ExternalWriteFailure(String),

    #[error("Internal server error")]
    InternalServerError,
}

impl CoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::NotFound
                | CoreError::CustomerNotFound
                | CoreError::OrderLineNotFound
                | CoreError::IngredientNotFound(_)
                | CoreError::DishNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambiguous_message_lists_candidates() {
        let error = CoreError::AmbiguousIngredient {
            name: "pepper".to_string(),
            candidates: vec!["Red Pepper".to_string(), "Pepper Jack".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "Ingredient name 'pepper' is ambiguous, matches: Red Pepper, Pepper Jack"
        );
    }

    #[test]
    fn test_not_found_family() {
        assert!(CoreError::OrderLineNotFound.is_not_found());
        assert!(CoreError::DishNotFound("d1".to_string()).is_not_found());
        assert!(!CoreError::DishAlreadyOrdered.is_not_found());
    }
}
