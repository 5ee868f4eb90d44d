//! Food catalogue domain model.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A food with its energy content per unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    pub id: i64,
    pub name: String,
    /// Kilocalories per unit.
    pub calories: f64,
}

/// Request payload for adding a food.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFoodRequest {
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: String,

    #[validate(range(min = 0.0, message = "Calories cannot be negative"))]
    pub calories: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_food_request_validation() {
        let ok = CreateFoodRequest {
            name: "Nasi Goreng".to_string(),
            calories: 350.0,
        };
        assert!(ok.validate().is_ok());

        let negative = CreateFoodRequest {
            name: "Nasi Goreng".to_string(),
            calories: -1.0,
        };
        assert!(negative.validate().is_err());

        let blank = CreateFoodRequest {
            name: "   ".to_string(),
            calories: 10.0,
        };
        assert!(blank.validate().is_err());
    }
}
