use serde::{Deserialize, Serialize};

use crate::clients::WeatherSnapshot;

/// Request body for POST /meal/get-meal. All string fields are opaque user
/// text; they are embedded into the prompt but never executed or interpolated
/// into queries.
#[derive(Debug, Clone, Deserialize)]
pub struct MealRequest {
    pub mood: String,
    pub location: String,
    pub health_goals: String,
    pub dietary_restrictions: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_language")]
    pub language: String,
    pub budget: String,
    #[serde(default)]
    pub notes: String,
}

fn default_language() -> String {
    "english".into()
}

/// Top-level object the model is instructed to return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanDocument {
    #[serde(rename = "mealPlan")]
    pub meal_plan: MealPlan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    pub days: Vec<PlanDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDay {
    #[serde(default)]
    pub day: String,
    pub meals: Vec<PlanMeal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanMeal {
    /// Breakfast / Lunch / Dinner.
    #[serde(rename = "type")]
    pub label: String,
    pub items: Vec<FoodItem>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    /// Empty until image enrichment runs; stays empty when lookup degrades.
    #[serde(rename = "imageUrl", default)]
    pub image_url: String,
}

/// Composed response: the validated plan plus the snapshot it was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealPlanResponse {
    pub meal: MealPlanDocument,
    pub weather: WeatherSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_language_and_notes() {
        let body = r#"{
            "mood": "tired",
            "location": "Chennai",
            "health_goals": "weight loss",
            "dietary_restrictions": "vegetarian",
            "latitude": 13.08,
            "longitude": 80.27,
            "budget": "low"
        }"#;
        let req: MealRequest = serde_json::from_str(body).expect("parses");
        assert_eq!(req.language, "english");
        assert_eq!(req.notes, "");
    }

    #[test]
    fn plan_serializes_with_camel_case_keys() {
        let doc = MealPlanDocument {
            meal_plan: MealPlan {
                days: vec![PlanDay {
                    day: "Day 1".into(),
                    meals: vec![PlanMeal {
                        label: "Breakfast".into(),
                        items: vec![FoodItem {
                            name: "Idli".into(),
                            image_url: String::new(),
                        }],
                        notes: "light".into(),
                    }],
                }],
            },
        };
        let json = serde_json::to_string(&doc).expect("serializes");
        assert!(json.contains("\"mealPlan\""));
        assert!(json.contains("\"imageUrl\""));
        assert!(json.contains("\"type\":\"Breakfast\""));
    }

    #[test]
    fn meal_without_items_fails_deserialization() {
        let body = r#"{ "type": "Lunch", "notes": "n" }"#;
        assert!(serde_json::from_str::<PlanMeal>(body).is_err());
    }
}
