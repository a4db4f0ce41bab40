//! Nutrition-lookup provider client
//!
//! Proxies a food-search API and normalizes the provider's field names into
//! the shape the UI renders.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::IntegrationsConfig;

#[derive(Error, Debug)]
pub enum NutritionError {
    #[error("Nutrition provider is not configured")]
    Unconfigured,
    #[error("Nutrition request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Nutrition provider returned status {0}")]
    Api(u16),
}

/// Normalized food-search result
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NutritionItem {
    pub name: String,
    pub serving: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

#[derive(Debug, Deserialize)]
struct ProviderResponse {
    foods: Vec<ProviderFood>,
}

#[derive(Debug, Deserialize)]
struct ProviderFood {
    food_name: String,
    serving_qty: f64,
    serving_unit: String,
    calories: f64,
    protein: f64,
    carbohydrates: f64,
    fat: f64,
}

impl From<ProviderFood> for NutritionItem {
    fn from(food: ProviderFood) -> Self {
        NutritionItem {
            name: food.food_name,
            serving: format!("{} {}", food.serving_qty, food.serving_unit),
            calories: food.calories,
            protein_g: food.protein,
            carbs_g: food.carbohydrates,
            fat_g: food.fat,
        }
    }
}

#[derive(Clone)]
pub struct NutritionClient {
    client: Client,
    base_url: Option<String>,
    api_key: Option<String>,
}

impl NutritionClient {
    pub fn new(config: &IntegrationsConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.nutrition_base_url.clone(),
            api_key: config.nutrition_api_key.clone(),
        }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<NutritionItem>, NutritionError> {
        let base_url = self.base_url.as_ref().ok_or(NutritionError::Unconfigured)?;
        let url = format!("{}/v2/search", base_url.trim_end_matches('/'));

        let mut request = self.client.get(&url).query(&[("query", query)]);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(NutritionError::Api(response.status().as_u16()));
        }

        let body: ProviderResponse = response.json().await?;
        Ok(body.foods.into_iter().map(NutritionItem::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_food_normalization() {
        let food = ProviderFood {
            food_name: "Greek Yogurt".to_string(),
            serving_qty: 170.0,
            serving_unit: "g".to_string(),
            calories: 100.0,
            protein: 17.0,
            carbohydrates: 6.0,
            fat: 0.7,
        };

        let item = NutritionItem::from(food);
        assert_eq!(item.name, "Greek Yogurt");
        assert_eq!(item.serving, "170 g");
        assert_eq!(item.protein_g, 17.0);
    }
}
