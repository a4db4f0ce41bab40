use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{CreateMealRequest, DailyNutritionSummary, Meal, UpdateMealRequest};

/// Rejects malformed meal input; future entry dates would corrupt streaks
pub fn validate_meal_input(request: &CreateMealRequest, today: NaiveDate) -> Result<(), String> {
    if request.name.trim().is_empty() {
        return Err("Meal name cannot be empty".to_string());
    }
    if request.calories < 0.0 {
        return Err("Calories cannot be negative".to_string());
    }
    if let Some(entry_date) = request.entry_date {
        if entry_date > today {
            return Err("Entry date cannot be in the future".to_string());
        }
    }
    Ok(())
}

#[derive(Clone)]
pub struct MealService {
    db: PgPool,
}

impl MealService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create_meal(&self, user_id: Uuid, request: CreateMealRequest) -> Result<Meal> {
        let entry_date = request.entry_date.unwrap_or_else(|| Utc::now().date_naive());

        let meal = sqlx::query_as::<_, Meal>(
            "INSERT INTO meals (
                id, user_id, entry_date, meal_type, name, calories, protein_g, carbs_g,
                fat_g, notes, created_at, updated_at
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW(), NOW())
             RETURNING id, user_id, entry_date, meal_type, name, calories, protein_g,
                       carbs_g, fat_g, notes, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(entry_date)
        .bind(request.meal_type.as_str())
        .bind(request.name.trim())
        .bind(request.calories)
        .bind(request.protein_g)
        .bind(request.carbs_g)
        .bind(request.fat_g)
        .bind(request.notes)
        .fetch_one(&self.db)
        .await?;

        Ok(meal)
    }

    pub async fn get_meal(&self, meal_id: Uuid, user_id: Uuid) -> Result<Option<Meal>> {
        let meal = sqlx::query_as::<_, Meal>(
            "SELECT id, user_id, entry_date, meal_type, name, calories, protein_g, carbs_g,
                    fat_g, notes, created_at, updated_at
             FROM meals WHERE id = $1 AND user_id = $2",
        )
        .bind(meal_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(meal)
    }

    /// Meals for a date range, newest first within each day
    pub async fn list_meals(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Meal>> {
        let meals = sqlx::query_as::<_, Meal>(
            "SELECT id, user_id, entry_date, meal_type, name, calories, protein_g, carbs_g,
                    fat_g, notes, created_at, updated_at
             FROM meals
             WHERE user_id = $1 AND entry_date BETWEEN $2 AND $3
             ORDER BY entry_date DESC, created_at DESC",
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.db)
        .await?;

        Ok(meals)
    }

    pub async fn update_meal(
        &self,
        meal_id: Uuid,
        user_id: Uuid,
        request: UpdateMealRequest,
    ) -> Result<Option<Meal>> {
        let meal = sqlx::query_as::<_, Meal>(
            "UPDATE meals
             SET meal_type = COALESCE($3, meal_type),
                 name = COALESCE($4, name),
                 calories = COALESCE($5, calories),
                 protein_g = COALESCE($6, protein_g),
                 carbs_g = COALESCE($7, carbs_g),
                 fat_g = COALESCE($8, fat_g),
                 notes = COALESCE($9, notes),
                 updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING id, user_id, entry_date, meal_type, name, calories, protein_g,
                       carbs_g, fat_g, notes, created_at, updated_at",
        )
        .bind(meal_id)
        .bind(user_id)
        .bind(request.meal_type.map(|t| t.as_str()))
        .bind(request.name)
        .bind(request.calories)
        .bind(request.protein_g)
        .bind(request.carbs_g)
        .bind(request.fat_g)
        .bind(request.notes)
        .fetch_optional(&self.db)
        .await?;

        Ok(meal)
    }

    pub async fn delete_meal(&self, meal_id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM meals WHERE id = $1 AND user_id = $2")
            .bind(meal_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn daily_summary(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<DailyNutritionSummary> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS meal_count,
                    COALESCE(SUM(calories), 0) AS calories,
                    COALESCE(SUM(protein_g), 0) AS protein_g,
                    COALESCE(SUM(carbs_g), 0) AS carbs_g,
                    COALESCE(SUM(fat_g), 0) AS fat_g
             FROM meals WHERE user_id = $1 AND entry_date = $2",
        )
        .bind(user_id)
        .bind(date)
        .fetch_one(&self.db)
        .await?;

        let targets: Option<(i32, i32)> = sqlx::query_as(
            "SELECT calorie_target, protein_target_g FROM profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        let calories: f64 = row.get("calories");
        let protein_g: f64 = row.get("protein_g");

        Ok(build_daily_summary(
            date,
            row.get("meal_count"),
            calories,
            protein_g,
            row.get("carbs_g"),
            row.get("fat_g"),
            targets,
        ))
    }

    pub async fn meal_count(&self, user_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM meals WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.db)
            .await?;

        Ok(count)
    }
}

fn build_daily_summary(
    date: NaiveDate,
    meal_count: i64,
    calories: f64,
    protein_g: f64,
    carbs_g: f64,
    fat_g: f64,
    targets: Option<(i32, i32)>,
) -> DailyNutritionSummary {
    let pct = |value: f64, target: i32| {
        if target > 0 {
            Some((value / target as f64) * 100.0)
        } else {
            None
        }
    };

    DailyNutritionSummary {
        date,
        meal_count,
        calories,
        protein_g,
        carbs_g,
        fat_g,
        calorie_target: targets.map(|(c, _)| c),
        protein_target_g: targets.map(|(_, p)| p),
        calories_pct_of_target: targets.and_then(|(c, _)| pct(calories, c)),
        protein_pct_of_target: targets.and_then(|(_, p)| pct(protein_g, p)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MealType;

    #[test]
    fn test_validate_meal_input() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let valid = CreateMealRequest {
            entry_date: Some(today),
            meal_type: MealType::Lunch,
            name: "Chicken salad".to_string(),
            calories: 420.0,
            protein_g: 35.0,
            carbs_g: 18.0,
            fat_g: 22.0,
            notes: None,
        };
        assert!(validate_meal_input(&valid, today).is_ok());

        let mut unnamed = valid.clone();
        unnamed.name = "   ".to_string();
        assert!(validate_meal_input(&unnamed, today).is_err());

        let mut negative = valid.clone();
        negative.calories = -100.0;
        assert!(validate_meal_input(&negative, today).is_err());
    }

    #[test]
    fn test_validate_meal_input_rejects_future_date() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let mut request = CreateMealRequest {
            entry_date: Some(today + chrono::Duration::days(1)),
            meal_type: MealType::Dinner,
            name: "Soup".to_string(),
            calories: 200.0,
            protein_g: 8.0,
            carbs_g: 20.0,
            fat_g: 6.0,
            notes: None,
        };
        assert!(validate_meal_input(&request, today).is_err());

        // Omitted date defaults to today, which is always allowed
        request.entry_date = None;
        assert!(validate_meal_input(&request, today).is_ok());
    }

    #[test]
    fn test_daily_summary_percentages() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let summary = build_daily_summary(date, 3, 1500.0, 90.0, 120.0, 50.0, Some((2000, 120)));

        assert_eq!(summary.calories_pct_of_target, Some(75.0));
        assert_eq!(summary.protein_pct_of_target, Some(75.0));
    }

    #[test]
    fn test_daily_summary_without_profile() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let summary = build_daily_summary(date, 0, 0.0, 0.0, 0.0, 0.0, None);

        assert_eq!(summary.calorie_target, None);
        assert_eq!(summary.calories_pct_of_target, None);
    }

    #[test]
    fn test_daily_summary_zero_target_guard() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let summary = build_daily_summary(date, 1, 500.0, 20.0, 10.0, 5.0, Some((0, 0)));

        assert_eq!(summary.calories_pct_of_target, None);
        assert_eq!(summary.protein_pct_of_target, None);
    }
}
