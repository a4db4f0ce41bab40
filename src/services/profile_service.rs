use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{ActivityLevel, EnergyResponse, Profile, Sex, UpsertProfileRequest};

/// Mifflin-St Jeor basal metabolic rate
pub fn mifflin_st_jeor(sex: Sex, weight_kg: f64, height_cm: f64, age_years: i32) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years as f64;
    match sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

pub fn tdee(bmr: f64, activity: ActivityLevel) -> f64 {
    bmr * activity.multiplier()
}

/// Whole years between birth date and the given day
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.years_since(birth_date).unwrap_or(0) as i32;
    if age < 0 {
        age = 0;
    }
    age
}

/// Rejects out-of-range profile input before it reaches the database
pub fn validate_profile_input(request: &UpsertProfileRequest, today: NaiveDate) -> Result<(), String> {
    if request.height_cm < 100.0 || request.height_cm > 250.0 {
        return Err("Height must be between 100 and 250 cm".to_string());
    }
    if request.start_weight_kg <= 0.0 || request.target_weight_kg <= 0.0 {
        return Err("Weights must be positive".to_string());
    }
    if request.birth_date >= today {
        return Err("Birth date must be in the past".to_string());
    }
    Ok(())
}

#[derive(Clone)]
pub struct ProfileService {
    db: PgPool,
}

impl ProfileService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            "SELECT user_id, sex, birth_date, height_cm, start_weight_kg, target_weight_kg,
                    activity_level, calorie_target, protein_target_g, water_target_ml,
                    created_at, updated_at
             FROM profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(profile)
    }

    pub async fn upsert_profile(
        &self,
        user_id: Uuid,
        request: UpsertProfileRequest,
    ) -> Result<Profile> {
        let profile = sqlx::query_as::<_, Profile>(
            "INSERT INTO profiles (
                user_id, sex, birth_date, height_cm, start_weight_kg, target_weight_kg,
                activity_level, calorie_target, protein_target_g, water_target_ml,
                created_at, updated_at
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW(), NOW())
             ON CONFLICT (user_id) DO UPDATE SET
                sex = $2, birth_date = $3, height_cm = $4, start_weight_kg = $5,
                target_weight_kg = $6, activity_level = $7, calorie_target = $8,
                protein_target_g = $9, water_target_ml = $10, updated_at = NOW()
             RETURNING user_id, sex, birth_date, height_cm, start_weight_kg, target_weight_kg,
                       activity_level, calorie_target, protein_target_g, water_target_ml,
                       created_at, updated_at",
        )
        .bind(user_id)
        .bind(request.sex.as_str())
        .bind(request.birth_date)
        .bind(request.height_cm)
        .bind(request.start_weight_kg)
        .bind(request.target_weight_kg)
        .bind(request.activity_level.as_str())
        .bind(request.calorie_target)
        .bind(request.protein_target_g)
        .bind(request.water_target_ml)
        .fetch_one(&self.db)
        .await?;

        Ok(profile)
    }

    /// BMR/TDEE from the profile, using the latest weigh-in when one exists
    pub async fn energy(&self, user_id: Uuid) -> Result<Option<EnergyResponse>> {
        let profile = match self.get_profile(user_id).await? {
            Some(p) => p,
            None => return Ok(None),
        };

        let sex = Sex::from_str(&profile.sex)
            .ok_or_else(|| anyhow::anyhow!("Unknown sex value in profile: {}", profile.sex))?;
        let activity = ActivityLevel::from_str(&profile.activity_level).ok_or_else(|| {
            anyhow::anyhow!("Unknown activity level: {}", profile.activity_level)
        })?;

        let latest_weight: Option<f64> = sqlx::query_scalar(
            "SELECT weight_kg FROM progress_logs WHERE user_id = $1
             ORDER BY entry_date DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        let weight_kg = latest_weight.unwrap_or(profile.start_weight_kg);
        let age_years = age_on(profile.birth_date, Utc::now().date_naive());
        let bmr = mifflin_st_jeor(sex, weight_kg, profile.height_cm, age_years);

        Ok(Some(EnergyResponse {
            bmr,
            tdee: tdee(bmr, activity),
            activity_level: activity,
            weight_kg,
            age_years,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mifflin_st_jeor_male() {
        // 80 kg, 180 cm, 30 years: 10*80 + 6.25*180 - 5*30 + 5 = 1780
        let bmr = mifflin_st_jeor(Sex::Male, 80.0, 180.0, 30);
        assert!((bmr - 1780.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mifflin_st_jeor_female() {
        // 65 kg, 165 cm, 40 years: 10*65 + 6.25*165 - 5*40 - 161 = 1320.25
        let bmr = mifflin_st_jeor(Sex::Female, 65.0, 165.0, 40);
        assert!((bmr - 1320.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tdee_multipliers() {
        let bmr = 1600.0;
        assert!((tdee(bmr, ActivityLevel::Sedentary) - 1920.0).abs() < 1e-9);
        assert!((tdee(bmr, ActivityLevel::ModeratelyActive) - 2480.0).abs() < 1e-9);
        assert!((tdee(bmr, ActivityLevel::ExtraActive) - 3040.0).abs() < 1e-9);
    }

    #[test]
    fn test_validate_profile_input_ranges() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let valid = UpsertProfileRequest {
            sex: Sex::Female,
            birth_date: NaiveDate::from_ymd_opt(1988, 3, 2).unwrap(),
            height_cm: 168.0,
            start_weight_kg: 82.0,
            target_weight_kg: 70.0,
            activity_level: ActivityLevel::LightlyActive,
            calorie_target: 1800,
            protein_target_g: 120,
            water_target_ml: 2500,
        };
        assert!(validate_profile_input(&valid, today).is_ok());

        let mut short = valid.clone();
        short.height_cm = 90.0;
        assert!(validate_profile_input(&short, today).is_err());

        let mut negative = valid.clone();
        negative.start_weight_kg = -5.0;
        assert!(validate_profile_input(&negative, today).is_err());

        let mut unborn = valid.clone();
        unborn.birth_date = today;
        assert!(validate_profile_input(&unborn, today).is_err());
    }

    #[test]
    fn test_age_on() {
        let birth = NaiveDate::from_ymd_opt(1990, 6, 15).unwrap();
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2020, 6, 14).unwrap()), 29);
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2020, 6, 15).unwrap()), 30);
        // Birth date after "today" clamps to zero
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(1980, 1, 1).unwrap()), 0);
    }
}
