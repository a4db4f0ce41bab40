use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    CreateSupplementRequest, Supplement, SupplementDayEntry, SupplementIntake,
    UpdateSupplementRequest,
};

#[derive(Error, Debug)]
pub enum SupplementError {
    #[error("Supplement not found")]
    NotFound,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Rejects malformed supplement definitions
pub fn validate_supplement_input(request: &CreateSupplementRequest) -> Result<(), String> {
    if request.name.trim().is_empty() {
        return Err("Supplement name cannot be empty".to_string());
    }
    if request.dosage <= 0.0 {
        return Err("Dosage must be positive".to_string());
    }
    Ok(())
}

#[derive(Clone)]
pub struct SupplementService {
    db: PgPool,
}

impl SupplementService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create_supplement(
        &self,
        user_id: Uuid,
        request: CreateSupplementRequest,
    ) -> Result<Supplement> {
        let supplement = sqlx::query_as::<_, Supplement>(
            "INSERT INTO supplements (
                id, user_id, name, dosage, unit, time_of_day, active, created_at, updated_at
             )
             VALUES ($1, $2, $3, $4, $5, $6, true, NOW(), NOW())
             RETURNING id, user_id, name, dosage, unit, time_of_day, active,
                       created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(request.name.trim())
        .bind(request.dosage)
        .bind(request.unit)
        .bind(request.time_of_day.unwrap_or_else(|| "morning".to_string()))
        .fetch_one(&self.db)
        .await?;

        Ok(supplement)
    }

    pub async fn list_supplements(&self, user_id: Uuid) -> Result<Vec<Supplement>> {
        let supplements = sqlx::query_as::<_, Supplement>(
            "SELECT id, user_id, name, dosage, unit, time_of_day, active, created_at, updated_at
             FROM supplements WHERE user_id = $1 AND active
             ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(supplements)
    }

    pub async fn update_supplement(
        &self,
        supplement_id: Uuid,
        user_id: Uuid,
        request: UpdateSupplementRequest,
    ) -> Result<Option<Supplement>> {
        let supplement = sqlx::query_as::<_, Supplement>(
            "UPDATE supplements
             SET name = COALESCE($3, name),
                 dosage = COALESCE($4, dosage),
                 unit = COALESCE($5, unit),
                 time_of_day = COALESCE($6, time_of_day),
                 active = COALESCE($7, active),
                 updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING id, user_id, name, dosage, unit, time_of_day, active,
                       created_at, updated_at",
        )
        .bind(supplement_id)
        .bind(user_id)
        .bind(request.name)
        .bind(request.dosage)
        .bind(request.unit)
        .bind(request.time_of_day)
        .bind(request.active)
        .fetch_optional(&self.db)
        .await?;

        Ok(supplement)
    }

    pub async fn delete_supplement(&self, supplement_id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM supplements WHERE id = $1 AND user_id = $2")
            .bind(supplement_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Toggle the intake mark for a supplement on a date. Returns the new
    /// taken state; toggling twice restores the original state.
    pub async fn toggle_intake(
        &self,
        supplement_id: Uuid,
        user_id: Uuid,
        entry_date: Option<NaiveDate>,
    ) -> Result<bool, SupplementError> {
        let owned: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM supplements WHERE id = $1 AND user_id = $2")
                .bind(supplement_id)
                .bind(user_id)
                .fetch_optional(&self.db)
                .await?;

        if owned.is_none() {
            return Err(SupplementError::NotFound);
        }

        let entry_date = entry_date.unwrap_or_else(|| Utc::now().date_naive());

        let existing: Option<SupplementIntake> = sqlx::query_as(
            "SELECT id, supplement_id, entry_date, created_at
             FROM supplement_intakes WHERE supplement_id = $1 AND entry_date = $2",
        )
        .bind(supplement_id)
        .bind(entry_date)
        .fetch_optional(&self.db)
        .await?;

        match existing {
            Some(intake) => {
                sqlx::query("DELETE FROM supplement_intakes WHERE id = $1")
                    .bind(intake.id)
                    .execute(&self.db)
                    .await?;
                Ok(false)
            }
            None => {
                sqlx::query(
                    "INSERT INTO supplement_intakes (id, supplement_id, entry_date, created_at)
                     VALUES ($1, $2, $3, NOW())",
                )
                .bind(Uuid::new_v4())
                .bind(supplement_id)
                .bind(entry_date)
                .execute(&self.db)
                .await?;
                Ok(true)
            }
        }
    }

    /// Each active supplement with its taken state for the given date
    pub async fn day_view(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<SupplementDayEntry>> {
        let supplements = self.list_supplements(user_id).await?;

        let taken_ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT si.supplement_id
             FROM supplement_intakes si
             JOIN supplements s ON s.id = si.supplement_id
             WHERE s.user_id = $1 AND si.entry_date = $2",
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(&self.db)
        .await?;

        Ok(supplements
            .into_iter()
            .map(|supplement| {
                let taken = taken_ids.contains(&supplement.id);
                SupplementDayEntry { supplement, taken }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_supplement_input() {
        let valid = CreateSupplementRequest {
            name: "Vitamin D3".to_string(),
            dosage: 2000.0,
            unit: "IU".to_string(),
            time_of_day: Some("morning".to_string()),
        };
        assert!(validate_supplement_input(&valid).is_ok());

        let mut unnamed = valid.clone();
        unnamed.name = "  ".to_string();
        assert!(validate_supplement_input(&unnamed).is_err());

        let mut zero_dose = valid.clone();
        zero_dose.dosage = 0.0;
        assert!(validate_supplement_input(&zero_dose).is_err());
    }
}
