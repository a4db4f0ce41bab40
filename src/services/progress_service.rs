use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{ProgressLog, ProgressSummary, UpsertProgressRequest};

/// Count consecutive calendar days ending today or yesterday, given entry
/// dates sorted descending. A streak is not broken before the user has had a
/// chance to log today's entry.
pub fn current_streak(dates_desc: &[NaiveDate], today: NaiveDate) -> i64 {
    let mut expected = match dates_desc.first() {
        Some(&d) if d == today => today,
        Some(&d) if d == today.pred_opt().unwrap_or(today) => d,
        _ => return 0,
    };

    let mut streak = 0;
    for &date in dates_desc {
        if date == expected {
            streak += 1;
            expected = match expected.pred_opt() {
                Some(prev) => prev,
                None => break,
            };
        } else if date < expected {
            break;
        }
    }

    streak
}

/// Rejects out-of-range weigh-ins; future entry dates would zero the streak
pub fn validate_weigh_in(request: &UpsertProgressRequest, today: NaiveDate) -> Result<(), String> {
    if request.weight_kg <= 0.0 || request.weight_kg > 500.0 {
        return Err("Weight must be between 0 and 500 kg".to_string());
    }
    if let Some(entry_date) = request.entry_date {
        if entry_date > today {
            return Err("Entry date cannot be in the future".to_string());
        }
    }
    Ok(())
}

#[derive(Clone)]
pub struct ProgressService {
    db: PgPool,
}

impl ProgressService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// One weigh-in per user per day; logging twice on a day overwrites
    pub async fn upsert_log(
        &self,
        user_id: Uuid,
        request: UpsertProgressRequest,
    ) -> Result<ProgressLog> {
        let entry_date = request.entry_date.unwrap_or_else(|| Utc::now().date_naive());

        let log = sqlx::query_as::<_, ProgressLog>(
            "INSERT INTO progress_logs (
                id, user_id, entry_date, weight_kg, body_fat_pct, waist_cm, note,
                created_at, updated_at
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
             ON CONFLICT (user_id, entry_date) DO UPDATE SET
                weight_kg = $4, body_fat_pct = $5, waist_cm = $6, note = $7,
                updated_at = NOW()
             RETURNING id, user_id, entry_date, weight_kg, body_fat_pct, waist_cm, note,
                       created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(entry_date)
        .bind(request.weight_kg)
        .bind(request.body_fat_pct)
        .bind(request.waist_cm)
        .bind(request.note)
        .fetch_one(&self.db)
        .await?;

        Ok(log)
    }

    pub async fn list_logs(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<ProgressLog>> {
        let limit = limit.unwrap_or(90).min(365);
        let offset = offset.unwrap_or(0);

        let logs = sqlx::query_as::<_, ProgressLog>(
            "SELECT id, user_id, entry_date, weight_kg, body_fat_pct, waist_cm, note,
                    created_at, updated_at
             FROM progress_logs WHERE user_id = $1
             ORDER BY entry_date DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        Ok(logs)
    }

    pub async fn delete_log(&self, user_id: Uuid, entry_date: NaiveDate) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM progress_logs WHERE user_id = $1 AND entry_date = $2")
                .bind(user_id)
                .bind(entry_date)
                .execute(&self.db)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn summary(&self, user_id: Uuid) -> Result<ProgressSummary> {
        let logs = self.list_logs(user_id, Some(365), None).await?;

        let targets: Option<(f64, f64)> = sqlx::query_as(
            "SELECT start_weight_kg, target_weight_kg FROM profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        let latest_weight_kg = logs.first().map(|l| l.weight_kg);
        let start_weight_kg = targets
            .map(|(start, _)| start)
            .or_else(|| logs.last().map(|l| l.weight_kg));
        let target_weight_kg = targets.map(|(_, target)| target);

        let change_kg = match (latest_weight_kg, start_weight_kg) {
            (Some(latest), Some(start)) => Some(latest - start),
            _ => None,
        };

        let recent: Vec<f64> = logs.iter().take(7).map(|l| l.weight_kg).collect();
        let moving_average_7d = if recent.is_empty() {
            None
        } else {
            Some(recent.iter().sum::<f64>() / recent.len() as f64)
        };

        let dates: Vec<NaiveDate> = logs.iter().map(|l| l.entry_date).collect();
        let logging_streak_days = current_streak(&dates, Utc::now().date_naive());

        let entries_total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM progress_logs WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.db)
                .await?;

        Ok(ProgressSummary {
            latest_weight_kg,
            start_weight_kg,
            target_weight_kg,
            change_kg,
            moving_average_7d,
            logging_streak_days,
            entries_total,
        })
    }

    /// Entry dates descending, for streak and achievement checks
    pub async fn entry_dates(&self, user_id: Uuid) -> Result<Vec<NaiveDate>> {
        let dates: Vec<NaiveDate> = sqlx::query_scalar(
            "SELECT entry_date FROM progress_logs WHERE user_id = $1 ORDER BY entry_date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(dates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_streak_empty() {
        assert_eq!(current_streak(&[], d(2024, 3, 10)), 0);
    }

    #[test]
    fn test_streak_counts_back_from_today() {
        let dates = vec![d(2024, 3, 10), d(2024, 3, 9), d(2024, 3, 8)];
        assert_eq!(current_streak(&dates, d(2024, 3, 10)), 3);
    }

    #[test]
    fn test_streak_survives_missing_today() {
        // User has not logged today yet; yesterday ends the streak window
        let dates = vec![d(2024, 3, 9), d(2024, 3, 8)];
        assert_eq!(current_streak(&dates, d(2024, 3, 10)), 2);
    }

    #[test]
    fn test_streak_broken_by_gap() {
        let dates = vec![d(2024, 3, 10), d(2024, 3, 8), d(2024, 3, 7)];
        assert_eq!(current_streak(&dates, d(2024, 3, 10)), 1);
    }

    #[test]
    fn test_streak_stale_entries() {
        let dates = vec![d(2024, 3, 1)];
        assert_eq!(current_streak(&dates, d(2024, 3, 10)), 0);
    }

    #[test]
    fn test_streak_single_today() {
        assert_eq!(current_streak(&[d(2024, 3, 10)], d(2024, 3, 10)), 1);
    }

    #[test]
    fn test_validate_weigh_in() {
        let today = d(2026, 8, 1);
        let request = UpsertProgressRequest {
            entry_date: Some(today),
            weight_kg: 82.5,
            body_fat_pct: None,
            waist_cm: None,
            note: None,
        };
        assert!(validate_weigh_in(&request, today).is_ok());

        let mut heavy = request.clone();
        heavy.weight_kg = 501.0;
        assert!(validate_weigh_in(&heavy, today).is_err());

        let mut zero = request.clone();
        zero.weight_kg = 0.0;
        assert!(validate_weigh_in(&zero, today).is_err());
    }

    #[test]
    fn test_validate_weigh_in_rejects_future_date() {
        let today = d(2026, 8, 1);
        let mut request = UpsertProgressRequest {
            entry_date: Some(d(2026, 8, 2)),
            weight_kg: 82.5,
            body_fat_pct: None,
            waist_cm: None,
            note: None,
        };
        assert!(validate_weigh_in(&request, today).is_err());

        request.entry_date = None;
        assert!(validate_weigh_in(&request, today).is_ok());
    }
}
