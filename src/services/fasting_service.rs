use anyhow::Result;
use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    FastingLog, FastingProtocol, FastingSchedule, FastingSummary, LogFastRequest,
    PutFastingScheduleRequest,
};
use crate::services::progress_service::current_streak;

#[derive(Error, Debug)]
pub enum FastingError {
    #[error("No fasting schedule configured")]
    ScheduleMissing,
    #[error("Unknown protocol stored for schedule: {0}")]
    UnknownProtocol(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Share of scheduled fasts that were completed, as a percentage
pub fn adherence_pct(completed: i64, logged: i64) -> f64 {
    if logged == 0 {
        return 0.0;
    }
    (completed as f64 / logged as f64) * 100.0
}

/// Rejects out-of-range fast durations before hitting the schedule lookup
pub fn validate_fast_input(request: &LogFastRequest, today: NaiveDate) -> Result<(), String> {
    if request.actual_hours < 0.0 || request.actual_hours > 48.0 {
        return Err("Fast duration must be between 0 and 48 hours".to_string());
    }
    if let Some(entry_date) = request.entry_date {
        if entry_date > today {
            return Err("Entry date cannot be in the future".to_string());
        }
    }
    Ok(())
}

#[derive(Clone)]
pub struct FastingService {
    db: PgPool,
}

impl FastingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn get_schedule(&self, user_id: Uuid) -> Result<Option<FastingSchedule>> {
        let schedule = sqlx::query_as::<_, FastingSchedule>(
            "SELECT user_id, protocol, eating_window_start_hour, created_at, updated_at
             FROM fasting_schedules WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(schedule)
    }

    pub async fn put_schedule(
        &self,
        user_id: Uuid,
        request: PutFastingScheduleRequest,
    ) -> Result<FastingSchedule> {
        let schedule = sqlx::query_as::<_, FastingSchedule>(
            "INSERT INTO fasting_schedules (
                user_id, protocol, eating_window_start_hour, created_at, updated_at
             )
             VALUES ($1, $2, $3, NOW(), NOW())
             ON CONFLICT (user_id) DO UPDATE SET
                protocol = $2, eating_window_start_hour = $3, updated_at = NOW()
             RETURNING user_id, protocol, eating_window_start_hour, created_at, updated_at",
        )
        .bind(user_id)
        .bind(request.protocol.as_str())
        .bind(request.eating_window_start_hour)
        .fetch_one(&self.db)
        .await?;

        Ok(schedule)
    }

    /// Log the fast for a day against the scheduled protocol; one per day
    pub async fn log_fast(
        &self,
        user_id: Uuid,
        request: LogFastRequest,
    ) -> Result<FastingLog, FastingError> {
        let schedule = sqlx::query_as::<_, FastingSchedule>(
            "SELECT user_id, protocol, eating_window_start_hour, created_at, updated_at
             FROM fasting_schedules WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(FastingError::ScheduleMissing)?;

        let protocol = FastingProtocol::from_str(&schedule.protocol)
            .ok_or_else(|| FastingError::UnknownProtocol(schedule.protocol.clone()))?;
        let scheduled_hours = protocol.fasting_hours();
        let completed = request.actual_hours >= scheduled_hours;
        let entry_date = request.entry_date.unwrap_or_else(|| Utc::now().date_naive());

        let log = sqlx::query_as::<_, FastingLog>(
            "INSERT INTO fasting_logs (
                id, user_id, entry_date, scheduled_hours, actual_hours, completed, created_at
             )
             VALUES ($1, $2, $3, $4, $5, $6, NOW())
             ON CONFLICT (user_id, entry_date) DO UPDATE SET
                scheduled_hours = $4, actual_hours = $5, completed = $6
             RETURNING id, user_id, entry_date, scheduled_hours, actual_hours, completed,
                       created_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(entry_date)
        .bind(scheduled_hours)
        .bind(request.actual_hours)
        .bind(completed)
        .fetch_one(&self.db)
        .await?;

        Ok(log)
    }

    pub async fn list_logs(&self, user_id: Uuid, limit: Option<i64>) -> Result<Vec<FastingLog>> {
        let limit = limit.unwrap_or(30).min(365);

        let logs = sqlx::query_as::<_, FastingLog>(
            "SELECT id, user_id, entry_date, scheduled_hours, actual_hours, completed, created_at
             FROM fasting_logs WHERE user_id = $1
             ORDER BY entry_date DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(logs)
    }

    pub async fn summary(&self, user_id: Uuid) -> Result<FastingSummary> {
        let today = Utc::now().date_naive();
        let window_start = today - Duration::days(30);

        let schedule = self.get_schedule(user_id).await?;
        let protocol = schedule
            .as_ref()
            .and_then(|s| FastingProtocol::from_str(&s.protocol));

        let recent = sqlx::query_as::<_, FastingLog>(
            "SELECT id, user_id, entry_date, scheduled_hours, actual_hours, completed, created_at
             FROM fasting_logs
             WHERE user_id = $1 AND entry_date >= $2
             ORDER BY entry_date DESC",
        )
        .bind(user_id)
        .bind(window_start)
        .fetch_all(&self.db)
        .await?;

        let fasts_logged_30d = recent.len() as i64;
        let completed_30d = recent.iter().filter(|l| l.completed).count() as i64;

        let completed_dates: Vec<NaiveDate> = recent
            .iter()
            .filter(|l| l.completed)
            .map(|l| l.entry_date)
            .collect();
        let completed_streak_days = current_streak(&completed_dates, today);

        let longest_fast_hours: Option<f64> = sqlx::query_scalar(
            "SELECT MAX(actual_hours) FROM fasting_logs WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(FastingSummary {
            protocol,
            adherence_pct_30d: adherence_pct(completed_30d, fasts_logged_30d),
            completed_streak_days,
            longest_fast_hours,
            fasts_logged_30d,
        })
    }

    /// Dates of completed fasts descending, for achievement checks
    pub async fn completed_dates(&self, user_id: Uuid) -> Result<Vec<NaiveDate>> {
        let dates: Vec<NaiveDate> = sqlx::query_scalar(
            "SELECT entry_date FROM fasting_logs
             WHERE user_id = $1 AND completed
             ORDER BY entry_date DESC",
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

    #[test]
    fn test_adherence_pct() {
        assert_eq!(adherence_pct(0, 0), 0.0);
        assert_eq!(adherence_pct(15, 30), 50.0);
        assert_eq!(adherence_pct(30, 30), 100.0);
    }

    #[test]
    fn test_protocol_hours() {
        assert_eq!(FastingProtocol::SixteenEight.fasting_hours(), 16.0);
        assert_eq!(FastingProtocol::Omad.fasting_hours(), 23.0);
    }

    #[test]
    fn test_validate_fast_input() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let ok = LogFastRequest {
            entry_date: Some(today),
            actual_hours: 16.5,
        };
        assert!(validate_fast_input(&ok, today).is_ok());

        let too_long = LogFastRequest {
            entry_date: None,
            actual_hours: 49.0,
        };
        assert!(validate_fast_input(&too_long, today).is_err());

        let future = LogFastRequest {
            entry_date: Some(today + Duration::days(2)),
            actual_hours: 16.0,
        };
        assert!(validate_fast_input(&future, today).is_err());
    }

    #[test]
    fn test_protocol_round_trip() {
        for p in [
            FastingProtocol::SixteenEight,
            FastingProtocol::EighteenSix,
            FastingProtocol::Twenty4,
            FastingProtocol::Omad,
        ] {
            assert_eq!(FastingProtocol::from_str(p.as_str()), Some(p));
        }
        assert_eq!(FastingProtocol::from_str("5:2"), None);
    }
}
