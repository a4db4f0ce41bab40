use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One weigh-in per user per day
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProgressLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub entry_date: NaiveDate,
    pub weight_kg: f64,
    pub body_fat_pct: Option<f64>,
    pub waist_cm: Option<f64>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpsertProgressRequest {
    pub entry_date: Option<NaiveDate>,
    pub weight_kg: f64,
    pub body_fat_pct: Option<f64>,
    pub waist_cm: Option<f64>,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProgressSummary {
    pub latest_weight_kg: Option<f64>,
    pub start_weight_kg: Option<f64>,
    pub target_weight_kg: Option<f64>,
    pub change_kg: Option<f64>,
    pub moving_average_7d: Option<f64>,
    pub logging_streak_days: i64,
    pub entries_total: i64,
}
