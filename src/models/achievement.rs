use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Achievement {
    pub code: String,
    pub title: String,
    pub description: String,
    pub sort_order: i32,
}

/// Catalog entry joined with the user's unlock timestamp, if any
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AchievementStatus {
    pub code: String,
    pub title: String,
    pub description: String,
    pub sort_order: i32,
    pub unlocked_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct UnlockCheckResponse {
    pub newly_unlocked: Vec<String>,
}

/// The per-user numbers achievement rules are evaluated against
#[derive(Debug, Clone, Default)]
pub struct AchievementFacts {
    pub weigh_in_count: i64,
    pub meal_count: i64,
    pub logging_streak_days: i64,
    pub fasting_streak_days: i64,
    pub weight_lost_kg: f64,
    pub mindfulness_sessions: i64,
}
