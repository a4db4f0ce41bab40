use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The checklist items shown on the daily dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    CaloriesLogged,
    WeightLogged,
    FastCompleted,
    WaterTarget,
    SupplementsTaken,
    Mindfulness,
}

impl GoalKind {
    pub const ALL: [GoalKind; 6] = [
        GoalKind::CaloriesLogged,
        GoalKind::WeightLogged,
        GoalKind::FastCompleted,
        GoalKind::WaterTarget,
        GoalKind::SupplementsTaken,
        GoalKind::Mindfulness,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalKind::CaloriesLogged => "calories_logged",
            GoalKind::WeightLogged => "weight_logged",
            GoalKind::FastCompleted => "fast_completed",
            GoalKind::WaterTarget => "water_target",
            GoalKind::SupplementsTaken => "supplements_taken",
            GoalKind::Mindfulness => "mindfulness",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "calories_logged" => Some(GoalKind::CaloriesLogged),
            "weight_logged" => Some(GoalKind::WeightLogged),
            "fast_completed" => Some(GoalKind::FastCompleted),
            "water_target" => Some(GoalKind::WaterTarget),
            "supplements_taken" => Some(GoalKind::SupplementsTaken),
            "mindfulness" => Some(GoalKind::Mindfulness),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyGoal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub entry_date: NaiveDate,
    pub kind: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleGoalRequest {
    pub entry_date: Option<NaiveDate>,
    pub kind: GoalKind,
}

#[derive(Debug, Serialize)]
pub struct DailyGoalsResponse {
    pub date: NaiveDate,
    pub goals: Vec<DailyGoal>,
    pub completion_pct: f64,
}
