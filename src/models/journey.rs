use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The 4-phase weight-management journey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JourneyPhase {
    Kickstart,
    FatBurn,
    Stabilize,
    Maintain,
}

impl JourneyPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            JourneyPhase::Kickstart => "kickstart",
            JourneyPhase::FatBurn => "fat_burn",
            JourneyPhase::Stabilize => "stabilize",
            JourneyPhase::Maintain => "maintain",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "kickstart" => Some(JourneyPhase::Kickstart),
            "fat_burn" => Some(JourneyPhase::FatBurn),
            "stabilize" => Some(JourneyPhase::Stabilize),
            "maintain" => Some(JourneyPhase::Maintain),
            _ => None,
        }
    }

    /// The phase that follows this one; `maintain` is terminal
    pub fn next(&self) -> Option<JourneyPhase> {
        match self {
            JourneyPhase::Kickstart => Some(JourneyPhase::FatBurn),
            JourneyPhase::FatBurn => Some(JourneyPhase::Stabilize),
            JourneyPhase::Stabilize => Some(JourneyPhase::Maintain),
            JourneyPhase::Maintain => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JourneyState {
    pub user_id: Uuid,
    pub phase: String,
    pub phase_started_at: NaiveDate,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct JourneyResponse {
    pub phase: JourneyPhase,
    pub phase_started_at: NaiveDate,
    pub days_in_phase: i64,
    pub goal_completion_pct: f64,
    pub eligible_to_advance: bool,
}

#[derive(Debug, Serialize)]
pub struct AdvanceResponse {
    pub advanced: bool,
    pub phase: JourneyPhase,
}
