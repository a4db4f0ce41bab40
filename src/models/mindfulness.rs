use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Breathing,
    Meditation,
    BodyScan,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Breathing => "breathing",
            SessionKind::Meditation => "meditation",
            SessionKind::BodyScan => "body_scan",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "breathing" => Some(SessionKind::Breathing),
            "meditation" => Some(SessionKind::Meditation),
            "body_scan" => Some(SessionKind::BodyScan),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MindfulnessSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub entry_date: NaiveDate,
    pub kind: String,
    pub duration_min: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub entry_date: Option<NaiveDate>,
    pub kind: SessionKind,
    pub duration_min: i32,
}

/// An emotional-eating episode the user chose to record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EatingEpisode {
    pub id: Uuid,
    pub user_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub trigger: String,
    pub intensity: i32,
    pub food: Option<String>,
    pub coping_action: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateEpisodeRequest {
    pub occurred_at: Option<DateTime<Utc>>,
    pub trigger: String,
    pub intensity: i32,
    pub food: Option<String>,
    pub coping_action: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EpisodeSummary {
    pub episodes_30d: i64,
    pub average_intensity: Option<f64>,
    pub most_common_trigger: Option<String>,
}
