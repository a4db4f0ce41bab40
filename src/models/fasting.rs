use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Intermittent-fasting protocols, named fast:eat hours. The wire and DB
/// representation is the protocol string itself ("16:8", "omad", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FastingProtocol {
    #[serde(rename = "16:8")]
    SixteenEight,
    #[serde(rename = "18:6")]
    EighteenSix,
    #[serde(rename = "20:4")]
    Twenty4,
    #[serde(rename = "omad")]
    Omad,
}

impl FastingProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            FastingProtocol::SixteenEight => "16:8",
            FastingProtocol::EighteenSix => "18:6",
            FastingProtocol::Twenty4 => "20:4",
            FastingProtocol::Omad => "omad",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "16:8" => Some(FastingProtocol::SixteenEight),
            "18:6" => Some(FastingProtocol::EighteenSix),
            "20:4" => Some(FastingProtocol::Twenty4),
            "omad" => Some(FastingProtocol::Omad),
            _ => None,
        }
    }

    /// Fasting hours the protocol schedules per day
    pub fn fasting_hours(&self) -> f64 {
        match self {
            FastingProtocol::SixteenEight => 16.0,
            FastingProtocol::EighteenSix => 18.0,
            FastingProtocol::Twenty4 => 20.0,
            FastingProtocol::Omad => 23.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FastingSchedule {
    pub user_id: Uuid,
    pub protocol: String,
    pub eating_window_start_hour: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct PutFastingScheduleRequest {
    pub protocol: FastingProtocol,
    pub eating_window_start_hour: i32,
}

/// One fast per user per day
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FastingLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub entry_date: NaiveDate,
    pub scheduled_hours: f64,
    pub actual_hours: f64,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct LogFastRequest {
    pub entry_date: Option<NaiveDate>,
    pub actual_hours: f64,
}

#[derive(Debug, Serialize)]
pub struct FastingSummary {
    pub protocol: Option<FastingProtocol>,
    pub adherence_pct_30d: f64,
    pub completed_streak_days: i64,
    pub longest_fast_hours: Option<f64>,
    pub fasts_logged_30d: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_wire_format_matches_storage_format() {
        let protocols = [
            FastingProtocol::SixteenEight,
            FastingProtocol::EighteenSix,
            FastingProtocol::Twenty4,
            FastingProtocol::Omad,
        ];

        for protocol in protocols {
            let json = serde_json::to_string(&protocol).unwrap();
            assert_eq!(json, format!("\"{}\"", protocol.as_str()));

            let parsed: FastingProtocol = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, protocol);
            assert_eq!(FastingProtocol::from_str(protocol.as_str()), Some(protocol));
        }
    }

    #[test]
    fn test_protocol_rejects_unknown_strings() {
        assert!(serde_json::from_str::<FastingProtocol>("\"14:10\"").is_err());
        assert_eq!(FastingProtocol::from_str("14:10"), None);
    }
}
