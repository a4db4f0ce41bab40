use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Supplement {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub dosage: f64,
    pub unit: String,
    pub time_of_day: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSupplementRequest {
    pub name: String,
    pub dosage: f64,
    pub unit: String,
    pub time_of_day: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSupplementRequest {
    pub name: Option<String>,
    pub dosage: Option<f64>,
    pub unit: Option<String>,
    pub time_of_day: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SupplementIntake {
    pub id: Uuid,
    pub supplement_id: Uuid,
    pub entry_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleIntakeRequest {
    pub entry_date: Option<NaiveDate>,
}

/// A supplement with its taken/not-taken state for one day
#[derive(Debug, Serialize)]
pub struct SupplementDayEntry {
    pub supplement: Supplement,
    pub taken: bool,
}
