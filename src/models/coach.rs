use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One turn of the coaching conversation
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CoachMessage {
    pub id: Uuid,
    pub user_id: Uuid,
    pub sender: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: CoachMessage,
}

#[derive(Debug, Serialize)]
pub struct InsightResponse {
    pub insight: String,
    pub generated_by_llm: bool,
}
