use anyhow::Result;
use chrono::{Duration, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{
    CreateEpisodeRequest, CreateSessionRequest, EatingEpisode, EpisodeSummary, MindfulnessSession,
};

pub fn validate_session_input(request: &CreateSessionRequest) -> Result<(), String> {
    if request.duration_min <= 0 || request.duration_min > 240 {
        return Err("Session duration must be between 1 and 240 minutes".to_string());
    }
    Ok(())
}

pub fn validate_episode_input(request: &CreateEpisodeRequest) -> Result<(), String> {
    if !(1..=5).contains(&request.intensity) {
        return Err("Intensity must be between 1 and 5".to_string());
    }
    if request.trigger.trim().is_empty() {
        return Err("Trigger cannot be empty".to_string());
    }
    Ok(())
}

#[derive(Clone)]
pub struct MindfulnessService {
    db: PgPool,
}

impl MindfulnessService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create_session(
        &self,
        user_id: Uuid,
        request: CreateSessionRequest,
    ) -> Result<MindfulnessSession> {
        let entry_date = request.entry_date.unwrap_or_else(|| Utc::now().date_naive());

        let session = sqlx::query_as::<_, MindfulnessSession>(
            "INSERT INTO mindfulness_sessions (id, user_id, entry_date, kind, duration_min, created_at)
             VALUES ($1, $2, $3, $4, $5, NOW())
             RETURNING id, user_id, entry_date, kind, duration_min, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(entry_date)
        .bind(request.kind.as_str())
        .bind(request.duration_min)
        .fetch_one(&self.db)
        .await?;

        Ok(session)
    }

    pub async fn list_sessions(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<MindfulnessSession>> {
        let limit = limit.unwrap_or(50).min(200);

        let sessions = sqlx::query_as::<_, MindfulnessSession>(
            "SELECT id, user_id, entry_date, kind, duration_min, created_at
             FROM mindfulness_sessions WHERE user_id = $1
             ORDER BY entry_date DESC, created_at DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(sessions)
    }

    pub async fn session_count(&self, user_id: Uuid) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM mindfulness_sessions WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.db)
                .await?;

        Ok(count)
    }

    pub async fn create_episode(
        &self,
        user_id: Uuid,
        request: CreateEpisodeRequest,
    ) -> Result<EatingEpisode> {
        let occurred_at = request.occurred_at.unwrap_or_else(Utc::now);

        let episode = sqlx::query_as::<_, EatingEpisode>(
            "INSERT INTO eating_episodes (
                id, user_id, occurred_at, trigger, intensity, food, coping_action, note, created_at
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
             RETURNING id, user_id, occurred_at, trigger, intensity, food, coping_action,
                       note, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(occurred_at)
        .bind(request.trigger.trim())
        .bind(request.intensity)
        .bind(request.food)
        .bind(request.coping_action)
        .bind(request.note)
        .fetch_one(&self.db)
        .await?;

        Ok(episode)
    }

    pub async fn list_episodes(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<EatingEpisode>> {
        let limit = limit.unwrap_or(50).min(200);

        let episodes = sqlx::query_as::<_, EatingEpisode>(
            "SELECT id, user_id, occurred_at, trigger, intensity, food, coping_action, note,
                    created_at
             FROM eating_episodes WHERE user_id = $1
             ORDER BY occurred_at DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(episodes)
    }

    pub async fn episode_summary(&self, user_id: Uuid) -> Result<EpisodeSummary> {
        let window_start = Utc::now() - Duration::days(30);

        let row = sqlx::query(
            "SELECT COUNT(*) AS episodes, AVG(intensity::float8) AS avg_intensity
             FROM eating_episodes WHERE user_id = $1 AND occurred_at >= $2",
        )
        .bind(user_id)
        .bind(window_start)
        .fetch_one(&self.db)
        .await?;

        let most_common_trigger: Option<String> = sqlx::query_scalar(
            "SELECT trigger FROM eating_episodes
             WHERE user_id = $1 AND occurred_at >= $2
             GROUP BY trigger
             ORDER BY COUNT(*) DESC, trigger
             LIMIT 1",
        )
        .bind(user_id)
        .bind(window_start)
        .fetch_optional(&self.db)
        .await?;

        Ok(EpisodeSummary {
            episodes_30d: row.get("episodes"),
            average_intensity: row.get("avg_intensity"),
            most_common_trigger,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionKind;

    #[test]
    fn test_validate_session_input() {
        let mut request = CreateSessionRequest {
            entry_date: None,
            kind: SessionKind::Breathing,
            duration_min: 10,
        };
        assert!(validate_session_input(&request).is_ok());

        request.duration_min = 0;
        assert!(validate_session_input(&request).is_err());

        request.duration_min = 241;
        assert!(validate_session_input(&request).is_err());
    }

    #[test]
    fn test_validate_episode_input() {
        let mut request = CreateEpisodeRequest {
            occurred_at: None,
            trigger: "stress".to_string(),
            intensity: 3,
            food: None,
            coping_action: None,
            note: None,
        };
        assert!(validate_episode_input(&request).is_ok());

        request.intensity = 6;
        assert!(validate_episode_input(&request).is_err());

        request.intensity = 3;
        request.trigger = "  ".to_string();
        assert!(validate_episode_input(&request).is_err());
    }
}
