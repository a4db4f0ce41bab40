use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{CoachMessage, FastingSummary, InsightResponse, ProgressSummary};
use crate::services::llm_client::{ChatTurn, LlmClient, LlmError};
use crate::services::{FastingService, ProgressService};

const SYSTEM_PROMPT: &str = "You are MetaBalance's weight-management coach. Be supportive, \
concrete and brief. Ground advice in the user's own numbers when they are provided. Never \
give medical diagnoses; suggest a professional for anything clinical.";

/// Conversation turns sent to the provider alongside a new message
const CONTEXT_TURNS: i64 = 10;

#[derive(Clone)]
pub struct CoachService {
    db: PgPool,
    llm: LlmClient,
}

impl CoachService {
    pub fn new(db: PgPool, llm: LlmClient) -> Self {
        Self { db, llm }
    }

    /// Persist the user's message, ask the LLM for a reply, persist and
    /// return the reply. Provider failures bubble up as LlmError.
    pub async fn chat(&self, user_id: Uuid, message: &str) -> Result<CoachMessage, CoachChatError> {
        if message.trim().is_empty() {
            return Err(CoachChatError::EmptyMessage);
        }

        self.store_message(user_id, "user", message.trim())
            .await
            .map_err(CoachChatError::Internal)?;

        let history = self
            .recent_messages(user_id, CONTEXT_TURNS)
            .await
            .map_err(CoachChatError::Internal)?;

        let turns: Vec<ChatTurn> = history
            .iter()
            .rev()
            .map(|m| {
                if m.sender == "user" {
                    ChatTurn::user(m.content.clone())
                } else {
                    ChatTurn::assistant(m.content.clone())
                }
            })
            .collect();

        let reply_text = self.llm.complete(SYSTEM_PROMPT, &turns).await?;

        let reply = self
            .store_message(user_id, "coach", &reply_text)
            .await
            .map_err(CoachChatError::Internal)?;

        Ok(reply)
    }

    pub async fn history(&self, user_id: Uuid, limit: Option<i64>) -> Result<Vec<CoachMessage>> {
        self.recent_messages(user_id, limit.unwrap_or(50).min(200))
            .await
    }

    /// Short daily coaching note built from the user's recent numbers. Falls
    /// back to a deterministic template when the provider is missing or errors.
    pub async fn daily_insight(&self, user_id: Uuid) -> Result<InsightResponse> {
        let progress = ProgressService::new(self.db.clone()).summary(user_id).await?;
        let fasting = FastingService::new(self.db.clone()).summary(user_id).await?;

        let facts = insight_facts(&progress, &fasting);

        if self.llm.is_configured() {
            let prompt = format!(
                "Write a 2-3 sentence coaching note for a weight-management app user. \
                 Their recent numbers: {facts}. Encourage what is going well and name \
                 one concrete next step."
            );

            match self.llm.complete(SYSTEM_PROMPT, &[ChatTurn::user(prompt)]).await {
                Ok(insight) => {
                    return Ok(InsightResponse {
                        insight,
                        generated_by_llm: true,
                    })
                }
                Err(err) => {
                    tracing::warn!(error = %err, "LLM insight failed, using fallback");
                }
            }
        }

        Ok(InsightResponse {
            insight: fallback_insight(&progress, &fasting),
            generated_by_llm: false,
        })
    }

    async fn store_message(
        &self,
        user_id: Uuid,
        sender: &str,
        content: &str,
    ) -> Result<CoachMessage> {
        let message = sqlx::query_as::<_, CoachMessage>(
            "INSERT INTO coach_messages (id, user_id, sender, content, created_at)
             VALUES ($1, $2, $3, $4, NOW())
             RETURNING id, user_id, sender, content, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(sender)
        .bind(content)
        .fetch_one(&self.db)
        .await?;

        Ok(message)
    }

    async fn recent_messages(&self, user_id: Uuid, limit: i64) -> Result<Vec<CoachMessage>> {
        let messages = sqlx::query_as::<_, CoachMessage>(
            "SELECT id, user_id, sender, content, created_at
             FROM coach_messages WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(messages)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoachChatError {
    #[error("Message cannot be empty")]
    EmptyMessage,
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error(transparent)]
    Internal(anyhow::Error),
}

fn insight_facts(progress: &ProgressSummary, fasting: &FastingSummary) -> String {
    let mut parts = Vec::new();

    if let Some(change) = progress.change_kg {
        parts.push(format!("weight change {:+.1} kg since start", change));
    }
    parts.push(format!(
        "weigh-in streak {} days",
        progress.logging_streak_days
    ));
    if fasting.fasts_logged_30d > 0 {
        parts.push(format!(
            "fasting adherence {:.0}% over 30 days",
            fasting.adherence_pct_30d
        ));
    }

    parts.join(", ")
}

fn fallback_insight(progress: &ProgressSummary, fasting: &FastingSummary) -> String {
    let streak = progress.logging_streak_days;

    let opener = match progress.change_kg {
        Some(change) if change < -0.05 => {
            format!("You're down {:.1} kg since you started - keep it up.", -change)
        }
        Some(change) if change > 0.05 => {
            "The scale moved up a little recently; one honest week of logging usually turns that around.".to_string()
        }
        _ => "Steady as she goes - consistency beats intensity.".to_string(),
    };

    let nudge = if streak == 0 {
        "Log a weigh-in today to restart your streak.".to_string()
    } else if fasting.fasts_logged_30d > 0 && fasting.adherence_pct_30d < 50.0 {
        "Your fasting adherence has room to grow; try an easier eating window this week.".to_string()
    } else {
        format!("Your {streak}-day logging streak is your best tool - protect it today.")
    };

    format!("{opener} {nudge}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(change: Option<f64>, streak: i64) -> ProgressSummary {
        ProgressSummary {
            latest_weight_kg: Some(80.0),
            start_weight_kg: Some(85.0),
            target_weight_kg: Some(75.0),
            change_kg: change,
            moving_average_7d: Some(80.2),
            logging_streak_days: streak,
            entries_total: 40,
        }
    }

    fn fasting(adherence: f64, logged: i64) -> FastingSummary {
        FastingSummary {
            protocol: None,
            adherence_pct_30d: adherence,
            completed_streak_days: 3,
            longest_fast_hours: Some(18.5),
            fasts_logged_30d: logged,
        }
    }

    #[test]
    fn test_fallback_mentions_loss() {
        let text = fallback_insight(&progress(Some(-5.0), 10), &fasting(80.0, 20));
        assert!(text.contains("5.0 kg"));
    }

    #[test]
    fn test_fallback_nudges_restart_when_streak_zero() {
        let text = fallback_insight(&progress(None, 0), &fasting(0.0, 0));
        assert!(text.contains("restart"));
    }

    #[test]
    fn test_insight_facts_composition() {
        let facts = insight_facts(&progress(Some(-2.5), 7), &fasting(75.0, 15));
        assert!(facts.contains("-2.5 kg"));
        assert!(facts.contains("7 days"));
        assert!(facts.contains("75%"));
    }
}
