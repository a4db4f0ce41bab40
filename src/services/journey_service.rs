use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{AdvanceResponse, JourneyPhase, JourneyResponse, JourneyState};
use crate::services::DailyGoalService;

/// Minimum days in a phase before advancing
pub const MIN_DAYS_IN_PHASE: i64 = 14;
/// Minimum daily-goal completion over those days
pub const MIN_GOAL_COMPLETION_PCT: f64 = 60.0;

/// Advancement rule: enough time in phase, enough adherence, and a next
/// phase to advance into. Phases never regress automatically.
pub fn eligible_to_advance(
    phase: JourneyPhase,
    days_in_phase: i64,
    goal_completion_pct: f64,
) -> bool {
    phase.next().is_some()
        && days_in_phase >= MIN_DAYS_IN_PHASE
        && goal_completion_pct >= MIN_GOAL_COMPLETION_PCT
}

#[derive(Clone)]
pub struct JourneyService {
    db: PgPool,
}

impl JourneyService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Current journey state, created at `kickstart` on first read
    pub async fn get_state(&self, user_id: Uuid) -> Result<JourneyState> {
        let state = sqlx::query_as::<_, JourneyState>(
            "INSERT INTO journey_states (user_id, phase, phase_started_at, updated_at)
             VALUES ($1, $2, $3, NOW())
             ON CONFLICT (user_id) DO UPDATE SET user_id = journey_states.user_id
             RETURNING user_id, phase, phase_started_at, updated_at",
        )
        .bind(user_id)
        .bind(JourneyPhase::Kickstart.as_str())
        .bind(Utc::now().date_naive())
        .fetch_one(&self.db)
        .await?;

        Ok(state)
    }

    pub async fn journey(&self, user_id: Uuid) -> Result<JourneyResponse> {
        let state = self.get_state(user_id).await?;
        let phase = JourneyPhase::from_str(&state.phase)
            .ok_or_else(|| anyhow::anyhow!("Unknown journey phase: {}", state.phase))?;

        let today = Utc::now().date_naive();
        let days_in_phase = days_between(state.phase_started_at, today);

        let goals = DailyGoalService::new(self.db.clone());
        let goal_completion_pct = goals
            .completion_over_window(user_id, state.phase_started_at, today)
            .await?;

        Ok(JourneyResponse {
            phase,
            phase_started_at: state.phase_started_at,
            days_in_phase,
            goal_completion_pct,
            eligible_to_advance: eligible_to_advance(phase, days_in_phase, goal_completion_pct),
        })
    }

    /// Advance into the next phase when the rule allows it. Evaluation only
    /// happens here, on demand; nothing moves the phase in the background.
    pub async fn advance(&self, user_id: Uuid) -> Result<AdvanceResponse> {
        let journey = self.journey(user_id).await?;

        if !journey.eligible_to_advance {
            return Ok(AdvanceResponse {
                advanced: false,
                phase: journey.phase,
            });
        }

        // eligible_to_advance implies a next phase exists
        let next = journey
            .phase
            .next()
            .ok_or_else(|| anyhow::anyhow!("No phase after {}", journey.phase.as_str()))?;

        sqlx::query(
            "UPDATE journey_states
             SET phase = $2, phase_started_at = $3, updated_at = NOW()
             WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(next.as_str())
        .bind(Utc::now().date_naive())
        .execute(&self.db)
        .await?;

        tracing::info!(user_id = %user_id, phase = next.as_str(), "journey phase advanced");

        Ok(AdvanceResponse {
            advanced: true,
            phase: next,
        })
    }
}

fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days().max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_progression() {
        assert_eq!(JourneyPhase::Kickstart.next(), Some(JourneyPhase::FatBurn));
        assert_eq!(JourneyPhase::FatBurn.next(), Some(JourneyPhase::Stabilize));
        assert_eq!(JourneyPhase::Stabilize.next(), Some(JourneyPhase::Maintain));
        assert_eq!(JourneyPhase::Maintain.next(), None);
    }

    #[test]
    fn test_advancement_rule() {
        // Needs both enough days and enough adherence
        assert!(eligible_to_advance(JourneyPhase::Kickstart, 14, 60.0));
        assert!(!eligible_to_advance(JourneyPhase::Kickstart, 13, 95.0));
        assert!(!eligible_to_advance(JourneyPhase::Kickstart, 30, 59.9));
    }

    #[test]
    fn test_maintain_is_terminal() {
        assert!(!eligible_to_advance(JourneyPhase::Maintain, 100, 100.0));
    }

    #[test]
    fn test_days_between_never_negative() {
        let a = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        assert_eq!(days_between(a, b), 14);
        assert_eq!(days_between(b, a), 0);
    }
}
