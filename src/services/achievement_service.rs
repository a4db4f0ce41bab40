use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{AchievementFacts, AchievementStatus};
use crate::services::progress_service::current_streak;
use crate::services::{FastingService, MealService, MindfulnessService, ProgressService};

/// Evaluate every achievement rule against the user's numbers and return the
/// codes that hold. Unlock inserts are idempotent, so re-reporting an earned
/// code is harmless.
pub fn earned_codes(facts: &AchievementFacts) -> Vec<&'static str> {
    let mut earned = Vec::new();

    if facts.weigh_in_count >= 1 {
        earned.push("first_weigh_in");
    }
    if facts.meal_count >= 1 {
        earned.push("first_meal");
    }
    if facts.logging_streak_days >= 7 {
        earned.push("streak_7");
    }
    if facts.logging_streak_days >= 30 {
        earned.push("streak_30");
    }
    if facts.weight_lost_kg >= 5.0 {
        earned.push("lost_5kg");
    }
    if facts.weight_lost_kg >= 10.0 {
        earned.push("lost_10kg");
    }
    if facts.fasting_streak_days >= 7 {
        earned.push("fasting_streak_7");
    }
    if facts.mindfulness_sessions >= 10 {
        earned.push("mindful_10");
    }

    earned
}

#[derive(Clone)]
pub struct AchievementService {
    db: PgPool,
}

impl AchievementService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Catalog with the user's unlock timestamps
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<AchievementStatus>> {
        let achievements = sqlx::query_as::<_, AchievementStatus>(
            "SELECT a.code, a.title, a.description, a.sort_order, ua.unlocked_at
             FROM achievements a
             LEFT JOIN user_achievements ua ON ua.code = a.code AND ua.user_id = $1
             ORDER BY a.sort_order",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(achievements)
    }

    /// Gather the user's numbers, run the rules, insert unseen unlocks.
    /// Returns only the codes unlocked by this check.
    pub async fn run_unlock_check(&self, user_id: Uuid) -> Result<Vec<String>> {
        let facts = self.gather_facts(user_id).await?;
        let earned = earned_codes(&facts);

        let mut newly_unlocked = Vec::new();
        for code in earned {
            let inserted = sqlx::query(
                "INSERT INTO user_achievements (user_id, code, unlocked_at)
                 VALUES ($1, $2, NOW())
                 ON CONFLICT (user_id, code) DO NOTHING",
            )
            .bind(user_id)
            .bind(code)
            .execute(&self.db)
            .await?;

            if inserted.rows_affected() > 0 {
                tracing::info!(user_id = %user_id, code, "achievement unlocked");
                newly_unlocked.push(code.to_string());
            }
        }

        Ok(newly_unlocked)
    }

    async fn gather_facts(&self, user_id: Uuid) -> Result<AchievementFacts> {
        let progress = ProgressService::new(self.db.clone());
        let meals = MealService::new(self.db.clone());
        let fasting = FastingService::new(self.db.clone());
        let mindfulness = MindfulnessService::new(self.db.clone());

        let today = Utc::now().date_naive();

        let weigh_in_dates = progress.entry_dates(user_id).await?;
        let summary = progress.summary(user_id).await?;
        let fasting_dates = fasting.completed_dates(user_id).await?;

        let weight_lost_kg = match (summary.start_weight_kg, summary.latest_weight_kg) {
            (Some(start), Some(latest)) => (start - latest).max(0.0),
            _ => 0.0,
        };

        Ok(AchievementFacts {
            weigh_in_count: weigh_in_dates.len() as i64,
            meal_count: meals.meal_count(user_id).await?,
            logging_streak_days: current_streak(&weigh_in_dates, today),
            fasting_streak_days: current_streak(&fasting_dates, today),
            weight_lost_kg,
            mindfulness_sessions: mindfulness.session_count(user_id).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_achievements_for_new_user() {
        let facts = AchievementFacts::default();
        assert!(earned_codes(&facts).is_empty());
    }

    #[test]
    fn test_first_actions_unlock() {
        let facts = AchievementFacts {
            weigh_in_count: 1,
            meal_count: 1,
            ..Default::default()
        };
        let earned = earned_codes(&facts);
        assert!(earned.contains(&"first_weigh_in"));
        assert!(earned.contains(&"first_meal"));
        assert!(!earned.contains(&"streak_7"));
    }

    #[test]
    fn test_streak_thresholds_are_exact() {
        let mut facts = AchievementFacts {
            logging_streak_days: 6,
            ..Default::default()
        };
        assert!(!earned_codes(&facts).contains(&"streak_7"));

        facts.logging_streak_days = 7;
        let earned = earned_codes(&facts);
        assert!(earned.contains(&"streak_7"));
        assert!(!earned.contains(&"streak_30"));

        facts.logging_streak_days = 30;
        assert!(earned_codes(&facts).contains(&"streak_30"));
    }

    #[test]
    fn test_weight_loss_thresholds() {
        let facts = AchievementFacts {
            weight_lost_kg: 5.0,
            ..Default::default()
        };
        let earned = earned_codes(&facts);
        assert!(earned.contains(&"lost_5kg"));
        assert!(!earned.contains(&"lost_10kg"));

        let facts = AchievementFacts {
            weight_lost_kg: 12.5,
            ..Default::default()
        };
        let earned = earned_codes(&facts);
        assert!(earned.contains(&"lost_5kg"));
        assert!(earned.contains(&"lost_10kg"));
    }

    #[test]
    fn test_fasting_and_mindfulness_rules() {
        let facts = AchievementFacts {
            fasting_streak_days: 7,
            mindfulness_sessions: 10,
            ..Default::default()
        };
        let earned = earned_codes(&facts);
        assert!(earned.contains(&"fasting_streak_7"));
        assert!(earned.contains(&"mindful_10"));
    }
}
