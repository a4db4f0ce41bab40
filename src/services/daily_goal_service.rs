use anyhow::Result;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{DailyGoal, DailyGoalsResponse, GoalKind};

/// Checked goals over total, as a percentage
pub fn completion_pct(goals: &[DailyGoal]) -> f64 {
    if goals.is_empty() {
        return 0.0;
    }
    let completed = goals.iter().filter(|g| g.completed).count();
    (completed as f64 / goals.len() as f64) * 100.0
}

#[derive(Clone)]
pub struct DailyGoalService {
    db: PgPool,
}

impl DailyGoalService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// The day's checklist. Missing rows are created unchecked on read, so
    /// the client always sees the full set of goal kinds.
    pub async fn get_day(&self, user_id: Uuid, date: NaiveDate) -> Result<DailyGoalsResponse> {
        for kind in GoalKind::ALL {
            sqlx::query(
                "INSERT INTO daily_goals (id, user_id, entry_date, kind, completed, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, false, NOW(), NOW())
                 ON CONFLICT (user_id, entry_date, kind) DO NOTHING",
            )
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(date)
            .bind(kind.as_str())
            .execute(&self.db)
            .await?;
        }

        let goals = sqlx::query_as::<_, DailyGoal>(
            "SELECT id, user_id, entry_date, kind, completed, created_at, updated_at
             FROM daily_goals WHERE user_id = $1 AND entry_date = $2
             ORDER BY kind",
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(&self.db)
        .await?;

        let completion_pct = completion_pct(&goals);

        Ok(DailyGoalsResponse {
            date,
            goals,
            completion_pct,
        })
    }

    /// Flip one goal; toggling twice returns it to the original state
    pub async fn toggle(&self, user_id: Uuid, date: NaiveDate, kind: GoalKind) -> Result<DailyGoal> {
        let goal = sqlx::query_as::<_, DailyGoal>(
            "INSERT INTO daily_goals (id, user_id, entry_date, kind, completed, created_at, updated_at)
             VALUES ($1, $2, $3, $4, true, NOW(), NOW())
             ON CONFLICT (user_id, entry_date, kind) DO UPDATE SET
                completed = NOT daily_goals.completed, updated_at = NOW()
             RETURNING id, user_id, entry_date, kind, completed, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(date)
        .bind(kind.as_str())
        .fetch_one(&self.db)
        .await?;

        Ok(goal)
    }

    /// Average completion over a date window, for journey advancement
    pub async fn completion_over_window(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<f64> {
        let row: (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*) FILTER (WHERE completed), COUNT(*)
             FROM daily_goals
             WHERE user_id = $1 AND entry_date BETWEEN $2 AND $3",
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.db)
        .await?;

        let (completed, total) = row;
        if total == 0 {
            return Ok(0.0);
        }
        Ok((completed as f64 / total as f64) * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn goal(kind: GoalKind, completed: bool) -> DailyGoal {
        DailyGoal {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            entry_date: NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
            kind: kind.as_str().to_string(),
            completed,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_completion_pct() {
        assert_eq!(completion_pct(&[]), 0.0);

        let goals = vec![
            goal(GoalKind::CaloriesLogged, true),
            goal(GoalKind::WeightLogged, true),
            goal(GoalKind::FastCompleted, false),
            goal(GoalKind::WaterTarget, false),
        ];
        assert_eq!(completion_pct(&goals), 50.0);
    }

    #[test]
    fn test_goal_kind_round_trip() {
        for kind in GoalKind::ALL {
            assert_eq!(GoalKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(GoalKind::from_str("steps"), None);
    }
}
