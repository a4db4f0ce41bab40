use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{AchievementStatus, FastingSummary, ProgressLog, ProgressSummary};
use crate::services::pdf_client::{PdfClient, PdfError};
use crate::services::{AchievementService, FastingService, ProgressService};

#[derive(Clone)]
pub struct ReportService {
    db: PgPool,
    pdf: PdfClient,
}

impl ReportService {
    pub fn new(db: PgPool, pdf: PdfClient) -> Self {
        Self { db, pdf }
    }

    /// Assemble the progress report and render it to PDF
    pub async fn progress_report_pdf(&self, user_id: Uuid) -> Result<Vec<u8>, ReportError> {
        if !self.pdf.is_configured() {
            return Err(ReportError::RendererUnavailable);
        }

        let progress_service = ProgressService::new(self.db.clone());
        let summary = progress_service
            .summary(user_id)
            .await
            .map_err(ReportError::Internal)?;
        let logs = progress_service
            .list_logs(user_id, Some(90), None)
            .await
            .map_err(ReportError::Internal)?;
        let fasting = FastingService::new(self.db.clone())
            .summary(user_id)
            .await
            .map_err(ReportError::Internal)?;
        let achievements = AchievementService::new(self.db.clone())
            .list_for_user(user_id)
            .await
            .map_err(ReportError::Internal)?;

        let html = render_report_html(&summary, &logs, &fasting, &achievements);
        let pdf = self.pdf.render(&html).await?;

        Ok(pdf)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("PDF renderer is not available")]
    RendererUnavailable,
    #[error(transparent)]
    Pdf(#[from] PdfError),
    #[error(transparent)]
    Internal(anyhow::Error),
}

fn render_report_html(
    summary: &ProgressSummary,
    logs: &[ProgressLog],
    fasting: &FastingSummary,
    achievements: &[AchievementStatus],
) -> String {
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    html.push_str("<style>body{font-family:sans-serif;margin:2em}h1{color:#2a6}table{border-collapse:collapse}td,th{border:1px solid #ccc;padding:4px 10px}</style>");
    html.push_str("</head><body>");
    html.push_str("<h1>MetaBalance Progress Report</h1>");
    html.push_str(&format!(
        "<p>Generated {}</p>",
        Utc::now().format("%Y-%m-%d")
    ));

    html.push_str("<h2>Summary</h2><table>");
    if let Some(latest) = summary.latest_weight_kg {
        html.push_str(&format!("<tr><th>Current weight</th><td>{latest:.1} kg</td></tr>"));
    }
    if let Some(change) = summary.change_kg {
        html.push_str(&format!("<tr><th>Change</th><td>{change:+.1} kg</td></tr>"));
    }
    if let Some(target) = summary.target_weight_kg {
        html.push_str(&format!("<tr><th>Target</th><td>{target:.1} kg</td></tr>"));
    }
    html.push_str(&format!(
        "<tr><th>Logging streak</th><td>{} days</td></tr>",
        summary.logging_streak_days
    ));
    html.push_str(&format!(
        "<tr><th>Fasting adherence (30d)</th><td>{:.0}%</td></tr>",
        fasting.adherence_pct_30d
    ));
    html.push_str("</table>");

    html.push_str("<h2>Weigh-ins</h2><table><tr><th>Date</th><th>Weight</th></tr>");
    for log in logs {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{:.1} kg</td></tr>",
            log.entry_date, log.weight_kg
        ));
    }
    html.push_str("</table>");

    let unlocked: Vec<&AchievementStatus> = achievements
        .iter()
        .filter(|a| a.unlocked_at.is_some())
        .collect();
    if !unlocked.is_empty() {
        html.push_str("<h2>Achievements</h2><ul>");
        for a in unlocked {
            html.push_str(&format!("<li>{} - {}</li>", a.title, a.description));
        }
        html.push_str("</ul>");
    }

    html.push_str("</body></html>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_html_contains_key_numbers() {
        let summary = ProgressSummary {
            latest_weight_kg: Some(78.4),
            start_weight_kg: Some(85.0),
            target_weight_kg: Some(75.0),
            change_kg: Some(-6.6),
            moving_average_7d: Some(78.6),
            logging_streak_days: 12,
            entries_total: 60,
        };
        let fasting = FastingSummary {
            protocol: None,
            adherence_pct_30d: 83.0,
            completed_streak_days: 5,
            longest_fast_hours: Some(19.0),
            fasts_logged_30d: 24,
        };

        let html = render_report_html(&summary, &[], &fasting, &[]);
        assert!(html.contains("78.4 kg"));
        assert!(html.contains("-6.6 kg"));
        assert!(html.contains("12 days"));
        assert!(html.contains("83%"));
        // No unlocked achievements, so the section is omitted
        assert!(!html.contains("<h2>Achievements</h2>"));
    }
}
