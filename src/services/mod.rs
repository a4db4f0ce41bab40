// Business logic services

pub mod achievement_service;
pub mod coach_service;
pub mod daily_goal_service;
pub mod fasting_service;
pub mod llm_client;
pub mod meal_service;
pub mod mindfulness_service;
pub mod journey_service;
pub mod nutrition_client;
pub mod pdf_client;
pub mod profile_service;
pub mod progress_service;
pub mod report_service;
pub mod supplement_service;

pub use achievement_service::AchievementService;
pub use coach_service::{CoachChatError, CoachService};
pub use daily_goal_service::DailyGoalService;
pub use fasting_service::{FastingError, FastingService};
pub use llm_client::{LlmClient, LlmError};
pub use meal_service::MealService;
pub use mindfulness_service::MindfulnessService;
pub use journey_service::JourneyService;
pub use nutrition_client::{NutritionClient, NutritionError, NutritionItem};
pub use pdf_client::{PdfClient, PdfError};
pub use profile_service::ProfileService;
pub use progress_service::ProgressService;
pub use report_service::{ReportError, ReportService};
pub use supplement_service::{SupplementError, SupplementService};
