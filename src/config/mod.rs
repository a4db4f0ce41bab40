pub mod app;
pub mod database;

pub use app::{AppConfig, IntegrationsConfig};
pub use database::{run_migrations, DatabaseConfig};
