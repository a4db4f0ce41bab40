use anyhow::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub jwt_secret: String,
    pub integrations: IntegrationsConfig,
}

/// Endpoints and credentials for the third-party services the app wraps:
/// the LLM coach, the nutrition-lookup provider and the PDF renderer.
/// Any of them may be absent; the owning service degrades gracefully.
#[derive(Debug, Clone, Default)]
pub struct IntegrationsConfig {
    pub llm_base_url: Option<String>,
    pub llm_api_key: Option<String>,
    pub llm_model: String,
    pub nutrition_base_url: Option<String>,
    pub nutrition_api_key: Option<String>,
    pub pdf_renderer_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .unwrap_or(3000);
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let jwt_secret = env::var("JWT_SECRET")
            .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string());

        Ok(AppConfig {
            host,
            port,
            environment,
            jwt_secret,
            integrations: IntegrationsConfig::from_env(),
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl IntegrationsConfig {
    pub fn from_env() -> Self {
        IntegrationsConfig {
            llm_base_url: env::var("LLM_BASE_URL").ok(),
            llm_api_key: env::var("LLM_API_KEY").ok(),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            nutrition_base_url: env::var("NUTRITION_API_URL").ok(),
            nutrition_api_key: env::var("NUTRITION_API_KEY").ok(),
            pdf_renderer_url: env::var("PDF_RENDERER_URL").ok(),
        }
    }
}
