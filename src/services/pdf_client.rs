//! PDF renderer client
//!
//! Sends assembled HTML to an external HTML-to-PDF rendering service and
//! returns the PDF bytes.

use reqwest::Client;
use serde_json::json;
use thiserror::Error;

use crate::config::IntegrationsConfig;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("PDF renderer is not configured")]
    Unconfigured,
    #[error("PDF render request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("PDF renderer returned status {0}")]
    Api(u16),
}

#[derive(Clone)]
pub struct PdfClient {
    client: Client,
    renderer_url: Option<String>,
}

impl PdfClient {
    pub fn new(config: &IntegrationsConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            renderer_url: config.pdf_renderer_url.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.renderer_url.is_some()
    }

    pub async fn render(&self, html: &str) -> Result<Vec<u8>, PdfError> {
        let url = self.renderer_url.as_ref().ok_or(PdfError::Unconfigured)?;

        let response = self
            .client
            .post(url)
            .json(&json!({ "html": html }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PdfError::Api(response.status().as_u16()));
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}
