use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use metabalance::config::IntegrationsConfig;
use metabalance::services::llm_client::ChatTurn;
use metabalance::services::{
    LlmClient, LlmError, NutritionClient, NutritionError, PdfClient, PdfError,
};

fn config_with(base: &str) -> IntegrationsConfig {
    IntegrationsConfig {
        llm_base_url: Some(base.to_string()),
        llm_api_key: Some("test-llm-key".to_string()),
        llm_model: "gpt-4o-mini".to_string(),
        nutrition_base_url: Some(base.to_string()),
        nutrition_api_key: Some("test-nutrition-key".to_string()),
        pdf_renderer_url: Some(format!("{base}/render")),
    }
}

#[tokio::test]
async fn test_llm_complete_returns_assistant_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-llm-key"))
        .and(body_partial_json(json!({ "model": "gpt-4o-mini" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                { "message": { "role": "assistant", "content": "  Keep your protein up today.  " } }
            ]
        })))
        .mount(&server)
        .await;

    let client = LlmClient::new(&config_with(&server.uri()));
    let reply = client
        .complete("You are a coach.", &[ChatTurn::user("How am I doing?")])
        .await
        .unwrap();

    assert_eq!(reply, "Keep your protein up today.");
}

#[tokio::test]
async fn test_llm_provider_error_status_surfaces() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = LlmClient::new(&config_with(&server.uri()));
    let err = client.complete("system", &[ChatTurn::user("hi")]).await;

    assert!(matches!(err, Err(LlmError::Api(429))));
}

#[tokio::test]
async fn test_llm_empty_choices_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let client = LlmClient::new(&config_with(&server.uri()));
    let err = client.complete("system", &[ChatTurn::user("hi")]).await;

    assert!(matches!(err, Err(LlmError::EmptyResponse)));
}

#[tokio::test]
async fn test_llm_unconfigured_without_base_url() {
    let client = LlmClient::new(&IntegrationsConfig::default());
    let err = client.complete("system", &[]).await;

    assert!(matches!(err, Err(LlmError::Unconfigured)));
}

#[tokio::test]
async fn test_nutrition_search_normalizes_provider_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/search"))
        .and(query_param("query", "greek yogurt"))
        .and(header("x-api-key", "test-nutrition-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "foods": [
                {
                    "food_name": "Greek Yogurt",
                    "serving_qty": 170.0,
                    "serving_unit": "g",
                    "calories": 100.0,
                    "protein": 17.0,
                    "carbohydrates": 6.0,
                    "fat": 0.7
                },
                {
                    "food_name": "Greek Yogurt, whole milk",
                    "serving_qty": 1.0,
                    "serving_unit": "cup",
                    "calories": 220.0,
                    "protein": 20.0,
                    "carbohydrates": 9.0,
                    "fat": 11.0
                }
            ]
        })))
        .mount(&server)
        .await;

    let client = NutritionClient::new(&config_with(&server.uri()));
    let items = client.search("greek yogurt").await.unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name, "Greek Yogurt");
    assert_eq!(items[0].serving, "170 g");
    assert_eq!(items[0].protein_g, 17.0);
    assert_eq!(items[1].serving, "1 cup");
}

#[tokio::test]
async fn test_nutrition_provider_failure_surfaces_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = NutritionClient::new(&config_with(&server.uri()));
    let err = client.search("banana").await;

    assert!(matches!(err, Err(NutritionError::Api(500))));
}

#[tokio::test]
async fn test_nutrition_unconfigured_without_base_url() {
    let client = NutritionClient::new(&IntegrationsConfig::default());
    let err = client.search("banana").await;

    assert!(matches!(err, Err(NutritionError::Unconfigured)));
}

#[tokio::test]
async fn test_pdf_render_posts_html_and_returns_bytes() {
    let server = MockServer::start().await;
    let pdf_bytes = b"%PDF-1.7 fake".to_vec();

    Mock::given(method("POST"))
        .and(path("/render"))
        .and(body_partial_json(json!({ "html": "<h1>Progress</h1>" })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(pdf_bytes.clone()))
        .mount(&server)
        .await;

    let client = PdfClient::new(&config_with(&server.uri()));
    let bytes = client.render("<h1>Progress</h1>").await.unwrap();

    assert_eq!(bytes, pdf_bytes);
}

#[tokio::test]
async fn test_pdf_renderer_failure_surfaces_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/render"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = PdfClient::new(&config_with(&server.uri()));
    let err = client.render("<p>hi</p>").await;

    assert!(matches!(err, Err(PdfError::Api(503))));
}
