//! Gemini API client implementation
//!
//! Implements the TextGenerator trait for the `generateContent` endpoint with
//! a JSON response schema. Each call is a single HTTP request.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

use super::{GeneratorError, TextGenerator};
use crate::config::GeneratorConfig;

/// Gemini API client
pub struct GeminiClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
}

impl GeminiClient {
    /// Create a new client from configuration
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, GeneratorError> {
        debug!(model = %config.model, base_url = %config.base_url, "from_config: called");
        Self::new(
            config.model.clone(),
            config.get_api_key(),
            config.base_url.clone(),
            config.timeout(),
        )
    }

    pub fn new(model: String, api_key: String, base_url: String, timeout: Duration) -> Result<Self, GeneratorError> {
        let http = Client::builder().timeout(timeout).build().map_err(GeneratorError::Network)?;
        Ok(Self {
            model,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Endpoint URL without the key query parameter (safe to log)
    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// Build the request body for the generateContent API
    fn build_request_body(prompt: &str, schema: &Value) -> Value {
        debug!(prompt_len = prompt.len(), "build_request_body: called");
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }],
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema,
            },
        })
    }

    /// Pull the generated JSON out of the response envelope
    fn parse_response(api_response: GeminiResponse) -> Result<Value, GeneratorError> {
        let text = api_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| GeneratorError::InvalidResponse("response has no candidate text".to_string()))?;

        debug!(text_len = text.len(), "parse_response: extracted candidate text");
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<Value, GeneratorError> {
        let endpoint = self.endpoint();
        debug!(%endpoint, "generate: called");
        let body = Self::build_request_body(prompt, schema);

        let response = self
            .http
            .post(&endpoint)
            .query(&[("key", self.api_key.as_str())])
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GeneratorError::Network(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "generate: API error");
            return Err(GeneratorError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let api_response: GeminiResponse = response.json().await.map_err(|e| GeneratorError::Network(e.without_url()))?;
        debug!("generate: success");
        Self::parse_response(api_response)
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GeminiClient {
        GeminiClient::new(
            "gemini-test".to_string(),
            "secret".to_string(),
            "https://example.test/".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn envelope(text: &str) -> GeminiResponse {
        serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        }))
        .unwrap()
    }

    #[test]
    fn test_endpoint_has_no_key() {
        let endpoint = client().endpoint();
        assert_eq!(
            endpoint,
            "https://example.test/v1beta/models/gemini-test:generateContent"
        );
        assert!(!endpoint.contains("secret"));
    }

    #[test]
    fn test_build_request_body() {
        let schema = json!({"type": "OBJECT"});
        let body = GeminiClient::build_request_body("Olá", &schema);

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Olá");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"], schema);
    }

    #[test]
    fn test_parse_response_extracts_embedded_json() {
        let value = GeminiClient::parse_response(envelope(r#"{"title": "Funções"}"#)).unwrap();
        assert_eq!(value, json!({"title": "Funções"}));
    }

    #[test]
    fn test_parse_response_without_candidates() {
        let response: GeminiResponse = serde_json::from_value(json!({})).unwrap();
        let err = GeminiClient::parse_response(response).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidResponse(_)));
    }

    #[test]
    fn test_parse_response_without_parts() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [] } }]
        }))
        .unwrap();
        assert!(matches!(
            GeminiClient::parse_response(response),
            Err(GeneratorError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_parse_response_with_non_json_text() {
        let err = GeminiClient::parse_response(envelope("not json")).unwrap_err();
        assert!(matches!(err, GeneratorError::Json(_)));
    }
}
