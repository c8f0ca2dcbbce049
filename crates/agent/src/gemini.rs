use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use lagobot_core::config::LlmConfig;
use lagobot_core::LlmClient;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Text-only client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: SecretString,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.expose_secret().trim().is_empty())
            .context("llm.api_key is not configured")?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("building gemini http client")?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            model: config.model.clone(),
        })
    }

    /// Points the client at a different API host. Test hook.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, system_instruction: &str, user_text: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(user_text)],
            system_instruction: Some(Content::system(system_instruction)),
        };

        let url = format!(
            "{}/{}:generateContent?key={}",
            self.base_url,
            self.model,
            self.api_key.expose_secret()
        );
        debug!(model = %self.model, chars = user_text.len(), "sending generateContent request");

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("gemini request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "<unreadable body>".to_string());
            bail!("gemini returned status {status}: {body}");
        }

        let parsed: GenerateContentResponse =
            response.json().await.context("decoding gemini response")?;
        extract_text(parsed)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

impl Content {
    fn user(text: &str) -> Self {
        Self { role: "user".to_string(), parts: vec![Part { text: text.to_string() }] }
    }

    fn system(text: &str) -> Self {
        Self { role: "system".to_string(), parts: vec![Part { text: text.to_string() }] }
    }
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

fn extract_text(response: GenerateContentResponse) -> Result<String> {
    let text = response
        .candidates
        .into_iter()
        .filter_map(|candidate| candidate.content)
        .flat_map(|content| content.parts)
        .map(|part| part.text)
        .collect::<Vec<_>>()
        .join("");

    if text.trim().is_empty() {
        return Err(anyhow!("gemini response contained no text"));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_camel_case_system_instruction() {
        let request = GenerateContentRequest {
            contents: vec![Content::user("hola")],
            system_instruction: Some(Content::system("eres un asistente")),
        };

        let json = serde_json::to_value(&request).expect("serialize request");

        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hola");
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "eres un asistente");
    }

    #[test]
    fn response_text_is_joined_across_parts() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Hola 👋 " }, { "text": "¿qué buscas?" }] }
            }]
        }))
        .expect("decode response");

        assert_eq!(extract_text(response).expect("text"), "Hola 👋 ¿qué buscas?");
    }

    #[test]
    fn empty_candidates_are_an_error() {
        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({})).expect("decode response");

        assert!(extract_text(response).is_err());
    }
}
