//! Gemini API client
//!
//! One long-lived reqwest::Client is shared by every credential-bound handle,
//! so rotating keys never tears down the connection pool.

use super::{Credential, Oracle, OracleConnector, OracleResponse};
use crate::error::AssistantError;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Creates Gemini handles over a shared HTTP client
pub struct GeminiConnector {
    client: Client,
    base_url: String,
}

impl GeminiConnector {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .build()?;

        Ok(Self {
            client,
            base_url: GEMINI_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl OracleConnector for GeminiConnector {
    fn connect(&self, credential: &Credential) -> Box<dyn Oracle> {
        Box::new(GeminiClient {
            client: self.client.clone(),
            credential: credential.clone(),
            base_url: self.base_url.clone(),
        })
    }
}

/// Gemini handle bound to a single API key
pub struct GeminiClient {
    client: Client,
    credential: Credential,
    base_url: String,
}

impl GeminiClient {
    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.base_url,
            model,
            self.credential.secret()
        )
    }
}

#[async_trait]
impl Oracle for GeminiClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<OracleResponse> {
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.2,
                top_p: 0.9,
                top_k: 40,
                max_output_tokens: 1024,
            },
        };

        debug!(model, key = %self.credential.masked(), "Calling Gemini API");

        let response = self
            .client
            .post(self.endpoint(model))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                // reqwest errors embed the URL, which carries the key
                let e = e.without_url();
                error!("Gemini API request failed: {}", e);
                AssistantError::OracleCall(format!("request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(%status, body = %error_text, "Gemini API error response");
            return Err(AssistantError::OracleCall(format!(
                "Gemini returned status {}",
                status
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Gemini response: {}", e.without_url());
            AssistantError::OracleCall("unreadable Gemini response".to_string())
        })?;

        let text = extract_text(gemini_response)?;
        debug!(chars = text.len(), "Gemini response received");

        Ok(OracleResponse { text })
    }
}

/// First text part of the first candidate
fn extract_text(response: GeminiResponse) -> Result<String> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| AssistantError::OracleCall("No response from Gemini API".to_string()))?;

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if reason != "STOP" {
            debug!(finish_reason = reason, "Gemini stopped early");
        }
    }

    candidate
        .content
        .and_then(|c| c.parts.into_iter().next())
        .map(|p| p.text)
        .ok_or_else(|| AssistantError::OracleCall("Empty response from Gemini".to_string()))
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: i32,
    max_output_tokens: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}
