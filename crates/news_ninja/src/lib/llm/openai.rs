use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{LanguageModel, Prompt};

/// Client for any OpenAI-compatible chat completion API (Groq by default).
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OpenAIError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Completion contained no content")]
    EmptyCompletion,
}

impl OpenAIClient {
    pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
    pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
    const TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(api_key: impl Into<String>) -> Result<Self, OpenAIError> {
        let client = Client::builder().timeout(Self::TIMEOUT).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: Self::GROQ_BASE_URL.into(),
            model: Self::DEFAULT_MODEL.into(),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub async fn send_completion_request(
        &self,
        prompt: &Prompt,
    ) -> Result<CompletionResponse, OpenAIError> {
        let body = CompletionRequest {
            model: &self.model,
            messages: [
                RequestMessage {
                    role: "system",
                    content: &prompt.system,
                },
                RequestMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: prompt.temperature,
            max_tokens: prompt.max_tokens,
        };

        let resp = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.base_url.trim_end_matches('/')
            ))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(OpenAIError::Api { status, message });
        }

        Ok(resp.json::<CompletionResponse>().await?)
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [RequestMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub id: Option<String>,
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub index: u32,
    pub message: CompletionMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub role: String,
    pub content: Option<String>,
}

impl LanguageModel for OpenAIClient {
    type Error = OpenAIError;

    fn model_name(&self) -> &str {
        &self.model
    }

    #[tracing::instrument(skip_all, fields(model = %self.model, max_tokens = prompt.max_tokens))]
    async fn complete(&self, prompt: Prompt) -> Result<String, Self::Error> {
        let response = self
            .send_completion_request(&prompt)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to complete prompt"))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(OpenAIError::EmptyCompletion)
    }
}
