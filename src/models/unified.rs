use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::traits::Model;
use super::types::{GenerationError, GenerationRequest, ModelResponse, TokenUsage};

/// Model backend for any OpenAI-compatible chat-completions endpoint.
///
/// The model id and API key come with each request; the client itself only
/// knows where to send them.
pub struct UnifiedModel {
    client: Client,
    base_url: String,
}

impl UnifiedModel {
    pub fn new(base_url: &str) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .build()
            .map_err(|e| GenerationError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

#[async_trait]
impl Model for UnifiedModel {
    async fn generate(&self, request: &GenerationRequest) -> Result<ModelResponse, GenerationError> {
        let mut messages = Vec::new();
        if let Some(system) = &request.config.system_prompt {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.push(json!({ "role": "user", "content": request.prompt }));

        let mut body = json!({
            "model": request.credentials.model,
            "messages": messages,
            "stream": false,
        });
        if let Some(temp) = request.config.temperature {
            body["temperature"] = json!(temp);
        }
        if let Some(max_tokens) = request.config.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        debug!(model = %request.credentials.model, "sending generation request");

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&request.credentials.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(classify_status(status, message));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| GenerationError::InvalidResponse("no choices returned".to_string()))?;

        Ok(ModelResponse {
            content,
            usage: parsed.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            model_name: request.credentials.model.clone(),
        })
    }
}

fn classify_status(status: StatusCode, message: String) -> GenerationError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenerationError::Authorization(message),
        StatusCode::TOO_MANY_REQUESTS => GenerationError::RateLimited(message),
        _ => GenerationError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

// Response structures (OpenAI format)

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: usize,
    completion_tokens: usize,
    total_tokens: usize,
}
