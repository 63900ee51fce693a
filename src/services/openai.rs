use serde::{Deserialize, Serialize};

use super::ai_service::{Completion, CompletionProvider, CompletionRequest};
use crate::config::Config;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI chat-completions client.
pub struct OpenAIService {
    api_key: Option<String>,
    model: String,
    endpoint: String,
    client: reqwest::Client,
}

impl OpenAIService {
    pub fn new(config: &Config) -> Self {
        Self {
            api_key: config.openai_api_key.clone(),
            model: config.openai_model.clone(),
            endpoint: format!("{}/chat/completions", config.openai_base_url),
            client: reqwest::Client::new(),
        }
    }

    fn build_request(&self, request: &CompletionRequest) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.user.clone(),
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request.json_mode.then(|| ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        }
    }
}

fn into_completion(response: ChatResponse) -> Completion {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|text| !text.trim().is_empty());

    Completion {
        content,
        usage: response.usage,
    }
}

#[async_trait::async_trait]
impl CompletionProvider for OpenAIService {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ApiError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ApiError::Configuration("OPENAI_API_KEY is not configured".to_string()))?;

        let chat_request = self.build_request(request);

        log::info!("🤖 Sending request to OpenAI with model: {}", self.model);
        log::debug!(
            "📤 Request payload size: {} bytes",
            serde_json::to_string(&chat_request)
                .map(|s| s.len())
                .unwrap_or_default()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&chat_request)
            .send()
            .await?;

        let status = response.status();
        log::debug!("📥 OpenAI response status: {}", status);

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::error!("❌ OpenAI API error ({}): {}", status, error_text);
            return Err(ApiError::UpstreamUnavailable(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let response_text = response.text().await?;
        log::debug!("📄 Raw OpenAI response size: {} bytes", response_text.len());

        let chat_response: ChatResponse = serde_json::from_str(&response_text).map_err(|e| {
            ApiError::UpstreamUnavailable(format!("Could not decode OpenAI response: {}", e))
        })?;

        let completion = into_completion(chat_response);
        match &completion.content {
            Some(content) => log::debug!("💬 OpenAI response content: {}", content),
            None => log::warn!("⚠️ OpenAI response carried no content"),
        }

        Ok(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> CompletionRequest {
        CompletionRequest {
            system: "sys".to_string(),
            user: "usr".to_string(),
            temperature: 0.3,
            max_tokens: 150,
            json_mode: true,
        }
    }

    fn config(api_key: Option<&str>) -> Config {
        Config {
            openai_api_key: api_key.map(str::to_string),
            openai_model: "test_model".to_string(),
            openai_base_url: "http://127.0.0.1:9/v1".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
        }
    }

    #[test]
    fn test_build_request_json_mode() {
        let service = OpenAIService::new(&config(Some("test_key")));
        let body = serde_json::to_value(service.build_request(&request())).unwrap();

        assert_eq!(body["model"], "test_model");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "usr");
        assert_eq!(body["max_tokens"], 150);
        assert_eq!(body["response_format"]["type"], "json_object");
    }

    #[test]
    fn test_build_request_without_json_mode() {
        let service = OpenAIService::new(&config(Some("test_key")));
        let plain = CompletionRequest { json_mode: false, ..request() };
        let body = serde_json::to_value(service.build_request(&plain)).unwrap();

        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn test_into_completion_keeps_usage() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": "{\"a\":1}"}}],
            "usage": {"total_tokens": 42}
        }))
        .unwrap();

        let completion = into_completion(response);
        assert_eq!(completion.content.as_deref(), Some("{\"a\":1}"));
        assert_eq!(completion.usage, Some(json!({"total_tokens": 42})));
    }

    #[test]
    fn test_into_completion_empty_reply() {
        let no_choices: ChatResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(into_completion(no_choices).content.is_none());

        let null_content: ChatResponse =
            serde_json::from_value(json!({"choices": [{"message": {"content": null}}]})).unwrap();
        assert!(into_completion(null_content).content.is_none());

        let blank: ChatResponse =
            serde_json::from_value(json!({"choices": [{"message": {"content": "  \n"}}]})).unwrap();
        assert!(into_completion(blank).content.is_none());
    }

    #[tokio::test]
    async fn test_missing_api_key_is_configuration_error() {
        let service = OpenAIService::new(&config(None));
        let err = service.complete(&request()).await.unwrap_err();

        assert!(matches!(err, ApiError::Configuration(_)));
    }
}
