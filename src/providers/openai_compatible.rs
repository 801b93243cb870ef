use crate::core::error::ServiceError;
use crate::providers::base_client::HttpClient;
use crate::providers::{LLMProvider, Message};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_completion_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: Option<String>,
}

/// Any backend speaking the OpenAI `chat/completions` protocol
/// (OpenAI, OpenRouter, DeepSeek, Azure OpenAI v1 endpoints).
#[derive(Clone)]
pub struct OpenAICompatibleProvider {
    client: HttpClient,
    model: String,
}

impl OpenAICompatibleProvider {
    pub fn new(
        base_url: String,
        api_key: &str,
        model: String,
        timeout: Option<Duration>,
    ) -> Result<Self, ServiceError> {
        Ok(Self {
            client: HttpClient::with_bearer(base_url, api_key, timeout)?,
            model,
        })
    }
}

#[async_trait]
impl LLMProvider for OpenAICompatibleProvider {
    async fn get_response(
        &self,
        messages: &[Message],
        max_completion_tokens: u32,
    ) -> Result<String, ServiceError> {
        let payload = ChatCompletionRequest {
            model: &self.model,
            messages,
            max_completion_tokens,
        };

        let response_body = self.client.post("chat/completions", &payload).await?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&response_body)?;

        let choice = parsed.choices.into_iter().next().ok_or_else(|| {
            ServiceError::MalformedResponse("No choices in API response".to_string())
        })?;
        let content = choice.message.content.ok_or_else(|| {
            ServiceError::MalformedResponse("First choice has no message content".to_string())
        })?;

        Ok(content.trim().to_string())
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn set_model(&mut self, model: &str) {
        self.model = model.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::base_client::test_server::{serve_once, serve_silent};
    use serde_json::Value;

    #[tokio::test]
    async fn returns_trimmed_first_choice() {
        let (url, server) = serve_once(
            200,
            r#"{"choices":[{"message":{"role":"assistant","content":"  Paris.\n"}},{"message":{"content":"Lyon"}}]}"#,
        )
        .await;
        let provider =
            OpenAICompatibleProvider::new(url, "key", "gpt-5-mini".to_string(), None).unwrap();

        let answer = provider
            .get_response(&[Message::user("QUESTION:\nCapital?")], 16384)
            .await
            .unwrap();
        assert_eq!(answer, "Paris.");

        let captured = server.await.unwrap();
        assert!(captured.head.starts_with("POST /chat/completions "));
        let sent: Value = serde_json::from_str(&captured.body).unwrap();
        assert_eq!(sent["model"], "gpt-5-mini");
        assert_eq!(sent["max_completion_tokens"], 16384);
        assert_eq!(sent["messages"][0]["role"], "user");
        assert_eq!(sent["messages"][0]["content"], "QUESTION:\nCapital?");
    }

    #[tokio::test]
    async fn no_choices_is_an_error() {
        let (url, server) = serve_once(200, r#"{"choices":[]}"#).await;
        let provider = OpenAICompatibleProvider::new(url, "key", "m".to_string(), None).unwrap();

        let err = provider
            .get_response(&[Message::user("hi")], 16)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::MalformedResponse(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn status_error_propagates() {
        let (url, server) = serve_once(401, r#"{"error":"bad key"}"#).await;
        let provider = OpenAICompatibleProvider::new(url, "key", "m".to_string(), None).unwrap();

        let err = provider
            .get_response(&[Message::user("hi")], 16)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Status { status: 401, .. }));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn generation_timeout_is_enforced() {
        let (url, server) = serve_silent().await;
        let provider = OpenAICompatibleProvider::new(
            url,
            "key",
            "m".to_string(),
            Some(Duration::from_millis(200)),
        )
        .unwrap();

        let err = provider
            .get_response(&[Message::user("hi")], 16)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Timeout(_)), "got {err:?}");
        server.abort();
    }
}
