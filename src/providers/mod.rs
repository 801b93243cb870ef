use crate::core::error::ServiceError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A chat-completion backend.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Returns the trimmed text of the first completion choice.
    async fn get_response(
        &self,
        messages: &[Message],
        max_completion_tokens: u32,
    ) -> Result<String, ServiceError>;

    fn model(&self) -> &str;

    fn set_model(&mut self, model: &str);
}

pub mod base_client;
pub mod factory;
pub mod openai_compatible;
