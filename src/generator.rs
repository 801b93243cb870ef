use crate::core::error::ServiceError;
use crate::providers::{LLMProvider, Message};

/// Produces a one-line answer to a question, grounded on context when there is any.
pub struct AnswerGenerator {
    provider: Box<dyn LLMProvider>,
    max_completion_tokens: u32,
}

impl AnswerGenerator {
    pub fn new(provider: Box<dyn LLMProvider>, max_completion_tokens: u32) -> Self {
        Self {
            provider,
            max_completion_tokens,
        }
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    pub fn set_model(&mut self, model: &str) {
        self.provider.set_model(model);
    }

    pub async fn answer_question(
        &self,
        question: &str,
        context: &str,
    ) -> Result<String, ServiceError> {
        let prompt = build_prompt(question, context);
        tracing::debug!(
            grounded = !context.trim().is_empty(),
            model = self.provider.model(),
            "Requesting answer"
        );
        self.provider
            .get_response(&[Message::user(prompt)], self.max_completion_tokens)
            .await
    }
}

fn build_prompt(question: &str, context: &str) -> String {
    if context.trim().is_empty() {
        format!("QUESTION:\n{}\n\nOne Line ANSWER:", question)
    } else {
        format!(
            "One Line Answer the question.\n\nCONTEXT:\n{}\n\nQUESTION:\n{}\n\n\
             One Line ANSWER and if you think the context is not useful, just use your own knowledge,",
            context, question
        )
    }
}
