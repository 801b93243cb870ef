use super::SessionState;
use crate::core::error::FactChatError;
use crate::core::{ConversationLog, context_window};
use crate::display;

pub trait CommandHandler {
    fn execute(&self, state: &mut SessionState, args: &[&str])
    -> Result<Option<String>, FactChatError>;
    fn help(&self) -> &'static str;
}

pub struct QuitCommand;
pub struct ClearCommand;
pub struct ModelCommand;
pub struct ContextCommand;
pub struct LogCommand;

impl CommandHandler for QuitCommand {
    fn execute(
        &self,
        state: &mut SessionState,
        _args: &[&str],
    ) -> Result<Option<String>, FactChatError> {
        state.should_continue = false;
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/quit - Exit the chat session"
    }
}

impl CommandHandler for ClearCommand {
    fn execute(
        &self,
        state: &mut SessionState,
        _args: &[&str],
    ) -> Result<Option<String>, FactChatError> {
        state.log = ConversationLog::new();
        Ok(Some("Started a new conversation.".to_string()))
    }

    fn help(&self) -> &'static str {
        "/clear - Discard the conversation and start over"
    }
}

impl CommandHandler for ModelCommand {
    fn execute(
        &self,
        state: &mut SessionState,
        args: &[&str],
    ) -> Result<Option<String>, FactChatError> {
        match args.first() {
            None => Ok(Some(format!(
                "Current model: {}",
                state.orchestrator.model()
            ))),
            Some(model) => {
                state.orchestrator.set_model(model);
                tracing::info!(model = %model, "Model changed");
                Ok(Some(format!("Model changed to: {}", model)))
            }
        }
    }

    fn help(&self) -> &'static str {
        "/model <name> - Show or change the answering model"
    }
}

impl CommandHandler for ContextCommand {
    fn execute(
        &self,
        state: &mut SessionState,
        _args: &[&str],
    ) -> Result<Option<String>, FactChatError> {
        display::display_context(&context_window(state.log.messages()));
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/context - Show the context the next question will be checked against"
    }
}

impl CommandHandler for LogCommand {
    fn execute(
        &self,
        state: &mut SessionState,
        _args: &[&str],
    ) -> Result<Option<String>, FactChatError> {
        Ok(Some(serde_json::to_string_pretty(&state.log)?))
    }

    fn help(&self) -> &'static str {
        "/log - Print the conversation log as JSON"
    }
}
