use crate::core::message::{ChatMessage, ChatRole, ConversationLog};

/// Grounding context for the question that was just appended to `log`.
///
/// The newest entry is the question itself and is not scanned.
pub fn collect_context(log: &ConversationLog) -> String {
    let messages = log.messages();
    let prior = &messages[..messages.len().saturating_sub(1)];
    context_window(prior)
}

/// Non-question user statements made after the last question in `messages`,
/// in chronological order and joined by newlines.
pub fn context_window(messages: &[ChatMessage]) -> String {
    let mut chunks: Vec<&str> = Vec::new();
    for msg in messages.iter().rev() {
        if msg.role != ChatRole::User {
            continue;
        }
        if msg.is_question {
            break;
        }
        chunks.push(&msg.text);
    }
    chunks.reverse();
    chunks.join("\n")
}
