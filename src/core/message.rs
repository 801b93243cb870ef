use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Caption carried by a successful fact-check entry.
pub const VERDICT_CAPTION: &str = "Fact-check result";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChatRole {
    User,
    Assistant,
    SystemVerdict,
}

/// Classifier judgment of an answer against its context.
///
/// Labels the classifier is not known to produce are kept verbatim in
/// `Other` and rendered as the insufficient-context case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Verdict {
    Factual,
    Contradiction,
    Irrelevant,
    Other(String),
}

impl Verdict {
    pub fn from_label(label: &str) -> Self {
        match label {
            "factual" => Verdict::Factual,
            "contradiction" => Verdict::Contradiction,
            "irrelevant" => Verdict::Irrelevant,
            other => Verdict::Other(other.to_string()),
        }
    }

    pub fn as_label(&self) -> &str {
        match self {
            Verdict::Factual => "factual",
            Verdict::Contradiction => "contradiction",
            Verdict::Irrelevant => "irrelevant",
            Verdict::Other(label) => label,
        }
    }
}

impl From<String> for Verdict {
    fn from(label: String) -> Self {
        Verdict::from_label(&label)
    }
}

impl From<Verdict> for String {
    fn from(verdict: Verdict) -> Self {
        verdict.as_label().to_string()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// One entry of the conversation log. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub is_question: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Verdict>,
    pub created_at: DateTime<Local>,
}

impl ChatMessage {
    fn new(role: ChatRole, text: String, is_question: bool, label: Option<Verdict>) -> Self {
        Self {
            role,
            text,
            is_question,
            label,
            created_at: Local::now(),
        }
    }

    pub fn user(text: impl Into<String>, is_question: bool) -> Self {
        Self::new(ChatRole::User, text.into(), is_question, None)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, text.into(), false, None)
    }

    pub fn verdict(label: Verdict) -> Self {
        Self::new(
            ChatRole::SystemVerdict,
            VERDICT_CAPTION.to_string(),
            false,
            Some(label),
        )
    }

    /// A system-verdict-shaped entry with no label, describing a failed turn.
    pub fn failure(text: impl Into<String>) -> Self {
        Self::new(ChatRole::SystemVerdict, text.into(), false, None)
    }

    pub fn is_failure(&self) -> bool {
        self.role == ChatRole::SystemVerdict && self.label.is_none()
    }
}

/// Append-only, insertion-ordered log of one chat session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationLog {
    messages: Vec<ChatMessage>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Pushes `message` and returns the stored entry.
    pub(crate) fn append(&mut self, message: ChatMessage) -> &ChatMessage {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }
}
