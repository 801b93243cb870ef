pub mod context;
pub mod error;
pub mod message;
pub mod question;
pub mod request;

pub use context::{collect_context, context_window};
pub use message::{ChatMessage, ChatRole, ConversationLog, Verdict};
pub use question::is_question;
pub use request::build_classifier_input;
