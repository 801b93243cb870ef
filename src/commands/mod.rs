pub mod dispatcher;
pub mod handler;
pub mod registry;

use crate::core::ConversationLog;
use crate::orchestrator::TurnOrchestrator;
pub use dispatcher::create_command_registry;

/// Everything one interactive session owns.
pub struct SessionState {
    pub log: ConversationLog,
    pub orchestrator: TurnOrchestrator,
    pub should_continue: bool,
}

impl SessionState {
    pub fn new(orchestrator: TurnOrchestrator) -> Self {
        Self {
            log: ConversationLog::new(),
            orchestrator,
            should_continue: true,
        }
    }
}
