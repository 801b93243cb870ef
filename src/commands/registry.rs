use crate::commands::handler::CommandHandler;
use crate::core::error::FactChatError;
use std::collections::HashMap;
use std::sync::Arc;

pub struct CommandRegistry {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register<C: CommandHandler + 'static>(&mut self, name: &str, command: C) {
        self.handlers.insert(name.to_string(), Arc::new(command));
    }

    pub fn execute(
        &self,
        name: &str,
        args: &[&str],
        state: &mut super::SessionState,
    ) -> Result<Option<String>, FactChatError> {
        self.handlers
            .get(name)
            .ok_or_else(|| FactChatError::Input(format!("Unknown command: {}", name)))
            .and_then(|handler| handler.execute(state, args))
    }

    pub fn get_command_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Help lines of every registered command, sorted by name.
    pub fn help_lines(&self) -> Vec<&'static str> {
        self.get_command_names()
            .iter()
            .filter_map(|name| self.handlers.get(name))
            .map(|handler| handler.help())
            .collect()
    }
}
