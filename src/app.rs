use crate::cli::Args;
use crate::commands::{SessionState, dispatcher::CommandDispatcher};
use crate::core::error::FactChatError;
use crate::core::is_question;
use crate::display;
use crate::input;
use crate::orchestrator::TurnOutcome;
use is_terminal::IsTerminal;
use std::io::{self, BufRead};

pub struct Application {
    pub args: Args,
    pub state: SessionState,
    pub command_dispatcher: CommandDispatcher,
}

impl Application {
    pub fn new(args: Args, state: SessionState, command_dispatcher: CommandDispatcher) -> Self {
        Self {
            args,
            state,
            command_dispatcher,
        }
    }

    pub async fn run(&mut self) -> Result<(), FactChatError> {
        if let Some(query) = self.args.query.clone() {
            self.run_turn(query.trim()).await;
        } else if !io::stdin().is_terminal() {
            self.handle_piped_input().await?;
        } else {
            self.handle_interactive_mode().await?;
        }
        Ok(())
    }

    /// Submits one turn, printing each entry as the turn appends it.
    async fn run_turn(&mut self, text: &str) -> TurnOutcome {
        if is_question(text) {
            display::display_status("Answering and verifying...");
        }

        let log = std::mem::take(&mut self.state.log);
        let (log, outcome) = self
            .state
            .orchestrator
            .submit_turn(log, text, display::display_message)
            .await;
        self.state.log = log;

        if let TurnOutcome::Failed { stage, reason } = &outcome {
            tracing::warn!(%stage, %reason, "Turn failed");
        }
        tracing::info!(state = ?outcome.state(), entries = self.state.log.len(), "Turn finished");
        outcome
    }

    /// Every non-empty stdin line is one turn of the same conversation.
    async fn handle_piped_input(&mut self) -> Result<(), FactChatError> {
        let lines: Vec<String> = io::stdin().lock().lines().collect::<Result<_, _>>()?;
        for line in lines {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            self.run_turn(line).await;
        }
        Ok(())
    }

    async fn handle_interactive_mode(&mut self) -> Result<(), FactChatError> {
        println!(
            "Fact-checked chat using {}. State facts, ask questions. Type '/help' for commands, Ctrl+D or /quit to exit.",
            self.state.orchestrator.model()
        );

        let mut editor = input::create_editor(self.command_dispatcher.clone())?;

        while self.state.should_continue {
            let Some(line) = input::read_input(&mut editor)? else {
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(command_line) = line.strip_prefix('/') {
                let parts: Vec<&str> = command_line.split_whitespace().collect();
                if let Some((command, args)) = parts.split_first() {
                    match self
                        .command_dispatcher
                        .execute(command, args, &mut self.state)
                    {
                        Ok(Some(output)) => println!("{}", output),
                        Ok(None) => {}
                        Err(e) => display::display_error(&e.to_string()),
                    }
                }
                continue;
            }

            self.run_turn(line).await;
        }

        input::save_history(&mut editor)?;
        Ok(())
    }
}
