//! Drives one conversational turn: detect, window context, generate, classify.

use crate::classifier::FactClassifier;
use crate::core::{
    ChatMessage, ConversationLog, Verdict, build_classifier_input, collect_context, is_question,
};
use crate::generator::AnswerGenerator;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    MessageReceived,
    NonQuestion,
    Generating,
    Classifying,
    Verdicted,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedStage {
    Generation,
    Classification,
}

impl fmt::Display for FailedStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailedStage::Generation => f.write_str("generation"),
            FailedStage::Classification => f.write_str("classification"),
        }
    }
}

/// How a turn ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    NonQuestion,
    Verdicted(Verdict),
    Failed { stage: FailedStage, reason: String },
}

impl TurnOutcome {
    pub fn state(&self) -> TurnState {
        match self {
            TurnOutcome::NonQuestion => TurnState::NonQuestion,
            TurnOutcome::Verdicted(_) => TurnState::Verdicted,
            TurnOutcome::Failed { .. } => TurnState::Failed,
        }
    }
}

pub struct TurnOrchestrator {
    generator: AnswerGenerator,
    classifier: Box<dyn FactClassifier>,
}

impl TurnOrchestrator {
    pub fn new(generator: AnswerGenerator, classifier: Box<dyn FactClassifier>) -> Self {
        Self {
            generator,
            classifier,
        }
    }

    pub fn model(&self) -> &str {
        self.generator.model()
    }

    pub fn set_model(&mut self, model: &str) {
        self.generator.set_model(model);
    }

    /// Applies one user input to `log` and returns the updated log.
    ///
    /// `on_append` sees every entry right after it is appended, so the answer
    /// is observable while classification is still running.
    /// Never fails: service errors end the turn with a label-less entry in the log.
    pub async fn submit_turn(
        &self,
        mut log: ConversationLog,
        text: &str,
        mut on_append: impl FnMut(&ChatMessage),
    ) -> (ConversationLog, TurnOutcome) {
        let question = is_question(text);
        on_append(log.append(ChatMessage::user(text, question)));
        transition(TurnState::Idle, TurnState::MessageReceived);

        if !question {
            transition(TurnState::MessageReceived, TurnState::NonQuestion);
            return (log, TurnOutcome::NonQuestion);
        }

        let context = collect_context(&log);
        transition(TurnState::MessageReceived, TurnState::Generating);
        tracing::info!(context_lines = context.lines().count(), "Answering question");

        let answer = match self.generator.answer_question(text, &context).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, "Answer generation failed");
                on_append(log.append(ChatMessage::failure(format!(
                    "Answer generation failed: {}",
                    e
                ))));
                transition(TurnState::Generating, TurnState::Failed);
                let outcome = TurnOutcome::Failed {
                    stage: FailedStage::Generation,
                    reason: e.to_string(),
                };
                return (log, outcome);
            }
        };
        on_append(log.append(ChatMessage::assistant(answer.as_str())));
        transition(TurnState::Generating, TurnState::Classifying);

        let classifier_input = build_classifier_input(&answer, text, &context);
        let outcome = match self.classifier.classify(&classifier_input).await {
            Ok(verdict) => {
                tracing::info!(verdict = %verdict, "Answer verified");
                on_append(log.append(ChatMessage::verdict(verdict.clone())));
                transition(TurnState::Classifying, TurnState::Verdicted);
                TurnOutcome::Verdicted(verdict)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Verification failed");
                on_append(log.append(ChatMessage::failure(format!("Verification failed: {}", e))));
                transition(TurnState::Classifying, TurnState::Failed);
                TurnOutcome::Failed {
                    stage: FailedStage::Classification,
                    reason: e.to_string(),
                }
            }
        };

        (log, outcome)
    }
}

fn transition(from: TurnState, to: TurnState) {
    tracing::debug!(?from, ?to, "Turn state");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ChatRole;
    use crate::core::error::ServiceError;
    use crate::generator::testing::ScriptedProvider;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct StubClassifier {
        result: Mutex<Option<Result<Verdict, ServiceError>>>,
        inputs: Arc<Mutex<Vec<String>>>,
    }

    impl StubClassifier {
        fn new(result: Result<Verdict, ServiceError>) -> Self {
            Self {
                result: Mutex::new(Some(result)),
                inputs: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl FactClassifier for StubClassifier {
        async fn classify(&self, text: &str) -> Result<Verdict, ServiceError> {
            self.inputs.lock().unwrap().push(text.to_string());
            self.result
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Ok(Verdict::Irrelevant))
        }
    }

    /// Records `classify` calls into the same event list the turn observer writes to.
    struct RecordingClassifier {
        events: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl FactClassifier for RecordingClassifier {
        async fn classify(&self, _text: &str) -> Result<Verdict, ServiceError> {
            self.events.lock().unwrap().push("classify".to_string());
            Ok(Verdict::Factual)
        }
    }

    struct Harness {
        orchestrator: TurnOrchestrator,
        prompts: Arc<Mutex<Vec<String>>>,
        classifier_inputs: Arc<Mutex<Vec<String>>>,
    }

    fn harness(
        answers: Vec<Result<String, ServiceError>>,
        verdict: Result<Verdict, ServiceError>,
    ) -> Harness {
        let provider = ScriptedProvider::new(answers);
        let prompts = provider.prompts.clone();
        let classifier = StubClassifier::new(verdict);
        let classifier_inputs = classifier.inputs.clone();
        Harness {
            orchestrator: TurnOrchestrator::new(
                AnswerGenerator::new(Box::new(provider), 16384),
                Box::new(classifier),
            ),
            prompts,
            classifier_inputs,
        }
    }

    fn roles(log: &ConversationLog) -> Vec<ChatRole> {
        log.messages().iter().map(|m| m.role).collect()
    }

    #[tokio::test]
    async fn statement_ends_turn_without_service_calls() {
        let h = harness(vec![], Ok(Verdict::Factual));

        let (log, outcome) = h
            .orchestrator
            .submit_turn(ConversationLog::new(), "Paris is in France.", |_| {})
            .await;

        assert_eq!(outcome, TurnOutcome::NonQuestion);
        assert_eq!(outcome.state(), TurnState::NonQuestion);
        assert_eq!(roles(&log), vec![ChatRole::User]);
        assert!(!log.messages()[0].is_question);
        assert!(h.prompts.lock().unwrap().is_empty());
        assert!(h.classifier_inputs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn first_question_uses_ungrounded_prompt() {
        let h = harness(vec![Ok("Paris.".to_string())], Ok(Verdict::Factual));

        let (log, outcome) = h
            .orchestrator
            .submit_turn(ConversationLog::new(), "What is the capital of France?", |_| {})
            .await;

        assert_eq!(outcome, TurnOutcome::Verdicted(Verdict::Factual));
        assert_eq!(
            roles(&log),
            vec![ChatRole::User, ChatRole::Assistant, ChatRole::SystemVerdict]
        );
        assert!(log.messages()[0].is_question);
        assert_eq!(log.messages()[1].text, "Paris.");
        assert_eq!(log.messages()[2].label, Some(Verdict::Factual));
        assert_eq!(log.messages()[2].text, "Fact-check result");

        let prompts = h.prompts.lock().unwrap();
        assert_eq!(
            prompts.as_slice(),
            ["QUESTION:\nWhat is the capital of France?\n\nOne Line ANSWER:"]
        );
        assert_eq!(
            h.classifier_inputs.lock().unwrap().as_slice(),
            ["Answer: Paris.\nQuestion: What is the capital of France?\nContext: "]
        );
    }

    #[tokio::test]
    async fn answer_is_appended_before_classification_starts() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let orchestrator = TurnOrchestrator::new(
            AnswerGenerator::new(
                Box::new(ScriptedProvider::new(vec![Ok("Paris.".to_string())])),
                16384,
            ),
            Box::new(RecordingClassifier {
                events: events.clone(),
            }),
        );

        let observed = events.clone();
        let (log, outcome) = orchestrator
            .submit_turn(ConversationLog::new(), "What is the capital of France?", |msg| {
                observed.lock().unwrap().push(format!("{:?}", msg.role));
            })
            .await;

        assert_eq!(outcome, TurnOutcome::Verdicted(Verdict::Factual));
        assert_eq!(
            events.lock().unwrap().as_slice(),
            ["User", "Assistant", "classify", "SystemVerdict"]
        );
        assert_eq!(log.len(), 3);
    }

    #[tokio::test]
    async fn question_is_grounded_on_prior_statements() {
        let h = harness(
            vec![Ok("Bob is in Paris.".to_string())],
            Ok(Verdict::Contradiction),
        );

        let (log, _) = h
            .orchestrator
            .submit_turn(ConversationLog::new(), "Bob lives in Lyon", |_| {})
            .await;
        let (log, outcome) = h.orchestrator.submit_turn(log, "Where is Bob?", |_| {}).await;

        assert_eq!(outcome, TurnOutcome::Verdicted(Verdict::Contradiction));
        assert!(h.prompts.lock().unwrap()[0].contains("CONTEXT:\nBob lives in Lyon\n"));
        assert_eq!(
            h.classifier_inputs.lock().unwrap()[0],
            "Answer: Bob is in Paris.\nQuestion: Where is Bob?\nContext: Bob lives in Lyon"
        );
        assert_eq!(log.len(), 4);
    }

    #[tokio::test]
    async fn generation_failure_appends_only_failure_entry() {
        let h = harness(
            vec![Err(ServiceError::Network("connection refused".to_string()))],
            Ok(Verdict::Factual),
        );

        let (log, outcome) = h
            .orchestrator
            .submit_turn(ConversationLog::new(), "What is X?", |_| {})
            .await;

        assert_eq!(outcome.state(), TurnState::Failed);
        assert!(matches!(
            outcome,
            TurnOutcome::Failed {
                stage: FailedStage::Generation,
                ..
            }
        ));
        assert_eq!(roles(&log), vec![ChatRole::User, ChatRole::SystemVerdict]);
        let failure = &log.messages()[1];
        assert!(failure.label.is_none());
        assert_eq!(
            failure.text,
            "Answer generation failed: Network error: connection refused"
        );
        assert!(h.classifier_inputs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn classification_failure_keeps_answer() {
        let h = harness(
            vec![Ok("42.".to_string())],
            Err(ServiceError::Status {
                status: 502,
                body: "bad gateway".to_string(),
            }),
        );

        let (log, outcome) = h
            .orchestrator
            .submit_turn(ConversationLog::new(), "What is the answer?", |_| {})
            .await;

        assert!(matches!(
            outcome,
            TurnOutcome::Failed {
                stage: FailedStage::Classification,
                ..
            }
        ));
        assert_eq!(
            roles(&log),
            vec![ChatRole::User, ChatRole::Assistant, ChatRole::SystemVerdict]
        );
        assert_eq!(log.messages()[1].text, "42.");
        assert!(log.messages()[2].is_failure());
        assert_eq!(log.messages()[2].text, "Verification failed: bad gateway");
    }

    #[tokio::test]
    async fn unlabeled_classifier_result_still_verdicts() {
        // The classifier maps a body without `pred_label` to `irrelevant`.
        let h = harness(vec![Ok("Blue.".to_string())], Ok(Verdict::Irrelevant));

        let (log, outcome) = h
            .orchestrator
            .submit_turn(ConversationLog::new(), "Is the sky blue", |_| {})
            .await;

        assert_eq!(outcome, TurnOutcome::Verdicted(Verdict::Irrelevant));
        assert_eq!(outcome.state(), TurnState::Verdicted);
        assert_eq!(log.messages().last().and_then(|m| m.label.clone()), Some(Verdict::Irrelevant));
    }

    #[tokio::test]
    async fn scoring_body_without_label_verdicts_irrelevant() {
        use crate::classifier::ScoringClassifier;
        use crate::providers::base_client::test_server::serve_once;

        let (url, server) = serve_once(200, r#"{"probabilities":[0.4,0.3,0.3]}"#).await;
        let orchestrator = TurnOrchestrator::new(
            AnswerGenerator::new(
                Box::new(ScriptedProvider::new(vec![Ok("Blue.".to_string())])),
                16384,
            ),
            Box::new(ScoringClassifier::new(url, "ml-key").unwrap()),
        );

        let (log, outcome) = orchestrator
            .submit_turn(ConversationLog::new(), "Why is the sky blue?", |_| {})
            .await;

        assert_eq!(outcome, TurnOutcome::Verdicted(Verdict::Irrelevant));
        assert_eq!(log.len(), 3);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn failed_turn_does_not_disturb_earlier_entries() {
        let h = harness(
            vec![
                Ok("Paris.".to_string()),
                Err(ServiceError::Timeout("elapsed".to_string())),
            ],
            Ok(Verdict::Factual),
        );

        let (log, _) = h
            .orchestrator
            .submit_turn(ConversationLog::new(), "Capital of France?", |_| {})
            .await;
        let before = log.messages().to_vec();
        let (log, outcome) = h.orchestrator.submit_turn(log, "Capital of Spain?", |_| {}).await;

        assert_eq!(outcome.state(), TurnState::Failed);
        assert_eq!(&log.messages()[..before.len()], before.as_slice());
        assert_eq!(log.len(), before.len() + 2);
    }
}
