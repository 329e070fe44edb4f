//! Session use case
//!
//! [`LegionSession`] ties the pieces together for one interactive session:
//! every input is either a conversation round (judges vote, the pool is
//! adjusted, the pool talks) or, with the panel prefix, a question for the
//! judges themselves.

use crate::config::SessionConfig;
use crate::ports::actor_store::ActorStore;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, EventKind, NoConversationLogger,
};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::ProgressNotifier;
use crate::ports::random::RandomSource;
use crate::ports::speech::SpeechPort;
use crate::use_cases::actor_runtime::ActorRuntime;
use crate::use_cases::judge_panel::{JudgePanel, PanelDecision};
use crate::use_cases::pool_manager::{PoolChange, PoolManager};
use crate::use_cases::run_panel_summary::{PanelVerdict, RunPanelError, RunPanelSummary};
use crate::use_cases::run_round::{RoundOutcome, RunRoundUseCase};
use legion_domain::{ActorPool, Conversation, judges};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Inputs starting with this go to the judge panel instead of the pool
pub const PANEL_PREFIX: &str = "[MAGI]";

/// Shown when the pool has no primary to greet with
const FALLBACK_GREETING: &str = "h3LL0 w0rL?";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No actor left in the pool: {0}")]
    PoolExhausted(String),

    #[error("Input is empty")]
    EmptyInput,

    #[error(transparent)]
    Panel(#[from] RunPanelError),
}

/// Where an input line goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRoute<'a> {
    Round(&'a str),
    Panel(&'a str),
}

/// Route a line by its prefix. The prefix is stripped from panel questions.
pub fn route_input(input: &str) -> InputRoute<'_> {
    let trimmed = input.trim();
    match trimmed.strip_prefix(PANEL_PREFIX) {
        Some(question) => InputRoute::Panel(question.trim()),
        None => InputRoute::Round(trimmed),
    }
}

/// Everything that happened in one conversation round
#[derive(Debug, Clone)]
pub struct RoundReport {
    pub round: u64,
    pub decision: PanelDecision,
    pub change: PoolChange,
    pub outcome: RoundOutcome,
}

#[derive(Debug, Clone)]
pub enum SessionReply {
    Round(RoundReport),
    Panel(PanelVerdict),
}

pub struct LegionSession<G: LlmGateway + 'static> {
    config: SessionConfig,
    manager: PoolManager<G>,
    panel: JudgePanel<G>,
    round: RunRoundUseCase<G>,
    summary: RunPanelSummary<G>,
    rng: Box<dyn RandomSource>,
    logger: Arc<dyn ConversationLogger>,
    rounds: u64,
    history: Vec<Conversation>,
}

impl<G: LlmGateway + 'static> LegionSession<G> {
    pub fn new(
        gateway: Arc<G>,
        store: Arc<dyn ActorStore>,
        rng: Box<dyn RandomSource>,
        config: SessionConfig,
    ) -> Self {
        let runtime = ActorRuntime::new(Arc::clone(&gateway)).with_timeout(config.timeout);
        let manager = PoolManager::new(runtime.clone(), store, config.pool_limit)
            .with_recall(config.recall_size, config.recall_pool);
        let panel = JudgePanel::new(gateway, judges()).with_timeout(config.timeout);
        let mut round = RunRoundUseCase::new(runtime.clone());
        round.set_speak_aloud(config.speech);
        let summary = RunPanelSummary::new(runtime, judges());

        Self {
            config,
            manager,
            panel,
            round,
            summary,
            rng,
            logger: Arc::new(NoConversationLogger),
            rounds: 0,
            history: Vec::new(),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_speech(mut self, speech: Arc<dyn SpeechPort>) -> Self {
        self.round = self.round.with_speech(speech);
        self
    }

    /// Seed the pool from the default roster and load the ledger
    pub fn bootstrap(&mut self) {
        self.manager
            .bootstrap(self.config.initial_pool_size, self.rng.as_mut());
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.config.verbose = verbose;
    }

    pub fn set_speech(&mut self, speech: bool) {
        self.config.speech = speech;
        self.round.set_speak_aloud(speech);
    }

    pub fn pool(&self) -> &ActorPool {
        self.manager.pool()
    }

    pub fn pool_mut(&mut self) -> &mut ActorPool {
        self.manager.pool_mut()
    }

    /// Completed conversation rounds
    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    /// Every completed round's transcript, oldest first
    pub fn history(&self) -> &[Conversation] {
        &self.history
    }

    /// Opening line of the primary
    pub fn greeting(&self) -> String {
        match self.manager.pool().primary() {
            Some(primary) => format!("{}: {}", primary.display_name(), primary.opening()),
            None => FALLBACK_GREETING.to_string(),
        }
    }

    pub async fn handle_input(
        &mut self,
        input: &str,
        progress: &dyn ProgressNotifier,
    ) -> Result<SessionReply, SessionError> {
        match route_input(input) {
            InputRoute::Round("") => Err(SessionError::EmptyInput),
            InputRoute::Round(text) => Ok(SessionReply::Round(self.run_round(text, progress).await?)),
            InputRoute::Panel(question) => {
                let verdict = self.summary.execute(question, progress).await?;
                self.logger.log(ConversationEvent::new(
                    EventKind::PanelVerdict,
                    json!({
                        "question": verdict.question,
                        "answers": verdict.answers,
                        "verdict": verdict.verdict,
                    }),
                ));
                Ok(SessionReply::Panel(verdict))
            }
        }
    }

    async fn run_round(
        &mut self,
        input: &str,
        progress: &dyn ProgressNotifier,
    ) -> Result<RoundReport, SessionError> {
        let speakers = self.manager.pool().speakers();
        let decision = self.panel.evaluate(input, &speakers, progress).await;
        for vote in &decision.votes {
            self.logger.log(ConversationEvent::new(
                EventKind::VoteCast,
                json!({
                    "round": self.rounds + 1,
                    "judge": vote.judge,
                    "vote": vote.vote.to_string(),
                    "fallback": vote.is_fallback(),
                }),
            ));
        }

        let change = self
            .manager
            .apply(&decision.action, input, self.rng.as_mut())
            .await?;
        progress.on_action_applied(&decision.action, &change.events);
        if !decision.action.is_noop() {
            self.logger.log(ConversationEvent::new(
                EventKind::PoolMutated,
                json!({
                    "round": self.rounds + 1,
                    "change": change,
                    "pool": self.manager.pool().active_ids(),
                }),
            ));
        }

        let outcome = self
            .round
            .execute(self.manager.pool_mut(), input, self.rng.as_mut(), progress)
            .await?;
        self.rounds += 1;
        self.history.push(outcome.conversation.clone());

        if self.config.ledger_due(self.rounds) {
            debug!("Saving ledger after round {}", self.rounds);
            self.manager.save_ledger();
        }

        self.logger.log(ConversationEvent::new(
            EventKind::RoundCompleted,
            json!({
                "round": self.rounds,
                "input": input,
                "transcript": outcome.conversation.audit_transcript(),
                "participants": outcome.participants,
            }),
        ));

        Ok(RoundReport {
            round: self.rounds,
            decision,
            change,
            outcome,
        })
    }

    /// Persist every member and the ledger
    pub async fn shutdown(&mut self) {
        info!("Saving session after {} rounds", self.rounds);
        self.manager.save_all().await;
    }
}
