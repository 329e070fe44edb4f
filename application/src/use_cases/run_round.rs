//! Run round use case
//!
//! One round of conversation over the active pool: the primary answers the
//! human, every other member rolls a behavior in speaking order, and each
//! participant folds the finished round into its memory.

use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::ProgressNotifier;
use crate::ports::random::RandomSource;
use crate::ports::speech::{NoSpeech, SpeechPort};
use crate::use_cases::actor_runtime::ActorRuntime;
use crate::use_cases::session::SessionError;
use legion_domain::util::preview;
use legion_domain::{Actor, ActorPool, Behavior, BehaviorKind, Conversation, Speaker};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a completed round
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    /// Human input followed by every generated turn
    pub conversation: Conversation,
    /// Roll outcome of each non-primary member, in speaking order
    pub behaviors: Vec<(String, BehaviorKind)>,
    /// Real names of everyone who took part, primary first
    pub participants: Vec<String>,
}

impl RoundOutcome {
    /// Generated turns only
    pub fn replies(&self) -> impl Iterator<Item = (&Speaker, &str)> {
        self.conversation
            .turns()
            .iter()
            .skip(1)
            .map(|t| (&t.speaker, t.text.as_str()))
    }
}

pub struct RunRoundUseCase<G: LlmGateway + 'static> {
    runtime: ActorRuntime<G>,
    speech: Arc<dyn SpeechPort>,
    speak_aloud: bool,
}

impl<G: LlmGateway + 'static> RunRoundUseCase<G> {
    pub fn new(runtime: ActorRuntime<G>) -> Self {
        Self {
            runtime,
            speech: Arc::new(NoSpeech),
            speak_aloud: false,
        }
    }

    pub fn with_speech(mut self, speech: Arc<dyn SpeechPort>) -> Self {
        self.speech = speech;
        self
    }

    pub fn set_speak_aloud(&mut self, enabled: bool) {
        self.speak_aloud = enabled;
    }

    pub fn speaks_aloud(&self) -> bool {
        self.speak_aloud
    }

    fn emit(&self, pool: &mut ActorPool, speaker: &Speaker, text: &str, progress: &dyn ProgressNotifier) {
        progress.on_turn(speaker, text);
        if self.speak_aloud && !text.is_empty() {
            self.speech.speak(text, &speaker.real_name);
        }
        let count = pool.record_occurrence(&speaker.real_name);
        debug!(
            "{} (turn {}): {}",
            speaker.label(),
            count,
            preview(text, 60)
        );
    }

    pub async fn execute(
        &self,
        pool: &mut ActorPool,
        input: &str,
        rng: &mut dyn RandomSource,
        progress: &dyn ProgressNotifier,
    ) -> Result<RoundOutcome, SessionError> {
        let ids: Vec<String> = pool.active_ids().to_vec();
        let Some((primary_id, others)) = ids.split_first() else {
            return Err(SessionError::PoolExhausted(
                "no member to answer".to_string(),
            ));
        };

        let mut conversation = Conversation::opened_by(Actor::human().speaker(), input);
        let mut participants = vec![primary_id.clone()];
        let mut behaviors = Vec::with_capacity(others.len());

        // The primary always answers, even when the backend does not.
        if let Some(primary) = pool.actor(primary_id) {
            let speaker = primary.speaker();
            progress.on_generation_start(&speaker.display_name);
            let text = match self.runtime.answer(primary, input).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("{} could not answer: {}", primary_id, e);
                    progress.on_warning(&format!("{} could not answer: {}", speaker.display_name, e));
                    String::new()
                }
            };
            progress.on_generation_end(&speaker.display_name);
            conversation.push(speaker.clone(), text.clone());
            self.emit(pool, &speaker, &text, progress);
        }

        for id in others {
            let Some(actor) = pool.actor_mut(id) else {
                continue;
            };
            progress.on_generation_start(actor.display_name());
            let behavior = self.runtime.decide_behavior(actor, &conversation, rng).await;
            let speaker = actor.speaker();
            progress.on_generation_end(&speaker.display_name);
            progress.on_behavior(id, behavior.kind());
            behaviors.push((id.clone(), behavior.kind()));

            if behavior.is_participant() {
                participants.push(id.clone());
            }
            match behavior {
                Behavior::Speak(text) | Behavior::Impersonate { text, .. } => {
                    conversation.push(speaker.clone(), text.clone());
                    self.emit(pool, &speaker, &text, progress);
                }
                Behavior::Skip | Behavior::Noop => {}
            }
        }

        for id in &participants {
            if let Some(actor) = pool.actor_mut(id) {
                let updated = self
                    .runtime
                    .consolidate_memory(actor, conversation.clone())
                    .await;
                progress.on_memory_consolidated(id, updated);
            }
        }

        info!(
            "Round finished with {} turns from {} participants",
            conversation.len(),
            participants.len()
        );

        Ok(RoundOutcome {
            conversation,
            behaviors,
            participants,
        })
    }
}
