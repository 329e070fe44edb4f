//! Actor runtime
//!
//! Everything an actor does that needs the generation backend: answering the
//! human, rolling a behavior for its turn, and folding rounds into memory.

use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::random::RandomSource;
use crate::use_cases::shared::complete_with_timeout;
use legion_domain::util::preview;
use legion_domain::{
    Actor, Behavior, BehaviorKind, Conversation, DomainError, Message, PromptTemplate,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct ActorRuntime<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    timeout: Option<Duration>,
}

impl<G: LlmGateway + 'static> Clone for ActorRuntime<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            timeout: self.timeout,
        }
    }
}

impl<G: LlmGateway + 'static> ActorRuntime<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Instructions, acknowledgement and memory preamble, followed by `messages`
    pub fn prepare_messages(actor: &Actor, messages: Vec<Message>) -> Vec<Message> {
        let mut prepared = vec![
            Message::system(actor.instructions()),
            Message::assistant(PromptTemplate::stay_in_character_ack()),
        ];
        let last = actor.prior_conversation().map(Conversation::transcript);
        if let Some(preamble) = PromptTemplate::memory_preamble(actor.memory(), last.as_deref())
        {
            prepared.push(Message::assistant(preamble));
        }
        prepared.extend(messages);
        prepared
    }

    /// Generate text as `actor`. Leaves the actor untouched.
    pub async fn generate(
        &self,
        actor: &Actor,
        messages: Vec<Message>,
    ) -> Result<String, GatewayError> {
        if !actor.role().can_generate() {
            return Err(GatewayError::NotPermitted(
                DomainError::CannotGenerate(actor.real_name().to_string()).to_string(),
            ));
        }
        let prepared = Self::prepare_messages(actor, messages);
        debug!(
            "Generating as {} ({} messages)",
            actor.real_name(),
            prepared.len()
        );
        complete_with_timeout(self.gateway.as_ref(), &prepared, self.timeout).await
    }

    /// Answer the human's input directly
    pub async fn answer(&self, actor: &Actor, input: &str) -> Result<String, GatewayError> {
        self.generate(actor, vec![Message::user(input)]).await
    }

    /// Roll and carry out this actor's behavior for the round so far.
    ///
    /// Backend failures degrade to [`Behavior::Noop`]: the actor still takes
    /// part in the round but adds no turn.
    pub async fn decide_behavior(
        &self,
        actor: &mut Actor,
        conversation: &Conversation,
        rng: &mut dyn RandomSource,
    ) -> Behavior {
        let kind = BehaviorKind::from_roll(rng.roll_percent());
        debug!("{} rolled {}", actor.real_name(), kind);

        match kind {
            BehaviorKind::Skip => Behavior::Skip,
            BehaviorKind::Noop => Behavior::Noop,
            BehaviorKind::Speak => {
                let mut messages = conversation.to_messages();
                messages.push(Message::user(PromptTemplate::turn_nudge()));
                match self.generate(actor, messages).await {
                    Ok(text) => Behavior::Speak(text),
                    Err(e) => {
                        warn!("{} failed to speak: {}", actor.real_name(), e);
                        Behavior::Noop
                    }
                }
            }
            BehaviorKind::Impersonate => {
                let names = conversation.participant_names();
                if names.is_empty() {
                    return Behavior::Noop;
                }
                let target = names[rng.pick_index(names.len()).min(names.len() - 1)].to_string();
                let mut masked = actor.clone();
                masked.impersonate(&target);

                // The disguise sticks only once there is a turn to show for it
                match self.generate(&masked, conversation.to_messages()).await {
                    Ok(text) => {
                        *actor = masked;
                        debug!("{} now presents as {}", actor.real_name(), target);
                        Behavior::Impersonate {
                            as_name: target,
                            text,
                        }
                    }
                    Err(e) => {
                        warn!("{} failed to impersonate: {}", actor.real_name(), e);
                        Behavior::Noop
                    }
                }
            }
        }
    }

    /// Summarise what the actor remembers, then hand it the new round.
    ///
    /// Returns whether memory changed. Never fails: on backend error the
    /// memory is left as is, and `last_conversation` is replaced regardless.
    pub async fn consolidate_memory(&self, actor: &mut Actor, conversation: Conversation) -> bool {
        let mut updated = false;
        if actor.has_history() {
            let last = actor.prior_conversation().map(Conversation::transcript);
            let messages = vec![
                Message::system(actor.instructions()),
                Message::user(PromptTemplate::summarize_memory(
                    actor.memory(),
                    last.as_deref(),
                )),
            ];
            match complete_with_timeout(self.gateway.as_ref(), &messages, self.timeout).await {
                Ok(summary) => {
                    debug!(
                        "Memory of {} is now: {}",
                        actor.real_name(),
                        preview(&summary, 80)
                    );
                    actor.replace_memory(summary);
                    updated = true;
                }
                Err(e) => warn!("Could not consolidate memory of {}: {}", actor.real_name(), e),
            }
        }
        actor.replace_last_conversation(conversation);
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{
        EchoGateway, FailingGateway, ScriptedGateway, ScriptedRandom,
    };
    use legion_domain::Role;

    fn actor(name: &str) -> Actor {
        Actor::ordinary(name, format!("You are {}.", name)).unwrap()
    }

    fn opened(input: &str) -> Conversation {
        Conversation::opened_by(Actor::human().speaker(), input)
    }

    #[test]
    fn test_prepare_messages_layout() {
        let fresh = actor("A");
        let messages = ActorRuntime::<EchoGateway>::prepare_messages(&fresh, vec![Message::user("hi")]);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], Message::system("You are A."));
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content, PromptTemplate::stay_in_character_ack());
        assert_eq!(messages[2], Message::user("hi"));

        let remembering = actor("A")
            .with_memory("Met B.")
            .with_last_conversation(opened("hello"));
        let messages =
            ActorRuntime::<EchoGateway>::prepare_messages(&remembering, vec![Message::user("hi")]);
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[2].role, Role::Assistant);
        assert!(messages[2].content.contains("Here is my memory: Met B."));
        assert!(messages[2].content.contains("User: hello"));
    }

    #[tokio::test]
    async fn test_human_cannot_generate() {
        let runtime = ActorRuntime::new(Arc::new(EchoGateway::new()));
        let err = runtime.answer(&Actor::human(), "hi").await.unwrap_err();
        assert!(matches!(err, GatewayError::NotPermitted(_)));
    }

    #[tokio::test]
    async fn test_answer_returns_backend_text() {
        let gateway = Arc::new(ScriptedGateway::new().on("You are A.", "Hi from A"));
        let runtime = ActorRuntime::new(gateway);
        assert_eq!(runtime.answer(&actor("A"), "hello").await.unwrap(), "Hi from A");
    }

    #[tokio::test]
    async fn test_skip_and_noop_make_no_backend_call() {
        let gateway = Arc::new(ScriptedGateway::new());
        let runtime = ActorRuntime::new(Arc::clone(&gateway));
        let mut b = actor("B");
        let conversation = opened("hello");
        let mut rng = ScriptedRandom::new().rolls(&[0.5, 10.0]);

        assert_eq!(
            runtime.decide_behavior(&mut b, &conversation, &mut rng).await,
            Behavior::Skip
        );
        assert_eq!(
            runtime.decide_behavior(&mut b, &conversation, &mut rng).await,
            Behavior::Noop
        );
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_speak_appends_nudge() {
        let gateway = Arc::new(ScriptedGateway::new().on("You are B.", "B here"));
        let runtime = ActorRuntime::new(Arc::clone(&gateway));
        let mut b = actor("B");
        let mut conversation = opened("hello");
        conversation.push(actor("A").speaker(), "Hi");
        let mut rng = ScriptedRandom::new().rolls(&[50.0]);

        let behavior = runtime.decide_behavior(&mut b, &conversation, &mut rng).await;
        assert_eq!(behavior, Behavior::Speak("B here".to_string()));

        let sent = &gateway.calls()[0];
        assert_eq!(sent.last().unwrap().content, PromptTemplate::turn_nudge());
        assert!(sent.iter().any(|m| m.content.contains("play as A: Hi")));
    }

    #[tokio::test]
    async fn test_impersonate_borrows_participant_name() {
        let gateway = Arc::new(ScriptedGateway::new().on("You are B.", "I am the user now"));
        let runtime = ActorRuntime::new(gateway);
        let mut b = actor("B");
        let mut conversation = opened("hello");
        conversation.push(actor("A").speaker(), "Hi");
        let mut rng = ScriptedRandom::new().rolls(&[99.0]).picks(&[0]);

        let behavior = runtime.decide_behavior(&mut b, &conversation, &mut rng).await;
        assert_eq!(
            behavior,
            Behavior::Impersonate {
                as_name: "User".to_string(),
                text: "I am the user now".to_string(),
            }
        );
        assert_eq!(b.real_name(), "B");
        assert_eq!(b.display_name(), "User");
        assert!(b.memory().contains("B decided act as User"));
    }

    #[tokio::test]
    async fn test_backend_failure_degrades_to_noop() {
        let runtime = ActorRuntime::new(Arc::new(FailingGateway::new()));
        let mut b = actor("B");
        let mut rng = ScriptedRandom::new().rolls(&[50.0]);
        let behavior = runtime
            .decide_behavior(&mut b, &opened("hello"), &mut rng)
            .await;
        assert_eq!(behavior, Behavior::Noop);
        assert!(behavior.is_participant());
    }

    #[tokio::test]
    async fn test_failed_impersonation_leaves_actor_unchanged() {
        let runtime = ActorRuntime::new(Arc::new(FailingGateway::new()));
        let mut b = actor("B").with_memory("Met A.");
        let mut conversation = opened("hello");
        conversation.push(actor("A").speaker(), "Hi");
        let mut rng = ScriptedRandom::new().rolls(&[99.0]).picks(&[0]);

        let behavior = runtime.decide_behavior(&mut b, &conversation, &mut rng).await;
        assert_eq!(behavior, Behavior::Noop);
        assert_eq!(b.display_name(), "B");
        assert_eq!(b.memory(), "Met A.");
    }

    #[tokio::test]
    async fn test_consolidate_without_history_only_stores_round() {
        let gateway = Arc::new(ScriptedGateway::new());
        let runtime = ActorRuntime::new(Arc::clone(&gateway));
        let mut a = actor("A");
        let round = opened("hello");

        let updated = runtime.consolidate_memory(&mut a, round.clone()).await;
        assert!(!updated);
        assert!(gateway.calls().is_empty());
        assert_eq!(a.last_conversation(), Some(&round));
        assert_eq!(a.memory(), "");
    }

    #[tokio::test]
    async fn test_consolidate_round_trip_with_echo_backend() {
        let runtime = ActorRuntime::new(Arc::new(EchoGateway::new()));
        let mut a = actor("A");

        let mut first = opened("hello");
        first.push(a.speaker(), "Hi there");
        runtime.consolidate_memory(&mut a, first).await;

        let second = opened("again");
        let updated = runtime.consolidate_memory(&mut a, second.clone()).await;
        assert!(updated);
        assert!(a.memory().contains("Here is the last conversation we had: User: hello\nA: Hi there"));
        assert!(a.memory().contains("Summarize the above interactions"));
        assert_eq!(a.last_conversation(), Some(&second));
    }

    #[tokio::test]
    async fn test_consolidate_failure_keeps_memory() {
        let runtime = ActorRuntime::new(Arc::new(FailingGateway::new()));
        let mut a = actor("A")
            .with_memory("old")
            .with_last_conversation(opened("x"));
        let round = Conversation::new();
        let updated = runtime.consolidate_memory(&mut a, round.clone()).await;
        assert!(!updated);
        assert_eq!(a.memory(), "old");
        assert_eq!(a.last_conversation(), Some(&round));
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        struct Slow(legion_domain::Model);

        #[async_trait::async_trait]
        impl LlmGateway for Slow {
            async fn complete(&self, _messages: &[Message]) -> Result<String, GatewayError> {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok("late".to_string())
            }

            fn model(&self) -> &legion_domain::Model {
                &self.0
            }
        }

        let runtime = ActorRuntime::new(Arc::new(Slow(legion_domain::Model::default())))
            .with_timeout(Some(Duration::from_millis(10)));
        let err = runtime.answer(&actor("A"), "hi").await.unwrap_err();
        assert_eq!(err, GatewayError::Timeout);
    }
}
