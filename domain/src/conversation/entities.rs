//! Conversation entities

use crate::actor::entities::ActorRole;
use crate::prompt::PromptTemplate;
use crate::session::entities::Message;
use serde::{Deserialize, Serialize};

/// Identity of whoever produced a turn.
///
/// A snapshot taken at the moment of speaking, never a handle to the actor
/// itself: if the actor later changes its display name the turn keeps the
/// name it was spoken under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    pub real_name: String,
    pub display_name: String,
    pub role: ActorRole,
}

impl Speaker {
    pub fn new(
        real_name: impl Into<String>,
        display_name: impl Into<String>,
        role: ActorRole,
    ) -> Self {
        Self {
            real_name: real_name.into(),
            display_name: display_name.into(),
            role,
        }
    }

    /// `display (real)` while impersonating, otherwise just the display name
    pub fn label(&self) -> String {
        if self.display_name == self.real_name {
            self.display_name.clone()
        } else {
            format!("{} ({})", self.display_name, self.real_name)
        }
    }
}

/// A single (speaker, text) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub speaker: Speaker,
    pub text: String,
}

/// Ordered, append-only transcript of one round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    turns: Vec<ConversationTurn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a conversation with the human's input as the first turn
    pub fn opened_by(human: Speaker, input: impl Into<String>) -> Self {
        let mut conversation = Self::new();
        conversation.push(human, input);
        conversation
    }

    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.turns.push(ConversationTurn {
            speaker,
            text: text.into(),
        });
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Number of turns attributed to `real_name`
    pub fn turns_by(&self, real_name: &str) -> usize {
        self.turns
            .iter()
            .filter(|t| t.speaker.real_name == real_name)
            .count()
    }

    /// Distinct display names of everyone who spoke, in order of first appearance
    pub fn participant_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for turn in &self.turns {
            let name = turn.speaker.display_name.as_str();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Transcript as the actors see it (display names)
    pub fn transcript(&self) -> String {
        self.render(|s| &s.display_name)
    }

    /// Transcript with true identities, for audit output
    pub fn audit_transcript(&self) -> String {
        self.render(|s| &s.real_name)
    }

    fn render(&self, name: impl Fn(&Speaker) -> &String) -> String {
        let mut out = String::new();
        for turn in &self.turns {
            out.push_str(name(&turn.speaker));
            out.push_str(": ");
            out.push_str(&turn.text);
            out.push('\n');
        }
        out
    }

    /// Convert the transcript into backend messages.
    ///
    /// The human's turns pass through verbatim; every other turn is framed as
    /// coming from another AI playing its display name.
    pub fn to_messages(&self) -> Vec<Message> {
        self.turns
            .iter()
            .map(|turn| match turn.speaker.role {
                ActorRole::Human => Message::user(turn.text.clone()),
                _ => Message::user(PromptTemplate::other_actor_turn(
                    &turn.speaker.display_name,
                    &turn.text,
                )),
            })
            .collect()
    }
}
