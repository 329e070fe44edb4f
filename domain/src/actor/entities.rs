//! Actor entity

use crate::conversation::{Conversation, Speaker};
use crate::core::error::DomainError;
use crate::prompt::PromptTemplate;
use serde::{Deserialize, Serialize};

/// Greeting used when an actor has no opening line of its own
pub const DEFAULT_OPENING: &str = "Hello";

pub const HUMAN_REAL_NAME: &str = "Master";
pub const HUMAN_DISPLAY_NAME: &str = "User";

/// What an actor is allowed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    /// The person at the keyboard. Never generates text.
    Human,
    /// Fixed panel member that votes on pool membership. Never evicted.
    Judge,
    /// Regular pool member
    Ordinary,
}

impl ActorRole {
    pub fn can_generate(&self) -> bool {
        !matches!(self, ActorRole::Human)
    }

    pub fn is_evictable(&self) -> bool {
        matches!(self, ActorRole::Ordinary)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActorRole::Human => "human",
            ActorRole::Judge => "judge",
            ActorRole::Ordinary => "ordinary",
        }
    }
}

impl std::fmt::Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An independently identified agent with instructions and memory (Entity)
///
/// `real_name` is the stable key; `display_name` is what the actor currently
/// presents itself as and may change when it impersonates someone else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    real_name: String,
    display_name: String,
    instructions: String,
    opening: String,
    memory: String,
    last_conversation: Option<Conversation>,
    role: ActorRole,
}

impl Actor {
    pub fn new(
        real_name: impl Into<String>,
        display_name: impl Into<String>,
        instructions: impl Into<String>,
        role: ActorRole,
    ) -> Result<Self, DomainError> {
        let real_name = real_name.into().trim().to_string();
        if real_name.is_empty() {
            return Err(DomainError::EmptyActorName);
        }
        let display_name = display_name.into().trim().to_string();
        let display_name = if display_name.is_empty() {
            real_name.clone()
        } else {
            display_name
        };

        Ok(Self {
            real_name,
            display_name,
            instructions: instructions.into(),
            opening: DEFAULT_OPENING.to_string(),
            memory: String::new(),
            last_conversation: None,
            role,
        })
    }

    /// Built-in actor with names known to be valid
    pub(crate) fn preset(
        real_name: &str,
        display_name: &str,
        instructions: &str,
        role: ActorRole,
    ) -> Self {
        Self {
            real_name: real_name.to_string(),
            display_name: display_name.to_string(),
            instructions: instructions.to_string(),
            opening: DEFAULT_OPENING.to_string(),
            memory: String::new(),
            last_conversation: None,
            role,
        }
    }

    /// The person at the keyboard
    pub fn human() -> Self {
        Self::preset(HUMAN_REAL_NAME, HUMAN_DISPLAY_NAME, "", ActorRole::Human)
    }

    /// Ordinary actor whose display name equals its real name
    pub fn ordinary(
        name: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        Self::new(name.clone(), name, instructions, ActorRole::Ordinary)
    }

    pub fn with_opening(mut self, opening: impl Into<String>) -> Self {
        self.opening = opening.into();
        self
    }

    pub fn with_memory(mut self, memory: impl Into<String>) -> Self {
        self.memory = memory.into();
        self
    }

    pub fn with_last_conversation(mut self, conversation: Conversation) -> Self {
        self.last_conversation = Some(conversation);
        self
    }

    pub fn real_name(&self) -> &str {
        &self.real_name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn opening(&self) -> &str {
        &self.opening
    }

    pub fn memory(&self) -> &str {
        &self.memory
    }

    pub fn last_conversation(&self) -> Option<&Conversation> {
        self.last_conversation.as_ref()
    }

    /// Last conversation, ignoring one that holds no turns
    pub fn prior_conversation(&self) -> Option<&Conversation> {
        self.last_conversation.as_ref().filter(|c| !c.is_empty())
    }

    pub fn role(&self) -> ActorRole {
        self.role
    }

    /// Presenting under a name other than the real one
    pub fn is_impersonating(&self) -> bool {
        self.display_name != self.real_name
    }

    /// Identity snapshot for attributing a turn
    pub fn speaker(&self) -> Speaker {
        Speaker::new(&self.real_name, &self.display_name, self.role)
    }

    /// Whether consolidation has anything to summarise
    pub fn has_history(&self) -> bool {
        !self.memory.is_empty() || self.prior_conversation().is_some()
    }

    /// Take on another identity and remember having done so
    pub fn impersonate(&mut self, display_name: impl Into<String>) {
        self.display_name = display_name.into();
        let note = PromptTemplate::impersonation_note(&self.real_name, &self.display_name);
        self.memory.push('\n');
        self.memory.push_str(&note);
    }

    pub fn replace_memory(&mut self, memory: impl Into<String>) {
        self.memory = memory.into();
    }

    /// Replace the last conversation wholesale
    pub fn replace_last_conversation(&mut self, conversation: Conversation) {
        self.last_conversation = Some(conversation);
    }

    /// Queue a note for the next consolidation.
    ///
    /// The note is attributed to the actor itself and appended to its last
    /// conversation (created empty when the actor has none yet).
    pub fn note_event(&mut self, events: &str) {
        let speaker = self.speaker();
        self.last_conversation
            .get_or_insert_with(Conversation::new)
            .push(speaker, PromptTemplate::event_note(events));
    }

    pub fn to_snapshot(&self) -> ActorSnapshot {
        ActorSnapshot {
            display_name: self.display_name.clone(),
            real_name: self.real_name.clone(),
            instructions: self.instructions.clone(),
            opening: self.opening.clone(),
            memory: self.memory.clone(),
        }
    }

    /// Rebuild an ordinary actor from its persisted record
    pub fn from_snapshot(snapshot: ActorSnapshot) -> Result<Self, DomainError> {
        let opening = if snapshot.opening.is_empty() {
            DEFAULT_OPENING.to_string()
        } else {
            snapshot.opening
        };
        Ok(Self::new(
            snapshot.real_name,
            snapshot.display_name,
            snapshot.instructions,
            ActorRole::Ordinary,
        )?
        .with_opening(opening)
        .with_memory(snapshot.memory))
    }
}

/// Persisted shape of an actor, one record per `real_name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorSnapshot {
    #[serde(rename = "character_name", default)]
    pub display_name: String,
    pub real_name: String,
    #[serde(rename = "system_prompt", default)]
    pub instructions: String,
    #[serde(default)]
    pub opening: String,
    #[serde(default)]
    pub memory: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yoda() -> Actor {
        Actor::ordinary("Yoda", "Speak like Yoda.").unwrap()
    }

    #[test]
    fn test_empty_name_rejected() {
        assert_eq!(
            Actor::ordinary("  ", "x").unwrap_err(),
            DomainError::EmptyActorName
        );
    }

    #[test]
    fn test_display_name_defaults_to_real_name() {
        let actor = Actor::new("Geralt", "", "Hm.", ActorRole::Ordinary).unwrap();
        assert_eq!(actor.display_name(), "Geralt");
        assert!(!actor.is_impersonating());
    }

    #[test]
    fn test_role_capabilities() {
        assert!(!ActorRole::Human.can_generate());
        assert!(ActorRole::Judge.can_generate());
        assert!(!ActorRole::Judge.is_evictable());
        assert!(ActorRole::Ordinary.is_evictable());
    }

    #[test]
    fn test_impersonate_keeps_real_name_and_notes_memory() {
        let mut actor = yoda().with_memory("Met a padawan.");
        actor.impersonate("User");
        assert_eq!(actor.real_name(), "Yoda");
        assert_eq!(actor.display_name(), "User");
        assert!(actor.is_impersonating());
        assert!(actor.memory().starts_with("Met a padawan."));
        assert!(actor.memory().contains("User"));
        assert_eq!(actor.speaker().label(), "User (Yoda)");
    }

    #[test]
    fn test_note_event_creates_last_conversation() {
        let mut actor = yoda();
        assert!(actor.last_conversation().is_none());
        actor.note_event("Geralt left the conversation.");
        let last = actor.last_conversation().unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last.turns()[0].speaker.real_name, "Yoda");
        assert!(last.turns()[0].text.contains("Geralt left"));
        assert!(actor.has_history());
    }

    #[test]
    fn test_empty_last_conversation_is_not_history() {
        let actor = yoda().with_last_conversation(Conversation::new());
        assert!(actor.last_conversation().is_some());
        assert!(actor.prior_conversation().is_none());
        assert!(!actor.has_history());
    }

    #[test]
    fn test_snapshot_uses_persisted_field_names() {
        let actor = yoda().with_opening("Hmm, greet you I do.").with_memory("m");
        let json = serde_json::to_value(actor.to_snapshot()).unwrap();
        assert_eq!(json["character_name"], "Yoda");
        assert_eq!(json["real_name"], "Yoda");
        assert_eq!(json["system_prompt"], "Speak like Yoda.");
        assert_eq!(json["opening"], "Hmm, greet you I do.");
        assert_eq!(json["memory"], "m");
    }

    #[test]
    fn test_from_snapshot_fills_defaults() {
        let snapshot: ActorSnapshot =
            serde_json::from_str(r#"{"real_name": "Ellie", "memory": "Giraffes."}"#).unwrap();
        let actor = Actor::from_snapshot(snapshot).unwrap();
        assert_eq!(actor.display_name(), "Ellie");
        assert_eq!(actor.opening(), DEFAULT_OPENING);
        assert_eq!(actor.memory(), "Giraffes.");
        assert_eq!(actor.role(), ActorRole::Ordinary);
    }
}
