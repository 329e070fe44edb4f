//! Conversation transcript port
//!
//! Diagnostics go through `tracing`; this port records what the session
//! actually did (votes, pool changes, rounds, verdicts) as machine-readable
//! events for later replay or analysis.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Kinds of session event worth keeping in the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// One judge's vote before a round
    VoteCast,
    /// The winning action changed the pool
    PoolMutated,
    /// A round finished; carries the full transcript
    RoundCompleted,
    /// A `[MAGI]` question was answered
    PanelVerdict,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::VoteCast => "vote_cast",
            EventKind::PoolMutated => "pool_mutated",
            EventKind::RoundCompleted => "round_completed",
            EventKind::PanelVerdict => "panel_verdict",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A session event and its payload. Adapters stamp the time.
#[derive(Debug, Clone)]
pub struct ConversationEvent {
    pub kind: EventKind,
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(kind: EventKind, payload: Value) -> Self {
        Self { kind, payload }
    }
}

/// Sink for [`ConversationEvent`]s. Write failures stay inside the adapter.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Discards every event
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_match_serde() {
        for kind in [
            EventKind::VoteCast,
            EventKind::PoolMutated,
            EventKind::RoundCompleted,
            EventKind::PanelVerdict,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }
}
