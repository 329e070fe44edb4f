//! Vote types for pool-membership decisions

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single judge's proposed pool mutation
///
/// # Example
///
/// ```
/// use legion_domain::panel::{ActionVote, VoteCategory};
///
/// let vote = ActionVote::remove(["Karlach"]);
/// assert_eq!(vote.category(), VoteCategory::Remove);
/// assert!(ActionVote::Keep.is_noop());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionVote {
    /// Leave the pool as it is
    Keep,
    /// Reorder the pool uniformly at random
    Shuffle,
    /// Persist and evict the named members (real names)
    Remove { targets: BTreeSet<String> },
    /// Invent a new member for the request
    AddNew,
    /// Replace the pool with frequently seen actors
    RecallPopular,
}

impl ActionVote {
    pub fn remove<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ActionVote::Remove {
            targets: targets.into_iter().map(Into::into).collect(),
        }
    }

    pub fn category(&self) -> VoteCategory {
        match self {
            ActionVote::Keep => VoteCategory::Keep,
            ActionVote::Shuffle => VoteCategory::Shuffle,
            ActionVote::Remove { .. } => VoteCategory::Remove,
            ActionVote::AddNew => VoteCategory::AddNew,
            ActionVote::RecallPopular => VoteCategory::RecallPopular,
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, ActionVote::Keep)
    }
}

impl std::fmt::Display for ActionVote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionVote::Remove { targets } => {
                let names: Vec<&str> = targets.iter().map(String::as_str).collect();
                write!(f, "remove({})", names.join(", "))
            }
            other => f.write_str(other.category().as_str()),
        }
    }
}

/// Vote kind without payload; what the majority is counted over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteCategory {
    Keep,
    Shuffle,
    Remove,
    AddNew,
    RecallPopular,
}

impl VoteCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteCategory::Keep => "keep",
            VoteCategory::Shuffle => "shuffle",
            VoteCategory::Remove => "remove",
            VoteCategory::AddNew => "add_new",
            VoteCategory::RecallPopular => "recall_popular",
        }
    }
}

impl std::fmt::Display for VoteCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vote attributed to the judge that cast it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeVote {
    pub judge: String,
    pub vote: ActionVote,
    /// Set when the vote was forced to Keep by a parse or backend failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl JudgeVote {
    pub fn new(judge: impl Into<String>, vote: ActionVote) -> Self {
        Self {
            judge: judge.into(),
            vote,
            warning: None,
        }
    }

    /// Keep vote recorded after something went wrong
    pub fn fallback(judge: impl Into<String>, warning: impl Into<String>) -> Self {
        Self {
            judge: judge.into(),
            vote: ActionVote::Keep,
            warning: Some(warning.into()),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.warning.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_targets_are_deduplicated() {
        let vote = ActionVote::remove(["Yoda", "Karlach", "Yoda"]);
        match &vote {
            ActionVote::Remove { targets } => assert_eq!(targets.len(), 2),
            _ => panic!("expected remove"),
        }
        assert_eq!(vote.to_string(), "remove(Karlach, Yoda)");
    }

    #[test]
    fn test_serde_tagged_by_action() {
        let json = serde_json::to_value(ActionVote::remove(["Ellie"])).unwrap();
        assert_eq!(json["action"], "remove");
        assert_eq!(json["targets"][0], "Ellie");
        let keep = serde_json::to_value(ActionVote::RecallPopular).unwrap();
        assert_eq!(keep["action"], "recall_popular");
    }

    #[test]
    fn test_fallback_vote_is_keep() {
        let vote = JudgeVote::fallback("CASPAR", "backend timed out");
        assert!(vote.vote.is_noop());
        assert!(vote.is_fallback());
        assert!(!JudgeVote::new("CASPAR", ActionVote::Shuffle).is_fallback());
    }
}
