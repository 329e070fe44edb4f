//! Per-turn behavior of a non-primary pool member

use serde::{Deserialize, Serialize};

/// Rolls below this skip the round entirely
pub const SKIP_BELOW: f64 = 1.0;
/// Rolls below this stay silent but still participate
pub const NOOP_BELOW: f64 = 30.0;
/// Rolls below this speak as themselves; anything higher impersonates
pub const SPEAK_BELOW: f64 = 98.0;

/// Which branch a behavior roll selects, before any text is generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorKind {
    Skip,
    Noop,
    Speak,
    Impersonate,
}

impl BehaviorKind {
    /// Map a roll in `[0, 100)` onto a behavior
    pub fn from_roll(roll: f64) -> Self {
        if roll < SKIP_BELOW {
            BehaviorKind::Skip
        } else if roll < NOOP_BELOW {
            BehaviorKind::Noop
        } else if roll < SPEAK_BELOW {
            BehaviorKind::Speak
        } else {
            BehaviorKind::Impersonate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BehaviorKind::Skip => "skip",
            BehaviorKind::Noop => "noop",
            BehaviorKind::Speak => "speak",
            BehaviorKind::Impersonate => "impersonate",
        }
    }
}

impl std::fmt::Display for BehaviorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved behavior with generated text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Behavior {
    /// Not part of this round at all
    Skip,
    /// Listens without speaking; still consolidates the round
    Noop,
    Speak(String),
    /// Spoke under a borrowed display name
    Impersonate { as_name: String, text: String },
}

impl Behavior {
    pub fn kind(&self) -> BehaviorKind {
        match self {
            Behavior::Skip => BehaviorKind::Skip,
            Behavior::Noop => BehaviorKind::Noop,
            Behavior::Speak(_) => BehaviorKind::Speak,
            Behavior::Impersonate { .. } => BehaviorKind::Impersonate,
        }
    }

    /// Text to append to the transcript, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            Behavior::Speak(text) | Behavior::Impersonate { text, .. } => Some(text),
            Behavior::Skip | Behavior::Noop => None,
        }
    }

    pub fn is_participant(&self) -> bool {
        !matches!(self, Behavior::Skip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_boundaries() {
        assert_eq!(BehaviorKind::from_roll(0.0), BehaviorKind::Skip);
        assert_eq!(BehaviorKind::from_roll(0.99), BehaviorKind::Skip);
        assert_eq!(BehaviorKind::from_roll(1.0), BehaviorKind::Noop);
        assert_eq!(BehaviorKind::from_roll(29.9), BehaviorKind::Noop);
        assert_eq!(BehaviorKind::from_roll(30.0), BehaviorKind::Speak);
        assert_eq!(BehaviorKind::from_roll(50.0), BehaviorKind::Speak);
        assert_eq!(BehaviorKind::from_roll(97.99), BehaviorKind::Speak);
        assert_eq!(BehaviorKind::from_roll(98.0), BehaviorKind::Impersonate);
        assert_eq!(BehaviorKind::from_roll(99.99), BehaviorKind::Impersonate);
    }

    #[test]
    fn test_behavior_text_and_participation() {
        assert_eq!(Behavior::Skip.text(), None);
        assert!(!Behavior::Skip.is_participant());
        assert_eq!(Behavior::Noop.text(), None);
        assert!(Behavior::Noop.is_participant());

        let imp = Behavior::Impersonate {
            as_name: "User".to_string(),
            text: "It was me all along.".to_string(),
        };
        assert_eq!(imp.text(), Some("It was me all along."));
        assert_eq!(imp.kind(), BehaviorKind::Impersonate);
    }
}
