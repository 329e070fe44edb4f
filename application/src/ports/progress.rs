//! Progress notification port
//!
//! Defines the interface for reporting what happens during a round.

use legion_domain::{ActionVote, BehaviorKind, JudgeVote, Speaker};

/// Callback for progress updates during a round
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, log file, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called before the judges are asked
    fn on_judging_start(&self, judges: usize);

    /// Called once per judge, in judge order
    fn on_vote_cast(&self, vote: &JudgeVote);

    /// Called after the winning action has been applied
    fn on_action_applied(&self, action: &ActionVote, events: &[String]);

    /// Called for every turn appended to the transcript, human excluded
    fn on_turn(&self, speaker: &Speaker, text: &str);

    // ==================== Detail Callbacks ====================

    /// Called when a backend call starts on behalf of `who`
    fn on_generation_start(&self, _who: &str) {}

    /// Called when that backend call returns
    fn on_generation_end(&self, _who: &str) {}

    /// Called with the roll outcome of a non-primary member
    fn on_behavior(&self, _actor: &str, _kind: BehaviorKind) {}

    /// Called after an actor's memory was consolidated (or left unchanged)
    fn on_memory_consolidated(&self, _actor: &str, _updated: bool) {}

    /// Called for recoverable problems worth surfacing
    fn on_warning(&self, _message: &str) {}

    /// Called with each judge's answer in panel-summary mode
    fn on_panel_response(&self, _judge: &str, _text: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_judging_start(&self, _judges: usize) {}
    fn on_vote_cast(&self, _vote: &JudgeVote) {}
    fn on_action_applied(&self, _action: &ActionVote, _events: &[String]) {}
    fn on_turn(&self, _speaker: &Speaker, _text: &str) {}
}
