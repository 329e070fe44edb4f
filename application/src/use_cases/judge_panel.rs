//! Judge panel use case
//!
//! Asks every judge, concurrently, how the pool should change for the
//! incoming input, then reduces the votes to one action by majority.

use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::ProgressNotifier;
use crate::use_cases::shared::complete_with_timeout;
use legion_domain::{
    ActionVote, Actor, JudgeVote, Message, PromptTemplate, Speaker, VoteTally,
    parse_judge_answer,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Outcome of one panel evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelDecision {
    /// Votes in judge order
    pub votes: Vec<JudgeVote>,
    /// The action to apply
    pub action: ActionVote,
    /// Compact per-category counts
    pub tally: String,
}

pub struct JudgePanel<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    judges: Vec<Actor>,
    timeout: Option<Duration>,
}

impl<G: LlmGateway + 'static> JudgePanel<G> {
    pub fn new(gateway: Arc<G>, judges: Vec<Actor>) -> Self {
        Self {
            gateway,
            judges,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn judges(&self) -> &[Actor] {
        &self.judges
    }

    /// Collect one vote per judge and pick the winner.
    ///
    /// An empty pool short-circuits to AddNew from every judge without
    /// calling the backend. Judges never touch shared state; a judge whose
    /// call fails or whose answer cannot be parsed votes Keep.
    pub async fn evaluate(
        &self,
        input: &str,
        pool: &[Speaker],
        progress: &dyn ProgressNotifier,
    ) -> PanelDecision {
        progress.on_judging_start(self.judges.len());

        let votes = if pool.is_empty() {
            debug!("Pool is empty, every judge votes add_new");
            self.judges
                .iter()
                .map(|j| JudgeVote::new(j.real_name(), ActionVote::AddNew))
                .collect()
        } else {
            self.collect_votes(input, pool).await
        };

        for vote in &votes {
            if let Some(warning) = &vote.warning {
                progress.on_warning(warning);
            }
            progress.on_vote_cast(vote);
        }

        let tally = VoteTally::from_votes(&votes);
        let action = tally.winner();
        info!("Panel decided {} ({})", action, tally.summary());

        PanelDecision {
            votes,
            action,
            tally: tally.summary(),
        }
    }

    async fn collect_votes(&self, input: &str, pool: &[Speaker]) -> Vec<JudgeVote> {
        let pool_names: Vec<String> = pool.iter().map(|s| s.real_name.clone()).collect();
        let mut join_set = JoinSet::new();

        for (index, judge) in self.judges.iter().enumerate() {
            let gateway = Arc::clone(&self.gateway);
            let timeout = self.timeout;
            let messages = vec![
                Message::system(judge.instructions()),
                Message::user(PromptTemplate::judge_prompt(
                    judge.display_name(),
                    input,
                    &pool_names,
                )),
            ];

            join_set.spawn(async move {
                let result = complete_with_timeout(gateway.as_ref(), &messages, timeout).await;
                (index, result)
            });
        }

        let mut slots: Vec<Option<JudgeVote>> = vec![None; self.judges.len()];

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, result)) => {
                    let name = self.judges[index].real_name();
                    let vote = match result {
                        Ok(answer) => match parse_judge_answer(&answer, pool) {
                            Ok(vote) => {
                                debug!("{} voted {}", name, vote);
                                JudgeVote::new(name, vote)
                            }
                            Err(e) => {
                                warn!("{}: {}", name, e);
                                JudgeVote::fallback(name, format!("{}: {}", name, e))
                            }
                        },
                        Err(e) => {
                            warn!("Judge {} failed: {}", name, e);
                            JudgeVote::fallback(name, format!("{} unavailable: {}", name, e))
                        }
                    };
                    slots[index] = Some(vote);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| {
                    JudgeVote::fallback(self.judges[index].real_name(), "judge task aborted")
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;
    use crate::use_cases::test_support::{FailingGateway, RecordingProgress, ScriptedGateway};
    use legion_domain::{ActorRole, judges};

    fn pool() -> Vec<Speaker> {
        vec![
            Speaker::new("A", "A", ActorRole::Ordinary),
            Speaker::new("B", "B", ActorRole::Ordinary),
        ]
    }

    fn scripted(melchior: &str, balthasar: &str, caspar: &str) -> ScriptedGateway {
        ScriptedGateway::new()
            .on("As MELCHIOR", melchior)
            .on("As BALTHASAR", balthasar)
            .on("As CASPAR", caspar)
    }

    #[tokio::test]
    async fn test_majority_wins_and_votes_in_judge_order() {
        let panel = JudgePanel::new(Arc::new(scripted("KEEP", "SHUFFLE", "KEEP")), judges());
        let decision = panel.evaluate("hello", &pool(), &NoProgress).await;

        assert_eq!(decision.action, ActionVote::Keep);
        let order: Vec<_> = decision.votes.iter().map(|v| v.judge.as_str()).collect();
        assert_eq!(order, vec!["MELCHIOR", "BALTHASAR", "CASPAR"]);
        assert_eq!(decision.votes[1].vote, ActionVote::Shuffle);
        assert_eq!(decision.tally, "keep×2 shuffle×1");
    }

    #[tokio::test]
    async fn test_remove_majority_carries_targets() {
        let panel = JudgePanel::new(
            Arc::new(scripted("REMOVE: A", "REMOVE: A", "ADD_NEW")),
            judges(),
        );
        let decision = panel.evaluate("hello", &pool(), &NoProgress).await;
        assert_eq!(decision.action, ActionVote::remove(["A"]));
    }

    #[tokio::test]
    async fn test_empty_pool_votes_add_new_without_backend() {
        let gateway = Arc::new(ScriptedGateway::new());
        let panel = JudgePanel::new(Arc::clone(&gateway), judges());
        let decision = panel.evaluate("hello", &[], &NoProgress).await;
        assert_eq!(decision.action, ActionVote::AddNew);
        assert_eq!(decision.votes.len(), 3);
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_answer_becomes_keep_with_warning() {
        let progress = RecordingProgress::new();
        let panel = JudgePanel::new(
            Arc::new(scripted("Let me think about it", "SHUFFLE", "SHUFFLE")),
            judges(),
        );
        let decision = panel.evaluate("hello", &pool(), &progress).await;
        assert_eq!(decision.action, ActionVote::Shuffle);
        assert!(decision.votes[0].is_fallback());
        assert_eq!(decision.votes[0].vote, ActionVote::Keep);
        assert!(progress.events().iter().any(|e| e.starts_with("warning:MELCHIOR")));
    }

    #[tokio::test]
    async fn test_backend_failure_keeps_pool() {
        let panel = JudgePanel::new(Arc::new(FailingGateway::new()), judges());
        let decision = panel.evaluate("hello", &pool(), &NoProgress).await;
        assert_eq!(decision.action, ActionVote::Keep);
        assert!(decision.votes.iter().all(JudgeVote::is_fallback));
    }

    #[tokio::test]
    async fn test_judge_prompt_lists_pool_real_names() {
        let gateway = Arc::new(scripted("KEEP", "KEEP", "KEEP"));
        let panel = JudgePanel::new(Arc::clone(&gateway), judges());
        panel.evaluate("hello", &pool(), &NoProgress).await;
        assert_eq!(gateway.calls_containing("CURRENT CHARACTERS: A,B"), 3);
    }
}
