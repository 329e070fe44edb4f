//! Majority aggregation over judge votes

use super::vote::{ActionVote, JudgeVote, VoteCategory};

/// Votes counted by category, in order of first appearance
///
/// The winner is the category with the highest count. Ties go to the
/// category that appeared first, and the applied payload is that of the first
/// vote cast in the winning category.
///
/// ```
/// use legion_domain::panel::{ActionVote, JudgeVote, VoteTally};
///
/// let tally = VoteTally::from_votes(&[
///     JudgeVote::new("MELCHIOR", ActionVote::Keep),
///     JudgeVote::new("BALTHASAR", ActionVote::Shuffle),
///     JudgeVote::new("CASPAR", ActionVote::Keep),
/// ]);
/// assert_eq!(tally.winner(), ActionVote::Keep);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VoteTally {
    buckets: Vec<(VoteCategory, usize, ActionVote)>,
}

impl VoteTally {
    pub fn from_votes(votes: &[JudgeVote]) -> Self {
        let mut buckets: Vec<(VoteCategory, usize, ActionVote)> = Vec::new();
        for judge_vote in votes {
            let category = judge_vote.vote.category();
            match buckets.iter_mut().find(|(c, _, _)| *c == category) {
                Some((_, count, _)) => *count += 1,
                None => buckets.push((category, 1, judge_vote.vote.clone())),
            }
        }
        Self { buckets }
    }

    /// Winning vote; Keep when nothing was cast
    pub fn winner(&self) -> ActionVote {
        let mut best: Option<&(VoteCategory, usize, ActionVote)> = None;
        for bucket in &self.buckets {
            if best.is_none_or(|b| bucket.1 > b.1) {
                best = Some(bucket);
            }
        }
        best.map(|(_, _, vote)| vote.clone())
            .unwrap_or(ActionVote::Keep)
    }

    pub fn count(&self, category: VoteCategory) -> usize {
        self.buckets
            .iter()
            .find(|(c, _, _)| *c == category)
            .map(|(_, n, _)| *n)
            .unwrap_or(0)
    }

    /// Compact summary such as `keep×2 shuffle×1`
    pub fn summary(&self) -> String {
        self.buckets
            .iter()
            .map(|(c, n, _)| format!("{}×{}", c, n))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
