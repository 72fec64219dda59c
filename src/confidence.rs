//! Confidence aggregation
//!
//! A record's confidence is its base score plus one fixed delta per vote,
//! clamped to `[MIN_CONFIDENCE, MAX_CONFIDENCE]`. The sum is commutative, so
//! the server's full recomputation and the client's optimistic single-vote
//! update converge on the same value.

use crate::models::VoteKind;

/// Confidence assigned to every record at creation.
pub const BASE_CONFIDENCE: i64 = 50;

pub const MIN_CONFIDENCE: i64 = 0;
pub const MAX_CONFIDENCE: i64 = 100;

/// Score contribution of a single vote.
pub fn delta(kind: VoteKind) -> i64 {
    match kind {
        VoteKind::Yes => 2,
        VoteKind::Maybe => 1,
        VoteKind::No => -2,
        VoteKind::Skip => -1,
    }
}

pub fn clamp(score: i64) -> i64 {
    score.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

/// Recompute confidence from a base score and the full vote history.
///
/// Clamping happens once, after summing, so the result only depends on the
/// multiset of votes and never on their order.
pub fn aggregate<I>(base: i64, votes: I) -> i64
where
    I: IntoIterator<Item = VoteKind>,
{
    let sum: i64 = votes.into_iter().map(delta).sum();
    clamp(base.saturating_add(sum))
}

/// Apply one vote to an already-derived value (optimistic client update).
pub fn apply_delta(current: i64, kind: VoteKind) -> i64 {
    clamp(current + delta(kind))
}
